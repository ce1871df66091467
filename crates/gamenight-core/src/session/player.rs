// Players and the games they bring to the table.

use std::fmt;

use thiserror::Error;

/// Number of games every player must pick before the first round.
pub const PICKS_PER_PLAYER: usize = 2;

/// Fewest players a session can start with.
pub const MIN_PLAYERS: usize = 2;

/// Session-scoped player identifier. Assigned sequentially, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickError {
    #[error("player {player} already has {limit} picks")]
    PicksFull { player: PlayerId, limit: usize },

    #[error("at most {limit} picks allowed, got {count}")]
    TooManyPicks { count: usize, limit: usize },

    #[error("game `{game}` picked twice")]
    DuplicatePick { game: String },

    #[error("game title must not be blank")]
    BlankGame,
}

/// What a call to [`Player::toggle_pick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickToggle {
    Added,
    Removed,
}

/// A participant in the drafting session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Short icon/emoji shown next to the name.
    pub icon: String,
    /// Game titles this player brings, in the order they were picked.
    pub picks: Vec<String>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, icon: impl Into<String>) -> Self {
        Player {
            id,
            name: name.into(),
            icon: icon.into(),
            picks: Vec::new(),
        }
    }

    /// Whether this player has picked exactly [`PICKS_PER_PLAYER`] games.
    pub fn has_full_picks(&self) -> bool {
        self.picks.len() == PICKS_PER_PLAYER
    }

    /// Whether `game` is one of this player's picks.
    pub fn has_pick(&self, game: &str) -> bool {
        self.picks.iter().any(|p| p == game)
    }

    /// Add `game` to the picks, or remove it if already picked.
    ///
    /// Adding beyond [`PICKS_PER_PLAYER`] fails and leaves the picks as-is.
    pub fn toggle_pick(&mut self, game: &str) -> Result<PickToggle, PickError> {
        let game = normalize_title(game)?;

        if let Some(pos) = self.picks.iter().position(|p| *p == game) {
            self.picks.remove(pos);
            return Ok(PickToggle::Removed);
        }

        if self.picks.len() >= PICKS_PER_PLAYER {
            return Err(PickError::PicksFull {
                player: self.id,
                limit: PICKS_PER_PLAYER,
            });
        }

        self.picks.push(game);
        Ok(PickToggle::Added)
    }

    /// Replace all picks at once. On error the previous picks are kept.
    pub fn set_picks<I, S>(&mut self, games: I) -> Result<(), PickError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut picks: Vec<String> = Vec::new();
        for game in games {
            let game = normalize_title(game.as_ref())?;
            if picks.contains(&game) {
                return Err(PickError::DuplicatePick { game });
            }
            picks.push(game);
        }

        if picks.len() > PICKS_PER_PLAYER {
            return Err(PickError::TooManyPicks {
                count: picks.len(),
                limit: PICKS_PER_PLAYER,
            });
        }

        self.picks = picks;
        Ok(())
    }
}

fn normalize_title(game: &str) -> Result<String, PickError> {
    let trimmed = game.trim();
    if trimmed.is_empty() {
        return Err(PickError::BlankGame);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Player {
        Player::new(PlayerId(1), "Alice", "🦊")
    }

    #[test]
    fn new_player_has_no_picks() {
        let p = alice();
        assert!(p.picks.is_empty());
        assert!(!p.has_full_picks());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut p = alice();
        assert_eq!(p.toggle_pick("Azul").unwrap(), PickToggle::Added);
        assert!(p.has_pick("Azul"));
        assert_eq!(p.toggle_pick("Azul").unwrap(), PickToggle::Removed);
        assert!(p.picks.is_empty());
    }

    #[test]
    fn toggle_trims_titles() {
        let mut p = alice();
        p.toggle_pick("  Azul ").unwrap();
        assert_eq!(p.picks, vec!["Azul"]);
        assert_eq!(p.toggle_pick("Azul").unwrap(), PickToggle::Removed);
    }

    #[test]
    fn toggle_rejects_third_pick() {
        let mut p = alice();
        p.toggle_pick("Azul").unwrap();
        p.toggle_pick("Catan").unwrap();
        assert!(p.has_full_picks());

        let err = p.toggle_pick("Root").unwrap_err();
        assert_eq!(
            err,
            PickError::PicksFull {
                player: PlayerId(1),
                limit: 2
            }
        );
        assert_eq!(p.picks, vec!["Azul", "Catan"]);
    }

    #[test]
    fn toggle_rejects_blank_title() {
        let mut p = alice();
        assert_eq!(p.toggle_pick("   ").unwrap_err(), PickError::BlankGame);
    }

    #[test]
    fn set_picks_replaces_existing() {
        let mut p = alice();
        p.toggle_pick("Azul").unwrap();
        p.set_picks(["Root", "Wingspan"]).unwrap();
        assert_eq!(p.picks, vec!["Root", "Wingspan"]);
    }

    #[test]
    fn set_picks_rejects_too_many_and_keeps_previous() {
        let mut p = alice();
        p.set_picks(["Azul"]).unwrap();

        let err = p.set_picks(["Root", "Wingspan", "Catan"]).unwrap_err();
        assert_eq!(err, PickError::TooManyPicks { count: 3, limit: 2 });
        assert_eq!(p.picks, vec!["Azul"]);
    }

    #[test]
    fn set_picks_rejects_duplicates() {
        let mut p = alice();
        let err = p.set_picks(["Root", " Root"]).unwrap_err();
        assert_eq!(
            err,
            PickError::DuplicatePick {
                game: "Root".to_string()
            }
        );
        assert!(p.picks.is_empty());
    }
}
