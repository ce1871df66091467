// Rounds: which games are on which tables, and who sits where.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::player::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeatingError {
    #[error("no round is in progress")]
    NoActiveRound,

    #[error("round {} is already complete", .round + 1)]
    RoundClosed { round: usize },

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("table #{} does not exist", .table + 1)]
    UnknownTable { table: usize },

    #[error("`{game}` is not one of player {player}'s picks")]
    NotAPick { player: PlayerId, game: String },

    #[error("player {player} has already played `{game}`")]
    PickAlreadyPlayed { player: PlayerId, game: String },

    #[error("player {player} is already seated at table #{}", .table + 1)]
    AlreadySeated { player: PlayerId, table: usize },

    #[error("table #{} is full ({capacity} seats)", .table + 1)]
    TableFull { table: usize, capacity: usize },

    #[error("player {0} is not seated")]
    NotSeated(PlayerId),

    #[error("player {player} hosts table #{}; close the table instead", .table + 1)]
    HostCannotLeave { player: PlayerId, table: usize },
}

/// One game being played during a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Game title, taken from the host's picks.
    pub game: String,
    /// Player whose pick is on the table. Always seated at it.
    pub host: PlayerId,
    /// Everyone seated, host first.
    pub seats: Vec<PlayerId>,
}

impl Table {
    fn new(host: PlayerId, game: String) -> Self {
        Table {
            game,
            host,
            seats: vec![host],
        }
    }
}

/// A single seating round of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    /// Zero-based position in the session.
    pub index: usize,
    pub tables: Vec<Table>,
    /// Set once every player is seated and the round is closed. A completed
    /// round is never mutated again.
    pub completed: bool,
    pub started_at: DateTime<Utc>,
}

impl Round {
    pub fn new(index: usize) -> Self {
        Round {
            index,
            tables: Vec::new(),
            completed: false,
            started_at: Utc::now(),
        }
    }

    /// One-based round number for display.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    /// Index of the table `player` sits at, if any.
    pub fn table_of(&self, player: PlayerId) -> Option<usize> {
        self.tables
            .iter()
            .position(|t| t.seats.contains(&player))
    }

    pub fn is_seated(&self, player: PlayerId) -> bool {
        self.table_of(player).is_some()
    }

    /// Total number of occupied seats across all tables.
    pub fn seated_count(&self) -> usize {
        self.tables.iter().map(|t| t.seats.len()).sum()
    }

    /// Whether `host` has `game` on a table this round.
    pub fn hosts_game(&self, host: PlayerId, game: &str) -> bool {
        self.tables.iter().any(|t| t.host == host && t.game == game)
    }

    fn ensure_open(&self) -> Result<(), SeatingError> {
        if self.completed {
            return Err(SeatingError::RoundClosed { round: self.index });
        }
        Ok(())
    }

    /// Put `game` on a new table and seat its host. Pick ownership and
    /// prior-round usage are checked by the session before calling this.
    pub(crate) fn open_table(&mut self, host: PlayerId, game: String) -> Result<usize, SeatingError> {
        self.ensure_open()?;
        if let Some(table) = self.table_of(host) {
            return Err(SeatingError::AlreadySeated {
                player: host,
                table,
            });
        }
        self.tables.push(Table::new(host, game));
        Ok(self.tables.len() - 1)
    }

    pub(crate) fn seat(
        &mut self,
        player: PlayerId,
        table: usize,
        max_seats: usize,
    ) -> Result<(), SeatingError> {
        self.ensure_open()?;
        if let Some(current) = self.table_of(player) {
            return Err(SeatingError::AlreadySeated {
                player,
                table: current,
            });
        }
        let target = self
            .tables
            .get_mut(table)
            .ok_or(SeatingError::UnknownTable { table })?;
        if target.seats.len() >= max_seats {
            return Err(SeatingError::TableFull {
                table,
                capacity: max_seats,
            });
        }
        target.seats.push(player);
        Ok(())
    }

    /// Remove a guest from their table. Returns the table they left.
    pub(crate) fn unseat(&mut self, player: PlayerId) -> Result<usize, SeatingError> {
        self.ensure_open()?;
        let table = self.table_of(player).ok_or(SeatingError::NotSeated(player))?;
        let target = &mut self.tables[table];
        if target.host == player {
            return Err(SeatingError::HostCannotLeave { player, table });
        }
        target.seats.retain(|p| *p != player);
        Ok(table)
    }

    /// Remove a table and everyone at it. Its game counts as unplayed again.
    pub(crate) fn close_table(&mut self, table: usize) -> Result<Table, SeatingError> {
        self.ensure_open()?;
        if table >= self.tables.len() {
            return Err(SeatingError::UnknownTable { table });
        }
        Ok(self.tables.remove(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: PlayerId = PlayerId(1);
    const B: PlayerId = PlayerId(2);
    const C: PlayerId = PlayerId(3);

    #[test]
    fn new_round_is_empty_and_open() {
        let round = Round::new(0);
        assert_eq!(round.number(), 1);
        assert!(round.tables.is_empty());
        assert!(!round.completed);
        assert_eq!(round.seated_count(), 0);
    }

    #[test]
    fn open_table_seats_host() {
        let mut round = Round::new(0);
        let t = round.open_table(A, "Azul".into()).unwrap();
        assert_eq!(t, 0);
        assert_eq!(round.table_of(A), Some(0));
        assert!(round.hosts_game(A, "Azul"));
        assert!(!round.hosts_game(B, "Azul"));
    }

    #[test]
    fn host_cannot_open_second_table() {
        let mut round = Round::new(0);
        round.open_table(A, "Azul".into()).unwrap();
        let err = round.open_table(A, "Root".into()).unwrap_err();
        assert_eq!(err, SeatingError::AlreadySeated { player: A, table: 0 });
    }

    #[test]
    fn seat_respects_capacity() {
        let mut round = Round::new(0);
        round.open_table(A, "Azul".into()).unwrap();
        round.seat(B, 0, 2).unwrap();
        let err = round.seat(C, 0, 2).unwrap_err();
        assert_eq!(err, SeatingError::TableFull { table: 0, capacity: 2 });
        assert_eq!(round.seated_count(), 2);
    }

    #[test]
    fn seat_unknown_table() {
        let mut round = Round::new(0);
        let err = round.seat(B, 3, 4).unwrap_err();
        assert_eq!(err, SeatingError::UnknownTable { table: 3 });
        assert_eq!(err.to_string(), "table #4 does not exist");
    }

    #[test]
    fn unseat_guest_but_not_host() {
        let mut round = Round::new(0);
        round.open_table(A, "Azul".into()).unwrap();
        round.seat(B, 0, 4).unwrap();

        assert_eq!(round.unseat(B).unwrap(), 0);
        assert!(!round.is_seated(B));

        let err = round.unseat(A).unwrap_err();
        assert_eq!(err, SeatingError::HostCannotLeave { player: A, table: 0 });
        assert_eq!(round.unseat(C).unwrap_err(), SeatingError::NotSeated(C));
    }

    #[test]
    fn close_table_frees_everyone() {
        let mut round = Round::new(0);
        round.open_table(A, "Azul".into()).unwrap();
        round.seat(B, 0, 4).unwrap();

        let closed = round.close_table(0).unwrap();
        assert_eq!(closed.seats, vec![A, B]);
        assert!(round.tables.is_empty());
        assert!(!round.hosts_game(A, "Azul"));
    }

    #[test]
    fn completed_round_refuses_changes() {
        let mut round = Round::new(1);
        round.open_table(A, "Azul".into()).unwrap();
        round.completed = true;

        assert_eq!(
            round.seat(B, 0, 4).unwrap_err(),
            SeatingError::RoundClosed { round: 1 }
        );
        assert_eq!(
            round.close_table(0).unwrap_err(),
            SeatingError::RoundClosed { round: 1 }
        );
        assert_eq!(round.tables.len(), 1);
    }
}
