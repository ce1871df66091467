// Session state store: players, rounds, current round, stage.
//
// `SessionState` is a plain snapshot; the predicates below are free functions
// over it so they can be evaluated against any snapshot. `DraftSession` owns
// the one mutable copy and is the only way to change it. Stage transitions
// (`start_first_round`, `create_new_round`, `complete_current_round`) are
// guarded and report whether they applied; a failed guard is a no-op, never
// an error.

use thiserror::Error;
use tracing::{debug, info};

use super::player::{PickError, PickToggle, Player, PlayerId, MIN_PLAYERS};
use super::round::{Round, SeatingError, Table};
use super::stage::SessionStage;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("players and picks can only change during setup (stage is {stage})")]
    NotInSetup { stage: SessionStage },

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("player name must not be blank")]
    BlankName,

    #[error(transparent)]
    Pick(#[from] PickError),
}

/// Table limits applied while seating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatingRules {
    pub max_seats_per_table: usize,
}

impl Default for SeatingRules {
    fn default() -> Self {
        SeatingRules {
            max_seats_per_table: 4,
        }
    }
}

/// Snapshot of everything the session tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub players: Vec<Player>,
    /// Rounds in creation order. Never shrinks.
    pub rounds: Vec<Round>,
    /// Index into `rounds`; `None` until the first round starts.
    pub current_round_index: Option<usize>,
    pub stage: SessionStage,
}

impl SessionState {
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.current_round_index.and_then(|i| self.rounds.get(i))
    }

    /// Number of players with exactly the required number of picks.
    pub fn players_ready(&self) -> usize {
        self.players.iter().filter(|p| p.has_full_picks()).count()
    }

    /// Whether `player`'s `game` has been put on a table in any round.
    pub fn is_pick_used(&self, player: PlayerId, game: &str) -> bool {
        self.rounds.iter().any(|r| r.hosts_game(player, game))
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// True iff the session is in setup, has at least [`MIN_PLAYERS`] players,
/// and every player has exactly two picks.
pub fn can_start_first_round(state: &SessionState) -> bool {
    state.stage == SessionStage::Setup
        && state.players.len() >= MIN_PLAYERS
        && state.players.iter().all(Player::has_full_picks)
}

/// The picks of `player` that no round has put on a table yet.
pub fn remaining_picks<'a>(state: &SessionState, player: &'a Player) -> Vec<&'a str> {
    player
        .picks
        .iter()
        .filter(|game| !state.is_pick_used(player.id, game))
        .map(String::as_str)
        .collect()
}

/// Whether any player still has an unplayed pick.
pub fn has_remaining_picks(state: &SessionState) -> bool {
    state
        .players
        .iter()
        .any(|p| !remaining_picks(state, p).is_empty())
}

/// Whether every player is seated at a table in the current round.
pub fn all_players_seated(state: &SessionState) -> bool {
    match state.current_round() {
        Some(round) => state.players.iter().all(|p| round.is_seated(p.id)),
        None => false,
    }
}

/// True iff the current round exists and is completed, and some player
/// still has an unplayed pick.
pub fn can_create_next_round(state: &SessionState) -> bool {
    match state.current_round() {
        Some(round) => round.completed && has_remaining_picks(state),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// DraftSession
// ---------------------------------------------------------------------------

/// The single owner of a session's state.
#[derive(Debug, Clone)]
pub struct DraftSession {
    id: String,
    rules: SeatingRules,
    state: SessionState,
    next_player_id: u32,
}

impl DraftSession {
    pub fn new(id: impl Into<String>, rules: SeatingRules) -> Self {
        DraftSession {
            id: id.into(),
            rules,
            state: SessionState::default(),
            next_player_id: 1,
        }
    }

    /// Generate a session ID from the current UTC time, e.g.
    /// `session_20261019_201530_042`.
    pub fn generate_session_id() -> String {
        let now = chrono::Utc::now();
        now.format("session_%Y%m%d_%H%M%S_%3f").to_string()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rules(&self) -> SeatingRules {
        self.rules
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn stage(&self) -> SessionStage {
        self.state.stage
    }

    // --- Setup ---

    fn ensure_setup(&self) -> Result<(), SetupError> {
        if self.state.stage != SessionStage::Setup {
            return Err(SetupError::NotInSetup {
                stage: self.state.stage,
            });
        }
        Ok(())
    }

    fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, SetupError> {
        self.state
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(SetupError::UnknownPlayer(id))
    }

    pub fn add_player(&mut self, name: &str, icon: &str) -> Result<PlayerId, SetupError> {
        self.ensure_setup()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(SetupError::BlankName);
        }

        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;
        self.state.players.push(Player::new(id, name, icon.trim()));
        info!(session = %self.id, player = %id, "Added player {}", name);
        Ok(id)
    }

    pub fn remove_player(&mut self, id: PlayerId) -> Result<Player, SetupError> {
        self.ensure_setup()?;
        let pos = self
            .state
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(SetupError::UnknownPlayer(id))?;
        let removed = self.state.players.remove(pos);
        info!(session = %self.id, player = %id, "Removed player {}", removed.name);
        Ok(removed)
    }

    pub fn toggle_pick(&mut self, id: PlayerId, game: &str) -> Result<PickToggle, SetupError> {
        self.ensure_setup()?;
        let player = self.player_mut(id)?;
        let toggle = player.toggle_pick(game)?;
        debug!(player = %id, ?toggle, picks = ?player.picks, "Pick toggled");
        Ok(toggle)
    }

    pub fn set_picks<I, S>(&mut self, id: PlayerId, games: I) -> Result<(), SetupError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ensure_setup()?;
        let player = self.player_mut(id)?;
        player.set_picks(games)?;
        debug!(player = %id, picks = ?player.picks, "Picks replaced");
        Ok(())
    }

    // --- Stage transitions ---

    pub fn can_start_first_round(&self) -> bool {
        can_start_first_round(&self.state)
    }

    pub fn can_create_next_round(&self) -> bool {
        can_create_next_round(&self.state)
    }

    /// Create round 1 and enter `FirstRound`. No-op unless
    /// [`can_start_first_round`] holds. Returns whether it applied.
    pub fn start_first_round(&mut self) -> bool {
        if !self.can_start_first_round() {
            debug!(session = %self.id, "start_first_round ignored: not ready");
            return false;
        }

        self.state.rounds.push(Round::new(0));
        self.state.current_round_index = Some(0);
        self.state.stage = SessionStage::FirstRound;
        info!(
            session = %self.id,
            players = self.state.players.len(),
            "Session started: SETUP -> FIRST_ROUND"
        );
        true
    }

    /// Advance past a completed round.
    ///
    /// Applies only in `FirstRound`/`SubsequentRounds` with the current round
    /// completed. If any pick is still unplayed, appends the next round and
    /// enters `SubsequentRounds`; otherwise enters `Complete` without
    /// appending. Returns whether anything changed.
    pub fn create_new_round(&mut self) -> bool {
        if !self.state.stage.is_round_stage() {
            debug!(session = %self.id, stage = %self.state.stage, "create_new_round ignored: no active round");
            return false;
        }
        let Some(index) = self.state.current_round_index else {
            return false;
        };
        if !self.state.rounds.get(index).is_some_and(|r| r.completed) {
            debug!(session = %self.id, round = index + 1, "create_new_round ignored: round not complete");
            return false;
        }

        let from = self.state.stage;
        if !has_remaining_picks(&self.state) {
            self.state.stage = SessionStage::Complete;
            info!(session = %self.id, rounds = self.state.rounds.len(), "All picks played: {} -> COMPLETE", from);
            return true;
        }

        let next = index + 1;
        self.state.rounds.push(Round::new(next));
        self.state.current_round_index = Some(next);
        self.state.stage = SessionStage::SubsequentRounds;
        info!(session = %self.id, round = next + 1, "Round created: {} -> SUBSEQUENT_ROUNDS", from);
        true
    }

    /// Close the current round once everyone is seated. No-op otherwise.
    pub fn complete_current_round(&mut self) -> bool {
        if !self.state.stage.is_round_stage() || !all_players_seated(&self.state) {
            return false;
        }
        let Some(round) = self
            .state
            .current_round_index
            .and_then(|i| self.state.rounds.get_mut(i))
        else {
            return false;
        };
        if round.completed {
            return false;
        }

        round.completed = true;
        info!(
            session = %self.id,
            round = round.number(),
            tables = round.tables.len(),
            seated = round.seated_count(),
            "Round complete"
        );
        true
    }

    // --- Seating ---

    fn active_round_mut(&mut self) -> Result<&mut Round, SeatingError> {
        if !self.state.stage.is_round_stage() {
            return Err(SeatingError::NoActiveRound);
        }
        self.state
            .current_round_index
            .and_then(|i| self.state.rounds.get_mut(i))
            .ok_or(SeatingError::NoActiveRound)
    }

    fn ensure_player(&self, id: PlayerId) -> Result<&Player, SeatingError> {
        self.state.player(id).ok_or(SeatingError::UnknownPlayer(id))
    }

    /// Put one of `host`'s unplayed picks on a new table, seating the host.
    /// Returns the new table's index.
    pub fn open_table(&mut self, host: PlayerId, game: &str) -> Result<usize, SeatingError> {
        if !self.state.stage.is_round_stage() {
            return Err(SeatingError::NoActiveRound);
        }
        let game = game.trim().to_string();
        let player = self.ensure_player(host)?;
        if !player.has_pick(&game) {
            return Err(SeatingError::NotAPick { player: host, game });
        }
        if self.state.is_pick_used(host, &game) {
            return Err(SeatingError::PickAlreadyPlayed { player: host, game });
        }

        let round = self.active_round_mut()?;
        let table = round.open_table(host, game.clone())?;
        debug!(round = round.number(), table = table + 1, host = %host, "Opened table for {}", game);
        Ok(table)
    }

    pub fn seat_player(&mut self, player: PlayerId, table: usize) -> Result<(), SeatingError> {
        self.ensure_player(player)?;
        let max_seats = self.rules.max_seats_per_table;
        let round = self.active_round_mut()?;
        round.seat(player, table, max_seats)?;
        debug!(round = round.number(), table = table + 1, player = %player, "Seated player");
        Ok(())
    }

    /// Remove a guest from their table. Returns the table index they left.
    pub fn unseat_player(&mut self, player: PlayerId) -> Result<usize, SeatingError> {
        self.ensure_player(player)?;
        let round = self.active_round_mut()?;
        let table = round.unseat(player)?;
        debug!(round = round.number(), table = table + 1, player = %player, "Unseated player");
        Ok(table)
    }

    /// Remove a table; its game becomes unplayed again.
    pub fn close_table(&mut self, table: usize) -> Result<Table, SeatingError> {
        let round = self.active_round_mut()?;
        let closed = round.close_table(table)?;
        debug!(round = round.number(), table = table + 1, "Closed table for {}", closed.game);
        Ok(closed)
    }
}
