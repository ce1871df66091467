// Session model: players and their picks, rounds and seating, stage machine.

pub mod player;
pub mod round;
pub mod stage;
pub mod state;

pub use player::{Player, PlayerId, PickError, PickToggle, MIN_PLAYERS, PICKS_PER_PLAYER};
pub use round::{Round, SeatingError, Table};
pub use stage::SessionStage;
pub use state::{
    all_players_seated, can_create_next_round, can_start_first_round, has_remaining_picks,
    remaining_picks, DraftSession, SeatingRules, SessionState, SetupError,
};
