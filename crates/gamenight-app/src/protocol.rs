// Messages exchanged between the console front end and the app loop.

use gamenight_core::presentation::StageView;
use gamenight_core::session::{PlayerId, SessionStage};

/// A request from the front end. Table indices are zero-based here; the
/// console converts from the one-based numbers it displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    AddPlayer { name: String, icon: String },
    RemovePlayer(PlayerId),
    TogglePick { player: PlayerId, game: String },
    StartFirstRound,
    OpenTable { host: PlayerId, game: String },
    Seat { player: PlayerId, table: usize },
    Unseat(PlayerId),
    CloseTable(usize),
    CompleteRound,
    NextRound,
    Status,
    Help,
    Quit,
}

/// Per-player line of the session screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerLine {
    pub id: PlayerId,
    pub name: String,
    pub icon: String,
    pub picks: Vec<String>,
    /// Picks not yet put on a table.
    pub remaining: Vec<String>,
    /// One-based table number in the current round.
    pub table: Option<usize>,
}

/// Per-table line of the current round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLine {
    /// One-based.
    pub number: usize,
    pub game: String,
    pub host: String,
    pub seats: Vec<String>,
}

/// Everything the console needs to redraw the session screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSnapshot {
    pub session_name: String,
    pub stage: SessionStage,
    pub view: StageView,
    pub players: Vec<PlayerLine>,
    pub tables: Vec<TableLine>,
}

/// An update pushed from the app loop to the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdate {
    StateSnapshot(Box<AppSnapshot>),
    /// A command succeeded; short confirmation.
    Notice(String),
    /// A command was refused; reason for the user.
    Rejected(String),
    Help,
}
