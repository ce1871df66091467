// Stage presentation policy: maps a session snapshot to one display state.
//
// Pure and stateless; re-evaluate on every render.

use crate::session::{can_create_next_round, SessionStage, SessionState, MIN_PLAYERS};

/// What the session screen should show. Exactly one applies at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageView {
    /// Still in setup; the first round has not been started.
    SetupIncomplete {
        /// Players with exactly two picks.
        players_ready: usize,
        total_players: usize,
        /// Whether there are at least [`MIN_PLAYERS`] players.
        enough_players: bool,
    },
    RoundInProgress {
        round_number: usize,
    },
    /// Round finished and another can be created.
    RoundCompleteContinue {
        round_number: usize,
    },
    /// Round finished and no player has a pick left.
    RoundCompleteExhausted,
    SessionComplete,
}

/// A control the screen should offer for the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageAction {
    StartFirstRound { enabled: bool },
    StartRound { round_number: usize },
    FinishSession,
}

impl StageAction {
    pub fn label(&self) -> String {
        match self {
            StageAction::StartFirstRound { .. } => "Start First Round".to_string(),
            StageAction::StartRound { round_number } => format!("Start Round {round_number}"),
            StageAction::FinishSession => "Finish Session".to_string(),
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            StageAction::StartFirstRound { enabled } => *enabled,
            StageAction::StartRound { .. } | StageAction::FinishSession => true,
        }
    }
}

/// Evaluate the presentation policy. First match wins:
///
/// 1. `Setup` -> `SetupIncomplete`
/// 2. round stage, current round completed and another round possible
///    -> `RoundCompleteContinue`
/// 3. round stage, current round completed, picks exhausted
///    -> `RoundCompleteExhausted`
/// 4. round stage otherwise -> `RoundInProgress`
/// 5. `Complete` -> `SessionComplete`
pub fn stage_view(state: &SessionState) -> StageView {
    match state.stage {
        SessionStage::Setup => StageView::SetupIncomplete {
            players_ready: state.players_ready(),
            total_players: state.players.len(),
            enough_players: state.players.len() >= MIN_PLAYERS,
        },
        SessionStage::FirstRound | SessionStage::SubsequentRounds => {
            let round_number = state.current_round_index.map_or(1, |i| i + 1);
            let completed = state.current_round().is_some_and(|r| r.completed);
            match (completed, can_create_next_round(state)) {
                (true, true) => StageView::RoundCompleteContinue { round_number },
                (true, false) => StageView::RoundCompleteExhausted,
                (false, _) => StageView::RoundInProgress { round_number },
            }
        }
        SessionStage::Complete => StageView::SessionComplete,
    }
}

impl StageView {
    /// One-line heading for the session screen.
    pub fn headline(&self) -> String {
        match self {
            StageView::SetupIncomplete {
                players_ready,
                total_players,
                ..
            } => format!("Setup: {players_ready}/{total_players} players ready"),
            StageView::RoundInProgress { round_number } => {
                format!("Round {round_number} in Progress")
            }
            StageView::RoundCompleteContinue { round_number } => {
                format!("Round {round_number} Complete")
            }
            StageView::RoundCompleteExhausted => "All Picks Played".to_string(),
            StageView::SessionComplete => "Session Complete".to_string(),
        }
    }

    /// Whether setup is satisfied, i.e. the start control should be enabled.
    pub fn ready_to_start(&self) -> bool {
        match self {
            StageView::SetupIncomplete {
                players_ready,
                total_players,
                enough_players,
            } => *enough_players && players_ready == total_players,
            _ => false,
        }
    }

    /// The main control for this view, if any.
    pub fn primary_action(&self) -> Option<StageAction> {
        match self {
            StageView::SetupIncomplete { .. } => Some(StageAction::StartFirstRound {
                enabled: self.ready_to_start(),
            }),
            StageView::RoundInProgress { .. } => None,
            StageView::RoundCompleteContinue { round_number } => Some(StageAction::StartRound {
                round_number: round_number + 1,
            }),
            StageView::RoundCompleteExhausted => Some(StageAction::FinishSession),
            StageView::SessionComplete => None,
        }
    }
}
