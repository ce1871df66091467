// Coarse lifecycle phase of a drafting session.

use std::fmt;

/// The session stage. Starts at `Setup` and only ever moves forward:
///
/// ```text
/// Setup -> FirstRound -> SubsequentRounds (self-loop) -> Complete
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionStage {
    #[default]
    Setup,
    FirstRound,
    SubsequentRounds,
    Complete,
}

impl SessionStage {
    /// Whether a round is active (seating can happen) in this stage.
    pub fn is_round_stage(&self) -> bool {
        matches!(self, SessionStage::FirstRound | SessionStage::SubsequentRounds)
    }

    /// Position in the forward-only progression.
    pub fn ordinal(&self) -> u8 {
        match self {
            SessionStage::Setup => 0,
            SessionStage::FirstRound => 1,
            SessionStage::SubsequentRounds => 2,
            SessionStage::Complete => 3,
        }
    }
}

impl fmt::Display for SessionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStage::Setup => "SETUP",
            SessionStage::FirstRound => "FIRST_ROUND",
            SessionStage::SubsequentRounds => "SUBSEQUENT_ROUNDS",
            SessionStage::Complete => "COMPLETE",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_setup() {
        assert_eq!(SessionStage::default(), SessionStage::Setup);
    }

    #[test]
    fn round_stages() {
        assert!(!SessionStage::Setup.is_round_stage());
        assert!(SessionStage::FirstRound.is_round_stage());
        assert!(SessionStage::SubsequentRounds.is_round_stage());
        assert!(!SessionStage::Complete.is_round_stage());
    }

    #[test]
    fn ordinals_increase_along_progression() {
        let stages = [
            SessionStage::Setup,
            SessionStage::FirstRound,
            SessionStage::SubsequentRounds,
            SessionStage::Complete,
        ];
        for pair in stages.windows(2) {
            assert!(pair[0].ordinal() < pair[1].ordinal());
        }
    }

    #[test]
    fn display_uses_upper_snake_case() {
        assert_eq!(SessionStage::SubsequentRounds.to_string(), "SUBSEQUENT_ROUNDS");
    }
}
