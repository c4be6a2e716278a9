//! Error types for the action execution pipeline.

use crate::action::ActionError;

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPhaseError {
    pub phase: TransitionPhase,
    pub error: ActionError,
}

impl TransitionPhaseError {
    pub fn new(phase: TransitionPhase, error: ActionError) -> Self {
        Self { phase, error }
    }
}

impl std::fmt::Display for TransitionPhaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl std::error::Error for TransitionPhaseError {}

/// Errors surfaced while executing an action through the game engine.
///
/// In both cases the state is left exactly as it was before the action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecuteError {
    /// A precondition did not hold; the mutation was ignored.
    #[error("{action} rejected: {error}")]
    Rejected {
        action: String,
        error: TransitionPhaseError,
    },

    /// The mutation broke a state invariant and was rolled back.
    #[error("{action} rolled back: {error}")]
    RolledBack {
        action: String,
        error: TransitionPhaseError,
    },
}

impl ExecuteError {
    pub(super) fn from_phase(action: &'static str, error: TransitionPhaseError) -> Self {
        let action = action.to_owned();
        match error.phase {
            TransitionPhase::PreValidate | TransitionPhase::Apply => {
                Self::Rejected { action, error }
            }
            TransitionPhase::PostValidate => Self::RolledBack { action, error },
        }
    }

    /// Whether this is an ordinary unmet precondition rather than a bug.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    pub fn phase_error(&self) -> &TransitionPhaseError {
        match self {
            Self::Rejected { error, .. } | Self::RolledBack { error, .. } => error,
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn rolled_back_error_survives_json() {
        let error = ExecuteError::from_phase(
            "water_crop",
            TransitionPhaseError::new(
                TransitionPhase::PostValidate,
                ActionError::InvariantViolated("crop crop_1 health above maximum".to_owned()),
            ),
        );

        let json = serde_json::to_string(&error).unwrap();
        let decoded: ExecuteError = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, error);
        assert!(!decoded.is_rejection());
    }
}
