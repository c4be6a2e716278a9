//! Action execution pipeline.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. It
//! drives the transition phases, reports which sub-states changed and
//! guarantees that a failed action leaves no trace in the state.

mod errors;
mod transition;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

use crate::action::{Action, ActionOutput};
use crate::env::GameEnv;
use crate::state::{GameState, StateChanges};

/// Complete outcome of a successful action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outcome {
    /// Action-specific result (harvest value, new crop id, ...).
    pub output: ActionOutput,

    /// Sub-states that differ from before the action.
    pub changes: StateChanges,

    /// State nonce after the action was applied.
    pub nonce: u64,
}

/// Game engine that executes actions against a borrowed state.
///
/// All state mutations flow through the three-phase action pipeline:
/// pre_validate → apply → post_validate
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    /// Creates a new game engine with the given state.
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    /// Executes an action by routing it through its transition pipeline.
    ///
    /// On any phase failure the state is restored to its value before the
    /// call and the nonce is not advanced.
    pub fn execute(&mut self, env: GameEnv<'_>, action: &Action) -> Result<Outcome, ExecuteError> {
        let before = self.state.clone();

        let output = match transition::execute_transition(action, self.state, &env) {
            Ok(output) => output,
            Err(error) => {
                *self.state = before;
                return Err(ExecuteError::from_phase(action.name(), error));
            }
        };

        self.state.nonce += 1;

        Ok(Outcome {
            output,
            changes: StateChanges::between(&before, self.state),
            nonce: self.state.nonce,
        })
    }
}
