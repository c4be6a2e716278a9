use crate::env::GameEnv;
use crate::state::GameState;

use super::{ActionError, ActionOutput};

/// Defines how a concrete action variant mutates game state.
///
/// Implementors can override the validation hooks to surface pre- and
/// post-conditions that must hold around the state mutation. Hooks receive
/// read-only rule data via [`GameEnv`] and must stay side-effect free.
pub trait ActionTransition {
    /// Validates pre-conditions using the state **before** mutation.
    ///
    /// A failure here is an ignored mutation: the state is left untouched.
    fn pre_validate(&self, _state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        Ok(())
    }

    /// Applies the action by mutating the game state directly. Implementations
    /// may assume that `pre_validate` has already run successfully.
    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<ActionOutput, ActionError>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, _state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        Ok(())
    }
}
