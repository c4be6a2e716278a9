//! Well-known storage keys.

use arise_core::SnapshotKind;

/// Pending offline action queue record.
pub const OFFLINE_PROGRESS: &str = "arise-offline-progress";

/// Actions dropped after exhausting their retries.
pub const DEAD_LETTERS: &str = "arise-offline-dead-letters";

/// Full game state restored at start-up.
pub const GAME_STATE: &str = "arise-game-state";

/// Downloaded lessons keyed by lesson id.
pub const LESSONS: &str = "arise-lessons";

pub const LANGUAGE: &str = "arise-language";
pub const USER_ID: &str = "arise-user-id";
pub const AUTH_TOKEN: &str = "arise-auth-token";

/// User id reported when none has been stored.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Snapshot history of one sub-state.
pub fn snapshots(kind: SnapshotKind) -> String {
    format!("arise-game-{kind}")
}

/// Downloaded asset bundle of one mini-game type.
pub fn game_assets(game_type: &str) -> String {
    format!("arise-assets-{game_type}")
}
