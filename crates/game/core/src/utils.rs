//! Small presentation helpers shared by clients.

use crate::config::GameConfig;

/// Points needed to reach `level`.
pub const fn xp_required(level: u32) -> u32 {
    level.saturating_mul(GameConfig::DEFAULT_POINTS_PER_LEVEL)
}

/// Formats a duration as `m:ss`.
pub fn format_time_spent(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
