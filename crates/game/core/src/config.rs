/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GameConfig {
    /// Hours a crop needs per growth stage.
    pub crop_growth_hours: u64,
    /// Hours after planting before an unhealthy crop can wither.
    pub crop_wither_hours: u64,
    /// Final growth stage ("ready").
    pub max_growth_stage: u8,
    /// Health restored by a single watering.
    pub water_amount: u8,
    pub max_crop_health: u8,
    /// Crops below this health wither once `crop_wither_hours` have passed.
    pub wither_health_threshold: u8,
    /// Points needed per village level.
    pub points_per_level: u32,
    /// Skill points granted per level-up, however many levels it skips.
    pub level_up_skill_points: u32,
    /// Cost of a skill level when the skill catalog does not define one.
    pub default_skill_cost: u32,
    pub max_daily_streak: u32,
}

impl GameConfig {
    // ===== point values awarded by lessons and quizzes =====
    pub const POINTS_PER_CORRECT_ANSWER: u32 = 10;
    pub const POINTS_PER_QUIZ_COMPLETION: u32 = 50;
    pub const POINTS_PER_LESSON_COMPLETION: u32 = 25;
    pub const DAILY_STREAK_BONUS: u32 = 5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CROP_GROWTH_HOURS: u64 = 24;
    pub const DEFAULT_CROP_WITHER_HOURS: u64 = 48;
    pub const DEFAULT_MAX_GROWTH_STAGE: u8 = 3;
    pub const DEFAULT_WATER_AMOUNT: u8 = 20;
    pub const DEFAULT_MAX_CROP_HEALTH: u8 = 100;
    pub const DEFAULT_WITHER_HEALTH_THRESHOLD: u8 = 50;
    pub const DEFAULT_POINTS_PER_LEVEL: u32 = 100;
    pub const DEFAULT_LEVEL_UP_SKILL_POINTS: u32 = 2;
    pub const DEFAULT_SKILL_COST: u32 = 1;
    pub const DEFAULT_MAX_DAILY_STREAK: u32 = 30;

    pub const fn new() -> Self {
        Self {
            crop_growth_hours: Self::DEFAULT_CROP_GROWTH_HOURS,
            crop_wither_hours: Self::DEFAULT_CROP_WITHER_HOURS,
            max_growth_stage: Self::DEFAULT_MAX_GROWTH_STAGE,
            water_amount: Self::DEFAULT_WATER_AMOUNT,
            max_crop_health: Self::DEFAULT_MAX_CROP_HEALTH,
            wither_health_threshold: Self::DEFAULT_WITHER_HEALTH_THRESHOLD,
            points_per_level: Self::DEFAULT_POINTS_PER_LEVEL,
            level_up_skill_points: Self::DEFAULT_LEVEL_UP_SKILL_POINTS,
            default_skill_cost: Self::DEFAULT_SKILL_COST,
            max_daily_streak: Self::DEFAULT_MAX_DAILY_STREAK,
        }
    }

    /// Village level reached with the given point total.
    pub const fn level_for_points(&self, points: u32) -> u32 {
        match points.checked_div(self.points_per_level) {
            Some(level) => level + 1,
            None => 1,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
