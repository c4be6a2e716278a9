//! Daily farm: one crop per studied subject, grown by coming back every day.

use crate::time::Timestamp;

/// Farm progress and the crops currently planted.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FarmState {
    pub level: u32,
    pub crops: Vec<Crop>,
    pub daily_streak: u32,
    pub last_active_date: Timestamp,
}

impl Default for FarmState {
    fn default() -> Self {
        Self {
            level: 1,
            crops: Vec::new(),
            daily_streak: 0,
            last_active_date: Timestamp::ZERO,
        }
    }
}

/// A planted crop.
///
/// `growth_stage` only increases, `health` only changes through watering or
/// explicit decay, and `is_withered` never goes back to `false`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Crop {
    pub id: String,
    pub subject_id: String,
    pub crop_type: String,
    pub planted_at: Timestamp,
    /// 0 (seed) ..= 3 (ready).
    pub growth_stage: u8,
    /// 0 ..= 100.
    pub health: u8,
    pub is_withered: bool,
    /// Points credited on harvest; non-zero only once fully grown.
    pub harvest_value: u32,
}

impl Crop {
    pub const INITIAL_HEALTH: u8 = 100;

    pub fn new(
        id: String,
        subject_id: impl Into<String>,
        crop_type: impl Into<String>,
        planted_at: Timestamp,
    ) -> Self {
        Self {
            id,
            subject_id: subject_id.into(),
            crop_type: crop_type.into(),
            planted_at,
            growth_stage: 0,
            health: Self::INITIAL_HEALTH,
            is_withered: false,
            harvest_value: 0,
        }
    }

    pub fn stage(&self) -> CropStage {
        CropStage::from_stage(self.growth_stage)
    }
}

/// Display name of a growth stage.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum CropStage {
    Seed,
    Sprout,
    Growing,
    Ready,
}

impl CropStage {
    pub fn from_stage(stage: u8) -> Self {
        match stage {
            0 => Self::Seed,
            1 => Self::Sprout,
            2 => Self::Growing,
            _ => Self::Ready,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_crop_is_a_healthy_seed() {
        let crop = Crop::new("crop_1".into(), "math", "wheat", Timestamp::ZERO);

        assert_eq!(crop.stage(), CropStage::Seed);
        assert_eq!(crop.health, 100);
        assert_eq!(crop.harvest_value, 0);
        assert!(!crop.is_withered);
    }

    #[test]
    fn stage_names() {
        assert_eq!(CropStage::from_stage(1).to_string(), "sprout");
        assert_eq!(CropStage::from_stage(3).as_ref(), "ready");
        assert_eq!(CropStage::from_stage(9), CropStage::Ready);
    }
}
