//! Farm transitions.
//!
//! Growth is driven by elapsed wall-clock time, but the engine never reads a
//! clock: [`UpdateCropGrowthAction`] carries the observation time.

use crate::env::GameEnv;
use crate::state::{Crop, GameState};
use crate::time::Timestamp;

use super::{ActionError, ActionOutput, ActionTransition};

/// Plants a new crop for a subject. Always succeeds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlantCropAction {
    pub subject_id: String,
    pub crop_type: String,
    pub planted_at: Timestamp,
}

impl PlantCropAction {
    pub fn new(
        subject_id: impl Into<String>,
        crop_type: impl Into<String>,
        planted_at: Timestamp,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            crop_type: crop_type.into(),
            planted_at,
        }
    }
}

impl ActionTransition for PlantCropAction {
    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<ActionOutput, ActionError> {
        let crop_id = state.allocate_id("crop");
        state.farm.crops.push(Crop::new(
            crop_id.clone(),
            self.subject_id.as_str(),
            self.crop_type.as_str(),
            self.planted_at,
        ));
        Ok(ActionOutput::CropPlanted { crop_id })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaterCropAction {
    pub crop_id: String,
}

impl WaterCropAction {
    pub fn new(crop_id: impl Into<String>) -> Self {
        Self {
            crop_id: crop_id.into(),
        }
    }
}

impl ActionTransition for WaterCropAction {
    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        living_crop(state, &self.crop_id).map(|_| ())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<ActionOutput, ActionError> {
        let config = env.config();
        let crop = state
            .crop_mut(&self.crop_id)
            .ok_or_else(|| ActionError::CropNotFound(self.crop_id.clone()))?;
        crop.health = crop
            .health
            .saturating_add(config.water_amount)
            .min(config.max_crop_health);
        Ok(ActionOutput::None)
    }

    fn post_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), ActionError> {
        check_crop_bounds(state, env)
    }
}

/// Explicitly lowers a crop's health, e.g. after a missed day.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecayCropAction {
    pub crop_id: String,
    pub amount: u8,
}

impl DecayCropAction {
    pub fn new(crop_id: impl Into<String>, amount: u8) -> Self {
        Self {
            crop_id: crop_id.into(),
            amount,
        }
    }
}

impl ActionTransition for DecayCropAction {
    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        living_crop(state, &self.crop_id).map(|_| ())
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<ActionOutput, ActionError> {
        let crop = state
            .crop_mut(&self.crop_id)
            .ok_or_else(|| ActionError::CropNotFound(self.crop_id.clone()))?;
        crop.health = crop.health.saturating_sub(self.amount);
        Ok(ActionOutput::None)
    }
}

/// Removes a crop and credits its harvest value to the point balance.
///
/// Withered crops are cleared for nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HarvestCropAction {
    pub crop_id: String,
}

impl HarvestCropAction {
    pub fn new(crop_id: impl Into<String>) -> Self {
        Self {
            crop_id: crop_id.into(),
        }
    }
}

impl ActionTransition for HarvestCropAction {
    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        state
            .crop(&self.crop_id)
            .map(|_| ())
            .ok_or_else(|| ActionError::CropNotFound(self.crop_id.clone()))
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<ActionOutput, ActionError> {
        let index = state
            .farm
            .crops
            .iter()
            .position(|crop| crop.id == self.crop_id)
            .ok_or_else(|| ActionError::CropNotFound(self.crop_id.clone()))?;
        let crop = state.farm.crops.remove(index);

        let value = if crop.is_withered {
            0
        } else {
            crop.harvest_value
        };
        state.rewards.points = state.rewards.points.saturating_add(value);

        Ok(ActionOutput::Harvested { value })
    }
}

/// Recomputes growth stage, withering and harvest value for every crop.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdateCropGrowthAction {
    pub now: Timestamp,
}

impl UpdateCropGrowthAction {
    pub fn new(now: Timestamp) -> Self {
        Self { now }
    }
}

impl ActionTransition for UpdateCropGrowthAction {
    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<ActionOutput, ActionError> {
        let config = env.config();
        let growth_ms = config.crop_growth_hours.saturating_mul(Timestamp::HOUR_MS);
        let wither_ms = config.crop_wither_hours.saturating_mul(Timestamp::HOUR_MS);

        let mut ready = 0;
        let mut withered = 0;
        for crop in &mut state.farm.crops {
            let elapsed = self.now.millis_since(crop.planted_at);

            // Strictly more than one growth period, so 24h exactly stays a seed.
            if elapsed > growth_ms && growth_ms > 0 {
                let periods = (elapsed / growth_ms).min(u64::from(config.max_growth_stage));
                crop.growth_stage = crop.growth_stage.max(periods as u8);
            }

            if elapsed > wither_ms && crop.health < config.wither_health_threshold {
                crop.is_withered = true;
            }

            if crop.is_withered {
                crop.harvest_value = 0;
                withered += 1;
            } else if crop.growth_stage >= config.max_growth_stage {
                crop.harvest_value = u32::from(crop.health / 10) * 10;
                ready += 1;
            }
        }

        Ok(ActionOutput::GrowthUpdated { ready, withered })
    }

    fn post_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), ActionError> {
        check_crop_bounds(state, env)
    }
}

fn living_crop<'s>(state: &'s GameState, crop_id: &str) -> Result<&'s Crop, ActionError> {
    let crop = state
        .crop(crop_id)
        .ok_or_else(|| ActionError::CropNotFound(crop_id.to_owned()))?;
    if crop.is_withered {
        return Err(ActionError::CropWithered(crop_id.to_owned()));
    }
    Ok(crop)
}

fn check_crop_bounds(state: &GameState, env: &GameEnv<'_>) -> Result<(), ActionError> {
    let config = env.config();
    for crop in &state.farm.crops {
        if crop.health > config.max_crop_health {
            return Err(ActionError::InvariantViolated(format!(
                "crop {} health above maximum",
                crop.id
            )));
        }
        if crop.growth_stage > config.max_growth_stage {
            return Err(ActionError::InvariantViolated(format!(
                "crop {} growth stage above maximum",
                crop.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planted(state: &mut GameState, at: Timestamp) -> String {
        let env = GameEnv::default();
        match PlantCropAction::new("math", "wheat", at)
            .apply(state, &env)
            .unwrap()
        {
            ActionOutput::CropPlanted { crop_id } => crop_id,
            other => panic!("unexpected output {other:?}"),
        }
    }

    fn grow(state: &mut GameState, now: Timestamp) {
        UpdateCropGrowthAction::new(now)
            .apply(state, &GameEnv::default())
            .unwrap();
    }

    #[test]
    fn healthy_crop_grows_without_withering() {
        let mut state = GameState::new();
        let id = planted(&mut state, Timestamp::ZERO);

        grow(&mut state, Timestamp::ZERO.plus_hours(25));
        assert_eq!(state.crop(&id).unwrap().growth_stage, 1);

        grow(&mut state, Timestamp::ZERO.plus_hours(50));
        let crop = state.crop(&id).unwrap();
        assert_eq!(crop.growth_stage, 2);
        assert!(!crop.is_withered);
    }

    #[test]
    fn growth_stage_never_decreases() {
        let mut state = GameState::new();
        let id = planted(&mut state, Timestamp::ZERO);

        let mut last = 0;
        for hours in [10, 30, 80, 20, 100, 5] {
            grow(&mut state, Timestamp::ZERO.plus_hours(hours));
            let stage = state.crop(&id).unwrap().growth_stage;
            assert!(stage >= last, "stage dropped from {last} to {stage}");
            assert!(stage <= 3);
            last = stage;
        }
        assert_eq!(last, 3);
    }

    #[test]
    fn ready_crop_is_valued_by_health() {
        let mut state = GameState::new();
        let id = planted(&mut state, Timestamp::ZERO);
        DecayCropAction::new(id.clone(), 33)
            .apply(&mut state, &GameEnv::default())
            .unwrap();

        grow(&mut state, Timestamp::ZERO.plus_hours(73));

        let crop = state.crop(&id).unwrap();
        assert_eq!(crop.growth_stage, 3);
        assert_eq!(crop.harvest_value, 60);
    }

    #[test]
    fn unhealthy_crop_withers_for_good() {
        let mut state = GameState::new();
        let id = planted(&mut state, Timestamp::ZERO);
        DecayCropAction::new(id.clone(), 60)
            .apply(&mut state, &GameEnv::default())
            .unwrap();

        grow(&mut state, Timestamp::ZERO.plus_hours(49));
        assert!(state.crop(&id).unwrap().is_withered);

        let water = WaterCropAction::new(id.clone());
        assert_eq!(
            water.pre_validate(&state, &GameEnv::default()),
            Err(ActionError::CropWithered(id.clone()))
        );

        grow(&mut state, Timestamp::ZERO.plus_hours(100));
        let crop = state.crop(&id).unwrap();
        assert!(crop.is_withered);
        assert_eq!(crop.harvest_value, 0);
    }

    #[test]
    fn watering_caps_health() {
        let mut state = GameState::new();
        let id = planted(&mut state, Timestamp::ZERO);
        let env = GameEnv::default();
        DecayCropAction::new(id.clone(), 10)
            .apply(&mut state, &env)
            .unwrap();

        for _ in 0..5 {
            WaterCropAction::new(id.clone())
                .apply(&mut state, &env)
                .unwrap();
            assert!(state.crop(&id).unwrap().health <= 100);
        }
        assert_eq!(state.crop(&id).unwrap().health, 100);
    }

    #[test]
    fn harvest_credits_value_and_removes_crop() {
        let mut state = GameState::new();
        let id = planted(&mut state, Timestamp::ZERO);
        grow(&mut state, Timestamp::ZERO.plus_hours(96));

        let output = HarvestCropAction::new(id.clone())
            .apply(&mut state, &GameEnv::default())
            .unwrap();

        assert_eq!(output, ActionOutput::Harvested { value: 100 });
        assert_eq!(state.rewards.points, 100);
        assert!(state.crop(&id).is_none());
    }

    #[test]
    fn harvesting_missing_crop_is_rejected() {
        let state = GameState::new();

        let result = HarvestCropAction::new("crop_9").pre_validate(&state, &GameEnv::default());

        assert_eq!(result, Err(ActionError::CropNotFound("crop_9".into())));
    }
}
