//! Change tracking between two [`GameState`] values.
use bitflags::bitflags;

use super::GameState;

bitflags! {
    /// Tracks which sub-states of a [`GameState`] changed during an action.
    ///
    /// The persistence layer uses this to decide which snapshots to write.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StateChanges: u8 {
        const VILLAGE    = 1 << 0;
        const SKILLS     = 1 << 1;
        const FARM       = 1 << 2;
        const COMMUNITY  = 1 << 3;
        const MINI_GAMES = 1 << 4;
        const FESTIVALS  = 1 << 5;
        const AR         = 1 << 6;
        const REWARDS    = 1 << 7;
    }
}

impl StateChanges {
    /// Compares every sub-state of `before` and `after`.
    pub fn between(before: &GameState, after: &GameState) -> Self {
        let mut changes = Self::empty();
        changes.set(Self::VILLAGE, before.village != after.village);
        changes.set(Self::SKILLS, before.skills != after.skills);
        changes.set(Self::FARM, before.farm != after.farm);
        changes.set(Self::COMMUNITY, before.community != after.community);
        changes.set(Self::MINI_GAMES, before.mini_games != after.mini_games);
        changes.set(Self::FESTIVALS, before.festivals != after.festivals);
        changes.set(Self::AR, before.ar != after.ar);
        changes.set(Self::REWARDS, before.rewards != after.rewards);
        changes
    }

    /// Snapshot kinds to write for this change set.
    pub fn kinds(self) -> impl Iterator<Item = SnapshotKind> {
        use strum::IntoEnumIterator;

        SnapshotKind::iter().filter(move |kind| self.contains(kind.flag()))
    }
}

/// Category of a game-state snapshot, used in the `arise-game-<kind>` storage key.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SnapshotKind {
    Village,
    Skill,
    Farm,
    MiniGame,
    Festival,
    Community,
    Ar,
    Rewards,
}

impl SnapshotKind {
    pub const fn flag(self) -> StateChanges {
        match self {
            Self::Village => StateChanges::VILLAGE,
            Self::Skill => StateChanges::SKILLS,
            Self::Farm => StateChanges::FARM,
            Self::MiniGame => StateChanges::MINI_GAMES,
            Self::Festival => StateChanges::FESTIVALS,
            Self::Community => StateChanges::COMMUNITY,
            Self::Ar => StateChanges::AR,
            Self::Rewards => StateChanges::REWARDS,
        }
    }
}
