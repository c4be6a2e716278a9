//! Millisecond timestamps used by every time-dependent rule.

use std::fmt;

/// Wall-clock instant in milliseconds since the Unix epoch.
///
/// The engine never reads a clock itself; callers stamp actions with the
/// current time so that growth, streaks and redemptions replay identically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Self = Self(0);

    pub const SECOND_MS: u64 = 1_000;
    pub const HOUR_MS: u64 = 60 * 60 * Self::SECOND_MS;
    pub const DAY_MS: u64 = 24 * Self::HOUR_MS;

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, clamped to zero if the clock went backwards.
    pub const fn millis_since(self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Days since the Unix epoch, counted on UTC midnights.
    pub const fn day_number(self) -> u64 {
        self.0 / Self::DAY_MS
    }

    /// UTC midnights crossed since `earlier`; zero for the same calendar day
    /// or a clock that went backwards.
    pub const fn calendar_days_since(self, earlier: Timestamp) -> u64 {
        self.day_number().saturating_sub(earlier.day_number())
    }

    pub const fn plus_hours(self, hours: u64) -> Self {
        Self(self.0.saturating_add(hours.saturating_mul(Self::HOUR_MS)))
    }

    pub const fn plus_millis(self, millis: u64) -> Self {
        Self(self.0.saturating_add(millis))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_time_never_goes_negative() {
        let earlier = Timestamp::from_millis(10_000);
        let later = Timestamp::from_millis(5_000);

        assert_eq!(later.millis_since(earlier), 0);
        assert_eq!(earlier.millis_since(later), 5_000);
    }

    #[test]
    fn counts_calendar_days() {
        let late_evening = Timestamp::ZERO.plus_hours(23);

        assert_eq!(late_evening.plus_hours(1).calendar_days_since(late_evening), 1);
        assert_eq!(Timestamp::ZERO.plus_hours(23).calendar_days_since(Timestamp::ZERO), 0);
        assert_eq!(late_evening.plus_hours(48).calendar_days_since(late_evening), 2);
        assert_eq!(Timestamp::ZERO.calendar_days_since(late_evening.plus_hours(1)), 0);
    }
}
