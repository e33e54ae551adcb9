//! Deterministic day/night clock.
//!
//! Time advances one tick per simulation step, never from wall-clock time, so
//! replays see the same day boundaries.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Lowest daylight scalar, reached through the whole night.
pub const MIN_DAYLIGHT: f64 = 0.1;

/// Day counter and position within the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayClock {
    /// Current day, starting at 1.
    pub day: u32,
    /// Ticks elapsed in the current day.
    pub tick_in_day: u64,
    /// Ticks per in-game day.
    pub ticks_per_day: u64,
}

impl DayClock {
    /// Clock at midnight of day 1.
    pub fn new(ticks_per_day: u64) -> Self {
        Self {
            day: 1,
            tick_in_day: 0,
            ticks_per_day: ticks_per_day.max(1),
        }
    }

    /// Advance by one tick. Returns true when a new day begins.
    pub fn advance(&mut self) -> bool {
        self.tick_in_day += 1;
        if self.tick_in_day >= self.ticks_per_day {
            self.tick_in_day = 0;
            self.day = self.day.saturating_add(1);
            return true;
        }
        false
    }

    /// Advance by `ticks`, returning how many day boundaries were crossed.
    ///
    /// The day counter saturates at `u32::MAX`.
    pub fn advance_by(&mut self, ticks: u64) -> u32 {
        let per_day = u128::from(self.ticks_per_day);
        let total = u128::from(self.tick_in_day) + u128::from(ticks);
        let days = u32::try_from(total / per_day).unwrap_or(u32::MAX);
        // Remainder is below `ticks_per_day`, which is a u64.
        self.tick_in_day = (total % per_day) as u64;
        self.day = self.day.saturating_add(days);
        days
    }

    /// Jump to a fraction of the current day without changing the day.
    pub fn set_time_of_day(&mut self, fraction: f64) {
        let fraction = fraction.rem_euclid(1.0);
        let tick = (fraction * self.ticks_per_day as f64).floor() as u64;
        self.tick_in_day = tick.min(self.ticks_per_day - 1);
    }

    /// Current time of day as a fraction (0.0 = midnight, 0.5 = noon).
    pub fn time_of_day(&self) -> f64 {
        self.tick_in_day as f64 / self.ticks_per_day as f64
    }

    /// Sun elevation angle in radians (-π/2 to π/2).
    /// Returns 0.0 at sunrise/sunset, π/2 at noon, -π/2 at midnight.
    pub fn sun_elevation(&self) -> f64 {
        let angle = (self.time_of_day() - 0.25) * 2.0 * PI;
        angle.sin() * PI / 2.0
    }

    /// Light intensity scalar for the render collaborator, in `[0.1, 1.0]`.
    pub fn daylight(&self) -> f64 {
        let angle = (self.time_of_day() - 0.25) * 2.0 * PI;
        angle.sin().max(MIN_DAYLIGHT)
    }

    /// Hour and minute on a 24-hour clock.
    pub fn hours_minutes(&self) -> (u32, u32) {
        let t = self.time_of_day();
        let hours = (t * 24.0).floor() as u32;
        let minutes = ((t * 24.0 * 60.0) % 60.0).floor() as u32;
        (hours, minutes)
    }
}

impl Default for DayClock {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl fmt::Display for DayClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hours, minutes) = self.hours_minutes();
        write!(f, "Day {} - {:02}:{:02}", self.day, hours, minutes)
    }
}
