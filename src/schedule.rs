//! Time-of-day auto-switch policy.
//!
//! When the stored preference is [`ThemeMode::System`](crate::ThemeMode::System),
//! the manager consults the wall clock once at startup: hours inside the
//! [`DarkHours`] window resolve to dark, everything else to light.

use chrono::{Local, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ThemeError;
use crate::mode::ColorMode;

/// Window of local hours during which the system mode resolves to dark.
///
/// `start` is inclusive and `end` exclusive. A window with `start > end`
/// wraps past midnight (the default 18..6 covers 18:00 through 05:59).
/// `start == end` is an empty window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DarkHours {
    pub start: u32,
    pub end: u32,
}

impl DarkHours {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Returns true if `hour` falls inside the dark window.
    pub fn contains(&self, hour: u32) -> bool {
        if self.start > self.end {
            hour >= self.start || hour < self.end
        } else {
            hour >= self.start && hour < self.end
        }
    }

    /// Resolves the color mode for the given local hour.
    pub fn resolve(&self, hour: u32) -> ColorMode {
        ColorMode::from_dark(self.contains(hour))
    }

    /// Checks that both bounds are valid hours of the day.
    pub fn validate(&self) -> Result<(), ThemeError> {
        if self.start > 23 || self.end > 23 {
            return Err(ThemeError::InvalidConfig(format!(
                "dark hours {}..{} must be within 0..=23",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

impl Default for DarkHours {
    fn default() -> Self {
        Self::new(18, 6)
    }
}

/// Source of the current local hour.
pub trait Clock {
    /// Local wall-clock hour in `0..24`.
    fn local_hour(&self) -> u32;
}

/// Reads the host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn local_hour(&self) -> u32 {
        Local::now().hour()
    }
}

/// A clock pinned to one hour. Useful for tests and for the CLI's `--hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn local_hour(&self) -> u32 {
        self.0
    }
}
