//! Driver configuration.

use ua_core::{Tick, TickClock};

use crate::{DriverError, DriverResult};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriverConfig {
    /// Ticks executed by [`TickDriver::run`][crate::TickDriver::run].
    pub total_ticks: u64,

    /// Close contention windows as they elapse.  The window length is
    /// `ArbiterConfig::contention.window_ticks`.
    pub report_contention: bool,

    /// Master seed; each module gets its own child stream.
    pub seed: u64,

    pub ticks_per_sec: f64,
}

impl DriverConfig {
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    pub fn make_clock(&self) -> TickClock {
        TickClock::new(self.ticks_per_sec)
    }

    pub fn validate(&self) -> DriverResult<()> {
        if !(self.ticks_per_sec.is_finite() && self.ticks_per_sec > 0.0) {
            return Err(DriverError::Config(format!(
                "ticks_per_sec must be positive, got {}",
                self.ticks_per_sec
            )));
        }
        Ok(())
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            total_ticks:           22_400, // ~16 game minutes
            report_contention:     true,
            seed:                  42,
            ticks_per_sec:         TickClock::DEFAULT_TICKS_PER_SEC,
        }
    }
}
