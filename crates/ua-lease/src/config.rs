//! Arbiter configuration.
//!
//! Typically built with `ArbiterConfig::default()` and tweaked, or loaded
//! from JSON by the application crate (requires the `serde` feature).  Every
//! field has a default, so a partial file is enough.

use ua_core::Priority;

use crate::{LeaseError, LeaseResult};

/// Thresholds for the contention warning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContentionConfig {
    /// A requester whose window grant rate falls below this is flagged.
    pub min_grant_rate: f64,
    /// Windows with fewer requests than this are never flagged.
    pub min_requests: u64,
    /// Length of one reporting window in ticks.
    pub window_ticks: u64,
}

impl Default for ContentionConfig {
    fn default() -> Self {
        Self {
            min_grant_rate: 0.25,
            min_requests:   20,
            window_ticks:   224, // ~10 game seconds
        }
    }
}

/// Top-level arbiter configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArbiterConfig {
    /// Lease length used when a request does not name one, indexed by
    /// [`Priority::index`].
    pub default_durations: [u64; Priority::COUNT],

    /// Run the sweeper every N ticks.  1 = every tick; 20 trades a little
    /// reclamation latency for throughput.
    pub sweep_interval_ticks: u64,

    pub contention: ContentionConfig,
}

impl ArbiterConfig {
    /// Default lease length for `priority`.
    #[inline]
    pub fn duration_for(&self, priority: Priority) -> u64 {
        self.default_durations[priority.index()]
    }

    /// Builder-style override of one level's default duration.
    pub fn with_duration(mut self, priority: Priority, ticks: u64) -> Self {
        self.default_durations[priority.index()] = ticks;
        self
    }

    pub fn with_sweep_interval(mut self, ticks: u64) -> Self {
        self.sweep_interval_ticks = ticks;
        self
    }

    pub fn validate(&self) -> LeaseResult<()> {
        if let Some(p) = Priority::ALL.into_iter().find(|&p| self.duration_for(p) == 0) {
            return Err(LeaseError::Config(format!("default duration for {p} is zero")));
        }
        if self.sweep_interval_ticks == 0 {
            return Err(LeaseError::Config("sweep_interval_ticks must be at least 1".into()));
        }
        let c = &self.contention;
        if !(0.0..=1.0).contains(&c.min_grant_rate) {
            return Err(LeaseError::Config(format!(
                "min_grant_rate {} is outside [0, 1]",
                c.min_grant_rate
            )));
        }
        if c.window_ticks == 0 {
            return Err(LeaseError::Config("window_ticks must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        let mut default_durations = [0; Priority::COUNT];
        for p in Priority::ALL {
            default_durations[p.index()] = match p {
                Priority::Defense  => 44,
                Priority::Combat   => 110,
                Priority::Micro    => 50,
                Priority::Harass   => 88,
                Priority::Denial   => 66,
                Priority::Scouting => 150,
                Priority::Economy  => 300,
                Priority::Idle     => 22,
            };
        }
        Self {
            default_durations,
            sweep_interval_ticks: 1,
            contention: ContentionConfig::default(),
        }
    }
}
