//! `TickContext`: the per-module view of the current tick.

use ua_core::{SimRng, Tick, TickClock};

use crate::UnitRoster;

/// Handed to [`DecisionModule::on_tick`][crate::DecisionModule::on_tick].
///
/// Game state beyond the roster lives in the module itself or behind the
/// module's own handles; the driver only knows which units exist.
pub struct TickContext<'a> {
    pub tick:   Tick,
    pub clock:  &'a TickClock,
    pub roster: &'a UnitRoster,
    /// The calling module's own deterministic stream.
    pub rng:    &'a mut SimRng,
}

impl<'a> TickContext<'a> {
    pub fn new(
        tick:   Tick,
        clock:  &'a TickClock,
        roster: &'a UnitRoster,
        rng:    &'a mut SimRng,
    ) -> Self {
        Self { tick, clock, roster, rng }
    }

    /// Game time in seconds at this tick.
    pub fn elapsed_secs(&self) -> f64 {
        self.clock.elapsed_secs()
    }
}
