//! `UnitRoster`: the set of units that currently exist.
//!
//! The game layer calls [`spawn`](UnitRoster::spawn) and
//! [`despawn`](UnitRoster::despawn) between ticks.  Despawns are queued so
//! the driver can evict their leases at the start of the next tick, before
//! any decision module runs.

use std::collections::BTreeSet;

use ua_core::UnitId;

#[derive(Debug, Clone, Default)]
pub struct UnitRoster {
    alive:     BTreeSet<UnitId>,
    despawned: Vec<UnitId>,
}

impl UnitRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roster pre-populated with `units`.
    pub fn with_units(units: impl IntoIterator<Item = UnitId>) -> Self {
        Self { alive: units.into_iter().collect(), despawned: Vec::new() }
    }

    /// Returns `false` if `unit` was already alive.
    pub fn spawn(&mut self, unit: UnitId) -> bool {
        self.alive.insert(unit)
    }

    /// Returns `false` if `unit` was not alive.
    pub fn despawn(&mut self, unit: UnitId) -> bool {
        let removed = self.alive.remove(&unit);
        if removed {
            self.despawned.push(unit);
        }
        removed
    }

    #[inline]
    pub fn is_alive(&self, unit: UnitId) -> bool {
        self.alive.contains(&unit)
    }

    pub fn len(&self) -> usize {
        self.alive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    /// Live units in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.alive.iter().copied()
    }

    pub fn units(&self) -> Vec<UnitId> {
        self.iter().collect()
    }

    /// Despawns not yet collected by the driver.
    pub fn pending_despawns(&self) -> &[UnitId] {
        &self.despawned
    }

    /// Take the queued despawns.  A unit despawned and respawned before the
    /// driver collects it is dropped from the queue.
    pub fn take_despawned(&mut self) -> Vec<UnitId> {
        let mut dead = std::mem::take(&mut self.despawned);
        dead.retain(|u| !self.alive.contains(u));
        dead
    }
}
