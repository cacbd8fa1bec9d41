//! `Authority`: an arbiter handle scoped to one module for one tick.
//!
//! The handle fixes the requester name, priority and tick, so a module can
//! only ever ask for units under its own identity.  When bound to a
//! [`UnitRoster`] it also refuses to lease units that no longer exist.

use ua_core::{Priority, Tick, UnitId};
use ua_lease::{AuthorityArbiter, Eviction, Lease};

use crate::UnitRoster;

pub struct Authority<'a> {
    arbiter:   &'a mut AuthorityArbiter,
    name:      &'a str,
    priority:  Priority,
    now:       Tick,
    roster:    Option<&'a UnitRoster>,
    evictions: Vec<Eviction>,
}

impl<'a> Authority<'a> {
    pub fn new(
        arbiter:  &'a mut AuthorityArbiter,
        name:     &'a str,
        priority: Priority,
        now:      Tick,
    ) -> Self {
        Self { arbiter, name, priority, now, roster: None, evictions: Vec::new() }
    }

    /// Only units alive in `roster` can be requested or reported as
    /// controllable.
    pub fn with_roster(mut self, roster: &'a UnitRoster) -> Self {
        self.roster = Some(roster);
        self
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn tick(&self) -> Tick {
        self.now
    }

    /// Read-only access to the whole arbiter.
    pub fn arbiter(&self) -> &AuthorityArbiter {
        self.arbiter
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Request `units` for the default duration of this module's priority.
    pub fn request(&mut self, units: &[UnitId]) -> Vec<UnitId> {
        self.request_inner(units, None)
    }

    pub fn request_for(&mut self, units: &[UnitId], duration_ticks: u64) -> Vec<UnitId> {
        self.request_inner(units, Some(duration_ticks))
    }

    fn request_inner(&mut self, units: &[UnitId], duration: Option<u64>) -> Vec<UnitId> {
        let alive: Vec<UnitId>;
        let units = match self.roster {
            Some(roster) if !units.iter().all(|&u| roster.is_alive(u)) => {
                alive = units.iter().copied().filter(|&u| roster.is_alive(u)).collect();
                log::debug!(
                    "{} {} asked for {} dead unit(s)",
                    self.now,
                    self.name,
                    units.len() - alive.len(),
                );
                &alive[..]
            }
            _ => units,
        };
        match self.arbiter.try_request(units, self.priority, self.name, self.now, duration) {
            Ok(grant) => {
                self.evictions.extend(grant.evictions);
                grant.granted
            }
            Err(e) => {
                log::warn!("{} request rejected: {e}", self.name);
                Vec::new()
            }
        }
    }

    pub fn release(&mut self, units: &[UnitId]) -> usize {
        self.arbiter.release(units, self.name)
    }

    pub fn release_all(&mut self) -> usize {
        self.arbiter.release_all(self.name)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn is_locked(&self, unit: UnitId) -> bool {
        self.arbiter.is_locked(unit, self.now)
    }

    pub fn lease_info(&self, unit: UnitId) -> Option<&Lease> {
        self.arbiter.lease_info(unit)
    }

    /// `true` if this module holds an unexpired lease on `unit`.
    pub fn holds(&self, unit: UnitId) -> bool {
        holds(self.arbiter, self.name, unit, self.now)
    }

    /// Units this module could act on right now at its own priority.
    pub fn filter_controllable(&self, units: &[UnitId]) -> Vec<UnitId> {
        let mut out = self.arbiter.filter_controllable(units, self.priority, self.name, self.now);
        out.retain(|&u| self.is_alive(u));
        out
    }

    pub fn filter_controllable_by<'e, T>(
        &self,
        entities: &'e [T],
        unit_of:  impl Fn(&T) -> UnitId,
    ) -> Vec<&'e T> {
        let mut out = self.arbiter.filter_controllable_by(
            entities,
            &unit_of,
            self.priority,
            self.name,
            self.now,
        );
        out.retain(|e| self.is_alive(unit_of(*e)));
        out
    }

    fn is_alive(&self, unit: UnitId) -> bool {
        self.roster.is_none_or(|r| r.is_alive(unit))
    }

    /// Units this module currently holds, ascending.
    pub fn held(&self) -> Vec<UnitId> {
        self.arbiter
            .leases_held_by(self.name)
            .into_iter()
            .filter(|l| l.is_locked_at(self.now))
            .map(|l| l.unit)
            .collect()
    }

    pub(crate) fn into_evictions(self) -> Vec<Eviction> {
        self.evictions
    }
}

/// Shared by [`Authority::holds`] and the driver's order gate.
pub(crate) fn holds(arbiter: &AuthorityArbiter, name: &str, unit: UnitId, now: Tick) -> bool {
    arbiter
        .lease_info(unit)
        .is_some_and(|l| l.is_held_by(name) && l.is_locked_at(now))
}
