//! `AuthorityArbiter`: grants, renews, releases and sweeps unit leases.
//!
//! The arbiter owns the [`LeaseRegistry`] and the [`Diagnostics`] counters.
//! It is an ordinary value: construct one per session and hand it (or a
//! borrow of it) to whatever drives the decision modules.  Every operation
//! is synchronous and O(1) per unit, except the sweeper which is O(due).
//!
//! # Sequential resolution
//!
//! Units are resolved one at a time in call order, each against the registry
//! state left by all earlier resolutions, including earlier units of the
//! same batch and earlier calls in the same tick.  There is no batched
//! "best request wins" pass.

use std::sync::Arc;

use ua_core::{Priority, Tick, UnitId};

use crate::registry::UnitSet;
use crate::{
    resolve, ArbiterConfig, ContentionReport, Diagnostics, Lease, LeaseError, LeaseRegistry,
    LeaseResult, RequesterStats, Resolution, Statistics,
};

/// A lease taken from one module by a more urgent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eviction {
    pub unit:              UnitId,
    pub previous_holder:   Arc<str>,
    pub previous_priority: Priority,
}

/// Detailed outcome of one request call.
///
/// `granted` and `denied` partition the de-duplicated input, in first
/// occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grant {
    pub granted:   Vec<UnitId>,
    pub denied:    Vec<UnitId>,
    /// Subset of `granted` that was taken from another holder.
    pub evictions: Vec<Eviction>,
}

impl Grant {
    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }
}

/// The arbitration engine.
#[derive(Debug)]
pub struct AuthorityArbiter {
    config:      ArbiterConfig,
    registry:    LeaseRegistry,
    diagnostics: Diagnostics,
    last_sweep:  Option<Tick>,
}

impl AuthorityArbiter {
    /// Build an arbiter after validating `config`.
    pub fn new(config: ArbiterConfig) -> LeaseResult<Self> {
        config.validate()?;
        Ok(Self {
            diagnostics: Diagnostics::new(config.contention.clone()),
            config,
            registry:    LeaseRegistry::new(),
            last_sweep:  None,
        })
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    pub fn registry(&self) -> &LeaseRegistry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Number of leases currently stored (expired-but-unswept included).
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Request authority over `units` with the default duration for
    /// `priority`.  Returns the granted subset.
    pub fn request(
        &mut self,
        units:     &[UnitId],
        priority:  Priority,
        requester: &str,
        now:       Tick,
    ) -> Vec<UnitId> {
        self.request_inner(units, priority, requester, now, None)
    }

    /// Like [`request`](Self::request) with an explicit lease length.
    pub fn request_for(
        &mut self,
        units:          &[UnitId],
        priority:       Priority,
        requester:      &str,
        now:            Tick,
        duration_ticks: u64,
    ) -> Vec<UnitId> {
        self.request_inner(units, priority, requester, now, Some(duration_ticks))
    }

    fn request_inner(
        &mut self,
        units:     &[UnitId],
        priority:  Priority,
        requester: &str,
        now:       Tick,
        duration:  Option<u64>,
    ) -> Vec<UnitId> {
        match self.try_request(units, priority, requester, now, duration) {
            Ok(grant) => grant.granted,
            Err(e) => {
                log::warn!("authority request for {} unit(s) rejected: {e}", units.len());
                Vec::new()
            }
        }
    }

    /// Request authority and report the full outcome.
    ///
    /// Malformed calls (empty requester, zero duration, a request at
    /// `Tick::MAX` where no lease could outlive its grant) return an error
    /// and touch neither the registry nor the counters.  An empty `units` slice
    /// is a no-op that returns an empty grant.
    pub fn try_request(
        &mut self,
        units:     &[UnitId],
        priority:  Priority,
        requester: &str,
        now:       Tick,
        duration:  Option<u64>,
    ) -> LeaseResult<Grant> {
        if units.is_empty() {
            return Ok(Grant::default());
        }
        if requester.is_empty() {
            return Err(LeaseError::EmptyRequester);
        }
        let duration = duration.unwrap_or_else(|| self.config.duration_for(priority));
        if duration == 0 {
            return Err(LeaseError::ZeroDuration { requester: requester.to_owned() });
        }
        if now == Tick::MAX {
            return Err(LeaseError::TickOverflow { now });
        }

        let holder: Arc<str> = Arc::from(requester);
        let mut seen = UnitSet::default();
        let mut grant = Grant::default();

        for &unit in units {
            if !seen.insert(unit) {
                continue;
            }
            let resolution = resolve(self.registry.get(unit), priority, requester, now);
            log::trace!("{now} {requester} ({priority}) → {unit}: {resolution:?}");
            self.diagnostics.record(&holder, &resolution);

            match resolution {
                Resolution::GrantNew => {
                    self.registry
                        .insert(Lease::new(unit, priority, Arc::clone(&holder), now, duration));
                    grant.granted.push(unit);
                }
                Resolution::GrantRenew => {
                    self.registry.renew(unit, now, duration);
                    grant.granted.push(unit);
                }
                Resolution::GrantPreempt { previous_holder, previous_priority } => {
                    log::debug!(
                        "{now} {requester} ({priority}) preempted {unit} from \
                         {previous_holder} ({previous_priority})"
                    );
                    self.diagnostics.record_eviction(&previous_holder);
                    self.registry
                        .insert(Lease::new(unit, priority, Arc::clone(&holder), now, duration));
                    grant.granted.push(unit);
                    grant.evictions.push(Eviction { unit, previous_holder, previous_priority });
                }
                Resolution::Deny { .. } => grant.denied.push(unit),
            }
        }
        Ok(grant)
    }

    /// Give back every unit in `units` that `requester` holds.  Units held
    /// by anyone else are left alone.  Returns the number released.
    pub fn release(&mut self, units: &[UnitId], requester: &str) -> usize {
        let released = units
            .iter()
            .filter(|&&u| self.registry.remove_if_held(u, requester).is_some())
            .count();
        if released > 0 {
            let holder: Arc<str> = Arc::from(requester);
            self.diagnostics.record_releases(&holder, released as u64);
        }
        released
    }

    /// Give back every unit `requester` holds (module shutdown).
    pub fn release_all(&mut self, requester: &str) -> usize {
        let dropped = self.registry.drain_where(|l| l.is_held_by(requester));
        if !dropped.is_empty() {
            let holder: Arc<str> = Arc::from(requester);
            self.diagnostics.record_releases(&holder, dropped.len() as u64);
        }
        dropped.len()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `true` while a lease exists for `unit` and `now <= expires_tick`.
    ///
    /// Pure read: expired leases are never dropped here, only by the
    /// sweeper or by a request that claims the unit.
    pub fn is_locked(&self, unit: UnitId, now: Tick) -> bool {
        self.registry.get(unit).is_some_and(|l| l.is_locked_at(now))
    }

    /// The stored lease for `unit`, if any.  May be expired-but-unswept.
    pub fn lease_info(&self, unit: UnitId) -> Option<&Lease> {
        self.registry.get(unit)
    }

    /// The subsequence of `units` that `requester` holds or would win at
    /// `priority`.  Never writes.
    pub fn filter_controllable(
        &self,
        units:     &[UnitId],
        priority:  Priority,
        requester: &str,
        now:       Tick,
    ) -> Vec<UnitId> {
        self.filter_controllable_by(units, |&u| u, priority, requester, now)
            .into_iter()
            .copied()
            .collect()
    }

    /// [`filter_controllable`](Self::filter_controllable) over arbitrary
    /// entity records, keyed by `unit_of`.
    pub fn filter_controllable_by<'a, T>(
        &self,
        entities:  &'a [T],
        unit_of:   impl Fn(&T) -> UnitId,
        priority:  Priority,
        requester: &str,
        now:       Tick,
    ) -> Vec<&'a T> {
        if requester.is_empty() {
            return Vec::new();
        }
        entities
            .iter()
            .filter(|e| {
                resolve(self.registry.get(unit_of(*e)), priority, requester, now).is_granted()
            })
            .collect()
    }

    /// Every lease held by `requester`, sorted by unit.
    pub fn leases_held_by(&self, requester: &str) -> Vec<Lease> {
        let mut held: Vec<Lease> = self
            .registry
            .iter()
            .filter(|l| l.is_held_by(requester))
            .cloned()
            .collect();
        held.sort_by_key(|l| l.unit);
        held
    }

    // ── Sweeper ───────────────────────────────────────────────────────────

    /// Remove every lease with `expires_tick <= now`.  Idempotent.
    pub fn cleanup_expired(&mut self, now: Tick) -> usize {
        let removed = self.registry.sweep(now).len();
        self.last_sweep = Some(now);
        if removed > 0 {
            log::debug!("{now} swept {removed} expired lease(s), {} active", self.registry.len());
        }
        removed
    }

    /// Sweep only if `sweep_interval_ticks` have passed since the last sweep.
    pub fn maybe_cleanup(&mut self, now: Tick) -> Option<usize> {
        let due = match self.last_sweep {
            None => true,
            Some(last) => now.since(last) >= self.config.sweep_interval_ticks,
        };
        due.then(|| self.cleanup_expired(now))
    }

    /// Drop leases on units for which `is_alive` returns `false`, regardless
    /// of holder or expiry.
    pub fn reap_dead(&mut self, is_alive: impl Fn(UnitId) -> bool) -> usize {
        let reaped = self.registry.drain_where(|l| !is_alive(l.unit)).len();
        if reaped > 0 {
            log::debug!("reaped {reaped} lease(s) on dead units");
        }
        reaped
    }

    /// Drop the leases on `units` (units known to have died).
    pub fn evict_units(&mut self, units: &[UnitId]) -> usize {
        let evicted = units.iter().filter(|&&u| self.registry.remove(u).is_some()).count();
        if evicted > 0 {
            log::debug!("evicted {evicted} lease(s) on despawned units");
        }
        evicted
    }

    // ── Diagnostics ───────────────────────────────────────────────────────

    /// Lifetime counters for every requester seen this session.
    pub fn statistics(&self) -> Statistics {
        self.diagnostics.snapshot()
    }

    pub fn stats_for(&self, requester: &str) -> Option<RequesterStats> {
        self.diagnostics.stats_for(requester)
    }

    /// Close the current reporting window unconditionally.
    pub fn report_contention(&mut self, now: Tick) -> ContentionReport {
        self.diagnostics.report(now)
    }

    /// Close the reporting window if a full window has elapsed.
    pub fn maybe_report(&mut self, now: Tick) -> Option<ContentionReport> {
        self.diagnostics
            .window_elapsed(now)
            .then(|| self.diagnostics.report(now))
    }

    pub fn reset_statistics(&mut self, now: Tick) {
        self.diagnostics.reset(now);
    }
}

impl Default for AuthorityArbiter {
    fn default() -> Self {
        let config = ArbiterConfig::default();
        Self {
            diagnostics: Diagnostics::new(config.contention.clone()),
            config,
            registry:    LeaseRegistry::new(),
            last_sweep:  None,
        }
    }
}
