//! The `TickDriver` struct and its tick loop.

use std::sync::Arc;

use ua_core::{Priority, SimRng, Tick, TickClock, UnitId};
use ua_lease::AuthorityArbiter;

use crate::authority::holds;
use crate::{
    Authority, DecisionModule, DriverConfig, DriverObserver, DriverStats, LossReason, Order,
    TickContext, TickSummary, UnitRoster,
};

/// One registered module with the identity it was registered under.
pub(crate) struct Slot<O> {
    pub(crate) name:     Arc<str>,
    pub(crate) priority: Priority,
    pub(crate) rng:      SimRng,
    pub(crate) module:   Box<dyn DecisionModule<O>>,
}

/// Runs decision modules against one [`AuthorityArbiter`].
///
/// Each tick:
///
/// 1. **Evict**: leases on units despawned since the last tick are dropped
///    before any module runs.
/// 2. **Sweep**: expired leases are removed if the sweep interval is due.
/// 3. **Decide**: every module's `on_tick` runs in registration order with
///    an [`Authority`] bound to its name, priority and the current tick.
/// 4. **Apply**: an order survives only if its module still holds the unit
///    after every module has run; the rest are dropped and counted.
/// 5. **Report**: the contention window is closed once
///    `ContentionConfig::window_ticks` have elapsed.
///
/// Modules that lost units to eviction or preemption are told through
/// [`DecisionModule::on_unit_lost`] at the end of the tick.
///
/// Create via [`DriverBuilder`][crate::DriverBuilder].
pub struct TickDriver<O> {
    pub config: DriverConfig,
    pub clock:  TickClock,

    /// Live units.  Spawn and despawn between calls to [`step`](Self::step).
    pub roster: UnitRoster,

    pub(crate) arbiter: AuthorityArbiter,
    pub(crate) slots:   Vec<Slot<O>>,
    pub(crate) stats:   DriverStats,
}

impl<O> TickDriver<O> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<Ob: DriverObserver<O>>(&mut self, observer: &mut Ob) -> DriverStats {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer);
        }
        observer.on_run_end(self.clock.current_tick, &self.stats);
        self.stats
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<Ob: DriverObserver<O>>(&mut self, n: u64, observer: &mut Ob) -> DriverStats {
        for _ in 0..n {
            self.step(observer);
        }
        self.stats
    }

    /// Process the current tick and advance the clock.
    pub fn step<Ob: DriverObserver<O>>(&mut self, observer: &mut Ob) -> TickSummary {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let summary = self.process_tick(now, observer);
        self.stats.absorb(&summary);
        observer.on_tick_end(&summary);
        self.clock.advance();
        summary
    }

    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn arbiter(&self) -> &AuthorityArbiter {
        &self.arbiter
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    /// Registered module names in run order.
    pub fn module_names(&self) -> Vec<&str> {
        self.slots.iter().map(|s| &*s.name).collect()
    }

    /// Drop every lease `module` holds, e.g. when the game disables it.
    pub fn release_module(&mut self, module: &str) -> usize {
        self.arbiter.release_all(module)
    }

    pub fn into_arbiter(self) -> AuthorityArbiter {
        self.arbiter
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<Ob: DriverObserver<O>>(&mut self, now: Tick, observer: &mut Ob) -> TickSummary {
        let mut summary = TickSummary { tick: now, ..TickSummary::default() };
        let mut losses: Vec<(Arc<str>, UnitId, LossReason)> = Vec::new();

        // ── Phase 1: evict despawned units ────────────────────────────────
        let dead = self.roster.take_despawned();
        if !dead.is_empty() {
            for &unit in &dead {
                if let Some(lease) = self.arbiter.lease_info(unit) {
                    losses.push((Arc::clone(&lease.holder), unit, LossReason::Despawned));
                }
            }
            summary.evicted = self.arbiter.evict_units(&dead);
        }

        // ── Phase 2: sweep ────────────────────────────────────────────────
        summary.swept = self.arbiter.maybe_cleanup(now);
        if let Some(removed) = summary.swept {
            observer.on_sweep(now, removed);
        }

        // ── Phase 3: decision modules ─────────────────────────────────────
        let mut pending: Vec<Vec<Order<O>>> = Vec::with_capacity(self.slots.len());
        for slot in &mut self.slots {
            let mut ctx = TickContext::new(now, &self.clock, &self.roster, &mut slot.rng);
            let mut auth = Authority::new(&mut self.arbiter, &slot.name, slot.priority, now)
                .with_roster(&self.roster);
            let orders = slot.module.on_tick(&mut ctx, &mut auth);
            for e in auth.into_evictions() {
                losses.push((
                    e.previous_holder,
                    e.unit,
                    LossReason::Preempted { by: slot.name.to_string(), priority: slot.priority },
                ));
            }
            pending.push(orders);
        }

        // ── Phase 4: apply orders ─────────────────────────────────────────
        //
        // Gated against the registry as it stands after every module ran, so
        // a unit preempted later in the tick only receives the winner's
        // orders.  Units that are no longer alive receive none.
        for (slot, orders) in self.slots.iter().zip(pending) {
            if orders.is_empty() {
                continue;
            }
            let name = &*slot.name;
            let (accepted, dropped): (Vec<_>, Vec<_>) = orders
                .into_iter()
                .partition(|o| {
                    self.roster.is_alive(o.unit) && holds(&self.arbiter, name, o.unit, now)
                });

            if !dropped.is_empty() {
                log::debug!(
                    "{now} dropped {} order(s) from {name} for units it does not hold",
                    dropped.len(),
                );
                observer.on_orders_dropped(now, name, &dropped);
            }
            if !accepted.is_empty() {
                observer.on_orders(now, name, &accepted);
            }
            summary.orders_applied += accepted.len();
            summary.orders_dropped += dropped.len();
        }

        // ── Phase 5: loss notifications ───────────────────────────────────
        for (holder, unit, reason) in losses {
            if let Some(slot) = self.slots.iter_mut().find(|s| s.name == holder) {
                slot.module.on_unit_lost(unit, &reason);
            }
        }

        // ── Phase 6: contention report ────────────────────────────────────
        if self.config.report_contention {
            if let Some(report) = self.arbiter.maybe_report(now) {
                observer.on_contention(&report);
            }
        }

        summary
    }
}
