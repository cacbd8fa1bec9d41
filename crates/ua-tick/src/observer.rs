//! Driver observer trait for order dispatch and progress reporting.

use ua_core::Tick;
use ua_lease::ContentionReport;

use crate::Order;

/// Per-tick counts returned by the driver's tick step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub tick:           Tick,
    /// Leases dropped because their unit despawned.
    pub evicted:        usize,
    /// Leases removed by the sweeper, if it ran this tick.
    pub swept:          Option<usize>,
    pub orders_applied: usize,
    pub orders_dropped: usize,
}

/// Totals over a driver's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub ticks:          u64,
    pub evicted:        u64,
    pub swept:          u64,
    pub orders_applied: u64,
    pub orders_dropped: u64,
}

impl DriverStats {
    pub(crate) fn absorb(&mut self, s: &TickSummary) {
        self.ticks += 1;
        self.evicted += s.evicted as u64;
        self.swept += s.swept.unwrap_or(0) as u64;
        self.orders_applied += s.orders_applied as u64;
        self.orders_dropped += s.orders_dropped as u64;
    }
}

/// Callbacks invoked by [`TickDriver`][crate::TickDriver] at key points in
/// the tick loop.
///
/// This is where orders leave the framework: the game layer implements
/// [`on_orders`](Self::on_orders) to forward them to its units.  Every
/// method has a no-op default.
pub trait DriverObserver<O> {
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Orders that passed the lease gate, for one module.
    fn on_orders(&mut self, _tick: Tick, _module: &str, _orders: &[Order<O>]) {}

    /// Orders for units the module did not hold.  Never executed.
    fn on_orders_dropped(&mut self, _tick: Tick, _module: &str, _orders: &[Order<O>]) {}

    fn on_sweep(&mut self, _tick: Tick, _removed: usize) {}

    fn on_contention(&mut self, _report: &ContentionReport) {}

    fn on_tick_end(&mut self, _summary: &TickSummary) {}

    /// Called once after [`TickDriver::run`][crate::TickDriver::run] finishes.
    fn on_run_end(&mut self, _final_tick: Tick, _stats: &DriverStats) {}
}

/// A [`DriverObserver`] that discards everything.
pub struct NoopObserver;

impl<O> DriverObserver<O> for NoopObserver {}
