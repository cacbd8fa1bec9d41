//! The `DecisionModule` trait: the extension point for bot subsystems.

use ua_core::{Priority, UnitId};

use crate::{Authority, Order, TickContext};

/// Why a module lost a unit it held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LossReason {
    /// The unit left the roster.
    Despawned,
    /// A strictly more urgent module took the lease.
    Preempted { by: String, priority: Priority },
}

/// A bot subsystem that claims units and issues orders for them.
///
/// `O` is the game's action type.  Modules run once per tick in
/// registration order; all lease traffic goes through the [`Authority`]
/// handle, which is bound to the module's name and priority.
///
/// # Example
///
/// ```rust,ignore
/// struct Gather;
///
/// impl DecisionModule<Cmd> for Gather {
///     fn name(&self) -> &str { "economy" }
///     fn priority(&self) -> Priority { Priority::Economy }
///
///     fn on_tick(&mut self, ctx: &mut TickContext<'_>, auth: &mut Authority<'_>) -> Vec<Order<Cmd>> {
///         let workers = auth.filter_controllable(&ctx.roster.units());
///         auth.request(&workers)
///             .into_iter()
///             .map(|u| Order::new(u, Cmd::Gather))
///             .collect()
///     }
/// }
/// ```
pub trait DecisionModule<O> {
    /// Requester name.  Must be non-empty and unique within a driver.
    fn name(&self) -> &str;

    /// Priority used for every request this module makes.  Read once at
    /// registration.
    fn priority(&self) -> Priority;

    fn on_tick(
        &mut self,
        ctx:  &mut TickContext<'_>,
        auth: &mut Authority<'_>,
    ) -> Vec<Order<O>>;

    /// Called after the tick on which one of this module's leases was
    /// dropped by someone other than the module itself.
    ///
    /// Default: ignored.
    fn on_unit_lost(&mut self, _unit: UnitId, _reason: &LossReason) {}
}
