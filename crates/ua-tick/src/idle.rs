//! A module that parks every otherwise unclaimed unit.

use ua_core::Priority;

use crate::{Authority, DecisionModule, Order, TickContext};

/// Claims every live unit nobody else holds, at [`Priority::Idle`], and
/// issues no orders for them.
///
/// Any other module outranks it, so parked units are always available.
/// Useful for accounting ("how many units are doing nothing") and as a
/// placeholder in tests.
pub struct IdleModule {
    name: String,
}

impl IdleModule {
    pub fn new() -> Self {
        Self::named("idle")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for IdleModule {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> DecisionModule<O> for IdleModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> Priority {
        Priority::Idle
    }

    fn on_tick(
        &mut self,
        ctx:  &mut TickContext<'_>,
        auth: &mut Authority<'_>,
    ) -> Vec<Order<O>> {
        // Filter first so units held by others do not show up as denials.
        let free = auth.filter_controllable(&ctx.roster.units());
        auth.request(&free);
        vec![]
    }
}
