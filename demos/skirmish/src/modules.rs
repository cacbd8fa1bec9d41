//! The four bot subsystems that contend for the skirmish's units.

use std::cell::Cell;
use std::rc::Rc;

use ua_core::{Priority, UnitId};
use ua_tick::{Authority, DecisionModule, LossReason, Order, TickContext};

/// What the game is told to do with a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Action {
    Defend,
    Attack,
    Scout,
    Gather,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::Defend => "defend",
            Action::Attack => "attack",
            Action::Scout  => "scout",
            Action::Gather => "gather",
        }
    }
}

/// Every third unit is a soldier; the rest are workers.
pub fn is_soldier(unit: UnitId) -> bool {
    unit.0 % 3 == 0
}

fn orders(units: Vec<UnitId>, action: Action) -> Vec<Order<Action>> {
    units.into_iter().map(|u| Order::new(u, action)).collect()
}

// ── Defense ───────────────────────────────────────────────────────────────────

/// Pulls every soldier plus a few workers while the base is under attack.
pub struct DefenseModule {
    threat:  Rc<Cell<bool>>,
    engaged: bool,
}

/// Workers pulled into a defense on top of the soldiers.
const WORKER_PULL: usize = 3;

impl DefenseModule {
    pub fn new(threat: Rc<Cell<bool>>) -> Self {
        Self { threat, engaged: false }
    }
}

impl DecisionModule<Action> for DefenseModule {
    fn name(&self) -> &str {
        "defense"
    }

    fn priority(&self) -> Priority {
        Priority::Defense
    }

    fn on_tick(
        &mut self,
        ctx: &mut TickContext<'_>,
        auth: &mut Authority<'_>,
    ) -> Vec<Order<Action>> {
        if !self.threat.get() {
            if self.engaged {
                let freed = auth.release_all();
                log::info!("{} threat cleared, released {freed} defender(s)", ctx.tick);
                self.engaged = false;
            }
            return vec![];
        }

        let mut wanted: Vec<UnitId> = ctx.roster.iter().filter(|&u| is_soldier(u)).collect();
        wanted.extend(ctx.roster.iter().filter(|&u| !is_soldier(u)).take(WORKER_PULL));
        if !self.engaged {
            log::info!("{} base under attack, pulling {} unit(s)", ctx.tick, wanted.len());
            self.engaged = true;
        }
        orders(auth.request(&wanted), Action::Defend)
    }
}

// ── Combat ────────────────────────────────────────────────────────────────────

/// Keeps the army together and attacks on a fixed cadence.
pub struct CombatModule {
    cadence: u64,
}

impl CombatModule {
    pub fn new(cadence: u64) -> Self {
        Self { cadence }
    }
}

impl DecisionModule<Action> for CombatModule {
    fn name(&self) -> &str {
        "combat"
    }

    fn priority(&self) -> Priority {
        Priority::Combat
    }

    fn on_tick(
        &mut self,
        ctx: &mut TickContext<'_>,
        auth: &mut Authority<'_>,
    ) -> Vec<Order<Action>> {
        let soldiers: Vec<UnitId> = ctx.roster.iter().filter(|&u| is_soldier(u)).collect();
        let free = auth.filter_controllable(&soldiers);
        let army = auth.request(&free);
        if ctx.tick.is_every(self.cadence) {
            orders(army, Action::Attack)
        } else {
            vec![]
        }
    }
}

// ── Scouting ──────────────────────────────────────────────────────────────────

/// Borrows one worker at a time and sends it scouting for a few seconds.
#[derive(Default)]
pub struct ScoutModule {
    scout: Option<UnitId>,
}

/// Length of one scouting trip.
const SCOUT_SECS: f64 = 20.0;

impl DecisionModule<Action> for ScoutModule {
    fn name(&self) -> &str {
        "scouting"
    }

    fn priority(&self) -> Priority {
        Priority::Scouting
    }

    fn on_tick(
        &mut self,
        ctx: &mut TickContext<'_>,
        auth: &mut Authority<'_>,
    ) -> Vec<Order<Action>> {
        if self.scout.is_some_and(|u| auth.holds(u)) {
            return vec![];
        }
        let workers: Vec<UnitId> = ctx.roster.iter().filter(|&u| !is_soldier(u)).collect();
        let candidates = auth.filter_controllable(&workers);
        let Some(&pick) = ctx.rng.choose(&candidates) else {
            self.scout = None;
            return vec![];
        };
        let trip = ctx.clock.ticks_for_secs(SCOUT_SECS);
        self.scout = auth.request_for(&[pick], trip).first().copied();
        orders(self.scout.into_iter().collect(), Action::Scout)
    }

    fn on_unit_lost(&mut self, unit: UnitId, reason: &LossReason) {
        if self.scout == Some(unit) {
            log::debug!("scout {unit} lost: {reason:?}");
            self.scout = None;
        }
    }
}

// ── Economy ───────────────────────────────────────────────────────────────────

/// Sends every worker nobody more urgent wants to gather.
pub struct EconomyModule;

impl DecisionModule<Action> for EconomyModule {
    fn name(&self) -> &str {
        "economy"
    }

    fn priority(&self) -> Priority {
        Priority::Economy
    }

    fn on_tick(
        &mut self,
        ctx: &mut TickContext<'_>,
        auth: &mut Authority<'_>,
    ) -> Vec<Order<Action>> {
        let workers: Vec<UnitId> = ctx.roster.iter().filter(|&u| !is_soldier(u)).collect();
        let free = auth.filter_controllable(&workers);
        orders(auth.request(&free), Action::Gather)
    }
}
