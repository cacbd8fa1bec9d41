//! skirmish: four bot subsystems contending for a churning unit pool.
//!
//! Defense, combat, scouting and economy modules share one arbiter.  Units
//! spawn and die at random, and a raid hits the base every so often, which
//! makes the defense module pull soldiers and workers away from everyone
//! else.  At the end the per-module arbitration counters are printed.
//!
//! ```text
//! cargo run --release -p skirmish -- [config.json]
//! RUST_LOG=debug cargo run -p skirmish
//! ```
//!
//! The optional JSON file may override any subset of `driver` and `arbiter`.

mod modules;

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fs;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use ua_core::{SimRng, Tick, UnitId};
use ua_lease::{ArbiterConfig, ContentionReport};
use ua_tick::{DriverBuilder, DriverConfig, DriverObserver, IdleModule, Order, TickSummary};

use modules::{Action, CombatModule, DefenseModule, EconomyModule, ScoutModule};

// ── Constants ─────────────────────────────────────────────────────────────────

const INITIAL_UNITS:   u32 = 24;
const SPAWN_CHANCE:    f64 = 0.05;  // per tick
const DEATH_CHANCE:    f64 = 0.04;  // per tick
const RAID_EVERY:      u64 = 672;   // ~30 s
const RAID_LENGTH:     u64 = 224;   // ~10 s
const ATTACK_CADENCE:  u64 = 22;
const PROGRESS_EVERY:  u64 = 1_344; // ~1 min

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
struct SkirmishConfig {
    driver:  DriverConfig,
    arbiter: ArbiterConfig,
}

impl Default for SkirmishConfig {
    fn default() -> Self {
        Self {
            driver:  DriverConfig { total_ticks: 6_720, ..DriverConfig::default() }, // ~5 min
            arbiter: ArbiterConfig::default(),
        }
    }
}

fn load_config(path: Option<String>) -> Result<SkirmishConfig> {
    let Some(path) = path else {
        return Ok(SkirmishConfig::default());
    };
    let text = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct SkirmishObserver {
    orders:   BTreeMap<String, BTreeMap<&'static str, u64>>,
    dropped:  BTreeMap<String, u64>,
    reports:  u64,
    warnings: u64,
}

impl DriverObserver<Action> for SkirmishObserver {
    fn on_orders(&mut self, _tick: Tick, module: &str, orders: &[Order<Action>]) {
        let per_action = self.orders.entry(module.to_owned()).or_default();
        for o in orders {
            *per_action.entry(o.action.name()).or_default() += 1;
        }
    }

    fn on_orders_dropped(&mut self, _tick: Tick, module: &str, orders: &[Order<Action>]) {
        *self.dropped.entry(module.to_owned()).or_default() += orders.len() as u64;
    }

    fn on_contention(&mut self, report: &ContentionReport) {
        self.reports += 1;
        self.warnings += report.warnings.len() as u64;
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        if summary.tick.is_every(PROGRESS_EVERY) {
            log::info!(
                "{} applied {} order(s), dropped {}, evicted {}",
                summary.tick,
                summary.orders_applied,
                summary.orders_dropped,
                summary.evicted,
            );
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config(std::env::args().nth(1))?;
    println!("=== skirmish: unit authority arbitration ===");
    println!(
        "Ticks: {}  |  Units: {INITIAL_UNITS}  |  Seed: {}",
        config.driver.total_ticks, config.driver.seed
    );
    println!();

    // 1. Modules, in run order.
    let threat = Rc::new(Cell::new(false));
    let mut driver = DriverBuilder::new(config.driver.clone())
        .arbiter_config(config.arbiter.clone())
        .module(DefenseModule::new(Rc::clone(&threat)))
        .module(CombatModule::new(ATTACK_CADENCE))
        .module(ScoutModule::default())
        .module(EconomyModule)
        .module(IdleModule::new())
        .units((0..INITIAL_UNITS).map(UnitId))
        .build()?;
    println!("Modules: {}", driver.module_names().join(", "));

    // 2. Run, churning the world between ticks.
    let mut world = SimRng::new(config.driver.seed).child(u64::MAX);
    let mut next_id = INITIAL_UNITS;
    let mut obs = SkirmishObserver::default();

    let t0 = Instant::now();
    while driver.current_tick() < driver.config.end_tick() {
        let now = driver.current_tick();

        if world.gen_bool(SPAWN_CHANCE) {
            driver.roster.spawn(UnitId(next_id));
            next_id += 1;
        }
        if world.gen_bool(DEATH_CHANCE) {
            if let Some(&dead) = world.choose(&driver.roster.units()) {
                driver.roster.despawn(dead);
            }
        }
        threat.set(now.0 % RAID_EVERY >= RAID_EVERY - RAID_LENGTH);

        driver.step(&mut obs);
    }
    let elapsed = t0.elapsed();

    // 3. Summary.
    let stats = driver.stats();
    println!("Run complete in {:.3} s at {}", elapsed.as_secs_f64(), driver.clock);
    println!(
        "  orders applied {}  |  dropped {}  |  leases evicted {}  |  swept {}",
        stats.orders_applied, stats.orders_dropped, stats.evicted, stats.swept
    );
    println!(
        "  units alive {}  |  leases held {}  |  contention reports {} ({} warnings)",
        driver.roster.len(),
        driver.arbiter().len(),
        obs.reports,
        obs.warnings
    );
    println!();

    println!(
        "{:<10} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>7}",
        "Module", "Requests", "Grants", "Denials", "Renewals", "Preempt", "Evicted", "Rate"
    );
    println!("{}", "-".repeat(72));
    for (name, s) in driver.arbiter().statistics() {
        println!(
            "{:<10} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>6.1}%",
            name,
            s.requests,
            s.grants,
            s.denials,
            s.renewals,
            s.preemptions,
            s.evicted,
            s.grant_rate().unwrap_or(0.0) * 100.0,
        );
    }
    println!();

    for (module, per_action) in &obs.orders {
        let line: Vec<String> = per_action.iter().map(|(a, n)| format!("{a}={n}")).collect();
        let dropped = obs.dropped.get(module).copied().unwrap_or(0);
        println!("{module:<10} orders: {}  (dropped {dropped})", line.join(" "));
    }

    Ok(())
}
