//! `ua-tick`: tick driver for the unit_authority framework.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`module`]    | `DecisionModule<O>` trait, `LossReason`                     |
//! | [`authority`] | `Authority<'a>`: arbiter handle scoped to one module       |
//! | [`context`]   | `TickContext<'a>`: tick, clock, roster, per-module RNG     |
//! | [`roster`]    | `UnitRoster`: live units and queued despawns               |
//! | [`order`]     | `Order<O>`                                                  |
//! | [`idle`]      | `IdleModule`: parks unclaimed units at `Priority::Idle`     |
//! | [`driver`]    | `TickDriver<O>` and its tick loop                           |
//! | [`builder`]   | `DriverBuilder<O>`                                          |
//! | [`observer`]  | `DriverObserver<O>`, `NoopObserver`, `TickSummary`          |
//! | [`config`]    | `DriverConfig`                                              |
//! | [`error`]     | `DriverError`, `DriverResult<T>`                            |
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Evict:   drop leases on units despawned since the last tick.
//!   ② Sweep:   remove expired leases if the sweep interval is due.
//!   ③ Decide:  each module, in registration order, calls on_tick through
//!               an Authority bound to (name, priority, tick).
//!   ④ Apply:   forward orders for units the module still holds; drop
//!               and count the rest.
//!   ⑤ Report:  close the contention window once window_ticks have elapsed.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ua_tick::{DriverBuilder, DriverConfig, IdleModule, NoopObserver};
//!
//! let mut driver = DriverBuilder::<Cmd>::new(DriverConfig::default())
//!     .module(MyCombatModule::default())
//!     .module(IdleModule::new())
//!     .units((0..60).map(UnitId))
//!     .build()?;
//! driver.run(&mut NoopObserver);
//! ```

pub mod authority;
pub mod builder;
pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod idle;
pub mod module;
pub mod observer;
pub mod order;
pub mod roster;


pub use authority::Authority;
pub use builder::DriverBuilder;
pub use config::DriverConfig;
pub use context::TickContext;
pub use driver::TickDriver;
pub use error::{DriverError, DriverResult};
pub use idle::IdleModule;
pub use module::{DecisionModule, LossReason};
pub use observer::{DriverObserver, DriverStats, NoopObserver, TickSummary};
pub use order::Order;
pub use roster::UnitRoster;
