//! `ua-core`: foundational types for the `unit_authority` arbitration framework.
//!
//! This crate is a dependency of every other `ua-*` crate.  It intentionally
//! has no `ua-*` dependencies and minimal external ones (`rand`, `thiserror`
//! and `log`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `UnitId`                                              |
//! | [`priority`]    | `Priority`: the closed, totally ordered urgency set  |
//! | [`time`]        | `Tick`, `TickClock`                                   |
//! | [`rng`]         | `SimRng` (seeded, reproducible)                       |
//! | [`error`]       | `UaError`, `UaResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod priority;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{UaError, UaResult};
pub use ids::UnitId;
pub use priority::Priority;
pub use rng::SimRng;
pub use time::{Tick, TickClock};
