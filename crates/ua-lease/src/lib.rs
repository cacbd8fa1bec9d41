//! `ua-lease`: the authority arbitration engine.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`lease`]       | `Lease`: one unit's control grant                        |
//! | [`resolver`]    | `resolve`, `Resolution`: the pure preemption decision     |
//! | [`registry`]    | `LeaseRegistry`: unit → lease map plus expiry index      |
//! | [`expiry`]      | `ExpiryQueue` (`BTreeMap<Tick, Vec<UnitId>>`)             |
//! | [`arbiter`]     | `AuthorityArbiter`: request / release / query / sweep     |
//! | [`diagnostics`] | `RequesterStats`, `ContentionReport`, `ContentionWarning` |
//! | [`config`]      | `ArbiterConfig`, `ContentionConfig`                       |
//! | [`error`]       | `LeaseError`, `LeaseResult<T>`                            |
//!
//! # Lease state machine (per unit)
//!
//! ```text
//! absent ──grant──────────────────────────▶ active
//! active ──renew (same holder)────────────▶ active   expiry extended
//! active ──preempt (strictly more urgent)─▶ active   lease replaced
//! active ──release (holder) / sweep / reap▶ absent
//! ```
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `serde`   | Serialize leases, statistics, reports and config.       |
//! | `fx-hash` | Use FxHash for the registry map.                        |

pub mod arbiter;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod expiry;
pub mod lease;
pub mod registry;
pub mod resolver;

#[cfg(test)]
mod tests;

pub use arbiter::{AuthorityArbiter, Eviction, Grant};
pub use config::{ArbiterConfig, ContentionConfig};
pub use diagnostics::{
    ContentionReport, ContentionWarning, Diagnostics, RequesterStats, Statistics,
};
pub use error::{LeaseError, LeaseResult};
pub use expiry::ExpiryQueue;
pub use lease::Lease;
pub use registry::LeaseRegistry;
pub use resolver::{resolve, Resolution};
