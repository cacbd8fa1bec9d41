//! `ua-service`: the arbiter as a single-writer actor.
//!
//! [`ArbiterService::spawn`] moves an [`AuthorityArbiter`][ua_lease::AuthorityArbiter]
//! onto its own thread and returns an [`ArbiterHandle`].  Handles are
//! `Clone + Send`; every call sends a command over a bounded
//! `crossbeam-channel` queue and blocks on a one-slot reply channel.
//! Commands are applied in arrival order, so the arbiter's single-writer
//! semantics hold across threads without any lock.
//!
//! ```rust,ignore
//! let handle = ArbiterService::spawn(ArbiterConfig::default())?;
//! let h2 = handle.clone();
//! std::thread::spawn(move || h2.request(&[UnitId(1)], Priority::Combat, "army", Tick(0)));
//! let stats = handle.shutdown()?;
//! ```

mod command;
pub mod error;
pub mod handle;
pub mod service;


pub use error::{ServiceError, ServiceResult};
pub use handle::ArbiterHandle;
pub use service::{ArbiterService, DEFAULT_QUEUE_CAPACITY};
