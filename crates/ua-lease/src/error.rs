use thiserror::Error;
use ua_core::Tick;

/// Faults in how the arbiter was called or configured.
///
/// A denied request is *not* an error; it shows up as an absent unit in the
/// granted set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LeaseError {
    #[error("requester name is empty")]
    EmptyRequester,

    #[error("lease duration requested by {requester} must be at least one tick")]
    ZeroDuration { requester: String },

    #[error("no lease can start at {now}: the tick counter is exhausted")]
    TickOverflow { now: Tick },

    #[error("arbiter configuration error: {0}")]
    Config(String),
}

pub type LeaseResult<T> = Result<T, LeaseError>;
