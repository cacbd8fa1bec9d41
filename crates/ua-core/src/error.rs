//! Errors from parsing and converting core values.

use thiserror::Error;

/// Rejected priority input.  Sub-crates keep their own error enums.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UaError {
    #[error("priority rank {0} is not a ranked priority level")]
    UnrankedPriority(u8),

    #[error("unknown priority name {0:?}")]
    UnknownPriorityName(String),
}

/// Shorthand result type for `ua-core`.
pub type UaResult<T> = Result<T, UaError>;
