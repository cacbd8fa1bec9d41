use thiserror::Error;
use ua_lease::LeaseError;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("driver configuration error: {0}")]
    Config(String),

    #[error("decision module #{index} has an empty name")]
    EmptyModuleName { index: usize },

    #[error("decision module name {0:?} is registered twice")]
    DuplicateModule(String),

    #[error("no decision modules registered")]
    NoModules,

    #[error("arbiter: {0}")]
    Lease(#[from] LeaseError),
}

pub type DriverResult<T> = Result<T, DriverError>;
