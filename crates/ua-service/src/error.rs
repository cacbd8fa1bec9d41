use thiserror::Error;
use ua_lease::LeaseError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The actor thread has stopped (after `shutdown`, or it panicked).
    #[error("arbiter service is not running")]
    Disconnected,

    #[error("failed to start arbiter thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error(transparent)]
    Lease(#[from] LeaseError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
