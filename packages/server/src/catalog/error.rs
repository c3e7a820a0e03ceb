use sea_orm::DbErr;
use thiserror::Error;

/// Failure kinds surfaced by catalog operations.
///
/// Callers map these onto their transport; the catalog itself never logs,
/// retries, or compensates.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed input, or a write that would break a structural invariant.
    #[error("{0}")]
    Validation(String),
    /// The entity, or a link in its ownership chain, does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// The authenticated admin does not own the resolved store.
    #[error("store is owned by another admin")]
    Forbidden,
    /// The operation is refused while live dependents exist.
    #[error("{0}")]
    Conflict(String),
    /// The underlying store failed: constraint violation, connection loss,
    /// or any write inside an aborted transaction.
    #[error("persistence failure: {0}")]
    Persistence(#[from] DbErr),
}

impl CatalogError {
    pub fn validation(msg: impl Into<String>) -> Self {
        CatalogError::Validation(msg.into())
    }
}
