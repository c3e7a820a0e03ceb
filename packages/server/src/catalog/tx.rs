use std::future::Future;
use std::pin::Pin;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionError, TransactionTrait};

use super::CatalogError;

/// Boxed unit of work executed against a transaction-scoped handle.
pub type UnitOfWork<'c, T> = Pin<Box<dyn Future<Output = Result<T, CatalogError>> + Send + 'c>>;

/// Run `work` inside a single transaction.
///
/// The transaction commits when `work` returns `Ok` and rolls back when it
/// returns `Err`, discarding every write made through the handle. The handle
/// is the only write path while `work` runs; nesting is not supported.
pub async fn transact<T, F>(db: &DatabaseConnection, work: F) -> Result<T, CatalogError>
where
    T: Send,
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> UnitOfWork<'c, T> + Send,
{
    db.transaction::<F, T, CatalogError>(work)
        .await
        .map_err(|err| match err {
            TransactionError::Connection(e) => CatalogError::Persistence(e),
            TransactionError::Transaction(e) => e,
        })
}
