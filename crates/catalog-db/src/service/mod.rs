//! # Query and Mutation Services
//!
//! The engines behind every inbound catalog operation. Each public method
//! executes within one transactional scope: reads run on a plain pooled
//! connection (no write locks under WAL), mutations open a transaction,
//! commit on success and roll back on any error - a partial write is never
//! observable to another connection.
//!
//! Error translation happens here and only here: storage signals become the
//! four domain kinds, and no `DbError` escapes a service method. Errors are
//! terminal for the operation; there are no internal retries.

pub mod category;
pub mod product;

use catalog_core::CatalogError;

use crate::error::DbError;

/// Translates a raw sqlx failure from pool/transaction plumbing into the
/// domain taxonomy.
pub(crate) fn storage_error(err: sqlx::Error) -> CatalogError {
    CatalogError::from(DbError::from(err))
}
