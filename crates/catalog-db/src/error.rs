//! # Database Error Types
//!
//! Storage-level failure signals and their translation to domain errors.
//!
//! ## Error Flow
//! ```text
//! sqlx::Error  →  DbError (this module)  →  CatalogError (catalog-core)
//!                 classifies the signal      what callers see
//! ```
//!
//! The services never let a raw `DbError` escape: the blanket
//! [`From<DbError>`] impl below performs the uniform translation, and delete
//! paths additionally map [`DbError::ForeignKeyViolation`] to
//! `CatalogError::Conflict` with entity context at the call site -
//! `Conflict` is reserved for referenced-row delete rejection.

use catalog_core::CatalogError;
use thiserror::Error;

/// Database operation errors - the two storage signals the gateway contract
/// names (row-not-found, constraint violation) plus the usual pool and
/// migration failure modes.
#[derive(Debug, Error)]
pub enum DbError {
    /// No row matched the given primary key.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// Foreign key constraint violation - a referencing row elsewhere
    /// blocked the write (most commonly a delete).
    #[error("foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Unique constraint violation.
    #[error("duplicate value: {message}")]
    UniqueViolation { message: String },

    /// Database connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity kind and id.
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        DbError::NotFound { entity, id }
    }

    /// Whether this error is a constraint (foreign key) violation.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DbError::ForeignKeyViolation { .. })
    }
}

/// Classify sqlx errors into storage signals.
///
/// ## Mapping
/// ```text
/// sqlx::Error::RowNotFound  → DbError::NotFound (entity unknown at this level)
/// sqlx::Error::Database     → inspect message for the constraint kind
/// sqlx::Error::PoolTimedOut → DbError::PoolExhausted
/// other                     → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "row",
                id: 0,
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                //   "FOREIGN KEY constraint failed"
                //   "UNIQUE constraint failed: <table>.<column>"
                if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("UNIQUE constraint failed") {
                    DbError::UniqueViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Uniform translation into the domain taxonomy.
///
/// Constraint violations fall through to `Storage` here: `Conflict` carries
/// entity context, so the services map it explicitly on their delete paths
/// where the entity and id are known.
impl From<DbError> for CatalogError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CatalogError::NotFound { entity, id },
            other => CatalogError::Storage(other.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_translates_to_domain_not_found() {
        let err: CatalogError = DbError::not_found("Product", 7).into();
        assert!(matches!(
            err,
            CatalogError::NotFound { entity: "Product", id: 7 }
        ));
    }

    #[test]
    fn test_other_signals_translate_to_storage() {
        let err: CatalogError = DbError::QueryFailed("syntax error".into()).into();
        assert!(matches!(err, CatalogError::Storage(_)));

        let err: CatalogError = DbError::ForeignKeyViolation {
            message: "FOREIGN KEY constraint failed".into(),
        }
        .into();
        assert!(matches!(err, CatalogError::Storage(_)));
    }

    #[test]
    fn test_constraint_detection() {
        let err = DbError::ForeignKeyViolation {
            message: "FOREIGN KEY constraint failed".into(),
        };
        assert!(err.is_constraint_violation());
        assert!(!DbError::PoolExhausted.is_constraint_violation());
    }
}
