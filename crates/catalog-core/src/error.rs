//! # Domain Error Taxonomy
//!
//! Every public catalog operation returns either its declared result type or
//! one of the four kinds below. Storage-level signals are translated into
//! these at the service boundary and never leak past it; once translated, an
//! error is terminal for the operation (no internal retries).
//!
//! ## Error Flow
//! ```text
//! sqlx::Error  →  catalog_db::DbError  →  CatalogError (this module)
//!                 (storage signals)       (what callers see)
//! ```

use thiserror::Error;

/// Domain errors for catalog operations.
///
/// The transport layer owns the mapping from these kinds to wire status
/// codes (e.g. `NotFound` → 404); this crate only names the kind.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The entity id does not resolve - on read, update target, or delete
    /// target. Mutations that fail with this kind performed no write.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A delete was blocked by a row that still references the entity
    /// (e.g. an order line referencing a product, or a product referencing
    /// a category). The entity and its associations remain unchanged.
    #[error("{entity} {id} is still referenced and cannot be deleted")]
    Conflict { entity: &'static str, id: i64 },

    /// Caller-supplied data failed a precondition the core enforces
    /// (e.g. zero page size, blank category name).
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// Unclassified persistence failure. Not retried here; retry policy, if
    /// any, belongs to the caller.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl CatalogError {
    /// Creates a NotFound error for a given entity kind and id.
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        CatalogError::NotFound { entity, id }
    }

    /// Creates a Conflict error for a given entity kind and id.
    pub fn conflict(entity: &'static str, id: i64) -> Self {
        CatalogError::Conflict { entity, id }
    }

    /// Creates an Invalid error for a named field.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CatalogError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results with CatalogError.
pub type CatalogResult<T> = Result<T, CatalogError>;

// =============================================================================
// Unit Tests
// =============================================================================
