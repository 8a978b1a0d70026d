//! # Persistence Gateway
//!
//! Thin query layer over the relational store: point lookups, paginated
//! filtered scans, inserts/updates/deletes by primary key. Two storage
//! signals surface from here - [`DbError::NotFound`] when no row matched and
//! [`DbError::ForeignKeyViolation`] when a referencing row blocks a write -
//! everything else is an opaque failure.
//!
//! Every function takes `&mut SqliteConnection` so the service layer can
//! compose several gateway calls inside one transaction; the gateway itself
//! never opens or commits transactional scopes.
//!
//! [`DbError::NotFound`]: crate::error::DbError::NotFound
//! [`DbError::ForeignKeyViolation`]: crate::error::DbError::ForeignKeyViolation

pub mod category;
pub mod product;
