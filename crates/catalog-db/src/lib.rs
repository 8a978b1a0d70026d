//! # catalog-db: Database Layer for the Catalog Backend
//!
//! SQLite storage behind the catalog's query and mutation services.
//!
//! ## Architecture Position
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  Transport adapter (HTTP / CLI - out of scope)                   │
//! │       │                                                          │
//! │       ▼                                                          │
//! │  ┌────────────────────────────────────────────────────────────┐ │
//! │  │                  catalog-db (THIS CRATE)                   │ │
//! │  │                                                            │ │
//! │  │   ┌──────────┐   ┌─────────────┐   ┌──────────────────┐   │ │
//! │  │   │ Database │   │  services   │   │    repository    │   │ │
//! │  │   │ (pool.rs)│──►│ Product /   │──►│ gateway over one │   │ │
//! │  │   │          │   │ Category    │   │ connection       │   │ │
//! │  │   └──────────┘   └─────────────┘   └──────────────────┘   │ │
//! │  │        │                                                   │ │
//! │  │   ┌──────────────┐                                         │ │
//! │  │   │  migrations  │  embedded SQL, applied on connect       │ │
//! │  │   └──────────────┘                                         │ │
//! │  └────────────────────────────────────────────────────────────┘ │
//! │       │                                                          │
//! │       ▼                                                          │
//! │  SQLite database (WAL, foreign keys ON)                          │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error signals and domain translation
//! - [`repository`] - Persistence gateway (point lookups, scans, writes)
//! - [`service`] - Query + mutation engines owning transactional scopes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_db::{Database, DbConfig};
//! use catalog_core::{PageRequest, ProductFilter};
//!
//! let db = Database::new(DbConfig::new("./catalog.db")).await?;
//! let page = db
//!     .products()
//!     .search(&ProductFilter::by_name("pc gamer"), PageRequest::first(10))
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Service re-exports for convenience
pub use service::category::CategoryService;
pub use service::product::ProductService;
