//! # catalog-core: Pure Domain Logic for the Catalog Backend
//!
//! This crate is the heart of the catalog backend. It contains the domain
//! model and nothing else: no database access, no network, no async I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    Catalog Architecture                          │
//! │                                                                  │
//! │  Transport adapter (HTTP / CLI - out of scope)                  │
//! │       │                                                          │
//! │       ▼                                                          │
//! │  catalog-db services (query + mutation engines)                 │
//! │       │                                                          │
//! │       ▼                                                          │
//! │  ★ catalog-core (THIS CRATE) ★                                  │
//! │                                                                  │
//! │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌────────────┐     │
//! │   │  types   │  │   page   │  │  error   │  │ validation │     │
//! │   │ Category │  │   Page   │  │ NotFound │  │   rules    │     │
//! │   │ Product  │  │ PageReq  │  │ Conflict │  │   checks   │     │
//! │   └──────────┘  └──────────┘  └──────────┘  └────────────┘     │
//! │                                                                  │
//! │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Category, Product, filters)
//! - [`page`] - Pagination model (PageRequest, Page)
//! - [`error`] - Domain error taxonomy
//! - [`validation`] - Precondition checks the core enforces
//!
//! ## Design Principles
//!
//! 1. **Snapshots, not live references**: values returned across the crate
//!    boundary never alias stored state
//! 2. **Explicit errors**: every failure is one of four typed kinds, never a
//!    string or a panic
//! 3. **No I/O**: database, network, file system access is FORBIDDEN here

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod page;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CatalogError, CatalogResult};
pub use page::{Page, PageRequest};
pub use types::{Category, Product, ProductFields, ProductFilter};
