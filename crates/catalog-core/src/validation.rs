//! # Validation Module
//!
//! The few preconditions the core itself enforces, reported as
//! [`CatalogError::Invalid`].
//!
//! Deliberately small: product scalar validation (non-negative price,
//! well-formed URL) is a collaborator concern enforced before values reach
//! this crate. What IS enforced here are the invariants the data model
//! declares for its own inputs: page size >= 1 and non-blank category names.

use crate::error::{CatalogError, CatalogResult};
use crate::page::PageRequest;

/// Longest accepted category name.
pub const MAX_CATEGORY_NAME_LEN: usize = 200;

/// Validates a page request.
///
/// ## Rules
/// - `size` must be >= 1 (page numbers are unsigned, so any number is fine)
///
/// ## Example
/// ```rust
/// use catalog_core::page::PageRequest;
/// use catalog_core::validation::validate_page_request;
///
/// assert!(validate_page_request(PageRequest::new(0, 10)).is_ok());
/// assert!(validate_page_request(PageRequest::new(0, 0)).is_err());
/// ```
pub fn validate_page_request(request: PageRequest) -> CatalogResult<()> {
    if request.size == 0 {
        return Err(CatalogError::invalid("page_size", "must be at least 1"));
    }
    Ok(())
}

/// Validates a category name.
///
/// ## Rules
/// - Must not be blank after trimming
/// - Must be at most [`MAX_CATEGORY_NAME_LEN`] characters
///
/// ## Returns
/// The trimmed name.
pub fn validate_category_name(name: &str) -> CatalogResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(CatalogError::invalid("name", "must not be blank"));
    }

    if name.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(CatalogError::invalid(
            "name",
            format!("must be at most {MAX_CATEGORY_NAME_LEN} characters"),
        ));
    }

    Ok(name.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_page_request() {
        assert!(validate_page_request(PageRequest::new(0, 1)).is_ok());
        assert!(validate_page_request(PageRequest::new(999, 50)).is_ok());

        let err = validate_page_request(PageRequest::new(0, 0)).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid { field: "page_size", .. }));
    }

    #[test]
    fn test_validate_category_name() {
        assert_eq!(validate_category_name("Books").unwrap(), "Books");
        assert_eq!(validate_category_name("  Books  ").unwrap(), "Books");

        assert!(validate_category_name("").is_err());
        assert!(validate_category_name("   ").is_err());
        assert!(validate_category_name(&"x".repeat(300)).is_err());
    }
}
