//! # Domain Types
//!
//! Core entity types for the catalog backend.
//!
//! ## Ownership Model
//! The backing store is the single source of truth. Values of these types
//! passed across the crate boundary are snapshots: mutating a returned
//! `Product` has no effect on stored state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Category
// =============================================================================

/// A catalog category.
///
/// `id` is assigned by the store on creation and immutable thereafter.
/// Categories never cascade deletion to products: deleting a category that
/// is still referenced by a product is rejected with `Conflict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    /// Unique identifier (>= 1, store-assigned).
    pub id: i64,

    /// Display name. Non-empty by invariant, enforced on every mutation.
    pub name: String,

    /// When the category was created.
    pub created_at: DateTime<Utc>,

    /// When the category was last updated (name edits only).
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product with its categories populated.
///
/// Invariant: `categories` contains no duplicate ids and is sorted by id
/// ascending. Price is non-negative; validating that before mutation is a
/// collaborator concern (the core does not re-validate it, callers must
/// guarantee it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (store-assigned).
    pub id: i64,

    /// Display name. Searchable via case-insensitive substring match.
    pub name: String,

    /// Free-form description.
    pub description: String,

    /// Unit price. Non-negative (caller-enforced precondition).
    pub price: f64,

    /// When the product was or will be released.
    pub release_date: DateTime<Utc>,

    /// URL of the product image.
    pub image_url: String,

    /// Categories this product belongs to, unique by id, sorted ascending.
    pub categories: Vec<Category>,
}

impl Product {
    /// Returns the ids of this product's categories, in ascending order.
    pub fn category_ids(&self) -> Vec<i64> {
        self.categories.iter().map(|c| c.id).collect()
    }

    /// Checks membership of a category by id.
    pub fn has_category(&self, category_id: i64) -> bool {
        self.categories.iter().any(|c| c.id == category_id)
    }
}

// =============================================================================
// Product Fields
// =============================================================================

/// Scalar fields of a product, as supplied by a caller on create/update.
///
/// Updates overwrite ALL of these fields; there is no partial patch.
/// Category membership travels separately as a slice of category ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub release_date: DateTime<Utc>,
    pub image_url: String,
}

// =============================================================================
// Product Filter
// =============================================================================

/// Search filter for the paginated product search.
///
/// Matching rule: a product matches iff ALL of
/// 1. `category_ids` is `None` or empty, OR the product has at least one
///    category whose id is in the list (OR across categories, not AND);
/// 2. the product's name contains `name` as a case-insensitive substring
///    (empty matches all).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Optional category id set. `None` and `Some(vec![])` both mean
    /// "no category constraint".
    pub category_ids: Option<Vec<i64>>,

    /// Name substring, matched case-insensitively. Leading and trailing
    /// whitespace is ignored.
    pub name: String,
}

impl ProductFilter {
    /// A filter that matches every product.
    pub fn all() -> Self {
        ProductFilter::default()
    }

    /// Filter by name substring only.
    pub fn by_name(name: impl Into<String>) -> Self {
        ProductFilter {
            category_ids: None,
            name: name.into(),
        }
    }

    /// Filter by membership in any of the given categories.
    pub fn by_categories(ids: impl Into<Vec<i64>>) -> Self {
        ProductFilter {
            category_ids: Some(ids.into()),
            name: String::new(),
        }
    }

    /// The effective category constraint: `None` when absent OR empty.
    pub fn effective_category_ids(&self) -> Option<&[i64]> {
        match self.category_ids.as_deref() {
            Some([]) | None => None,
            Some(ids) => Some(ids),
        }
    }

    /// The effective name constraint, trimmed.
    pub fn effective_name(&self) -> &str {
        self.name.trim()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str) -> Category {
        let now = Utc::now();
        Category {
            id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_product_category_helpers() {
        let product = Product {
            id: 1,
            name: "PC Gamer".to_string(),
            description: "A gaming rig".to_string(),
            price: 1200.0,
            release_date: Utc::now(),
            image_url: "https://example.com/1.png".to_string(),
            categories: vec![category(2, "Electronics"), category(3, "Computers")],
        };

        assert_eq!(product.category_ids(), vec![2, 3]);
        assert!(product.has_category(3));
        assert!(!product.has_category(1));
    }

    #[test]
    fn test_filter_empty_list_means_no_constraint() {
        assert_eq!(ProductFilter::all().effective_category_ids(), None);
        assert_eq!(
            ProductFilter::by_categories(vec![]).effective_category_ids(),
            None
        );
        assert_eq!(
            ProductFilter::by_categories(vec![1, 2]).effective_category_ids(),
            Some(&[1, 2][..])
        );
    }

    #[test]
    fn test_filter_name_is_trimmed() {
        assert_eq!(ProductFilter::by_name("  PC Gamer ").effective_name(), "PC Gamer");
        assert_eq!(ProductFilter::all().effective_name(), "");
    }
}
