//! Category query and mutation operations.

use sqlx::SqlitePool;
use tracing::info;

use catalog_core::validation::validate_category_name;
use catalog_core::{validation, CatalogError, CatalogResult, Category, Page, PageRequest};

use crate::error::DbError;
use crate::repository::category;
use crate::service::storage_error;

/// Category service: paginated listing, lookup, and name-only mutation.
///
/// Categories never cascade deletion to products; deleting a category that
/// is still referenced returns `Conflict` and changes nothing.
#[derive(Debug, Clone)]
pub struct CategoryService {
    pool: SqlitePool,
}

impl CategoryService {
    /// Creates a new CategoryService over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryService { pool }
    }

    /// Lists categories ordered by id, one page at a time.
    pub async fn list(&self, page: PageRequest) -> CatalogResult<Page<Category>> {
        validation::validate_page_request(page)?;

        let mut conn = self.pool.acquire().await.map_err(storage_error)?;
        let (items, total) = category::find_page(&mut conn, page).await?;

        Ok(Page::new(items, page, total as u64))
    }

    /// Gets a category by id.
    pub async fn get(&self, id: i64) -> CatalogResult<Category> {
        let mut conn = self.pool.acquire().await.map_err(storage_error)?;

        category::find_by_id(&mut conn, id)
            .await?
            .ok_or(CatalogError::not_found("Category", id))
    }

    /// Creates a category. The store assigns the id.
    pub async fn create(&self, name: &str) -> CatalogResult<Category> {
        let name = validate_category_name(name)?;

        let mut tx = self.pool.begin().await.map_err(storage_error)?;
        let created = category::insert(&mut tx, &name).await?;
        tx.commit().await.map_err(storage_error)?;

        info!(id = created.id, "Category created");
        Ok(created)
    }

    /// Renames a category. Name-only update; `updated_at` is bumped.
    pub async fn update(&self, id: i64, name: &str) -> CatalogResult<Category> {
        let name = validate_category_name(name)?;

        let mut tx = self.pool.begin().await.map_err(storage_error)?;
        let updated = category::update_name(&mut tx, id, &name).await?;
        tx.commit().await.map_err(storage_error)?;

        info!(id = id, "Category updated");
        Ok(updated)
    }

    /// Deletes a category.
    ///
    /// Returns `NotFound` if the id does not resolve, `Conflict` if any
    /// product still references the category - in which case the category
    /// remains present and unchanged.
    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        match category::delete(&mut tx, id).await {
            Ok(()) => {}
            Err(err) if err.is_constraint_violation() => {
                return Err(CatalogError::conflict("Category", id));
            }
            Err(DbError::NotFound { .. }) => {
                return Err(CatalogError::not_found("Category", id));
            }
            Err(other) => return Err(other.into()),
        }

        tx.commit().await.map_err(storage_error)?;

        info!(id = id, "Category deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
