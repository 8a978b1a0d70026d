//! Product query and mutation operations.
//!
//! The search path is the Query Engine: a filtered, paginated scan joining
//! products to an optional category set, de-duplicated before pagination.
//! The mutation paths orchestrate create/update/delete with all-or-nothing
//! replacement of the category associations: referenced categories are
//! verified inside the same transaction before any write, so a missing id
//! fails the whole operation with `NotFound` and nothing is persisted.

use std::collections::BTreeSet;

use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use catalog_core::{
    validation, CatalogError, CatalogResult, Category, Page, PageRequest, Product, ProductFields,
    ProductFilter,
};

use crate::error::DbError;
use crate::repository::{category, product};
use crate::service::storage_error;

/// Product service: paginated search plus create/update/delete.
#[derive(Debug, Clone)]
pub struct ProductService {
    pool: SqlitePool,
}

impl ProductService {
    /// Creates a new ProductService over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        ProductService { pool }
    }

    // =========================================================================
    // Query Engine
    // =========================================================================

    /// Searches products with optional category and name filters.
    ///
    /// A product matches iff it belongs to ANY of the requested categories
    /// (or the filter is absent/empty) AND its name contains the trimmed
    /// name filter as a case-insensitive substring (empty matches all).
    /// Results are ordered by id ascending; categories of every returned
    /// product are populated.
    pub async fn search(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> CatalogResult<Page<Product>> {
        validation::validate_page_request(page)?;

        let mut conn = self.pool.acquire().await.map_err(storage_error)?;

        let (rows, total) = product::search_page(&mut conn, filter, page).await?;
        if rows.is_empty() {
            return Ok(Page::new(Vec::new(), page, total as u64));
        }

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut categories = product::categories_of(&mut conn, &ids).await?;

        let items = rows
            .into_iter()
            .map(|row| {
                let cats = categories.remove(&row.id).unwrap_or_default();
                row.into_product(cats)
            })
            .collect();

        Ok(Page::new(items, page, total as u64))
    }

    /// Gets a product by id, categories populated.
    pub async fn get(&self, id: i64) -> CatalogResult<Product> {
        let mut conn = self.pool.acquire().await.map_err(storage_error)?;

        let row = product::find_by_id(&mut conn, id)
            .await?
            .ok_or(CatalogError::not_found("Product", id))?;

        let mut categories = product::categories_of(&mut conn, &[id]).await?;
        Ok(row.into_product(categories.remove(&id).unwrap_or_default()))
    }

    // =========================================================================
    // Mutation Engine
    // =========================================================================

    /// Creates a product with the given scalar fields and category set.
    ///
    /// Every referenced category must already exist; otherwise the whole
    /// insert fails with `NotFound` and nothing is persisted. Duplicate ids
    /// in `category_ids` collapse to a single association.
    pub async fn create(
        &self,
        fields: ProductFields,
        category_ids: &[i64],
    ) -> CatalogResult<Product> {
        let ids = dedupe(category_ids);

        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let categories = require_categories(&mut tx, &ids).await?;
        let id = product::insert(&mut tx, &fields).await?;
        product::attach_categories(&mut tx, id, &ids).await?;

        tx.commit().await.map_err(storage_error)?;

        info!(id = id, "Product created");
        Ok(Product {
            id,
            name: fields.name,
            description: fields.description,
            price: fields.price,
            release_date: fields.release_date,
            image_url: fields.image_url,
            categories,
        })
    }

    /// Updates a product: overwrites ALL scalar fields and replaces the
    /// entire category set with exactly `category_ids`.
    ///
    /// This is a full replace, not a merge - categories omitted here are
    /// removed even if unrelated to the edit's intent. Fails with `NotFound`
    /// (and no fields modified) if `id` does not resolve or a referenced
    /// category does not exist.
    pub async fn update(
        &self,
        id: i64,
        fields: ProductFields,
        category_ids: &[i64],
    ) -> CatalogResult<Product> {
        let ids = dedupe(category_ids);

        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        product::update(&mut tx, id, &fields).await?;
        let categories = require_categories(&mut tx, &ids).await?;
        product::clear_categories(&mut tx, id).await?;
        product::attach_categories(&mut tx, id, &ids).await?;

        tx.commit().await.map_err(storage_error)?;

        info!(id = id, "Product updated");
        Ok(Product {
            id,
            name: fields.name,
            description: fields.description,
            price: fields.price,
            release_date: fields.release_date,
            image_url: fields.image_url,
            categories,
        })
    }

    /// Deletes a product.
    ///
    /// Its association rows go with it. Returns `NotFound` if the id does
    /// not resolve, `Conflict` if a referencing row (an order line) blocks
    /// the delete - in which case the product and its associations remain
    /// unchanged.
    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        match product::delete(&mut tx, id).await {
            Ok(()) => {}
            Err(err) if err.is_constraint_violation() => {
                return Err(CatalogError::conflict("Product", id));
            }
            Err(DbError::NotFound { .. }) => {
                return Err(CatalogError::not_found("Product", id));
            }
            Err(other) => return Err(other.into()),
        }

        tx.commit().await.map_err(storage_error)?;

        info!(id = id, "Product deleted");
        Ok(())
    }
}

/// Sorts and deduplicates a category id set.
fn dedupe(ids: &[i64]) -> Vec<i64> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Verifies that every id in `ids` resolves to an existing category and
/// returns them ordered by id. Runs inside the caller's transaction, before
/// any write, so a missing category aborts the operation with `NotFound`
/// and nothing is persisted.
async fn require_categories(
    conn: &mut SqliteConnection,
    ids: &[i64],
) -> CatalogResult<Vec<Category>> {
    let categories = category::find_all(conn, ids).await?;

    if categories.len() != ids.len() {
        let missing = ids
            .iter()
            .find(|id| !categories.iter().any(|c| c.id == **id))
            .copied()
            .unwrap_or_default();
        return Err(CatalogError::not_found("Category", missing));
    }

    Ok(categories)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn fields(name: &str, price: f64) -> ProductFields {
        ProductFields {
            name: name.to_string(),
            description: format!("{name} description"),
            price,
            release_date: Utc.with_ymd_and_hms(2020, 7, 14, 10, 0, 0).unwrap(),
            image_url: format!("https://img.example.com/{}.png", name.replace(' ', "-")),
        }
    }

    /// Seeds the reference catalog: Books, Electronics, Computers and 25
    /// products of which 21 are named "PC Gamer ...".
    async fn seed_reference_catalog(db: &Database) -> (i64, i64, i64) {
        let categories = db.categories();
        let books = categories.create("Books").await.unwrap().id;
        let electronics = categories.create("Electronics").await.unwrap().id;
        let computers = categories.create("Computers").await.unwrap().id;

        let products = db.products();
        products
            .create(fields("The Lord of the Rings", 90.5), &[books])
            .await
            .unwrap();
        products
            .create(fields("Smart TV", 2190.0), &[electronics])
            .await
            .unwrap();
        products
            .create(fields("Macbook Pro", 1250.0), &[computers])
            .await
            .unwrap();
        products
            .create(fields("Rails for Dummies", 100.99), &[books])
            .await
            .unwrap();

        for suffix in [
            "", " Ex", " X", " Alfa", " Tera", " Y", " Nitro", " Card", " Plus", " Hera", " Weed",
            " Max", " Turbo", " Hot", " Ez", " Tr", " Tx", " Er", " Min", " Boo", " Foo",
        ] {
            products
                .create(fields(&format!("PC Gamer{suffix}"), 1200.0), &[computers])
                .await
                .unwrap();
        }

        (books, electronics, computers)
    }

    // =========================================================================
    // Query Engine
    // =========================================================================

    #[tokio::test]
    async fn test_search_unfiltered_counts_all() {
        let db = test_db().await;
        seed_reference_catalog(&db).await;

        let page = db
            .products()
            .search(&ProductFilter::all(), PageRequest::new(0, 10))
            .await
            .unwrap();

        assert_eq!(page.total_elements, 25);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.items.len(), 10);
        // Stable ordering by id ascending
        let ids: Vec<i64> = page.items.iter().map(|p| p.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn test_search_name_filter_counts() {
        let db = test_db().await;
        seed_reference_catalog(&db).await;
        let products = db.products();

        let page = products
            .search(&ProductFilter::by_name("PC Gamer"), PageRequest::new(0, 10))
            .await
            .unwrap();
        assert_eq!(page.total_elements, 21);

        let page = products
            .search(&ProductFilter::by_name("Camera"), PageRequest::new(0, 10))
            .await
            .unwrap();
        assert_eq!(page.total_elements, 0);
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_name_filter_is_case_insensitive_substring() {
        let db = test_db().await;
        seed_reference_catalog(&db).await;
        let products = db.products();

        let lower = products
            .search(&ProductFilter::by_name("pc gamer"), PageRequest::new(0, 25))
            .await
            .unwrap();
        let upper = products
            .search(&ProductFilter::by_name("PC GAMER"), PageRequest::new(0, 25))
            .await
            .unwrap();

        let lower_ids: Vec<i64> = lower.items.iter().map(|p| p.id).collect();
        let upper_ids: Vec<i64> = upper.items.iter().map(|p| p.id).collect();
        assert_eq!(lower.total_elements, 21);
        assert_eq!(lower_ids, upper_ids);

        // Substring, not prefix: "Gamer X" hits "PC Gamer X" and "PC Gamer Tx"
        let infix = products
            .search(&ProductFilter::by_name("gamer x"), PageRequest::new(0, 25))
            .await
            .unwrap();
        assert_eq!(infix.total_elements, 1);
        assert_eq!(infix.items[0].name, "PC Gamer X");
    }

    #[tokio::test]
    async fn test_category_filter_is_or_semantics() {
        let db = test_db().await;
        let categories = db.categories();
        let products = db.products();

        let a = categories.create("A").await.unwrap().id;
        let b = categories.create("B").await.unwrap().id;

        let p1 = products.create(fields("p1", 1.0), &[a]).await.unwrap().id;
        let p2 = products.create(fields("p2", 1.0), &[b]).await.unwrap().id;
        let p3 = products.create(fields("p3", 1.0), &[a, b]).await.unwrap().id;
        let _p4 = products.create(fields("p4", 1.0), &[]).await.unwrap().id;

        let page = products
            .search(&ProductFilter::by_categories(vec![a, b]), PageRequest::new(0, 10))
            .await
            .unwrap();

        let ids: Vec<i64> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![p1, p2, p3]);
        assert_eq!(page.total_elements, 3);
    }

    #[tokio::test]
    async fn test_join_rows_are_deduplicated_before_pagination() {
        let db = test_db().await;
        let categories = db.categories();
        let products = db.products();

        let a = categories.create("A").await.unwrap().id;
        let b = categories.create("B").await.unwrap().id;

        // Matches both requested categories: one join row each, one product
        let both = products.create(fields("both", 1.0), &[a, b]).await.unwrap().id;

        let page = products
            .search(&ProductFilter::by_categories(vec![a, b]), PageRequest::new(0, 10))
            .await
            .unwrap();

        assert_eq!(page.total_elements, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, both);
    }

    #[tokio::test]
    async fn test_unknown_category_filter_yields_empty_page() {
        let db = test_db().await;
        seed_reference_catalog(&db).await;

        let page = db
            .products()
            .search(&ProductFilter::by_categories(vec![9999]), PageRequest::new(0, 10))
            .await
            .unwrap();

        assert_eq!(page.total_elements, 0);
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_pagination_completeness() {
        let db = test_db().await;
        seed_reference_catalog(&db).await;
        let products = db.products();

        let mut seen = HashSet::new();
        for number in 0..3 {
            let page = products
                .search(&ProductFilter::all(), PageRequest::new(number, 10))
                .await
                .unwrap();
            assert_eq!(page.total_elements, 25);
            for item in &page.items {
                // No duplicates across pages
                assert!(seen.insert(item.id));
            }
        }

        assert_eq!(seen.len(), 25);
    }

    #[tokio::test]
    async fn test_page_beyond_last_is_empty_with_true_total() {
        let db = test_db().await;
        seed_reference_catalog(&db).await;

        let page = db
            .products()
            .search(&ProductFilter::all(), PageRequest::new(5, 10))
            .await
            .unwrap();

        assert!(page.is_empty());
        assert_eq!(page.total_elements, 25);
        assert_eq!(page.total_pages(), 3);
    }

    #[tokio::test]
    async fn test_search_populates_categories() {
        let db = test_db().await;
        let (books, _, _) = seed_reference_catalog(&db).await;

        let page = db
            .products()
            .search(&ProductFilter::by_name("The Lord of the Rings"), PageRequest::first(10))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].category_ids(), vec![books]);
        assert_eq!(page.items[0].categories[0].name, "Books");
    }

    #[tokio::test]
    async fn test_get_is_idempotent() {
        let db = test_db().await;
        let (_, electronics, _) = seed_reference_catalog(&db).await;
        let products = db.products();

        let page = products
            .search(&ProductFilter::by_name("Smart TV"), PageRequest::first(1))
            .await
            .unwrap();
        let id = page.items[0].id;

        let first = products.get(id).await.unwrap();
        let second = products.get(id).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.category_ids(), vec![electronics]);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let db = test_db().await;

        assert!(matches!(
            db.products().get(404).await.unwrap_err(),
            CatalogError::NotFound { entity: "Product", id: 404 }
        ));
    }

    #[tokio::test]
    async fn test_zero_page_size_is_invalid() {
        let db = test_db().await;

        assert!(matches!(
            db.products()
                .search(&ProductFilter::all(), PageRequest::new(0, 0))
                .await
                .unwrap_err(),
            CatalogError::Invalid { field: "page_size", .. }
        ));
    }

    // =========================================================================
    // Mutation Engine
    // =========================================================================

    #[tokio::test]
    async fn test_create_assigns_id_and_attaches_categories() {
        let db = test_db().await;
        let books = db.categories().create("Books").await.unwrap().id;
        let products = db.products();

        let created = products
            .create(fields("The Hobbit", 45.0), &[books])
            .await
            .unwrap();

        assert!(created.id >= 1);
        assert_eq!(created.category_ids(), vec![books]);

        let fetched = products.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_with_missing_category_is_atomic() {
        let db = test_db().await;
        let books = db.categories().create("Books").await.unwrap().id;
        let products = db.products();

        let err = products
            .create(fields("Ghost Book", 10.0), &[books, 999])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NotFound { entity: "Category", id: 999 }
        ));

        // Nothing was persisted
        let page = products
            .search(&ProductFilter::all(), PageRequest::first(10))
            .await
            .unwrap();
        assert_eq!(page.total_elements, 0);
    }

    #[tokio::test]
    async fn test_duplicate_category_ids_collapse() {
        let db = test_db().await;
        let books = db.categories().create("Books").await.unwrap().id;

        let created = db
            .products()
            .create(fields("Dune", 30.0), &[books, books, books])
            .await
            .unwrap();

        assert_eq!(created.category_ids(), vec![books]);
    }

    #[tokio::test]
    async fn test_update_overwrites_scalars() {
        let db = test_db().await;
        let books = db.categories().create("Books").await.unwrap().id;
        let products = db.products();

        let created = products.create(fields("Draft", 1.0), &[books]).await.unwrap();
        let updated = products
            .update(created.id, fields("Final", 99.0), &[books])
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Final");
        assert_eq!(updated.price, 99.0);

        let fetched = products.get(created.id).await.unwrap();
        assert_eq!(fetched.name, "Final");
    }

    #[tokio::test]
    async fn test_update_replaces_categories_not_merges() {
        let db = test_db().await;
        let categories = db.categories();
        let a = categories.create("A").await.unwrap().id;
        let b = categories.create("B").await.unwrap().id;
        let c = categories.create("C").await.unwrap().id;
        let products = db.products();

        let created = products.create(fields("p", 1.0), &[a, b]).await.unwrap();
        assert_eq!(created.category_ids(), vec![a, b]);

        let updated = products
            .update(created.id, fields("p", 1.0), &[c])
            .await
            .unwrap();
        assert_eq!(updated.category_ids(), vec![c]);

        let fetched = products.get(created.id).await.unwrap();
        assert_eq!(fetched.category_ids(), vec![c]);
    }

    #[tokio::test]
    async fn test_update_to_empty_category_set() {
        let db = test_db().await;
        let a = db.categories().create("A").await.unwrap().id;
        let products = db.products();

        let created = products.create(fields("p", 1.0), &[a]).await.unwrap();
        let updated = products.update(created.id, fields("p", 1.0), &[]).await.unwrap();

        assert!(updated.categories.is_empty());
        assert!(products.get(created.id).await.unwrap().categories.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_id_writes_nothing() {
        let db = test_db().await;
        let books = db.categories().create("Books").await.unwrap().id;
        let products = db.products();

        let err = products
            .update(12345, fields("Ghost", 10.0), &[books])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NotFound { entity: "Product", id: 12345 }
        ));

        let page = products
            .search(&ProductFilter::all(), PageRequest::first(10))
            .await
            .unwrap();
        assert_eq!(page.total_elements, 0);
    }

    #[tokio::test]
    async fn test_update_with_missing_category_rolls_back_scalars() {
        let db = test_db().await;
        let books = db.categories().create("Books").await.unwrap().id;
        let products = db.products();

        let created = products.create(fields("Original", 10.0), &[books]).await.unwrap();

        let err = products
            .update(created.id, fields("Changed", 20.0), &[999])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NotFound { entity: "Category", id: 999 }
        ));

        // The scalar overwrite rolled back with the failed category check
        let fetched = products.get(created.id).await.unwrap();
        assert_eq!(fetched.name, "Original");
        assert_eq!(fetched.category_ids(), vec![books]);
    }

    #[tokio::test]
    async fn test_delete_removes_product_and_associations() {
        let db = test_db().await;
        let books = db.categories().create("Books").await.unwrap().id;
        let products = db.products();

        let created = products.create(fields("Disposable", 5.0), &[books]).await.unwrap();
        products.delete(created.id).await.unwrap();

        assert!(matches!(
            products.get(created.id).await.unwrap_err(),
            CatalogError::NotFound { .. }
        ));
        // The category itself survives
        assert_eq!(db.categories().get(books).await.unwrap().name, "Books");
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_not_found() {
        let db = test_db().await;

        assert!(matches!(
            db.products().delete(404).await.unwrap_err(),
            CatalogError::NotFound { entity: "Product", id: 404 }
        ));
    }

    #[tokio::test]
    async fn test_delete_referenced_product_is_conflict_and_unchanged() {
        let db = test_db().await;
        let books = db.categories().create("Books").await.unwrap().id;
        let products = db.products();

        let created = products.create(fields("Bestseller", 25.0), &[books]).await.unwrap();

        // An order line references the product and blocks its deletion
        sqlx::query("INSERT INTO order_items (product_id, quantity, created_at) VALUES (?1, 2, ?2)")
            .bind(created.id)
            .bind(chrono::Utc::now())
            .execute(db.pool())
            .await
            .unwrap();

        let err = products.delete(created.id).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Conflict { entity: "Product", .. }
        ));

        // Product and its associations are unchanged
        let fetched = products.get(created.id).await.unwrap();
        assert_eq!(fetched.name, "Bestseller");
        assert_eq!(fetched.category_ids(), vec![books]);
    }
}
