//! Product gateway operations.
//!
//! The search join against `product_categories` can duplicate a product row
//! once per matching association, so both the count and the page query go
//! through `DISTINCT p.id` - pagination counts distinct products, never join
//! rows. Ordering is id ascending everywhere a page is produced, which keeps
//! pages stable between calls over unchanged data.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::debug;

use catalog_core::{Category, PageRequest, Product, ProductFields, ProductFilter};

use crate::error::{DbError, DbResult};

// =============================================================================
// Row Types
// =============================================================================

/// Scalar columns of a product row, before category hydration.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub release_date: DateTime<Utc>,
    pub image_url: String,
}

impl ProductRow {
    /// Combines the row with its hydrated categories into a domain product.
    pub fn into_product(self, categories: Vec<Category>) -> Product {
        Product {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
            release_date: self.release_date,
            image_url: self.image_url,
            categories,
        }
    }
}

/// One product-to-category link with the category columns attached.
#[derive(Debug, sqlx::FromRow)]
struct CategoryLink {
    product_id: i64,
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

// =============================================================================
// Lookups
// =============================================================================

/// Gets a product row by id (categories not yet hydrated).
pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<ProductRow>> {
    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT id, name, description, price, release_date, image_url
        FROM products
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

/// Appends the search join and WHERE clauses shared by the count and the
/// page query. `category_ids` is the effective (non-empty) constraint;
/// `name` the trimmed substring filter.
fn push_search_clauses(qb: &mut QueryBuilder<'_, Sqlite>, category_ids: Option<&[i64]>, name: &str) {
    if category_ids.is_some() {
        qb.push(" INNER JOIN product_categories pc ON pc.product_id = p.id");
    }

    qb.push(" WHERE 1 = 1");

    if let Some(ids) = category_ids {
        // OR across the requested categories: a product matching any one of
        // them qualifies
        qb.push(" AND pc.category_id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
    }

    if !name.is_empty() {
        qb.push(" AND LOWER(p.name) LIKE '%' || LOWER(")
            .push_bind(name.to_string())
            .push(") || '%'");
    }
}

/// Runs the filtered, paginated product scan.
///
/// Returns the page of rows (ordered by id) and the total number of distinct
/// matching products. An unknown category id simply matches nothing; a page
/// past the end comes back empty with the true total.
pub async fn search_page(
    conn: &mut SqliteConnection,
    filter: &ProductFilter,
    page: PageRequest,
) -> DbResult<(Vec<ProductRow>, i64)> {
    let category_ids = filter.effective_category_ids();
    let name = filter.effective_name();

    debug!(
        categories = ?category_ids,
        name = %name,
        page = page.number,
        size = page.size,
        "Searching products"
    );

    let mut count_qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT COUNT(DISTINCT p.id) FROM products p");
    push_search_clauses(&mut count_qb, category_ids, name);

    let total: i64 = count_qb
        .build_query_scalar::<i64>()
        .fetch_one(&mut *conn)
        .await?;

    if total == 0 {
        return Ok((Vec::new(), 0));
    }

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT DISTINCT p.id, p.name, p.description, p.price, p.release_date, p.image_url \
         FROM products p",
    );
    push_search_clauses(&mut qb, category_ids, name);
    qb.push(" ORDER BY p.id LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());

    let rows = qb.build_query_as::<ProductRow>().fetch_all(conn).await?;

    debug!(count = rows.len(), total = total, "Search returned products");
    Ok((rows, total))
}

/// Hydrates the categories of the given products in one batched query.
///
/// Returns a map from product id to its categories, sorted by category id.
/// Products without categories are simply absent from the map.
pub async fn categories_of(
    conn: &mut SqliteConnection,
    product_ids: &[i64],
) -> DbResult<HashMap<i64, Vec<Category>>> {
    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT pc.product_id, c.id, c.name, c.created_at, c.updated_at \
         FROM product_categories pc \
         INNER JOIN categories c ON c.id = pc.category_id \
         WHERE pc.product_id IN (",
    );
    let mut separated = qb.separated(", ");
    for id in product_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") ORDER BY pc.product_id, c.id");

    let links = qb.build_query_as::<CategoryLink>().fetch_all(conn).await?;

    let mut map: HashMap<i64, Vec<Category>> = HashMap::new();
    for link in links {
        map.entry(link.product_id).or_default().push(Category {
            id: link.id,
            name: link.name,
            created_at: link.created_at,
            updated_at: link.updated_at,
        });
    }

    Ok(map)
}

// =============================================================================
// Mutations
// =============================================================================

/// Inserts a new product row; the store assigns the id.
pub async fn insert(conn: &mut SqliteConnection, fields: &ProductFields) -> DbResult<i64> {
    debug!(name = %fields.name, "Inserting product");

    let result = sqlx::query(
        r#"
        INSERT INTO products (name, description, price, release_date, image_url)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(fields.price)
    .bind(fields.release_date)
    .bind(&fields.image_url)
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Overwrites all scalar fields of an existing product row.
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    fields: &ProductFields,
) -> DbResult<()> {
    debug!(id = %id, "Updating product");

    let result = sqlx::query(
        r#"
        UPDATE products SET
            name = ?2,
            description = ?3,
            price = ?4,
            release_date = ?5,
            image_url = ?6
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(fields.price)
    .bind(fields.release_date)
    .bind(&fields.image_url)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Product", id));
    }

    Ok(())
}

/// Deletes a product row by id.
///
/// Association rows cascade with the product; an order line still
/// referencing it surfaces as `ForeignKeyViolation` and nothing is deleted.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> DbResult<()> {
    debug!(id = %id, "Deleting product");

    let result = sqlx::query("DELETE FROM products WHERE id = ?1")
        .bind(id)
        .execute(conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Product", id));
    }

    Ok(())
}

/// Removes every category association of a product.
pub async fn clear_categories(conn: &mut SqliteConnection, product_id: i64) -> DbResult<()> {
    sqlx::query("DELETE FROM product_categories WHERE product_id = ?1")
        .bind(product_id)
        .execute(conn)
        .await?;

    Ok(())
}

/// Attaches the given categories to a product.
///
/// Callers must pass deduplicated ids of categories already verified to
/// exist; the schema's composite primary key rejects duplicates.
pub async fn attach_categories(
    conn: &mut SqliteConnection,
    product_id: i64,
    category_ids: &[i64],
) -> DbResult<()> {
    for category_id in category_ids {
        sqlx::query("INSERT INTO product_categories (product_id, category_id) VALUES (?1, ?2)")
            .bind(product_id)
            .bind(*category_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}
