//! Category gateway operations.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::debug;

use catalog_core::{Category, PageRequest};

use crate::error::{DbError, DbResult};

/// Gets a category by id.
pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, created_at, updated_at
        FROM categories
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(category)
}

/// Gets one page of categories ordered by id, plus the total count.
pub async fn find_page(
    conn: &mut SqliteConnection,
    page: PageRequest,
) -> DbResult<(Vec<Category>, i64)> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(&mut *conn)
        .await?;

    let items = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, created_at, updated_at
        FROM categories
        ORDER BY id
        LIMIT ?1 OFFSET ?2
        "#,
    )
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(conn)
    .await?;

    Ok((items, total))
}

/// Gets every category whose id is in `ids`, ordered by id.
///
/// This is the existence check used before attaching categories to a
/// product: callers compare the returned length against the requested id
/// count and fail with a not-found signal before writing anything. It runs
/// inside the caller's transaction, so the check and the subsequent write
/// see the same store state.
pub async fn find_all(conn: &mut SqliteConnection, ids: &[i64]) -> DbResult<Vec<Category>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT id, name, created_at, updated_at FROM categories WHERE id IN (");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") ORDER BY id");

    let categories = qb.build_query_as::<Category>().fetch_all(conn).await?;

    Ok(categories)
}

/// Inserts a new category; the store assigns the id.
pub async fn insert(conn: &mut SqliteConnection, name: &str) -> DbResult<Category> {
    debug!(name = %name, "Inserting category");

    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO categories (name, created_at, updated_at)
        VALUES (?1, ?2, ?2)
        "#,
    )
    .bind(name)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    let id = result.last_insert_rowid();

    // Read the row back so the returned snapshot carries the timestamps
    // exactly as stored
    find_by_id(conn, id)
        .await?
        .ok_or(DbError::not_found("Category", id))
}

/// Updates a category's name (name-only update, bumps `updated_at`).
pub async fn update_name(
    conn: &mut SqliteConnection,
    id: i64,
    name: &str,
) -> DbResult<Category> {
    debug!(id = %id, "Updating category name");

    let now = Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE categories
        SET name = ?2, updated_at = ?3
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Category", id));
    }

    find_by_id(conn, id)
        .await?
        .ok_or(DbError::not_found("Category", id))
}

/// Deletes a category by id.
///
/// Fails with `NotFound` if no row matched, or `ForeignKeyViolation` if a
/// product still references the category (RESTRICT constraint).
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> DbResult<()> {
    debug!(id = %id, "Deleting category");

    let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
        .bind(id)
        .execute(conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Category", id));
    }

    Ok(())
}
