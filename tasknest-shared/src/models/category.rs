/// Category model and database operations
///
/// Categories are user-owned labels that tasks can belong to (many-to-many).
/// A user cannot have two categories with the same name; different users can
/// reuse names freely.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE categories (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(100) NOT NULL,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT categories_name_user_id_key UNIQUE (name, user_id)
/// );
/// ```
///
/// Deleting a category removes its rows from `task_categories` via CASCADE;
/// member tasks themselves are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Category model representing a user-owned task category
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    /// Unique category ID
    pub id: Uuid,

    /// Category name, unique per owner
    pub name: String,

    /// Owning user
    pub user_id: Uuid,

    /// When the category was created
    pub created_at: DateTime<Utc>,

    /// When the category was last updated
    pub updated_at: DateTime<Utc>,
}

/// Category row joined with the number of tasks that belong to it
///
/// This is what the listing endpoints work with: the task count is exactly
/// what the empty/full partition in [`crate::queries`] needs.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategoryTaskCount {
    /// Unique category ID
    pub id: Uuid,

    /// Category name
    pub name: String,

    /// Owning user
    pub user_id: Uuid,

    /// Number of tasks currently associated with this category
    pub task_count: i64,
}

/// Input for creating a new category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategory {
    /// Category name
    pub name: String,

    /// Owning user (always taken from the authenticated session)
    pub user_id: Uuid,
}

impl Category {
    /// Creates a new category
    ///
    /// # Errors
    ///
    /// Returns an error if the owner already has a category with this name
    /// (unique constraint violation) or the database operation fails
    pub async fn create(pool: &PgPool, data: CreateCategory) -> Result<Self, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, user_id)
            VALUES ($1, $2)
            RETURNING id, name, user_id, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.user_id)
        .fetch_one(pool)
        .await?;

        Ok(category)
    }

    /// Finds a category by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, user_id, created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    /// Lists a user's categories, name ascending
    pub async fn list_by_owner(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, user_id, created_at, updated_at
            FROM categories
            WHERE user_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    /// Lists a user's categories together with their task counts
    ///
    /// The counts feed the empty/full partition in [`crate::queries`].
    pub async fn list_by_owner_with_counts(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<CategoryTaskCount>, sqlx::Error> {
        let categories = sqlx::query_as::<_, CategoryTaskCount>(
            r#"
            SELECT c.id, c.name, c.user_id, COUNT(tc.task_id) AS task_count
            FROM categories c
            LEFT JOIN task_categories tc ON tc.category_id = c.id
            WHERE c.user_id = $1
            GROUP BY c.id, c.name, c.user_id
            ORDER BY c.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    /// Resolves which of the submitted category ids belong to `user_id`
    ///
    /// Used to restrict the category selector during task create/update: any
    /// submitted id not returned here belongs to another user (or nobody)
    /// and must be rejected.
    pub async fn filter_owned(
        pool: &PgPool,
        user_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id
            FROM categories
            WHERE user_id = $1 AND id = ANY($2)
            "#,
        )
        .bind(user_id)
        .bind(ids)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Renames a category
    ///
    /// # Returns
    ///
    /// The updated category if found, None if the category doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if the owner already has a category with the new
    /// name, or the database operation fails
    pub async fn rename(
        pool: &PgPool,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    /// Deletes a category
    ///
    /// Association rows in `task_categories` go with it via CASCADE; member
    /// tasks survive.
    ///
    /// # Returns
    ///
    /// True if the category was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts a user's categories
    pub async fn count_by_owner(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM categories WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}
