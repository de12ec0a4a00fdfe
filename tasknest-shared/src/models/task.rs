/// Task model and database operations
///
/// Tasks are the core entity of Tasknest: user-owned to-do items with a
/// four-quadrant priority, a deadline, a two-state completion status, and
/// zero or more category memberships.
///
/// # State Machine
///
/// ```text
/// incomplete → done
/// ```
///
/// Status is a plain enumerated field; an update may also move a task back
/// from `done` to `incomplete`.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM (
///     'urgent_important', 'urgent_unimportant',
///     'not_urgent_important', 'not_urgent_unimportant'
/// );
///
/// CREATE TYPE task_status AS ENUM ('incomplete', 'done');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(150) NOT NULL,
///     description VARCHAR(720) NOT NULL DEFAULT '',
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     priority task_priority NOT NULL,
///     deadline TIMESTAMPTZ NOT NULL,
///     status task_status NOT NULL DEFAULT 'incomplete',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT tasks_title_user_id_key UNIQUE (title, user_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::models::task::{Task, CreateTask, TaskPriority};
/// use tasknest_shared::db::pool::{create_pool, DatabaseConfig};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     user_id: Uuid::new_v4(),
///     title: "Write report".to_string(),
///     description: String::new(),
///     priority: TaskPriority::UrgentImportant,
///     deadline: Utc::now(),
///     category_ids: vec![],
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Four-quadrant urgency/importance classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Do it now
    UrgentImportant,

    /// Delegate it or carve out time for it
    UrgentUnimportant,

    /// Schedule it
    NotUrgentImportant,

    /// Drop it, or save it for a holiday
    NotUrgentUnimportant,
}

impl TaskPriority {
    /// Converts priority to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::UrgentImportant => "urgent_important",
            TaskPriority::UrgentUnimportant => "urgent_unimportant",
            TaskPriority::NotUrgentImportant => "not_urgent_important",
            TaskPriority::NotUrgentUnimportant => "not_urgent_unimportant",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            TaskPriority::UrgentImportant => "urgent & important",
            TaskPriority::UrgentUnimportant => "urgent & unimportant",
            TaskPriority::NotUrgentImportant => "not urgent & important",
            TaskPriority::NotUrgentUnimportant => "not urgent & unimportant",
        }
    }
}

/// Task completion status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task has not been completed yet (initial state)
    Incomplete,

    /// Task has been marked done
    Done,
}

impl TaskStatus {
    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Incomplete => "incomplete",
            TaskStatus::Done => "done",
        }
    }

    /// Checks whether this status counts as completed
    pub fn is_done(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }
}

/// Task model representing a user-owned to-do item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Task title, unique per owner
    pub title: String,

    /// Free-text description (may be empty)
    pub description: String,

    /// Owning user
    pub user_id: Uuid,

    /// Urgency/importance classification
    pub priority: TaskPriority,

    /// When the task is due
    pub deadline: DateTime<Utc>,

    /// Completion status
    pub status: TaskStatus,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Task record shape used by the structured listing export
///
/// Matches the task row plus the ids of its categories, aggregated in one
/// query so the export is a single round trip.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskExport {
    /// Task ID
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Free-text description
    pub description: String,

    /// Ids of the categories this task belongs to
    pub categories: Vec<Uuid>,

    /// Urgency/importance classification
    pub priority: TaskPriority,

    /// When the task is due
    pub deadline: DateTime<Utc>,

    /// Completion status
    pub status: TaskStatus,
}

/// Input for creating a new task
///
/// The owner is always the authenticated user; `category_ids` must already
/// be validated against that user's categories (see
/// [`crate::models::category::Category::filter_owned`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owning user (always taken from the authenticated session)
    pub user_id: Uuid,

    /// Task title
    pub title: String,

    /// Free-text description
    pub description: String,

    /// Urgency/importance classification
    pub priority: TaskPriority,

    /// When the task is due
    pub deadline: DateTime<Utc>,

    /// Categories to associate the task with
    pub category_ids: Vec<Uuid>,
}

/// Input for replacing a task's editable fields
///
/// Edits are whole-form: every editable field is submitted, mirroring the
/// edit page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: String,

    /// New description
    pub description: String,

    /// New priority
    pub priority: TaskPriority,

    /// New deadline
    pub deadline: DateTime<Utc>,

    /// New status
    pub status: TaskStatus,

    /// Replacement set of category memberships
    pub category_ids: Vec<Uuid>,
}

impl Task {
    /// Creates a new task with its category memberships
    ///
    /// Runs in a single transaction: the task row and its
    /// `task_categories` rows commit together or not at all.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner already has a task with this title
    /// (unique constraint violation) or the database operation fails
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, user_id, priority, deadline)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, user_id, priority, deadline, status,
                      created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.user_id)
        .bind(data.priority)
        .bind(data.deadline)
        .fetch_one(&mut *tx)
        .await?;

        replace_categories(&mut tx, task.id, &data.category_ids).await?;

        tx.commit().await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, user_id, priority, deadline, status,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists a user's tasks, deadline ascending
    ///
    /// This is the default ordering for every listing.
    pub async fn list_by_owner(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, user_id, priority, deadline, status,
                   created_at, updated_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY deadline ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists the tasks belonging to a category, deadline ascending
    pub async fn list_by_category(
        pool: &PgPool,
        category_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT t.id, t.title, t.description, t.user_id, t.priority, t.deadline,
                   t.status, t.created_at, t.updated_at
            FROM tasks t
            JOIN task_categories tc ON tc.task_id = t.id
            WHERE tc.category_id = $1
            ORDER BY t.deadline ASC
            "#,
        )
        .bind(category_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Loads the categories this task belongs to, name ascending
    pub async fn categories(
        pool: &PgPool,
        task_id: Uuid,
    ) -> Result<Vec<crate::models::category::Category>, sqlx::Error> {
        let categories = sqlx::query_as::<_, crate::models::category::Category>(
            r#"
            SELECT c.id, c.name, c.user_id, c.created_at, c.updated_at
            FROM categories c
            JOIN task_categories tc ON tc.category_id = c.id
            WHERE tc.task_id = $1
            ORDER BY c.name ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    /// Replaces a task's editable fields and category memberships
    ///
    /// Runs in a single transaction, like [`Task::create`].
    ///
    /// # Returns
    ///
    /// The updated task if found, None if the task doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if the new title collides with another of the
    /// owner's tasks, or the database operation fails
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $2,
                description = $3,
                priority = $4,
                deadline = $5,
                status = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, user_id, priority, deadline, status,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.priority)
        .bind(data.deadline)
        .bind(data.status)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(task) = task else {
            tx.rollback().await?;
            return Ok(None);
        };

        replace_categories(&mut tx, task.id, &data.category_ids).await?;

        tx.commit().await?;

        Ok(Some(task))
    }

    /// Deletes a task
    ///
    /// Association rows in `task_categories` go with it via CASCADE.
    ///
    /// # Returns
    ///
    /// True if the task was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts a user's tasks
    pub async fn count_by_owner(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Exports a user's tasks as serializable records, deadline ascending
    ///
    /// Each record carries the task fields plus the ids of its categories,
    /// aggregated in one query.
    pub async fn export_by_owner(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<TaskExport>, sqlx::Error> {
        let records = sqlx::query_as::<_, TaskExport>(
            r#"
            SELECT t.id, t.title, t.description,
                   COALESCE(
                       array_agg(tc.category_id) FILTER (WHERE tc.category_id IS NOT NULL),
                       ARRAY[]::uuid[]
                   ) AS categories,
                   t.priority, t.deadline, t.status
            FROM tasks t
            LEFT JOIN task_categories tc ON tc.task_id = t.id
            WHERE t.user_id = $1
            GROUP BY t.id
            ORDER BY t.deadline ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}

/// Replaces the `task_categories` rows for a task inside a transaction
async fn replace_categories(
    tx: &mut Transaction<'_, Postgres>,
    task_id: Uuid,
    category_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM task_categories WHERE task_id = $1")
        .bind(task_id)
        .execute(&mut **tx)
        .await?;

    if !category_ids.is_empty() {
        sqlx::query(
            r#"
            INSERT INTO task_categories (task_id, category_id)
            SELECT $1, unnest($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(task_id)
        .bind(category_ids)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}
