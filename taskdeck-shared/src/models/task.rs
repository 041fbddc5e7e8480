/// Task model, database operations, and the list query engine
///
/// Tasks are the core entity of Taskdeck. Every task belongs to exactly one
/// user, and every operation in this module is scoped to an owner id: a task
/// that exists under a different owner is indistinguishable from one that
/// does not exist at all.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     priority VARCHAR(16) NOT NULL DEFAULT 'medium',
///     category VARCHAR(255),
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::task::{CreateTask, Priority, Task, TaskListQuery};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, 42, CreateTask {
///     title: "Write report".to_string(),
///     description: None,
///     priority: Priority::High,
///     category: Some("work".to_string()),
///     completed: false,
/// }).await?;
///
/// let tasks = Task::list(&pool, 42, &TaskListQuery::default()).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::PgPool;

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Highest urgency
    High,

    /// Default urgency
    #[default]
    Medium,

    /// Lowest urgency
    Low,
}

impl Priority {
    /// Converts priority to its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// Completion status filter for task listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// No completion filter
    #[default]
    All,

    /// Only tasks with the completion flag unset
    Pending,

    /// Only tasks with the completion flag set
    Completed,
}

/// Field a task listing is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Creation timestamp (the default)
    #[default]
    CreatedAt,

    /// Priority, sorted by its stored string form. This is lexicographic
    /// ("high" < "low" < "medium"), not severity order.
    Priority,

    /// Title
    Title,
}

impl SortBy {
    /// Column name for the ORDER BY clause
    fn column(&self) -> &'static str {
        match self {
            SortBy::CreatedAt => "created_at",
            SortBy::Priority => "priority",
            SortBy::Title => "title",
        }
    }
}

/// Direction of a task listing sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    Asc,

    /// Descending (the default)
    #[default]
    Desc,
}

impl SortOrder {
    /// SQL keyword for the ORDER BY clause
    fn sql_keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Parameters of a task listing, deserialized from the request query string
///
/// Unset optional parameters apply no filter. `search` matches
/// case-insensitively as a substring of title OR description; a match in
/// either field includes the task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskListQuery {
    /// Completion status filter (default: all)
    #[serde(default)]
    pub status: StatusFilter,

    /// Exact priority filter
    pub priority: Option<Priority>,

    /// Exact category filter
    pub category: Option<String>,

    /// Case-insensitive substring search over title and description
    pub search: Option<String>,

    /// Sort field (default: createdAt)
    #[serde(default)]
    pub sort_by: SortBy,

    /// Sort direction (default: desc)
    #[serde(default)]
    pub sort_order: SortOrder,
}

/// Task model representing one personal task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task id
    pub id: i64,

    /// Owning user id
    pub user_id: i64,

    /// Title (non-empty)
    pub title: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// Priority in stored string form ("high", "medium", "low")
    pub priority: String,

    /// Optional free-text category
    pub category: Option<String>,

    /// Completion flag
    pub completed: bool,

    /// When the task was created (set once)
    pub created_at: DateTime<Utc>,

    /// When the task was last mutated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Title (non-empty)
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Priority (default: medium)
    #[serde(default)]
    pub priority: Priority,

    /// Optional category
    pub category: Option<String>,

    /// Completion flag (default: false)
    #[serde(default)]
    pub completed: bool,
}

/// Input for partially updating a task
///
/// `None` leaves a column untouched. For the nullable columns, an explicit
/// JSON `null` deserializes to `Some(None)` and clears the stored value,
/// while an absent key stays `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description (`Some(None)` clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    /// New priority
    pub priority: Option<Priority>,

    /// New category (`Some(None)` clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,

    /// New completion flag
    pub completed: Option<bool>,
}

/// Deserializes a present-but-possibly-null field into `Some(inner)`
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

const TASK_COLUMNS: &str =
    "id, user_id, title, description, priority, category, completed, created_at, updated_at";

/// Builds the SELECT statement for a task listing
///
/// Bind slots are allocated in a fixed order: $1 = owner id, then priority,
/// category, and search in that order for whichever filters are set. The
/// search pattern is bound once and reused for both title and description.
/// The trailing `id ASC` key makes the sort stable: ties are broken by
/// insertion order.
fn build_list_sql(query: &TaskListQuery) -> String {
    let mut sql = format!("SELECT {} FROM tasks WHERE user_id = $1", TASK_COLUMNS);
    let mut bind_count = 1;

    match query.status {
        StatusFilter::All => {}
        StatusFilter::Pending => sql.push_str(" AND completed = FALSE"),
        StatusFilter::Completed => sql.push_str(" AND completed = TRUE"),
    }

    if query.priority.is_some() {
        bind_count += 1;
        sql.push_str(&format!(" AND priority = ${}", bind_count));
    }

    if query.category.is_some() {
        bind_count += 1;
        sql.push_str(&format!(" AND category = ${}", bind_count));
    }

    if query.search.is_some() {
        bind_count += 1;
        sql.push_str(&format!(
            " AND (title ILIKE ${} OR description ILIKE ${})",
            bind_count, bind_count
        ));
    }

    sql.push_str(&format!(
        " ORDER BY {} {}, id ASC",
        query.sort_by.column(),
        query.sort_order.sql_keyword()
    ));

    sql
}

impl Task {
    /// Creates a new task owned by `owner_id`
    ///
    /// The id and both timestamps are assigned by the database.
    pub async fn create(
        pool: &PgPool,
        owner_id: i64,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (user_id, title, description, priority, category, completed)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            TASK_COLUMNS
        ))
        .bind(owner_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.priority.as_str())
        .bind(data.category)
        .bind(data.completed)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks owned by `owner_id`, filtered and sorted per `query`
    ///
    /// Applies, in order: completion status, exact priority match, exact
    /// category match, then the substring search over title OR description.
    /// Sorting is by the chosen column and direction with insertion-order
    /// tie-break.
    pub async fn list(
        pool: &PgPool,
        owner_id: i64,
        query: &TaskListQuery,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = build_list_sql(query);

        let mut q = sqlx::query_as::<_, Task>(&sql).bind(owner_id);

        if let Some(priority) = query.priority {
            q = q.bind(priority.as_str());
        }
        if let Some(ref category) = query.category {
            q = q.bind(category);
        }
        if let Some(ref search) = query.search {
            q = q.bind(format!("%{}%", search));
        }

        let tasks = q.fetch_all(pool).await?;

        Ok(tasks)
    }

    /// Finds a task by id, scoped to its owner
    ///
    /// Returns `None` when the task is absent OR owned by a different user;
    /// callers cannot tell the two apart.
    pub async fn find_by_id_and_owner(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Partially updates a task, scoped to its owner
    ///
    /// Only fields present in `data` are written; `updated_at` is always
    /// refreshed, even for an empty update. Returns `None` when the task is
    /// absent or not owned by `owner_id`.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the UPDATE statement from whichever fields are present
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.category.is_some() {
            bind_count += 1;
            query.push_str(&format!(", category = ${}", bind_count));
        }
        if data.completed.is_some() {
            bind_count += 1;
            query.push_str(&format!(", completed = ${}", bind_count));
        }

        query.push_str(&format!(
            " WHERE id = $1 AND user_id = $2 RETURNING {}",
            TASK_COLUMNS
        ));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id).bind(owner_id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority.as_str());
        }
        if let Some(category) = data.category {
            q = q.bind(category);
        }
        if let Some(completed) = data.completed {
            q = q.bind(completed);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task, scoped to its owner
    ///
    /// Returns `true` if a row was deleted, `false` when the task is absent
    /// or not owned by `owner_id`.
    pub async fn delete(pool: &PgPool, id: i64, owner_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flips the completion flag, scoped to the owner
    ///
    /// Refreshes `updated_at` and returns the task in its new state, or
    /// `None` when the task is absent or not owned by `owner_id`.
    pub async fn toggle_completed(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET completed = NOT completed, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }
}
