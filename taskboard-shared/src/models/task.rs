/// Task model and database operations
///
/// Tasks are the records a board tracks: a title, an optional
/// description, a status, the user who created them, and optionally the
/// user they are assigned to.
///
/// # State Machine
///
/// The status machine is deliberately permissive: any status may move to
/// any other status in `{Todo, InProgress, Done}`. The only validation is
/// set membership, performed before any mutation. Callers, not the
/// system, enforce workflow discipline; do not add ordering constraints.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('Todo', 'InProgress', 'Done');
///
/// CREATE TABLE tasks (
///     id                  BIGSERIAL PRIMARY KEY,
///     title               TEXT NOT NULL,
///     description         TEXT,
///     status              task_status NOT NULL DEFAULT 'Todo',
///     created_by_user_id  BIGINT NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
///     assigned_to_user_id BIGINT REFERENCES users(id) ON DELETE SET NULL,
///     created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::str::FromStr;

/// Task status
///
/// The fixed three-value set. Anything else is rejected before any
/// mutation happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    /// Not started
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

/// Requested status is not one of Todo, InProgress, Done
#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid status. Must be: Todo, InProgress, or Done")]
pub struct InvalidStatus;

impl TaskStatus {
    /// Converts status to its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "Todo",
            TaskStatus::InProgress => "InProgress",
            TaskStatus::Done => "Done",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Todo" => Ok(TaskStatus::Todo),
            "InProgress" => Ok(TaskStatus::InProgress),
            "Done" => Ok(TaskStatus::Done),
            _ => Err(InvalidStatus),
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Title, required and non-empty
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// User who created the task; immutable after creation
    pub created_by_user_id: i64,

    /// User the task is assigned to, if any
    pub assigned_to_user_id: Option<i64>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Acting user, taken from the request's auth context
    pub created_by_user_id: i64,
}

/// Task row joined with creator and assignee usernames
///
/// This is the wire shape for task listings. An unassigned task carries
/// null `assignedToUserId`/`assignedToUsername` fields, never an error
/// and never an omitted field.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithUsers {
    /// Task ID
    pub id: i64,

    /// Title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// Creator's user ID
    pub created_by_user_id: i64,

    /// Creator's username (creator always exists, RESTRICT guarantees it)
    pub created_by_username: String,

    /// Assignee's user ID, if assigned
    pub assigned_to_user_id: Option<i64>,

    /// Assignee's username, if assigned
    pub assigned_to_username: Option<String>,
}

impl Task {
    /// Creates a new task in Todo status
    ///
    /// Status always starts at the database default; there is no way for
    /// a caller to create a task in any other state.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, created_by_user_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, status, created_by_user_id,
                      assigned_to_user_id, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.created_by_user_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, created_by_user_id,
                   assigned_to_user_id, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks joined with creator and assignee usernames
    ///
    /// The join happens at read time; user rows hold no task collections.
    pub async fn list_with_usernames(pool: &PgPool) -> Result<Vec<TaskWithUsers>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, TaskWithUsers>(
            r#"
            SELECT t.id, t.title, t.description, t.status,
                   t.created_by_user_id, c.username AS created_by_username,
                   t.assigned_to_user_id, a.username AS assigned_to_username
            FROM tasks t
            JOIN users c ON c.id = t.created_by_user_id
            LEFT JOIN users a ON a.id = t.assigned_to_user_id
            ORDER BY t.id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Sets a task's status
    ///
    /// The status has already passed set-membership validation by virtue
    /// of being a [`TaskStatus`]; any current status may move to any
    /// other. A single UPDATE, so concurrent writers serialize on the row.
    ///
    /// Returns `None` if the task does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: i64,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, status, created_by_user_id,
                      assigned_to_user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Sets or clears a task's assignee
    ///
    /// `None` unassigns. Callers validate that the assignee exists before
    /// calling; self-assignment is legal.
    ///
    /// Returns `None` if the task does not exist.
    pub async fn update_assignment(
        pool: &PgPool,
        id: i64,
        user_id: Option<i64>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET assigned_to_user_id = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, status, created_by_user_id,
                      assigned_to_user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Updates a task's title and description
    ///
    /// Status is untouched. An absent description clears the stored one.
    ///
    /// Returns `None` if the task does not exist.
    pub async fn update_fields(
        pool: &PgPool,
        id: i64,
        title: String,
        description: Option<String>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $2,
                description = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, status, created_by_user_id,
                      assigned_to_user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Todo.as_str(), "Todo");
        assert_eq!(TaskStatus::InProgress.as_str(), "InProgress");
        assert_eq!(TaskStatus::Done.as_str(), "Done");
    }

    #[test]
    fn test_task_status_parse_valid() {
        assert_eq!("Todo".parse::<TaskStatus>().unwrap(), TaskStatus::Todo);
        assert_eq!(
            "InProgress".parse::<TaskStatus>().unwrap(),
            TaskStatus::InProgress
        );
        assert_eq!("Done".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
    }

    #[test]
    fn test_task_status_parse_rejects_outside_set() {
        assert!("Bogus".parse::<TaskStatus>().is_err());
        assert!("todo".parse::<TaskStatus>().is_err());
        assert!("".parse::<TaskStatus>().is_err());
        assert!("Cancelled".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_invalid_status_message() {
        let err = "Bogus".parse::<TaskStatus>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid status. Must be: Todo, InProgress, or Done"
        );
    }

    #[test]
    fn test_task_status_serde_wire_values() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            serde_json::json!("InProgress")
        );
        let status: TaskStatus = serde_json::from_value(serde_json::json!("Done")).unwrap();
        assert_eq!(status, TaskStatus::Done);
    }

    #[test]
    fn test_task_with_users_null_assignee_fields_present() {
        let row = TaskWithUsers {
            id: 1,
            title: "Write spec".to_string(),
            description: None,
            status: TaskStatus::Todo,
            created_by_user_id: 1,
            created_by_username: "alice".to_string(),
            assigned_to_user_id: None,
            assigned_to_username: None,
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["assignedToUserId"], serde_json::Value::Null);
        assert_eq!(json["assignedToUsername"], serde_json::Value::Null);
        assert_eq!(json["createdByUsername"], "alice");
    }
}
