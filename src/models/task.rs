use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents a task as stored in the `tasks` table and returned by the API.
///
/// `status` and `priority` are free-form strings (e.g. "pending", "high").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    /// Identifier of the owning user.
    pub user_id: i64,
    /// Calendar due date, serialised as `YYYY-MM-DD`.
    pub due_date: Option<NaiveDate>,
    /// Set when the status becomes `completed`.
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// The editable fields of a task, in their wire form.
///
/// Empty strings mean "absent"; the repository turns them into `NULL`s and
/// parses `due_date`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub due_date: String,
}

/// Payload for `POST /tasks`. `title` and `user_id` are required.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: String,
    #[validate(range(min = 1))]
    pub user_id: i64,
    #[serde(default)]
    pub due_date: String,
}

/// Payload for `PUT /tasks/{id}`. Replaces every editable field.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub due_date: String,
}

/// Payload for `PATCH /tasks/{id}/status`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1))]
    pub status: String,
}

impl CreateTaskRequest {
    /// Splits the payload into the editable fields and the owner id.
    pub fn into_parts(self) -> (TaskFields, i64) {
        let fields = TaskFields {
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
        };
        (fields, self.user_id)
    }
}

impl From<UpdateTaskRequest> for TaskFields {
    fn from(req: UpdateTaskRequest) -> Self {
        TaskFields {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            due_date: req.due_date,
        }
    }
}
