//! Data access layer.
//!
//! The services depend on the [`UserRepository`] and [`TaskRepository`] traits only.
//! [`postgres`] holds the sqlx implementation used in production and [`memory`]
//! an in-process store with the same mapping rules.
//!
//! Shared rules for both implementations:
//! - empty `description`, `status`, `priority` and `due_date` are stored as `NULL`;
//! - a non-empty `due_date` must be a `YYYY-MM-DD` calendar date;
//! - reads that match no row fail with `AppError::NotFound`;
//! - any other storage failure is returned as `AppError::DatabaseError`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::AppError;
use crate::models::{Task, TaskFields, User};

pub use memory::InMemoryStore;
pub use postgres::{PgTaskRepository, PgUserRepository};

/// Status value that stamps `completed_at` on a task.
pub const COMPLETED_STATUS: &str = "completed";

lazy_static! {
    static ref DUE_DATE_REGEX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user_by_id(&self, id: i64) -> Result<User, AppError>;

    async fn get_user_by_email(&self, email: &str) -> Result<User, AppError>;

    /// Inserts a user. `password_hash` must already be hashed.
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError>;

    async fn update_user(&self, id: i64, username: &str, email: &str) -> Result<User, AppError>;

    /// Deletes a user and, through the foreign key, their tasks.
    /// Deleting a missing id is not an error.
    async fn delete_user(&self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn get_task_by_id(&self, id: i64) -> Result<Task, AppError>;

    async fn list_tasks_by_user(&self, user_id: i64) -> Result<Vec<Task>, AppError>;

    async fn create_task(&self, fields: TaskFields, user_id: i64) -> Result<Task, AppError>;

    async fn update_task(&self, id: i64, fields: TaskFields) -> Result<Task, AppError>;

    async fn update_status(&self, id: i64, status: &str) -> Result<Task, AppError>;

    /// Deleting a missing id is not an error.
    async fn delete_task(&self, id: i64) -> Result<(), AppError>;
}

/// Task fields in storage form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TaskRecord {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl TryFrom<TaskFields> for TaskRecord {
    type Error = AppError;

    fn try_from(fields: TaskFields) -> Result<Self, Self::Error> {
        Ok(Self {
            due_date: parse_due_date(&fields.due_date)?,
            title: fields.title,
            description: non_empty(fields.description),
            status: non_empty(fields.status),
            priority: non_empty(fields.priority),
        })
    }
}

/// Empty input means "absent".
pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Parses the wire form of a due date: `""` is no due date, anything else must
/// be a real calendar date written exactly as `YYYY-MM-DD`.
pub fn parse_due_date(raw: &str) -> Result<Option<NaiveDate>, AppError> {
    if raw.is_empty() {
        return Ok(None);
    }
    let invalid = || {
        AppError::BadRequest(format!(
            "invalid due_date format {:?}, expected YYYY-MM-DD",
            raw
        ))
    };
    if !DUE_DATE_REGEX.is_match(raw) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_due_date() {
        assert_eq!(parse_due_date("").unwrap(), None);
        assert_eq!(
            parse_due_date("2024-12-31").unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
        assert_eq!(
            parse_due_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );

        for raw in [
            "31-12-2024",
            "2024/12/31",
            "2024-1-5",
            "2024-12-31T00:00:00Z",
            " 2024-12-31",
            "2023-02-29",
            "2024-13-01",
            "tomorrow",
        ] {
            match parse_due_date(raw) {
                Err(AppError::BadRequest(msg)) => assert!(msg.contains("YYYY-MM-DD"), "{}", msg),
                other => panic!("{:?} should be rejected, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_empty_fields_become_absent() {
        let record = TaskRecord::try_from(TaskFields {
            title: "Report".into(),
            description: "".into(),
            status: "pending".into(),
            priority: "".into(),
            due_date: "".into(),
        })
        .unwrap();

        assert_eq!(
            record,
            TaskRecord {
                title: "Report".into(),
                description: None,
                status: Some("pending".into()),
                priority: None,
                due_date: None,
            }
        );
    }
}
