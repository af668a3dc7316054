use std::sync::Arc;

use crate::error::AppError;
use crate::models::{Task, TaskFields};
use crate::repository::TaskRepository;

/// Task operations. Every call is forwarded to the repository as is; field
/// mapping and due-date parsing happen there.
///
/// TODO: decide whether status/priority should be restricted to known values
/// and whether the owner should be checked before insert instead of relying on
/// the foreign key.
#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_task_by_id(&self, id: i64) -> Result<Task, AppError> {
        self.repo.get_task_by_id(id).await
    }

    pub async fn list_task_by_user(&self, user_id: i64) -> Result<Vec<Task>, AppError> {
        self.repo.list_tasks_by_user(user_id).await
    }

    pub async fn create_task(&self, fields: TaskFields, user_id: i64) -> Result<Task, AppError> {
        self.repo.create_task(fields, user_id).await
    }

    pub async fn update_task(&self, id: i64, fields: TaskFields) -> Result<Task, AppError> {
        self.repo.update_task(id, fields).await
    }

    pub async fn update_status(&self, id: i64, status: &str) -> Result<Task, AppError> {
        self.repo.update_status(id, status).await
    }

    pub async fn delete_task(&self, id: i64) -> Result<(), AppError> {
        self.repo.delete_task(id).await
    }
}
