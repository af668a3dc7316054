use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{non_empty, TaskRecord, TaskRepository, UserRepository, COMPLETED_STATUS};
use crate::error::AppError;
use crate::models::{Task, TaskFields, User};

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<i64, User>,
    tasks: BTreeMap<i64, Task>,
    last_user_id: i64,
    last_task_id: i64,
}

/// In-process implementation of both repositories.
///
/// Mirrors the constraints of the Postgres schema: unique email, a task's
/// owner must exist, and deleting a user deletes their tasks. Cloning shares
/// the same underlying data.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn row_not_found() -> AppError {
    AppError::NotFound("record not found".into())
}

fn email_taken(state: &State, email: &str, except_id: Option<i64>) -> bool {
    state
        .users
        .values()
        .any(|u| u.email == email && Some(u.id) != except_id)
}

fn unique_violation() -> AppError {
    AppError::DatabaseError(
        "duplicate key value violates unique constraint \"users_email_key\"".into(),
    )
}

fn completed_at_for(status: Option<&str>, previous: Option<&Task>) -> Option<chrono::DateTime<Utc>> {
    if status != Some(COMPLETED_STATUS) {
        return None;
    }
    previous
        .and_then(|task| task.completed_at)
        .or_else(|| Some(Utc::now()))
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn get_user_by_id(&self, id: i64) -> Result<User, AppError> {
        let state = self.state.read().await;
        state.users.get(&id).cloned().ok_or_else(row_not_found)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, AppError> {
        let state = self.state.read().await;
        state
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(row_not_found)
    }

    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let mut state = self.state.write().await;
        if email_taken(&state, email, None) {
            return Err(unique_violation());
        }

        state.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.last_user_id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: i64, username: &str, email: &str) -> Result<User, AppError> {
        let mut state = self.state.write().await;
        if email_taken(&state, email, Some(id)) {
            return Err(unique_violation());
        }

        let user = state.users.get_mut(&id).ok_or_else(row_not_found)?;
        user.username = username.to_string();
        user.email = email.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        if state.users.remove(&id).is_some() {
            state.tasks.retain(|_, task| task.user_id != id);
        }
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn get_task_by_id(&self, id: i64) -> Result<Task, AppError> {
        let state = self.state.read().await;
        state.tasks.get(&id).cloned().ok_or_else(row_not_found)
    }

    async fn list_tasks_by_user(&self, user_id: i64) -> Result<Vec<Task>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_task(&self, fields: TaskFields, user_id: i64) -> Result<Task, AppError> {
        let record = TaskRecord::try_from(fields)?;
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user_id) {
            return Err(AppError::DatabaseError(
                "insert or update on table \"tasks\" violates foreign key constraint \"tasks_user_id_fkey\"".into(),
            ));
        }

        state.last_task_id += 1;
        let task = Task {
            id: state.last_task_id,
            completed_at: completed_at_for(record.status.as_deref(), None),
            title: record.title,
            description: record.description,
            status: record.status,
            priority: record.priority,
            user_id,
            due_date: record.due_date,
            updated_at: Utc::now(),
        };
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: i64, fields: TaskFields) -> Result<Task, AppError> {
        let record = TaskRecord::try_from(fields)?;
        let mut state = self.state.write().await;
        let task = state.tasks.get_mut(&id).ok_or_else(row_not_found)?;

        task.completed_at = completed_at_for(record.status.as_deref(), Some(&*task));
        task.title = record.title;
        task.description = record.description;
        task.status = record.status;
        task.priority = record.priority;
        task.due_date = record.due_date;
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn update_status(&self, id: i64, status: &str) -> Result<Task, AppError> {
        let status = non_empty(status.to_string());
        let mut state = self.state.write().await;
        let task = state.tasks.get_mut(&id).ok_or_else(row_not_found)?;

        task.completed_at = completed_at_for(status.as_deref(), Some(&*task));
        task.status = status;
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn delete_task(&self, id: i64) -> Result<(), AppError> {
        self.state.write().await.tasks.remove(&id);
        Ok(())
    }
}
