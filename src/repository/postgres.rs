use async_trait::async_trait;
use sqlx::PgPool;

use super::{TaskRecord, TaskRepository, UserRepository, COMPLETED_STATUS};
use crate::error::AppError;
use crate::models::{Task, TaskFields, User};

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";
const TASK_COLUMNS: &str =
    "id, title, description, status, priority, user_id, due_date, completed_at, updated_at";

/// `UserRepository` backed by the `users` table.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_user_by_id(&self, id: i64) -> Result<User, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_user(&self, id: i64, username: &str, email: &str) -> Result<User, AppError> {
        let sql = format!(
            "UPDATE users SET username = $2, email = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(username)
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// `TaskRepository` backed by the `tasks` table.
#[derive(Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn get_task_by_id(&self, id: i64) -> Result<Task, AppError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(task)
    }

    async fn list_tasks_by_user(&self, user_id: i64) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY id",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn create_task(&self, fields: TaskFields, user_id: i64) -> Result<Task, AppError> {
        let record = TaskRecord::try_from(fields)?;
        let sql = format!(
            "INSERT INTO tasks (title, description, status, priority, user_id, due_date, completed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, CASE WHEN $3 = $7 THEN NOW() END) \
             RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(record.title)
            .bind(record.description)
            .bind(record.status)
            .bind(record.priority)
            .bind(user_id)
            .bind(record.due_date)
            .bind(COMPLETED_STATUS)
            .fetch_one(&self.pool)
            .await?;
        Ok(task)
    }

    async fn update_task(&self, id: i64, fields: TaskFields) -> Result<Task, AppError> {
        let record = TaskRecord::try_from(fields)?;
        let sql = format!(
            "UPDATE tasks SET title = $2, description = $3, status = $4, priority = $5, \
             due_date = $6, updated_at = NOW(), \
             completed_at = CASE WHEN $4 = $7 THEN COALESCE(completed_at, NOW()) END \
             WHERE id = $1 RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(record.title)
            .bind(record.description)
            .bind(record.status)
            .bind(record.priority)
            .bind(record.due_date)
            .bind(COMPLETED_STATUS)
            .fetch_one(&self.pool)
            .await?;
        Ok(task)
    }

    async fn update_status(&self, id: i64, status: &str) -> Result<Task, AppError> {
        let sql = format!(
            "UPDATE tasks SET status = $2, updated_at = NOW(), \
             completed_at = CASE WHEN $2 = $3 THEN COALESCE(completed_at, NOW()) END \
             WHERE id = $1 RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(super::non_empty(status.to_string()))
            .bind(COMPLETED_STATUS)
            .fetch_one(&self.pool)
            .await?;
        Ok(task)
    }

    async fn delete_task(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
