pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;

use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers every route. `POST /users`, `/login`, `/refresh` and `/health`
/// are public; the `/users/{id}` and `/tasks` scopes require a bearer token.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(health::health)
        .service(auth::login)
        .service(auth::refresh)
        .service(users::create_user)
        .service(
            web::scope("/users")
                .wrap(AuthMiddleware)
                .service(users::get_user)
                .service(users::update_user)
                .service(users::delete_user)
                .service(tasks::list_user_tasks),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::update_status)
                .service(tasks::delete_task),
        );
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, req| AppError::BadRequest(format!("invalid id in {}", req.path())).into())
}

/// The API operations, each with its own failure reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Refresh,
    CreateUser,
    GetUser,
    UpdateUser,
    DeleteUser,
    CreateTask,
    GetTask,
    ListTasks,
    UpdateTask,
    UpdateStatus,
    DeleteTask,
}

impl Operation {
    /// Error reported when the operation fails for a reason that is not the
    /// caller's fault. Read-by-id lookups report not found.
    fn fallback(self) -> AppError {
        let internal = |msg: &str| AppError::InternalServerError(msg.to_string());
        match self {
            Operation::Login => internal("failed to log in"),
            Operation::Refresh => internal("failed to refresh token"),
            Operation::CreateUser => internal("failed to create user"),
            Operation::GetUser => AppError::NotFound("user not found".into()),
            Operation::UpdateUser => internal("failed to update user"),
            Operation::DeleteUser => internal("failed to delete user"),
            Operation::CreateTask => internal("failed to create task"),
            Operation::GetTask => AppError::NotFound("task not found".into()),
            Operation::ListTasks => internal("failed to list tasks"),
            Operation::UpdateTask => internal("failed to update task"),
            Operation::UpdateStatus => internal("failed to update status"),
            Operation::DeleteTask => internal("failed to delete task"),
        }
    }

    /// Maps a service error to the response for this operation: caller errors
    /// (400, 401) pass through, everything else becomes the fallback.
    pub fn map_error(self, err: AppError) -> AppError {
        if err.is_client_error() {
            return err;
        }
        let fallback = self.fallback();
        match fallback {
            AppError::NotFound(_) => log::debug!("{:?} failed: {}", self, err),
            _ => log::error!("{:?} failed: {}", self, err),
        }
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_client_errors_pass_through() {
        let err = Operation::CreateTask.map_error(AppError::BadRequest("invalid due_date".into()));
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "invalid due_date"));

        let err = Operation::CreateUser.map_error(AppError::ValidationError("invalid email format".into()));
        assert_eq!(err.status_code(), 400);

        let err = Operation::Login.map_error(AppError::Unauthorized("invalid credentials".into()));
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn test_reads_by_id_report_not_found() {
        for (op, message) in [
            (Operation::GetUser, "user not found"),
            (Operation::GetTask, "task not found"),
        ] {
            for err in [
                AppError::NotFound("record not found".into()),
                AppError::DatabaseError("connection reset".into()),
            ] {
                match op.map_error(err) {
                    AppError::NotFound(msg) => assert_eq!(msg, message),
                    other => panic!("{:?}: unexpected {:?}", op, other),
                }
            }
        }
    }

    #[test]
    fn test_other_failures_become_internal_errors() {
        let table = [
            (Operation::CreateUser, "failed to create user"),
            (Operation::UpdateUser, "failed to update user"),
            (Operation::DeleteUser, "failed to delete user"),
            (Operation::CreateTask, "failed to create task"),
            (Operation::ListTasks, "failed to list tasks"),
            (Operation::UpdateTask, "failed to update task"),
            (Operation::UpdateStatus, "failed to update status"),
            (Operation::DeleteTask, "failed to delete task"),
        ];
        for (op, message) in table {
            match op.map_error(AppError::NotFound("record not found".into())) {
                AppError::InternalServerError(msg) => assert_eq!(msg, message),
                other => panic!("{:?}: unexpected {:?}", op, other),
            }
            let err = op.map_error(AppError::DatabaseError("duplicate key".into()));
            assert_eq!(err.status_code(), 500);
        }
    }
}
