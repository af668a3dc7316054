use crate::{
    auth::Identity,
    error::AppError,
    models::{CreateTaskRequest, UpdateStatusRequest, UpdateTaskRequest},
    routes::Operation,
    services::TaskService,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Creates a task.
///
/// The owner comes from the `user_id` field of the body, not from the token.
/// Empty optional fields are stored as null.
///
/// ## Responses:
/// - `201 Created`: the stored task.
/// - `400 Bad Request`: missing title or owner, or a `due_date` not in `YYYY-MM-DD`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `500 Internal Server Error`: storage failure, including an unknown owner.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    task_data: web::Json<CreateTaskRequest>,
    identity: Identity,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let (fields, owner) = task_data.into_inner().into_parts();

    let task = tasks
        .create_task(fields, owner)
        .await
        .map_err(|e| Operation::CreateTask.map_error(e))?;
    log::info!("user {} created task {} for user {}", identity.user_id, task.id, owner);

    Ok(HttpResponse::Created().json(task))
}

#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    path: web::Path<i64>,
    _identity: Identity,
) -> Result<impl Responder, AppError> {
    let task = tasks
        .get_task_by_id(path.into_inner())
        .await
        .map_err(|e| Operation::GetTask.map_error(e))?;
    Ok(HttpResponse::Ok().json(task))
}

/// Lists the tasks owned by a user, in id order. An unknown user yields `[]`.
#[get("/{id}/tasks")]
pub async fn list_user_tasks(
    tasks: web::Data<TaskService>,
    path: web::Path<i64>,
    _identity: Identity,
) -> Result<impl Responder, AppError> {
    let list = tasks
        .list_task_by_user(path.into_inner())
        .await
        .map_err(|e| Operation::ListTasks.map_error(e))?;
    Ok(HttpResponse::Ok().json(list))
}

/// Replaces every editable field of a task. Fields left out are cleared.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskService>,
    path: web::Path<i64>,
    task_data: web::Json<UpdateTaskRequest>,
    identity: Identity,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let id = path.into_inner();
    log::debug!("user {} updates task {}", identity.user_id, id);

    let task = tasks
        .update_task(id, task_data.into_inner().into())
        .await
        .map_err(|e| Operation::UpdateTask.map_error(e))?;
    Ok(HttpResponse::Ok().json(task))
}

#[patch("/{id}/status")]
pub async fn update_status(
    tasks: web::Data<TaskService>,
    path: web::Path<i64>,
    status_data: web::Json<UpdateStatusRequest>,
    _identity: Identity,
) -> Result<impl Responder, AppError> {
    status_data.validate()?;

    let task = tasks
        .update_status(path.into_inner(), &status_data.status)
        .await
        .map_err(|e| Operation::UpdateStatus.map_error(e))?;
    Ok(HttpResponse::Ok().json(task))
}

#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    path: web::Path<i64>,
    identity: Identity,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    tasks
        .delete_task(id)
        .await
        .map_err(|e| Operation::DeleteTask.map_error(e))?;
    log::info!("user {} deleted task {}", identity.user_id, id);

    Ok(HttpResponse::Ok().json(json!({ "message": "task deleted" })))
}
