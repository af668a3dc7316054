use crate::{
    auth::Identity,
    error::AppError,
    models::{CreateUserRequest, UpdateUserRequest},
    routes::Operation,
    services::UserService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Register user
///
/// Public. Hashes the password and stores the account.
///
/// ## Responses:
/// - `201 Created`: the stored user, without the password hash.
/// - `400 Bad Request`: malformed body, short password or invalid email.
/// - `500 Internal Server Error`: storage failure, including a duplicate email.
#[post("/users")]
pub async fn create_user(
    users: web::Data<UserService>,
    user_data: web::Json<CreateUserRequest>,
) -> Result<impl Responder, AppError> {
    user_data.validate()?;

    let user = users
        .create_user(&user_data.username, &user_data.email, &user_data.password)
        .await
        .map_err(|e| Operation::CreateUser.map_error(e))?;
    log::info!("created user {}", user.id);

    Ok(HttpResponse::Created().json(user))
}

#[get("/{id}")]
pub async fn get_user(
    users: web::Data<UserService>,
    path: web::Path<i64>,
    identity: Identity,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    log::debug!("user {} reads user {}", identity.user_id, id);

    let user = users
        .get_user(id)
        .await
        .map_err(|e| Operation::GetUser.map_error(e))?;
    Ok(HttpResponse::Ok().json(user))
}

#[put("/{id}")]
pub async fn update_user(
    users: web::Data<UserService>,
    path: web::Path<i64>,
    user_data: web::Json<UpdateUserRequest>,
    identity: Identity,
) -> Result<impl Responder, AppError> {
    user_data.validate()?;
    let id = path.into_inner();
    log::debug!("user {} updates user {}", identity.user_id, id);

    let user = users
        .update_user(id, &user_data.username, &user_data.email)
        .await
        .map_err(|e| Operation::UpdateUser.map_error(e))?;
    Ok(HttpResponse::Ok().json(user))
}

/// Delete user
///
/// Succeeds whether or not the user existed. Their tasks go with them.
#[delete("/{id}")]
pub async fn delete_user(
    users: web::Data<UserService>,
    path: web::Path<i64>,
    identity: Identity,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    users
        .delete_user(id)
        .await
        .map_err(|e| Operation::DeleteUser.map_error(e))?;
    log::info!("user {} deleted user {}", identity.user_id, id);

    Ok(HttpResponse::Ok().json(json!({ "message": "user deleted" })))
}
