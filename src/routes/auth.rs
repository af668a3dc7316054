use crate::{
    auth::{AuthResponse, LoginRequest, RefreshRequest, RefreshResponse, TokenManager},
    error::AppError,
    routes::Operation,
    services::UserService,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Login user
///
/// Checks the credentials and returns a session token.
///
/// ## Responses:
/// - `200 OK`: `{"token": ..., "user_id": ...}`.
/// - `400 Bad Request`: malformed body or email.
/// - `401 Unauthorized`: unknown email or wrong password.
#[post("/login")]
pub async fn login(
    users: web::Data<UserService>,
    tokens: web::Data<TokenManager>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = users
        .authenticate(&login_data.email, &login_data.password)
        .await
        .map_err(|e| Operation::Login.map_error(e))?;

    let token = tokens
        .generate_token(user.id, &user.email, &user.username)
        .map_err(|e| Operation::Login.map_error(e))?;
    log::info!("user {} logged in", user.id);

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user_id: user.id,
    }))
}

/// Refresh token
///
/// Exchanges a valid, unexpired token for a new one with a fresh expiry.
#[post("/refresh")]
pub async fn refresh(
    tokens: web::Data<TokenManager>,
    refresh_data: web::Json<RefreshRequest>,
) -> Result<impl Responder, AppError> {
    refresh_data.validate()?;

    let token = tokens.refresh_token(&refresh_data.token).map_err(|e| {
        log::debug!("refresh rejected: {}", e);
        Operation::Refresh.map_error(match e {
            AppError::Unauthorized(_) => AppError::Unauthorized("invalid token".into()),
            other => other,
        })
    })?;

    Ok(HttpResponse::Ok().json(RefreshResponse { token }))
}
