use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::extractors::Identity;
use crate::auth::token::TokenManager;
use crate::error::AppError;

/// Rejects requests without a valid `Authorization: Bearer <token>` header and
/// injects the caller's [`Identity`] into the request otherwise.
///
/// Reads the shared `web::Data<TokenManager>` registered on the app.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req) {
            Ok(identity) => {
                req.extensions_mut().insert(identity);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => {
                log::warn!("rejected {} {}: {}", req.method(), req.path(), err);
                let response = req.into_response(err.error_response()).map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

fn authenticate(req: &ServiceRequest) -> Result<Identity, AppError> {
    let tokens = req
        .app_data::<web::Data<TokenManager>>()
        .ok_or_else(|| AppError::InternalServerError("token manager not configured".into()))?;

    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("missing authorization header".into()))?;
    let value = value
        .to_str()
        .map_err(|_| AppError::Unauthorized("invalid authorization format".into()))?;

    let token = parse_bearer(value)?;

    let claims = tokens.validate_token(token).map_err(|e| {
        log::debug!("token validation failed: {}", e);
        AppError::Unauthorized("invalid token".into())
    })?;

    Ok(Identity::from(claims))
}

/// Extracts the token from a header of the exact form `Bearer <token>`:
/// two space-separated parts, the first being the literal `Bearer`.
pub fn parse_bearer(value: &str) -> Result<&str, AppError> {
    if value.is_empty() {
        return Err(AppError::Unauthorized("missing authorization header".into()));
    }
    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        ["Bearer", token] => Ok(*token),
        _ => Err(AppError::Unauthorized("invalid authorization format".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App, HttpResponse};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const SECRET: &str = "middleware_test_secret";

    async fn whoami(identity: Identity) -> HttpResponse {
        HttpResponse::Ok().json(identity)
    }

    #[::core::prelude::v1::test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(parse_bearer("").is_err());
        assert!(parse_bearer("Bearer").is_err());
        assert!(parse_bearer("bearer abc").is_err());
        assert!(parse_bearer("Token abc").is_err());
        assert!(parse_bearer("Bearer abc def").is_err());
        assert!(parse_bearer("Bearer  abc").is_err());
    }

    #[test_log::test(actix_rt::test)]
    async fn test_middleware_states() {
        let tokens = TokenManager::new(SECRET, 24);
        let valid = tokens.generate_token(42, "neo@example.com", "neo").unwrap();
        let expired = TokenManager::new(SECRET, -1)
            .generate_token(42, "neo@example.com", "neo")
            .unwrap();

        let app = test::init_service(
            App::new().app_data(web::Data::new(tokens)).service(
                web::scope("/private")
                    .wrap(AuthMiddleware)
                    .route("/me", web::get().to(whoami)),
            ),
        )
        .await;

        let rejected = [
            (None, "missing authorization header"),
            (Some("Basic dXNlcjpwYXNz".to_string()), "invalid authorization format"),
            (Some(format!("Bearer {} extra", valid)), "invalid authorization format"),
            (Some("Bearer not-a-token".to_string()), "invalid token"),
            (Some(format!("Bearer {}", expired)), "invalid token"),
        ];

        for (header_value, message) in rejected {
            let mut req = test::TestRequest::get().uri("/private/me");
            if let Some(value) = &header_value {
                req = req.insert_header((header::AUTHORIZATION, value.as_str()));
            }
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{:?}", header_value);
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({ "error": message }));
        }

        let req = test::TestRequest::get()
            .uri("/private/me")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", valid)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({ "user_id": 42, "email": "neo@example.com", "username": "neo" })
        );
    }
}
