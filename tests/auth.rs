mod common;

use actix_web::{http::StatusCode, test, App};
use common::{bearer, register_and_login, send, state, SECRET};
use pretty_assertions::assert_eq;
use serde_json::json;
use tasked::auth::TokenManager;

#[test_log::test(actix_rt::test)]
async fn test_login_returns_token_for_identity() {
    let state = state();
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

    let user = register_and_login(&app, "alice", "alice@example.com", "secret123").await;

    let claims = state.tokens.validate_token(&user.token).unwrap();
    assert_eq!(claims.user_id, user.id);
    assert_eq!(claims.email, "alice@example.com");
    assert_eq!(claims.username, "alice");
}

#[test_log::test(actix_rt::test)]
async fn test_login_rejects_bad_credentials() {
    let state = state();
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
    register_and_login(&app, "alice", "alice@example.com", "secret123").await;

    for (email, password) in [
        ("alice@example.com", "wrong-password"),
        ("nobody@example.com", "secret123"),
    ] {
        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid credentials");
    }
}

#[test_log::test(actix_rt::test)]
async fn test_login_with_malformed_email_is_bad_request() {
    let state = state();
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": "not-an-email", "password": "secret123" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[test_log::test(actix_rt::test)]
async fn test_refresh_issues_new_valid_token() {
    let state = state();
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
    let user = register_and_login(&app, "alice", "alice@example.com", "secret123").await;

    let req = test::TestRequest::post()
        .uri("/refresh")
        .set_json(json!({ "token": user.token }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let refreshed = body["token"].as_str().unwrap();
    let claims = state.tokens.validate_token(refreshed).unwrap();
    assert_eq!(claims.user_id, user.id);
}

#[test_log::test(actix_rt::test)]
async fn test_refresh_rejects_expired_token() {
    let state = state();
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
    let expired = TokenManager::new(SECRET, -1)
        .generate_token(1, "alice@example.com", "alice")
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/refresh")
        .set_json(json!({ "token": expired }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid token");
}

#[test_log::test(actix_rt::test)]
async fn test_protected_routes_require_token() {
    let state = state();
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

    let req = test::TestRequest::get().uri("/tasks/1").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing authorization header");

    let req = test::TestRequest::get()
        .uri("/users/1")
        .insert_header(("Authorization", "Token abc"))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid authorization format");

    let req = test::TestRequest::get()
        .uri("/users/1")
        .insert_header(bearer("not.a.jwt"))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[test_log::test(actix_rt::test)]
async fn test_expired_token_is_rejected() {
    let state = state();
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
    let expired = TokenManager::new(SECRET, -1)
        .generate_token(1, "alice@example.com", "alice")
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/tasks/1")
        .insert_header(bearer(&expired))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid token");
}

#[actix_rt::test]
async fn test_health_is_public() {
    let state = state();
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
