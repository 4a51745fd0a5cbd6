//! HTTP surface tests: login, token gating, and config round-trips through
//! the full router.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use telepanel::config::ConfigStore;
use telepanel::dispatch::MessageDispatcher;
use telepanel::server::config::ServerConfig;
use telepanel::web::create_axum_router;

const JWT_SECRET: &str = "integration-test-secret";

struct TestApp {
    router: Router,
    store: Arc<ConfigStore>,
    _dir: TempDir,
}

async fn spawn_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    let images_dir = dir.path().join("images");
    tokio::fs::create_dir_all(&images_dir).await.unwrap();

    let server_config = Arc::new(ServerConfig {
        listen_addr: "127.0.0.1:0".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        config_path: config_path.to_string_lossy().into_owned(),
        images_dir: images_dir.to_string_lossy().into_owned(),
        log_dir: dir.path().join("logs").to_string_lossy().into_owned(),
        dispatch_timeout_secs: 5,
        persist_timeout_secs: 5,
    });

    let store = Arc::new(
        ConfigStore::load(&config_path, Duration::from_secs(5))
            .await
            .unwrap(),
    );
    let dispatcher = MessageDispatcher::new(store.clone(), Duration::from_secs(5));
    let router = create_axum_router(store.clone(), dispatcher, server_config);

    TestApp {
        router,
        store,
        _dir: dir,
    }
}

async fn send_json(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn login_token(router: &Router) -> String {
    let (status, body) = send_json(
        router,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({ "username": "admin", "password": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn login_issues_a_usable_bearer_token() {
    let app = spawn_app().await;
    let token = login_token(&app.router).await;

    let (status, body) = send_json(&app.router, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["username"], "admin");
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected_without_a_token() {
    let app = spawn_app().await;
    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({ "username": "admin", "password": "wrong" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn protected_routes_distinguish_missing_and_invalid_tokens() {
    let app = spawn_app().await;

    let (status, body) = send_json(&app.router, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "authentication required");

    let (status, body) =
        send_json(&app.router, "GET", "/api/auth/me", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "token is invalid or has expired");
}

#[tokio::test]
async fn telegram_config_update_requires_auth_and_persists() {
    let app = spawn_app().await;

    let (status, _) = send_json(
        &app.router,
        "PUT",
        "/api/config/telegram",
        None,
        Some(serde_json::json!({ "bot_token": "1:X", "chat_id": "2" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = login_token(&app.router).await;
    let (status, body) = send_json(
        &app.router,
        "PUT",
        "/api/config/telegram",
        Some(&token),
        Some(serde_json::json!({ "bot_token": "99:TOKEN", "chat_id": "-100555" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let telegram = app.store.telegram().await;
    assert_eq!(telegram.bot_token, "99:TOKEN");
    assert_eq!(telegram.chat_id, "-100555");

    let (status, body) = send_json(
        &app.router,
        "GET",
        "/api/config/telegram",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["bot_token"], "99:TOKEN");
}

#[tokio::test]
async fn limits_are_public_to_read_and_gated_to_write() {
    let app = spawn_app().await;

    let (status, body) = send_json(&app.router, "GET", "/api/config/limits", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["text_limit"], 5);
    assert_eq!(body["data"]["text_window_secs"], 300);
    assert_eq!(body["data"]["media_limit"], 3);
    assert_eq!(body["data"]["media_window_secs"], 300);

    let (status, _) = send_json(
        &app.router,
        "PUT",
        "/api/config/limits",
        None,
        Some(serde_json::json!({
            "text_limit": 1, "text_window_secs": 1,
            "media_limit": 1, "media_window_secs": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn partial_profile_update_only_touches_named_fields() {
    let app = spawn_app().await;
    let token = login_token(&app.router).await;

    let (status, _) = send_json(
        &app.router,
        "PUT",
        "/api/profile",
        Some(&token),
        Some(serde_json::json!({ "cover_image": "/api/images/new.jpg" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(&app.router, "GET", "/api/profile", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cover_image"], "/api/images/new.jpg");
    assert_eq!(body["data"]["avatar_image"], "/default_avatar.jpg");
    assert_eq!(body["data"]["display_name"], "Admin User");
}

#[tokio::test]
async fn empty_text_message_is_rejected_before_dispatch() {
    let app = spawn_app().await;
    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/messages/text",
        None,
        Some(serde_json::json!({ "text": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn text_dispatch_without_provider_credentials_fails_cleanly() {
    let app = spawn_app().await;
    // Fresh store: telegram section is empty.
    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/messages/text",
        None,
        Some(serde_json::json!({ "text": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "telegram credentials are not configured");
}
