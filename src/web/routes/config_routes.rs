use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use std::sync::Arc;

use crate::config::{AuthSettings, LimitSettings, TelegramSettings};
use crate::web::models::ApiResponse;
use crate::web::{error::AppError, AppState};

pub fn create_public_router() -> Router<Arc<AppState>> {
    // The public front end reads the throttle parameters to pace itself.
    Router::new().route("/limits", get(get_limits))
}

pub fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/telegram", get(get_telegram).put(update_telegram))
        .route("/limits", put(update_limits))
        .route("/auth", put(update_auth))
}

async fn get_telegram(
    State(app_state): State<Arc<AppState>>,
) -> Json<ApiResponse<TelegramSettings>> {
    let settings = app_state.store.telegram().await;
    Json(ApiResponse::with_data("telegram configuration", settings))
}

async fn update_telegram(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<TelegramSettings>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    app_state.store.update_telegram(payload).await?;
    Ok(Json(ApiResponse::message("telegram configuration updated")))
}

async fn get_limits(State(app_state): State<Arc<AppState>>) -> Json<ApiResponse<LimitSettings>> {
    let settings = app_state.store.limits().await;
    Json(ApiResponse::with_data("throttle configuration", settings))
}

async fn update_limits(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<LimitSettings>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    app_state.store.update_limits(payload).await?;
    Ok(Json(ApiResponse::message("throttle configuration updated")))
}

async fn update_auth(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<AuthSettings>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(AppError::InvalidInput(
            "username and password must not be empty".to_string(),
        ));
    }
    app_state.store.update_auth(payload).await?;
    Ok(Json(ApiResponse::message("administrator credentials updated")))
}
