use axum::{
    extract::{Extension, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::services::auth_service;
use crate::web::models::{ApiResponse, AuthenticatedUser, LoginRequest, LoginResponse, MeResponse};
use crate::web::{error::AppError, AppState};

pub fn create_public_router() -> Router<Arc<AppState>> {
    Router::new().route("/login", post(login))
}

pub fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new().route("/me", get(me))
}

async fn login(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let login_response =
        auth_service::login_user(&app_state.store, payload, &app_state.config.jwt_secret).await?;
    Ok(Json(ApiResponse::with_data(
        "login successful",
        login_response,
    )))
}

async fn me(
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Json<ApiResponse<MeResponse>> {
    Json(ApiResponse::with_data(
        "token is valid",
        MeResponse {
            username: auth_user.username,
        },
    ))
}
