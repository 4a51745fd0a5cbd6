use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::services::auth_service;
use crate::web::models::AuthenticatedUser;
use crate::web::{error::AppError, AppState};

/// Verifies the bearer token and attaches the caller's identity to the
/// request. Every protected request goes through here; there is no session
/// state between requests.
pub async fn auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned)
        .ok_or(AppError::MissingToken)?;

    let claims = auth_service::decode_token(&token, &state.config.jwt_secret).map_err(|e| {
        warn!(error = %e, "rejected bearer token");
        e
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        username: claims.sub,
    });
    Ok(next.run(req).await)
}
