use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::config::StoreError;
use crate::dispatch::DispatchError;
use crate::web::models::ApiResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("authentication required")]
    MissingToken,
    #[error("token is invalid or has expired")]
    ExpiredOrInvalid,
    #[error("token claims are malformed")]
    MalformedClaims,
    #[error("failed to sign token: {0}")]
    TokenCreation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::MissingToken
            | AppError::ExpiredOrInvalid
            | AppError::MalformedClaims => StatusCode::UNAUTHORIZED,
            AppError::TokenCreation(_) | AppError::Store(_) | AppError::Dispatch(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}
