use serde::{Deserialize, Serialize};

/// Uniform response envelope for every API endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub username: String,
}

/// JWT claims: subject, issuance and expiry timestamps (unix seconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Authenticated identity, attached as a request extension by the auth
/// middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct SendTextRequest {
    pub text: String,
    #[serde(default)]
    pub parse_mode: Option<String>,
    /// Id of a previously sent message this one replaces. The old message
    /// is deleted best-effort before the new one goes out.
    #[serde(default)]
    pub supersedes_message_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageIdData {
    pub message_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImageUploadData {
    pub image_url: String,
}
