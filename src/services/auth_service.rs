use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use crate::config::ConfigStore;
use crate::web::error::AppError;
use crate::web::models::{Claims, LoginRequest, LoginResponse};

const TOKEN_TTL_HOURS: i64 = 24;

/// Checks the submitted credentials against the stored administrator
/// account and mints a bearer token on success.
///
/// The comparison is a verbatim string equality check against the stored
/// clear-text password.
pub async fn login_user(
    store: &ConfigStore,
    req: LoginRequest,
    jwt_secret: &str,
) -> Result<LoginResponse, AppError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::InvalidInput(
            "username and password must not be empty".to_string(),
        ));
    }

    let auth = store.auth().await;
    if req.username != auth.username || req.password != auth.password {
        return Err(AppError::InvalidCredentials);
    }

    let token = create_jwt(&req.username, jwt_secret)?;
    Ok(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        username: req.username,
    })
}

pub fn create_jwt(username: &str, jwt_secret: &str) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: username.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::TokenCreation(e.to_string()))
}

/// Decodes and validates a bearer token, with failures split into the
/// three cases callers need to distinguish: a bad signature or expired
/// token, and structurally unexpected claims.
pub fn decode_token(token: &str, jwt_secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => AppError::MalformedClaims,
        _ => AppError::ExpiredOrInvalid,
    })
}
