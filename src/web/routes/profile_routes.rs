use axum::{
    extract::{Multipart, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::config::{ProfileSettings, ProfileUpdate};
use crate::web::models::{ApiResponse, ImageUploadData};
use crate::web::{error::AppError, AppState};

const IMAGE_MAX_BYTES: usize = 10 * 1024 * 1024;

pub fn create_public_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_profile))
}

pub fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", put(update_profile))
        .route("/image", post(upload_image))
}

async fn get_profile(State(app_state): State<Arc<AppState>>) -> Json<ApiResponse<ProfileSettings>> {
    let profile = app_state.store.profile().await;
    Json(ApiResponse::with_data("profile", profile))
}

async fn update_profile(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    app_state.store.update_profile(payload).await?;
    Ok(Json(ApiResponse::message("profile updated")))
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ImageKind {
    Cover,
    Avatar,
}

#[derive(Deserialize)]
struct ImageUploadQuery {
    kind: ImageKind,
}

/// Accepts one image file, stores it under the images directory with a
/// generated name, and points the selected profile field at it.
async fn upload_image(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<ImageUploadQuery>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ImageUploadData>>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("image") {
            let content_type = field.content_type().map(String::from);
            let file_name = field.file_name().map(String::from);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("failed to read image: {e}")))?;
            upload = Some((data, content_type, file_name));
        }
    }
    let (data, content_type, file_name) =
        upload.ok_or_else(|| AppError::InvalidInput("missing image file field".to_string()))?;

    if data.is_empty() {
        return Err(AppError::InvalidInput("image file is empty".to_string()));
    }
    if data.len() > IMAGE_MAX_BYTES {
        return Err(AppError::InvalidInput(
            "image exceeds the 10MB size limit".to_string(),
        ));
    }
    if !content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("image/"))
    {
        return Err(AppError::InvalidInput("file is not an image".to_string()));
    }

    let stored_name = format!("{}.{}", Uuid::new_v4(), sanitized_extension(file_name.as_deref()));
    let disk_path = Path::new(&app_state.config.images_dir).join(&stored_name);
    tokio::fs::write(&disk_path, &data)
        .await
        .map_err(crate::config::StoreError::from)?;

    let image_url = format!("/api/images/{stored_name}");
    let update = match query.kind {
        ImageKind::Cover => ProfileUpdate {
            cover_image: Some(Some(image_url.clone())),
            ..Default::default()
        },
        ImageKind::Avatar => ProfileUpdate {
            avatar_image: Some(Some(image_url.clone())),
            ..Default::default()
        },
    };
    app_state.store.update_profile(update).await?;

    info!(kind = ?query.kind, path = %disk_path.display(), "stored profile image");
    Ok(Json(ApiResponse::with_data(
        "image uploaded",
        ImageUploadData { image_url },
    )))
}

fn sanitized_extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_lowercase)
        .unwrap_or_else(|| "jpg".to_string())
}
