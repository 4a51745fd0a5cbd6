use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use axum::body::Bytes;
use std::sync::Arc;

use crate::web::models::{ApiResponse, MessageIdData, SendTextRequest};
use crate::web::{error::AppError, AppState};

const PHOTO_MAX_BYTES: usize = 10 * 1024 * 1024;
const VIDEO_MAX_BYTES: usize = 50 * 1024 * 1024;

pub fn create_message_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/text", post(send_text))
        .route("/photo", post(send_photo))
        .route("/video", post(send_video))
}

async fn send_text(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<SendTextRequest>,
) -> Result<Json<ApiResponse<MessageIdData>>, AppError> {
    if payload.text.is_empty() {
        return Err(AppError::InvalidInput("text must not be empty".to_string()));
    }

    let message_id = app_state
        .dispatcher
        .send_text(
            &payload.text,
            payload.parse_mode.as_deref(),
            payload.supersedes_message_id,
        )
        .await?;
    Ok(Json(ApiResponse::with_data(
        "message sent",
        MessageIdData { message_id },
    )))
}

async fn send_photo(
    State(app_state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<MessageIdData>>, AppError> {
    let upload = read_media_upload(multipart, "photo").await?;
    validate_photo(&upload)?;

    let message_id = app_state
        .dispatcher
        .send_photo(upload.data.to_vec(), upload.reply_to)
        .await?;
    Ok(Json(ApiResponse::with_data(
        "photo sent",
        MessageIdData { message_id },
    )))
}

async fn send_video(
    State(app_state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<MessageIdData>>, AppError> {
    let upload = read_media_upload(multipart, "video").await?;
    validate_video(&upload)?;

    let message_id = app_state
        .dispatcher
        .send_video(upload.data.to_vec(), upload.reply_to)
        .await?;
    Ok(Json(ApiResponse::with_data(
        "video sent",
        MessageIdData { message_id },
    )))
}

struct MediaUpload {
    data: Bytes,
    content_type: Option<String>,
    reply_to: Option<i64>,
}

async fn read_media_upload(
    mut multipart: Multipart,
    payload_field: &str,
) -> Result<MediaUpload, AppError> {
    let mut data = None;
    let mut content_type = None;
    let mut reply_to = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("malformed multipart body: {e}")))?
    {
        match field.name() {
            Some(name) if name == payload_field => {
                content_type = field.content_type().map(String::from);
                data = Some(field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("failed to read {payload_field}: {e}"))
                })?);
            }
            Some("reply_to_message_id") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("malformed reply target: {e}")))?;
                if !raw.is_empty() {
                    reply_to = Some(raw.parse::<i64>().map_err(|_| {
                        AppError::InvalidInput("reply target must be a message id".to_string())
                    })?);
                }
            }
            _ => {}
        }
    }

    let data = data
        .ok_or_else(|| AppError::InvalidInput(format!("missing {payload_field} file field")))?;
    Ok(MediaUpload {
        data,
        content_type,
        reply_to,
    })
}

fn validate_photo(upload: &MediaUpload) -> Result<(), AppError> {
    if upload.data.is_empty() {
        return Err(AppError::InvalidInput("photo file is empty".to_string()));
    }
    if upload.data.len() > PHOTO_MAX_BYTES {
        return Err(AppError::InvalidInput(
            "photo exceeds the 10MB size limit".to_string(),
        ));
    }
    match upload.content_type.as_deref() {
        Some(content_type) if content_type.starts_with("image/") => Ok(()),
        _ => Err(AppError::InvalidInput(
            "file is not an image".to_string(),
        )),
    }
}

fn validate_video(upload: &MediaUpload) -> Result<(), AppError> {
    if upload.data.is_empty() {
        return Err(AppError::InvalidInput("video file is empty".to_string()));
    }
    if upload.data.len() > VIDEO_MAX_BYTES {
        return Err(AppError::InvalidInput(
            "video exceeds the 50MB size limit".to_string(),
        ));
    }
    match upload.content_type.as_deref() {
        Some("video/mp4") | Some("video/webm") => Ok(()),
        _ => Err(AppError::InvalidInput(
            "video must be mp4 or webm".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(len: usize, content_type: Option<&str>) -> MediaUpload {
        MediaUpload {
            data: Bytes::from(vec![0u8; len]),
            content_type: content_type.map(String::from),
            reply_to: None,
        }
    }

    #[test]
    fn photo_at_the_size_ceiling_passes_one_byte_over_fails() {
        assert!(validate_photo(&upload(PHOTO_MAX_BYTES, Some("image/jpeg"))).is_ok());
        assert!(matches!(
            validate_photo(&upload(PHOTO_MAX_BYTES + 1, Some("image/jpeg"))),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn photo_requires_an_image_content_type() {
        assert!(validate_photo(&upload(10, Some("image/png"))).is_ok());
        assert!(validate_photo(&upload(10, Some("application/pdf"))).is_err());
        assert!(validate_photo(&upload(10, None)).is_err());
    }

    #[test]
    fn empty_payloads_are_rejected() {
        assert!(matches!(
            validate_photo(&upload(0, Some("image/jpeg"))),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_video(&upload(0, Some("video/mp4"))),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn video_content_type_whitelist_is_exact() {
        assert!(validate_video(&upload(10, Some("video/mp4"))).is_ok());
        assert!(validate_video(&upload(10, Some("video/webm"))).is_ok());
        assert!(validate_video(&upload(10, Some("video/avi"))).is_err());
        assert!(validate_video(&upload(10, Some("video/mp4; codecs=avc1"))).is_err());
    }

    #[test]
    fn oversized_video_is_rejected() {
        assert!(matches!(
            validate_video(&upload(VIDEO_MAX_BYTES + 1, Some("video/mp4"))),
            Err(AppError::InvalidInput(_))
        ));
    }
}
