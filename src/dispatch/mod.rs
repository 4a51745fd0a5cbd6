use serde::Deserialize;
use thiserror::Error;

pub mod telegram;

pub use telegram::MessageDispatcher;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("telegram credentials are not configured")]
    NotConfigured,
    #[error("telegram rejected the request: {0}")]
    SendFailed(String),
    #[error("network error talking to telegram: {0}")]
    Network(#[from] reqwest::Error),
}

/// Response shape shared by every Bot API method this backend calls.
#[derive(Debug, Deserialize)]
pub struct TelegramResponse {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<TelegramResult>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramResult {
    pub message_id: i64,
}

/// The two media upload kinds, differing only in Bot API method, multipart
/// field name, and attached filename/mime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    pub fn method(self) -> &'static str {
        match self {
            MediaKind::Photo => "sendPhoto",
            MediaKind::Video => "sendVideo",
        }
    }

    pub fn field_name(self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            MediaKind::Photo => "photo.jpg",
            MediaKind::Video => "video.mp4",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            MediaKind::Photo => "image/jpeg",
            MediaKind::Video => "video/mp4",
        }
    }
}
