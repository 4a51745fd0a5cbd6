use serde::{Deserialize, Deserializer, Serialize};

pub mod store;

pub use store::{ConfigStore, StoreError};

/// The whole operational configuration, persisted as one TOML document.
///
/// Four independent sections, each updatable in isolation through
/// [`ConfigStore`]. The file is rewritten in full on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub telegram: TelegramSettings,
    #[serde(default)]
    pub limits: LimitSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub profile: ProfileSettings,
}

/// Credentials for the Telegram Bot API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TelegramSettings {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: String,
}

/// Client-side throttle parameters, one limit/window pair per class of
/// operation. The backend only stores these; enforcement happens in the
/// front end that reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitSettings {
    #[serde(default = "default_text_limit")]
    pub text_limit: u32,
    #[serde(default = "default_window_secs")]
    pub text_window_secs: u64,
    #[serde(default = "default_media_limit")]
    pub media_limit: u32,
    #[serde(default = "default_window_secs")]
    pub media_window_secs: u64,
}

impl Default for LimitSettings {
    fn default() -> Self {
        LimitSettings {
            text_limit: default_text_limit(),
            text_window_secs: default_window_secs(),
            media_limit: default_media_limit(),
            media_window_secs: default_window_secs(),
        }
    }
}

/// Administrator credentials, compared verbatim at login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_admin")]
    pub username: String,
    #[serde(default = "default_admin")]
    pub password: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        AuthSettings {
            username: default_admin(),
            password: default_admin(),
        }
    }
}

/// Display fields shown by the public front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSettings {
    #[serde(default = "default_display_name")]
    pub display_name: String,
    #[serde(default = "default_cover_image")]
    pub cover_image: String,
    #[serde(default = "default_avatar_image")]
    pub avatar_image: String,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        ProfileSettings {
            display_name: default_display_name(),
            cover_image: default_cover_image(),
            avatar_image: default_avatar_image(),
        }
    }
}

/// Partial update for the profile section.
///
/// Every field uses double-option deserialization:
/// - field absent → `None` (keep the current value)
/// - `"field": null` → `Some(None)` (reset to the built-in default)
/// - `"field": "text"` → `Some(Some("text"))` (set value)
#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub display_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub cover_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub avatar_image: Option<Option<String>>,
}

#[allow(clippy::option_option)]
fn deserialize_double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn default_text_limit() -> u32 {
    5
}

fn default_media_limit() -> u32 {
    3
}

fn default_window_secs() -> u64 {
    300
}

fn default_admin() -> String {
    "admin".to_string()
}

pub(crate) fn default_display_name() -> String {
    "Admin User".to_string()
}

pub(crate) fn default_cover_image() -> String {
    "/default_cover.jpg".to_string()
}

pub(crate) fn default_avatar_image() -> String {
    "/default_avatar.jpg".to_string()
}
