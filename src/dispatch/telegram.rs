use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{ConfigStore, TelegramSettings};

use super::{DispatchError, MediaKind, TelegramResponse};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_PARSE_MODE: &str = "HTML";

#[derive(Serialize)]
struct SendMessagePayload<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Serialize)]
struct DeleteMessagePayload<'a> {
    chat_id: &'a str,
    message_id: i64,
}

/// Client for pushing admin-submitted content into the configured chat.
///
/// Provider credentials are read from the [`ConfigStore`] on every call, so
/// a runtime credential change takes effect without a restart. Every
/// operation fails fast when either credential is empty.
#[derive(Clone)]
pub struct MessageDispatcher {
    store: Arc<ConfigStore>,
    client: Client,
    api_base: String,
}

impl MessageDispatcher {
    pub fn new(store: Arc<ConfigStore>, timeout: Duration) -> Self {
        Self::with_api_base(store, timeout, TELEGRAM_API_BASE)
    }

    /// Same as [`MessageDispatcher::new`] but against a different API host,
    /// e.g. a self-hosted Bot API server.
    pub fn with_api_base(
        store: Arc<ConfigStore>,
        timeout: Duration,
        api_base: impl Into<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client build");
        MessageDispatcher {
            store,
            client,
            api_base: api_base.into(),
        }
    }

    fn endpoint(&self, bot_token: &str, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, bot_token, method)
    }

    async fn credentials(&self) -> Result<TelegramSettings, DispatchError> {
        let settings = self.store.telegram().await;
        if settings.bot_token.is_empty() || settings.chat_id.is_empty() {
            return Err(DispatchError::NotConfigured);
        }
        Ok(settings)
    }

    /// Sends `text` to the configured chat and returns the new message id.
    ///
    /// When `supersedes_message_id` is given, the prior message is deleted
    /// first on a best-effort basis: the delete outcome is deliberately
    /// discarded, so a message that is already gone or too old to delete
    /// never blocks its replacement.
    pub async fn send_text(
        &self,
        text: &str,
        parse_mode: Option<&str>,
        supersedes_message_id: Option<i64>,
    ) -> Result<i64, DispatchError> {
        let creds = self.credentials().await?;

        if let Some(old_id) = supersedes_message_id {
            if let Err(e) = self.delete_message(&creds, old_id).await {
                debug!(message_id = old_id, error = %e, "ignoring failed delete of superseded message");
            }
        }

        let payload = SendMessagePayload {
            chat_id: &creds.chat_id,
            text,
            parse_mode: parse_mode.unwrap_or(DEFAULT_PARSE_MODE),
        };
        let response = self
            .client
            .post(self.endpoint(&creds.bot_token, "sendMessage"))
            .json(&payload)
            .send()
            .await?;
        Self::message_id_from(response).await
    }

    pub async fn send_photo(
        &self,
        data: Vec<u8>,
        reply_to_message_id: Option<i64>,
    ) -> Result<i64, DispatchError> {
        self.send_media(MediaKind::Photo, data, reply_to_message_id)
            .await
    }

    pub async fn send_video(
        &self,
        data: Vec<u8>,
        reply_to_message_id: Option<i64>,
    ) -> Result<i64, DispatchError> {
        self.send_media(MediaKind::Video, data, reply_to_message_id)
            .await
    }

    /// One dispatch, at most two external calls: an attempt carrying the
    /// reply target, and on its failure a single degraded attempt without
    /// it. A standalone send that fails is not retried.
    async fn send_media(
        &self,
        kind: MediaKind,
        data: Vec<u8>,
        reply_to_message_id: Option<i64>,
    ) -> Result<i64, DispatchError> {
        let creds = self.credentials().await?;

        match self
            .send_media_once(&creds, kind, data.clone(), reply_to_message_id)
            .await
        {
            Ok(message_id) => Ok(message_id),
            Err(first_err) if reply_to_message_id.is_some() => {
                warn!(
                    method = kind.method(),
                    error = %first_err,
                    "reply send failed, retrying as standalone message"
                );
                self.send_media_once(&creds, kind, data, None).await
            }
            Err(e) => Err(e),
        }
    }

    async fn send_media_once(
        &self,
        creds: &TelegramSettings,
        kind: MediaKind,
        data: Vec<u8>,
        reply_to_message_id: Option<i64>,
    ) -> Result<i64, DispatchError> {
        let mut form = Form::new().text("chat_id", creds.chat_id.clone());
        if let Some(reply_to) = reply_to_message_id {
            form = form.text("reply_to_message_id", reply_to.to_string());
        }
        let part = Part::bytes(data)
            .file_name(kind.file_name())
            .mime_str(kind.mime())?;
        form = form.part(kind.field_name(), part);

        let response = self
            .client
            .post(self.endpoint(&creds.bot_token, kind.method()))
            .multipart(form)
            .send()
            .await?;
        Self::message_id_from(response).await
    }

    async fn delete_message(
        &self,
        creds: &TelegramSettings,
        message_id: i64,
    ) -> Result<(), DispatchError> {
        let payload = DeleteMessagePayload {
            chat_id: &creds.chat_id,
            message_id,
        };
        let response = self
            .client
            .post(self.endpoint(&creds.bot_token, "deleteMessage"))
            .json(&payload)
            .send()
            .await?;
        let body: TelegramResponse = response.json().await?;
        if !body.ok {
            return Err(DispatchError::SendFailed(
                body.description
                    .unwrap_or_else(|| "deleteMessage returned ok=false".to_string()),
            ));
        }
        Ok(())
    }

    async fn message_id_from(response: reqwest::Response) -> Result<i64, DispatchError> {
        let body: TelegramResponse = response.json().await?;
        if !body.ok {
            return Err(DispatchError::SendFailed(
                body.description
                    .unwrap_or_else(|| "telegram returned ok=false".to_string()),
            ));
        }
        body.result
            .map(|r| r.message_id)
            .ok_or_else(|| DispatchError::SendFailed("response carried no message_id".to_string()))
    }
}
