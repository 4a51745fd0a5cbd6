use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use super::{
    default_avatar_image, default_cover_image, default_display_name, AppConfig, AuthSettings,
    LimitSettings, ProfileSettings, ProfileUpdate, TelegramSettings,
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to access config file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("config write did not complete within {0:?}")]
    Timeout(Duration),
}

/// Owner of the single in-memory configuration copy.
///
/// Reads take the shared side of the lock and return cloned snapshots.
/// Updates hold the exclusive side across both the in-memory replacement and
/// the file rewrite, so concurrent updates are fully serialized and the
/// persisted file never reflects an interleaving of two of them.
///
/// A failed rewrite leaves the in-memory copy ahead of the file: the caller
/// gets the error, the change stays visible until restart. Callers must
/// treat a failed update as "not durable", not as "not applied".
pub struct ConfigStore {
    path: PathBuf,
    persist_timeout: Duration,
    inner: RwLock<AppConfig>,
}

impl ConfigStore {
    /// Reads the configuration from `path`. A missing file installs the
    /// defaults and persists them immediately; any other I/O or parse
    /// failure is surfaced.
    pub async fn load(
        path: impl Into<PathBuf>,
        persist_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        let config = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file found, installing defaults");
                let config = AppConfig::default();
                Self::persist(&path, &config, persist_timeout).await?;
                config
            }
            Err(e) => return Err(e.into()),
        };

        Ok(ConfigStore {
            path,
            persist_timeout,
            inner: RwLock::new(config),
        })
    }

    async fn persist(
        path: &Path,
        config: &AppConfig,
        timeout: Duration,
    ) -> Result<(), StoreError> {
        let contents = toml::to_string_pretty(config)?;
        match tokio::time::timeout(timeout, tokio::fs::write(path, contents)).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(timeout)),
        }
    }

    pub async fn telegram(&self) -> TelegramSettings {
        self.inner.read().await.telegram.clone()
    }

    pub async fn limits(&self) -> LimitSettings {
        self.inner.read().await.limits.clone()
    }

    pub async fn auth(&self) -> AuthSettings {
        self.inner.read().await.auth.clone()
    }

    pub async fn profile(&self) -> ProfileSettings {
        self.inner.read().await.profile.clone()
    }

    /// Full snapshot, mainly for tests and diagnostics.
    pub async fn snapshot(&self) -> AppConfig {
        self.inner.read().await.clone()
    }

    pub async fn update_telegram(&self, settings: TelegramSettings) -> Result<(), StoreError> {
        let mut guard = self.inner.write().await;
        guard.telegram = settings;
        Self::persist(&self.path, &guard, self.persist_timeout).await
    }

    pub async fn update_limits(&self, settings: LimitSettings) -> Result<(), StoreError> {
        let mut guard = self.inner.write().await;
        guard.limits = settings;
        Self::persist(&self.path, &guard, self.persist_timeout).await
    }

    pub async fn update_auth(&self, settings: AuthSettings) -> Result<(), StoreError> {
        let mut guard = self.inner.write().await;
        guard.auth = settings;
        Self::persist(&self.path, &guard, self.persist_timeout).await
    }

    /// Applies a partial profile update. Omitted fields keep their current
    /// value; fields sent as `null` reset to the built-in default.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<(), StoreError> {
        let mut guard = self.inner.write().await;
        if let Some(display_name) = update.display_name {
            guard.profile.display_name = display_name.unwrap_or_else(default_display_name);
        }
        if let Some(cover_image) = update.cover_image {
            guard.profile.cover_image = cover_image.unwrap_or_else(default_cover_image);
        }
        if let Some(avatar_image) = update.avatar_image {
            guard.profile.avatar_image = avatar_image.unwrap_or_else(default_avatar_image);
        }
        Self::persist(&self.path, &guard, self.persist_timeout).await
    }
}
