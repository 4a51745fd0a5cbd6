use std::env;

/// Process-level settings sourced from the environment at startup.
///
/// These are distinct from the operational configuration managed by
/// [`crate::config::store::ConfigStore`]: everything here is fixed for the
/// process lifetime, while the store's contents are mutable at runtime.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub jwt_secret: String,
    pub config_path: String,
    pub images_dir: String,
    pub log_dir: String,
    /// Deadline for a single outbound call to the messaging provider.
    pub dispatch_timeout_secs: u64,
    /// Deadline for one full rewrite of the persisted configuration.
    pub persist_timeout_secs: u64,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_u64_or(key: &str, default: u64) -> Result<u64, String> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|_| format!("{key} must be a positive integer, got {raw:?}")),
        Err(_) => Ok(default),
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set".to_string())?;
        if jwt_secret.is_empty() {
            return Err("JWT_SECRET must not be empty".to_string());
        }

        Ok(ServerConfig {
            listen_addr: env_or("LISTEN_ADDR", "0.0.0.0:5000"),
            jwt_secret,
            config_path: env_or("CONFIG_PATH", "config.toml"),
            images_dir: env_or("IMAGES_DIR", "images"),
            log_dir: env_or("LOG_DIR", "logs"),
            dispatch_timeout_secs: env_u64_or("DISPATCH_TIMEOUT_SECS", 30)?,
            persist_timeout_secs: env_u64_or("PERSIST_TIMEOUT_SECS", 10)?,
        })
    }
}
