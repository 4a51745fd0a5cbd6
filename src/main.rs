use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use telepanel::config::ConfigStore;
use telepanel::dispatch::MessageDispatcher;
use telepanel::server::config::ServerConfig;
use telepanel::version::VERSION;
use telepanel::web::create_axum_router;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the operational configuration file (overrides CONFIG_PATH)
    #[arg(short, long)]
    config: Option<String>,
}

fn init_logging(log_dir: &str) {
    let file_appender = rolling::daily(log_dir, "server.log");
    let file_layer = fmt::layer().with_writer(file_appender).with_ansi(false);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

/// First-run convenience: materialize a `.env` with a placeholder signing
/// secret so the process comes up. Operators are expected to replace it.
fn ensure_env_file() -> std::io::Result<()> {
    if !Path::new(".env").exists() {
        std::fs::write(".env", "JWT_SECRET=change-this-secret\n")?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    ensure_env_file()?;
    dotenv().ok();

    let mut server_config = ServerConfig::from_env()?;
    if let Some(config_path) = args.config {
        server_config.config_path = config_path;
    }

    init_logging(&server_config.log_dir);
    info!("starting telepanel, version: {}", VERSION);

    tokio::fs::create_dir_all(&server_config.images_dir).await?;

    let store = Arc::new(
        ConfigStore::load(
            &server_config.config_path,
            Duration::from_secs(server_config.persist_timeout_secs),
        )
        .await?,
    );
    let dispatcher = MessageDispatcher::new(
        store.clone(),
        Duration::from_secs(server_config.dispatch_timeout_secs),
    );

    let listen_addr = server_config.listen_addr.clone();
    let router = create_axum_router(store, dispatcher, Arc::new(server_config));

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!("HTTP server listening on {}", listen_addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install shutdown handler");
        return;
    }
    info!("shutdown signal received");
}
