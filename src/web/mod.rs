use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    middleware as axum_middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::config::ConfigStore;
use crate::dispatch::MessageDispatcher;
use crate::server::config::ServerConfig;

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod static_files;

use routes::{auth_routes, config_routes, message_routes, profile_routes};

/// Big enough for the 50MB video ceiling plus multipart overhead.
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConfigStore>,
    pub dispatcher: MessageDispatcher,
    pub config: Arc<ServerConfig>,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(
    store: Arc<ConfigStore>,
    dispatcher: MessageDispatcher,
    config: Arc<ServerConfig>,
) -> Router {
    let images_dir = config.images_dir.clone();
    let app_state = Arc::new(AppState {
        store,
        dispatcher,
        config,
    });

    let require_auth =
        axum_middleware::from_fn_with_state(app_state.clone(), middleware::auth::auth);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_check_handler))
        .nest(
            "/api/auth",
            auth_routes::create_public_router().merge(
                auth_routes::create_protected_router().route_layer(require_auth.clone()),
            ),
        )
        .nest(
            "/api/config",
            config_routes::create_public_router().merge(
                config_routes::create_protected_router().route_layer(require_auth.clone()),
            ),
        )
        .nest(
            "/api/profile",
            profile_routes::create_public_router().merge(
                profile_routes::create_protected_router().route_layer(require_auth.clone()),
            ),
        )
        .nest("/api/messages", message_routes::create_message_router())
        .nest_service("/api/images", ServeDir::new(images_dir))
        .fallback(static_files::static_handler)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(app_state)
        .layer(cors)
}
