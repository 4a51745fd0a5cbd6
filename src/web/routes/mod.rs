pub mod auth_routes;
pub mod config_routes;
pub mod message_routes;
pub mod profile_routes;
