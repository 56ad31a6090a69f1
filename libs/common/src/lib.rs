//! Common library for the item and auth services
//!
//! This crate provides functionality shared by both services: the error
//! taxonomy, PostgreSQL connectivity and schema, the token service,
//! environment configuration and the HTTP layers applied to every router.

pub mod config;
pub mod database;
pub mod error;
pub mod jwt;
pub mod middleware;

/// Initialize the global tracing subscriber
///
/// Honours `RUST_LOG`; defaults to `info`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
