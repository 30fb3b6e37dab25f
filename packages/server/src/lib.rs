#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the health map dashboard.
//!
//! Serves the interactive map page and a JSON API over a shared
//! [`Dashboard`]. Datasets are loaded once before the server binds; every
//! request runs the synchronous selection pipeline (or hits the memo cache)
//! against that immutable state.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use health_map_dashboard::Dashboard;
use health_map_source::{DatasetConfig, DatasetContext, LoadError};

/// Shared application state.
pub struct AppState {
    /// Loaded datasets and the per-selection pipeline.
    pub dashboard: Arc<Dashboard>,
}

/// Listen address, read from `BIND_ADDR` and `PORT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub bind_addr: String,
    /// TCP port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR` and `PORT`, falling back to `127.0.0.1:8080`.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
        }
    }
}

/// Whether map memoization is on. `MAP_CACHE=0` or `MAP_CACHE=false`
/// turns it off; anything else, or unset, leaves it on.
#[must_use]
pub fn map_cache_enabled() -> bool {
    std::env::var("MAP_CACHE").map_or(true, |v| cache_flag(&v))
}

fn cache_flag(value: &str) -> bool {
    let value = value.trim();
    !(value == "0" || value.eq_ignore_ascii_case("false"))
}

/// Loads both datasets and builds the dashboard.
///
/// # Errors
///
/// Returns [`LoadError`] if either input file is missing or malformed.
pub fn load_dashboard(config: &DatasetConfig, cache: bool) -> Result<Dashboard, LoadError> {
    log::info!(
        "Loading patients from {} and boundaries from {}",
        config.patients_path.display(),
        config.boundaries_path.display()
    );
    let context = DatasetContext::load(config)?;
    Ok(Dashboard::new(Arc::new(context), cache))
}

/// Registers every route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/options", web::get().to(handlers::options))
            .route("/summary", web::get().to(handlers::summary))
            .route("/charts", web::get().to(handlers::charts))
            .route("/map", web::get().to(handlers::map)),
    )
    .route("/", web::get().to(handlers::page))
    .route("/map", web::get().to(handlers::page));
}

/// Starts the health map server.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(dashboard: Arc<Dashboard>, config: ServerConfig) -> std::io::Result<()> {
    let state = web::Data::new(AppState { dashboard });

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}
