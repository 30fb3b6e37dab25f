#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone health map server binary.
//!
//! Reads dataset paths and the listen address from the environment, loads
//! both datasets, and serves the dashboard until interrupted.

use std::sync::Arc;

use health_map_server::{ServerConfig, load_dashboard, map_cache_enabled, run_server};
use health_map_source::DatasetConfig;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let dashboard = load_dashboard(&DatasetConfig::from_env(), map_cache_enabled())?;
    run_server(Arc::new(dashboard), ServerConfig::from_env()).await?;

    Ok(())
}
