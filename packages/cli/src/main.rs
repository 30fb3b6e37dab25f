#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the health map dashboard.
//!
//! `serve` starts the web dashboard, `render` writes one map to a file and
//! `summary` prints the per-diagnosis statistics. Dataset paths come from
//! the environment unless overridden by the global flags.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use health_map_dashboard::{Dashboard, Selection};
use health_map_render::html;
use health_map_server::{ServerConfig, load_dashboard, map_cache_enabled, run_server};
use health_map_source::DatasetConfig;

#[derive(Parser)]
#[command(name = "health_map", about = "Patient distribution choropleth dashboard")]
struct Cli {
    /// Patient CSV (overrides `PATIENTS_PATH`)
    #[arg(long, global = true)]
    patients: Option<PathBuf>,

    /// Department boundary `GeoJSON` (overrides `BOUNDARIES_PATH`)
    #[arg(long, global = true)]
    boundaries: Option<PathBuf>,

    /// Feature property holding the department name (overrides
    /// `BOUNDARY_NAME_PROPERTY`)
    #[arg(long, global = true)]
    name_property: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web dashboard
    Serve {
        /// Interface to bind (overrides `BIND_ADDR`)
        #[arg(long)]
        bind_addr: Option<String>,
        /// Port to listen on (overrides `PORT`)
        #[arg(long)]
        port: Option<u16>,
        /// Recompute every map instead of memoizing per selection
        #[arg(long)]
        no_cache: bool,
    },
    /// Render one map to a file
    Render {
        /// Diagnosis to filter on (omit for all)
        #[arg(long)]
        diagnosis: Option<String>,
        /// Gender to filter on (omit for all)
        #[arg(long)]
        gender: Option<String>,
        /// Metric driving the fill: count, age or visits
        #[arg(long, default_value = "count")]
        metric: String,
        /// Output file
        #[arg(long, short)]
        output: PathBuf,
        /// Write the map view as JSON instead of an HTML page
        #[arg(long)]
        json: bool,
    },
    /// Print per-diagnosis statistics
    Summary {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Environment configuration with any flag overrides applied.
    fn dataset_config(&self) -> DatasetConfig {
        let mut config = DatasetConfig::from_env();
        if let Some(path) = &self.patients {
            config.patients_path.clone_from(path);
        }
        if let Some(path) = &self.boundaries {
            config.boundaries_path.clone_from(path);
        }
        if let Some(property) = &self.name_property {
            config.name_property.clone_from(property);
        }
        config
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();
    let config = cli.dataset_config();

    match cli.command {
        Commands::Serve {
            bind_addr,
            port,
            no_cache,
        } => {
            let mut server = ServerConfig::from_env();
            if let Some(bind_addr) = bind_addr {
                server.bind_addr = bind_addr;
            }
            if let Some(port) = port {
                server.port = port;
            }

            let dashboard = load_dashboard(&config, map_cache_enabled() && !no_cache)?;
            actix_web::rt::System::new().block_on(run_server(Arc::new(dashboard), server))?;
        }
        Commands::Render {
            diagnosis,
            gender,
            metric,
            output,
            json,
        } => {
            let selection =
                Selection::parse(diagnosis.as_deref(), gender.as_deref(), Some(&metric))?;
            let dashboard = load_dashboard(&config, false)?;
            render(&dashboard, &selection, &output, json)?;
        }
        Commands::Summary { json } => {
            let dashboard = load_dashboard(&config, false)?;
            print_summary(&dashboard, json)?;
        }
    }

    Ok(())
}

/// Runs the pipeline for `selection` and writes the result to `output`.
fn render(
    dashboard: &Dashboard,
    selection: &Selection,
    output: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let view = dashboard.map(selection)?;
    if view.empty {
        log::warn!("No patients match the selection; every department is shown without data");
    }

    let contents = if json {
        serde_json::to_string_pretty(view.as_ref())?
    } else {
        html::page(&view, None)?
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, contents)?;

    log::info!("Wrote {} to {}", view.title, output.display());
    Ok(())
}

fn print_summary(dashboard: &Dashboard, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let summary = dashboard.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!("Registros: {}", summary.record_count);
    println!();
    println!(
        "{:<24} {:>10} {:>14} {:>16}",
        "Diagnóstico", "Pacientes", "Edad promedio", "Visitas promedio"
    );
    for row in &summary.by_diagnosis {
        println!(
            "{:<24} {:>10} {:>14.2} {:>16.2}",
            row.diagnosis, row.patient_count, row.mean_age, row.mean_visits
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_override_paths() {
        let cli = Cli::try_parse_from([
            "health_map",
            "summary",
            "--patients",
            "in/p.csv",
            "--name-property",
            "NOMBRE_DPT",
        ])
        .unwrap();
        let config = cli.dataset_config();
        assert_eq!(config.patients_path, PathBuf::from("in/p.csv"));
        assert_eq!(config.name_property, "NOMBRE_DPT");
    }

    #[test]
    fn render_defaults_to_count() {
        let cli = Cli::try_parse_from(["health_map", "render", "--output", "map.html"]).unwrap();
        let Commands::Render {
            metric, diagnosis, ..
        } = cli.command
        else {
            panic!("expected render");
        };
        assert_eq!(metric, "count");
        assert!(diagnosis.is_none());
    }
}
