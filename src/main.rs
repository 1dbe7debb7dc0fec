//! CLI entry point for TempTraverse.
//!
//! Provides subcommands for recommending the coolest driving route between two
//! places, resolving a place name, and inspecting a temperature model artifact.

mod infra;

use crate::infra::{NominatimClient, OsrmClient};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::num::NonZeroUsize;
use std::path::Path;
use temp_traverse::{
    config::AppConfig,
    error::RouteError,
    fetch::{BasicClient, WithHeader},
    output::{append_records, print_pretty, recommendation, render_table, score_rows, to_json},
    pipeline::{TripPlanner, TripQuery},
    predictor::{ForestModel, ModelCache, TemperaturePredictor},
    scoring::{features::Departure, sampler::DEFAULT_SAMPLE_COUNT},
    services::Geocoder,
};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "temp_traverse")]
#[command(about = "Find the coolest driving route between two places", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score alternative routes and recommend the most comfortable one
    Recommend {
        /// Start location, e.g. "Vadodara, Gujarat"
        start: String,

        /// End location, e.g. "Ahmedabad, Gujarat"
        end: String,

        /// Date of travel (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Departure hour, 0-23
        #[arg(long, default_value_t = 14, value_parser = clap::value_parser!(u8).range(0..=23))]
        hour: u8,

        /// Points sampled along each route
        #[arg(short, long, default_value_t = DEFAULT_SAMPLE_COUNT)]
        samples: NonZeroUsize,

        /// Model artifact, overrides MODEL_PATH
        #[arg(short, long)]
        model: Option<String>,

        /// CSV file to append per-route results to
        #[arg(short, long)]
        output: Option<String>,

        /// Print the plan as JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Resolve a place name to coordinates
    Geocode {
        /// Place name to look up
        name: String,
    },
    /// Show the metadata of a temperature model artifact
    ModelInfo {
        /// Model artifact, overrides MODEL_PATH
        #[arg(short, long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/temp_traverse.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("temp_traverse.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::Recommend {
            start,
            end,
            date,
            hour,
            samples,
            model,
            output,
            json,
        } => {
            // Loaded once, before any network work
            let cache = ModelCache::new(model.unwrap_or_else(|| config.model_path.clone()));
            let forest = match cache.get() {
                Ok(forest) => Some(forest),
                Err(e) => {
                    error!(error = %e, "Model not found, run the training export first");
                    None
                }
            };

            let geocoder = nominatim(&config)?;
            let router = OsrmClient::new(
                BasicClient::new(config.timeout, config.connect_timeout)?,
                &config.osrm_url,
            );
            let planner = TripPlanner::new(&geocoder, &router).with_samples(samples);

            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let query = TripQuery {
                start,
                end,
                departure: Departure::new(date, hour)?,
            };

            info!(
                start = %query.start,
                end = %query.end,
                date = %date,
                hour,
                "Locating endpoints and scoring routes"
            );
            let predictor = forest.as_deref().map(|f| f as &dyn TemperaturePredictor);
            let plan = planner.plan(&query, predictor).await?;

            print_pretty(&plan);
            let center = plan.center();
            info!(
                routes = plan.ranking.routes().len(),
                center_lat = center.lat,
                center_lon = center.lon,
                "Analyzed {} possible paths from {} to {}",
                plan.ranking.routes().len(),
                query.start,
                query.end
            );

            if json {
                println!("{}", to_json(&plan)?);
            } else {
                println!("{}", render_table(&plan));
                println!("{}", recommendation(&plan));
            }

            if let Some(path) = output {
                append_records(&path, &score_rows(&query, &plan))?;
                info!(path = %path, "Results appended");
            }
        }
        Commands::Geocode { name } => {
            let geocoder = nominatim(&config)?;
            match geocoder.geocode(&name).await? {
                Some(coord) => {
                    info!(lat = coord.lat, lon = coord.lon, "Location found");
                    println!("{:.6}, {:.6}", coord.lat, coord.lon);
                }
                None => return Err(RouteError::LocationNotFound(name).into()),
            }
        }
        Commands::ModelInfo { model } => {
            let path = model.unwrap_or_else(|| config.model_path.clone());
            let forest = ForestModel::load(&path)?;
            println!("schema_version: {}", forest.schema_version);
            println!("segment_stride: {}", forest.segment_stride.get());
            println!("features:       {}", forest.features.join(", "));
            println!("trees:          {}", forest.trees.len());
        }
    }

    Ok(())
}

/// Nominatim client with the identifying `User-Agent` its usage policy asks for.
fn nominatim(config: &AppConfig) -> Result<NominatimClient<WithHeader<BasicClient>>> {
    let http = BasicClient::new(config.timeout, config.connect_timeout)?;
    let http = WithHeader::user_agent(http, &config.user_agent)?;
    Ok(NominatimClient::new(http, &config.nominatim_url))
}
