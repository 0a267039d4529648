//! Conflict forecaster command line.
//!
//! Usage:
//!   cargo run -p forecast-cli --bin forecast -- scenario head-on > request.json
//!   cargo run -p forecast-cli --bin forecast -- scan request.json
//!   cargo run -p forecast-cli --bin forecast -- submit request.json --url http://localhost:8080 --v2

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

use forecast_cli::report::{conflict_table, plot_line};
use forecast_cli::{create_scenario, ApiVersion, ForecastClient, ScenarioKind, ScenarioParams};
use forecast_core::rules::DEFAULT_SAMPLE_PERIOD_MS;
use forecast_core::{
    build_feature_collection, sorted_waypoints, ConflictForecastRequest, ConflictScanner,
    FeatureOptions, GeoPoint, RegionTieBreak, ScanConfig, TrajectoryPlotGenerator,
};

/// Lateral separation conflict forecaster
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the conflict scan locally
    Scan {
        /// Request JSON file, or - for stdin
        request: PathBuf,
        #[command(flatten)]
        scan: ScanArgs,
        /// Print the response JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Only report conflicts involving this trajectory ID
        #[arg(long)]
        involving: Option<i64>,
    },
    /// Render conflicts and regions as a GeoJSON FeatureCollection
    Features {
        /// Request JSON file, or - for stdin
        request: PathBuf,
        #[command(flatten)]
        scan: ScanArgs,
        /// Vertices per separation region circle
        #[arg(long, default_value_t = FeatureOptions::default().circle_vertices)]
        circle_vertices: usize,
    },
    /// Play back one trajectory at a fixed step
    Playback {
        /// Request JSON file, or - for stdin
        request: PathBuf,
        /// Trajectory ID to play back
        #[arg(long)]
        trajectory: i64,
        /// Step between plots in milliseconds
        #[arg(long, default_value_t = 1000)]
        step_ms: i64,
    },
    /// Print a synthetic request
    Scenario {
        #[arg(value_enum)]
        kind: ScenarioKind,
        /// Center latitude
        #[arg(long, default_value_t = ScenarioParams::default().center.lat)]
        lat: f64,
        /// Center longitude
        #[arg(long, default_value_t = ScenarioParams::default().center.lon)]
        lon: f64,
        /// Ground speed of every track in m/s
        #[arg(long, default_value_t = ScenarioParams::default().speed_mps)]
        speed: f64,
        /// Lateral separation minimum of the scenario region in meters
        #[arg(long, default_value_t = ScenarioParams::default().lateral_separation)]
        separation: f64,
    },
    /// POST a request to a running forecast server
    Submit {
        /// Request JSON file, or - for stdin
        request: PathBuf,
        /// Forecast server URL
        #[arg(long, default_value = "http://localhost:8080")]
        url: String,
        /// Request GeoJSON features instead of conflicts
        #[arg(long)]
        features: bool,
        /// Use the v2 endpoints
        #[arg(long)]
        v2: bool,
    },
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Sampling grid period in milliseconds
    #[arg(long, default_value_t = DEFAULT_SAMPLE_PERIOD_MS)]
    sample_period_ms: i64,
    /// Region chosen on an exact center-distance tie (first|last)
    #[arg(long, default_value_t = RegionTieBreak::First)]
    tie_break: RegionTieBreak,
}

impl ScanArgs {
    fn scanner(&self) -> ConflictScanner {
        ConflictScanner::new(ScanConfig {
            sample_period_ms: self.sample_period_ms,
            tie_break: self.tie_break,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("forecast_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Scan {
            request,
            scan,
            json,
            involving,
        } => {
            let request = read_request(&request)?;
            let mut response = scan.scanner().forecast(&request);
            if let Some(id) = involving {
                response.conflicts.retain(|conflict| conflict.involves(id));
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{}", conflict_table(&response.conflicts));
            }
        }
        Command::Features {
            request,
            scan,
            circle_vertices,
        } => {
            let request = read_request(&request)?;
            let scanner = scan.scanner();
            let conflicts = scanner.scan(&request);
            let collection = build_feature_collection(
                scanner.geodesy(),
                &conflicts,
                &request.separation_requirements,
                &FeatureOptions { circle_vertices },
                &mut rand::rng(),
            );
            println!("{}", serde_json::to_string_pretty(&collection)?);
        }
        Command::Playback {
            request,
            trajectory,
            step_ms,
        } => {
            if step_ms <= 0 {
                bail!("--step-ms must be positive, got {}", step_ms);
            }
            let request = read_request(&request)?;
            let found = request
                .trajectories
                .iter()
                .find(|candidate| candidate.id == trajectory)
                .with_context(|| format!("Trajectory {} not found in request", trajectory))?;
            let waypoints = sorted_waypoints(&found.waypoints);
            let (Some(first), Some(last)) = (waypoints.first(), waypoints.last()) else {
                bail!("Trajectory {} has no waypoints", trajectory);
            };
            let (start, end) = (first.timestamp, last.timestamp);

            let mut generator = TrajectoryPlotGenerator::new(waypoints, start, end)
                .with_context(|| format!("Trajectory {} cannot be played back", trajectory))?;
            let mut count = 0usize;
            for plot in generator.plots(step_ms) {
                println!("{}", plot_line(&plot));
                count += 1;
            }
            tracing::info!("Played back {} plots for trajectory {}", count, trajectory);
        }
        Command::Scenario {
            kind,
            lat,
            lon,
            speed,
            separation,
        } => {
            let params = ScenarioParams {
                center: GeoPoint::new(lon, lat),
                speed_mps: speed,
                lateral_separation: separation,
                ..ScenarioParams::default()
            };
            if params.speed_mps <= 0.0 {
                bail!("--speed must be positive, got {}", speed);
            }
            let scenario = create_scenario(kind, &params);
            tracing::info!(
                "Scenario {} with {} trajectories",
                scenario.name,
                scenario.request.trajectories.len()
            );
            println!("{}", serde_json::to_string_pretty(&scenario.request)?);
        }
        Command::Submit {
            request,
            url,
            features,
            v2,
        } => {
            let request = read_request(&request)?;
            let version = if v2 { ApiVersion::V2 } else { ApiVersion::V1 };
            let client = ForecastClient::new(url, version);
            if features {
                let collection = client.conflict_features(&request)?;
                println!("{}", serde_json::to_string_pretty(&collection)?);
            } else {
                let response = client.conflicts(&request)?;
                println!("{}", conflict_table(&response.conflicts));
            }
        }
    }

    Ok(())
}

fn read_request(path: &Path) -> Result<ConflictForecastRequest> {
    let body = if path == Path::new("-") {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("Failed to read request from stdin")?;
        body
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    serde_json::from_str(&body).with_context(|| format!("Invalid request JSON in {}", path.display()))
}
