//! CLI entry point for the Hub'Eau client.
//!
//! Provides subcommands for inspecting endpoint schemas, validating the
//! typed models against live responses, exploring the APIs, and running the
//! station time-series analysis.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use hubeau::api::{Api, DEFAULT_BASE_URL, Endpoint, HubeauClient};
use hubeau::config::{ClientConfig, ExecutionMode, PipelineConfig, StationSelection};
use hubeau::fetch::Pagination;
use hubeau::inspect::{self, CHECK_SAMPLE_SIZE};
use hubeau::pipeline::Pipeline;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "hubeau")]
#[command(about = "Explore and analyse the Hub'Eau water data APIs", long_about = None)]
struct Cli {
    /// Root URL of the Hub'Eau v2 APIs
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 60)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print field types, examples and suggested Rust types for an endpoint
    Inspect {
        #[arg(value_enum)]
        endpoint: Endpoint,
    },
    /// List fields present in responses but not declared by the model, and the reverse
    CheckFields {
        #[arg(value_enum)]
        endpoint: Endpoint,
    },
    /// Strictly decode a small page of one endpoint, or of every endpoint
    Validate {
        #[arg(value_enum)]
        endpoint: Option<Endpoint>,
    },
    /// Count and list fields of every endpoint of an API, saving samples
    Explore {
        /// API to explore; both when omitted
        #[arg(value_enum)]
        api: Option<Api>,

        /// Directory receiving samples; defaults to data/exploration/<api>
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Summarise how long each parameter has been measured at selected stations
    TimeSeries(TimeSeriesArgs),
}

#[derive(clap::Args)]
struct TimeSeriesArgs {
    /// Directory receiving the reports
    #[arg(short, long, default_value = "data/exploration/qualite_rivieres")]
    output_dir: PathBuf,

    /// Analyse the first N stations of the referential
    #[arg(short = 'n', long, default_value_t = 3, conflicts_with = "indices")]
    stations: usize,

    /// Analyse the stations at these zero-based positions of the referential
    #[arg(long, value_delimiter = ',')]
    indices: Option<Vec<usize>>,

    /// Maximum analyses read per station
    #[arg(long, default_value_t = 30_000, conflicts_with = "all_analyses")]
    max_analyses: usize,

    /// Read every analysis of each station
    #[arg(long)]
    all_analyses: bool,

    /// Only read analyses sampled on or after this date (YYYY-MM-DD)
    #[arg(long)]
    since: Option<NaiveDate>,

    /// Process stations concurrently
    #[arg(long)]
    parallel: bool,

    /// Number of concurrent stations in parallel mode; defaults to the CPU count
    #[arg(short, long, requires = "parallel")]
    workers: Option<usize>,

    /// Pause between stations in sequential mode, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pause_ms: u64,

    #[arg(long, default_value_t = 100)]
    station_page_size: usize,

    #[arg(long, default_value_t = 1000)]
    analysis_page_size: usize,

    #[arg(long, value_enum, default_value_t = Pagination::Offset)]
    station_pagination: Pagination,

    #[arg(long, value_enum, default_value_t = Pagination::Page)]
    analysis_pagination: Pagination,

    /// Save an in-progress snapshot every N analyses of a station (0 disables)
    #[arg(long, default_value_t = 1000)]
    progress_interval: usize,

    /// Size in bytes at which a JSON report file is rotated
    #[arg(long)]
    max_json_size: Option<u64>,

    /// Size in bytes at which a CSV report file is rotated
    #[arg(long)]
    max_csv_size: Option<u64>,

    /// Number of candidates listed in the summary
    #[arg(long, default_value_t = 20)]
    top: usize,
}

impl TimeSeriesArgs {
    fn into_config(self) -> PipelineConfig {
        let defaults = PipelineConfig::default();
        let selection = match self.indices {
            Some(indices) => StationSelection::Indices(indices),
            None => StationSelection::First(self.stations),
        };
        let mode = match (self.parallel, self.workers) {
            (false, _) => ExecutionMode::Sequential,
            (true, Some(workers)) => ExecutionMode::Parallel { workers },
            (true, None) => ExecutionMode::parallel(),
        };

        PipelineConfig {
            output_dir: self.output_dir,
            max_json_size: self.max_json_size.unwrap_or(defaults.max_json_size),
            max_csv_size: self.max_csv_size.unwrap_or(defaults.max_csv_size),
            station_page_size: self.station_page_size,
            analysis_page_size: self.analysis_page_size,
            max_analyses_per_station: (!self.all_analyses).then_some(self.max_analyses),
            selection,
            progress_interval: self.progress_interval,
            mode,
            pause: Duration::from_millis(self.pause_ms),
            station_pagination: self.station_pagination,
            analysis_pagination: self.analysis_pagination,
            analyses_since: self.since,
            summary_top_n: self.top,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Parsed before the log writer exists: exiting here has nothing to flush.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        // --help and --version
        Err(e) => e.exit(),
    };

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/hubeau.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("hubeau.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    // Flushes buffered log lines when main returns, whichever way it does.
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(LevelFilter::INFO.into()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive(LevelFilter::DEBUG.into()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let client = HubeauClient::new(&ClientConfig {
        base_url: cli.base_url,
        timeout: Duration::from_secs(cli.timeout),
    })
    .context("Failed to build HTTP client")?;

    let outcome = match cli.command {
        Commands::Inspect { endpoint } => inspect_command(&client, endpoint).await,
        Commands::CheckFields { endpoint } => check_fields_command(&client, endpoint).await,
        Commands::Validate { endpoint } => validate_command(&client, endpoint).await,
        Commands::Explore { api, output_dir } => explore_command(&client, api, output_dir).await,
        Commands::TimeSeries(args) => time_series_command(client, args.into_config()).await,
    };

    // Remote and I/O failures are reported, not turned into an exit code.
    if let Err(e) = outcome {
        error!(error = %format!("{e:#}"), "Command failed");
    }
    Ok(())
}

async fn inspect_command(client: &HubeauClient, endpoint: Endpoint) -> Result<()> {
    let (report, sample_len) = inspect::inspect_endpoint(client, endpoint)
        .await
        .with_context(|| format!("Failed to sample {endpoint}"))?;

    println!("\nField info for {endpoint} ({sample_len} records):\n");
    for (field, info) in &report {
        let types: Vec<_> = info.types.iter().copied().collect();
        let samples: Vec<String> = info.samples.iter().map(|v| v.to_string()).collect();
        println!("{field}:");
        println!("  types: {}", types.join(", "));
        println!("  example: {}", info.example);
        println!("  sample values: [{}]", samples.join(", "));
        println!("  suggested Rust type: {}", info.suggested_type(sample_len));
        println!();
    }

    println!("===== Rust model template =====");
    print!("{}", inspect::struct_template("Record", &report, sample_len));
    Ok(())
}

async fn check_fields_command(client: &HubeauClient, endpoint: Endpoint) -> Result<()> {
    info!(%endpoint, samples = CHECK_SAMPLE_SIZE, "Checking fields");
    let diff = inspect::check_fields(client, endpoint)
        .await
        .with_context(|| format!("Failed to sample {endpoint}"))?;

    let print_set = |title: &str, set: &std::collections::BTreeSet<String>| {
        println!("\n{title}:");
        for field in set {
            println!("  - {field}");
        }
    };
    print_set("Fields in API response but NOT in model", &diff.undocumented);
    print_set(
        "Fields in model but NOT in API response (may be OK if optional)",
        &diff.missing,
    );
    print_set("All fields in API response", &diff.response_fields);
    print_set("All fields in model", &diff.model_fields);
    Ok(())
}

async fn validate_command(client: &HubeauClient, endpoint: Option<Endpoint>) -> Result<()> {
    let endpoints: Vec<Endpoint> = match endpoint {
        Some(endpoint) => vec![endpoint],
        None => Endpoint::all().collect(),
    };

    let mut failures = 0;
    for endpoint in endpoints {
        match inspect::validate_endpoint(client, endpoint).await {
            Ok(records) => info!(%endpoint, records, "Records match the model"),
            Err(e) => {
                failures += 1;
                error!(%endpoint, error = %e, "Validation failed");
            }
        }
    }

    if failures > 0 {
        warn!(failures, "Some endpoints failed validation");
    }
    Ok(())
}

async fn explore_command(
    client: &HubeauClient,
    api: Option<Api>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let apis = match api {
        Some(api) => vec![api],
        None => vec![Api::QualiteRivieres, Api::Hydrometrie],
    };

    for api in apis {
        let dir = match &output_dir {
            Some(dir) => dir.join(api.path()),
            None => PathBuf::from("data/exploration").join(api.path()),
        };
        let summaries = inspect::explore(client, api, &dir).await?;
        for summary in &summaries {
            match &summary.error {
                Some(e) => warn!(endpoint = %summary.endpoint, error = %e, "Endpoint unavailable"),
                None => info!(
                    endpoint = %summary.endpoint,
                    count = ?summary.count,
                    fields = %summary.fields.join(", "),
                    "Endpoint"
                ),
            }
        }
        info!(api = api.path(), dir = %dir.display(), "Exploration saved");
    }
    Ok(())
}

async fn time_series_command(client: HubeauClient, config: PipelineConfig) -> Result<()> {
    info!(
        selection = ?config.selection,
        mode = ?config.mode,
        max_analyses = ?config.max_analyses_per_station,
        "Starting time-series analysis"
    );
    let pipeline = Pipeline::new(client, config);

    tokio::select! {
        outcome = pipeline.run() => {
            let results = outcome.context("Time-series analysis failed")?;
            info!(
                stations = results.len(),
                dir = %pipeline.writer().dir().display(),
                "Results saved"
            );
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, results saved so far are kept");
        }
    }
    Ok(())
}
