//! Run configuration, passed explicitly to the client and the pipeline.

use crate::api::DEFAULT_BASE_URL;
use crate::fetch::{DEFAULT_TIMEOUT, Pagination};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;

const GIB: u64 = 1024 * 1024 * 1024;

/// Transport settings for [`crate::api::HubeauClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Per-request timeout. Requests are never retried.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Which stations a run processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationSelection {
    /// The first `n` stations of the referential.
    First(usize),
    /// Stations at the given zero-based positions in the referential.
    Indices(Vec<usize>),
}

/// How stations are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One station at a time, in selection order.
    Sequential,
    /// Up to `workers` stations at a time; results arrive in completion order.
    Parallel { workers: usize },
}

impl ExecutionMode {
    /// Parallel mode sized to the available CPUs.
    pub fn parallel() -> Self {
        ExecutionMode::Parallel {
            workers: num_cpus::get().max(1),
        }
    }
}

/// Settings of the time-series pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory receiving incremental and final reports. Created if absent.
    pub output_dir: PathBuf,
    /// Size ceiling of one JSON report file before rotation.
    pub max_json_size: u64,
    /// Size ceiling of one CSV report file before rotation.
    pub max_csv_size: u64,
    pub station_page_size: usize,
    pub analysis_page_size: usize,
    /// Analyses read per station; `None` reads them all.
    pub max_analyses_per_station: Option<usize>,
    pub selection: StationSelection,
    /// An in-progress snapshot is saved every this many analyses of a station.
    pub progress_interval: usize,
    pub mode: ExecutionMode,
    /// Pause between stations in sequential mode.
    pub pause: Duration,
    pub station_pagination: Pagination,
    pub analysis_pagination: Pagination,
    /// Sent as `date_prelevement_min` when set.
    pub analyses_since: Option<NaiveDate>,
    /// Number of candidates listed in the summary.
    pub summary_top_n: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data/exploration/qualite_rivieres"),
            max_json_size: 20 * GIB,
            max_csv_size: 20 * GIB,
            station_page_size: 100,
            analysis_page_size: 1000,
            max_analyses_per_station: Some(30_000),
            selection: StationSelection::First(3),
            progress_interval: 1000,
            mode: ExecutionMode::Sequential,
            pause: Duration::from_secs(1),
            station_pagination: Pagination::Offset,
            analysis_pagination: Pagination::Page,
            analyses_since: None,
            summary_top_n: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_defaults() {
        let config = PipelineConfig::default();

        assert_eq!(config.max_json_size, 21_474_836_480);
        assert_eq!(config.max_csv_size, config.max_json_size);
        assert_eq!(config.max_analyses_per_station, Some(30_000));
        assert_eq!(config.selection, StationSelection::First(3));
        assert_eq!(config.analysis_pagination, Pagination::Page);
    }

    #[test]
    fn test_parallel_has_at_least_one_worker() {
        match ExecutionMode::parallel() {
            ExecutionMode::Parallel { workers } => assert!(workers >= 1),
            ExecutionMode::Sequential => panic!("expected parallel mode"),
        }
    }
}
