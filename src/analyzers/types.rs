//! Data types produced by the time-series analysis.

use crate::models::StationPc;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Measurement history of one parameter at one station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesCandidate {
    pub parameter: String,
    pub n_measurements: u64,
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    /// Whole days between `min_date` and `max_date`.
    pub time_span_days: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationStatus {
    Ok,
    InProgress,
    Error,
}

/// Outcome of processing one station, as written to the reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationResult {
    pub station: StationPc,
    pub status: StationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub tsa_candidates: Vec<TimeSeriesCandidate>,
}

impl StationResult {
    pub fn ok(station: StationPc, analysis_count: usize, candidates: Vec<TimeSeriesCandidate>) -> Self {
        Self {
            station,
            status: StationStatus::Ok,
            analysis_count: Some(analysis_count),
            error: None,
            tsa_candidates: candidates,
        }
    }

    pub fn in_progress(
        station: StationPc,
        analysis_count: usize,
        candidates: Vec<TimeSeriesCandidate>,
    ) -> Self {
        Self {
            status: StationStatus::InProgress,
            ..Self::ok(station, analysis_count, candidates)
        }
    }

    /// A failed station carries no candidates.
    pub fn error(station: StationPc, error: impl ToString) -> Self {
        Self {
            station,
            status: StationStatus::Error,
            analysis_count: None,
            error: Some(error.to_string()),
            tsa_candidates: Vec::new(),
        }
    }

    pub fn is_final(&self) -> bool {
        self.status != StationStatus::InProgress
    }
}
