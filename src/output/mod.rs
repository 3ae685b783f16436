//! Report persistence for the time-series pipeline.
//!
//! Results are appended after every station to a JSON list and a
//! `;`-delimited CSV table, each rotating independently on a size ceiling.
//! At the end of a run the complete result set is written once more as a
//! final report next to a Markdown summary.

pub mod rotation;
pub mod summary;

use crate::analyzers::StationResult;
use crate::config::PipelineConfig;
use crate::error::{HubeauError, Result};
use chrono::{NaiveDate, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub use rotation::rotation_target;
pub use summary::write_summary;

/// Stem of the incremental report files.
pub const INCREMENTAL_STEM: &str = "tsa_analysis";
/// Stem of the final report files.
pub const FINAL_STEM: &str = "tsa_report";
pub const SUMMARY_FILE: &str = "tsa_summary.md";

pub const CSV_HEADER: [&str; 7] = [
    "station_code",
    "station_name",
    "parameter",
    "n_measurements",
    "min_date",
    "max_date",
    "time_span_days",
];

const CSV_DELIMITER: u8 = b';';

/// One CSV row: a candidate with its station.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    station_code: Option<&'a str>,
    station_name: Option<&'a str>,
    parameter: &'a str,
    n_measurements: u64,
    min_date: NaiveDate,
    max_date: NaiveDate,
    time_span_days: i64,
}

fn csv_rows(results: &[StationResult]) -> impl Iterator<Item = CsvRow<'_>> {
    results.iter().flat_map(|r| {
        r.tsa_candidates.iter().map(move |c| CsvRow {
            station_code: r.station.code_station.as_deref(),
            station_name: r.station.libelle_station.as_deref(),
            parameter: &c.parameter,
            n_measurements: c.n_measurements,
            min_date: c.min_date,
            max_date: c.max_date,
            time_span_days: c.time_span_days,
        })
    })
}

/// Removes `null` members from `value` and every nested object.
fn prune_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(prune_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(prune_nulls),
        _ => {}
    }
}

/// JSON form of a result; the station is written without its null fields.
pub fn result_to_value(result: &StationResult) -> Result<Value> {
    let mut value = serde_json::to_value(result)?;
    if let Some(station) = value.get_mut("station") {
        prune_nulls(station);
    }
    Ok(value)
}

/// Reads the JSON list at `path`.
///
/// A missing, empty or malformed file yields an empty list.
fn load_json_list(path: &Path) -> Result<Vec<Value>> {
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(HubeauError::Io(path.to_path_buf(), e)),
    };
    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    match serde_json::from_slice::<Vec<Value>>(&content) {
        Ok(list) => Ok(list),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Existing report is not a JSON list, starting fresh");
            Ok(Vec::new())
        }
    }
}

fn write_json_list(path: &Path, values: &[Value]) -> Result<()> {
    let file = File::create(path).map_err(|e| HubeauError::Io(path.to_path_buf(), e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, values)?;
    writer
        .flush()
        .map_err(|e| HubeauError::Io(path.to_path_buf(), e))
}

/// Appends candidate rows to the CSV at `path`.
///
/// The header is written when the file is new or empty.
fn append_csv(path: &Path, results: &[StationResult]) -> Result<()> {
    let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    debug!(path = %path.display(), needs_header, "Appending CSV rows");

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| HubeauError::Io(path.to_path_buf(), e))?;

    let mut writer = WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .has_headers(false)
        .from_writer(file);

    if needs_header {
        writer.write_record(CSV_HEADER)?;
    }
    for row in csv_rows(results) {
        writer.serialize(row)?;
    }
    writer
        .flush()
        .map_err(|e| HubeauError::Io(path.to_path_buf(), e))
}

/// Writes pipeline results to rotating report files in one directory.
///
/// All writes happen from a single task; the writer holds no lock.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
    max_json_size: u64,
    max_csv_size: u64,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>, max_json_size: u64, max_csv_size: u64) -> Self {
        Self {
            dir: dir.into(),
            max_json_size,
            max_csv_size,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(&config.output_dir, config.max_json_size, config.max_csv_size)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| HubeauError::Io(self.dir.clone(), e))
    }

    /// Files the next incremental save writes to, as `(json, csv)`.
    pub fn current_targets(&self) -> Result<(PathBuf, PathBuf)> {
        let json = rotation_target(&self.dir, INCREMENTAL_STEM, "json", self.max_json_size)?;
        let csv = rotation_target(&self.dir, INCREMENTAL_STEM, "csv", self.max_csv_size)?;
        Ok((json, csv))
    }

    /// Appends `results` to the current incremental JSON and CSV files.
    pub fn save_incremental(&self, results: &[StationResult]) -> Result<()> {
        self.ensure_dir()?;
        let (json_path, csv_path) = self.current_targets()?;

        let mut list = load_json_list(&json_path)?;
        for result in results {
            list.push(result_to_value(result)?);
        }
        write_json_list(&json_path, &list)?;
        append_csv(&csv_path, results)?;

        debug!(
            json = %json_path.display(),
            csv = %csv_path.display(),
            results = results.len(),
            "Saved incremental results"
        );
        Ok(())
    }

    /// Writes the complete run as the final report and summary, replacing
    /// any previous final report.
    pub fn save_final(&self, results: &[StationResult], top_n: usize) -> Result<()> {
        self.ensure_dir()?;

        let json_path = self.dir.join(format!("{FINAL_STEM}.json"));
        let values = results
            .iter()
            .map(result_to_value)
            .collect::<Result<Vec<_>>>()?;
        write_json_list(&json_path, &values)?;

        let csv_path = self.dir.join(format!("{FINAL_STEM}.csv"));
        if csv_path.exists() {
            fs::remove_file(&csv_path).map_err(|e| HubeauError::Io(csv_path.clone(), e))?;
        }
        append_csv(&csv_path, results)?;

        let summary_path = self.dir.join(SUMMARY_FILE);
        let file =
            File::create(&summary_path).map_err(|e| HubeauError::Io(summary_path.clone(), e))?;
        let mut writer = BufWriter::new(file);
        write_summary(&mut writer, results, top_n, Utc::now())
            .and_then(|()| writer.flush())
            .map_err(|e| HubeauError::Io(summary_path.clone(), e))?;

        info!(
            dir = %self.dir.display(),
            stations = results.len(),
            "Saved final report"
        );
        Ok(())
    }
}
