//! Human-readable summary of a completed run.

use crate::analyzers::utility::{mean, median};
use crate::analyzers::{StationResult, StationStatus, TimeSeriesCandidate};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Per-parameter distribution of time spans across stations.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanStats {
    pub stations: usize,
    pub min: i64,
    pub median: f64,
    pub mean: f64,
    pub max: i64,
}

/// Span statistics keyed by parameter name.
pub fn span_by_parameter(results: &[StationResult]) -> BTreeMap<String, SpanStats> {
    let mut spans: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
    for candidate in results.iter().flat_map(|r| &r.tsa_candidates) {
        spans
            .entry(candidate.parameter.as_str())
            .or_default()
            .push(candidate.time_span_days);
    }

    spans
        .into_iter()
        .map(|(parameter, days)| {
            let as_f64: Vec<f64> = days.iter().map(|d| *d as f64).collect();
            let stats = SpanStats {
                stations: days.len(),
                min: days.iter().copied().min().unwrap_or(0),
                median: median(&as_f64),
                mean: mean(&as_f64),
                max: days.iter().copied().max().unwrap_or(0),
            };
            (parameter.to_string(), stats)
        })
        .collect()
}

/// The `n` candidates with the most measurements, with their station.
pub fn top_candidates(results: &[StationResult], n: usize) -> Vec<(&StationResult, &TimeSeriesCandidate)> {
    let mut all: Vec<_> = results
        .iter()
        .flat_map(|r| r.tsa_candidates.iter().map(move |c| (r, c)))
        .collect();
    all.sort_by(|(ra, a), (rb, b)| {
        b.n_measurements
            .cmp(&a.n_measurements)
            .then_with(|| ra.station.code_station.cmp(&rb.station.code_station))
            .then_with(|| a.parameter.cmp(&b.parameter))
    });
    all.truncate(n);
    all
}

/// Writes the Markdown summary of `results` to `out`.
pub fn write_summary<W: Write>(
    out: &mut W,
    results: &[StationResult],
    top_n: usize,
    generated_at: DateTime<Utc>,
) -> io::Result<()> {
    let ok = results.iter().filter(|r| r.status == StationStatus::Ok).count();
    let errors: Vec<_> = results
        .iter()
        .filter(|r| r.status == StationStatus::Error)
        .collect();
    let analyses: usize = results.iter().filter_map(|r| r.analysis_count).sum();
    let candidates: usize = results.iter().map(|r| r.tsa_candidates.len()).sum();

    writeln!(out, "# Time-series analysis summary\n")?;
    writeln!(out, "Generated at {}\n", generated_at.to_rfc3339())?;
    writeln!(out, "- Stations processed: {}", results.len())?;
    writeln!(out, "- Stations ok: {ok}")?;
    writeln!(out, "- Stations in error: {}", errors.len())?;
    writeln!(out, "- Analyses read: {analyses}")?;
    writeln!(out, "- Time-series candidates: {candidates}\n")?;

    writeln!(out, "## Top {top_n} candidates by measurement count\n")?;
    writeln!(
        out,
        "| Station | Name | Parameter | Measurements | From | To | Span (days) |"
    )?;
    writeln!(out, "|---|---|---|---:|---|---|---:|")?;
    for (result, c) in top_candidates(results, top_n) {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} |",
            result.station.display_code(),
            result.station.libelle_station.as_deref().unwrap_or(""),
            c.parameter,
            c.n_measurements,
            c.min_date,
            c.max_date,
            c.time_span_days
        )?;
    }

    writeln!(out, "\n## Time span by parameter\n")?;
    writeln!(
        out,
        "| Parameter | Stations | Min | Median | Mean | Max |"
    )?;
    writeln!(out, "|---|---:|---:|---:|---:|---:|")?;
    for (parameter, s) in span_by_parameter(results) {
        writeln!(
            out,
            "| {parameter} | {} | {} | {:.1} | {:.1} | {} |",
            s.stations, s.min, s.median, s.mean, s.max
        )?;
    }

    if !errors.is_empty() {
        writeln!(out, "\n## Errors\n")?;
        for r in errors {
            writeln!(
                out,
                "- {}: {}",
                r.station.display_code(),
                r.error.as_deref().unwrap_or("unknown error")
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StationPc;
    use chrono::{NaiveDate, TimeZone};

    fn candidate(parameter: &str, n: u64, span: i64) -> TimeSeriesCandidate {
        let min = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        TimeSeriesCandidate {
            parameter: parameter.into(),
            n_measurements: n,
            min_date: min,
            max_date: min + chrono::Duration::days(span),
            time_span_days: span,
        }
    }

    fn station(code: &str) -> StationPc {
        StationPc {
            code_station: Some(code.into()),
            libelle_station: Some(format!("Station {code}")),
            ..Default::default()
        }
    }

    fn results() -> Vec<StationResult> {
        vec![
            StationResult::ok(station("A1"), 40, vec![candidate("pH", 10, 100), candidate("O2", 3, 0)]),
            StationResult::ok(station("B2"), 25, vec![candidate("pH", 20, 300)]),
            StationResult::error(StationPc::default(), "No code_station"),
        ]
    }

    #[test]
    fn test_span_by_parameter() {
        let spans = span_by_parameter(&results());

        let ph = &spans["pH"];
        assert_eq!(ph.stations, 2);
        assert_eq!((ph.min, ph.max), (100, 300));
        assert_eq!(ph.median, 200.0);
        assert_eq!(spans["O2"].stations, 1);
    }

    #[test]
    fn test_top_candidates_ordering() {
        let results = results();
        let top = top_candidates(&results, 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0.station.display_code(), "B2");
        assert_eq!(top[1].1.n_measurements, 10);
    }

    #[test]
    fn test_write_summary() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut buf = Vec::new();
        write_summary(&mut buf, &results(), 20, at).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("- Stations processed: 3"));
        assert!(text.contains("- Analyses read: 65"));
        assert!(text.contains("| B2 | Station B2 | pH | 20 | 2020-01-01 | 2020-10-27 | 300 |"));
        assert!(text.contains("| pH | 2 | 100 | 200.0 | 200.0 | 300 |"));
        assert!(text.contains("- unknown: No code_station"));
    }
}
