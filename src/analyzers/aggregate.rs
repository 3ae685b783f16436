use crate::analyzers::types::TimeSeriesCandidate;
use crate::models::{AnalysePc, ResultValue};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Format of `date_prelevement`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy)]
struct ParameterStats {
    count: u64,
    min: NaiveDate,
    max: NaiveDate,
}

/// Folds analyses of one station into per-parameter date ranges.
///
/// Analyses are pushed one at a time so the accumulator can sit on top of a
/// lazy page stream. Only the count and the date bounds are kept per
/// parameter.
#[derive(Debug, Default, Clone)]
pub struct ParameterAccumulator {
    stats: BTreeMap<String, ParameterStats>,
    seen: usize,
}

impl ParameterAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one analysis.
    ///
    /// Analyses without a parameter name, with a non-informative result or
    /// with an unparseable date are skipped.
    pub fn push(&mut self, analysis: &AnalysePc) {
        self.seen += 1;

        let Some(parameter) = analysis.libelle_parametre.as_deref() else {
            return;
        };
        if !analysis
            .resultat
            .as_ref()
            .is_some_and(ResultValue::is_informative)
        {
            return;
        }
        let Some(date) = analysis
            .date_prelevement
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
        else {
            return;
        };

        self.stats
            .entry(parameter.to_string())
            .and_modify(|s| {
                s.count += 1;
                s.min = s.min.min(date);
                s.max = s.max.max(date);
            })
            .or_insert(ParameterStats {
                count: 1,
                min: date,
                max: date,
            });
    }

    /// Number of analyses pushed so far, informative or not.
    pub fn analyses_seen(&self) -> usize {
        self.seen
    }

    /// Candidates for the analyses pushed so far, sorted by parameter name.
    pub fn candidates(&self) -> Vec<TimeSeriesCandidate> {
        self.stats
            .iter()
            .map(|(parameter, s)| TimeSeriesCandidate {
                parameter: parameter.clone(),
                n_measurements: s.count,
                min_date: s.min,
                max_date: s.max,
                time_span_days: (s.max - s.min).num_days(),
            })
            .collect()
    }
}

/// Aggregates a complete set of analyses.
pub fn aggregate<'a, I>(analyses: I) -> Vec<TimeSeriesCandidate>
where
    I: IntoIterator<Item = &'a AnalysePc>,
{
    let mut acc = ParameterAccumulator::new();
    for analysis in analyses {
        acc.push(analysis);
    }
    acc.candidates()
}
