//! The station time-series pipeline.
//!
//! Stations are selected from the referential, then each station's analyses
//! are streamed page by page into a [`ParameterAccumulator`]. Worker tasks
//! report progress snapshots and final results over a channel; the
//! coordinating task is the only one touching the report files.

use crate::analyzers::aggregate::DATE_FORMAT;
use crate::analyzers::{ParameterAccumulator, StationResult};
use crate::api::HubeauClient;
use crate::config::{ExecutionMode, PipelineConfig, StationSelection};
use crate::error::{HubeauError, Result};
use crate::fetch::{BasicClient, HttpClient};
use crate::models::StationPc;
use crate::output::ReportWriter;
use futures::{StreamExt, pin_mut};
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info, warn};

const CHANNEL_CAPACITY: usize = 64;

/// Message from a station worker to the coordinator.
#[derive(Debug)]
pub enum StationUpdate {
    /// Snapshot of a station still being read.
    Progress(StationResult),
    /// Final result of a station.
    Finished(StationResult),
}

/// Reads every analysis of `station` and folds it into time-series candidates.
///
/// Every `config.progress_interval` analyses an in-progress snapshot is sent
/// on `updates`. Failures never escape: a station without a code or whose
/// analyses cannot be fetched yields an error result with no candidates.
pub async fn process_station<C: HttpClient>(
    client: &HubeauClient<C>,
    station: StationPc,
    config: &PipelineConfig,
    updates: &mpsc::Sender<StationUpdate>,
) -> StationResult {
    let Some(code) = station.code_station.clone() else {
        warn!(name = ?station.libelle_station, "Skipping station without code_station");
        return StationResult::error(station, HubeauError::MissingStationCode);
    };

    let api = client.qualite_rivieres();
    let mut request =
        match api.analyses_request(&code, config.analysis_page_size, config.analysis_pagination) {
            Ok(request) => request.limit(config.max_analyses_per_station),
            Err(e) => return StationResult::error(station, e),
        };
    if let Some(since) = config.analyses_since {
        request = request.param("date_prelevement_min", since.format(DATE_FORMAT));
    }

    let analyses = api.stream_analyses(request);
    pin_mut!(analyses);

    let mut acc = ParameterAccumulator::new();
    while let Some(item) = analyses.next().await {
        let analysis = match item {
            Ok(analysis) => analysis,
            Err(e) => {
                error!(code_station = %code, analyses = acc.analyses_seen(), error = %e, "Failed to fetch analyses");
                return StationResult::error(station, e);
            }
        };
        acc.push(&analysis);

        let seen = acc.analyses_seen();
        if config.progress_interval > 0 && seen % config.progress_interval == 0 {
            info!(code_station = %code, analyses = seen, "Saving intermediate results");
            let snapshot = StationResult::in_progress(station.clone(), seen, acc.candidates());
            if updates.send(StationUpdate::Progress(snapshot)).await.is_err() {
                debug!(code_station = %code, "Coordinator gone, dropping progress snapshot");
            }
        }
    }

    let candidates = acc.candidates();
    info!(
        code_station = %code,
        analyses = acc.analyses_seen(),
        candidates = candidates.len(),
        "Station processed"
    );
    StationResult::ok(station, acc.analyses_seen(), candidates)
}

/// Runs the pipeline against one client with one configuration.
pub struct Pipeline<C = BasicClient> {
    client: Arc<HubeauClient<C>>,
    config: Arc<PipelineConfig>,
    writer: ReportWriter,
}

impl<C: HttpClient + 'static> Pipeline<C> {
    pub fn new(client: HubeauClient<C>, config: PipelineConfig) -> Self {
        let writer = ReportWriter::from_config(&config);
        Self {
            client: Arc::new(client),
            config: Arc::new(config),
            writer,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn writer(&self) -> &ReportWriter {
        &self.writer
    }

    /// Fetches the stations named by the configured selection.
    pub async fn select_stations(&self) -> Result<Vec<StationPc>> {
        let api = self.client.qualite_rivieres();
        match &self.config.selection {
            StationSelection::First(n) => {
                let request = api
                    .stations_request(self.config.station_page_size, self.config.station_pagination)
                    .limit(Some(*n));
                let collected = self.client.collect::<StationPc>(request).await;
                if collected.truncated {
                    warn!(
                        requested = n,
                        fetched = collected.records.len(),
                        "Station list incomplete"
                    );
                }
                Ok(collected.records)
            }
            StationSelection::Indices(indices) => {
                api.fetch_stations_by_indices(indices, self.config.station_page_size)
                    .await
            }
        }
    }

    /// Runs the whole pipeline and returns the final result of every station.
    ///
    /// Results are saved incrementally as they arrive, then once more as the
    /// final report. Per-station failures are part of the results; only a
    /// failure to list the stations or to write the final report is an error.
    pub async fn run(&self) -> Result<Vec<StationResult>> {
        match self.client.qualite_rivieres().station_count().await {
            Ok(total) => info!(total, "Total stations available"),
            Err(e) => warn!(error = %e, "Could not read station count"),
        }

        let stations = self.select_stations().await?;
        info!(selected = stations.len(), "Selected stations");
        for (i, station) in stations.iter().enumerate() {
            debug!(
                rank = i + 1,
                code_station = station.display_code(),
                name = ?station.libelle_station,
                "Selected station"
            );
        }

        let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
        let producer = match self.config.mode {
            ExecutionMode::Sequential => tokio::spawn(run_sequential(
                self.client.clone(),
                self.config.clone(),
                stations,
                tx,
            )),
            ExecutionMode::Parallel { workers } => tokio::spawn(run_parallel(
                self.client.clone(),
                self.config.clone(),
                stations,
                workers,
                tx,
            )),
        };

        let mut results = Vec::new();
        while let Some(update) = rx.recv().await {
            let result = match update {
                StationUpdate::Progress(snapshot) => {
                    self.save(&snapshot);
                    continue;
                }
                StationUpdate::Finished(result) => result,
            };
            self.save(&result);
            results.push(result);
        }

        if let Err(e) = producer.await {
            error!(error = %e, "Station scheduler failed");
        }

        self.writer.save_final(&results, self.config.summary_top_n)?;
        info!(
            stations = results.len(),
            dir = %self.writer.dir().display(),
            "Analysis complete"
        );
        Ok(results)
    }

    fn save(&self, result: &StationResult) {
        if let Err(e) = self.writer.save_incremental(std::slice::from_ref(result)) {
            error!(
                code_station = result.station.display_code(),
                error = %e,
                "Failed to save incremental results"
            );
        }
    }
}

async fn run_sequential<C: HttpClient>(
    client: Arc<HubeauClient<C>>,
    config: Arc<PipelineConfig>,
    stations: Vec<StationPc>,
    tx: mpsc::Sender<StationUpdate>,
) {
    for (i, station) in stations.into_iter().enumerate() {
        if i > 0 && !config.pause.is_zero() {
            tokio::time::sleep(config.pause).await;
        }

        let span = tracing::info_span!("station", code_station = station.display_code());
        let result = process_station(&client, station, &config, &tx)
            .instrument(span)
            .await;
        if tx.send(StationUpdate::Finished(result)).await.is_err() {
            warn!("Coordinator gone, stopping");
            break;
        }
    }
}

async fn run_parallel<C: HttpClient + 'static>(
    client: Arc<HubeauClient<C>>,
    config: Arc<PipelineConfig>,
    stations: Vec<StationPc>,
    workers: usize,
    tx: mpsc::Sender<StationUpdate>,
) {
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut tasks = JoinSet::new();

    for station in stations {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let client = client.clone();
        let config = config.clone();
        let tx = tx.clone();
        let span = tracing::info_span!("station", code_station = station.display_code());

        tasks.spawn(
            async move {
                let _permit = permit;
                let result = process_station(&client, station, &config, &tx).await;
                let _ = tx.send(StationUpdate::Finished(result)).await;
            }
            .instrument(span),
        );
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "Station task failed");
        }
    }
}
