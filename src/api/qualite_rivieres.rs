use super::{Endpoint, HubeauClient, Params, params};
use crate::error::{HubeauError, Result};
use crate::fetch::HttpClient;
use crate::fetch::pager::{Collected, PageRequest, Pagination};
use crate::models::{AnalysePc, ConditionEnvironnementalePc, OperationPc, StationPc};
use futures::Stream;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Endpoints of `qualite_rivieres`.
pub struct QualiteRivieres<'a, C> {
    client: &'a HubeauClient<C>,
}

impl<'a, C: HttpClient> QualiteRivieres<'a, C> {
    pub(crate) fn new(client: &'a HubeauClient<C>) -> Self {
        Self { client }
    }

    /// One page of stations, optionally filtered by commune name.
    pub async fn get_stations(
        &self,
        libelle_commune: Option<&str>,
        size: usize,
    ) -> Result<Vec<StationPc>> {
        let mut params: Params = vec![("size".to_string(), size.to_string())];
        if let Some(commune) = libelle_commune {
            params.push(("libelle_commune".to_string(), commune.to_string()));
        }
        Ok(self.client.get_page(Endpoint::StationPc, &params).await?.data)
    }

    /// Total number of stations known to the API.
    pub async fn station_count(&self) -> Result<u64> {
        self.client.count(Endpoint::StationPc, &[]).await
    }

    /// Request walking the station referential.
    pub fn stations_request(&self, page_size: usize, pagination: Pagination) -> PageRequest {
        self.client
            .page_request(Endpoint::StationPc, page_size)
            .pagination(pagination)
    }

    /// Fetches the stations at the given zero-based positions of the referential.
    ///
    /// Only the offset pages containing a requested index are read. Positions
    /// past the end are logged and skipped; the result follows index order.
    pub async fn fetch_stations_by_indices(
        &self,
        indices: &[usize],
        page_size: usize,
    ) -> Result<Vec<StationPc>> {
        let page_size = page_size.max(1);
        let mut wanted: Vec<usize> = indices.to_vec();
        wanted.sort_unstable();
        wanted.dedup();

        let pages: BTreeSet<usize> = wanted.iter().map(|idx| idx / page_size).collect();
        let mut stations = Vec::with_capacity(wanted.len());
        let mut missing = Vec::new();

        for page in pages {
            let start = page * page_size;
            info!(start, end = start + page_size - 1, "Fetching stations");
            let params = params(&[("start", start), ("size", page_size)]);
            let batch = self.client.get_page::<StationPc>(Endpoint::StationPc, &params).await?;

            for &idx in wanted.iter().filter(|&&idx| idx / page_size == page) {
                match batch.data.get(idx - start) {
                    Some(station) => {
                        debug!(index = idx, code_station = station.display_code(), "Found station");
                        stations.push(station.clone());
                    }
                    None => missing.push(idx),
                }
            }
        }

        if !missing.is_empty() {
            warn!(?missing, "Could not fetch all requested stations");
        }
        Ok(stations)
    }

    /// Request walking the analyses of one station.
    ///
    /// # Errors
    ///
    /// [`HubeauError::MissingStationCode`] if `code_station` is empty.
    pub fn analyses_request(
        &self,
        code_station: &str,
        page_size: usize,
        pagination: Pagination,
    ) -> Result<PageRequest> {
        if code_station.is_empty() {
            return Err(HubeauError::MissingStationCode);
        }
        Ok(self
            .client
            .page_request(Endpoint::AnalysePc, page_size)
            .param("code_station", code_station)
            .pagination(pagination))
    }

    /// Eagerly fetches up to `max_records` analyses of a station, `size` per page.
    pub async fn get_analyses(
        &self,
        code_station: &str,
        size: usize,
        max_records: usize,
    ) -> Result<Collected<AnalysePc>> {
        let request = self
            .analyses_request(code_station, size, Pagination::Page)?
            .limit(Some(max_records));
        Ok(self.client.collect(request).await)
    }

    /// Lazily streams analyses described by `request`.
    pub fn stream_analyses(
        &self,
        request: PageRequest,
    ) -> impl Stream<Item = Result<AnalysePc>> + Send + 'a {
        self.client.stream(request)
    }

    /// One page of sampling operations.
    pub async fn get_operations(&self, params: &[(String, String)]) -> Result<Vec<OperationPc>> {
        Ok(self.client.get_page(Endpoint::OperationPc, params).await?.data)
    }

    /// One page of environmental conditions.
    pub async fn get_conditions(
        &self,
        params: &[(String, String)],
    ) -> Result<Vec<ConditionEnvironnementalePc>> {
        Ok(self
            .client
            .get_page(Endpoint::ConditionEnvironnementalePc, params)
            .await?
            .data)
    }
}
