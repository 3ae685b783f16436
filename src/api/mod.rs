//! Typed client for the Hub'Eau APIs.
//!
//! [`HubeauClient`] owns the HTTP client and the API root. The per-API
//! accessors [`HubeauClient::qualite_rivieres`] and
//! [`HubeauClient::hydrometrie`] expose one method per endpoint.

mod endpoint;
pub mod hydrometrie;
pub mod qualite_rivieres;

pub use endpoint::{Api, DEFAULT_BASE_URL, Endpoint};
pub use hydrometrie::Hydrometrie;
pub use qualite_rivieres::QualiteRivieres;

use crate::config::ClientConfig;
use crate::envelope::{Envelope, parse_envelope};
use crate::error::Result;
use crate::fetch::pager::{self, Collected, PageRequest};
use crate::fetch::{BasicClient, HttpClient, build_url, get_bytes, get_json};
use futures::Stream;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Query parameters as sent to the API.
pub type Params = Vec<(String, String)>;

/// Builds [`Params`] from `(key, value)` pairs.
pub fn params<K: ToString, V: ToString>(pairs: &[(K, V)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub struct HubeauClient<C = BasicClient> {
    http: C,
    base_url: String,
}

impl HubeauClient<BasicClient> {
    /// Client against the public API with the configured request timeout.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = BasicClient::with_timeout(config.timeout).map_err(|source| {
            crate::error::HubeauError::Request {
                url: config.base_url.clone(),
                source,
            }
        })?;
        Ok(Self::with_http_client(http, &config.base_url))
    }
}

impl<C: HttpClient> HubeauClient<C> {
    pub fn with_http_client(http: C, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    pub fn qualite_rivieres(&self) -> QualiteRivieres<'_, C> {
        QualiteRivieres::new(self)
    }

    pub fn hydrometrie(&self) -> Hydrometrie<'_, C> {
        Hydrometrie::new(self)
    }

    /// A paginated request template for `endpoint`.
    pub fn page_request(&self, endpoint: Endpoint, page_size: usize) -> PageRequest {
        PageRequest::new(endpoint.url(&self.base_url), page_size)
    }

    /// Single strict read: the whole page must decode as `Envelope<T>`.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &[(String, String)],
    ) -> Result<Envelope<T>> {
        let url = build_url(&endpoint.url(&self.base_url), params)?;
        let source = url.to_string();
        let body = get_bytes(&self.http, url).await?;
        parse_envelope(&source, &body)
    }

    /// Single tolerant read: the page is returned as raw JSON objects.
    ///
    /// Entries of `data` that are not objects are skipped.
    pub async fn get_raw(
        &self,
        endpoint: Endpoint,
        params: &[(String, String)],
    ) -> Result<Envelope<Map<String, Value>>> {
        let url = build_url(&endpoint.url(&self.base_url), params)?;
        let value: Value = get_json(&self.http, url).await?;

        let count = value.get("count").and_then(Value::as_u64).unwrap_or(0);
        let data = match value.get("data") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .collect(),
            _ => Vec::new(),
        };
        let link = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);

        Ok(Envelope {
            count,
            first: link("first"),
            last: link("last"),
            prev: link("prev"),
            next: link("next"),
            api_version: link("api_version"),
            data,
        })
    }

    /// Total number of records matching `params`, read from a one-record page.
    pub async fn count(&self, endpoint: Endpoint, params: &[(String, String)]) -> Result<u64> {
        let mut params = params.to_vec();
        params.push(("size".to_string(), "1".to_string()));
        let envelope = self.get_raw(endpoint, &params).await?;
        Ok(envelope.count)
    }

    /// Lazily streams every record of `request`.
    pub fn stream<T>(&self, request: PageRequest) -> impl Stream<Item = Result<T>> + Send + '_
    where
        T: DeserializeOwned + Send + 'static,
    {
        pager::stream_records(&self.http, request)
    }

    /// Eagerly collects every record of `request`, keeping partial results on failure.
    pub async fn collect<T>(&self, request: PageRequest) -> Collected<T>
    where
        T: DeserializeOwned + Send,
    {
        pager::collect_records(&self.http, request).await
    }
}
