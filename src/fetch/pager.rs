//! Paginated collection fetching.
//!
//! Hub'Eau resources are read page by page. Two query idioms are in use:
//! `start`/`size` offsets and 1-based `page`/`size`. The page size sent to the
//! server stays constant for the whole walk; a cap reached mid-page is applied
//! locally. The walk ends on the first page shorter than `page_size`.

use crate::envelope::Envelope;
use crate::error::Result;
use crate::fetch::{HttpClient, build_url, get_json};
use async_stream::try_stream;
use clap::ValueEnum;
use futures::{Stream, StreamExt, pin_mut};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

/// How successive pages are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Pagination {
    /// `start=<offset>&size=<page_size>`
    #[default]
    Offset,
    /// `page=<n>&size=<page_size>`, `n` starting at 1.
    Page,
}

/// A paginated read against one resource endpoint.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub endpoint: String,
    pub params: Vec<(String, String)>,
    pub page_size: usize,
    pub limit: Option<usize>,
    pub pagination: Pagination,
}

impl PageRequest {
    pub fn new(endpoint: impl Into<String>, page_size: usize) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: Vec::new(),
            page_size: page_size.max(1),
            limit: None,
            pagination: Pagination::default(),
        }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    /// URL for the zero-based page `index`.
    pub fn page_url(&self, index: usize) -> Result<Url> {
        let mut params = self.params.clone();
        match self.pagination {
            Pagination::Offset => {
                params.push(("start".to_string(), (index * self.page_size).to_string()))
            }
            Pagination::Page => params.push(("page".to_string(), (index + 1).to_string())),
        }
        params.push(("size".to_string(), self.page_size.to_string()));
        build_url(&self.endpoint, &params)
    }
}

/// Result of an eager fetch.
///
/// `truncated` is set when a page failed and the walk stopped early; the
/// records gathered before the failure are kept.
#[derive(Debug)]
pub struct Collected<T> {
    pub records: Vec<T>,
    pub truncated: bool,
}

/// Lazily walks the pages of `request`, yielding records one at a time.
///
/// The first failing page is yielded as an `Err` and ends the stream.
pub fn stream_records<'a, C, T>(
    client: &'a C,
    request: PageRequest,
) -> impl Stream<Item = Result<T>> + Send + 'a
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned + Send + 'a,
{
    try_stream! {
        let mut yielded = 0usize;
        let mut index = 0usize;

        'pages: loop {
            if request.limit.is_some_and(|limit| yielded >= limit) {
                break;
            }
            let url = request.page_url(index)?;
            let envelope: Envelope<T> = get_json(client, url).await?;
            let received = envelope.data.len();

            info!(
                endpoint = %request.endpoint,
                page = index + 1,
                received,
                total = envelope.count,
                "Fetched page"
            );

            for record in envelope.data {
                if request.limit.is_some_and(|limit| yielded >= limit) {
                    break 'pages;
                }
                yielded += 1;
                yield record;
            }

            if received < request.page_size {
                break;
            }
            index += 1;
        }
    }
}

/// Eagerly walks the pages of `request`.
///
/// Transport and decode failures are logged and end the walk; whatever was
/// accumulated so far is returned.
pub async fn collect_records<C, T>(client: &C, request: PageRequest) -> Collected<T>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned + Send,
{
    let endpoint = request.endpoint.clone();
    let stream = stream_records::<C, T>(client, request);
    pin_mut!(stream);

    let mut records = Vec::new();
    let mut truncated = false;

    while let Some(item) = stream.next().await {
        match item {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(
                    endpoint = %endpoint,
                    fetched = records.len(),
                    error = %e,
                    "Page fetch failed, returning partial result"
                );
                truncated = true;
                break;
            }
        }
    }

    Collected { records, truncated }
}
