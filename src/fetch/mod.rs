mod basic;
mod client;
pub mod pager;
#[cfg(test)]
pub(crate) mod testing;

pub use basic::{BasicClient, DEFAULT_TIMEOUT};
pub use client::HttpClient;
pub use pager::{Collected, PageRequest, Pagination};

use crate::error::{HubeauError, Result};
use reqwest::Url;
use serde::de::DeserializeOwned;

/// Builds a GET URL from an endpoint and its query pairs.
pub fn build_url(endpoint: &str, params: &[(String, String)]) -> Result<Url> {
    Url::parse_with_params(endpoint, params).map_err(|e| HubeauError::InvalidUrl {
        url: endpoint.to_string(),
        reason: e.to_string(),
    })
}

/// Fetches `url` and returns the raw response body.
///
/// Non-2xx statuses are reported as [`HubeauError::HttpStatus`].
pub async fn get_bytes<C>(client: &C, url: Url) -> Result<Vec<u8>>
where
    C: HttpClient + ?Sized,
{
    let url_str = url.to_string();
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client
        .execute(req)
        .await
        .map_err(|source| HubeauError::Request {
            url: url_str.clone(),
            source,
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(HubeauError::HttpStatus {
            url: url_str,
            status,
        });
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|source| HubeauError::Request {
            url: url_str,
            source,
        })?;
    Ok(bytes.to_vec())
}

/// Fetches `url` and decodes the body as JSON into `T`.
///
/// A body that does not match `T` is a [`HubeauError::Decode`].
pub async fn get_json<C, T>(client: &C, url: Url) -> Result<T>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    let url_str = url.to_string();
    let body = get_bytes(client, url).await?;

    serde_json::from_slice(&body).map_err(|source| HubeauError::Decode {
        url: url_str,
        source,
    })
}
