//! Decoder for the paginated Hub'Eau response wrapper.

use crate::error::{HubeauError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// One page of a Hub'Eau collection.
///
/// `count` is the total number of matching records on the server, not the
/// length of `data`. The navigation links are informational; pagination is
/// driven by [`crate::fetch::PageRequest`].
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub count: u64,
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> Envelope<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Decodes an envelope from a raw response body.
///
/// # Errors
///
/// Returns [`HubeauError::Decode`] if the body is not an envelope or any
/// record fails to match `T`.
pub fn parse_envelope<T: DeserializeOwned>(source: &str, body: &[u8]) -> Result<Envelope<T>> {
    serde_json::from_slice(body).map_err(|e| HubeauError::Decode {
        url: source.to_string(),
        source: e,
    })
}
