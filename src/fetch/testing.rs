//! Scripted [`HttpClient`] used by unit tests.

use super::client::HttpClient;
use async_trait::async_trait;
use reqwest::Url;
use std::sync::Mutex;

type Responder = dyn Fn(&Url) -> (u16, String) + Send + Sync;

pub(crate) struct ScriptedClient {
    responder: Box<Responder>,
    requests: Mutex<Vec<Url>>,
}

impl ScriptedClient {
    pub(crate) fn new<F>(responder: F) -> Self
    where
        F: Fn(&Url) -> (u16, String) + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let url = req.url().clone();
        let (status, body) = (self.responder)(&url);
        self.requests.lock().unwrap().push(url);

        let resp = http::Response::builder().status(status).body(body).unwrap();
        Ok(reqwest::Response::from(resp))
    }
}

/// Returns the value of query parameter `name` in `url`.
pub(crate) fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

/// Builds a Hub'Eau-style envelope around `data`.
pub(crate) fn envelope(count: usize, data: Vec<serde_json::Value>) -> String {
    serde_json::json!({
        "count": count,
        "first": null,
        "last": null,
        "prev": null,
        "next": null,
        "api_version": "2.0.0",
        "data": data,
    })
    .to_string()
}
