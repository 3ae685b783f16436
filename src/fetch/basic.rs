use super::client::HttpClient;
use async_trait::async_trait;
use std::time::Duration;

/// Default timeout applied to every Hub'Eau request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Plain reqwest client with a fixed per-request timeout.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> reqwest::Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self(client))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}
