use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes one HTTP request. No retries are attempted at this layer or above.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
