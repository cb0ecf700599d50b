use async_trait::async_trait;
use reqwest::{Request, Response};

/// Anything that can send a prepared request. [`super::ApiKey`] wraps another
/// implementation to add credentials.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: Request) -> reqwest::Result<Response>;
}
