//! Loading input from a local file or over HTTP.

mod api_key;
mod basic;
mod client;

pub use api_key::ApiKey;
pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use tracing::debug;

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Reads `source` from disk, or fetches it with `client` when it is an
/// `http(s)` URL.
pub async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_bytes(client, source).await?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read {source}"))?
    };
    debug!(source, bytes = bytes.len(), "Input loaded");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_source_reads_local_file() {
        let path = std::env::temp_dir().join("moisture_rater_test_load.csv");
        std::fs::write(&path, "a,t,1\n").unwrap();

        let client = BasicClient::new();
        let bytes = load_source(&client, path.to_str().unwrap()).await.unwrap();
        assert_eq!(bytes, b"a,t,1\n");

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_load_source_missing_file() {
        let client = BasicClient::new();
        let result = load_source(&client, "/definitely/not/here.csv").await;
        assert!(result.is_err());
    }
}
