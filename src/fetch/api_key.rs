use crate::fetch::client::HttpClient;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};

/// An [`HttpClient`] wrapper that injects an API key as an HTTP header.
pub struct ApiKey<C> {
    inner: C,
    header_name: HeaderName,
    key: HeaderValue,
}

impl<C> ApiKey<C> {
    /// Sets `header_name: key` on every request.
    ///
    /// # Errors
    ///
    /// Fails if either part is not a legal header name or value.
    pub fn new(inner: C, header_name: &str, key: &str) -> Result<Self> {
        Ok(Self {
            inner,
            header_name: HeaderName::from_bytes(header_name.as_bytes())?,
            key: HeaderValue::from_str(key)?,
        })
    }

    /// Sends `token` under `header_name` when one is given, otherwise as a
    /// bearer token.
    pub fn from_token(inner: C, token: &str, header_name: Option<&str>) -> Result<Self> {
        match header_name {
            Some(name) => Self::new(inner, name, token),
            None => Self::bearer(inner, token),
        }
    }

    /// `Authorization: Bearer <key>`.
    pub fn bearer(inner: C, key: &str) -> Result<Self> {
        let mut value = HeaderValue::from_str(&format!("Bearer {key}"))?;
        value.set_sensitive(true);
        Ok(Self {
            inner,
            header_name: AUTHORIZATION,
            key: value,
        })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut()
            .insert(self.header_name.clone(), self.key.clone());
        self.inner.execute(req).await
    }
}
