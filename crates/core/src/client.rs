//! Thin JSON-over-HTTP client for the HMS backend.
//!
//! Every call returns the body as an untyped [`serde_json::Value`]; turning that into records is
//! the wire crate's job. Bodies that are empty or not JSON come back as `Value::Null` rather than
//! an error, so a malformed payload degrades to "no records" instead of a failed screen.

use crate::config::ClientConfig;
use crate::{HmsError, HmsResult};
use reqwest::{Method, RequestBuilder, Url};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Builds a client from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HmsError::Http`] if the underlying HTTP client cannot be constructed.
    pub fn new(cfg: &ClientConfig) -> HmsResult<Self> {
        let http = reqwest::Client::builder().timeout(cfg.timeout()).build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url().clone(),
        })
    }

    /// Resolves a path relative to the API base. Leading slashes are ignored.
    pub fn url(&self, path: &str) -> HmsResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| HmsError::InvalidInput(format!("bad request path {path:?}: {e}")))
    }

    pub async fn get_json(&self, path: &str) -> HmsResult<Value> {
        self.send(Method::GET, path, |req| req).await
    }

    pub async fn post_json<B>(&self, path: &str, body: &B) -> HmsResult<Value>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, |req| req.json(body)).await
    }

    pub async fn put_json<B>(&self, path: &str, body: &B) -> HmsResult<Value>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, |req| req.json(body)).await
    }

    pub async fn delete(&self, path: &str) -> HmsResult<()> {
        self.send(Method::DELETE, path, |req| req).await.map(|_| ())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> HmsResult<Value> {
        let url = self.url(path)?;
        tracing::debug!(%method, %url, "sending request");

        let response = build(self.http.request(method, url.clone())).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HmsError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(%url, "response body is not JSON: {e}");
                Ok(Value::Null)
            }
        }
    }
}
