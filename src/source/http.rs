/// Blocking HTTP client for a dictionary source.
///
/// The request URL is the configured base URL followed by the raw query
/// text; `reqwest` percent-encodes whatever the URL grammar requires.
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use super::{Source, SourceClient};
use crate::error::LookupError;

pub struct HttpSourceClient {
    source: Source,
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpSourceClient {
    /// Build a client with a per-request timeout.
    ///
    /// Must not be called from inside an async context.
    pub fn new(source: Source, base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .with_context(|| format!("HTTP client build failed for {source}"))?;

        Ok(Self {
            source,
            base_url: base_url.to_string(),
            client,
        })
    }

    #[must_use]
    pub fn url_for(&self, query: &str) -> String {
        format!("{}{query}", self.base_url)
    }
}

impl SourceClient for HttpSourceClient {
    fn fetch(&self, query: &str) -> Result<String, LookupError> {
        let url = self.url_for(query);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| LookupError::FetchFailed(format!("{} request failed: {e}", self.source)))?;

        if !resp.status().is_success() {
            return Err(LookupError::FetchFailed(format!(
                "{} returned status {}",
                self.source,
                resp.status()
            )));
        }

        let body = resp.text().map_err(|e| {
            LookupError::FetchFailed(format!("{} response body unreadable: {e}", self.source))
        })?;
        debug!(source = %self.source, bytes = body.len(), "fetched result page");

        Ok(body)
    }
}
