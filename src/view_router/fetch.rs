//! Partial markup fetching
//!
//! ビュー毎のpartialマークアップ取得を担当

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use std::time::Duration;

/// Fetches raw partial markup for a view.
///
/// Seam for tests: the router only depends on this trait.
#[async_trait]
pub trait PartialFetcher: Send + Sync {
    async fn fetch_partial(&self, name: &str) -> Result<String>;
}

/// HTTP fetcher against `GET {base}/partials/{name}.html`
#[derive(Clone)]
pub struct HttpPartialFetcher {
    http: Client,
    base_url: String,
}

impl HttpPartialFetcher {
    /// 新規作成
    pub fn new(base_url: impl Into<String>, timeout_secs: u64, connect_timeout_secs: u64) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PartialFetcher for HttpPartialFetcher {
    async fn fetch_partial(&self, name: &str) -> Result<String> {
        let url = format!("{}/partials/{}.html", self.base_url, name);

        let response = self
            .http
            .get(&url)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Partial(format!(
                "Partial {} returned {}",
                name,
                response.status()
            )));
        }

        let body = response.text().await?;
        tracing::debug!(partial = %name, bytes = body.len(), "Partial fetched");
        Ok(body)
    }
}
