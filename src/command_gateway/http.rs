//! HTTP implementation of the command gateway
//!
//! 制御エンドポイントへのHTTP送信を担当

use super::types::{PtzCommand, ZoomCommand};
use super::CommandSink;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// HTTP command gateway against the station control endpoint
#[derive(Clone)]
pub struct HttpCommandGateway {
    http: Client,
    base_url: String,
}

impl HttpCommandGateway {
    /// 新規作成
    ///
    /// Short timeouts: a PTZ press that cannot reach the camera within a
    /// few seconds is better reported stale than queued.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64, connect_timeout_secs: u64) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            // リダイレクトでPOSTがGETに変わる問題を回避
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CommandSink for HttpCommandGateway {
    async fn send_ptz(&self, command: PtzCommand) -> Result<()> {
        let url = format!("{}/ptz_control", self.base_url);

        tracing::debug!(
            cam_id = %command.cam_id,
            action = ?command.action,
            direction = %command.direction.as_str(),
            speed = command.speed,
            "Dispatching PTZ command"
        );

        self.http
            .post(&url)
            .json(&command)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    async fn send_zoom(&self, command: ZoomCommand) -> Result<()> {
        let url = format!("{}/zoom_control", self.base_url);

        tracing::debug!(
            cam_id = %command.cam_id,
            action = ?command.action,
            zoom = %command.zoom.as_str(),
            "Dispatching zoom command"
        );

        self.http
            .post(&url)
            .json(&command)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    async fn request_snapshot(&self, cam_id: &str) -> Result<()> {
        let url = format!("{}/snapshot?cam_id={}", self.base_url, cam_id);

        let response = self.http.get(&url).send().await?.error_for_status()?;

        tracing::info!(
            cam_id = %cam_id,
            content_length = ?response.content_length(),
            "Snapshot requested"
        );

        Ok(())
    }
}
