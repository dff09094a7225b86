//! CommandGateway - PTZ/Zoom/Snapshot Dispatch
//!
//! ## Responsibilities
//!
//! - Serialize PTZ / zoom start-stop commands to the station control endpoint
//! - Issue snapshot download requests
//! - Fire-and-forget contract: failures are logged, never surfaced upstream
//!
//! The gateway is stateless. Retry is the operator's next gesture.

pub mod http;
pub mod types;

pub use http::HttpCommandGateway;
pub use types::*;

use crate::error::Result;
use async_trait::async_trait;

/// Sink for outgoing camera control commands.
///
/// The PTZ controller only talks to this seam, so tests can record
/// dispatches without a live station.
#[async_trait]
pub trait CommandSink: Send + Sync {
    /// POST a pan/tilt command to `/ptz_control`
    async fn send_ptz(&self, command: PtzCommand) -> Result<()>;

    /// POST a zoom command to `/zoom_control`
    async fn send_zoom(&self, command: ZoomCommand) -> Result<()>;

    /// GET `/snapshot?cam_id={id}` (download-style navigation request)
    async fn request_snapshot(&self, cam_id: &str) -> Result<()>;
}
