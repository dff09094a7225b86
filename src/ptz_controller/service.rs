//! PTZ Controller Service
//!
//! アクティブ選択と速度設定を使ってPTZ/ズーム/スナップショットを発行する
//!
//! Every entry point is a silent no-op without an active selection, and
//! gateway failures never propagate to the caller; the operator's next
//! gesture is the retry.

use crate::command_gateway::{
    CommandAction, CommandSink, PtzCommand, PtzDirection, ZoomCommand, ZoomKind,
};
use crate::page_shell::PageShell;
use crate::stream_slots::SelectionHandle;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Valid operator speed bounds
const MIN_SPEED: i64 = 1;
const MAX_SPEED: i64 = 8;

/// PTZコントローラーサービス
pub struct PtzController {
    sink: Arc<dyn CommandSink>,
    selection: SelectionHandle,
    shell: Arc<RwLock<PageShell>>,
    fallback_speed: u8,
}

impl PtzController {
    /// 新規作成
    pub fn new(
        sink: Arc<dyn CommandSink>,
        selection: SelectionHandle,
        shell: Arc<RwLock<PageShell>>,
        fallback_speed: u8,
    ) -> Self {
        Self {
            sink,
            selection,
            shell,
            fallback_speed,
        }
    }

    /// Operator-set speed from the control panel input.
    ///
    /// Absent or non-numeric input falls back to the default; out-of-range
    /// values are clamped into 1..=8. Never errors.
    pub async fn speed(&self) -> u8 {
        let raw = self.shell.read().await.control_panel.speed_input.clone();
        match raw.trim().parse::<i64>() {
            Ok(v) => v.clamp(MIN_SPEED, MAX_SPEED) as u8,
            Err(_) => self.fallback_speed,
        }
    }

    /// Begin a pan/tilt movement (press gesture)
    pub async fn start_direction(&self, direction: PtzDirection) {
        self.dispatch_ptz(CommandAction::Start, direction).await;
    }

    /// End a pan/tilt movement (release gesture)
    pub async fn stop_direction(&self, direction: PtzDirection) {
        self.dispatch_ptz(CommandAction::Stop, direction).await;
    }

    /// Begin a zoom movement
    pub async fn start_zoom(&self, zoom: ZoomKind) {
        self.dispatch_zoom(CommandAction::Start, zoom).await;
    }

    /// End a zoom movement
    pub async fn stop_zoom(&self, zoom: ZoomKind) {
        self.dispatch_zoom(CommandAction::Stop, zoom).await;
    }

    /// Global stop-all, bound to any pointer release.
    ///
    /// A press-and-hold release can land outside the original button, so
    /// every axis is stopped unconditionally. Stopping an already stopped
    /// axis is harmless.
    pub async fn safety_stop(&self) {
        let Some(cam_id) = self.selection.current().await else {
            return;
        };
        tracing::debug!(camera_id = %cam_id, "Safety stop: halting all axes");

        for direction in PtzDirection::ALL {
            self.dispatch_ptz(CommandAction::Stop, direction).await;
        }
        for zoom in ZoomKind::ALL {
            self.dispatch_zoom(CommandAction::Stop, zoom).await;
        }
    }

    /// Request a snapshot download for the active camera
    pub async fn snapshot(&self) {
        let Some(cam_id) = self.selection.current().await else {
            return;
        };
        if let Err(e) = self.sink.request_snapshot(&cam_id).await {
            tracing::warn!(camera_id = %cam_id, error = %e, "Snapshot request failed");
        }
    }

    async fn dispatch_ptz(&self, action: CommandAction, direction: PtzDirection) {
        let Some(cam_id) = self.selection.current().await else {
            return;
        };
        let command = PtzCommand {
            cam_id: cam_id.clone(),
            action,
            direction,
            speed: self.speed().await,
        };
        if let Err(e) = self.sink.send_ptz(command).await {
            tracing::warn!(
                camera_id = %cam_id,
                direction = %direction.as_str(),
                error = %e,
                "PTZ command failed"
            );
        }
    }

    async fn dispatch_zoom(&self, action: CommandAction, zoom: ZoomKind) {
        let Some(cam_id) = self.selection.current().await else {
            return;
        };
        let command = ZoomCommand {
            cam_id: cam_id.clone(),
            action,
            zoom,
        };
        if let Err(e) = self.sink.send_zoom(command).await {
            tracing::warn!(
                camera_id = %cam_id,
                zoom = %zoom.as_str(),
                error = %e,
                "Zoom command failed"
            );
        }
    }
}
