//! Application configuration

use crate::command_gateway::CameraId;
use crate::stream_slots::EvictionPolicy;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Monitoring station base URL (partials, PTZ/zoom, snapshots, feeds)
    pub station_url: String,
    /// Fragment navigated to on startup
    pub start_fragment: String,
    /// Selection behavior when the active slot is evicted
    pub eviction_policy: EvictionPolicy,
    /// Fallback/persisted PTZ speed (1..=8)
    pub default_speed: u8,
    /// Camera ids offered as drag sources
    pub camera_inventory: Vec<CameraId>,
    /// Request timeout for station calls
    pub request_timeout_secs: u64,
    /// Connect timeout for station calls
    pub connect_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            station_url: std::env::var("STATION_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string()),
            start_fragment: std::env::var("START_FRAGMENT")
                .unwrap_or_else(|_| "#dashboard".to_string()),
            eviction_policy: std::env::var("EVICTION_POLICY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_default(),
            default_speed: std::env::var("PTZ_SPEED_DEFAULT")
                .ok()
                .and_then(|s| s.parse::<u8>().ok())
                .filter(|s| (1..=8).contains(s))
                .unwrap_or(5),
            camera_inventory: std::env::var("CAMERA_IDS")
                .unwrap_or_else(|_| "1,2,3,4".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            request_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            connect_timeout_secs: std::env::var("HTTP_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
        }
    }
}
