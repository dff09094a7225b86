//! CommandGateway type definitions

use serde::{Deserialize, Serialize};

/// Camera identifier as carried by the drag-transfer key and wire payloads
pub type CameraId = String;

/// PTZ移動方向
///
/// Wire names are PascalCase ("Up", "Down", ...) as expected by the
/// station's `/ptz_control` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PtzDirection {
    Up,
    Down,
    Left,
    Right,
}

impl PtzDirection {
    /// All directions, in safety-stop dispatch order
    pub const ALL: [PtzDirection; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

/// ズーム種別 (station wire names: "ZoomTele" / "ZoomWide")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomKind {
    ZoomTele,
    ZoomWide,
}

impl ZoomKind {
    /// Both zoom kinds, in safety-stop dispatch order
    pub const ALL: [ZoomKind; 2] = [Self::ZoomTele, Self::ZoomWide];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZoomTele => "ZoomTele",
            Self::ZoomWide => "ZoomWide",
        }
    }
}

/// start/stop phase of a press-and-hold command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandAction {
    Start,
    Stop,
}

/// Wire body for `POST /ptz_control`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PtzCommand {
    pub cam_id: CameraId,
    pub action: CommandAction,
    pub direction: PtzDirection,
    /// Movement speed, operator-set integer in 1..=8
    pub speed: u8,
}

/// Wire body for `POST /zoom_control`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomCommand {
    pub cam_id: CameraId,
    pub action: CommandAction,
    pub zoom: ZoomKind,
}
