//! PTZ Controller Module
//!
//! 操作パネルのジェスチャをCommandGateway呼び出しへ変換

pub mod service;

pub use service::PtzController;
