//! Camstation Console Library
//!
//! Operator console runtime for a multi-camera monitoring station
//!
//! ## Architecture (7 Components)
//!
//! 1. PageShell - Explicit page surface model (containers, sidebar, panel)
//! 2. ViewRouter - Fragment routing + deduplicated lazy loading
//! 3. LifecycleHub - View-mounted notifications for decoupled rebinding
//! 4. StreamSlotManager - Dashboard grid state (capacity 4, FIFO eviction)
//! 5. PtzController - Gestures to commands, global safety stop
//! 6. CommandGateway - Fire-and-forget PTZ/zoom/snapshot dispatch
//! 7. Console - Single-threaded event loop tying it together
//!
//! ## Design Principles
//!
//! - StreamSlotManager is the single source of truth for the grid
//! - Each view's partial is fetched at most once per process lifetime
//! - Mutation is followed synchronously by a re-render, never observable
//!   in an intermediate state

pub mod command_gateway;
pub mod console;
pub mod error;
pub mod lifecycle_hub;
pub mod page_shell;
pub mod ptz_controller;
pub mod state;
pub mod stream_slots;
pub mod view_router;

pub use error::{Error, Result};
pub use state::AppConfig;
