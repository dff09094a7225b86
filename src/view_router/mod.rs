//! ViewRouter - View Lifecycle and Lazy Loading
//!
//! ## Responsibilities
//!
//! - Fragment -> ViewId resolution (unknown fragments fall back to the
//!   dashboard, never an error)
//! - One-time lazy fetch of view partials and one-time module loading,
//!   gated by the load registry
//! - Mounting: container visibility, sidebar active state, submenu close
//! - Post-mount notification through the LifecycleHub

pub mod fetch;
pub mod modules;
pub mod registry;
pub mod service;

pub use fetch::{HttpPartialFetcher, PartialFetcher};
pub use registry::{ModuleCtx, ViewId, ViewModule, ViewRegistry};
pub use service::ViewRouter;
