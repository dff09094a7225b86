//! View registry - explicit ViewId -> descriptor mapping
//!
//! Replaces stringly-keyed dynamic module loading: the finite view set,
//! each view's partial endpoint name, its module factory, and its
//! post-show hooks are all declared here at startup.

use crate::command_gateway::CameraId;
use crate::error::Result;
use crate::page_shell::PageShell;
use crate::stream_slots::StreamSlotManager;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Navigable section of the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewId {
    #[default]
    Dashboard,
    Cameras,
    Labs,
    Requests,
    Sessions,
    Settings,
}

impl ViewId {
    /// All known views
    pub const ALL: [ViewId; 6] = [
        Self::Dashboard,
        Self::Cameras,
        Self::Labs,
        Self::Requests,
        Self::Sessions,
        Self::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Cameras => "cameras",
            Self::Labs => "labs",
            Self::Requests => "requests",
            Self::Sessions => "sessions",
            Self::Settings => "settings",
        }
    }

    /// Map a location fragment to a view.
    ///
    /// Strips the leading `#`; empty or unrecognized fragments resolve to
    /// the dashboard. Never errors.
    pub fn resolve(fragment: &str) -> ViewId {
        let name = fragment.trim().trim_start_matches('#');
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == name)
            .unwrap_or_default()
    }
}

/// Shared handles a view module needs to do its work
#[derive(Clone)]
pub struct ModuleCtx {
    pub shell: Arc<RwLock<PageShell>>,
    pub slots: Arc<StreamSlotManager>,
    /// Camera ids offered as drag sources in the sidebar list
    pub camera_inventory: Vec<CameraId>,
    /// Persisted operator speed preference
    pub stored_speed: u8,
}

/// Lazily loaded behavior unit for one view.
///
/// `init` runs once per process lifetime, on the event-loop turn after
/// the first mount, so it always sees fully injected markup.
#[async_trait]
pub trait ViewModule: Send + Sync {
    fn view(&self) -> ViewId;

    /// One-time initialization entry point
    async fn init(&self) -> Result<()>;

    /// Per-show value refresh (only wired for views that declare it)
    async fn refresh(&self) -> Result<()> {
        Ok(())
    }
}

/// Factory instantiating a view's module on first load
pub type ModuleFactory = fn(&ModuleCtx) -> Arc<dyn ViewModule>;

/// Static description of one view
pub struct ViewDescriptor {
    pub view: ViewId,
    /// Partial endpoint name, None for views without server markup
    pub partial: Option<&'static str>,
    /// Injected markup coexists with pre-rendered shell markup
    pub append_partial: bool,
    pub factory: Option<ModuleFactory>,
    /// Run the module's refresh hook after every show
    pub refresh_after_show: bool,
}

/// ViewRegistry instance, populated once at startup
pub struct ViewRegistry {
    views: HashMap<ViewId, ViewDescriptor>,
}

impl ViewRegistry {
    /// Build the standard console view set
    pub fn standard() -> Self {
        use super::modules;

        let mut views = HashMap::new();

        views.insert(
            ViewId::Dashboard,
            ViewDescriptor {
                view: ViewId::Dashboard,
                partial: Some("dashboard"),
                // The stream grid skeleton is server-rendered; the partial
                // adds the control panel next to it
                append_partial: true,
                factory: Some(modules::dashboard_module),
                refresh_after_show: false,
            },
        );
        views.insert(
            ViewId::Cameras,
            ViewDescriptor {
                view: ViewId::Cameras,
                partial: Some("cameras"),
                append_partial: false,
                factory: Some(modules::cameras_module),
                refresh_after_show: false,
            },
        );
        views.insert(
            ViewId::Labs,
            ViewDescriptor {
                view: ViewId::Labs,
                partial: Some("labs"),
                append_partial: false,
                factory: Some(modules::labs_module),
                refresh_after_show: false,
            },
        );
        // Requests and Sessions are plain fetch-and-render tables with no
        // behavior module of their own
        views.insert(
            ViewId::Requests,
            ViewDescriptor {
                view: ViewId::Requests,
                partial: Some("requests"),
                append_partial: false,
                factory: None,
                refresh_after_show: false,
            },
        );
        views.insert(
            ViewId::Sessions,
            ViewDescriptor {
                view: ViewId::Sessions,
                partial: Some("sessions"),
                append_partial: false,
                factory: None,
                refresh_after_show: false,
            },
        );
        views.insert(
            ViewId::Settings,
            ViewDescriptor {
                view: ViewId::Settings,
                partial: Some("settings"),
                append_partial: false,
                factory: Some(modules::settings_module),
                refresh_after_show: true,
            },
        );

        Self { views }
    }

    pub fn descriptor(&self, view: ViewId) -> Option<&ViewDescriptor> {
        self.views.get(&view)
    }
}
