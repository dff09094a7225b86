//! PageShell - Explicit Page Surface Model
//!
//! ## Responsibilities
//!
//! - View containers: visibility + injected partial markup
//! - Sidebar: nav entries with a single active flag, collapsible submenus,
//!   draggable camera list items
//! - PTZ control panel: speed input, speed badge, camera name label
//! - Latest stream grid render frame (written by the StreamSlotManager)
//!
//! The shell is a plain state object. All transitions are instantaneous;
//! the fade/scale animations of the real page are presentation-only and
//! carry no state here.

use crate::command_gateway::CameraId;
use crate::view_router::ViewId;
use std::collections::HashMap;

/// One navigable view container
#[derive(Debug, Clone)]
pub struct ViewContainer {
    /// Exactly one container is visible at a time
    pub visible: bool,
    /// Server-rendered markup present before any partial injection
    /// (the dashboard grid skeleton coexists with its partial)
    pub base_markup: Option<String>,
    /// Injected partial fragments, in injection order
    pub injected: Vec<String>,
}

impl ViewContainer {
    fn empty() -> Self {
        Self {
            visible: false,
            base_markup: None,
            injected: Vec::new(),
        }
    }

    fn with_base(markup: impl Into<String>) -> Self {
        Self {
            visible: false,
            base_markup: Some(markup.into()),
            injected: Vec::new(),
        }
    }

    /// Full content of the container as currently mounted
    pub fn content(&self) -> String {
        let mut out = String::new();
        if let Some(base) = &self.base_markup {
            out.push_str(base);
        }
        for fragment in &self.injected {
            out.push_str(fragment);
        }
        out
    }
}

/// Sidebar navigation entry
#[derive(Debug, Clone)]
pub struct SidebarEntry {
    pub view: ViewId,
    pub label: &'static str,
    pub active: bool,
}

/// Collapsible sidebar submenu
#[derive(Debug, Clone)]
pub struct Submenu {
    pub name: &'static str,
    pub open: bool,
}

/// PTZ control panel state
#[derive(Debug, Clone)]
pub struct ControlPanel {
    /// Panel shown only while a stream is selected
    pub visible: bool,
    /// "Camera {id}" label, empty without a selection
    pub camera_name: String,
    /// Raw operator input for the speed slider (may be non-numeric)
    pub speed_input: String,
    /// Badge mirroring the slider value
    pub speed_badge: String,
}

/// One cell of the dashboard stream grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamCell {
    pub camera_id: CameraId,
    /// `<img>` source for the MJPEG feed
    pub feed_url: String,
    pub active: bool,
}

/// Stream grid render output, rebuilt on every slot mutation
#[derive(Debug, Clone, Default)]
pub struct RenderFrame {
    /// Grid column count, ceil(sqrt(len)); 1 for the single-stream layout
    pub columns: usize,
    /// Single-stream mode uses the full-bleed layout instead of a grid
    pub single_stream: bool,
    pub cells: Vec<StreamCell>,
    /// Hint shown instead of the grid when no streams are placed
    pub placeholder: Option<&'static str>,
}

/// PageShell instance
#[derive(Debug, Clone)]
pub struct PageShell {
    containers: HashMap<ViewId, ViewContainer>,
    pub sidebar: Vec<SidebarEntry>,
    pub submenus: Vec<Submenu>,
    /// Draggable camera items listed in the sidebar
    pub camera_items: Vec<CameraId>,
    /// Bumped whenever drag sources are re-bound after markup replacement
    pub drag_bind_generation: u64,
    pub control_panel: ControlPanel,
    pub render_frame: RenderFrame,
}

impl PageShell {
    /// Build the shell as served before any navigation
    pub fn new(default_speed: u8) -> Self {
        let mut containers = HashMap::new();
        for view in ViewId::ALL {
            let container = if view == ViewId::Dashboard {
                ViewContainer::with_base(r#"<section id="dashboard" class="stream-grid"></section>"#)
            } else {
                ViewContainer::empty()
            };
            containers.insert(view, container);
        }

        let sidebar = vec![
            SidebarEntry { view: ViewId::Dashboard, label: "Dashboard", active: false },
            SidebarEntry { view: ViewId::Cameras, label: "Cameras", active: false },
            SidebarEntry { view: ViewId::Labs, label: "Labs", active: false },
            SidebarEntry { view: ViewId::Requests, label: "Requests", active: false },
            SidebarEntry { view: ViewId::Sessions, label: "Sessions", active: false },
        ];

        let submenus = vec![
            Submenu { name: "management", open: false },
            Submenu { name: "preferences", open: false },
        ];

        Self {
            containers,
            sidebar,
            submenus,
            camera_items: Vec::new(),
            drag_bind_generation: 0,
            control_panel: ControlPanel {
                visible: false,
                camera_name: String::new(),
                speed_input: default_speed.to_string(),
                speed_badge: default_speed.to_string(),
            },
            render_frame: RenderFrame::default(),
        }
    }

    /// Toggle exactly one container visible
    pub fn show_only(&mut self, view: ViewId) {
        for (id, container) in self.containers.iter_mut() {
            container.visible = *id == view;
        }
    }

    /// Mark exactly one sidebar entry active.
    ///
    /// Views without their own entry (e.g. Settings lives in a submenu)
    /// fall back to the default view's entry.
    pub fn set_active_nav(&mut self, view: ViewId) {
        let target = if self.sidebar.iter().any(|e| e.view == view) {
            view
        } else {
            ViewId::default()
        };
        for entry in self.sidebar.iter_mut() {
            entry.active = entry.view == target;
        }
    }

    /// Close all open sidebar submenus
    pub fn close_submenus(&mut self) {
        for submenu in self.submenus.iter_mut() {
            submenu.open = false;
        }
    }

    /// Inject partial markup into a view container.
    ///
    /// `append` keeps pre-existing markup (dashboard); otherwise the
    /// injected content replaces whatever was there.
    pub fn inject_partial(&mut self, view: ViewId, markup: String, append: bool) {
        if let Some(container) = self.containers.get_mut(&view) {
            if !append {
                container.injected.clear();
            }
            container.injected.push(markup);
        }
    }

    /// Container accessor
    pub fn container(&self, view: ViewId) -> Option<&ViewContainer> {
        self.containers.get(&view)
    }

    /// The currently visible view, if any
    pub fn visible_view(&self) -> Option<ViewId> {
        self.containers
            .iter()
            .find(|(_, c)| c.visible)
            .map(|(id, _)| *id)
    }

    /// Re-attach drag handlers to the sidebar camera items.
    ///
    /// Called on every view-mounted notification since injected markup
    /// replaces previously bound elements.
    pub fn rebind_camera_drag(&mut self) {
        self.drag_bind_generation += 1;
        tracing::trace!(
            generation = self.drag_bind_generation,
            items = self.camera_items.len(),
            "Camera drag sources re-bound"
        );
    }

    /// Update the speed slider and its badge together
    pub fn set_speed_input(&mut self, raw: impl Into<String>) {
        let raw = raw.into();
        self.control_panel.speed_badge = raw.clone();
        self.control_panel.speed_input = raw;
    }
}
