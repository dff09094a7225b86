//! StreamSlotManager - Dashboard Stream Grid State
//!
//! ## Responsibilities
//!
//! - Own the ordered set of displayed camera ids (capacity 4, FIFO)
//! - Own the single active selection used by PTZ/zoom/snapshot
//! - Compute the grid layout and rebuild the render frame after every
//!   mutation, before control returns to the event loop
//!
//! The manager is the sole source of truth for the grid; nothing else
//! mutates the stream list or the selection.

use crate::command_gateway::CameraId;
use crate::page_shell::{PageShell, RenderFrame, StreamCell};
use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Maximum simultaneous streams on the dashboard
pub const STREAM_CAPACITY: usize = 4;

/// Hint shown when the grid is empty
pub const EMPTY_GRID_HINT: &str = "Drag camera icons here";

/// What happens to the active selection when its slot is FIFO-evicted.
///
/// Both behaviors exist in deployed revisions of this UI, so the choice
/// is a configuration flag rather than a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// Selection moves to the most recently added remaining slot
    #[default]
    ReassignNewest,
    /// Selection is cleared to none
    Clear,
}

impl FromStr for EvictionPolicy {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s.to_lowercase().as_str() {
            "reassign" | "reassign_newest" => Ok(Self::ReassignNewest),
            "clear" => Ok(Self::Clear),
            other => Err(crate::error::Error::Config(format!(
                "Unknown eviction policy: {}",
                other
            ))),
        }
    }
}

/// Owned slot state (insertion-ordered, oldest first)
#[derive(Debug, Default)]
pub struct SlotState {
    slots: VecDeque<CameraId>,
    active: Option<CameraId>,
}

impl SlotState {
    pub fn slots(&self) -> impl Iterator<Item = &CameraId> {
        self.slots.iter()
    }

    pub fn active(&self) -> Option<&CameraId> {
        self.active.as_ref()
    }
}

/// Read-only capability over the active selection.
///
/// Handed to the PTZ controller, which must never mutate slot state.
#[derive(Clone)]
pub struct SelectionHandle {
    state: Arc<RwLock<SlotState>>,
}

impl SelectionHandle {
    /// Current active selection, if any
    pub async fn current(&self) -> Option<CameraId> {
        self.state.read().await.active.clone()
    }
}

/// StreamSlotManager instance
pub struct StreamSlotManager {
    state: Arc<RwLock<SlotState>>,
    policy: EvictionPolicy,
    shell: Arc<RwLock<PageShell>>,
}

impl StreamSlotManager {
    /// Create new StreamSlotManager
    pub fn new(policy: EvictionPolicy, shell: Arc<RwLock<PageShell>>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SlotState::default())),
            policy,
            shell,
        }
    }

    /// Read-only selection capability for the PTZ controller
    pub fn selection_handle(&self) -> SelectionHandle {
        SelectionHandle {
            state: self.state.clone(),
        }
    }

    /// Place a camera on the grid (drop gesture).
    ///
    /// Duplicates are a no-op. At capacity the oldest slot is evicted
    /// first; a selection left dangling by the eviction is resolved by
    /// the configured policy before this call returns.
    pub async fn add_camera(&self, id: CameraId) {
        {
            let mut state = self.state.write().await;

            if state.slots.contains(&id) {
                tracing::debug!(camera_id = %id, "Camera already displayed, ignoring drop");
                return;
            }

            let had_active = state.active.is_some();

            if state.slots.len() >= STREAM_CAPACITY {
                if let Some(evicted) = state.slots.pop_front() {
                    tracing::info!(camera_id = %evicted, "Evicted oldest stream (grid full)");
                }
            }
            state.slots.push_back(id.clone());

            // Resolve a selection that no longer references a displayed slot
            let dangling = state
                .active
                .as_ref()
                .is_some_and(|active| !state.slots.contains(active));
            if dangling {
                state.active = match self.policy {
                    EvictionPolicy::ReassignNewest => state.slots.back().cloned(),
                    EvictionPolicy::Clear => None,
                };
                tracing::info!(
                    policy = ?self.policy,
                    new_active = ?state.active,
                    "Active stream was evicted"
                );
            }

            // First camera on an idle grid becomes the working selection
            if !had_active && state.active.is_none() {
                state.active = Some(id.clone());
            }

            tracing::info!(camera_id = %id, count = state.slots.len(), "Camera added to grid");
        }

        self.render().await;
    }

    /// Remove a camera from the grid (minimize gesture)
    pub async fn remove_camera(&self, id: &str) {
        {
            let mut state = self.state.write().await;

            let Some(index) = state.slots.iter().position(|s| s == id) else {
                return;
            };
            let _ = state.slots.remove(index);

            if state.active.as_deref() == Some(id) {
                // Fall back to the most recently added remaining slot
                state.active = state.slots.back().cloned();
            }

            tracing::info!(camera_id = %id, count = state.slots.len(), "Camera removed from grid");
        }

        self.render().await;
    }

    /// Make a displayed camera the active selection.
    ///
    /// Selecting a camera that is not on the grid is a caller error and
    /// is ignored.
    pub async fn select_camera(&self, id: &str) {
        {
            let mut state = self.state.write().await;

            if !state.slots.contains(&id.to_string()) {
                tracing::debug!(camera_id = %id, "Select ignored: camera not displayed");
                return;
            }
            state.active = Some(id.to_string());
        }

        self.render().await;
    }

    /// Displayed camera ids, oldest first
    pub async fn stream_list(&self) -> Vec<CameraId> {
        self.state.read().await.slots.iter().cloned().collect()
    }

    /// Current active selection
    pub async fn active(&self) -> Option<CameraId> {
        self.state.read().await.active.clone()
    }

    /// Grid column count for a stream count: ceil(sqrt(count)), min 1
    pub fn layout_cols(count: usize) -> usize {
        if count <= 1 {
            return 1;
        }
        (count as f64).sqrt().ceil() as usize
    }

    /// Rebuild the render frame and control panel from current state.
    ///
    /// Runs synchronously after every mutation so no intermediate state
    /// is observable from the event loop.
    pub async fn render(&self) {
        let (frame, active) = {
            let state = self.state.read().await;
            let count = state.slots.len();

            let frame = if count == 0 {
                RenderFrame {
                    columns: 1,
                    single_stream: false,
                    cells: Vec::new(),
                    placeholder: Some(EMPTY_GRID_HINT),
                }
            } else {
                RenderFrame {
                    columns: Self::layout_cols(count),
                    single_stream: count == 1,
                    cells: state
                        .slots
                        .iter()
                        .map(|id| StreamCell {
                            camera_id: id.clone(),
                            feed_url: format!("/video_feed?cam_id={}", id),
                            active: state.active.as_ref() == Some(id),
                        })
                        .collect(),
                    placeholder: None,
                }
            };

            (frame, state.active.clone())
        };

        let mut shell = self.shell.write().await;
        shell.render_frame = frame;
        match &active {
            Some(id) => {
                shell.control_panel.camera_name = format!("Camera {}", id);
                shell.control_panel.visible = true;
            }
            None => {
                shell.control_panel.camera_name.clear();
                shell.control_panel.visible = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(policy: EvictionPolicy) -> StreamSlotManager {
        let shell = Arc::new(RwLock::new(PageShell::new(5)));
        StreamSlotManager::new(policy, shell)
    }

    #[tokio::test]
    async fn test_capacity_never_exceeded() {
        let mgr = manager(EvictionPolicy::ReassignNewest);
        for id in 1..=7 {
            mgr.add_camera(id.to_string()).await;
            assert!(mgr.stream_list().await.len() <= STREAM_CAPACITY);
        }
    }

    #[tokio::test]
    async fn test_fifo_eviction() {
        let mgr = manager(EvictionPolicy::ReassignNewest);
        for id in 1..=5 {
            mgr.add_camera(id.to_string()).await;
        }
        assert_eq!(mgr.stream_list().await, vec!["2", "3", "4", "5"]);
    }

    #[tokio::test]
    async fn test_duplicate_add_is_noop() {
        let mgr = manager(EvictionPolicy::ReassignNewest);
        mgr.add_camera("1".into()).await;
        mgr.add_camera("2".into()).await;
        mgr.select_camera("2").await;

        mgr.add_camera("1".into()).await;
        assert_eq!(mgr.stream_list().await, vec!["1", "2"]);
        assert_eq!(mgr.active().await.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_first_camera_becomes_active() {
        let mgr = manager(EvictionPolicy::ReassignNewest);
        mgr.add_camera("9".into()).await;
        assert_eq!(mgr.active().await.as_deref(), Some("9"));
    }

    #[tokio::test]
    async fn test_eviction_reassigns_to_newest() {
        let mgr = manager(EvictionPolicy::ReassignNewest);
        for id in 1..=5 {
            mgr.add_camera(id.to_string()).await;
        }
        // camera 1 was auto-selected, then evicted by camera 5
        assert_eq!(mgr.active().await.as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn test_eviction_clear_policy() {
        let mgr = manager(EvictionPolicy::Clear);
        for id in 1..=5 {
            mgr.add_camera(id.to_string()).await;
        }
        assert_eq!(mgr.active().await, None);
    }

    #[tokio::test]
    async fn test_eviction_of_inactive_slot_keeps_selection() {
        let mgr = manager(EvictionPolicy::Clear);
        for id in 1..=4 {
            mgr.add_camera(id.to_string()).await;
        }
        mgr.select_camera("3").await;
        mgr.add_camera("5".into()).await;

        assert_eq!(mgr.active().await.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_remove_active_reassigns_to_last() {
        let mgr = manager(EvictionPolicy::ReassignNewest);
        for id in 1..=3 {
            mgr.add_camera(id.to_string()).await;
        }
        mgr.select_camera("2").await;
        mgr.remove_camera("2").await;

        assert_eq!(mgr.active().await.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_remove_last_clears_selection() {
        let mgr = manager(EvictionPolicy::ReassignNewest);
        mgr.add_camera("1".into()).await;
        mgr.remove_camera("1").await;

        assert_eq!(mgr.active().await, None);
        assert!(mgr.stream_list().await.is_empty());
    }

    #[tokio::test]
    async fn test_select_undisplayed_camera_ignored() {
        let mgr = manager(EvictionPolicy::ReassignNewest);
        for id in 1..=3 {
            mgr.add_camera(id.to_string()).await;
        }
        mgr.select_camera("9").await;

        assert_eq!(mgr.active().await.as_deref(), Some("1"));
    }

    #[test]
    fn test_layout_cols() {
        assert_eq!(StreamSlotManager::layout_cols(0), 1);
        assert_eq!(StreamSlotManager::layout_cols(1), 1);
        assert_eq!(StreamSlotManager::layout_cols(2), 2);
        assert_eq!(StreamSlotManager::layout_cols(3), 2);
        assert_eq!(StreamSlotManager::layout_cols(4), 2);
    }

    #[tokio::test]
    async fn test_render_frame_reflects_state() {
        let shell = Arc::new(RwLock::new(PageShell::new(5)));
        let mgr = StreamSlotManager::new(EvictionPolicy::ReassignNewest, shell.clone());

        mgr.add_camera("1".into()).await;
        mgr.add_camera("2".into()).await;
        mgr.select_camera("2").await;

        let shell = shell.read().await;
        let frame = &shell.render_frame;
        assert_eq!(frame.columns, 2);
        assert!(!frame.single_stream);
        assert_eq!(frame.cells.len(), 2);
        assert!(!frame.cells[0].active);
        assert!(frame.cells[1].active);
        assert_eq!(frame.cells[1].feed_url, "/video_feed?cam_id=2");
        assert_eq!(shell.control_panel.camera_name, "Camera 2");
        assert!(shell.control_panel.visible);
    }

    #[tokio::test]
    async fn test_empty_grid_renders_placeholder() {
        let shell = Arc::new(RwLock::new(PageShell::new(5)));
        let mgr = StreamSlotManager::new(EvictionPolicy::ReassignNewest, shell.clone());
        mgr.render().await;

        let shell = shell.read().await;
        assert_eq!(shell.render_frame.placeholder, Some(EMPTY_GRID_HINT));
        assert!(shell.render_frame.cells.is_empty());
        assert!(!shell.control_panel.visible);
    }
}
