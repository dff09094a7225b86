//! Console - Single-Threaded Event Loop
//!
//! ## Responsibilities
//!
//! - Own the one queue of discrete operator/UI events
//! - Drive router, slot manager, and PTZ controller from those events
//! - Preserve the ordering guarantee: each event is fully handled (state
//!   mutation plus re-render) before the next one is dequeued
//!
//! Deferred view-module init hooks and lifecycle notifications are
//! drained through the same loop, so "next turn" has a concrete meaning.

pub mod repl;

use crate::command_gateway::{
    CameraId, CommandSink, HttpCommandGateway, PtzDirection, ZoomKind,
};
use crate::lifecycle_hub::{LifecycleHub, ViewMounted};
use crate::page_shell::PageShell;
use crate::ptz_controller::PtzController;
use crate::state::AppConfig;
use crate::stream_slots::StreamSlotManager;
use crate::view_router::{
    HttpPartialFetcher, ModuleCtx, PartialFetcher, ViewId, ViewRegistry, ViewRouter,
};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Discrete operator/UI event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// Fragment navigation (link click, address edit)
    Navigate(String),
    /// History back
    Back,
    /// Camera icon dropped onto the dashboard grid
    DropCamera(CameraId),
    /// Stream cell clicked (becomes the active selection)
    ClickStream(CameraId),
    /// Stream cell minimized off the grid
    Minimize(CameraId),
    /// PTZ button press / release
    PtzPress(PtzDirection),
    PtzRelease(PtzDirection),
    /// Zoom button press / release
    ZoomPress(ZoomKind),
    ZoomRelease(ZoomKind),
    /// Pointer released anywhere on the page
    PointerReleased,
    /// Speed slider input (raw text)
    SpeedInput(String),
    /// Snapshot button
    Snapshot,
    /// Explicit re-render request
    Render,
    Shutdown,
}

/// Console instance: all services plus the event queue ends
pub struct Console {
    config: AppConfig,
    shell: Arc<RwLock<PageShell>>,
    slots: Arc<StreamSlotManager>,
    router: Arc<ViewRouter>,
    ptz: PtzController,
    hub: Arc<LifecycleHub>,
    events_tx: mpsc::UnboundedSender<ConsoleEvent>,
    events_rx: mpsc::UnboundedReceiver<ConsoleEvent>,
    deferred_init_rx: mpsc::UnboundedReceiver<ViewId>,
    lifecycle_rx: mpsc::UnboundedReceiver<ViewMounted>,
    lifecycle_id: Uuid,
}

impl Console {
    /// Build a console against a live station
    pub async fn new(config: AppConfig) -> Self {
        let sink: Arc<dyn CommandSink> = Arc::new(HttpCommandGateway::new(
            config.station_url.clone(),
            config.request_timeout_secs,
            config.connect_timeout_secs,
        ));
        let fetcher: Arc<dyn PartialFetcher> = Arc::new(HttpPartialFetcher::new(
            config.station_url.clone(),
            config.request_timeout_secs,
            config.connect_timeout_secs,
        ));
        Self::with_parts(config, sink, fetcher).await
    }

    /// Build a console with injected gateway and fetcher (test seam)
    pub async fn with_parts(
        config: AppConfig,
        sink: Arc<dyn CommandSink>,
        fetcher: Arc<dyn PartialFetcher>,
    ) -> Self {
        let shell = Arc::new(RwLock::new(PageShell::new(config.default_speed)));
        let slots = Arc::new(StreamSlotManager::new(
            config.eviction_policy,
            shell.clone(),
        ));
        let hub = Arc::new(LifecycleHub::new());

        let ctx = ModuleCtx {
            shell: shell.clone(),
            slots: slots.clone(),
            camera_inventory: config.camera_inventory.clone(),
            stored_speed: config.default_speed,
        };

        let (deferred_init_tx, deferred_init_rx) = mpsc::unbounded_channel();
        let router = Arc::new(ViewRouter::new(
            ViewRegistry::standard(),
            ctx,
            fetcher,
            hub.clone(),
            deferred_init_tx,
        ));

        let ptz = PtzController::new(
            sink,
            slots.selection_handle(),
            shell.clone(),
            config.default_speed,
        );

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (lifecycle_id, lifecycle_rx) = hub.subscribe().await;

        // Sidebar camera list is part of the initial server-rendered shell
        shell.write().await.camera_items = config.camera_inventory.clone();

        Self {
            config,
            shell,
            slots,
            router,
            ptz,
            hub,
            events_tx,
            events_rx,
            deferred_init_rx,
            lifecycle_rx,
            lifecycle_id,
        }
    }

    /// Queue handle for event producers
    pub fn sender(&self) -> mpsc::UnboundedSender<ConsoleEvent> {
        self.events_tx.clone()
    }

    pub fn shell(&self) -> Arc<RwLock<PageShell>> {
        self.shell.clone()
    }

    pub fn slots(&self) -> Arc<StreamSlotManager> {
        self.slots.clone()
    }

    pub fn router(&self) -> Arc<ViewRouter> {
        self.router.clone()
    }

    pub fn lifecycle_hub(&self) -> Arc<LifecycleHub> {
        self.hub.clone()
    }

    /// Run the event loop until shutdown or queue closure.
    ///
    /// Deferred init hooks are drained with priority so they run on the
    /// turn immediately after the mount that queued them.
    pub async fn run(mut self) {
        self.router
            .handle_fragment(&self.config.start_fragment)
            .await;

        loop {
            tokio::select! {
                biased;

                Some(view) = self.deferred_init_rx.recv() => {
                    self.router.run_deferred_init(view).await;
                }
                Some(note) = self.lifecycle_rx.recv() => {
                    self.on_view_mounted(note).await;
                }
                event = self.events_rx.recv() => {
                    match event {
                        Some(event) => {
                            if !self.handle_event(event).await {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
        }

        self.hub.unsubscribe(&self.lifecycle_id).await;
        tracing::info!("Console loop stopped");
    }

    /// Re-attach features that bind into replaced markup
    async fn on_view_mounted(&self, note: ViewMounted) {
        let mut shell = self.shell.write().await;
        shell.rebind_camera_drag();
        tracing::trace!(view = %note.view.as_str(), "View mounted notification handled");
    }

    /// Handle one event to completion. Returns false on shutdown.
    async fn handle_event(&self, event: ConsoleEvent) -> bool {
        tracing::trace!(event = ?event, "Handling console event");

        match event {
            ConsoleEvent::Navigate(fragment) => {
                self.router.handle_fragment(&fragment).await;
            }
            ConsoleEvent::Back => {
                self.router.back().await;
            }
            ConsoleEvent::DropCamera(id) => {
                self.slots.add_camera(id).await;
            }
            ConsoleEvent::ClickStream(id) => {
                self.slots.select_camera(&id).await;
            }
            ConsoleEvent::Minimize(id) => {
                self.slots.remove_camera(&id).await;
            }
            ConsoleEvent::PtzPress(direction) => {
                self.ptz.start_direction(direction).await;
            }
            ConsoleEvent::PtzRelease(direction) => {
                self.ptz.stop_direction(direction).await;
            }
            ConsoleEvent::ZoomPress(zoom) => {
                self.ptz.start_zoom(zoom).await;
            }
            ConsoleEvent::ZoomRelease(zoom) => {
                self.ptz.stop_zoom(zoom).await;
            }
            ConsoleEvent::PointerReleased => {
                self.ptz.safety_stop().await;
            }
            ConsoleEvent::SpeedInput(raw) => {
                self.shell.write().await.set_speed_input(raw);
            }
            ConsoleEvent::Snapshot => {
                self.ptz.snapshot().await;
            }
            ConsoleEvent::Render => {
                self.slots.render().await;
            }
            ConsoleEvent::Shutdown => return false,
        }

        true
    }
}
