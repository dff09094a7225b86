//! End-to-end console flows against stubbed station endpoints

use async_trait::async_trait;
use camstation_console::command_gateway::{
    CommandAction, CommandSink, PtzCommand, ZoomCommand,
};
use camstation_console::console::{Console, ConsoleEvent};
use camstation_console::error::{Error, Result};
use camstation_console::state::AppConfig;
use camstation_console::stream_slots::EvictionPolicy;
use camstation_console::view_router::{PartialFetcher, ViewId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Records every dispatch instead of hitting the network
#[derive(Default)]
struct RecordingSink {
    ptz: Mutex<Vec<PtzCommand>>,
    zoom: Mutex<Vec<ZoomCommand>>,
    snapshots: Mutex<Vec<String>>,
}

#[async_trait]
impl CommandSink for RecordingSink {
    async fn send_ptz(&self, command: PtzCommand) -> Result<()> {
        self.ptz.lock().unwrap().push(command);
        Ok(())
    }

    async fn send_zoom(&self, command: ZoomCommand) -> Result<()> {
        self.zoom.lock().unwrap().push(command);
        Ok(())
    }

    async fn request_snapshot(&self, cam_id: &str) -> Result<()> {
        self.snapshots.lock().unwrap().push(cam_id.to_string());
        Ok(())
    }
}

/// Serves canned partials, counting fetches per name.
///
/// Optionally gates one partial behind a semaphore (slow response) or
/// fails its first fetch (transient error).
struct StubFetcher {
    counts: Mutex<HashMap<String, usize>>,
    gated: Option<&'static str>,
    gate: Semaphore,
    fail_first: Option<&'static str>,
    failed_once: AtomicBool,
}

impl StubFetcher {
    fn new() -> Self {
        Self {
            counts: Mutex::new(HashMap::new()),
            gated: None,
            gate: Semaphore::new(0),
            fail_first: None,
            failed_once: AtomicBool::new(false),
        }
    }

    fn gating(name: &'static str) -> Self {
        Self {
            gated: Some(name),
            ..Self::new()
        }
    }

    fn failing_first(name: &'static str) -> Self {
        Self {
            fail_first: Some(name),
            ..Self::new()
        }
    }

    fn count(&self, name: &str) -> usize {
        *self.counts.lock().unwrap().get(name).unwrap_or(&0)
    }
}

#[async_trait]
impl PartialFetcher for StubFetcher {
    async fn fetch_partial(&self, name: &str) -> Result<String> {
        *self.counts.lock().unwrap().entry(name.to_string()).or_insert(0) += 1;

        if self.fail_first == Some(name) && !self.failed_once.swap(true, Ordering::SeqCst) {
            return Err(Error::Partial(format!("{} unavailable", name)));
        }

        if self.gated == Some(name) {
            let permit = self.gate.acquire().await.expect("gate closed");
            permit.forget();
        }

        Ok(format!("<div class=\"partial-{}\">{}</div>", name, name))
    }
}

fn test_config(policy: EvictionPolicy) -> AppConfig {
    AppConfig {
        station_url: "http://station.test".to_string(),
        start_fragment: "#dashboard".to_string(),
        eviction_policy: policy,
        default_speed: 5,
        camera_inventory: vec!["1".into(), "2".into(), "3".into(), "4".into()],
        request_timeout_secs: 1,
        connect_timeout_secs: 1,
    }
}

async fn console_with(
    policy: EvictionPolicy,
    sink: Arc<RecordingSink>,
    fetcher: Arc<StubFetcher>,
) -> Console {
    Console::with_parts(test_config(policy), sink, fetcher).await
}

#[tokio::test]
async fn partials_and_modules_load_once_across_revisits() {
    let sink = Arc::new(RecordingSink::default());
    let fetcher = Arc::new(StubFetcher::new());
    let console = console_with(EvictionPolicy::ReassignNewest, sink, fetcher.clone()).await;
    let router = console.router();

    for fragment in ["#dashboard", "#labs", "#dashboard", "#labs"] {
        router.handle_fragment(fragment).await;
    }

    assert_eq!(fetcher.count("dashboard"), 1);
    assert_eq!(fetcher.count("labs"), 1);
    assert!(router.partial_loaded(ViewId::Labs).await);
    assert!(router.module_loaded(ViewId::Labs).await);
}

#[tokio::test]
async fn failed_partial_fetch_retries_on_next_navigation() {
    let sink = Arc::new(RecordingSink::default());
    let fetcher = Arc::new(StubFetcher::failing_first("labs"));
    let console = console_with(EvictionPolicy::ReassignNewest, sink, fetcher.clone()).await;
    let router = console.router();

    router.handle_fragment("#labs").await;
    assert!(!router.partial_loaded(ViewId::Labs).await);

    router.handle_fragment("#dashboard").await;
    router.handle_fragment("#labs").await;
    assert_eq!(fetcher.count("labs"), 2);
    assert!(router.partial_loaded(ViewId::Labs).await);

    let shell = console.shell();
    let shell = shell.read().await;
    let content = shell.container(ViewId::Labs).unwrap().content();
    assert!(content.contains("partial-labs"));
}

#[tokio::test]
async fn stale_partial_response_is_dropped() {
    let sink = Arc::new(RecordingSink::default());
    let fetcher = Arc::new(StubFetcher::gating("labs"));
    let console = console_with(EvictionPolicy::ReassignNewest, sink, fetcher.clone()).await;
    let router = console.router();

    // Labs navigation stalls on its partial fetch
    let slow = {
        let router = router.clone();
        tokio::spawn(async move { router.navigate(ViewId::Labs).await })
    };
    while fetcher.count("labs") == 0 {
        tokio::task::yield_now().await;
    }
    assert_eq!(fetcher.count("labs"), 1);

    // Operator moves on before the response arrives
    router.navigate(ViewId::Dashboard).await;

    // Late response must be ignored: not injected, not marked
    fetcher.gate.add_permits(1);
    slow.await.unwrap();
    assert!(!router.partial_loaded(ViewId::Labs).await);
    {
        let shell = console.shell();
        let shell = shell.read().await;
        assert!(shell.container(ViewId::Labs).unwrap().content().is_empty());
    }

    // A fresh navigation refetches and mounts normally
    fetcher.gate.add_permits(1);
    router.navigate(ViewId::Labs).await;
    assert_eq!(fetcher.count("labs"), 2);
    assert!(router.partial_loaded(ViewId::Labs).await);
}

#[tokio::test]
async fn drop_five_cameras_evicts_fifo_and_reassigns_selection() {
    let sink = Arc::new(RecordingSink::default());
    let fetcher = Arc::new(StubFetcher::new());
    let console = console_with(EvictionPolicy::ReassignNewest, sink, fetcher).await;

    let slots = console.slots();
    let tx = console.sender();
    let handle = tokio::spawn(console.run());

    for id in 1..=5 {
        tx.send(ConsoleEvent::DropCamera(id.to_string())).unwrap();
    }
    tx.send(ConsoleEvent::Shutdown).unwrap();
    handle.await.unwrap();

    assert_eq!(slots.stream_list().await, vec!["2", "3", "4", "5"]);
    assert_eq!(slots.active().await.as_deref(), Some("5"));
}

#[tokio::test]
async fn drop_five_cameras_with_clear_policy_clears_selection() {
    let sink = Arc::new(RecordingSink::default());
    let fetcher = Arc::new(StubFetcher::new());
    let console = console_with(EvictionPolicy::Clear, sink, fetcher).await;

    let slots = console.slots();
    let tx = console.sender();
    let handle = tokio::spawn(console.run());

    for id in 1..=5 {
        tx.send(ConsoleEvent::DropCamera(id.to_string())).unwrap();
    }
    tx.send(ConsoleEvent::Shutdown).unwrap();
    handle.await.unwrap();

    assert_eq!(slots.stream_list().await, vec!["2", "3", "4", "5"]);
    assert_eq!(slots.active().await, None);
}

#[tokio::test]
async fn pointer_release_stops_every_axis_of_the_active_camera() {
    let sink = Arc::new(RecordingSink::default());
    let fetcher = Arc::new(StubFetcher::new());
    let console = console_with(EvictionPolicy::ReassignNewest, sink.clone(), fetcher).await;

    let tx = console.sender();
    let handle = tokio::spawn(console.run());

    tx.send(ConsoleEvent::DropCamera("7".to_string())).unwrap();
    tx.send(ConsoleEvent::PtzPress(
        camstation_console::command_gateway::PtzDirection::Up,
    ))
    .unwrap();
    tx.send(ConsoleEvent::PointerReleased).unwrap();
    tx.send(ConsoleEvent::Shutdown).unwrap();
    handle.await.unwrap();

    let ptz = sink.ptz.lock().unwrap();
    let zoom = sink.zoom.lock().unwrap();
    let ptz_stops: Vec<_> = ptz
        .iter()
        .filter(|c| c.action == CommandAction::Stop)
        .collect();
    assert_eq!(ptz_stops.len(), 4);
    assert_eq!(zoom.len(), 2);
    assert!(ptz_stops.iter().all(|c| c.cam_id == "7"));
    assert!(zoom.iter().all(|c| c.cam_id == "7" && c.action == CommandAction::Stop));
}

#[tokio::test]
async fn dashboard_init_renders_empty_grid_hint() {
    let sink = Arc::new(RecordingSink::default());
    let fetcher = Arc::new(StubFetcher::new());
    let console = console_with(EvictionPolicy::ReassignNewest, sink, fetcher).await;

    let shell = console.shell();
    let tx = console.sender();
    let handle = tokio::spawn(console.run());

    tx.send(ConsoleEvent::Shutdown).unwrap();
    handle.await.unwrap();

    let shell = shell.read().await;
    assert!(shell.render_frame.placeholder.is_some());
    assert!(!shell.control_panel.visible);
}

#[tokio::test]
async fn view_mounted_broadcasts_on_cached_revisits_too() {
    let sink = Arc::new(RecordingSink::default());
    let fetcher = Arc::new(StubFetcher::new());
    let console = console_with(EvictionPolicy::ReassignNewest, sink, fetcher).await;
    let router = console.router();

    let (_id, mut rx) = console.lifecycle_hub().subscribe().await;

    router.handle_fragment("#labs").await;
    router.handle_fragment("#dashboard").await;
    router.handle_fragment("#labs").await;

    let first = rx.try_recv().unwrap();
    assert_eq!(first.view, ViewId::Labs);
    assert!(!first.cached);

    let second = rx.try_recv().unwrap();
    assert_eq!(second.view, ViewId::Dashboard);

    let third = rx.try_recv().unwrap();
    assert_eq!(third.view, ViewId::Labs);
    assert!(third.cached);
}

#[tokio::test]
async fn settings_refresh_restores_stored_speed() {
    let sink = Arc::new(RecordingSink::default());
    let fetcher = Arc::new(StubFetcher::new());
    let console = console_with(EvictionPolicy::ReassignNewest, sink, fetcher).await;

    let shell = console.shell();
    let tx = console.sender();
    let handle = tokio::spawn(console.run());

    tx.send(ConsoleEvent::SpeedInput("2".to_string())).unwrap();
    tx.send(ConsoleEvent::Navigate("#settings".to_string())).unwrap();
    tx.send(ConsoleEvent::Shutdown).unwrap();
    handle.await.unwrap();

    let shell = shell.read().await;
    assert_eq!(shell.control_panel.speed_input, "5");
    assert_eq!(shell.control_panel.speed_badge, "5");
}

#[tokio::test]
async fn back_navigation_reshows_previous_view() {
    let sink = Arc::new(RecordingSink::default());
    let fetcher = Arc::new(StubFetcher::new());
    let console = console_with(EvictionPolicy::ReassignNewest, sink, fetcher.clone()).await;
    let router = console.router();

    router.handle_fragment("#dashboard").await;
    router.handle_fragment("#labs").await;
    router.back().await;

    assert_eq!(router.current_view().await, ViewId::Dashboard);
    // Cached content re-shown, no refetch
    assert_eq!(fetcher.count("dashboard"), 1);
}
