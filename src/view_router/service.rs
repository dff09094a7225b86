//! ViewRouter Service
//!
//! Maps fragments to views, manages one-time lazy loading of partials and
//! modules, and mounts views. Revisits re-show cached content without
//! refetching; a partial that fails to fetch is retried on the next
//! navigation, a module load is attempted exactly once.

use super::fetch::PartialFetcher;
use super::registry::{ModuleCtx, ViewId, ViewModule, ViewRegistry};
use crate::lifecycle_hub::LifecycleHub;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// Current route plus the back stack
#[derive(Debug, Default)]
pub struct RouteState {
    pub current: ViewId,
    history: Vec<ViewId>,
}

/// ViewRouter instance
pub struct ViewRouter {
    registry: ViewRegistry,
    ctx: ModuleCtx,
    fetcher: Arc<dyn PartialFetcher>,
    hub: Arc<LifecycleHub>,
    route: RwLock<RouteState>,
    /// Views whose partial markup has been injected
    loaded_partials: RwLock<HashSet<ViewId>>,
    /// Views whose module load was attempted (never retried)
    loaded_modules: RwLock<HashSet<ViewId>>,
    modules: RwLock<HashMap<ViewId, Arc<dyn ViewModule>>>,
    /// Module init hooks deferred to the next event-loop turn
    deferred_init_tx: mpsc::UnboundedSender<ViewId>,
}

impl ViewRouter {
    /// 新規作成
    pub fn new(
        registry: ViewRegistry,
        ctx: ModuleCtx,
        fetcher: Arc<dyn PartialFetcher>,
        hub: Arc<LifecycleHub>,
        deferred_init_tx: mpsc::UnboundedSender<ViewId>,
    ) -> Self {
        Self {
            registry,
            ctx,
            fetcher,
            hub,
            route: RwLock::new(RouteState::default()),
            loaded_partials: RwLock::new(HashSet::new()),
            loaded_modules: RwLock::new(HashSet::new()),
            modules: RwLock::new(HashMap::new()),
            deferred_init_tx,
        }
    }

    /// Resolve a location fragment and navigate to it
    pub async fn handle_fragment(&self, fragment: &str) {
        self.navigate(ViewId::resolve(fragment)).await;
    }

    /// Navigate to a view, recording history for back navigation
    pub async fn navigate(&self, view: ViewId) {
        {
            let mut route = self.route.write().await;
            if route.current != view {
                let previous = route.current;
                route.history.push(previous);
            }
            route.current = view;
        }
        self.show(view).await;
    }

    /// Pop the back stack and re-show the previous view
    pub async fn back(&self) {
        let target = {
            let mut route = self.route.write().await;
            let Some(previous) = route.history.pop() else {
                return;
            };
            route.current = previous;
            previous
        };
        self.show(target).await;
    }

    /// The view currently routed to
    pub async fn current_view(&self) -> ViewId {
        self.route.read().await.current
    }

    /// Mount a view: toggle containers and nav, load partial and module
    /// idempotently, run post-show hooks, notify subscribers.
    async fn show(&self, view: ViewId) {
        let cached = self.loaded_partials.read().await.contains(&view);

        {
            let mut shell = self.ctx.shell.write().await;
            shell.show_only(view);
            shell.set_active_nav(view);
            shell.close_submenus();
        }

        tracing::info!(view = %view.as_str(), cached = cached, "Showing view");

        self.ensure_partial_loaded(view).await;
        self.ensure_module_loaded(view).await;
        self.run_refresh_hook(view).await;

        self.hub.broadcast(view, cached).await;
    }

    /// Fetch and inject the view's partial, at most once per lifetime.
    ///
    /// A fetch failure leaves the view unmarked so the next navigation
    /// retries. A response that arrives after the route moved on is
    /// dropped unmarked and never injected.
    async fn ensure_partial_loaded(&self, view: ViewId) {
        let Some(descriptor) = self.registry.descriptor(view) else {
            return;
        };
        let Some(name) = descriptor.partial else {
            return;
        };
        if self.loaded_partials.read().await.contains(&view) {
            return;
        }

        match self.fetcher.fetch_partial(name).await {
            Ok(markup) => {
                // Stale-response guard: a newer navigation may have
                // superseded this view while the fetch was in flight
                let current = self.route.read().await.current;
                if current != view {
                    tracing::debug!(
                        view = %view.as_str(),
                        current = %current.as_str(),
                        "Dropping stale partial response"
                    );
                    return;
                }

                {
                    let mut shell = self.ctx.shell.write().await;
                    shell.inject_partial(view, markup, descriptor.append_partial);
                }
                self.loaded_partials.write().await.insert(view);
                tracing::info!(view = %view.as_str(), "Partial mounted");
            }
            Err(e) => {
                tracing::warn!(
                    view = %view.as_str(),
                    error = %e,
                    "Partial fetch failed, will retry on next navigation"
                );
            }
        }
    }

    /// Instantiate the view's module, at most once per lifetime.
    ///
    /// The loaded mark is set unconditionally once the attempt resolves; a
    /// broken module is not expected to heal on revisit. The init entry
    /// point is deferred to the next loop turn so it sees mounted markup.
    async fn ensure_module_loaded(&self, view: ViewId) {
        if self.loaded_modules.read().await.contains(&view) {
            return;
        }
        let Some(descriptor) = self.registry.descriptor(view) else {
            return;
        };
        let Some(factory) = descriptor.factory else {
            return;
        };

        let module = factory(&self.ctx);
        self.modules.write().await.insert(view, module);
        self.loaded_modules.write().await.insert(view);

        tracing::info!(view = %view.as_str(), "View module loaded");

        if self.deferred_init_tx.send(view).is_err() {
            tracing::warn!(view = %view.as_str(), "Deferred init queue closed");
        }
    }

    /// Run a deferred module init hook (next-turn entry point)
    pub async fn run_deferred_init(&self, view: ViewId) {
        let module = self.modules.read().await.get(&view).cloned();
        let Some(module) = module else {
            return;
        };

        if let Err(e) = module.init().await {
            // No retry: the module stays marked loaded
            tracing::warn!(view = %view.as_str(), error = %e, "View module init failed");
        }
    }

    /// Run the per-show refresh hook for views that declare one
    async fn run_refresh_hook(&self, view: ViewId) {
        let Some(descriptor) = self.registry.descriptor(view) else {
            return;
        };
        if !descriptor.refresh_after_show {
            return;
        }

        let module = self.modules.read().await.get(&view).cloned();
        if let Some(module) = module {
            if let Err(e) = module.refresh().await {
                tracing::warn!(view = %view.as_str(), error = %e, "View refresh hook failed");
            }
        }
    }

    /// Whether a view's partial has been mounted
    pub async fn partial_loaded(&self, view: ViewId) -> bool {
        self.loaded_partials.read().await.contains(&view)
    }

    /// Whether a view's module load has been attempted
    pub async fn module_loaded(&self, view: ViewId) -> bool {
        self.loaded_modules.read().await.contains(&view)
    }
}
