//! View behavior modules
//!
//! Each navigable view with event wiring gets a module instantiated once
//! per process lifetime by the router. Modules do the work the view's
//! markup cannot: initial renders, list binding, value refreshes.

use super::registry::{ModuleCtx, ViewId, ViewModule};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Dashboard module: initial grid render + speed badge sync
struct DashboardModule {
    ctx: ModuleCtx,
}

#[async_trait]
impl ViewModule for DashboardModule {
    fn view(&self) -> ViewId {
        ViewId::Dashboard
    }

    async fn init(&self) -> Result<()> {
        // First render of the (usually empty) grid and the control panel
        self.ctx.slots.render().await;

        let mut shell = self.ctx.shell.write().await;
        let speed = shell.control_panel.speed_input.clone();
        shell.control_panel.speed_badge = speed;

        tracing::info!("Dashboard module initialized");
        Ok(())
    }
}

pub fn dashboard_module(ctx: &ModuleCtx) -> Arc<dyn ViewModule> {
    Arc::new(DashboardModule { ctx: ctx.clone() })
}

/// Cameras module: binds the sidebar camera list to the station inventory
struct CamerasModule {
    ctx: ModuleCtx,
}

#[async_trait]
impl ViewModule for CamerasModule {
    fn view(&self) -> ViewId {
        ViewId::Cameras
    }

    async fn init(&self) -> Result<()> {
        let mut shell = self.ctx.shell.write().await;
        shell.camera_items = self.ctx.camera_inventory.clone();
        shell.rebind_camera_drag();

        tracing::info!(
            camera_count = self.ctx.camera_inventory.len(),
            "Cameras module initialized"
        );
        Ok(())
    }
}

pub fn cameras_module(ctx: &ModuleCtx) -> Arc<dyn ViewModule> {
    Arc::new(CamerasModule { ctx: ctx.clone() })
}

/// Labs module: table wiring only, no console-side state
struct LabsModule;

#[async_trait]
impl ViewModule for LabsModule {
    fn view(&self) -> ViewId {
        ViewId::Labs
    }

    async fn init(&self) -> Result<()> {
        tracing::info!("Labs module initialized");
        Ok(())
    }
}

pub fn labs_module(_ctx: &ModuleCtx) -> Arc<dyn ViewModule> {
    Arc::new(LabsModule)
}

/// Settings module: pushes persisted preferences back into the inputs
struct SettingsModule {
    ctx: ModuleCtx,
}

#[async_trait]
impl ViewModule for SettingsModule {
    fn view(&self) -> ViewId {
        ViewId::Settings
    }

    async fn init(&self) -> Result<()> {
        tracing::info!("Settings module initialized");
        Ok(())
    }

    /// Value refresh: runs after every show so the form always reflects
    /// the stored speed, also mirroring it into the main control panel
    async fn refresh(&self) -> Result<()> {
        let mut shell = self.ctx.shell.write().await;
        shell.set_speed_input(self.ctx.stored_speed.to_string());

        tracing::debug!(speed = self.ctx.stored_speed, "Settings values refreshed");
        Ok(())
    }
}

pub fn settings_module(ctx: &ModuleCtx) -> Arc<dyn ViewModule> {
    Arc::new(SettingsModule { ctx: ctx.clone() })
}
