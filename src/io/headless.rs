//! Headless export: `--export output.json`
//!
//! The app runs without a window. Once bundling has settled the latest frame
//! is written as JSON (to stdout when no path is given) and the process exits.

use bevy::prelude::*;
use std::path::PathBuf;

use crate::core::config::LayoutConfig;
use crate::core::error::LayoutError;
use crate::io::file_io::{save_export, LayoutExport};
use crate::layout::systems::{ActiveLayout, PendingNetwork};
use crate::render::LayoutFrame;

/// Frames to wait for a network before giving up.
const STARTUP_FRAMES: u32 = 3;

/// CLI configuration for headless mode.
#[derive(Resource)]
pub struct HeadlessExportConfig {
    pub is_headless: bool,
    pub export_path: Option<PathBuf>,
}

/// The export for the active render, once its bundling has settled.
pub fn settled_export(
    active: &ActiveLayout,
    frame: &LayoutFrame,
    config: &LayoutConfig,
) -> Option<LayoutExport> {
    let scheduler = active.0.as_ref()?;
    scheduler
        .is_settled()
        .then(|| LayoutExport::from_frame(frame, config))
}

pub fn headless_export_system(
    mut frames: Local<u32>,
    config: Res<HeadlessExportConfig>,
    layout_config: Res<LayoutConfig>,
    active: Res<ActiveLayout>,
    pending: Res<PendingNetwork>,
    frame: Res<LayoutFrame>,
) {
    if !config.is_headless {
        return;
    }

    *frames += 1;
    if active.0.is_none() && pending.0.is_none() {
        if *frames > STARTUP_FRAMES {
            error!("[HEADLESS] No network to lay out, exiting");
            std::process::exit(1);
        }
        return;
    }

    let Some(export) = settled_export(&active, &frame, &layout_config) else {
        return;
    };
    let written = match &config.export_path {
        Some(path) => save_export(path, &export).map(|()| path.display().to_string()),
        None => serde_json::to_string_pretty(&export)
            .map(|json| println!("{}", json))
            .map(|()| "stdout".to_string())
            .map_err(LayoutError::from),
    };
    match written {
        Ok(target) => {
            info!("[HEADLESS] Export written to {}, exiting", target);
            std::process::exit(0);
        }
        Err(e) => {
            error!("[HEADLESS] Export failed: {}", e);
            std::process::exit(1);
        }
    }
}
