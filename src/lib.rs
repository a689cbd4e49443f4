//! risklayout: two-phase force layout with edge bundling. Library for testing
//! and reuse.

pub mod core;
pub mod force;
pub mod io;
pub mod layout;
pub mod render;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::config::LayoutConfig;
use crate::core::state::LayoutPhase;
use crate::io::headless::{headless_export_system, HeadlessExportConfig};
use crate::io::stdin::{load_stdin_network_system, StdinNetwork};
use crate::io::{process_pending_load_system, PendingLoad};
use crate::layout::systems::{
    advance_layout_system, start_pending_layout_system, ActiveLayout, PendingNetwork,
};
use crate::render::LayoutFrame;

/// Phase state, layout resources, and the systems that start a render from
/// `PendingNetwork` / `PendingLoad` and advance it with the frame clock.
pub struct RiskLayoutPlugin;

impl Plugin for RiskLayoutPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<StatesPlugin>() {
            app.add_plugins(StatesPlugin);
        }
        app.init_state::<LayoutPhase>()
            .init_resource::<LayoutConfig>()
            .init_resource::<ActiveLayout>()
            .init_resource::<PendingNetwork>()
            .init_resource::<PendingLoad>()
            .init_resource::<LayoutFrame>()
            .add_systems(Startup, load_stdin_network_system)
            .add_systems(
                Update,
                (
                    process_pending_load_system,
                    start_pending_layout_system,
                    advance_layout_system,
                )
                    .chain(),
            );
    }
}

struct CliArgs {
    config: Option<PathBuf>,
    export: Option<PathBuf>,
    input: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> CliArgs {
    let mut cli = CliArgs {
        config: None,
        export: None,
        input: None,
    };
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            cli.config = args.next().map(PathBuf::from);
        } else if arg == "--export" {
            cli.export = args.next().map(PathBuf::from);
        } else {
            cli.input = Some(PathBuf::from(arg));
        }
    }
    cli
}

/// Build and run the headless layout app.
///
/// `risklayout [--config file] [--export out.json] [input.json]`. Without an
/// input file the network is read from stdin.
pub fn run() {
    let cli = parse_args(std::env::args().skip(1));

    let config = match &cli.config {
        Some(path) => match LayoutConfig::from_path(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => core::config::load_config(),
    };

    let stdin_snapshot = if cli.input.is_none() {
        io::stdin::read_stdin_snapshot()
    } else {
        None
    };
    if cli.input.is_none() && stdin_snapshot.is_none() {
        eprintln!("usage: risklayout [--config file] [--export out.json] [input.json]");
        std::process::exit(2);
    }

    let mut app = App::new();
    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / 60.0,
        ))),
    )
    .add_plugins(LogPlugin::default())
    .insert_resource(config)
    .add_plugins(RiskLayoutPlugin)
    .insert_resource(PendingLoad(cli.input))
    .insert_resource(HeadlessExportConfig {
        is_headless: true,
        export_path: cli.export,
    })
    .add_systems(Update, headless_export_system.after(advance_layout_system));

    if let Some(snap) = stdin_snapshot {
        app.insert_resource(StdinNetwork(snap));
    }

    app.run();
}
