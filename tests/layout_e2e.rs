//! E2E tests for the phase pipeline inside a Bevy app driven by manual time.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use risklayout::core::config::{LayoutConfig, PhaseTrigger};
use risklayout::core::network::{EdgeSpec, Network, Node as LayoutNode};
use risklayout::core::state::LayoutPhase;
use risklayout::layout::systems::{ActiveLayout, PendingNetwork};
use risklayout::render::LayoutFrame;
use risklayout::RiskLayoutPlugin;
use std::time::Duration;

fn network() -> Network {
    Network::new(
        vec![
            LayoutNode::new("a", 0.0, 0.0).with_color("#1b9e77"),
            LayoutNode::new("b", 4.0, 1.0),
            LayoutNode::new("c", 2.0, 6.0),
            LayoutNode::new("d", 8.0, 5.0),
            LayoutNode::new("e", 8.0, 0.5),
        ],
        vec![
            EdgeSpec::new("a", "d"),
            EdgeSpec::new("b", "c"),
            EdgeSpec::new("e", "c"),
            EdgeSpec::new(0usize, 4usize),
        ],
    )
    .unwrap()
}

fn layout_app(config: LayoutConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
        .insert_resource(config)
        .add_plugins(RiskLayoutPlugin);
    app
}

fn phase(app: &App) -> LayoutPhase {
    *app.world().resource::<State<LayoutPhase>>().get()
}

fn handoffs(app: &App) -> u32 {
    app.world()
        .resource::<ActiveLayout>()
        .0
        .as_ref()
        .map_or(0, |s| s.handoff_count())
}

fn run(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

#[test]
fn e2e_idle_until_a_network_arrives() {
    let mut app = layout_app(LayoutConfig::default());
    run(&mut app, 5);
    assert_eq!(phase(&app), LayoutPhase::Idle);
    assert!(app.world().resource::<ActiveLayout>().0.is_none());
}

#[test]
fn e2e_positions_then_bundles_after_dwell() {
    let mut app = layout_app(LayoutConfig::default());
    app.world_mut().resource_mut::<PendingNetwork>().0 = Some(network());

    run(&mut app, 50);
    assert_eq!(phase(&app), LayoutPhase::Positioning);
    assert_eq!(handoffs(&app), 0);
    {
        let frame = app.world().resource::<LayoutFrame>();
        assert_eq!(frame.nodes.len(), 5);
        assert_eq!(frame.nodes[0].color, "#1b9e77");
        assert!(frame.node_updates > 0);
        assert!(frame.paths.is_empty());
        assert!(!frame.contours.is_empty());
    }

    run(&mut app, 20);
    assert_eq!(phase(&app), LayoutPhase::Bundling);
    assert_eq!(handoffs(&app), 1);

    run(&mut app, 150);
    assert_eq!(handoffs(&app), 1);
    let active = app.world().resource::<ActiveLayout>();
    assert!(active.0.as_ref().unwrap().is_settled());
    let frame = app.world().resource::<LayoutFrame>();
    assert_eq!(frame.paths.len(), 4);
    assert!(frame.paths.iter().all(|p| p.points.len() >= 3));
}

#[test]
fn e2e_settled_trigger_hands_off_early() {
    let config = LayoutConfig {
        trigger: PhaseTrigger::Settled,
        primary_alpha_decay: Some(0.3),
        ..Default::default()
    };
    let mut app = layout_app(config);
    app.world_mut().resource_mut::<PendingNetwork>().0 = Some(network());
    run(&mut app, 40);
    assert_eq!(phase(&app), LayoutPhase::Bundling);
    assert_eq!(handoffs(&app), 1);
}

#[test]
fn e2e_new_network_restarts_from_positioning() {
    let config = LayoutConfig {
        dwell_ms: 500,
        ..Default::default()
    };
    let mut app = layout_app(config);
    app.world_mut().resource_mut::<PendingNetwork>().0 = Some(network());
    run(&mut app, 20);
    assert_eq!(phase(&app), LayoutPhase::Bundling);

    app.world_mut().resource_mut::<PendingNetwork>().0 = Some(network());
    run(&mut app, 2);
    assert_eq!(phase(&app), LayoutPhase::Positioning);
    assert_eq!(handoffs(&app), 0);
    assert!(app.world().resource::<LayoutFrame>().paths.is_empty());
}
