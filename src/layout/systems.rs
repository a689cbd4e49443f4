//! Bevy glue: a pending network request starts a render, and the active
//! scheduler is advanced by the frame clock each update.

use bevy::prelude::*;

use crate::core::config::LayoutConfig;
use crate::core::network::Network;
use crate::core::state::LayoutPhase;
use crate::layout::scheduler::{Phase, PhaseScheduler, Scales};
use crate::render::contour::GridDensity;
use crate::render::LayoutFrame;

/// The render in progress, if any.
#[derive(Resource, Default)]
pub struct ActiveLayout(pub Option<PhaseScheduler>);

/// Network waiting to be rendered. Replaces any render in progress.
#[derive(Resource, Default)]
pub struct PendingNetwork(pub Option<Network>);

impl From<Phase> for LayoutPhase {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Positioning => LayoutPhase::Positioning,
            Phase::Bundling => LayoutPhase::Bundling,
            Phase::Halted => LayoutPhase::Idle,
        }
    }
}

pub fn start_pending_layout_system(
    mut pending: ResMut<PendingNetwork>,
    config: Res<LayoutConfig>,
    mut active: ResMut<ActiveLayout>,
    mut frame: ResMut<LayoutFrame>,
    mut next: ResMut<NextState<LayoutPhase>>,
) {
    let Some(network) = pending.0.take() else {
        return;
    };
    if active.0.is_some() {
        info!("[LAYOUT] Replacing render in progress");
    }
    frame.clear();
    let scheduler = PhaseScheduler::start(
        network,
        Scales::from_config(&config),
        Box::new(GridDensity::from_config(&config)),
        &config,
        &mut *frame,
    );
    active.0 = Some(scheduler);
    next.set(LayoutPhase::Positioning);
}

pub fn advance_layout_system(
    time: Res<Time>,
    mut active: ResMut<ActiveLayout>,
    mut frame: ResMut<LayoutFrame>,
    state: Res<State<LayoutPhase>>,
    mut next: ResMut<NextState<LayoutPhase>>,
) {
    let Some(scheduler) = active.0.as_mut() else {
        return;
    };
    match scheduler.advance(time.delta(), &mut *frame) {
        Ok(phase) => {
            let phase = LayoutPhase::from(phase);
            if *state.get() != phase && phase == LayoutPhase::Bundling {
                next.set(phase);
            }
        }
        Err(e) => {
            error!("[LAYOUT] {}", e);
            active.0 = None;
            next.set(LayoutPhase::Idle);
        }
    }
}
