//! Two-phase state machine: position the original nodes, then hand their
//! final positions to edge bundling. Driven by frame deltas supplied by the
//! caller; nothing here reads a clock.

use bevy::log::{debug, info};
use std::time::Duration;

use crate::core::config::{LayoutConfig, PhaseTrigger};
use crate::core::error::LayoutError;
use crate::core::network::{Edge, Network, Node};
use crate::core::scale::{LinearScale, Scale};
use crate::layout::bundling::BundlingLayout;
use crate::layout::mapper::map_coordinates;
use crate::layout::primary::PrimaryLayout;
use crate::layout::segments::{generate_segments, PositionSnapshot, SegmentBundle};
use crate::render::contour::DensityEstimator;
use crate::render::{BundlePath, LayoutRenderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Positioning,
    Bundling,
    /// Segmentation failed at the handoff. Terminal.
    Halted,
}

/// Screen mapping for node coordinates, plus the edge-length to
/// segment-count mapping.
pub struct Scales {
    pub x: Box<dyn Scale>,
    pub y: Box<dyn Scale>,
    pub segments: Box<dyn Scale>,
}

impl Scales {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            x: Box::new(LinearScale::new([0.0, 1.0], config.x_range())),
            y: Box::new(LinearScale::new([0.0, 1.0], config.y_range())),
            segments: Box::new(
                LinearScale::new(
                    [0.0, config.diagonal()],
                    [config.segments_min, config.segments_max],
                )
                .clamped(),
            ),
        }
    }
}

enum Stage {
    Positioning(PrimaryLayout),
    Bundling {
        layout: BundlingLayout,
        snapshot: PositionSnapshot,
    },
    Halted(PositionSnapshot),
}

pub struct PhaseScheduler {
    config: LayoutConfig,
    edges: Vec<Edge>,
    segment_scale: Box<dyn Scale>,
    estimator: Box<dyn DensityEstimator>,
    stage: Stage,
    dwell: Duration,
    handoffs: u32,
}

impl PhaseScheduler {
    /// Map the network to screen space, start positioning, and draw the
    /// initial nodes and contours.
    pub fn start(
        network: Network,
        scales: Scales,
        estimator: Box<dyn DensityEstimator>,
        config: &LayoutConfig,
        renderer: &mut dyn LayoutRenderer,
    ) -> Self {
        let Scales {
            mut x,
            mut y,
            segments,
        } = scales;
        let (mut nodes, edges) = network.into_parts();
        map_coordinates(&mut nodes, x.as_mut(), y.as_mut());

        renderer.draw_nodes(&nodes);
        let positions: Vec<_> = nodes.iter().map(|n| n.position).collect();
        renderer.draw_contours(&estimator.estimate(&positions));

        info!(
            "layout started: {} nodes, {} edges, handoff after {:?}",
            nodes.len(),
            edges.len(),
            config.dwell()
        );
        Self {
            config: config.clone(),
            edges,
            segment_scale: segments,
            estimator,
            stage: Stage::Positioning(PrimaryLayout::start(nodes, config)),
            dwell: config.dwell(),
            handoffs: 0,
        }
    }

    /// Called once per frame. Either hands off to bundling or ticks the
    /// active simulation, never both. A failed handoff is reported once and
    /// leaves the scheduler halted.
    pub fn advance(
        &mut self,
        delta: Duration,
        renderer: &mut dyn LayoutRenderer,
    ) -> Result<Phase, LayoutError> {
        match &mut self.stage {
            Stage::Positioning(primary) => {
                self.dwell = self.dwell.saturating_sub(delta);
                let settled = self.config.trigger == PhaseTrigger::Settled && primary.is_cooled();
                if self.dwell.is_zero() || settled {
                    let snapshot = primary.stop();
                    self.hand_off(snapshot, renderer)?;
                } else {
                    primary.tick(renderer);
                }
            }
            Stage::Bundling { layout, .. } => {
                layout.tick(renderer);
            }
            Stage::Halted(_) => {}
        }
        Ok(self.phase())
    }

    fn hand_off(
        &mut self,
        snapshot: PositionSnapshot,
        renderer: &mut dyn LayoutRenderer,
    ) -> Result<(), LayoutError> {
        let bundle = match generate_segments(&snapshot, &self.edges, self.segment_scale.as_ref()) {
            Ok(bundle) => bundle,
            Err(e) => {
                self.stage = Stage::Halted(snapshot);
                return Err(e);
            }
        };
        renderer.draw_contours(&self.estimator.estimate(&snapshot.positions()));
        debug!(
            "handoff: {} chains, {} bundle nodes, {} links",
            bundle.paths.len(),
            bundle.nodes.len(),
            bundle.links.len()
        );

        self.stage = Stage::Bundling {
            layout: BundlingLayout::start(bundle, &self.config),
            snapshot,
        };
        self.handoffs += 1;
        info!("positioning stopped, bundling started");
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        match self.stage {
            Stage::Positioning(_) => Phase::Positioning,
            Stage::Bundling { .. } => Phase::Bundling,
            Stage::Halted(_) => Phase::Halted,
        }
    }

    /// Number of positioning-to-bundling handoffs. Never more than one.
    pub fn handoff_count(&self) -> u32 {
        self.handoffs
    }

    /// Dwell time left before the handoff.
    pub fn remaining(&self) -> Duration {
        self.dwell
    }

    /// Bundling has run until its simulation cooled.
    pub fn is_settled(&self) -> bool {
        match &self.stage {
            Stage::Positioning(_) | Stage::Halted(_) => false,
            Stage::Bundling { layout, .. } => layout.is_cooled(),
        }
    }

    /// Original nodes at their latest positions.
    pub fn nodes(&self) -> &[Node] {
        match &self.stage {
            Stage::Positioning(primary) => primary.nodes(),
            Stage::Bundling { snapshot, .. } | Stage::Halted(snapshot) => snapshot.nodes(),
        }
    }

    pub fn bundle(&self) -> Option<&SegmentBundle> {
        match &self.stage {
            Stage::Positioning(_) | Stage::Halted(_) => None,
            Stage::Bundling { layout, .. } => Some(layout.bundle()),
        }
    }

    pub fn paths(&self) -> Vec<BundlePath> {
        match &self.stage {
            Stage::Positioning(_) | Stage::Halted(_) => Vec::new(),
            Stage::Bundling { layout, .. } => layout.paths(),
        }
    }
}
