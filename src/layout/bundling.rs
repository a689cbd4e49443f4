//! Edge bundling: a second simulation over the subdivided graph. Endpoints
//! stay pinned; control points attract each other and are tied along their
//! chains, so nearby parallel edges gather into bundles.

use bevy::log::info;

use crate::core::config::LayoutConfig;
use crate::force::{Body, Link, ManyBody, Simulation, SimulationState};
use crate::layout::segments::SegmentBundle;
use crate::render::{BundlePath, LayoutRenderer};

pub struct BundlingLayout {
    bundle: SegmentBundle,
    simulation: Simulation,
}

impl BundlingLayout {
    pub fn start(bundle: SegmentBundle, config: &LayoutConfig) -> Self {
        let bodies = bundle
            .nodes
            .iter()
            .map(|n| match n.pin {
                Some(pin) => Body::pinned(pin),
                None => Body::at(n.position),
            })
            .collect();

        let simulation = Simulation::new(bodies, config.seed)
            .alpha_decay(config.bundle_alpha_decay)
            .velocity_decay(config.velocity_decay)
            .with_force(
                "charge",
                Box::new(ManyBody::new(config.bundle_charge).distance_max(config.bundle_charge_max)),
            )
            .with_force(
                "link",
                Box::new(
                    Link::new(bundle.links.clone())
                        .strength(config.bundle_link_strength)
                        .distance(config.bundle_link_distance),
                ),
            );

        info!(
            "bundling {} chains over {} control points",
            bundle.paths.len(),
            bundle.nodes.len()
        );
        Self { bundle, simulation }
    }

    /// Step once and publish every chain. Does nothing once cooled.
    pub fn tick(&mut self, renderer: &mut dyn LayoutRenderer) -> bool {
        if !self.simulation.tick() {
            return false;
        }
        for (node, body) in self.bundle.nodes.iter_mut().zip(self.simulation.bodies()) {
            node.position = body.position;
        }
        renderer.draw_bundle(&self.paths());
        true
    }

    /// Current control points of every chain, with the parent edge's styling.
    /// A chain naming a control point outside the bundle is left out.
    pub fn paths(&self) -> Vec<BundlePath> {
        self.bundle
            .paths
            .iter()
            .filter_map(|chain| {
                let points = chain
                    .points
                    .iter()
                    .map(|&k| self.bundle.nodes.get(k).map(|n| n.position))
                    .collect::<Option<Vec<_>>>()?;
                Some(BundlePath {
                    points,
                    color: chain.color.clone(),
                    weight: chain.weight,
                })
            })
            .collect()
    }

    pub fn is_cooled(&self) -> bool {
        self.simulation.state() == SimulationState::Cooled
    }

    pub fn ticks(&self) -> u64 {
        self.simulation.ticks()
    }

    pub fn bundle(&self) -> &SegmentBundle {
        &self.bundle
    }
}
