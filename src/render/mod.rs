//! Rendering collaborators: the sink the layout publishes into, curve
//! smoothing for bundled paths, and density contours.

pub mod contour;
pub mod curve;

use bevy::math::Vec2;
use bevy::prelude::Resource;

use crate::core::network::Node;
use contour::Contour;

/// One edge's control points at the current bundling step, with the parent
/// edge's styling.
#[derive(Debug, Clone, PartialEq)]
pub struct BundlePath {
    pub points: Vec<Vec2>,
    pub color: String,
    pub weight: f32,
}

/// Receives layout output. The layout never draws; it only publishes.
pub trait LayoutRenderer {
    /// Initial node set, drawn once per render call.
    fn draw_nodes(&mut self, nodes: &[Node]);
    /// Node positions after a primary layout tick, indexed like the node set.
    fn update_nodes(&mut self, positions: &[Vec2]);
    fn draw_contours(&mut self, contours: &[Contour]);
    /// All bundled paths after a bundling tick.
    fn draw_bundle(&mut self, paths: &[BundlePath]);
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub key: String,
    pub color: String,
    pub position: Vec2,
}

/// Keeps the latest published frame. Used as the app's render target and by
/// the exporter.
#[derive(Resource, Debug, Clone, Default)]
pub struct LayoutFrame {
    pub nodes: Vec<NodeView>,
    pub contours: Vec<Contour>,
    pub paths: Vec<BundlePath>,
    /// Number of `update_nodes` calls since the last `draw_nodes`.
    pub node_updates: u64,
    /// Number of `draw_bundle` calls since the last `draw_nodes`.
    pub bundle_draws: u64,
}

impl LayoutFrame {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl LayoutRenderer for LayoutFrame {
    fn draw_nodes(&mut self, nodes: &[Node]) {
        self.nodes = nodes
            .iter()
            .map(|n| NodeView {
                key: n.key.clone(),
                color: n.color.clone(),
                position: n.position,
            })
            .collect();
        self.paths.clear();
        self.node_updates = 0;
        self.bundle_draws = 0;
    }

    fn update_nodes(&mut self, positions: &[Vec2]) {
        for (view, &p) in self.nodes.iter_mut().zip(positions) {
            view.position = p;
        }
        self.node_updates += 1;
    }

    fn draw_contours(&mut self, contours: &[Contour]) {
        self.contours = contours.to_vec();
    }

    fn draw_bundle(&mut self, paths: &[BundlePath]) {
        self.paths = paths.to_vec();
        self.bundle_draws += 1;
    }
}
