//! JSON network input and layout export.

use bevy::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

use crate::core::config::LayoutConfig;
use crate::core::error::LayoutError;
use crate::core::network::{EdgeSpec, Network, Node, NodeRef};
use crate::layout::systems::PendingNetwork;
use crate::render::contour::Contour;
use crate::render::curve::bundle_curve;
use crate::render::LayoutFrame;

/// Node ids may be written as strings or as plain numbers.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

fn default_weight() -> f32 {
    1.0
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SerializableNode {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub lx: f32,
    pub ly: f32,
    #[serde(default)]
    pub color: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SerializableLink {
    /// Node index or node id.
    pub source: NodeRef,
    pub target: NodeRef,
    #[serde(default)]
    pub color: String,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

/// Input network document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct NetworkSnapshot {
    pub nodes: Vec<SerializableNode>,
    #[serde(default, alias = "edges")]
    pub links: Vec<SerializableLink>,
}

impl Network {
    /// Validate a snapshot into a network. Fails on the first link whose
    /// endpoint does not resolve.
    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Result<Self, LayoutError> {
        let nodes = snapshot
            .nodes
            .into_iter()
            .map(|n| Node::new(n.id, n.lx, n.ly).with_color(n.color))
            .collect();
        let edges = snapshot
            .links
            .into_iter()
            .map(|l| EdgeSpec {
                source: l.source,
                target: l.target,
                color: l.color,
                weight: l.weight,
            })
            .collect();
        Network::new(nodes, edges)
    }
}

pub fn parse_network(contents: &str) -> Result<Network, LayoutError> {
    let snapshot: NetworkSnapshot = serde_json::from_str(contents)?;
    Network::from_snapshot(snapshot)
}

pub fn load_network(path: &Path) -> Result<Network, LayoutError> {
    let contents = std::fs::read_to_string(path)?;
    parse_network(&contents)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub color: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportPath {
    /// Control points from the bundling simulation.
    pub points: Vec<[f32; 2]>,
    /// Smoothed polyline through the control points.
    pub curve: Vec<[f32; 2]>,
    pub color: String,
    pub weight: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportContour {
    pub value: f32,
    pub rings: Vec<Vec<[f32; 2]>>,
}

/// Output document: the latest published frame.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LayoutExport {
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<ExportNode>,
    pub paths: Vec<ExportPath>,
    pub contours: Vec<ExportContour>,
}

fn xy(points: &[Vec2]) -> Vec<[f32; 2]> {
    points.iter().map(|p| [p.x, p.y]).collect()
}

impl LayoutExport {
    pub fn from_frame(frame: &LayoutFrame, config: &LayoutConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            nodes: frame
                .nodes
                .iter()
                .map(|n| ExportNode {
                    id: n.key.clone(),
                    x: n.position.x,
                    y: n.position.y,
                    color: n.color.clone(),
                })
                .collect(),
            paths: frame
                .paths
                .iter()
                .map(|p| ExportPath {
                    points: xy(&p.points),
                    curve: xy(&bundle_curve(&p.points, config.curve_beta, config.curve_segments)),
                    color: p.color.clone(),
                    weight: p.weight,
                })
                .collect(),
            contours: frame
                .contours
                .iter()
                .map(|c: &Contour| ExportContour {
                    value: c.value,
                    rings: c.rings.iter().map(|r| xy(r)).collect(),
                })
                .collect(),
        }
    }
}

pub fn save_export(path: &Path, export: &LayoutExport) -> Result<(), LayoutError> {
    let json = serde_json::to_string_pretty(export)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Deferred network file to load; processed in Update.
#[derive(Resource, Default)]
pub struct PendingLoad(pub Option<PathBuf>);

/// Loads the pending file and queues it for layout. Replaces any render in
/// progress.
pub fn process_pending_load_system(
    mut pending: ResMut<PendingLoad>,
    mut network: ResMut<PendingNetwork>,
) {
    let Some(path) = pending.0.take() else {
        return;
    };
    match load_network(&path) {
        Ok(loaded) => {
            info!(
                "[LOAD] Loaded {} nodes, {} links from {}",
                loaded.nodes().len(),
                loaded.edges().len(),
                path.display()
            );
            network.0 = Some(loaded);
        }
        Err(e) => error!("[LOAD] {}: {}", path.display(), e),
    }
}
