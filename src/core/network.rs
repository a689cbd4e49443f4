//! Node arena and edges. Edge endpoints are resolved to `NodeId` handles once,
//! at construction, so nothing downstream looks nodes up by name again.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::error::{Endpoint, LayoutError};

/// Index of a node in its network's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Original network node, or a control point created by edge subdivision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    #[default]
    Original,
    Segment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub key: String,
    /// Caller-supplied logical coordinates.
    pub logical: Vec2,
    /// Screen position; written by the coordinate mapper, then by the layout.
    pub position: Vec2,
    /// Fixed position. Pinned nodes are never moved by a simulation.
    pub pin: Option<Vec2>,
    pub color: String,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(key: impl Into<String>, lx: f32, ly: f32) -> Self {
        Self {
            key: key.into(),
            logical: Vec2::new(lx, ly),
            position: Vec2::ZERO,
            pin: None,
            color: String::new(),
            kind: NodeKind::Original,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Fix the node where it currently is.
    pub fn pin_here(&mut self) {
        self.pin = Some(self.position);
    }
}

/// How an edge names one of its endpoints before resolution: by position in
/// the node list, or by node key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeRef {
    Index(usize),
    Key(String),
}

impl From<usize> for NodeRef {
    fn from(i: usize) -> Self {
        NodeRef::Index(i)
    }
}

impl From<&str> for NodeRef {
    fn from(key: &str) -> Self {
        NodeRef::Key(key.to_string())
    }
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeRef::Index(i) => write!(f, "#{}", i),
            NodeRef::Key(k) => f.write_str(k),
        }
    }
}

/// Unresolved edge as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec {
    pub source: NodeRef,
    pub target: NodeRef,
    pub color: String,
    pub weight: f32,
}

impl EdgeSpec {
    pub fn new(source: impl Into<NodeRef>, target: impl Into<NodeRef>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            color: String::new(),
            weight: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub color: String,
    pub weight: f32,
}

/// Validated network: every edge endpoint is a node in the arena.
#[derive(Debug, Clone, Default)]
pub struct Network {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Network {
    /// Resolve every edge against `nodes`. An edge naming an unknown node is
    /// rejected rather than dropped.
    pub fn new(nodes: Vec<Node>, edges: Vec<EdgeSpec>) -> Result<Self, LayoutError> {
        let resolved = {
            let mut by_key: HashMap<&str, NodeId> = HashMap::with_capacity(nodes.len());
            for (i, node) in nodes.iter().enumerate() {
                if by_key.insert(node.key.as_str(), NodeId(i)).is_some() {
                    return Err(LayoutError::DuplicateNode(node.key.clone()));
                }
            }

            let resolve = |edge: usize, endpoint: Endpoint, r: &NodeRef| {
                let found = match r {
                    NodeRef::Index(i) if *i < nodes.len() => Some(NodeId(*i)),
                    NodeRef::Index(_) => None,
                    NodeRef::Key(k) => by_key.get(k.as_str()).copied(),
                };
                found.ok_or_else(|| LayoutError::unknown_node(edge, endpoint, r.to_string()))
            };

            let mut resolved = Vec::with_capacity(edges.len());
            for (i, spec) in edges.into_iter().enumerate() {
                let source = resolve(i, Endpoint::Source, &spec.source)?;
                let target = resolve(i, Endpoint::Target, &spec.target)?;
                resolved.push(Edge {
                    source,
                    target,
                    color: spec.color,
                    weight: spec.weight,
                });
            }
            resolved
        };

        Ok(Self {
            nodes,
            edges: resolved,
        })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }
}
