//! Edge subdivision. Every straight edge becomes a chain of free control
//! points between its two (pinned) endpoints; the bundling simulation then
//! pulls nearby chains together.

use bevy::log::debug;
use bevy::math::Vec2;

use crate::core::error::{Endpoint, LayoutError};
use crate::core::network::{Edge, Node, NodeId, NodeKind};
use crate::core::scale::Scale;

/// Final positions of the original nodes, indexed by `NodeId`. Produced once
/// when the primary layout stops.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSnapshot {
    nodes: Vec<Node>,
}

impl PositionSnapshot {
    pub(crate) fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn position(&self, id: NodeId) -> Option<Vec2> {
        self.nodes.get(id.index()).map(|n| n.position)
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.nodes.iter().map(|n| n.position).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// One subdivided edge: bundle-node indices `[source, s_1 .. s_n, target]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentChain {
    pub points: Vec<usize>,
    pub color: String,
    pub weight: f32,
}

impl SegmentChain {
    /// Number of synthetic control points.
    pub fn segments(&self) -> usize {
        self.points.len().saturating_sub(2)
    }
}

/// The subdivided graph. Original nodes come first, in snapshot order and
/// pinned; synthetic control points follow.
#[derive(Debug, Clone, Default)]
pub struct SegmentBundle {
    pub nodes: Vec<Node>,
    pub links: Vec<(usize, usize)>,
    pub paths: Vec<SegmentChain>,
}

impl SegmentBundle {
    pub fn originals(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Original)
            .count()
    }

    pub fn synthetics(&self) -> usize {
        self.nodes.len() - self.originals()
    }
}

/// Number of control points for an edge of length `d`. Never less than one.
pub fn segment_count<S: Scale + ?Sized>(segment_scale: &S, d: f32) -> usize {
    segment_scale.apply(d).round().max(1.0) as usize
}

pub fn generate_segments<S: Scale + ?Sized>(
    snapshot: &PositionSnapshot,
    edges: &[Edge],
    segment_scale: &S,
) -> Result<SegmentBundle, LayoutError> {
    let mut nodes: Vec<Node> = snapshot
        .nodes()
        .iter()
        .map(|n| {
            let mut node = n.clone();
            node.kind = NodeKind::Original;
            node.pin_here();
            node
        })
        .collect();
    let mut links = Vec::new();
    let mut paths = Vec::with_capacity(edges.len());

    for (i, edge) in edges.iter().enumerate() {
        let source = snapshot
            .position(edge.source)
            .ok_or_else(|| LayoutError::unknown_node(i, Endpoint::Source, format!("#{}", edge.source.index())))?;
        let target = snapshot
            .position(edge.target)
            .ok_or_else(|| LayoutError::unknown_node(i, Endpoint::Target, format!("#{}", edge.target.index())))?;

        let total = segment_count(segment_scale, source.distance(target));
        let steps = (total + 1) as f32;

        let mut points = Vec::with_capacity(total + 2);
        points.push(edge.source.index());
        for j in 1..=total {
            let at = source.lerp(target, j as f32 / steps);
            let mut node = Node::new(format!("{}-{}", i, j), at.x, at.y);
            node.position = at;
            node.kind = NodeKind::Segment;
            node.color = edge.color.clone();
            points.push(nodes.len());
            nodes.push(node);
        }
        points.push(edge.target.index());

        links.extend(points.windows(2).map(|w| (w[0], w[1])));
        paths.push(SegmentChain {
            points,
            color: edge.color.clone(),
            weight: edge.weight,
        });
    }

    debug!(
        "segmented {} edges into {} control points and {} links",
        paths.len(),
        nodes.len() - snapshot.len(),
        links.len()
    );
    Ok(SegmentBundle { nodes, links, paths })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::network::{EdgeSpec, Network};
    use crate::core::scale::LinearScale;

    fn snapshot(points: &[(f32, f32)]) -> PositionSnapshot {
        PositionSnapshot::new(
            points
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| {
                    let mut n = Node::new(format!("n{}", i), x, y);
                    n.position = Vec2::new(x, y);
                    n
                })
                .collect(),
        )
    }

    fn edges(pairs: &[(usize, usize)], node_count: usize) -> Vec<Edge> {
        let nodes = (0..node_count)
            .map(|i| Node::new(format!("n{}", i), 0.0, 0.0))
            .collect();
        let specs = pairs.iter().map(|&(s, t)| EdgeSpec::new(s, t)).collect();
        Network::new(nodes, specs).unwrap().edges().to_vec()
    }

    #[test]
    fn ten_unit_edge_with_three_segments() {
        let snap = snapshot(&[(0.0, 0.0), (10.0, 0.0)]);
        let scale = LinearScale::new([0.0, 10.0], [0.0, 3.0]);
        let bundle = generate_segments(&snap, &edges(&[(0, 1)], 2), &scale).unwrap();

        assert_eq!(bundle.synthetics(), 3);
        assert_eq!(bundle.links.len(), 4);
        let chain = &bundle.paths[0];
        assert_eq!(chain.points.len(), 5);
        assert_eq!(chain.segments(), 3);

        let xs: Vec<f32> = chain.points.iter().map(|&k| bundle.nodes[k].position.x).collect();
        assert_eq!(xs[0], 0.0);
        assert_eq!(xs[4], 10.0);
        assert!(xs.windows(2).all(|w| w[0] < w[1]), "{:?}", xs);
        assert_eq!(&xs[1..4], &[2.5, 5.0, 7.5]);
    }

    #[test]
    fn zero_length_edge_still_gets_a_control_point() {
        let snap = snapshot(&[(4.0, 4.0), (4.0, 4.0)]);
        let scale = LinearScale::new([0.0, 100.0], [0.0, 16.0]);
        let bundle = generate_segments(&snap, &edges(&[(0, 1)], 2), &scale).unwrap();
        assert!(bundle.synthetics() >= 1);
        assert!(bundle.nodes.iter().all(|n| n.position.is_finite()));
        assert_eq!(bundle.paths[0].points.len(), bundle.paths[0].segments() + 2);
    }

    #[test]
    fn chain_endpoints_are_the_edge_endpoints() {
        let snap = snapshot(&[(1.0, 2.0), (30.0, -5.0), (12.0, 40.0)]);
        let scale = LinearScale::new([0.0, 50.0], [1.0, 8.0]);
        let bundle = generate_segments(&snap, &edges(&[(0, 1), (2, 0)], 3), &scale).unwrap();
        for (chain, (s, t)) in bundle.paths.iter().zip([(0usize, 1usize), (2, 0)]) {
            let first = bundle.nodes[chain.points[0]].position;
            let last = bundle.nodes[*chain.points.last().unwrap()].position;
            assert_eq!(first, snap.nodes()[s].position);
            assert_eq!(last, snap.nodes()[t].position);
        }
    }

    #[test]
    fn counts_add_up() {
        let snap = snapshot(&[(0.0, 0.0), (100.0, 0.0), (0.0, 60.0), (50.0, 50.0)]);
        let scale = LinearScale::new([0.0, 150.0], [1.0, 16.0]).clamped();
        let es = edges(&[(0, 1), (1, 2), (2, 3), (3, 0), (1, 3)], 4);
        let bundle = generate_segments(&snap, &es, &scale).unwrap();

        let totals: Vec<usize> = bundle.paths.iter().map(|c| c.segments()).collect();
        assert!(totals.iter().all(|&t| t >= 1));
        assert_eq!(bundle.links.len(), totals.iter().map(|t| t + 1).sum::<usize>());
        assert_eq!(bundle.nodes.len(), 4 + totals.iter().sum::<usize>());
    }

    #[test]
    fn originals_are_pinned_and_synthetics_free() {
        let snap = snapshot(&[(0.0, 0.0), (20.0, 20.0)]);
        let scale = LinearScale::new([0.0, 30.0], [1.0, 4.0]);
        let bundle = generate_segments(&snap, &edges(&[(0, 1)], 2), &scale).unwrap();
        assert_eq!(bundle.originals(), 2);
        for node in &bundle.nodes {
            match node.kind {
                NodeKind::Original => assert_eq!(node.pin, Some(node.position)),
                NodeKind::Segment => assert_eq!(node.pin, None),
            }
        }
    }

    #[test]
    fn chain_inherits_edge_styling() {
        let snap = snapshot(&[(0.0, 0.0), (20.0, 0.0)]);
        let scale = LinearScale::new([0.0, 20.0], [1.0, 2.0]);
        let mut es = edges(&[(0, 1)], 2);
        es[0].color = "#c00".to_string();
        es[0].weight = 2.5;
        let bundle = generate_segments(&snap, &es, &scale).unwrap();
        assert_eq!(bundle.paths[0].color, "#c00");
        assert_eq!(bundle.paths[0].weight, 2.5);
    }

    #[test]
    fn endpoint_outside_snapshot_fails() {
        let snap = snapshot(&[(0.0, 0.0)]);
        let scale = LinearScale::default();
        let es = vec![Edge {
            source: NodeId(0),
            target: NodeId(5),
            color: String::new(),
            weight: 1.0,
        }];
        let err = generate_segments(&snap, &es, &scale).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::UnknownNode {
                edge: 0,
                endpoint: Endpoint::Target,
                ..
            }
        ));
    }

    #[test]
    fn no_edges_gives_only_originals() {
        let snap = snapshot(&[(0.0, 0.0), (5.0, 5.0)]);
        let bundle = generate_segments(&snap, &[], &LinearScale::default()).unwrap();
        assert_eq!(bundle.nodes.len(), 2);
        assert!(bundle.links.is_empty());
        assert!(bundle.paths.is_empty());
    }
}
