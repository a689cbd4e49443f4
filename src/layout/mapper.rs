use crate::core::network::Node;
use crate::core::scale::{extent, Scale};

/// Fit the scales' domains to the nodes' logical extents (clamped) and write
/// each node's screen position from its logical coordinates.
pub fn map_coordinates<X, Y>(nodes: &mut [Node], scale_x: &mut X, scale_y: &mut Y)
where
    X: Scale + ?Sized,
    Y: Scale + ?Sized,
{
    let (Some(dx), Some(dy)) = (
        extent(nodes.iter().map(|n| n.logical.x)),
        extent(nodes.iter().map(|n| n.logical.y)),
    ) else {
        return;
    };
    scale_x.set_domain(dx);
    scale_x.set_clamp(true);
    scale_y.set_domain(dy);
    scale_y.set_clamp(true);

    for node in nodes {
        node.position.x = scale_x.apply(node.logical.x);
        node.position.y = scale_y.apply(node.logical.y);
    }
}
