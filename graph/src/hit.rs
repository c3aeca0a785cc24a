#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::HIT_TOLERANCE_PX;
use crate::geom::Point;
use crate::layout::GraphNode;

/// Whether `point` falls within a node's hit circle (radius plus slop).
#[must_use]
pub fn hits(node: &GraphNode, point: Point) -> bool {
    node.position.distance(point) < node.radius + HIT_TOLERANCE_PX
}

/// The first node, in node order, under `point`.
#[must_use]
pub fn node_at(nodes: &[GraphNode], point: Point) -> Option<&GraphNode> {
    nodes.iter().find(|node| hits(node, point))
}
