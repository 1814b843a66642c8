//! Hit testing: canvas point → node lookup.
//!
//! Nodes are tested in the order given (the graph's insertion order);
//! the first bounding-box hit wins. There is no z-order resolution
//! beyond that — node footprints rarely overlap by design.

use crate::id::NodeId;
use crate::model::{CanvasNode, Point};

/// Find the node whose footprint contains `canvas_pos`.
/// Returns `None` for the background.
pub fn find_node_at<'a, I>(canvas_pos: Point, nodes: I) -> Option<NodeId>
where
    I: IntoIterator<Item = &'a CanvasNode>,
{
    nodes
        .into_iter()
        .find(|node| node.contains(canvas_pos))
        .map(|node| node.id)
}
