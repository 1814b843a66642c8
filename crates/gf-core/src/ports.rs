//! Port position resolution.
//!
//! A port's true position depends on the node's *rendered* layout —
//! card height varies with content (image previews, prompt text,
//! generation status) — so resolution prefers asking the live layout
//! via the injected [`LayoutQuery`] capability and converts the answer
//! screen→canvas. When no layout is available (first frame, headless
//! tests) a static formula approximates the port from the node's
//! canvas position. The two strategies are never mixed within one
//! resolution call.

use crate::id::NodeId;
use crate::model::{CanvasNode, Point, Viewport, NODE_WIDTH};
use crate::viewport::screen_to_canvas;

/// Horizontal gap between a node's edge and its port center.
pub const PORT_OFFSET: f32 = 8.0;

/// Vertical distance from a node's top edge to its port row. The port
/// row sits in the card header, which keeps a stable offset even as
/// the card body grows.
pub const HEADER_OFFSET: f32 = 28.0;

/// Which side of the node a port lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortKind {
    Input,
    Output,
}

/// Capability for querying the live rendered layout.
///
/// Implemented by the host against its real DOM/scene; answers are
/// screen-space port centers, or `None` when the node has not been
/// laid out yet.
pub trait LayoutQuery {
    fn port_screen_position(&self, node: NodeId, kind: PortKind) -> Option<Point>;
}

/// A `LayoutQuery` with no rendered layout behind it. Every resolution
/// takes the static-formula path.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessLayout;

impl LayoutQuery for HeadlessLayout {
    fn port_screen_position(&self, _node: NodeId, _kind: PortKind) -> Option<Point> {
        None
    }
}

/// Static port approximation from the node's canvas position alone.
///
/// Best effort: the vertical placement assumes the port row sits at
/// [`HEADER_OFFSET`]; the live layout is authoritative whenever it is
/// available.
pub fn static_port_position(node: &CanvasNode, kind: PortKind) -> Point {
    match kind {
        PortKind::Output => Point::new(
            node.position.x + NODE_WIDTH + PORT_OFFSET,
            node.position.y + HEADER_OFFSET,
        ),
        PortKind::Input => Point::new(
            node.position.x - PORT_OFFSET,
            node.position.y + HEADER_OFFSET,
        ),
    }
}

/// Resolve a port's current canvas-space position.
///
/// Live layout first (converted screen→canvas), static formula
/// otherwise — deterministically one or the other.
pub fn resolve_port(
    node: &CanvasNode,
    kind: PortKind,
    layout: &dyn LayoutQuery,
    viewport: &Viewport,
    origin: Point,
) -> Point {
    match layout.port_screen_position(node.id, kind) {
        Some(screen) => screen_to_canvas(screen, viewport, origin),
        None => static_port_position(node, kind),
    }
}
