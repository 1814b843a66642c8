//! The active pointer interaction.
//!
//! At most one [`DragSession`] is alive at any time; the engine
//! force-terminates the previous session (through its own release
//! logic) before starting a new one.

use gf_core::id::NodeId;
use gf_core::model::{Point, Viewport};

/// A pointer-driven interaction in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragSession {
    /// Repositioning a node. The drag is relative: screen deltas are
    /// divided by zoom so the node tracks the pointer 1:1 in canvas
    /// space at any zoom level.
    NodeDrag {
        node: NodeId,
        /// Pointer-down position, screen space.
        pointer_start: Point,
        /// Node position at pointer-down, canvas space.
        node_start: Point,
    },

    /// Panning the canvas. Re-derived from the captured start state on
    /// every move, so intermediate events can never accumulate drift.
    CanvasPan {
        pointer_start: Point,
        viewport_start: Viewport,
    },

    /// Creating an edge from a node's output port.
    Connect {
        source: NodeId,
        /// Live pointer position, canvas space. Seeded from the
        /// resolved source port so the provisional curve starts
        /// anchored even before the first move.
        cursor: Point,
    },
}

impl DragSession {
    pub fn is_pan(&self) -> bool {
        matches!(self, DragSession::CanvasPan { .. })
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, DragSession::Connect { .. })
    }
}
