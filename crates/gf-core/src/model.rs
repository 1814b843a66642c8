//! Core data model for the generation-graph canvas.
//!
//! The document is a directed graph where nodes are content elements
//! (image inputs, prompt-driven generators) placed in canvas space, and
//! edges are data-flow connections from a node's output to another
//! node's input. Positions are canvas-space; everything screen-space
//! lives behind explicit conversions in [`crate::viewport`].

use crate::id::{EdgeId, NodeId};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ─── Geometry primitives ─────────────────────────────────────────────────

/// A 2D point, in screen or canvas space depending on context.
/// The space is never mixed without an explicit conversion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rendered footprint in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Pan offset + uniform zoom mapping canvas space onto screen space.
///
/// Invariant: `MIN_ZOOM <= zoom <= MAX_ZOOM` (enforced by
/// [`Viewport::zoom_at`](crate::viewport) — the only mutation that
/// touches `zoom`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// Fixed rendered width of every node card.
pub const NODE_WIDTH: f32 = 320.0;

/// Lifecycle of a generator node's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GeneratorStatus {
    #[default]
    Idle,
    Generating,
    Done,
}

/// The node kinds on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// An image source. Source-only: never the target of an edge.
    Input { has_image: bool },

    /// Produces an image from a prompt plus connected inputs.
    Generator { status: GeneratorStatus },
}

impl NodeKind {
    pub fn is_input(&self) -> bool {
        matches!(self, NodeKind::Input { .. })
    }

    /// Rendered footprint for this kind and state.
    ///
    /// Height is a best-effort approximation of the live layout: the
    /// real card height depends on rendered content (image previews,
    /// prompt text), so callers that can should prefer the
    /// [`LayoutQuery`](crate::ports::LayoutQuery) path and treat these
    /// values as the headless fallback.
    pub fn footprint(&self) -> Size {
        let height = match self {
            NodeKind::Input { has_image: false } => 180.0,
            NodeKind::Input { has_image: true } => 360.0,
            NodeKind::Generator {
                status: GeneratorStatus::Idle,
            } => 300.0,
            NodeKind::Generator { .. } => 480.0,
        };
        Size {
            width: NODE_WIDTH,
            height,
        }
    }
}

/// A single node on the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasNode {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Top-left corner, canvas space.
    pub position: Point,
}

impl CanvasNode {
    pub fn new(id: NodeId, kind: NodeKind, position: Point) -> Self {
        Self { id, kind, position }
    }

    /// Axis-aligned bounding box test against a canvas-space point.
    pub fn contains(&self, p: Point) -> bool {
        let size = self.kind.footprint();
        p.x >= self.position.x
            && p.x <= self.position.x + size.width
            && p.y >= self.position.y
            && p.y <= self.position.y + size.height
    }
}

// ─── Edges ───────────────────────────────────────────────────────────────

/// A directed data-flow connection between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

/// Why a connection was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectError {
    /// Source and target are the same node.
    SelfLoop,
    /// The target is an input-kind node; inputs are source-only.
    InputTarget,
    /// An identical source→target edge already exists.
    Duplicate,
    /// One of the endpoints is not in the graph.
    UnknownNode(NodeId),
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectError::SelfLoop => write!(f, "cannot connect a node to itself"),
            ConnectError::InputTarget => {
                write!(f, "input nodes only provide data, they cannot receive connections")
            }
            ConnectError::Duplicate => write!(f, "these nodes are already connected"),
            ConnectError::UnknownNode(id) => write!(f, "unknown node {id}"),
        }
    }
}

impl std::error::Error for ConnectError {}

// ─── Flow graph ──────────────────────────────────────────────────────────

/// The canvas document: nodes plus directed connection edges.
///
/// Backed by a `StableDiGraph` so indices survive removals. Node
/// iteration order is insertion order, which doubles as the hit-test
/// order (footprints rarely overlap by design, so first match wins).
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    graph: StableDiGraph<CanvasNode, EdgeId>,
    index: HashMap<NodeId, NodeIndex>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Replaces nothing: a duplicate ID is a caller bug and
    /// the existing node is returned untouched.
    pub fn add_node(&mut self, node: CanvasNode) -> NodeId {
        let id = node.id;
        if self.index.contains_key(&id) {
            log::warn!("add_node: {id} already present, ignoring");
            return id;
        }
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        id
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: NodeId) -> Option<CanvasNode> {
        let idx = self.index.remove(&id)?;
        self.graph.remove_node(idx)
    }

    pub fn node(&self, id: NodeId) -> Option<&CanvasNode> {
        self.index.get(&id).map(|&idx| &self.graph[idx])
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut CanvasNode> {
        self.index.get(&id).map(|&idx| &mut self.graph[idx])
    }

    /// Move a node to an absolute canvas position.
    /// Unknown IDs are ignored (the node may have been deleted mid-drag).
    pub fn set_position(&mut self, id: NodeId, position: Point) {
        if let Some(node) = self.node_mut(id) {
            node.position = position;
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &CanvasNode> {
        self.graph.node_weights()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// All edges, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.graph.edge_indices().filter_map(|eidx| {
            let (s, t) = self.graph.edge_endpoints(eidx)?;
            Some(Edge {
                id: self.graph[eidx],
                source: self.graph[s].id,
                target: self.graph[t].id,
            })
        })
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Create a validated connection. This is the only way edges enter
    /// the graph, so the no-self-loop and no-input-target invariants
    /// hold for every stored edge.
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> Result<EdgeId, ConnectError> {
        if source == target {
            return Err(ConnectError::SelfLoop);
        }
        let &sidx = self
            .index
            .get(&source)
            .ok_or(ConnectError::UnknownNode(source))?;
        let &tidx = self
            .index
            .get(&target)
            .ok_or(ConnectError::UnknownNode(target))?;
        if self.graph[tidx].kind.is_input() {
            return Err(ConnectError::InputTarget);
        }
        if self.graph.find_edge(sidx, tidx).is_some() {
            return Err(ConnectError::Duplicate);
        }
        let id = EdgeId::anonymous();
        self.graph.add_edge(sidx, tidx, id);
        log::debug!("connect: {source} -> {target} as {id}");
        Ok(id)
    }

    /// Delete an edge by ID. Returns whether anything was removed.
    pub fn disconnect(&mut self, id: EdgeId) -> bool {
        let found = self
            .graph
            .edge_indices()
            .find(|&eidx| self.graph[eidx] == id);
        match found {
            Some(eidx) => {
                self.graph.remove_edge(eidx);
                true
            }
            None => false,
        }
    }

    /// IDs of nodes feeding into `id` (its connected inputs).
    pub fn sources_of(&self, id: NodeId) -> Vec<NodeId> {
        use petgraph::Direction;
        match self.index.get(&id) {
            Some(&idx) => self
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .map(|n| self.graph[n].id)
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input(name: &str, x: f32, y: f32) -> CanvasNode {
        CanvasNode::new(
            NodeId::intern(name),
            NodeKind::Input { has_image: false },
            Point::new(x, y),
        )
    }

    fn generator(name: &str, x: f32, y: f32) -> CanvasNode {
        CanvasNode::new(
            NodeId::intern(name),
            NodeKind::Generator {
                status: GeneratorStatus::Idle,
            },
            Point::new(x, y),
        )
    }

    #[test]
    fn connect_and_list_edges() {
        let mut g = FlowGraph::new();
        let a = g.add_node(input("img", 0.0, 0.0));
        let b = g.add_node(generator("gen", 400.0, 0.0));

        let edge = g.connect(a, b).unwrap();
        let edges: Vec<Edge> = g.edges().collect();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].id, edge);
        assert_eq!(edges[0].source, a);
        assert_eq!(edges[0].target, b);
    }

    #[test]
    fn connect_rejects_self_loop() {
        let mut g = FlowGraph::new();
        let a = g.add_node(generator("solo", 0.0, 0.0));
        assert_eq!(g.connect(a, a), Err(ConnectError::SelfLoop));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn connect_rejects_input_target() {
        let mut g = FlowGraph::new();
        let r#gen = g.add_node(generator("gen2", 0.0, 0.0));
        let img = g.add_node(input("img2", 400.0, 0.0));
        assert_eq!(g.connect(r#gen, img), Err(ConnectError::InputTarget));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn connect_rejects_duplicate_and_unknown() {
        let mut g = FlowGraph::new();
        let a = g.add_node(input("dup_src", 0.0, 0.0));
        let b = g.add_node(generator("dup_dst", 400.0, 0.0));
        g.connect(a, b).unwrap();
        assert_eq!(g.connect(a, b), Err(ConnectError::Duplicate));

        let ghost = NodeId::intern("ghost");
        assert_eq!(g.connect(ghost, b), Err(ConnectError::UnknownNode(ghost)));
    }

    #[test]
    fn remove_node_drops_incident_edges() {
        let mut g = FlowGraph::new();
        let a = g.add_node(input("rm_src", 0.0, 0.0));
        let b = g.add_node(generator("rm_dst", 400.0, 0.0));
        g.connect(a, b).unwrap();

        g.remove_node(a);
        assert_eq!(g.edge_count(), 0);
        assert!(!g.contains(a));
        assert!(g.contains(b));
    }

    #[test]
    fn disconnect_removes_only_that_edge() {
        let mut g = FlowGraph::new();
        let a = g.add_node(input("d_a", 0.0, 0.0));
        let b = g.add_node(generator("d_b", 400.0, 0.0));
        let c = g.add_node(generator("d_c", 800.0, 0.0));
        let ab = g.connect(a, b).unwrap();
        let bc = g.connect(b, c).unwrap();

        assert!(g.disconnect(ab));
        assert!(!g.disconnect(ab));
        let remaining: Vec<Edge> = g.edges().collect();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, bc);
    }

    #[test]
    fn sources_of_lists_incoming() {
        let mut g = FlowGraph::new();
        let a = g.add_node(input("s_a", 0.0, 0.0));
        let b = g.add_node(input("s_b", 0.0, 400.0));
        let r#gen = g.add_node(generator("s_gen", 400.0, 200.0));
        g.connect(a, r#gen).unwrap();
        g.connect(b, r#gen).unwrap();

        let mut sources = g.sources_of(r#gen);
        sources.sort_by_key(|id| id.as_str().to_string());
        assert_eq!(sources, vec![a, b]);
    }

    #[test]
    fn footprint_varies_with_state() {
        let bare = NodeKind::Input { has_image: false }.footprint();
        let loaded = NodeKind::Input { has_image: true }.footprint();
        assert_eq!(bare.width, NODE_WIDTH);
        assert_eq!(loaded.width, NODE_WIDTH);
        assert!(loaded.height > bare.height);

        let idle = NodeKind::Generator {
            status: GeneratorStatus::Idle,
        }
        .footprint();
        let done = NodeKind::Generator {
            status: GeneratorStatus::Done,
        }
        .footprint();
        assert!(done.height > idle.height);
    }
}
