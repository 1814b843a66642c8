//! The canvas interaction engine.
//!
//! One explicit state machine instead of per-event closures: every
//! input event goes through [`CanvasEngine::handle`], which mutates the
//! engine's own state (viewport + active session) and returns a list of
//! [`Command`]s for the host to interpret — store mutations,
//! persistence requests, notifications. This keeps every transition
//! independently unit-testable and leaves the host free to apply
//! effects however it likes.
//!
//! Interaction modes are mutually exclusive: dragging a node, panning
//! the canvas, or dragging out a connection. Where the pointer-down
//! originated (classified by the host as a [`Target`]) selects the
//! mode; starting any session first terminates the previous one
//! through its own release logic.

use crate::input::{InputEvent, Modifiers, PointerButton, Target};
use crate::session::DragSession;
use gf_core::curve::EdgeCurve;
use gf_core::hit::find_node_at;
use gf_core::id::NodeId;
use gf_core::model::{ConnectError, FlowGraph, Point, Viewport};
use gf_core::ports::{resolve_port, LayoutQuery, PortKind};
use gf_core::viewport::{screen_to_canvas, MAX_ZOOM, MIN_ZOOM};
use smallvec::SmallVec;

// ─── Commands ────────────────────────────────────────────────────────────

/// Notification urgency, forwarded to the host's toast surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

/// A side effect requested by a transition, interpreted by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// The viewport changed (pan or zoom tick). Fired continuously;
    /// persistence should go through the debounced saver.
    ViewportChanged(Viewport),
    /// Live node position during a drag. Local-only — no write-through.
    MoveNode { id: NodeId, position: Point },
    /// Drag released with a changed position — persist it.
    CommitNodeMove { id: NodeId, position: Point },
    /// A connection drag resolved over a valid target.
    ConnectNodes { source: NodeId, target: NodeId },
    /// Surface a transient message to the user.
    Notify {
        message: String,
        severity: Severity,
    },
    /// Secondary action over the background: the host should open its
    /// new-node menu, spawning at `canvas`.
    OpenContextMenu { canvas: Point, screen: Point },
}

/// Commands emitted by a single transition. Rarely more than two.
pub type Commands = SmallVec<[Command; 4]>;

// ─── Engine ──────────────────────────────────────────────────────────────

/// Owns the viewport and the single active drag session.
///
/// Constructed when the canvas mounts, dropped when it unmounts.
/// Everything is synchronous: each call completes before the
/// triggering input event returns, and events are processed strictly
/// in delivery order.
#[derive(Debug)]
pub struct CanvasEngine {
    viewport: Viewport,
    /// Canvas container's top-left in screen coordinates.
    origin: Point,
    session: Option<DragSession>,
}

impl CanvasEngine {
    pub fn new(origin: Point) -> Self {
        Self {
            viewport: Viewport::default(),
            origin,
            session: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Restore or externally set the viewport (e.g. from a persisted
    /// session). Out-of-range zoom is clamped, never rejected.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Viewport {
            zoom: viewport.zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            ..viewport
        };
    }

    /// Update the container origin after the host element moves or
    /// resizes.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// The provisional curve for an active connection drag, from the
    /// resolved source output port to the live cursor. `None` when no
    /// connection drag is active or the source node vanished.
    pub fn preview_curve(&self, graph: &FlowGraph, layout: &dyn LayoutQuery) -> Option<EdgeCurve> {
        match self.session {
            Some(DragSession::Connect { source, cursor }) => {
                let node = graph.node(source)?;
                let from = resolve_port(node, PortKind::Output, layout, &self.viewport, self.origin);
                Some(EdgeCurve::between(from, cursor))
            }
            _ => None,
        }
    }

    /// Feed one input event through the state machine.
    ///
    /// `target` is the host's classification of what the pointer is
    /// over; it is only consulted for `PointerDown` and `ContextMenu`.
    pub fn handle(
        &mut self,
        graph: &FlowGraph,
        layout: &dyn LayoutQuery,
        event: &InputEvent,
        target: Target,
    ) -> Commands {
        let mut out = Commands::new();
        match event {
            InputEvent::PointerDown {
                pos,
                button,
                modifiers,
            } => self.pointer_down(graph, layout, *pos, *button, *modifiers, target, &mut out),
            InputEvent::PointerMove { pos, .. } => self.pointer_move(graph, *pos, &mut out),
            InputEvent::PointerUp { pos, .. } => {
                self.end_session(graph, *pos, &mut out);
            }
            InputEvent::Zoom { anchor, factor } => {
                let zoomed = self.viewport.zoom_at(*anchor, *factor, self.origin);
                if zoomed != self.viewport {
                    self.viewport = zoomed;
                    out.push(Command::ViewportChanged(zoomed));
                }
            }
            InputEvent::ContextMenu { pos } => {
                if target == Target::Background {
                    out.push(Command::OpenContextMenu {
                        canvas: screen_to_canvas(*pos, &self.viewport, self.origin),
                        screen: *pos,
                    });
                }
            }
            InputEvent::PanKeyReleased | InputEvent::PointerLeft => {
                // Only a pan ends here; node and connection drags stay
                // alive until an actual release.
                if self.session.is_some_and(|s| s.is_pan()) {
                    self.session = None;
                    log::debug!("pan ended ({event:?})");
                }
            }
        }
        out
    }

    // ─── Transitions ─────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    fn pointer_down(
        &mut self,
        graph: &FlowGraph,
        layout: &dyn LayoutQuery,
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
        target: Target,
        out: &mut Commands,
    ) {
        // Exactly one session at a time: run the old one's release
        // logic before anything new starts.
        if self.session.is_some() {
            self.end_session(graph, pos, out);
        }

        let wants_pan = button == PointerButton::Middle
            || (button == PointerButton::Primary && modifiers.space);

        self.session = if wants_pan {
            // Pan starts only from empty canvas; a held pan modifier
            // over a node or port starts nothing.
            (target == Target::Background).then_some(DragSession::CanvasPan {
                pointer_start: pos,
                viewport_start: self.viewport,
            })
        } else if button == PointerButton::Primary {
            match target {
                Target::OutputPort(source) => {
                    graph.node(source).map(|node| DragSession::Connect {
                        source,
                        cursor: resolve_port(
                            node,
                            PortKind::Output,
                            layout,
                            &self.viewport,
                            self.origin,
                        ),
                    })
                }
                Target::Node(id) => graph.node(id).map(|node| DragSession::NodeDrag {
                    node: id,
                    pointer_start: pos,
                    node_start: node.position,
                }),
                // Controls and the background belong to the host.
                Target::Background | Target::Control => None,
            }
        } else {
            None
        };

        if let Some(session) = &self.session {
            log::debug!("session started: {session:?}");
        }
    }

    fn pointer_move(&mut self, graph: &FlowGraph, pos: Point, out: &mut Commands) {
        let Some(session) = self.session else {
            return;
        };
        match session {
            DragSession::NodeDrag {
                node,
                pointer_start,
                node_start,
            } => {
                if !graph.contains(node) {
                    // Deleted mid-drag: treat as gone and stop.
                    log::debug!("node {node} vanished mid-drag, cancelling");
                    self.session = None;
                    return;
                }
                let position = dragged_position(node_start, pointer_start, pos, self.viewport.zoom);
                out.push(Command::MoveNode { id: node, position });
            }
            DragSession::CanvasPan {
                pointer_start,
                viewport_start,
            } => {
                let delta = Point::new(pos.x - pointer_start.x, pos.y - pointer_start.y);
                self.viewport = viewport_start.panned(delta);
                out.push(Command::ViewportChanged(self.viewport));
            }
            DragSession::Connect { source, .. } => {
                self.session = Some(DragSession::Connect {
                    source,
                    cursor: screen_to_canvas(pos, &self.viewport, self.origin),
                });
            }
        }
    }

    /// Release logic for whatever session is active. Shared between
    /// pointer-up and the force-termination on a new pointer-down.
    fn end_session(&mut self, graph: &FlowGraph, pos: Point, out: &mut Commands) {
        let Some(session) = self.session.take() else {
            return;
        };
        log::debug!("session ended: {session:?}");

        match session {
            DragSession::NodeDrag {
                node,
                pointer_start,
                node_start,
            } => {
                if !graph.contains(node) {
                    return;
                }
                let position = dragged_position(node_start, pointer_start, pos, self.viewport.zoom);
                // Unchanged position → no commit, avoids no-op writes.
                if position != node_start {
                    out.push(Command::CommitNodeMove { id: node, position });
                }
            }
            DragSession::CanvasPan { .. } => {
                // Viewport changes were applied continuously; nothing
                // to commit here.
            }
            DragSession::Connect { source, .. } => {
                let drop_at = screen_to_canvas(pos, &self.viewport, self.origin);
                self.resolve_connection(graph, source, drop_at, out);
            }
        }
    }

    fn resolve_connection(
        &self,
        graph: &FlowGraph,
        source: NodeId,
        drop_at: Point,
        out: &mut Commands,
    ) {
        if !graph.contains(source) {
            return;
        }
        let Some(target) = find_node_at(drop_at, graph.nodes()) else {
            // Released over empty canvas: silent cancel.
            return;
        };
        if target == source {
            // Self-loop attempt: silent cancel.
            return;
        }
        let target_is_input = graph.node(target).is_some_and(|n| n.kind.is_input());
        if target_is_input {
            out.push(Command::Notify {
                message: ConnectError::InputTarget.to_string(),
                severity: Severity::Warning,
            });
            return;
        }
        out.push(Command::ConnectNodes { source, target });
    }
}

/// Node position for a drag: screen delta divided by zoom, so the drag
/// feels 1:1 in canvas space at any zoom level.
fn dragged_position(node_start: Point, pointer_start: Point, pointer: Point, zoom: f32) -> Point {
    Point {
        x: node_start.x + (pointer.x - pointer_start.x) / zoom,
        y: node_start.y + (pointer.y - pointer_start.y) / zoom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gf_core::model::{CanvasNode, GeneratorStatus, NodeKind};
    use gf_core::ports::HeadlessLayout;
    use pretty_assertions::assert_eq;

    fn graph_with(nodes: &[(&str, NodeKind, f32, f32)]) -> FlowGraph {
        let mut g = FlowGraph::new();
        for &(name, kind, x, y) in nodes {
            g.add_node(CanvasNode::new(NodeId::intern(name), kind, Point::new(x, y)));
        }
        g
    }

    fn gen_kind() -> NodeKind {
        NodeKind::Generator {
            status: GeneratorStatus::Idle,
        }
    }

    fn input_kind() -> NodeKind {
        NodeKind::Input { has_image: false }
    }

    fn down(pos: Point, button: PointerButton, modifiers: Modifiers) -> InputEvent {
        InputEvent::PointerDown {
            pos,
            button,
            modifiers,
        }
    }

    fn mv(pos: Point) -> InputEvent {
        InputEvent::PointerMove {
            pos,
            modifiers: Modifiers::NONE,
        }
    }

    fn up(pos: Point) -> InputEvent {
        InputEvent::PointerUp {
            pos,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn node_drag_scales_with_zoom() {
        // Node at (100,100), zoom 2, screen delta
        // (50,30) → live position (125,115).
        let graph = graph_with(&[("drag_me", gen_kind(), 100.0, 100.0)]);
        let mut engine = CanvasEngine::new(Point::new(0.0, 0.0));
        engine.set_viewport(Viewport {
            x: 0.0,
            y: 0.0,
            zoom: 2.0,
        });

        let id = NodeId::intern("drag_me");
        let start = Point::new(400.0, 400.0);
        engine.handle(
            &graph,
            &HeadlessLayout,
            &down(start, PointerButton::Primary, Modifiers::NONE),
            Target::Node(id),
        );

        let cmds = engine.handle(
            &graph,
            &HeadlessLayout,
            &mv(Point::new(450.0, 430.0)),
            Target::Background,
        );
        assert_eq!(
            cmds.as_slice(),
            &[Command::MoveNode {
                id,
                position: Point::new(125.0, 115.0)
            }]
        );
    }

    #[test]
    fn node_drag_commits_once_on_release() {
        let graph = graph_with(&[("committer", gen_kind(), 0.0, 0.0)]);
        let mut engine = CanvasEngine::new(Point::new(0.0, 0.0));
        let id = NodeId::intern("committer");

        engine.handle(
            &graph,
            &HeadlessLayout,
            &down(Point::new(10.0, 10.0), PointerButton::Primary, Modifiers::NONE),
            Target::Node(id),
        );
        engine.handle(
            &graph,
            &HeadlessLayout,
            &mv(Point::new(60.0, 10.0)),
            Target::Background,
        );
        let cmds = engine.handle(
            &graph,
            &HeadlessLayout,
            &up(Point::new(60.0, 10.0)),
            Target::Background,
        );
        assert_eq!(
            cmds.as_slice(),
            &[Command::CommitNodeMove {
                id,
                position: Point::new(50.0, 0.0)
            }]
        );
        assert!(engine.session().is_none());
    }

    #[test]
    fn unmoved_drag_commits_nothing() {
        let graph = graph_with(&[("stay_put", gen_kind(), 5.0, 5.0)]);
        let mut engine = CanvasEngine::new(Point::new(0.0, 0.0));

        let p = Point::new(33.0, 44.0);
        engine.handle(
            &graph,
            &HeadlessLayout,
            &down(p, PointerButton::Primary, Modifiers::NONE),
            Target::Node(NodeId::intern("stay_put")),
        );
        let cmds = engine.handle(&graph, &HeadlessLayout, &up(p), Target::Background);
        assert!(cmds.is_empty(), "no-op drag must not emit a commit");
    }

    #[test]
    fn node_deleted_mid_drag_cancels() {
        let mut graph = graph_with(&[("doomed", gen_kind(), 0.0, 0.0)]);
        let mut engine = CanvasEngine::new(Point::new(0.0, 0.0));
        let id = NodeId::intern("doomed");

        engine.handle(
            &graph,
            &HeadlessLayout,
            &down(Point::new(0.0, 0.0), PointerButton::Primary, Modifiers::NONE),
            Target::Node(id),
        );
        graph.remove_node(id);

        let cmds = engine.handle(
            &graph,
            &HeadlessLayout,
            &mv(Point::new(80.0, 80.0)),
            Target::Background,
        );
        assert!(cmds.is_empty());
        assert!(engine.session().is_none());

        let cmds = engine.handle(
            &graph,
            &HeadlessLayout,
            &up(Point::new(80.0, 80.0)),
            Target::Background,
        );
        assert!(cmds.is_empty());
    }

    #[test]
    fn pan_with_middle_button() {
        // Viewport {10,10,1}, pointer delta (+20,+5)
        // → {30,15,1}.
        let graph = FlowGraph::new();
        let mut engine = CanvasEngine::new(Point::new(0.0, 0.0));
        engine.set_viewport(Viewport {
            x: 10.0,
            y: 10.0,
            zoom: 1.0,
        });

        engine.handle(
            &graph,
            &HeadlessLayout,
            &down(Point::new(100.0, 100.0), PointerButton::Middle, Modifiers::NONE),
            Target::Background,
        );
        let cmds = engine.handle(
            &graph,
            &HeadlessLayout,
            &mv(Point::new(120.0, 105.0)),
            Target::Background,
        );

        let expected = Viewport {
            x: 30.0,
            y: 15.0,
            zoom: 1.0,
        };
        assert_eq!(cmds.as_slice(), &[Command::ViewportChanged(expected)]);
        assert_eq!(engine.viewport(), expected);

        // Release: no further commands, viewport already applied.
        let cmds = engine.handle(
            &graph,
            &HeadlessLayout,
            &up(Point::new(120.0, 105.0)),
            Target::Background,
        );
        assert!(cmds.is_empty());
    }

    #[test]
    fn space_primary_pans_and_key_release_ends_it() {
        let graph = FlowGraph::new();
        let mut engine = CanvasEngine::new(Point::new(0.0, 0.0));
        let space = Modifiers {
            space: true,
            ..Modifiers::NONE
        };

        engine.handle(
            &graph,
            &HeadlessLayout,
            &down(Point::new(0.0, 0.0), PointerButton::Primary, space),
            Target::Background,
        );
        assert!(engine.session().is_some_and(|s| s.is_pan()));

        engine.handle(
            &graph,
            &HeadlessLayout,
            &InputEvent::PanKeyReleased,
            Target::Background,
        );
        assert!(engine.session().is_none());
    }

    #[test]
    fn pointer_leaving_window_ends_pan_only() {
        let graph = graph_with(&[("sticky", gen_kind(), 0.0, 0.0)]);
        let mut engine = CanvasEngine::new(Point::new(0.0, 0.0));

        engine.handle(
            &graph,
            &HeadlessLayout,
            &down(Point::new(0.0, 0.0), PointerButton::Primary, Modifiers::NONE),
            Target::Node(NodeId::intern("sticky")),
        );
        engine.handle(
            &graph,
            &HeadlessLayout,
            &InputEvent::PointerLeft,
            Target::Background,
        );
        assert!(
            engine.session().is_some(),
            "node drag survives the pointer leaving"
        );
    }

    #[test]
    fn connection_to_generator_completes() {
        let graph = graph_with(&[
            ("conn_a", gen_kind(), 0.0, 0.0),
            ("conn_b", gen_kind(), 600.0, 0.0),
        ]);
        let mut engine = CanvasEngine::new(Point::new(0.0, 0.0));
        let a = NodeId::intern("conn_a");
        let b = NodeId::intern("conn_b");

        engine.handle(
            &graph,
            &HeadlessLayout,
            &down(Point::new(330.0, 28.0), PointerButton::Primary, Modifiers::NONE),
            Target::OutputPort(a),
        );
        assert!(engine.session().is_some_and(|s| s.is_connect()));
        assert!(engine.preview_curve(&graph, &HeadlessLayout).is_some());

        // Release inside B's footprint.
        let cmds = engine.handle(
            &graph,
            &HeadlessLayout,
            &up(Point::new(650.0, 40.0)),
            Target::Background,
        );
        assert_eq!(cmds.as_slice(), &[Command::ConnectNodes { source: a, target: b }]);
        assert!(engine.session().is_none());
    }

    #[test]
    fn connection_to_input_notifies_and_cancels() {
        let graph = graph_with(&[
            ("gen_src", gen_kind(), 0.0, 0.0),
            ("img_dst", input_kind(), 600.0, 0.0),
        ]);
        let mut engine = CanvasEngine::new(Point::new(0.0, 0.0));

        engine.handle(
            &graph,
            &HeadlessLayout,
            &down(Point::new(330.0, 28.0), PointerButton::Primary, Modifiers::NONE),
            Target::OutputPort(NodeId::intern("gen_src")),
        );
        let cmds = engine.handle(
            &graph,
            &HeadlessLayout,
            &up(Point::new(650.0, 40.0)),
            Target::Background,
        );

        assert_eq!(cmds.len(), 1);
        match &cmds[0] {
            Command::Notify { severity, .. } => assert_eq!(*severity, Severity::Warning),
            other => panic!("expected Notify, got {other:?}"),
        }
    }

    #[test]
    fn connection_to_self_cancels_silently() {
        let graph = graph_with(&[("loopy", gen_kind(), 0.0, 0.0)]);
        let mut engine = CanvasEngine::new(Point::new(0.0, 0.0));
        let id = NodeId::intern("loopy");

        engine.handle(
            &graph,
            &HeadlessLayout,
            &down(Point::new(330.0, 28.0), PointerButton::Primary, Modifiers::NONE),
            Target::OutputPort(id),
        );
        // Drop back onto the source node itself.
        let cmds = engine.handle(
            &graph,
            &HeadlessLayout,
            &up(Point::new(10.0, 10.0)),
            Target::Background,
        );
        assert!(cmds.is_empty());
    }

    #[test]
    fn connection_to_empty_canvas_cancels_silently() {
        let graph = graph_with(&[("lonely", gen_kind(), 0.0, 0.0)]);
        let mut engine = CanvasEngine::new(Point::new(0.0, 0.0));

        engine.handle(
            &graph,
            &HeadlessLayout,
            &down(Point::new(330.0, 28.0), PointerButton::Primary, Modifiers::NONE),
            Target::OutputPort(NodeId::intern("lonely")),
        );
        let cmds = engine.handle(
            &graph,
            &HeadlessLayout,
            &up(Point::new(5000.0, 5000.0)),
            Target::Background,
        );
        assert!(cmds.is_empty());
        assert!(engine.session().is_none());
    }

    #[test]
    fn connection_cursor_tracks_moves_in_canvas_space() {
        let graph = graph_with(&[("tracker", gen_kind(), 0.0, 0.0)]);
        let mut engine = CanvasEngine::new(Point::new(0.0, 0.0));
        engine.set_viewport(Viewport {
            x: 100.0,
            y: 0.0,
            zoom: 2.0,
        });

        engine.handle(
            &graph,
            &HeadlessLayout,
            &down(Point::new(0.0, 0.0), PointerButton::Primary, Modifiers::NONE),
            Target::OutputPort(NodeId::intern("tracker")),
        );
        engine.handle(
            &graph,
            &HeadlessLayout,
            &mv(Point::new(300.0, 60.0)),
            Target::Background,
        );

        match engine.session() {
            Some(DragSession::Connect { cursor, .. }) => {
                assert_eq!(*cursor, Point::new(100.0, 30.0));
            }
            other => panic!("expected Connect session, got {other:?}"),
        }

        let curve = engine.preview_curve(&graph, &HeadlessLayout).unwrap();
        assert_eq!(curve.p3, Point::new(100.0, 30.0));
    }

    #[test]
    fn new_session_terminates_previous_one() {
        let graph = graph_with(&[
            ("first", gen_kind(), 0.0, 0.0),
            ("second", gen_kind(), 600.0, 0.0),
        ]);
        let mut engine = CanvasEngine::new(Point::new(0.0, 0.0));
        let first = NodeId::intern("first");
        let second = NodeId::intern("second");

        engine.handle(
            &graph,
            &HeadlessLayout,
            &down(Point::new(0.0, 0.0), PointerButton::Primary, Modifiers::NONE),
            Target::Node(first),
        );
        engine.handle(
            &graph,
            &HeadlessLayout,
            &mv(Point::new(40.0, 0.0)),
            Target::Background,
        );

        // A second pointer-down (e.g. a missed pointer-up) must first
        // run the old drag's release logic — committing the move —
        // before the new session begins.
        let cmds = engine.handle(
            &graph,
            &HeadlessLayout,
            &down(Point::new(40.0, 0.0), PointerButton::Primary, Modifiers::NONE),
            Target::Node(second),
        );
        assert_eq!(
            cmds.as_slice(),
            &[Command::CommitNodeMove {
                id: first,
                position: Point::new(40.0, 0.0)
            }]
        );
        match engine.session() {
            Some(DragSession::NodeDrag { node, .. }) => assert_eq!(*node, second),
            other => panic!("expected NodeDrag on second, got {other:?}"),
        }
    }

    #[test]
    fn zoom_event_emits_viewport_change_once() {
        let graph = FlowGraph::new();
        let mut engine = CanvasEngine::new(Point::new(0.0, 0.0));

        let cmds = engine.handle(
            &graph,
            &HeadlessLayout,
            &InputEvent::Zoom {
                anchor: Point::new(400.0, 300.0),
                factor: 1.1,
            },
            Target::Background,
        );
        assert_eq!(cmds.len(), 1);
        assert!((engine.viewport().zoom - 1.1).abs() < 1e-4);

        // Clamped no-op zoom → no command.
        engine.set_viewport(Viewport {
            x: 0.0,
            y: 0.0,
            zoom: MAX_ZOOM,
        });
        let cmds = engine.handle(
            &graph,
            &HeadlessLayout,
            &InputEvent::Zoom {
                anchor: Point::new(400.0, 300.0),
                factor: 1.5,
            },
            Target::Background,
        );
        assert!(cmds.is_empty());
    }

    #[test]
    fn context_menu_converts_to_canvas_space() {
        let graph = FlowGraph::new();
        let mut engine = CanvasEngine::new(Point::new(20.0, 10.0));
        engine.set_viewport(Viewport {
            x: 60.0,
            y: 0.0,
            zoom: 2.0,
        });

        let screen = Point::new(280.0, 110.0);
        let cmds = engine.handle(
            &graph,
            &HeadlessLayout,
            &InputEvent::ContextMenu { pos: screen },
            Target::Background,
        );
        assert_eq!(
            cmds.as_slice(),
            &[Command::OpenContextMenu {
                canvas: Point::new(100.0, 50.0),
                screen,
            }]
        );

        // Over a node: nothing — the node's own menu handles it.
        let cmds = engine.handle(
            &graph,
            &HeadlessLayout,
            &InputEvent::ContextMenu { pos: screen },
            Target::Node(NodeId::intern("whatever")),
        );
        assert!(cmds.is_empty());
    }

    #[test]
    fn control_surfaces_start_nothing() {
        let graph = graph_with(&[("ctl", gen_kind(), 0.0, 0.0)]);
        let mut engine = CanvasEngine::new(Point::new(0.0, 0.0));

        let cmds = engine.handle(
            &graph,
            &HeadlessLayout,
            &down(Point::new(10.0, 10.0), PointerButton::Primary, Modifiers::NONE),
            Target::Control,
        );
        assert!(cmds.is_empty());
        assert!(engine.session().is_none());
    }
}
