//! WASM bridge for Genflow — exposes the canvas engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web` and loaded by the
//! editor webview. The bridge owns the flow graph, the interaction
//! engine, and the viewport saver; the JS host forwards raw pointer
//! events, reports rendered port positions, and interprets the JSON
//! command lists returned by the handlers.

use gf_core::curve::EdgeCurve;
use gf_core::hit::find_node_at;
use gf_core::id::{EdgeId, NodeId};
use gf_core::model::{CanvasNode, FlowGraph, GeneratorStatus, NodeKind, Point, Viewport};
use gf_core::ports::{resolve_port, LayoutQuery, PortKind};
use gf_core::viewport::{canvas_to_screen, screen_to_canvas};
use gf_engine::{
    CanvasEngine, Command, InputEvent, Modifiers, PointerButton, Severity, Target, ViewportSaver,
};
use serde_json::json;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

/// Screen-space radius around a port center that counts as a port hit.
const PORT_HIT_RADIUS: f32 = 12.0;

// ─── Reported layout ─────────────────────────────────────────────────────

/// Port positions measured by the rendered DOM and pushed in by the
/// host. Nodes that have not reported yet fall back to the static
/// formula inside `resolve_port`.
#[derive(Debug, Default)]
struct ReportedLayout {
    ports: HashMap<(NodeId, PortKind), Point>,
}

impl LayoutQuery for ReportedLayout {
    fn port_screen_position(&self, node: NodeId, kind: PortKind) -> Option<Point> {
        self.ports.get(&(node, kind)).copied()
    }
}

// ─── Canvas controller ───────────────────────────────────────────────────

/// The main WASM-facing canvas controller.
#[wasm_bindgen]
pub struct GraphCanvas {
    graph: FlowGraph,
    engine: CanvasEngine,
    saver: ViewportSaver,
    layout: ReportedLayout,
    /// Host clock, milliseconds. Advanced by `tick`; viewport changes
    /// between ticks are stamped with the last seen time, which is
    /// frame-accurate for a host that ticks every frame.
    clock_ms: f64,
}

#[wasm_bindgen]
impl GraphCanvas {
    /// Create a controller for a canvas whose container sits at the
    /// given screen origin.
    #[wasm_bindgen(constructor)]
    pub fn new(origin_x: f32, origin_y: f32) -> Self {
        console_error_panic_hook_setup();
        Self {
            graph: FlowGraph::new(),
            engine: CanvasEngine::new(Point::new(origin_x, origin_y)),
            saver: ViewportSaver::new(),
            layout: ReportedLayout::default(),
            clock_ms: 0.0,
        }
    }

    /// Update the container origin after layout shifts.
    pub fn set_origin(&mut self, x: f32, y: f32) {
        self.engine.set_origin(Point::new(x, y));
    }

    /// Restore a persisted viewport. Zoom is clamped into range.
    pub fn set_viewport(&mut self, x: f32, y: f32, zoom: f32) {
        self.engine.set_viewport(Viewport { x, y, zoom });
    }

    /// Current viewport as `{x, y, zoom}` JSON.
    pub fn viewport_json(&self) -> String {
        let vp = self.engine.viewport();
        json!({ "x": vp.x, "y": vp.y, "zoom": vp.zoom }).to_string()
    }

    // ─── Graph mutations ─────────────────────────────────────────────────

    pub fn add_input_node(&mut self, id: &str, x: f32, y: f32, has_image: bool) {
        self.graph.add_node(CanvasNode::new(
            NodeId::intern(id),
            NodeKind::Input { has_image },
            Point::new(x, y),
        ));
    }

    pub fn add_generator_node(&mut self, id: &str, x: f32, y: f32) {
        self.graph.add_node(CanvasNode::new(
            NodeId::intern(id),
            NodeKind::Generator {
                status: GeneratorStatus::Idle,
            },
            Point::new(x, y),
        ));
    }

    /// Returns `false` if the node is unknown or not an input.
    pub fn set_input_image(&mut self, id: &str, has_image: bool) -> bool {
        match self.graph.node_mut(NodeId::intern(id)) {
            Some(node) if node.kind.is_input() => {
                node.kind = NodeKind::Input { has_image };
                true
            }
            _ => false,
        }
    }

    /// Status is one of `idle`, `generating`, `done`.
    pub fn set_generator_status(&mut self, id: &str, status: &str) -> bool {
        let status = match status {
            "idle" => GeneratorStatus::Idle,
            "generating" => GeneratorStatus::Generating,
            "done" => GeneratorStatus::Done,
            _ => return false,
        };
        match self.graph.node_mut(NodeId::intern(id)) {
            Some(node) if !node.kind.is_input() => {
                node.kind = NodeKind::Generator { status };
                true
            }
            _ => false,
        }
    }

    pub fn remove_node(&mut self, id: &str) -> bool {
        let id = NodeId::intern(id);
        self.layout.ports.retain(|(node, _), _| *node != id);
        self.graph.remove_node(id).is_some()
    }

    /// Create an edge directly (e.g. when loading a saved document).
    /// Returns `{"ok": true, "edge": id}` or `{"ok": false, "error": msg}`.
    pub fn connect(&mut self, source: &str, target: &str) -> String {
        match self
            .graph
            .connect(NodeId::intern(source), NodeId::intern(target))
        {
            Ok(edge) => json!({ "ok": true, "edge": edge.as_str() }).to_string(),
            Err(err) => json!({ "ok": false, "error": err.to_string() }).to_string(),
        }
    }

    pub fn disconnect(&mut self, edge: &str) -> bool {
        self.graph.disconnect(EdgeId::intern(edge))
    }

    // ─── Rendered layout reports ─────────────────────────────────────────

    /// Report a port's measured screen position. `kind` is `input` or
    /// `output`.
    pub fn report_port_position(&mut self, node: &str, kind: &str, x: f32, y: f32) {
        let Some(kind) = parse_port_kind(kind) else {
            return;
        };
        self.layout
            .ports
            .insert((NodeId::intern(node), kind), Point::new(x, y));
    }

    /// Drop a node's measured ports (e.g. when its card re-renders).
    pub fn clear_port_positions(&mut self, node: &str) {
        let id = NodeId::intern(node);
        self.layout.ports.retain(|(n, _), _| *n != id);
    }

    // ─── Pointer events ──────────────────────────────────────────────────

    /// Handle pointer down. `button`: 0 = primary, 1 = middle,
    /// 2 = secondary. Returns a JSON command list.
    #[allow(clippy::too_many_arguments)]
    pub fn pointer_down(
        &mut self,
        x: f32,
        y: f32,
        button: u8,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
        space: bool,
    ) -> String {
        let pos = Point::new(x, y);
        let target = self.classify(pos);
        let event = InputEvent::PointerDown {
            pos,
            button: match button {
                1 => PointerButton::Middle,
                2 => PointerButton::Secondary,
                _ => PointerButton::Primary,
            },
            modifiers: Modifiers {
                shift,
                ctrl,
                alt,
                meta,
                space,
            },
        };
        self.dispatch(&event, target)
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> String {
        let event = InputEvent::PointerMove {
            pos: Point::new(x, y),
            modifiers: Modifiers::NONE,
        };
        self.dispatch(&event, Target::Background)
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) -> String {
        let event = InputEvent::PointerUp {
            pos: Point::new(x, y),
            modifiers: Modifiers::NONE,
        };
        self.dispatch(&event, Target::Background)
    }

    /// Anchored zoom; the host maps wheel deltas to a factor.
    pub fn zoom(&mut self, anchor_x: f32, anchor_y: f32, factor: f32) -> String {
        let event = InputEvent::Zoom {
            anchor: Point::new(anchor_x, anchor_y),
            factor,
        };
        self.dispatch(&event, Target::Background)
    }

    pub fn context_menu(&mut self, x: f32, y: f32) -> String {
        let pos = Point::new(x, y);
        let target = self.classify(pos);
        self.dispatch(&InputEvent::ContextMenu { pos }, target)
    }

    pub fn pan_key_released(&mut self) -> String {
        self.dispatch(&InputEvent::PanKeyReleased, Target::Background)
    }

    pub fn pointer_left(&mut self) -> String {
        self.dispatch(&InputEvent::PointerLeft, Target::Background)
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Advance the clock and poll the debounced saver. Returns the
    /// viewport JSON to persist, or `None` while input is still hot.
    pub fn tick(&mut self, now_ms: f64) -> Option<String> {
        self.clock_ms = now_ms;
        self.saver
            .poll(now_ms)
            .map(|vp| json!({ "x": vp.x, "y": vp.y, "zoom": vp.zoom }).to_string())
    }

    /// Force out any pending viewport save (call on unmount).
    pub fn flush_viewport(&mut self) -> Option<String> {
        self.saver
            .flush()
            .map(|vp| json!({ "x": vp.x, "y": vp.y, "zoom": vp.zoom }).to_string())
    }

    // ─── Geometry queries ────────────────────────────────────────────────

    /// All edges with their SVG path data, canvas space:
    /// `[{id, source, target, d}]`.
    pub fn edge_paths(&self) -> String {
        let vp = self.engine.viewport();
        let origin = self.origin();
        let paths: Vec<serde_json::Value> = self
            .graph
            .edges()
            .filter_map(|edge| {
                let source = self.graph.node(edge.source)?;
                let target = self.graph.node(edge.target)?;
                let from = resolve_port(source, PortKind::Output, &self.layout, &vp, origin);
                let to = resolve_port(target, PortKind::Input, &self.layout, &vp, origin);
                Some(json!({
                    "id": edge.id.as_str(),
                    "source": edge.source.as_str(),
                    "target": edge.target.as_str(),
                    "d": EdgeCurve::between(from, to).to_svg(),
                }))
            })
            .collect();
        serde_json::Value::Array(paths).to_string()
    }

    /// SVG path data for the provisional connection curve, if a
    /// connection drag is active.
    pub fn preview_path(&self) -> Option<String> {
        self.engine
            .preview_curve(&self.graph, &self.layout)
            .map(|curve| curve.to_svg())
    }

    /// ID of the node under a screen position, or `None`.
    pub fn node_at(&self, x: f32, y: f32) -> Option<String> {
        let canvas = screen_to_canvas(Point::new(x, y), &self.engine.viewport(), self.origin());
        find_node_at(canvas, self.graph.nodes()).map(|id| id.as_str().to_string())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl GraphCanvas {
    fn origin(&self) -> Point {
        self.engine.origin()
    }

    /// Classify what a screen position is over, the way the rendered
    /// host would. Output ports first — their hit circle extends past
    /// the node footprint — then node bodies, then background.
    fn classify(&self, screen: Point) -> Target {
        let vp = self.engine.viewport();
        let origin = self.origin();
        for node in self.graph.nodes() {
            let port_canvas = resolve_port(node, PortKind::Output, &self.layout, &vp, origin);
            let port_screen = canvas_to_screen(port_canvas, &vp, origin);
            let dx = screen.x - port_screen.x;
            let dy = screen.y - port_screen.y;
            if dx * dx + dy * dy <= PORT_HIT_RADIUS * PORT_HIT_RADIUS {
                return Target::OutputPort(node.id);
            }
        }
        let canvas = screen_to_canvas(screen, &vp, origin);
        match find_node_at(canvas, self.graph.nodes()) {
            Some(id) => Target::Node(id),
            None => Target::Background,
        }
    }

    /// Run one event through the engine and serialize the resulting
    /// commands for the JS host. Viewport changes are additionally fed
    /// to the debounced saver here.
    fn dispatch(&mut self, event: &InputEvent, target: Target) -> String {
        let commands = self.engine.handle(&self.graph, &self.layout, event, target);
        for command in &commands {
            if let Command::ViewportChanged(vp) = command {
                self.saver.note(*vp, self.clock_ms);
            }
        }
        let list: Vec<serde_json::Value> = commands.iter().map(command_json).collect();
        serde_json::Value::Array(list).to_string()
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn parse_port_kind(kind: &str) -> Option<PortKind> {
    match kind {
        "input" => Some(PortKind::Input),
        "output" => Some(PortKind::Output),
        _ => None,
    }
}

fn command_json(command: &Command) -> serde_json::Value {
    match command {
        Command::ViewportChanged(vp) => json!({
            "type": "viewport",
            "x": vp.x, "y": vp.y, "zoom": vp.zoom,
        }),
        Command::MoveNode { id, position } => json!({
            "type": "move_node",
            "id": id.as_str(),
            "x": position.x, "y": position.y,
        }),
        Command::CommitNodeMove { id, position } => json!({
            "type": "commit_node_move",
            "id": id.as_str(),
            "x": position.x, "y": position.y,
        }),
        Command::ConnectNodes { source, target } => json!({
            "type": "connect",
            "source": source.as_str(),
            "target": target.as_str(),
        }),
        Command::Notify { message, severity } => json!({
            "type": "notify",
            "message": message,
            "severity": match severity {
                Severity::Info => "info",
                Severity::Warning => "warning",
            },
        }),
        Command::OpenContextMenu { canvas, screen } => json!({
            "type": "context_menu",
            "canvas": { "x": canvas.x, "y": canvas.y },
            "screen": { "x": screen.x, "y": screen.y },
        }),
    }
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Genflow WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
