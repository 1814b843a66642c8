pub mod curve;
pub mod hit;
pub mod id;
pub mod model;
pub mod ports;
pub mod viewport;

pub use curve::{control_offset, EdgeCurve};
pub use hit::find_node_at;
pub use id::{EdgeId, NodeId};
pub use model::*;
pub use ports::{resolve_port, HeadlessLayout, LayoutQuery, PortKind};
pub use viewport::{canvas_to_screen, screen_to_canvas, MAX_ZOOM, MIN_ZOOM};
