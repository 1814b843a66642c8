//! Input abstraction layer.
//!
//! Normalizes host pointer/wheel events into a unified [`InputEvent`]
//! enum consumed by the engine. Positions are screen-space; the engine
//! owns all screen→canvas conversion.

use gf_core::id::NodeId;
use gf_core::model::Point;

/// Which physical button a pointer event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    /// The pan modifier: held space turns a primary drag on the
    /// background into a canvas pan.
    pub space: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
        space: false,
    };
}

/// What surface a pointer-down landed on, classified by the host
/// (which knows its rendered element tree).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A node's draggable body.
    Node(NodeId),
    /// A node's output port — starts a connection drag.
    OutputPort(NodeId),
    /// Empty canvas.
    Background,
    /// An interactive control inside a node (text field, delete
    /// button, …). The engine leaves these alone.
    Control,
}

/// A normalized input event from the host.
#[derive(Debug, Clone)]
pub enum InputEvent {
    PointerDown {
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
    },
    PointerMove {
        pos: Point,
        modifiers: Modifiers,
    },
    PointerUp {
        pos: Point,
        modifiers: Modifiers,
    },
    /// Anchored zoom request (wheel or pinch). The host maps device
    /// deltas to a multiplicative factor.
    Zoom {
        anchor: Point,
        factor: f32,
    },
    /// Secondary-action request (right click, long press).
    ContextMenu {
        pos: Point,
    },
    /// The pan modifier key was released.
    PanKeyReleased,
    /// The pointer left the tracked window.
    PointerLeft,
}

impl InputEvent {
    /// Extract the screen position, if this event carries one.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { pos, .. }
            | Self::PointerMove { pos, .. }
            | Self::PointerUp { pos, .. }
            | Self::ContextMenu { pos } => Some(*pos),
            Self::Zoom { anchor, .. } => Some(*anchor),
            Self::PanKeyReleased | Self::PointerLeft => None,
        }
    }
}
