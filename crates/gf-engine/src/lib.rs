pub mod engine;
pub mod input;
pub mod persist;
pub mod session;

pub use engine::{CanvasEngine, Command, Commands, Severity};
pub use input::{InputEvent, Modifiers, PointerButton, Target};
pub use persist::{ViewportSaver, DEBOUNCE_MS};
pub use session::DragSession;
