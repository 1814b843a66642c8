//! Viewport transform: screen ↔ canvas conversion, anchored zoom, pan.
//!
//! The in-memory [`Viewport`] value is the single source of truth for
//! the canvas transform — geometry is never re-derived from rendered
//! output. All functions here are pure and total: bad zoom requests
//! are clamped, never surfaced as errors.

use crate::model::{Point, Viewport};

/// Zoom clamp range. Chosen to keep node text legible at the low end
/// and avoid sub-pixel jitter at the high end.
pub const MIN_ZOOM: f32 = 0.25;
pub const MAX_ZOOM: f32 = 2.5;

/// Convert a screen-space point to canvas space.
///
/// `origin` is the canvas container's top-left corner in screen
/// coordinates (pointer events arrive window-relative).
pub fn screen_to_canvas(screen: Point, viewport: &Viewport, origin: Point) -> Point {
    Point {
        x: (screen.x - origin.x - viewport.x) / viewport.zoom,
        y: (screen.y - origin.y - viewport.y) / viewport.zoom,
    }
}

/// Convert a canvas-space point to screen space. Inverse of
/// [`screen_to_canvas`].
pub fn canvas_to_screen(canvas: Point, viewport: &Viewport, origin: Point) -> Point {
    Point {
        x: canvas.x * viewport.zoom + viewport.x + origin.x,
        y: canvas.y * viewport.zoom + viewport.y + origin.y,
    }
}

impl Viewport {
    /// Zoom by `factor`, keeping the canvas point under `anchor_screen`
    /// stationary on screen.
    ///
    /// The resulting zoom is clamped to `MIN_ZOOM ..= MAX_ZOOM`. If
    /// clamping makes this a no-op, the viewport is returned unchanged
    /// so downstream listeners see no redundant update.
    pub fn zoom_at(&self, anchor_screen: Point, factor: f32, origin: Point) -> Viewport {
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if new_zoom == self.zoom {
            return *self;
        }

        // The canvas point currently under the anchor must stay there:
        // anchor = canvas * zoom' + offset' + origin  ⇒  solve offset'.
        let anchor_canvas = screen_to_canvas(anchor_screen, self, origin);
        Viewport {
            x: anchor_screen.x - origin.x - anchor_canvas.x * new_zoom,
            y: anchor_screen.y - origin.y - anchor_canvas.y * new_zoom,
            zoom: new_zoom,
        }
    }

    /// Translate by a screen-space delta. Pan never changes zoom.
    pub fn panned(&self, delta_screen: Point) -> Viewport {
        Viewport {
            x: self.x + delta_screen.x,
            y: self.y + delta_screen.y,
            zoom: self.zoom,
        }
    }
}
