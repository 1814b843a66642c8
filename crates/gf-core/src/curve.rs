//! Edge path geometry.
//!
//! Connections are drawn as horizontal-tangent cubic beziers between
//! an output port and an input port (or the live pointer, for the
//! provisional curve during a connection drag). Pure geometry: no
//! dependency on node identity or graph state.

use crate::model::Point;
use kurbo::{BezPath, CubicBez};

/// Minimum horizontal control-point offset, canvas units. Keeps short
/// edges visibly curved instead of collapsing into a straight line.
pub const MIN_CONTROL_OFFSET: f32 = 50.0;

/// Fraction of the horizontal endpoint distance used as control offset.
pub const CONTROL_OFFSET_RATIO: f32 = 0.4;

/// A cubic bezier from an output port to an input port.
///
/// Endpoints are exactly the given points — no rounding or snapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCurve {
    pub p0: Point,
    pub c1: Point,
    pub c2: Point,
    pub p3: Point,
}

/// Control offset for a pair of endpoints: `max(50, 0.4·|Δx|)`.
pub fn control_offset(p1: Point, p2: Point) -> f32 {
    (CONTROL_OFFSET_RATIO * (p2.x - p1.x).abs()).max(MIN_CONTROL_OFFSET)
}

impl EdgeCurve {
    /// Build the edge curve between two canvas-space points.
    pub fn between(p1: Point, p2: Point) -> Self {
        let offset = control_offset(p1, p2);
        Self {
            p0: p1,
            c1: Point::new(p1.x + offset, p1.y),
            c2: Point::new(p2.x - offset, p2.y),
            p3: p2,
        }
    }

    fn to_cubic(self) -> CubicBez {
        CubicBez::new(
            (self.p0.x as f64, self.p0.y as f64),
            (self.c1.x as f64, self.c1.y as f64),
            (self.c2.x as f64, self.c2.y as f64),
            (self.p3.x as f64, self.p3.y as f64),
        )
    }

    /// Convert to a drawable `kurbo` path.
    pub fn to_path(self) -> BezPath {
        BezPath::from_path_segments([kurbo::PathSeg::Cubic(self.to_cubic())].into_iter())
    }

    /// SVG path data (`M … C …`), for hosts that draw edges as
    /// `<path>` elements.
    pub fn to_svg(self) -> String {
        self.to_path().to_svg()
    }
}
