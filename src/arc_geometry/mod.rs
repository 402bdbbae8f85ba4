//! ArcGeometry - circular arc through three control points
//!
//! Backs the radial slider track: the control lays out a line start, a line
//! end and an apex, and maps touch positions to a 0..range value along the
//! resulting arc. Pure math; the rendering layer consumes the snapshots.
//!
//! Collinear control points admit no circle and come back as
//! `Error::DegenerateGeometry` - the control layer skips that layout pass.

use crate::error::{Error, Result};

/// Determinant threshold below which the three points are treated as
/// collinear
const DEGENERACY_EPSILON: f64 = 1e-9;

/// 2D point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Circular arc, immutable per layout pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub clockwise: bool,
}

impl Arc {
    /// The unique circle through three non-collinear points, cut to the arc
    /// from `start` to `end` passing through `apex`.
    ///
    /// The center is the intersection of the perpendicular bisectors of the
    /// (start, apex) and (apex, end) chords, found by solving the 2x2
    /// linear system the bisectors induce.
    pub fn through_points(start: Point, end: Point, apex: Point) -> Result<Self> {
        let a1 = apex.x - start.x;
        let b1 = apex.y - start.y;
        let c1 = (apex.x * apex.x + apex.y * apex.y - start.x * start.x - start.y * start.y) / 2.0;

        let a2 = end.x - apex.x;
        let b2 = end.y - apex.y;
        let c2 = (end.x * end.x + end.y * end.y - apex.x * apex.x - apex.y * apex.y) / 2.0;

        let det = a1 * b2 - a2 * b1;
        if det.abs() < DEGENERACY_EPSILON {
            return Err(Error::DegenerateGeometry(format!(
                "control points are collinear (det = {:e})",
                det
            )));
        }

        let center = Point::new((c1 * b2 - c2 * b1) / det, (a1 * c2 - a2 * c1) / det);
        let radius = center.distance(start);

        let start_angle = (start.y - center.y).atan2(start.x - center.x);
        let end_angle = (end.y - center.y).atan2(end.x - center.x);

        // orientation from the turn at the apex
        let cross = a1 * (end.y - apex.y) - b1 * (end.x - apex.x);

        Ok(Self {
            center,
            radius,
            start_angle,
            end_angle,
            clockwise: cross < 0.0,
        })
    }

    /// Angle of an arbitrary point around the center, clamped into the
    /// arc's angular range.
    ///
    /// When both bounds are negative and the raw angle comes out positive,
    /// the raw angle is negated before clamping. Keeps touches near the
    /// positive x-axis on the track for slider layouts living entirely
    /// below their center; not a general wraparound solution.
    pub fn angle_for_point(&self, point: Point) -> f64 {
        let mut angle = (point.y - self.center.y).atan2(point.x - self.center.x);

        if self.start_angle < 0.0 && self.end_angle < 0.0 && angle > 0.0 {
            angle = -angle;
        }

        let (lo, hi) = if self.start_angle <= self.end_angle {
            (self.start_angle, self.end_angle)
        } else {
            (self.end_angle, self.start_angle)
        };
        angle.clamp(lo, hi)
    }

    /// Point on the circle at `angle`
    pub fn point_for_angle(&self, angle: f64) -> Point {
        Point::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    /// Travelled distance from the start of the arc to `angle`
    pub fn length_for_angle(&self, angle: f64) -> f64 {
        self.radius * (angle - self.start_angle).abs()
    }

    /// Full arc length
    pub fn length(&self) -> f64 {
        self.length_for_angle(self.end_angle)
    }

    /// Point at a travelled distance from the start, clamped to the arc
    pub fn point_for_length(&self, length: f64) -> Point {
        let length = length.clamp(0.0, self.length());
        let sweep = length / self.radius;
        let direction = if self.end_angle >= self.start_angle {
            1.0
        } else {
            -1.0
        };
        self.point_for_angle(self.start_angle + direction * sweep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn reference_arc() -> Arc {
        Arc::through_points(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(50.0, 50.0),
        )
        .unwrap()
    }

    #[test]
    fn center_is_equidistant_from_all_three_points() {
        let arc = reference_arc();
        let d_start = arc.center.distance(Point::new(0.0, 0.0));
        let d_end = arc.center.distance(Point::new(100.0, 0.0));
        let d_apex = arc.center.distance(Point::new(50.0, 50.0));

        assert!((d_start - d_end).abs() < EPS);
        assert!((d_start - d_apex).abs() < EPS);
        assert!((arc.radius - d_start).abs() < EPS);
    }

    #[test]
    fn symmetric_points_give_the_expected_circle() {
        let arc = reference_arc();
        assert!((arc.center.x - 50.0).abs() < EPS);
        assert!(arc.center.y.abs() < EPS);
        assert!((arc.radius - 50.0).abs() < EPS);
    }

    #[test]
    fn near_collinear_points_are_a_degenerate_error() {
        let result = Arc::through_points(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(50.0, 1e-12),
        );
        assert!(matches!(result, Err(Error::DegenerateGeometry(_))));
    }

    #[test]
    fn exactly_collinear_points_are_a_degenerate_error() {
        let result = Arc::through_points(
            Point::new(0.0, 0.0),
            Point::new(50.0, 50.0),
            Point::new(25.0, 25.0),
        );
        assert!(matches!(result, Err(Error::DegenerateGeometry(_))));
    }

    #[test]
    fn full_length_matches_end_angle() {
        let arc = reference_arc();
        assert!((arc.length_for_angle(arc.end_angle) - arc.length()).abs() < EPS);
        assert!((arc.length_for_angle(arc.start_angle)).abs() < EPS);
    }

    #[test]
    fn angle_and_point_roundtrip_along_the_arc() {
        let arc = reference_arc();
        let mid_angle = (arc.start_angle + arc.end_angle) / 2.0;
        let point = arc.point_for_angle(mid_angle);
        assert!((arc.angle_for_point(point) - mid_angle).abs() < EPS);
    }

    #[test]
    fn length_roundtrips_through_point_for_length() {
        let arc = reference_arc();
        for fraction in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let length = arc.length() * fraction;
            let point = arc.point_for_length(length);
            let angle = arc.angle_for_point(point);
            assert!((arc.length_for_angle(angle) - length).abs() < 1e-6);
        }
    }

    #[test]
    fn angle_for_point_clamps_outside_the_range() {
        let arc = reference_arc();
        // a point past the end of the track clamps to a bound
        let outside = Point::new(arc.center.x + arc.radius, arc.center.y + 1.0);
        let angle = arc.angle_for_point(outside);
        let (lo, hi) = if arc.start_angle <= arc.end_angle {
            (arc.start_angle, arc.end_angle)
        } else {
            (arc.end_angle, arc.start_angle)
        };
        assert!(angle >= lo && angle <= hi);
    }

    #[test]
    fn negative_bounds_negate_a_positive_raw_angle() {
        // track living below its center: both angular bounds negative
        let arc = Arc::through_points(
            Point::new(0.0, -30.0),
            Point::new(80.0, -10.0),
            Point::new(40.0, -50.0),
        )
        .unwrap();
        assert!(arc.start_angle < 0.0 && arc.end_angle < 0.0);

        // a touch straight above the center has a positive raw angle; it is
        // negated onto the track instead of snapping to a bound
        let above = Point::new(arc.center.x, arc.center.y + arc.radius);
        let angle = arc.angle_for_point(above);
        let (lo, hi) = (arc.start_angle.min(arc.end_angle), arc.start_angle.max(arc.end_angle));
        assert!(angle < 0.0);
        assert!(angle >= lo && angle <= hi);
    }
}
