//! Point-to-segment distance on the local plane.
//!
//! All three points are projected around the segment's midpoint latitude,
//! with the segment start as origin. The closest point is found by clamping
//! the scalar projection onto the segment to `[0, 1]`.
//!
//! Acceptable for buffers up to about a kilometer at mid-latitudes. No
//! accuracy guarantee near the poles or for segments spanning a wide range of
//! longitude.

use geo::Point;

use crate::projection::LocalScale;

/// Squared distance in meters² from `p` to the segment `v`–`w`.
pub fn distance_squared(p: Point, v: Point, w: Point) -> f64 {
    let scale = LocalScale::at((v.y() + w.y()) / 2.0);

    // v sits at the origin
    let p = scale.project(v, p);
    let w = scale.project(v, w);

    let len_2 = w.x * w.x + w.y * w.y;

    if len_2 == 0.0 {
        // Segment is actually a point
        return p.x * p.x + p.y * p.y;
    }

    let t = ((p.x * w.x + p.y * w.y) / len_2).clamp(0.0, 1.0);

    let dx = p.x - t * w.x;
    let dy = p.y - t * w.y;

    dx * dx + dy * dy
}

/// Distance in meters from `p` to the segment `v`–`w`.
pub fn distance_m(p: Point, v: Point, w: Point) -> f64 {
    distance_squared(p, v, w).sqrt()
}
