//! Local planar projection for short geographic distances.
//!
//! Scale factors come from the truncated Fourier series for the length of a
//! degree on the WGS84 ellipsoid, so they track the Earth's oblateness rather
//! than assuming a sphere. Only valid over a small neighborhood (tens of km)
//! around the reference latitude; route code re-derives the scale per segment.

use geo::{Coord, Point};

/// Meters per degree at a reference latitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalScale {
    pub meters_per_deg_lat: f64,
    pub meters_per_deg_lng: f64,
}

impl LocalScale {
    pub fn at(lat_deg: f64) -> Self {
        let phi = lat_deg.to_radians();

        let meters_per_deg_lat = 111_132.92 - 559.82 * (2.0 * phi).cos()
            + 1.175 * (4.0 * phi).cos()
            - 0.0023 * (6.0 * phi).cos();
        let meters_per_deg_lng =
            111_412.84 * phi.cos() - 93.5 * (3.0 * phi).cos() + 0.118 * (5.0 * phi).cos();

        Self {
            meters_per_deg_lat,
            meters_per_deg_lng,
        }
    }

    /// Planar offset of `point` from `origin` in meters (x east, y north).
    pub fn project(&self, origin: Point, point: Point) -> Coord {
        Coord {
            x: (point.x() - origin.x()) * self.meters_per_deg_lng,
            y: (point.y() - origin.y()) * self.meters_per_deg_lat,
        }
    }
}
