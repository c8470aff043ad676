//! Route geometry as handed over by a routing provider.

use geo::{Coord, LineString, Point};

use crate::segment;

/// Ordered points describing the shape of one route. Coordinates follow `geo`
/// conventions: `x` is longitude, `y` is latitude.
///
/// Fewer than two points is representable (providers occasionally return a
/// single point) but such a polyline has no segments, so nothing is ever
/// near it.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutePolyline(LineString<f64>);

impl Default for RoutePolyline {
    fn default() -> Self {
        Self(LineString::new(Vec::new()))
    }
}

impl RoutePolyline {
    pub fn new(line: LineString<f64>) -> Self {
        Self(line)
    }

    /// Build from `(lat, lng)` pairs, the order routing APIs usually emit.
    pub fn from_lat_lng(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self(
            points
                .into_iter()
                .map(|(lat, lng)| Coord { x: lng, y: lat })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.0.is_empty()
    }

    /// At least one segment to measure against.
    pub fn is_routable(&self) -> bool {
        self.len() >= 2
    }

    pub fn line_string(&self) -> &LineString<f64> {
        &self.0
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.0.points()
    }

    /// Consecutive point pairs, in route order.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.0
            .lines()
            .map(|line| (Point::from(line.start), Point::from(line.end)))
    }

    /// Exact minimum distance in meters over every segment, without any early
    /// exit. `None` when there are no segments.
    pub fn min_distance_m(&self, point: Point) -> Option<f64> {
        self.segments()
            .map(|(v, w)| segment::distance_m(point, v, w))
            .min_by(f64::total_cmp)
    }
}

impl From<LineString<f64>> for RoutePolyline {
    fn from(line: LineString<f64>) -> Self {
        Self::new(line)
    }
}
