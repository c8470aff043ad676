//! Route proximity classification.
//!
//! A position is on-route iff its minimum distance to any segment of the
//! route is within the buffer. Segments are scanned in order and the scan
//! stops at the first one that brings the running minimum within the buffer;
//! stopping early cannot change the verdict because the minimum only
//! decreases.

use geo::Point;

use crate::polyline::RoutePolyline;
use crate::segment;

/// Default buffer around a route, in meters.
pub const DEFAULT_BUFFER_M: f64 = 1000.0;

/// Verdict for a single position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Proximity {
    pub on_route: bool,
    /// Running minimum when the scan stopped. This is the true minimum unless
    /// the scan exited early, in which case it is already within the buffer.
    /// Infinite when the route has no segments.
    pub distance_m: f64,
}

impl Proximity {
    fn unreachable() -> Self {
        Self {
            on_route: false,
            distance_m: f64::INFINITY,
        }
    }
}

/// Verdicts for a batch of keyed positions, in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct ProximityResult<K> {
    entries: Vec<(K, Proximity)>,
}

impl<K> ProximityResult<K> {
    pub fn entries(&self) -> &[(K, Proximity)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn on_route_count(&self) -> usize {
        self.entries.iter().filter(|(_, p)| p.on_route).count()
    }

    pub fn on_route(&self) -> impl Iterator<Item = &K> {
        self.entries
            .iter()
            .filter(|(_, p)| p.on_route)
            .map(|(key, _)| key)
    }

    pub fn into_on_route(self) -> Vec<K> {
        self.entries
            .into_iter()
            .filter(|(_, p)| p.on_route)
            .map(|(key, _)| key)
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProximityFilter {
    buffer_m: f64,
}

impl Default for ProximityFilter {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_M)
    }
}

impl ProximityFilter {
    /// A negative or NaN buffer matches nothing. An infinite one matches every
    /// point of a routable polyline.
    pub fn new(buffer_m: f64) -> Self {
        Self { buffer_m }
    }

    pub fn buffer_m(&self) -> f64 {
        self.buffer_m
    }

    pub fn classify(&self, route: &RoutePolyline, point: Point) -> Proximity {
        if !route.is_routable() || self.buffer_m.is_nan() {
            return Proximity::unreachable();
        }

        let mut min = f64::INFINITY;
        for (v, w) in route.segments() {
            min = min.min(segment::distance_m(point, v, w));

            if min <= self.buffer_m {
                return Proximity {
                    on_route: true,
                    distance_m: min,
                };
            }
        }

        Proximity {
            on_route: false,
            distance_m: min,
        }
    }

    pub fn evaluate<K>(
        &self,
        route: &RoutePolyline,
        positions: impl IntoIterator<Item = (K, Point)>,
    ) -> ProximityResult<K> {
        ProximityResult {
            entries: positions
                .into_iter()
                .map(|(key, point)| (key, self.classify(route, point)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn north_route() -> RoutePolyline {
        RoutePolyline::from_lat_lng([(0.0, 0.0), (0.01, 0.0)])
    }

    fn zigzag_route() -> RoutePolyline {
        RoutePolyline::from_lat_lng([
            (51.500, -0.120),
            (51.505, -0.110),
            (51.500, -0.100),
            (51.505, -0.090),
            (51.510, -0.095),
            (51.515, -0.080),
        ])
    }

    #[test]
    fn test_review_near_route_is_on_route() {
        let filter = ProximityFilter::default();
        let verdict = filter.classify(&north_route(), Point::new(0.0005, 0.005));
        assert!(verdict.on_route);
        assert_abs_diff_eq!(verdict.distance_m, 55.66, epsilon = 0.01);
    }

    #[test]
    fn test_review_far_from_route_is_off_route() {
        let filter = ProximityFilter::default();
        let verdict = filter.classify(&north_route(), Point::new(0.02, 0.005));
        assert!(!verdict.on_route);
        assert_abs_diff_eq!(verdict.distance_m, 2226.39, epsilon = 0.01);
    }

    #[test]
    fn test_buffer_is_inclusive() {
        let route = north_route();
        let point = Point::new(0.0005, 0.005);
        let exact = route.min_distance_m(point).unwrap();

        assert!(ProximityFilter::new(exact).classify(&route, point).on_route);
        assert!(!ProximityFilter::new(exact - 1e-6).classify(&route, point).on_route);
    }

    #[test]
    fn test_degenerate_polylines_match_nothing() {
        let filter = ProximityFilter::default();
        let origin = Point::new(0.0, 0.0);

        for route in [
            RoutePolyline::default(),
            RoutePolyline::from_lat_lng([(0.0, 0.0)]),
        ] {
            let verdict = filter.classify(&route, origin);
            assert!(!verdict.on_route);
            assert!(verdict.distance_m.is_infinite());
        }
    }

    #[test]
    fn test_zero_length_segments_still_count() {
        let route = RoutePolyline::from_lat_lng([(0.0, 0.0), (0.0, 0.0)]);
        let verdict = ProximityFilter::default().classify(&route, Point::new(0.005, 0.0));
        assert!(verdict.on_route);
        assert_abs_diff_eq!(verdict.distance_m, 556.6, epsilon = 0.1);
    }

    #[test]
    fn test_invalid_buffer_matches_nothing() {
        let point = Point::new(0.0, 0.005);
        for buffer in [-1.0, f64::NAN, f64::NEG_INFINITY] {
            assert!(!ProximityFilter::new(buffer).classify(&north_route(), point).on_route);
        }
    }

    #[test]
    fn test_infinite_buffer_matches_everything() {
        let filter = ProximityFilter::new(f64::INFINITY);

        let near = filter.classify(&north_route(), Point::new(0.0005, 0.005));
        assert!(near.on_route);
        assert_abs_diff_eq!(near.distance_m, 55.66, epsilon = 0.01);

        assert!(filter.classify(&north_route(), Point::new(120.0, -45.0)).on_route);
        assert!(!filter.classify(&RoutePolyline::from_lat_lng([(0.0, 0.0)]), Point::new(0.0, 0.0)).on_route);
    }

    #[test]
    fn test_early_exit_never_changes_classification() {
        let route = zigzag_route();

        for buffer in [0.0, 25.0, 150.0, 400.0, 1000.0, 2500.0] {
            let filter = ProximityFilter::new(buffer);
            for i in -10..=30 {
                for j in -10..=25 {
                    let point = Point::new(-0.125 + i as f64 * 0.0015, 51.495 + j as f64 * 0.001);
                    let exhaustive = route.min_distance_m(point).unwrap();
                    let verdict = filter.classify(&route, point);

                    assert_eq!(verdict.on_route, exhaustive <= buffer);
                    assert!(verdict.distance_m >= exhaustive);
                    if !verdict.on_route {
                        assert_eq!(verdict.distance_m, exhaustive);
                    }
                }
            }
        }
    }

    #[test]
    fn test_evaluate_keeps_input_order() {
        let filter = ProximityFilter::default();
        let result = filter.evaluate(
            &north_route(),
            [
                ("far", Point::new(0.02, 0.005)),
                ("near", Point::new(0.0005, 0.005)),
                ("end", Point::new(0.0, 0.0101)),
            ],
        );

        assert_eq!(result.len(), 3);
        assert_eq!(result.entries()[0].0, "far");
        assert_eq!(result.on_route_count(), 2);
        assert_eq!(result.on_route().copied().collect::<Vec<_>>(), vec!["near", "end"]);
        assert_eq!(result.into_on_route(), vec!["near", "end"]);
    }
}
