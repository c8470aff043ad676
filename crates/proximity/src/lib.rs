//! # saferoute-proximity
//!
//! Decides which geotagged points lie within a buffer distance of a route.
//!
//! ## Features
//!
//! - **Local projection**: ellipsoid-corrected meters-per-degree scale factors
//! - **Segment distance**: clamped projection onto each route segment
//! - **Proximity filter**: buffer classification with early exit
//!
//! Distances are planar approximations around each segment, which is accurate
//! to well under a percent for kilometer-scale buffers away from the poles.
//!
//! ## Example
//!
//! ```
//! use saferoute_proximity::prelude::*;
//! use geo::Point;
//!
//! // About 1.1 km due north from the origin
//! let route = RoutePolyline::from_lat_lng([(0.0, 0.0), (0.01, 0.0)]);
//! let filter = ProximityFilter::default(); // 1000 m buffer
//!
//! let near = filter.classify(&route, Point::new(0.0005, 0.005));
//! assert!(near.on_route);
//!
//! let far = filter.classify(&route, Point::new(0.02, 0.005));
//! assert!(!far.on_route);
//! ```

pub mod filter;
pub mod polyline;
pub mod projection;
pub mod segment;

pub mod prelude {
    pub use crate::filter::{DEFAULT_BUFFER_M, Proximity, ProximityFilter, ProximityResult};
    pub use crate::polyline::RoutePolyline;
    pub use crate::projection::LocalScale;
}

pub use prelude::*;
