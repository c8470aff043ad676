//! Dashboard state machine.
//!
//! [`DashboardState`] is a plain value: every event goes through
//! [`DashboardState::apply`], which consumes the old state and returns the
//! new one. Nothing here performs IO, so the whole machine can be driven from
//! tests without a map or a network.
//!
//! The mode is derived from the state rather than stored:
//! no route is [`DashboardMode::Overall`], a route with at least one review
//! inside the buffer is [`DashboardMode::RouteOnly`], and a route with none is
//! [`DashboardMode::Empty`].

use std::collections::HashSet;

use api_types::{Review, ReviewId, sort_newest_first};
use chrono::{DateTime, TimeDelta, Utc};
use geo::Point;
use saferoute_proximity::{ProximityFilter, ProximityResult, RoutePolyline};

use crate::config::SessionConfig;
use crate::display::DisplayFilter;

pub mod stats;

pub use stats::{DashboardStats, FormattedStats};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum DashboardMode {
    Overall,
    RouteOnly,
    Empty,
}

#[derive(Clone, Debug)]
pub enum DashboardEvent {
    ReviewsLoaded(Vec<Review>),
    ReviewCreated(Review),
    ReviewDeleted(ReviewId),
    RouteFound(RoutePolyline),
    RouteCleared,
    FilterApplied(DisplayFilter),
    FilterReset,
}

/// Everything a transition needs from outside the state.
#[derive(Clone, Copy, Debug)]
pub struct EvalContext {
    pub filter: ProximityFilter,
    pub now: DateTime<Utc>,
    pub recent_window: TimeDelta,
}

impl EvalContext {
    pub fn new(filter: ProximityFilter, now: DateTime<Utc>, recent_window: TimeDelta) -> Self {
        Self {
            filter,
            now,
            recent_window,
        }
    }

    pub fn from_config(config: &SessionConfig, now: DateTime<Utc>) -> Self {
        Self::new(
            ProximityFilter::new(config.buffer_m),
            now,
            config.recent_window,
        )
    }
}

/// The route currently searched for and the latest classification of every
/// review against it.
#[derive(Clone, Debug)]
pub struct ActiveRoute {
    polyline: RoutePolyline,
    proximity: ProximityResult<ReviewId>,
    on_route: HashSet<ReviewId>,
}

impl ActiveRoute {
    pub fn polyline(&self) -> &RoutePolyline {
        &self.polyline
    }

    pub fn proximity(&self) -> &ProximityResult<ReviewId> {
        &self.proximity
    }

    pub fn is_on_route(&self, id: &ReviewId) -> bool {
        self.on_route.contains(id)
    }

    pub fn on_route_count(&self) -> usize {
        self.on_route.len()
    }
}

#[derive(Clone, Debug, Default)]
pub struct DashboardState {
    /// Newest first.
    reviews: Vec<Review>,
    route: Option<ActiveRoute>,
    display_filter: DisplayFilter,
    stats: DashboardStats,
    filter_runs: u64,
    aggregate_runs: u64,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DashboardMode {
        match &self.route {
            None => DashboardMode::Overall,
            Some(route) if route.on_route.is_empty() => DashboardMode::Empty,
            Some(_) => DashboardMode::RouteOnly,
        }
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn route(&self) -> Option<&ActiveRoute> {
        self.route.as_ref()
    }

    pub fn stats(&self) -> DashboardStats {
        self.stats
    }

    pub fn display_filter(&self) -> DisplayFilter {
        self.display_filter
    }

    /// How many times the proximity filter has run over the review set.
    pub fn filter_runs(&self) -> u64 {
        self.filter_runs
    }

    /// How many times the aggregates have been recomputed.
    pub fn aggregate_runs(&self) -> u64 {
        self.aggregate_runs
    }

    /// Reviews feeding the aggregates in the current mode. Never affected by
    /// the display filter.
    pub fn active_subset(&self) -> impl Iterator<Item = &Review> {
        let route = self.route.as_ref();
        self.reviews
            .iter()
            .filter(move |review| route.is_none_or(|r| r.is_on_route(&review.id)))
    }

    pub fn on_route_reviews(&self) -> impl Iterator<Item = &Review> {
        let route = self.route.as_ref();
        self.reviews
            .iter()
            .filter(move |review| route.is_some_and(|r| r.is_on_route(&review.id)))
    }

    pub fn apply(mut self, event: DashboardEvent, ctx: &EvalContext) -> Self {
        match event {
            DashboardEvent::ReviewsLoaded(mut reviews) => {
                sort_newest_first(&mut reviews);
                // One record per id, the newest one wins.
                let mut seen = HashSet::new();
                reviews.retain(|r| seen.insert(r.id.clone()));
                self.reviews = reviews;
                self.refresh(ctx);
            }
            DashboardEvent::ReviewCreated(review) => {
                self.reviews.retain(|r| r.id != review.id);
                self.reviews.push(review);
                sort_newest_first(&mut self.reviews);
                self.refresh(ctx);
            }
            DashboardEvent::ReviewDeleted(id) => {
                let before = self.reviews.len();
                self.reviews.retain(|r| r.id != id);

                if self.reviews.len() == before {
                    tracing::debug!(review_id = %id, "Deleted review was not loaded, nothing to recompute");
                } else {
                    self.refresh(ctx);
                }
            }
            DashboardEvent::RouteFound(polyline) => {
                if !polyline.is_routable() {
                    tracing::warn!(points = polyline.len(), "Route has no segments, no review can be on it");
                }
                self.route = Some(self.classify(polyline, ctx));
                self.aggregate(ctx);
            }
            DashboardEvent::RouteCleared => {
                self.route = None;
                self.aggregate(ctx);
            }
            DashboardEvent::FilterApplied(filter) => {
                self.display_filter = filter;
            }
            DashboardEvent::FilterReset => {
                self.display_filter = DisplayFilter::default();
            }
        }

        tracing::debug!(
            mode = %self.mode(),
            reviews = self.reviews.len(),
            count = ?self.stats.count,
            "Dashboard updated"
        );

        self
    }

    /// Re-run the filter against the active route, if any, then re-aggregate.
    fn refresh(&mut self, ctx: &EvalContext) {
        if let Some(route) = self.route.take() {
            self.route = Some(self.classify(route.polyline, ctx));
        }
        self.aggregate(ctx);
    }

    fn classify(&mut self, polyline: RoutePolyline, ctx: &EvalContext) -> ActiveRoute {
        let proximity = ctx.filter.evaluate(
            &polyline,
            self.reviews
                .iter()
                .map(|r| (r.id.clone(), Point::new(r.lng, r.lat))),
        );
        let on_route: HashSet<ReviewId> = proximity.on_route().cloned().collect();

        self.filter_runs += 1;
        tracing::debug!(
            buffer_m = ctx.filter.buffer_m(),
            on_route = on_route.len(),
            of = proximity.len(),
            "Filtered reviews against route"
        );

        ActiveRoute {
            polyline,
            proximity,
            on_route,
        }
    }

    fn aggregate(&mut self, ctx: &EvalContext) {
        self.stats = DashboardStats::compute(self.active_subset(), ctx.now, ctx.recent_window);
        self.aggregate_runs += 1;
    }
}
