//! Event handling for one user session.
//!
//! Each action awaits at most one collaborator call and applies its outcome to
//! the dashboard in a single transition. Failures never reach the dashboard:
//! they are logged and queued as notifications for the UI to show.

use std::mem;

use api_types::{NewReview, Review, ReviewId};
use chrono::Utc;

use crate::config::SessionConfig;
use crate::dashboard::{DashboardEvent, DashboardMode, DashboardState, DashboardStats, EvalContext};
use crate::display::DisplayFilter;
use crate::error::SessionError;
use crate::gateway::{HttpReviewGateway, ReviewGateway};
use crate::render::{RenderDiff, RenderSnapshot};
use crate::routing::{HttpRouteProvider, RouteProvider};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

impl From<&SessionError> for Notification {
    fn from(error: &SessionError) -> Self {
        Self::error(error.to_string())
    }
}

pub struct Session {
    gateway: Box<dyn ReviewGateway>,
    router: Box<dyn RouteProvider>,
    config: SessionConfig,
    state: DashboardState,
    rendered: Option<RenderSnapshot>,
    notifications: Vec<Notification>,
}

impl Session {
    pub fn new(
        gateway: Box<dyn ReviewGateway>,
        router: Box<dyn RouteProvider>,
        config: SessionConfig,
    ) -> Self {
        Self {
            gateway,
            router,
            config,
            state: DashboardState::new(),
            rendered: None,
            notifications: Vec::new(),
        }
    }

    /// Session talking to the store and routing provider named in `config`.
    pub fn over_http(config: SessionConfig) -> Self {
        let gateway = HttpReviewGateway::new(&config.store_url);
        let router = HttpRouteProvider::new(&config.routing_url);
        Self::new(Box::new(gateway), Box::new(router), config)
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn mode(&self) -> DashboardMode {
        self.state.mode()
    }

    pub fn stats(&self) -> DashboardStats {
        self.state.stats()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Notifications raised since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        mem::take(&mut self.notifications)
    }

    /// Reload every review from the store.
    pub async fn refresh(&mut self) -> bool {
        match self.gateway.list().await {
            Ok(reviews) => {
                self.dispatch(DashboardEvent::ReviewsLoaded(reviews));
                true
            }
            Err(e) => self.fail("load reviews", e),
        }
    }

    pub async fn search_route(&mut self, origin: &str, destination: &str) -> bool {
        if origin.trim().is_empty() || destination.trim().is_empty() {
            self.notifications
                .push(Notification::error("Enter both a start and a destination"));
            return false;
        }

        match self.router.route(origin, destination).await {
            Ok(polyline) => {
                self.dispatch(DashboardEvent::RouteFound(polyline));
                if self.mode() == DashboardMode::Empty {
                    self.notifications
                        .push(Notification::info("No reviews along this route"));
                }
                true
            }
            Err(e) => self.fail("search route", e),
        }
    }

    pub fn clear_route(&mut self) {
        self.dispatch(DashboardEvent::RouteCleared);
    }

    pub async fn submit_review(&mut self, review: NewReview) -> Option<Review> {
        match self.gateway.create(&review).await {
            Ok(created) => {
                tracing::info!(review_id = %created.id, "Review submitted");
                self.dispatch(DashboardEvent::ReviewCreated(created.clone()));
                self.notifications.push(Notification::info("Review submitted"));
                Some(created)
            }
            Err(e) => {
                self.fail("submit review", e);
                None
            }
        }
    }

    pub async fn delete_review(&mut self, id: &ReviewId) -> bool {
        match self.gateway.delete(id).await {
            Ok(()) => {
                self.dispatch(DashboardEvent::ReviewDeleted(id.clone()));
                self.notifications.push(Notification::info("Review deleted"));
                true
            }
            Err(e) => self.fail("delete review", e),
        }
    }

    pub fn apply_filter(&mut self, filter: DisplayFilter) {
        self.dispatch(DashboardEvent::FilterApplied(filter));
    }

    pub fn reset_filter(&mut self) {
        self.dispatch(DashboardEvent::FilterReset);
    }

    /// Snapshot of the current state and the steps from the previously
    /// rendered one. Marks the new snapshot as rendered.
    pub fn render(&mut self) -> (RenderSnapshot, RenderDiff) {
        let snapshot = RenderSnapshot::build(&self.state, Utc::now());
        let diff = RenderDiff::between(self.rendered.as_ref(), &snapshot);
        self.rendered = Some(snapshot.clone());
        (snapshot, diff)
    }

    fn dispatch(&mut self, event: DashboardEvent) {
        let ctx = EvalContext::from_config(&self.config, Utc::now());
        self.state = mem::take(&mut self.state).apply(event, &ctx);
    }

    fn fail(&mut self, action: &str, error: SessionError) -> bool {
        tracing::warn!(%error, "Failed to {action}");
        self.notifications.push(Notification::from(&error));
        false
    }
}
