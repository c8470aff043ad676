pub mod config;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod gateway;
pub mod render;
pub mod routing;
pub mod session;

pub use config::SessionConfig;
pub use dashboard::{DashboardEvent, DashboardMode, DashboardState, DashboardStats, EvalContext};
pub use display::DisplayFilter;
pub use error::{Result, SessionError};
pub use gateway::{HttpReviewGateway, ReviewGateway};
pub use render::{RenderDiff, RenderSnapshot};
pub use routing::{HttpRouteProvider, RouteProvider};
pub use session::{Notification, NotificationLevel, Session};

// Re-export the proximity crate for callers that only depend on core
pub use saferoute_proximity as proximity;
