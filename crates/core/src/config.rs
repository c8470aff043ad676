use chrono::TimeDelta;
use saferoute_proximity::DEFAULT_BUFFER_M;

/// Reviews newer than this count towards the "recent" figure.
pub const DEFAULT_RECENT_DAYS: i64 = 7;

#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Buffer around the active route, in meters.
    pub buffer_m: f64,
    pub recent_window: TimeDelta,
    /// Base URL of the review store, without the `/reviews` path.
    pub store_url: String,
    /// Base URL of the routing provider.
    pub routing_url: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            buffer_m: DEFAULT_BUFFER_M,
            recent_window: TimeDelta::days(DEFAULT_RECENT_DAYS),
            store_url: "http://127.0.0.1:3000".to_string(),
            routing_url: "http://127.0.0.1:5000".to_string(),
        }
    }
}
