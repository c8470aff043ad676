use api_types::{ReviewId, ValidationError};

/// Failures of the asynchronous collaborators. None of these reach the
/// dashboard state; the session turns them into notifications.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid review: {0}")]
    Validation(String),

    #[error("Review not found: {0}")]
    NotFound(ReviewId),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Route search failed: {0}")]
    RouteFailure(String),
}

impl From<ValidationError> for SessionError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error.to_string())
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
