//! Wire types shared by the review store and its clients.

pub mod identifiers;
pub mod review;
pub mod validation;

pub use identifiers::ReviewId;
pub use review::{ErrorBody, NewReview, Review, sort_newest_first};
pub use validation::{MAX_RATING, MIN_RATING, ValidationError};
