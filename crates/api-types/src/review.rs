//! Review records as they travel between the store and its clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identifiers::ReviewId;
use crate::validation::{self, ValidationError};

/// A stored review. Immutable once created; the only mutation the store
/// supports is deleting the whole record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub lat: f64,
    pub lng: f64,
    pub safety_rating: u8,
    pub infrastructure_rating: u8,
    pub description: String,
    #[serde(default)]
    pub address: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Review {
    /// Human-readable place for notifications: the address when one was
    /// given, otherwise the coordinates.
    pub fn location(&self) -> String {
        match &self.address {
            Some(address) => address.clone(),
            None => format!("{:.5}, {:.5}", self.lat, self.lng),
        }
    }
}

/// A review submission before the store has assigned an id.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub lat: f64,
    pub lng: f64,
    pub safety_rating: u8,
    pub infrastructure_rating: u8,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewReview {
    pub fn new(
        lat: f64,
        lng: f64,
        safety_rating: u8,
        infrastructure_rating: u8,
        description: impl Into<String>,
    ) -> Self {
        Self {
            lat,
            lng,
            safety_rating,
            infrastructure_rating,
            description: description.into(),
            address: None,
            timestamp: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Parse and validate a raw request body.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let body = validation::object(body)?;

        Ok(Self {
            lat: validation::coordinate(body, "lat", 90.0)?,
            lng: validation::coordinate(body, "lng", 180.0)?,
            safety_rating: validation::rating(body, "safetyRating")?,
            infrastructure_rating: validation::rating(body, "infrastructureRating")?,
            description: validation::description(body)?,
            address: validation::optional_text(body, "address")?,
            timestamp: validation::optional_timestamp(body)?,
        })
    }

    /// Check a locally built submission against the same rules the store
    /// applies, so a client can reject it before any request is made.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::check_coordinate("lat", self.lat, 90.0)?;
        validation::check_coordinate("lng", self.lng, 180.0)?;
        validation::check_rating("safetyRating", self.safety_rating as i64)?;
        validation::check_rating("infrastructureRating", self.infrastructure_rating as i64)?;
        validation::check_description(&self.description)
    }

    /// Attach the store-assigned id. A missing timestamp defaults to `now`.
    pub fn into_review(self, id: ReviewId, now: DateTime<Utc>) -> Review {
        Review {
            id,
            lat: self.lat,
            lng: self.lng,
            safety_rating: self.safety_rating,
            infrastructure_rating: self.infrastructure_rating,
            description: self.description,
            address: self.address,
            timestamp: self.timestamp.unwrap_or(now),
        }
    }
}

/// JSON error body returned by the store for every non-2xx response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Sort newest first. Ties keep their relative order.
pub fn sort_newest_first(reviews: &mut [Review]) {
    reviews.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
