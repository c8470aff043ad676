//! Marker visibility filter.
//!
//! Only decides what gets drawn. Dashboard aggregates never look at it.

use api_types::Review;
use chrono::{DateTime, TimeDelta, Utc};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayFilter {
    pub min_safety: Option<u8>,
    pub min_infrastructure: Option<u8>,
    pub max_age_days: Option<u32>,
}

impl DisplayFilter {
    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }

    pub fn matches(&self, review: &Review, now: DateTime<Utc>) -> bool {
        if let Some(min) = self.min_safety {
            if review.safety_rating < min {
                return false;
            }
        }

        if let Some(min) = self.min_infrastructure {
            if review.infrastructure_rating < min {
                return false;
            }
        }

        if let Some(cutoff) = self.max_age_days.and_then(|days| age_cutoff(now, days)) {
            if review.timestamp < cutoff {
                return false;
            }
        }

        true
    }
}

/// `None` when the limit reaches past the representable range, which means no
/// limit at all.
fn age_cutoff(now: DateTime<Utc>, days: u32) -> Option<DateTime<Utc>> {
    TimeDelta::try_days(days.into()).and_then(|age| now.checked_sub_signed(age))
}
