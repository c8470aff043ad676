use api_types::Review;
use chrono::{DateTime, TimeDelta, Utc};

/// Aggregates over the review subset that feeds the dashboard.
///
/// Every field is `None` when the subset is empty: blank means "no data in
/// this mode", while `Some(0)` is reserved for a populated subset that
/// genuinely counts zero (e.g. no recent reviews).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DashboardStats {
    pub count: Option<usize>,
    pub average_safety: Option<f64>,
    pub average_infrastructure: Option<f64>,
    pub recent_count: Option<usize>,
}

impl DashboardStats {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn compute<'a>(
        subset: impl IntoIterator<Item = &'a Review>,
        now: DateTime<Utc>,
        recent_window: TimeDelta,
    ) -> Self {
        // A window reaching past the representable range has no cutoff.
        let cutoff = now.checked_sub_signed(recent_window);
        let is_recent = |timestamp: DateTime<Utc>| match cutoff {
            Some(cutoff) => timestamp >= cutoff,
            None => recent_window > TimeDelta::zero(),
        };

        let mut count = 0usize;
        let mut safety_sum = 0u64;
        let mut infrastructure_sum = 0u64;
        let mut recent = 0usize;

        for review in subset {
            count += 1;
            safety_sum += review.safety_rating as u64;
            infrastructure_sum += review.infrastructure_rating as u64;
            if is_recent(review.timestamp) {
                recent += 1;
            }
        }

        if count == 0 {
            return Self::blank();
        }

        Self {
            count: Some(count),
            average_safety: Some(round_to_tenth(safety_sum as f64 / count as f64)),
            average_infrastructure: Some(round_to_tenth(
                infrastructure_sum as f64 / count as f64,
            )),
            recent_count: Some(recent),
        }
    }

    pub fn is_blank(&self) -> bool {
        *self == Self::blank()
    }

    /// Display strings, empty for blank fields.
    pub fn formatted(&self) -> FormattedStats {
        FormattedStats {
            count: self.count.map(|c| c.to_string()).unwrap_or_default(),
            average_safety: self
                .average_safety
                .map(|a| format!("{a:.1}"))
                .unwrap_or_default(),
            average_infrastructure: self
                .average_infrastructure
                .map(|a| format!("{a:.1}"))
                .unwrap_or_default(),
            recent_count: self.recent_count.map(|c| c.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormattedStats {
    pub count: String,
    pub average_safety: String,
    pub average_infrastructure: String,
    pub recent_count: String,
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
