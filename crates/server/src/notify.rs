use api_types::Review;
use reqwest::Client;
use serde::Serialize;

/// Fire-and-forget webhook announcing new reviews.
#[derive(Clone, Debug)]
pub struct Notifier {
    client: Client,
    url: String,
}

#[derive(Debug, Serialize)]
struct ReviewNotice {
    lat: f64,
    lng: f64,
    location: String,
    description: String,
}

impl Notifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// Posts the notice from a background task. The caller never waits on it
    /// and a failed delivery is only logged.
    pub fn review_created(&self, review: &Review) {
        let notice = ReviewNotice {
            lat: review.lat,
            lng: review.lng,
            location: review.location(),
            description: review.description.clone(),
        };
        let request = self.client.post(&self.url).json(&notice);
        let review_id = review.id.clone();

        tokio::spawn(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(%review_id, "Review notification delivered");
                }
                Ok(response) => {
                    tracing::warn!(%review_id, status = %response.status(), "Review notification rejected");
                }
                Err(error) => {
                    tracing::warn!(%review_id, %error, "Review notification failed");
                }
            }
        });
    }
}
