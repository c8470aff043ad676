//! Client side of the review store.
//!
//! The store owns the records; this adapter only validates outgoing
//! submissions, keeps listings ordered newest first, and maps HTTP statuses
//! onto [`SessionError`] variants.

use std::future::Future;
use std::pin::Pin;

use api_types::{ErrorBody, NewReview, Review, ReviewId, sort_newest_first};
use reqwest::{Client, Response, StatusCode, Url};

use crate::error::{Result, SessionError};

/// CRUD access to stored reviews.
pub trait ReviewGateway: Send + Sync {
    /// All reviews, newest first.
    fn list<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<Vec<Review>>> + Send + 'a>>;

    fn create<'a>(
        &'a self,
        review: &'a NewReview,
    ) -> Pin<Box<dyn Future<Output = Result<Review>> + Send + 'a>>;

    fn delete<'a>(
        &'a self,
        id: &'a ReviewId,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

pub struct HttpReviewGateway {
    client: Client,
    reviews_url: String,
}

impl HttpReviewGateway {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            reviews_url: format!("{}/reviews", base_url.trim_end_matches('/')),
        }
    }

    async fn list_inner(&self) -> Result<Vec<Review>> {
        let response = self.client.get(&self.reviews_url).send().await?;
        let response = expect_status(response, StatusCode::OK).await?;

        let mut reviews: Vec<Review> = response.json().await?;
        sort_newest_first(&mut reviews);
        Ok(reviews)
    }

    async fn create_inner(&self, review: &NewReview) -> Result<Review> {
        review.validate()?;

        let response = self
            .client
            .post(&self.reviews_url)
            .json(review)
            .send()
            .await?;

        if response.status() == StatusCode::BAD_REQUEST {
            return Err(SessionError::Validation(error_message(response).await));
        }

        let response = expect_status(response, StatusCode::CREATED).await?;
        Ok(response.json().await?)
    }

    /// `{reviews_url}/{id}` with the id as a single percent-encoded segment.
    fn review_url(&self, id: &ReviewId) -> Result<Url> {
        let mut url = Url::parse(&self.reviews_url)
            .map_err(|e| SessionError::Network(format!("bad store URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| SessionError::Network(format!("store URL has no path: {}", self.reviews_url)))?
            .push(id.as_str());
        Ok(url)
    }

    async fn delete_inner(&self, id: &ReviewId) -> Result<()> {
        let url = self.review_url(id)?;
        let response = self.client.delete(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SessionError::NotFound(id.clone()));
        }

        expect_status(response, StatusCode::NO_CONTENT).await?;
        Ok(())
    }
}

impl ReviewGateway for HttpReviewGateway {
    fn list<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<Vec<Review>>> + Send + 'a>> {
        Box::pin(self.list_inner())
    }

    fn create<'a>(
        &'a self,
        review: &'a NewReview,
    ) -> Pin<Box<dyn Future<Output = Result<Review>> + Send + 'a>> {
        Box::pin(self.create_inner(review))
    }

    fn delete<'a>(
        &'a self,
        id: &'a ReviewId,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(self.delete_inner(id))
    }
}

async fn expect_status(response: Response, expected: StatusCode) -> Result<Response> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }

    let message = error_message(response).await;
    tracing::warn!(%status, %message, "Unexpected response from review store");
    Err(SessionError::Network(format!("store returned {status}: {message}")))
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_url_encodes_reserved_characters() {
        let gateway = HttpReviewGateway::new("http://127.0.0.1:3000/");

        let url = gateway.review_url(&ReviewId::new("65f0c2")).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:3000/reviews/65f0c2");

        let url = gateway.review_url(&ReviewId::new("a#b/c?d")).unwrap();
        assert_eq!(url.path(), "/reviews/a%23b%2Fc%3Fd");
        assert_eq!(url.fragment(), None);
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_unparseable_store_url_is_network_error() {
        let gateway = HttpReviewGateway::new("not a url");
        assert!(matches!(
            gateway.review_url(&ReviewId::new("a")),
            Err(SessionError::Network(_))
        ));
    }
}
