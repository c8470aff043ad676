use std::future::Future;
use std::pin::Pin;

use api_types::{Review, ReviewId, sort_newest_first};
use tokio::sync::RwLock;

use super::{ReviewStore, StoreResult};

/// Reviews kept for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    reviews: RwLock<Vec<Review>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReviewStore for MemoryStore {
    fn list<'a>(&'a self) -> Pin<Box<dyn Future<Output = StoreResult<Vec<Review>>> + Send + 'a>> {
        Box::pin(async move {
            let mut reviews = self.reviews.read().await.clone();
            sort_newest_first(&mut reviews);
            Ok(reviews)
        })
    }

    fn insert<'a>(
        &'a self,
        review: Review,
    ) -> Pin<Box<dyn Future<Output = StoreResult<()>> + Send + 'a>> {
        Box::pin(async move {
            self.reviews.write().await.push(review);
            Ok(())
        })
    }

    fn delete<'a>(
        &'a self,
        id: &'a ReviewId,
    ) -> Pin<Box<dyn Future<Output = StoreResult<bool>> + Send + 'a>> {
        Box::pin(async move {
            let mut reviews = self.reviews.write().await;
            let before = reviews.len();
            reviews.retain(|r| &r.id != id);
            Ok(reviews.len() != before)
        })
    }
}
