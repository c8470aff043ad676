//! Persistence behind the review endpoints.

use std::future::Future;
use std::pin::Pin;

use api_types::{Review, ReviewId};

use crate::error::StoreError;

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

pub trait ReviewStore: Send + Sync {
    /// Every stored review, newest first.
    fn list<'a>(&'a self) -> Pin<Box<dyn Future<Output = StoreResult<Vec<Review>>> + Send + 'a>>;

    fn insert<'a>(
        &'a self,
        review: Review,
    ) -> Pin<Box<dyn Future<Output = StoreResult<()>> + Send + 'a>>;

    /// Returns whether a review with this id existed.
    fn delete<'a>(
        &'a self,
        id: &'a ReviewId,
    ) -> Pin<Box<dyn Future<Output = StoreResult<bool>> + Send + 'a>>;
}
