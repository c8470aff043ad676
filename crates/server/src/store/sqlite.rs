use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use api_types::{Review, ReviewId, sort_newest_first};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};

use super::{ReviewStore, StoreResult};
use crate::error::StoreError;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS reviews (
        id TEXT PRIMARY KEY,
        lat REAL NOT NULL,
        lng REAL NOT NULL,
        safety_rating INTEGER NOT NULL,
        infrastructure_rating INTEGER NOT NULL,
        description TEXT NOT NULL,
        address TEXT,
        timestamp TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_reviews_timestamp ON reviews(timestamp);
"#;

/// Reviews persisted in a SQLite database. Queries run on the blocking pool.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Opening review database");
        Self::with_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn run<T, F>(&self, query: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StoreError::Poisoned)?;
            Ok(query(&*conn)?)
        })
        .await?
    }
}

fn review_from_row(row: &Row<'_>) -> rusqlite::Result<Review> {
    Ok(Review {
        id: ReviewId::new(row.get::<_, String>(0)?),
        lat: row.get(1)?,
        lng: row.get(2)?,
        safety_rating: row.get(3)?,
        infrastructure_rating: row.get(4)?,
        description: row.get(5)?,
        address: row.get(6)?,
        timestamp: row.get::<_, DateTime<Utc>>(7)?,
    })
}

impl ReviewStore for SqliteStore {
    fn list<'a>(&'a self) -> Pin<Box<dyn Future<Output = StoreResult<Vec<Review>>> + Send + 'a>> {
        Box::pin(async move {
            let mut reviews = self
                .run(|conn| {
                    let mut stmt = conn.prepare(
                        "SELECT id, lat, lng, safety_rating, infrastructure_rating,
                                description, address, timestamp
                         FROM reviews",
                    )?;
                    let rows = stmt.query_map([], review_from_row)?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()
                })
                .await?;
            sort_newest_first(&mut reviews);
            Ok(reviews)
        })
    }

    fn insert<'a>(
        &'a self,
        review: Review,
    ) -> Pin<Box<dyn Future<Output = StoreResult<()>> + Send + 'a>> {
        Box::pin(self.run(move |conn| {
            conn.execute(
                "INSERT INTO reviews (
                    id, lat, lng, safety_rating, infrastructure_rating,
                    description, address, timestamp
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    review.id.as_str(),
                    review.lat,
                    review.lng,
                    review.safety_rating,
                    review.infrastructure_rating,
                    review.description,
                    review.address,
                    review.timestamp,
                ],
            )?;
            Ok(())
        }))
    }

    fn delete<'a>(
        &'a self,
        id: &'a ReviewId,
    ) -> Pin<Box<dyn Future<Output = StoreResult<bool>> + Send + 'a>> {
        let id = id.clone();
        Box::pin(self.run(move |conn| {
            let deleted = conn.execute("DELETE FROM reviews WHERE id = ?", params![id.as_str()])?;
            Ok(deleted > 0)
        }))
    }
}
