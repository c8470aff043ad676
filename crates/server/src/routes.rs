use std::sync::Arc;

use api_types::{NewReview, Review, ReviewId};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};

use crate::error::ApiError;
use crate::notify::Notifier;
use crate::store::ReviewStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReviewStore>,
    pub notifier: Option<Notifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn ReviewStore>, notifier: Option<Notifier>) -> Self {
        Self { store, notifier }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/reviews", get(list_reviews).post(create_review))
        .route("/reviews/{id}", delete(delete_review))
        .route("/health", get(health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

async fn create_review(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let submission = NewReview::from_json(&body)?;

    let id = ReviewId::new(format!("{:016x}", rand::random::<u64>()));
    let review = submission.into_review(id, Utc::now());
    state.store.insert(review.clone()).await?;

    tracing::info!(
        review_id = %review.id,
        lat = review.lat,
        lng = review.lng,
        safety = review.safety_rating,
        "Review created"
    );

    if let Some(notifier) = &state.notifier {
        notifier.review_created(&review);
    }

    Ok((StatusCode::CREATED, Json(review)))
}

async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = ReviewId::new(id);
    if !state.store.delete(&id).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!(review_id = %id, "Review deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn health() -> &'static str {
    "OK"
}
