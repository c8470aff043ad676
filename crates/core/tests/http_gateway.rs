use std::net::SocketAddr;

use api_types::{NewReview, ReviewId};
use axum::Json;
use axum::Router;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use chrono::{TimeDelta, Utc};
use saferoute_core::{
    DashboardMode, HttpReviewGateway, HttpRouteProvider, NotificationLevel, ReviewGateway,
    RouteProvider, Session, SessionConfig, SessionError,
};
use saferoute_server::{ReviewServer, ServerConfig};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Deserialize)]
struct RouteQuery {
    origin: String,
    destination: String,
}

/// Routes "Home" to "Work" due north from the origin; anything else fails.
async fn fake_directions(Query(query): Query<RouteQuery>) -> Json<Value> {
    if query.origin == "Home" && query.destination == "Work" {
        Json(json!({
            "status": "OK",
            "points": [{"lat": 0.0, "lng": 0.0}, {"lat": 0.01, "lng": 0.0}]
        }))
    } else {
        Json(json!({"status": "ZERO_RESULTS"}))
    }
}

async fn routing_provider() -> SocketAddr {
    let app = Router::new().route("/route", get(fake_directions));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn store() -> ReviewServer {
    ReviewServer::start(ServerConfig::ephemeral()).await.unwrap()
}

#[tokio::test]
async fn test_gateway_crud() {
    let server = store().await;
    let gateway = HttpReviewGateway::new(&server.url());

    assert!(gateway.list().await.unwrap().is_empty());

    let older = gateway
        .create(
            &NewReview::new(40.7, -74.0, 2, 3, "Narrow sidewalk")
                .with_timestamp(Utc::now() - TimeDelta::days(3)),
        )
        .await
        .unwrap();
    let newer = gateway
        .create(&NewReview::new(40.71, -74.01, 5, 5, "Well lit").with_address("Main St"))
        .await
        .unwrap();

    let listed = gateway.list().await.unwrap();
    assert_eq!(listed, vec![newer.clone(), older.clone()]);

    gateway.delete(&older.id).await.unwrap();
    assert_eq!(
        gateway.delete(&older.id).await,
        Err(SessionError::NotFound(older.id.clone()))
    );
    assert_eq!(gateway.list().await.unwrap(), vec![newer]);
}

#[tokio::test]
async fn test_delete_does_not_truncate_reserved_ids() {
    let server = store().await;
    let gateway = HttpReviewGateway::new(&server.url());

    let kept = gateway
        .create(&NewReview::new(40.7, -74.0, 2, 3, "Keep me"))
        .await
        .unwrap();

    for suffix in ["#x", "/x", "?x"] {
        let id = ReviewId::new(format!("{}{suffix}", kept.id));
        assert_eq!(gateway.delete(&id).await, Err(SessionError::NotFound(id.clone())));
    }
    assert_eq!(gateway.list().await.unwrap(), vec![kept]);
}

/// Accepts a delete only for one exact id, as received after decoding.
async fn strict_store(expected: &'static str) -> SocketAddr {
    let app = Router::new().route(
        "/reviews/{id}",
        delete(move |Path(id): Path<String>| async move {
            if id == expected {
                StatusCode::NO_CONTENT
            } else {
                StatusCode::NOT_FOUND
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_delete_sends_opaque_id_intact() {
    let addr = strict_store("a#b/c?d %").await;
    let gateway = HttpReviewGateway::new(&format!("http://{addr}"));

    gateway.delete(&ReviewId::new("a#b/c?d %")).await.unwrap();
    assert!(matches!(
        gateway.delete(&ReviewId::new("a")).await,
        Err(SessionError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_gateway_rejects_invalid_before_sending() {
    let server = store().await;
    let gateway = HttpReviewGateway::new(&server.url());

    let result = gateway
        .create(&NewReview::new(0.0, 0.0, 0, 3, "zero rating"))
        .await;
    assert!(matches!(result, Err(SessionError::Validation(_))));
    assert!(gateway.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_store_is_network_error() {
    let server = store().await;
    let url = server.url();
    server.shutdown().await;

    let gateway = HttpReviewGateway::new(&url);
    assert!(matches!(
        gateway.list().await,
        Err(SessionError::Network(_))
    ));
}

#[tokio::test]
async fn test_route_provider() {
    let addr = routing_provider().await;
    let provider = HttpRouteProvider::new(&format!("http://{addr}"));

    let polyline = provider.route("Home", "Work").await.unwrap();
    assert_eq!(polyline.len(), 2);

    assert_eq!(
        provider.route("Home", "Moon").await,
        Err(SessionError::RouteFailure("ZERO_RESULTS".to_string()))
    );
}

#[tokio::test]
async fn test_session_over_http() {
    let server = store().await;
    let routing = routing_provider().await;

    let mut session = Session::over_http(SessionConfig {
        store_url: server.url(),
        routing_url: format!("http://{routing}"),
        ..Default::default()
    });

    assert!(session.refresh().await);
    let near = session
        .submit_review(NewReview::new(0.005, 0.0005, 4, 2, "Busy junction"))
        .await
        .unwrap();
    session
        .submit_review(NewReview::new(0.005, 0.02, 1, 1, "Far away"))
        .await
        .unwrap();
    assert_eq!(session.stats().count, Some(2));

    assert!(session.search_route("Home", "Work").await);
    assert_eq!(session.mode(), DashboardMode::RouteOnly);
    assert_eq!(session.stats().count, Some(1));
    assert_eq!(session.stats().average_safety, Some(4.0));

    assert!(!session.search_route("Home", "Moon").await);
    assert_eq!(session.mode(), DashboardMode::RouteOnly);

    assert!(session.delete_review(&near.id).await);
    assert_eq!(session.mode(), DashboardMode::Empty);
    assert!(session.stats().is_blank());

    assert!(!session.delete_review(&ReviewId::new("unknown")).await);
    let errors = session
        .take_notifications()
        .into_iter()
        .filter(|n| n.level == NotificationLevel::Error)
        .count();
    assert_eq!(errors, 2);

    // Another client sees the same store.
    let mut other = Session::over_http(SessionConfig {
        store_url: server.url(),
        ..Default::default()
    });
    assert!(other.refresh().await);
    assert_eq!(other.stats().count, Some(1));
}
