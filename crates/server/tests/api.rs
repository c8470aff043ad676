use std::time::Duration;

use api_types::{ErrorBody, Review};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use reqwest::{Client, StatusCode};
use saferoute_server::{ReviewServer, ServerConfig};
use serde_json::{Value, json};
use tokio::sync::mpsc;

async fn server() -> ReviewServer {
    ReviewServer::start(ServerConfig::ephemeral()).await.unwrap()
}

#[tokio::test]
async fn test_health() {
    let server = server().await;
    let body = reqwest::get(format!("{}/health", server.url()))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_create_list_delete() {
    let server = server().await;
    let client = Client::new();
    let reviews_url = format!("{}/reviews", server.url());

    let response = client
        .post(&reviews_url)
        .json(&json!({
            "lat": 40.7128,
            "lng": -74.006,
            "safetyRating": 2,
            "infrastructureRating": 4,
            "description": "Poorly lit crossing",
            "address": "Broadway & 4th"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Review = response.json().await.unwrap();
    assert_eq!(created.id.as_str().len(), 16);
    assert_eq!(created.safety_rating, 2);
    assert_eq!(created.address.as_deref(), Some("Broadway & 4th"));

    let listed: Vec<Review> = client
        .get(&reviews_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed, vec![created.clone()]);

    let response = client
        .delete(format!("{reviews_url}/{}", created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .delete(format!("{reviews_url}/{}", created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.error, "Review not found");
}

#[tokio::test]
async fn test_listing_is_newest_first() {
    let server = server().await;
    let client = Client::new();
    let reviews_url = format!("{}/reviews", server.url());

    for (description, timestamp) in [
        ("middle", "2024-06-10T08:00:00Z"),
        ("newest", "2024-06-12T08:00:00Z"),
        ("oldest", "2024-06-01T08:00:00Z"),
    ] {
        let response = client
            .post(&reviews_url)
            .json(&json!({
                "lat": 51.5,
                "lng": -0.12,
                "safetyRating": 3,
                "infrastructureRating": 3,
                "description": description,
                "timestamp": timestamp
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let listed: Vec<Review> = client
        .get(&reviews_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let descriptions: Vec<&str> = listed.iter().map(|r| r.description.as_str()).collect();
    assert_eq!(descriptions, vec!["newest", "middle", "oldest"]);
}

#[tokio::test]
async fn test_invalid_submissions_are_rejected() {
    let server = server().await;
    let client = Client::new();
    let reviews_url = format!("{}/reviews", server.url());

    let cases = [
        json!({"lat": "north", "lng": 0.0, "safetyRating": 3, "infrastructureRating": 3, "description": "x"}),
        json!({"lat": 95.0, "lng": 0.0, "safetyRating": 3, "infrastructureRating": 3, "description": "x"}),
        json!({"lat": 0.0, "lng": 0.0, "safetyRating": 7, "infrastructureRating": 3, "description": "x"}),
        json!({"lat": 0.0, "lng": 0.0, "safetyRating": 3, "infrastructureRating": 3, "description": "  "}),
        json!([1, 2, 3]),
    ];

    for body in cases {
        let response = client.post(&reviews_url).json(&body).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        let error: ErrorBody = response.json().await.unwrap();
        assert!(!error.error.is_empty());
    }

    let response = client
        .post(&reviews_url)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let listed: Vec<Review> = client
        .get(&reviews_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_shutdown_stops_serving() {
    let server = server().await;
    let url = format!("{}/health", server.url());
    assert!(reqwest::get(&url).await.is_ok());

    server.shutdown().await;
    assert!(reqwest::get(&url).await.is_err());
}

/// Collects every webhook body it receives.
async fn webhook() -> (String, mpsc::UnboundedReceiver<Value>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new()
        .route(
            "/hook",
            post(|State(tx): State<mpsc::UnboundedSender<Value>>, Json(body): Json<Value>| async move {
                let _ = tx.send(body);
                StatusCode::NO_CONTENT
            }),
        )
        .with_state(tx);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/hook"), rx)
}

#[tokio::test]
async fn test_creation_is_announced() {
    let (hook_url, mut notices) = webhook().await;
    let server = ReviewServer::start(ServerConfig {
        notify_url: Some(hook_url),
        ..ServerConfig::ephemeral()
    })
    .await
    .unwrap();
    let reviews_url = format!("{}/reviews", server.url());
    let client = Client::new();

    for body in [
        json!({"lat": 48.8566, "lng": 2.3522, "safetyRating": 2, "infrastructureRating": 3, "description": "No crossing", "address": "Rue de Rivoli"}),
        json!({"lat": 48.8566, "lng": 2.3522, "safetyRating": 4, "infrastructureRating": 4, "description": "Fine"}),
    ] {
        let response = client.post(&reviews_url).json(&body).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let mut received = Vec::new();
    for _ in 0..2 {
        let notice = tokio::time::timeout(Duration::from_secs(5), notices.recv())
            .await
            .unwrap()
            .unwrap();
        received.push(notice);
    }
    received.sort_by_key(|n| n["description"].as_str().unwrap_or_default().to_string());

    assert_eq!(received[0]["location"], "48.85660, 2.35220");
    assert_eq!(received[0]["description"], "Fine");
    assert_eq!(received[1]["location"], "Rue de Rivoli");
    assert_eq!(received[1]["lat"], 48.8566);
}

#[tokio::test]
async fn test_unreachable_webhook_does_not_fail_creation() {
    let server = ReviewServer::start(ServerConfig {
        notify_url: Some("http://127.0.0.1:9/hook".to_string()),
        ..ServerConfig::ephemeral()
    })
    .await
    .unwrap();

    let response = Client::new()
        .post(format!("{}/reviews", server.url()))
        .json(&json!({"lat": 1.0, "lng": 1.0, "safetyRating": 3, "infrastructureRating": 3, "description": "ok"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}
