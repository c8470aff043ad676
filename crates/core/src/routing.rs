//! Route search through an external routing provider.
//!
//! The provider turns two free-text addresses into an ordered list of points.
//! Anything but an `OK` status is reported as a route failure carrying the
//! provider's own status string; no fallback route is computed.

use std::future::Future;
use std::pin::Pin;

use reqwest::{Client, StatusCode, Url};
use saferoute_proximity::RoutePolyline;
use serde::Deserialize;

use crate::error::{Result, SessionError};

pub const STATUS_OK: &str = "OK";

pub trait RouteProvider: Send + Sync {
    fn route<'a>(
        &'a self,
        origin: &'a str,
        destination: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<RoutePolyline>> + Send + 'a>>;
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    pub status: String,
    #[serde(default)]
    pub points: Vec<LatLng>,
}

impl RouteResponse {
    pub fn into_polyline(self) -> Result<RoutePolyline> {
        if self.status != STATUS_OK {
            return Err(SessionError::RouteFailure(self.status));
        }
        Ok(RoutePolyline::from_lat_lng(
            self.points.into_iter().map(|p| (p.lat, p.lng)),
        ))
    }
}

pub struct HttpRouteProvider {
    client: Client,
    route_url: String,
}

impl HttpRouteProvider {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            route_url: format!("{}/route", base_url.trim_end_matches('/')),
        }
    }

    async fn route_inner(&self, origin: &str, destination: &str) -> Result<RoutePolyline> {
        let url = Url::parse_with_params(
            &self.route_url,
            &[("origin", origin), ("destination", destination)],
        )
        .map_err(|e| SessionError::Network(format!("bad routing URL: {e}")))?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(%status, "Routing provider request failed");
            return Err(SessionError::Network(format!(
                "routing provider returned {status}"
            )));
        }

        let body: RouteResponse = response.json().await?;
        let polyline = body.into_polyline()?;
        tracing::debug!(points = polyline.len(), "Route received");
        Ok(polyline)
    }
}

impl RouteProvider for HttpRouteProvider {
    fn route<'a>(
        &'a self,
        origin: &'a str,
        destination: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<RoutePolyline>> + Send + 'a>> {
        Box::pin(self.route_inner(origin, destination))
    }
}
