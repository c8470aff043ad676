//! What the map should show, as a pure function of the dashboard state.
//!
//! The map widget never gets mutated marker objects. Each change produces a
//! fresh [`RenderSnapshot`]; [`RenderDiff`] tells the widget which markers to
//! add or drop and always replaces the highlight and heatmap layers wholesale,
//! so highlights from an earlier route can't linger.

use std::collections::HashSet;

use api_types::{MAX_RATING, Review, ReviewId};
use chrono::{DateTime, Utc};
use geo::{LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, json};

use crate::dashboard::{DashboardMode, DashboardState};

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub id: ReviewId,
    pub position: Point,
    pub safety_rating: u8,
    pub infrastructure_rating: u8,
}

impl Marker {
    fn from_review(review: &Review) -> Self {
        Self {
            id: review.id.clone(),
            position: Point::new(review.lng, review.lat),
            safety_rating: review.safety_rating,
            infrastructure_rating: review.infrastructure_rating,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatPoint {
    pub position: Point,
    pub weight: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Layer {
    Marker,
    Highlight,
    Heatmap,
    Route,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderSnapshot {
    pub mode: DashboardMode,
    /// Reviews passing the display filter.
    pub markers: Vec<Marker>,
    /// Every on-route review, regardless of the display filter.
    pub highlights: Vec<Marker>,
    pub heatmap: Vec<HeatPoint>,
    pub route: Option<LineString<f64>>,
}

impl RenderSnapshot {
    pub fn build(state: &DashboardState, now: DateTime<Utc>) -> Self {
        let filter = state.display_filter();
        let displayed: Vec<&Review> = state
            .reviews()
            .iter()
            .filter(|review| filter.matches(review, now))
            .collect();

        Self {
            mode: state.mode(),
            markers: displayed.iter().map(|r| Marker::from_review(r)).collect(),
            highlights: state.on_route_reviews().map(Marker::from_review).collect(),
            heatmap: displayed
                .iter()
                .map(|r| HeatPoint {
                    position: Point::new(r.lng, r.lat),
                    weight: heat_weight(r),
                })
                .collect(),
            route: state
                .route()
                .map(|route| route.polyline().line_string().clone()),
        }
    }

    pub fn to_geojson(&self) -> FeatureCollection {
        let mut features = Vec::new();

        if let Some(route) = &self.route {
            let coords = route.0.iter().map(|c| vec![c.x, c.y]).collect();
            features.push(feature(Value::LineString(coords), Layer::Route, Map::new()));
        }

        for point in &self.heatmap {
            let mut props = Map::new();
            props.insert("weight".to_string(), json!(point.weight));
            features.push(feature(point_value(point.position), Layer::Heatmap, props));
        }

        for (layer, markers) in [
            (Layer::Marker, &self.markers),
            (Layer::Highlight, &self.highlights),
        ] {
            for marker in markers {
                let mut props = Map::new();
                props.insert("id".to_string(), json!(marker.id.as_str()));
                props.insert("safetyRating".to_string(), json!(marker.safety_rating));
                props.insert(
                    "infrastructureRating".to_string(),
                    json!(marker.infrastructure_rating),
                );
                features.push(feature(point_value(marker.position), layer, props));
            }
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

/// Less safe spots weigh more.
fn heat_weight(review: &Review) -> f64 {
    (MAX_RATING + 1).saturating_sub(review.safety_rating) as f64
}

fn point_value(position: Point) -> Value {
    Value::Point(vec![position.x(), position.y()])
}

fn feature(value: Value, layer: Layer, mut properties: Map<String, serde_json::Value>) -> Feature {
    properties.insert("layer".to_string(), json!(layer.as_ref()));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Steps that take the map from one snapshot to the next.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderDiff {
    pub added_markers: Vec<ReviewId>,
    pub removed_markers: Vec<ReviewId>,
    /// The full highlight layer. Existing highlights are always cleared first.
    pub highlights: Vec<ReviewId>,
    pub route_changed: bool,
}

impl RenderDiff {
    pub fn between(previous: Option<&RenderSnapshot>, next: &RenderSnapshot) -> Self {
        let old_ids: HashSet<&ReviewId> = previous
            .map(|p| p.markers.iter().map(|m| &m.id).collect())
            .unwrap_or_default();
        let new_ids: HashSet<&ReviewId> = next.markers.iter().map(|m| &m.id).collect();

        let added_markers = next
            .markers
            .iter()
            .filter(|m| !old_ids.contains(&m.id))
            .map(|m| m.id.clone())
            .collect();
        let removed_markers = previous
            .map(|p| {
                p.markers
                    .iter()
                    .filter(|m| !new_ids.contains(&m.id))
                    .map(|m| m.id.clone())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            added_markers,
            removed_markers,
            highlights: next.highlights.iter().map(|m| m.id.clone()).collect(),
            route_changed: match previous {
                Some(p) => p.route != next.route,
                None => next.route.is_some(),
            },
        }
    }

    pub fn is_noop(&self) -> bool {
        self.added_markers.is_empty()
            && self.removed_markers.is_empty()
            && self.highlights.is_empty()
            && !self.route_changed
    }
}
