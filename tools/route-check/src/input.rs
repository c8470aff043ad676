use anyhow::{bail, Context, Result};
use api_types::{Review, ReviewId};
use chrono::Utc;
use geo::{Coord, LineString};
use geojson::GeoJson;
use saferoute_proximity::RoutePolyline;
use serde_json::Value;
use std::path::Path;

/// Read reviews from a JSON array, either as returned by `GET /reviews` or
/// as bare submissions. Entries without an id are numbered in file order.
pub fn read_reviews(path: &Path) -> Result<Vec<Review>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read reviews file: {}", path.display()))?;

    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON from: {}", path.display()))?;

    let Value::Array(items) = value else {
        bail!("Expected a JSON array of reviews in: {}", path.display());
    };

    let now = Utc::now();
    let mut reviews = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let submission = api_types::NewReview::from_json(item)
            .with_context(|| format!("Review #{index} is invalid"))?;

        let id = item
            .get("id")
            .and_then(Value::as_str)
            .map(ReviewId::new)
            .unwrap_or_else(|| ReviewId::new(format!("#{index}")));

        reviews.push(submission.into_review(id, now));
    }

    Ok(reviews)
}

pub fn read_route(path: &Path) -> Result<RoutePolyline> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read route file: {}", path.display()))?;

    let geojson: GeoJson = content
        .parse()
        .with_context(|| format!("Failed to parse GeoJSON from: {}", path.display()))?;

    extract_line_string(geojson)
        .map(RoutePolyline::new)
        .with_context(|| format!("No LineString found in: {}", path.display()))
}

fn extract_line_string(geojson: GeoJson) -> Result<LineString<f64>> {
    match geojson {
        GeoJson::Geometry(geom) => geometry_to_line_string(geom.value),
        GeoJson::Feature(feature) => match feature.geometry {
            Some(geom) => geometry_to_line_string(geom.value),
            None => bail!("Feature has no geometry"),
        },
        GeoJson::FeatureCollection(fc) => fc
            .features
            .into_iter()
            .filter_map(|feature| feature.geometry)
            .find_map(|geom| geometry_to_line_string(geom.value).ok())
            .context("No LineString in FeatureCollection"),
    }
}

fn geometry_to_line_string(value: geojson::Value) -> Result<LineString<f64>> {
    match value {
        geojson::Value::LineString(coords) => {
            let coords = coords
                .iter()
                .map(|c| match c.as_slice() {
                    [x, y, ..] => Ok(Coord { x: *x, y: *y }),
                    _ => bail!("Position has fewer than two coordinates"),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(LineString::new(coords))
        }
        _ => bail!("Expected a LineString geometry"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_string_from_feature_collection() {
        let geojson: GeoJson = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}},
                {"type": "Feature", "properties": {}, "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [0.0, 0.01]]}}
            ]
        }"#
        .parse()
        .unwrap();

        let line = extract_line_string(geojson).unwrap();
        assert_eq!(line.0.len(), 2);
        assert_eq!(line.0[1], Coord { x: 0.0, y: 0.01 });
    }

    #[test]
    fn test_polygon_is_rejected() {
        let geojson: GeoJson =
            r#"{"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}"#
                .parse()
                .unwrap();
        assert!(extract_line_string(geojson).is_err());
    }
}
