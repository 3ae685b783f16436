//! GeoJSON shapes attached to Hub'Eau records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `[longitude, latitude]`, optionally followed by altitude.
pub type Position = Vec<f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrsProperties {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crs {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: CrsProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: Position,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
}

impl Geometry {
    /// The coordinates of a `Point`, if this is one.
    pub fn point(&self) -> Option<&Position> {
        match self {
            Geometry::Point { coordinates } => Some(coordinates),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub bbox: Option<Vec<f64>>,
    #[serde(default)]
    pub crs: Option<Crs>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
    #[serde(default)]
    pub bbox: Option<Vec<f64>>,
    #[serde(default)]
    pub crs: Option<Crs>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_point_with_crs_member() {
        let geometry: Geometry = serde_json::from_value(json!({
            "type": "Point",
            "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:OGC:1.3:CRS84"}},
            "coordinates": [2.35, 48.85]
        }))
        .unwrap();

        assert_eq!(geometry.point(), Some(&vec![2.35, 48.85]));
    }

    #[test]
    fn test_geometry_collection() {
        let geometry: Geometry = serde_json::from_value(json!({
            "type": "GeometryCollection",
            "geometries": [
                {"type": "Point", "coordinates": [1.0, 2.0]},
                {"type": "LineString", "coordinates": [[1.0, 2.0], [3.0, 4.0]]}
            ]
        }))
        .unwrap();

        match geometry {
            Geometry::GeometryCollection { geometries } => assert_eq!(geometries.len(), 2),
            other => panic!("unexpected geometry: {other:?}"),
        }
    }

    #[test]
    fn test_feature_collection() {
        let fc: FeatureCollection = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "id": 12,
                "geometry": {"type": "Point", "coordinates": [0.5, 45.1]},
                "properties": {"code_station": "A1"}
            }]
        }))
        .unwrap();

        assert_eq!(fc.features.len(), 1);
        assert_eq!(fc.features[0].id, Some(json!(12)));
    }
}
