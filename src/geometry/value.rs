//! GeoJSON geometry values

use serde_json::{Map, Value};

use super::coords::{json_kind, Coordinates};
use crate::projection::errors::{ProjError, ProjResult};

/// A geometry: a coordinate tree plus every other member of the JSON object
///
/// Members other than `coordinates` (`type`, `bbox`, foreign members) are
/// kept as-is and written back in their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// The coordinate tree
    pub coordinates: Coordinates,
    // Remaining members, in input order
    members: Map<String, Value>,
    // Position of `coordinates` among the members
    coordinates_index: usize,
}

impl Geometry {
    /// Create a geometry of the given type
    pub fn new(geometry_type: &str, coordinates: Coordinates) -> Self {
        let mut members = Map::new();
        members.insert("type".to_string(), Value::String(geometry_type.to_string()));
        Geometry { coordinates, members, coordinates_index: 1 }
    }

    /// Parse a geometry from a JSON object
    ///
    /// Fails with `MalformedGeometry` when the value is not an object or its
    /// `coordinates` member is missing or not a valid coordinate tree.
    pub fn from_value(value: &Value) -> ProjResult<Self> {
        let object = value.as_object().ok_or_else(|| ProjError::MalformedGeometry(
            format!("Expected a geometry object, found {}", json_kind(value))))?;

        let coordinates_index = object.keys().position(|k| k == "coordinates")
            .ok_or_else(|| ProjError::MalformedGeometry(match object.get("type").and_then(Value::as_str) {
                Some(t) => format!("{} geometry has no 'coordinates' member", t),
                None => "Geometry has no 'coordinates' member".to_string(),
            }))?;

        let mut members = object.clone();
        let raw = members.shift_remove("coordinates").unwrap_or(Value::Null);
        let coordinates = Coordinates::from_value(&raw)?;

        Ok(Geometry { coordinates, members, coordinates_index })
    }

    /// Parse a geometry from JSON text
    pub fn from_json(text: &str) -> ProjResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// The `type` member, if present
    pub fn geometry_type(&self) -> Option<&str> {
        self.members.get("type").and_then(Value::as_str)
    }

    /// A member other than `coordinates`
    pub fn member(&self, key: &str) -> Option<&Value> {
        self.members.get(key)
    }

    /// A copy of this geometry carrying different coordinates
    pub fn with_coordinates(&self, coordinates: Coordinates) -> Self {
        Geometry {
            coordinates,
            members: self.members.clone(),
            coordinates_index: self.coordinates_index,
        }
    }

    /// Convert back into a JSON object
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        let mut coordinates = Some(self.coordinates.to_value());

        for (i, (key, value)) in self.members.iter().enumerate() {
            if i == self.coordinates_index {
                if let Some(c) = coordinates.take() {
                    object.insert("coordinates".to_string(), c);
                }
            }
            object.insert(key.clone(), value.clone());
        }
        if let Some(c) = coordinates {
            object.insert("coordinates".to_string(), c);
        }

        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::Position;
    use serde_json::json;

    #[test]
    fn test_parse_point() {
        let geometry = Geometry::from_json(r#"{"type":"Point","coordinates":[10.0, 47.0]}"#).unwrap();
        assert_eq!(geometry.geometry_type(), Some("Point"));
        assert_eq!(geometry.coordinates, Coordinates::Leaf(Position::new(10.0, 47.0)));
    }

    #[test]
    fn test_other_members_survive() {
        let value = json!({
            "type": "LineString",
            "bbox": [0.0, 0.0, 1.0, 1.0],
            "coordinates": [[0.0, 0.0], [1.0, 1.0]],
            "name": "edge"
        });
        let geometry = Geometry::from_value(&value).unwrap();
        assert_eq!(geometry.member("bbox"), Some(&json!([0.0, 0.0, 1.0, 1.0])));
        assert_eq!(geometry.to_value(), value);
    }

    #[test]
    fn test_member_order_in_output() {
        let text = r#"{"type":"Point","coordinates":[1.0,2.0],"bbox":[1.0,2.0,1.0,2.0],"name":"p","id":7}"#;
        let geometry = Geometry::from_json(text).unwrap();
        assert_eq!(serde_json::to_string(&geometry.to_value()).unwrap(), text);

        let trailing = r#"{"id":7,"type":"Point","name":"p","coordinates":[1.0,2.0]}"#;
        let geometry = Geometry::from_json(trailing).unwrap();
        assert_eq!(serde_json::to_string(&geometry.to_value()).unwrap(), trailing);
    }

    #[test]
    fn test_missing_coordinates() {
        let value = json!({"type": "GeometryCollection", "geometries": []});
        match Geometry::from_value(&value) {
            Err(ProjError::MalformedGeometry(msg)) => assert!(msg.contains("GeometryCollection")),
            other => panic!("Expected MalformedGeometry, got {:?}", other),
        }

        assert!(matches!(Geometry::from_value(&json!([1, 2])), Err(ProjError::MalformedGeometry(_))));
        assert!(matches!(
            Geometry::from_value(&json!({"type": "Point", "coordinates": "10,47"})),
            Err(ProjError::MalformedGeometry(_))
        ));
    }

    #[test]
    fn test_new_geometry() {
        let geometry = Geometry::new("Point", Coordinates::Leaf(Position::new(1.0, 2.0)));
        assert_eq!(geometry.to_value(), json!({"type": "Point", "coordinates": [1.0, 2.0]}));
    }
}
