//! GeoJSON documents: bare geometries, geometry collections, features and
//! feature collections

use serde_json::{Map, Value};

use super::coords::json_kind;
use super::value::Geometry;
use crate::projection::errors::{ProjError, ProjResult};

/// A GeoJSON document
///
/// Containers keep their full JSON object; only the nested geometries are
/// replaced when the document is written back.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJson {
    /// A geometry with a `coordinates` member
    Geometry(Geometry),
    /// A `GeometryCollection`
    GeometryCollection {
        geometries: Vec<GeoJson>,
        members: Map<String, Value>,
    },
    /// A `Feature`; `None` for a null geometry
    Feature {
        geometry: Option<Box<GeoJson>>,
        members: Map<String, Value>,
    },
    /// A `FeatureCollection`
    FeatureCollection {
        features: Vec<GeoJson>,
        members: Map<String, Value>,
    },
}

impl GeoJson {
    /// Parse a document from a JSON value
    pub fn from_value(value: &Value) -> ProjResult<Self> {
        let object = value.as_object().ok_or_else(|| ProjError::MalformedGeometry(
            format!("Expected a GeoJSON object, found {}", json_kind(value))))?;

        match object.get("type").and_then(Value::as_str) {
            Some("Feature") => {
                let geometry = match object.get("geometry") {
                    None | Some(Value::Null) => None,
                    Some(g) => Some(Box::new(Self::geometry_from_value(g)?)),
                };
                Ok(GeoJson::Feature { geometry, members: object.clone() })
            },
            Some("FeatureCollection") => {
                let features = object.get("features")
                    .and_then(Value::as_array)
                    .ok_or_else(|| ProjError::MalformedGeometry(
                        "FeatureCollection has no 'features' array".to_string()))?
                    .iter()
                    .map(|feature| match Self::from_value(feature)? {
                        f @ GeoJson::Feature { .. } => Ok(f),
                        _ => Err(ProjError::MalformedGeometry(
                            "FeatureCollection member is not a Feature".to_string())),
                    })
                    .collect::<ProjResult<Vec<_>>>()?;
                Ok(GeoJson::FeatureCollection { features, members: object.clone() })
            },
            _ => Self::geometry_from_value(value),
        }
    }

    // Geometry or GeometryCollection
    fn geometry_from_value(value: &Value) -> ProjResult<Self> {
        let is_collection = value.get("type").and_then(Value::as_str) == Some("GeometryCollection");
        if !is_collection {
            return Geometry::from_value(value).map(GeoJson::Geometry);
        }

        let geometries = value.get("geometries")
            .and_then(Value::as_array)
            .ok_or_else(|| ProjError::MalformedGeometry(
                "GeometryCollection has no 'geometries' array".to_string()))?
            .iter()
            .map(Self::geometry_from_value)
            .collect::<ProjResult<Vec<_>>>()?;

        let members = value.as_object().cloned().unwrap_or_default();
        Ok(GeoJson::GeometryCollection { geometries, members })
    }

    /// Parse a document from JSON text
    pub fn from_json(text: &str) -> ProjResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Convert back into a JSON value
    pub fn to_value(&self) -> Value {
        match self {
            GeoJson::Geometry(geometry) => geometry.to_value(),
            GeoJson::GeometryCollection { geometries, members } => {
                let mut object = members.clone();
                object.insert("geometries".to_string(),
                              Value::Array(geometries.iter().map(GeoJson::to_value).collect()));
                Value::Object(object)
            },
            GeoJson::Feature { geometry, members } => {
                let mut object = members.clone();
                object.insert("geometry".to_string(),
                              geometry.as_ref().map_or(Value::Null, |g| g.to_value()));
                Value::Object(object)
            },
            GeoJson::FeatureCollection { features, members } => {
                let mut object = members.clone();
                object.insert("features".to_string(),
                              Value::Array(features.iter().map(GeoJson::to_value).collect()));
                Value::Object(object)
            },
        }
    }

    /// Serialize to JSON text
    pub fn to_json(&self, pretty: bool) -> ProjResult<String> {
        let value = self.to_value();
        let text = if pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(text)
    }

    /// Short name of the document kind, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            GeoJson::Geometry(_) => "Geometry",
            GeoJson::GeometryCollection { .. } => "GeometryCollection",
            GeoJson::Feature { .. } => "Feature",
            GeoJson::FeatureCollection { .. } => "FeatureCollection",
        }
    }

    /// Number of features in a collection, 1 for anything else
    pub fn feature_count(&self) -> usize {
        match self {
            GeoJson::FeatureCollection { features, .. } => features.len(),
            _ => 1,
        }
    }

    /// Number of coordinate-bearing geometries in the document
    pub fn geometry_count(&self) -> usize {
        match self {
            GeoJson::Geometry(_) => 1,
            GeoJson::GeometryCollection { geometries, .. } => geometries.iter().map(GeoJson::geometry_count).sum(),
            GeoJson::Feature { geometry, .. } => geometry.as_ref().map_or(0, |g| g.geometry_count()),
            GeoJson::FeatureCollection { features, .. } => features.iter().map(GeoJson::geometry_count).sum(),
        }
    }

    /// Build a new document with every geometry replaced by `f(geometry)`
    pub fn try_map_geometries<F>(&self, f: &mut F) -> ProjResult<GeoJson>
    where
        F: FnMut(&Geometry) -> ProjResult<Geometry>,
    {
        Ok(match self {
            GeoJson::Geometry(geometry) => GeoJson::Geometry(f(geometry)?),
            GeoJson::GeometryCollection { geometries, members } => GeoJson::GeometryCollection {
                geometries: geometries.iter()
                    .map(|g| g.try_map_geometries(f))
                    .collect::<ProjResult<Vec<_>>>()?,
                members: members.clone(),
            },
            GeoJson::Feature { geometry, members } => GeoJson::Feature {
                geometry: match geometry {
                    Some(g) => Some(Box::new(g.try_map_geometries(f)?)),
                    None => None,
                },
                members: members.clone(),
            },
            GeoJson::FeatureCollection { features, members } => GeoJson::FeatureCollection {
                features: features.iter()
                    .map(|feature| feature.try_map_geometries(f))
                    .collect::<ProjResult<Vec<_>>>()?,
                members: members.clone(),
            },
        })
    }
}
