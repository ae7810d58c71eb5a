//! Integration tests for the public crskit API

extern crate std;

use std::fs;

use crskit::utils::config::Settings;
use crskit::utils::logger::Logger;
use crskit::{epsg_from_zone, reproject, CoordinateSystem, CrsKit, GeoJson, Geometry, ProjError};

const FEATURES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "id": 1, "properties": {"name": "a"},
     "geometry": {"type": "Point", "coordinates": [10.0, 47.0]}},
    {"type": "Feature", "id": 2, "properties": {"name": "b"},
     "geometry": {"type": "LineString", "coordinates": [[9.0, 46.0], [9.5, 46.5, 320.0]]}},
    {"type": "Feature", "id": 3, "properties": null, "geometry": null}
  ]
}"#;

#[test]
fn test_epsg_from_zone() {
    std::assert_eq!(epsg_from_zone(32, false).unwrap(), 32632);
    std::assert_eq!(epsg_from_zone(32, true).unwrap(), 32732);
    std::assert!(std::matches!(epsg_from_zone(61, false), Err(ProjError::InvalidCrsDefinition(_))));
}

#[test]
fn test_point_to_utm() {
    let point = Geometry::from_json(r#"{"type": "Point", "coordinates": [10.0, 47.0]}"#).unwrap();
    let result = reproject("EPSG:4326", "EPSG:32632", &point, Some(3)).unwrap();

    std::assert_eq!(result.geometry_type(), Some("Point"));
    let positions = result.coordinates.positions();
    std::assert_eq!(positions.len(), 1);
    std::assert!(positions[0].x > 575_500.0 && positions[0].x < 576_500.0);
    std::assert!(positions[0].y > 5_204_000.0 && positions[0].y < 5_207_000.0);
    std::assert_eq!((positions[0].x * 1000.0).round() / 1000.0, positions[0].x);

    // input left as it was
    std::assert_eq!(point.coordinates.positions()[0].x, 10.0);
}

#[test]
fn test_malformed_coordinates() {
    let line = Geometry::from_json(r#"{"type": "LineString", "coordinates": [[1.0]]}"#);
    std::assert!(std::matches!(line, Err(ProjError::MalformedGeometry(_))));
}

#[test]
fn test_facade_reprojects_feature_collection() {
    let kit = CrsKit::with_settings(Settings::default());
    let text = kit.reproject_json("EPSG:4326", "EPSG:3857", FEATURES).unwrap();

    let document = GeoJson::from_json(&text).unwrap();
    std::assert_eq!(document.kind(), "FeatureCollection");
    std::assert_eq!(document.feature_count(), 3);
    std::assert_eq!(document.geometry_count(), 2);

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let features = value["features"].as_array().unwrap();
    std::assert_eq!(features[0]["id"], 1);
    std::assert_eq!(features[0]["properties"]["name"], "a");
    std::assert!(features[2]["geometry"].is_null());

    // the 3D vertex loses its height under the default policy
    let line = features[1]["geometry"]["coordinates"].as_array().unwrap();
    std::assert_eq!(line[1].as_array().unwrap().len(), 2);
}

#[test]
fn test_facade_file_round_trip() {
    let dir = std::env::temp_dir().join(format!("crskit_it_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let input = dir.join("input.geojson");
    let projected = dir.join("projected.geojson");
    let restored = dir.join("restored.geojson");
    fs::write(&input, FEATURES).unwrap();

    let kit = CrsKit::with_settings(Settings::default());
    let count = kit.reproject_file(input.to_str().unwrap(), projected.to_str().unwrap(), "EPSG:32632").unwrap();
    std::assert_eq!(count, 2);

    let mut back = Settings::default();
    back.src_crs = "EPSG:32632".to_string();
    back.precision = Some(6);
    let kit = CrsKit::with_settings(back);
    kit.reproject_file(projected.to_str().unwrap(), restored.to_str().unwrap(), "EPSG:4326").unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&restored).unwrap()).unwrap();
    let point = value["features"][0]["geometry"]["coordinates"].as_array().unwrap();
    std::assert!((point[0].as_f64().unwrap() - 10.0).abs() < 1e-6);
    std::assert!((point[1].as_f64().unwrap() - 47.0).abs() < 1e-6);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_logger_summary() {
    let path = std::env::temp_dir().join(format!("crskit_it_{}.log", std::process::id()));
    let logger = Logger::new(path.to_str().unwrap()).unwrap();
    logger.log_summary("Reprojection summary:", &[("source", "EPSG:4326".to_string())]).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    std::assert!(contents.contains("Reprojection summary:"));
    std::assert!(contents.contains("EPSG:4326"));
    fs::remove_file(&path).ok();
}

#[test]
fn test_facade_crs_and_geometry() {
    let kit = CrsKit::with_settings(Settings::default());
    std::assert_eq!(kit.crs("urn:ogc:def:crs:EPSG::32632").unwrap(), CoordinateSystem::UTM(32, true));
    std::assert!(std::matches!(kit.crs("nonsense"), Err(ProjError::InvalidCrsDefinition(_))));

    let point = Geometry::from_json(r#"{"type": "Point", "coordinates": [10.0, 89.0]}"#).unwrap();
    let projected = kit.reproject_geometry("EPSG:4326", "EPSG:3857", &point).unwrap();
    let back = kit.reproject_geometry("EPSG:3857", "EPSG:4326", &projected).unwrap();
    std::assert!((back.coordinates.positions()[0].y - 89.0).abs() < 1e-6);
}

#[cfg(feature = "proj")]
#[test]
fn test_point_to_etrs89_utm() {
    let point = Geometry::from_json(r#"{"type": "Point", "coordinates": [10.0, 47.0]}"#).unwrap();
    let result = reproject("EPSG:4326", "EPSG:25832", &point, Some(2)).unwrap();

    let positions = result.coordinates.positions();
    std::assert!(positions[0].x > 575_500.0 && positions[0].x < 576_500.0);
    std::assert!(positions[0].y > 5_204_000.0 && positions[0].y < 5_207_000.0);
}
