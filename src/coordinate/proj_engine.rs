//! PROJ-backed transforms (requires the `proj` feature)
//!
//! Any pair of CRSs with an EPSG code can be transformed here. Transforms
//! are normalized for visualization, so geographic coordinates stay in
//! longitude/latitude order like the rest of the crate.

use std::sync::Mutex;

use log::{debug, warn};
use proj::Proj;

use super::crs::CoordinateSystem;
use super::transform::{CoordinateTransform, TransformProvider};
use crate::projection::errors::{ProjError, ProjResult};

/// Transform provider delegating to the PROJ library
#[derive(Debug, Default, Clone, Copy)]
pub struct ProjTransformer;

impl ProjTransformer {
    /// Create a new PROJ transformer
    pub fn new() -> Self {
        ProjTransformer
    }

    /// Identifier PROJ understands for a coordinate system
    fn identifier(crs: &CoordinateSystem) -> ProjResult<String> {
        crs.epsg_code()
            .map(|code| format!("EPSG:{}", code))
            .ok_or_else(|| ProjError::InvalidCrsDefinition(
                format!("{} has no EPSG code to hand to PROJ", crs.description())))
    }
}

/// A PROJ transformation object bound to one CRS pair
struct ProjTransform {
    // PROJ contexts are not thread safe
    proj: Mutex<Proj>,
    label: String,
}

impl CoordinateTransform for ProjTransform {
    fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        let proj = match self.proj.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // NaN is reported as a failed position by the reprojector
        match proj.convert((x, y)) {
            Ok(converted) => converted,
            Err(e) => {
                warn!("PROJ could not transform ({}, {}) {}: {}", x, y, self.label, e);
                (f64::NAN, f64::NAN)
            },
        }
    }
}

impl TransformProvider for ProjTransformer {
    fn build_transform(
        &self,
        src: &CoordinateSystem,
        dest: &CoordinateSystem,
    ) -> ProjResult<Box<dyn CoordinateTransform>> {
        if src == dest {
            return Ok(Box::new(|x: f64, y: f64| (x, y)));
        }

        let from = Self::identifier(src)?;
        let to = Self::identifier(dest)?;

        let proj = Proj::new_known_crs(&from, &to, None).map_err(|e| {
            debug!("PROJ refused {} -> {}: {}", from, to, e);
            ProjError::UnsupportedCrsPair(src.description(), dest.description())
        })?;

        debug!("Built PROJ transform {} -> {}", from, to);
        Ok(Box::new(ProjTransform {
            proj: Mutex::new(proj),
            label: format!("{} -> {}", from, to),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::CoordinateTransformer;

    #[test]
    fn test_etrs89_utm_matches_wgs84_utm() {
        let transformer = ProjTransformer::new();
        let etrs = transformer
            .build_transform(&CoordinateSystem::WGS84, &CoordinateSystem::Other(25832))
            .unwrap();
        let (x, y) = etrs.transform(10.0, 47.0);

        let wgs = CoordinateTransformer::new()
            .build_transform(&CoordinateSystem::WGS84, &CoordinateSystem::UTM(32, true))
            .unwrap();
        let (wx, wy) = wgs.transform(10.0, 47.0);

        // ETRS89 and WGS 84 agree to within a few meters
        assert!((x - wx).abs() < 5.0, "easting {} vs {}", x, wx);
        assert!((y - wy).abs() < 5.0, "northing {} vs {}", y, wy);
    }

    #[test]
    fn test_british_national_grid_round_trip() {
        let transformer = ProjTransformer::new();
        let bng = CoordinateSystem::Other(27700);
        let forward = transformer.build_transform(&CoordinateSystem::WGS84, &bng).unwrap();
        let inverse = transformer.build_transform(&bng, &CoordinateSystem::WGS84).unwrap();

        let (x, y) = forward.transform(-0.1276, 51.5072);
        assert!(x > 500_000.0 && x < 560_000.0, "easting {}", x);
        assert!(y > 150_000.0 && y < 200_000.0, "northing {}", y);

        let (lon, lat) = inverse.transform(x, y);
        assert!((lon + 0.1276).abs() < 1e-6);
        assert!((lat - 51.5072).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_code() {
        let transformer = ProjTransformer::new();
        let result = transformer.build_transform(&CoordinateSystem::WGS84, &CoordinateSystem::Other(1));
        assert!(matches!(result, Err(ProjError::UnsupportedCrsPair(_, _))));
    }
}
