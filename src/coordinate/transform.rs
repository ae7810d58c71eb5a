//! Coordinate transformation functionality
//!
//! A [`TransformProvider`] turns a (source, destination) CRS pair into a
//! [`CoordinateTransform`], a pure `(x, y) -> (x', y')` function that always
//! takes and returns coordinates in x-then-y order (longitude/easting first).

use std::f64::consts::PI;

use log::debug;

use super::crs::CoordinateSystem;
use super::utm::UtmProjection;
use crate::projection::errors::{ProjError, ProjResult};

/// A forward coordinate transform bound to a CRS pair
pub trait CoordinateTransform: Send + Sync {
    /// Transform one x/y pair
    fn transform(&self, x: f64, y: f64) -> (f64, f64);
}

impl<F> CoordinateTransform for F
where
    F: Fn(f64, f64) -> (f64, f64) + Send + Sync,
{
    fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        self(x, y)
    }
}

/// Capability to build transforms between coordinate systems
pub trait TransformProvider {
    /// Build the transform from `src` to `dest`
    ///
    /// Fails with [`ProjError::UnsupportedCrsPair`] when no transformation
    /// path exists.
    fn build_transform(
        &self,
        src: &CoordinateSystem,
        dest: &CoordinateSystem,
    ) -> ProjResult<Box<dyn CoordinateTransform>>;
}

/// One leg of a transform pipeline, to or from WGS 84 geographic
#[derive(Debug, Clone, Copy)]
enum Step {
    Geographic,
    WebMercator,
    Utm(UtmProjection),
}

impl Step {
    fn for_crs(crs: &CoordinateSystem) -> Option<Step> {
        match crs {
            CoordinateSystem::WGS84 => Some(Step::Geographic),
            CoordinateSystem::WebMercator => Some(Step::WebMercator),
            CoordinateSystem::UTM(zone, is_northern) => Some(Step::Utm(UtmProjection::new(*zone, *is_northern))),
            CoordinateSystem::Other(_) => None,
        }
    }

    fn to_geographic(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Step::Geographic => (x, y),
            Step::WebMercator => CoordinateTransformer::web_mercator_to_wgs84(x, y),
            Step::Utm(projection) => projection.inverse(x, y),
        }
    }

    fn from_geographic(&self, lon: f64, lat: f64) -> (f64, f64) {
        match self {
            Step::Geographic => (lon, lat),
            Step::WebMercator => CoordinateTransformer::wgs84_to_web_mercator(lon, lat),
            Step::Utm(projection) => projection.forward(lon, lat),
        }
    }
}

/// Transform that passes through WGS 84 geographic coordinates
#[derive(Debug, Clone, Copy)]
struct PipelineTransform {
    inverse: Step,
    forward: Step,
}

impl CoordinateTransform for PipelineTransform {
    fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        let (lon, lat) = self.inverse.to_geographic(x, y);
        self.forward.from_geographic(lon, lat)
    }
}

/// Built-in transformer for WGS 84 geographic, Pseudo-Mercator and WGS 84 UTM
#[derive(Debug, Default, Clone, Copy)]
pub struct CoordinateTransformer;

impl CoordinateTransformer {
    /// Earth radius in meters
    const EARTH_RADIUS: f64 = 6378137.0;

    /// Latitudes this close to a pole have no Mercator image
    const POLE_TOLERANCE: f64 = 1e-10;

    /// Create a new transformer
    pub fn new() -> Self {
        CoordinateTransformer
    }

    /// Convert from WGS84 (EPSG:4326) to Web Mercator (EPSG:3857)
    ///
    /// Latitudes beyond the usual ±85.0511 map tile limit are projected as
    /// they are. The poles and latitudes outside ±90 yield NaN.
    pub fn wgs84_to_web_mercator(lon: f64, lat: f64) -> (f64, f64) {
        if lat.abs() > 90.0 || (lat.abs() - 90.0).abs() <= Self::POLE_TOLERANCE {
            return (f64::NAN, f64::NAN);
        }

        let x = lon * Self::EARTH_RADIUS * PI / 180.0;
        let y = f64::ln(f64::tan((90.0 + lat) * PI / 360.0)) * Self::EARTH_RADIUS;

        (x, y)
    }

    /// Convert from Web Mercator (EPSG:3857) to WGS84 (EPSG:4326)
    pub fn web_mercator_to_wgs84(x: f64, y: f64) -> (f64, f64) {
        let lon = x * 180.0 / (Self::EARTH_RADIUS * PI);
        let lat = 180.0 / PI * (2.0 * f64::atan(f64::exp(y / Self::EARTH_RADIUS)) - PI / 2.0);

        (lon, lat)
    }
}

impl TransformProvider for CoordinateTransformer {
    fn build_transform(
        &self,
        src: &CoordinateSystem,
        dest: &CoordinateSystem,
    ) -> ProjResult<Box<dyn CoordinateTransform>> {
        if src == dest {
            debug!("Source and destination CRS are both {}, using identity transform", src);
            return Ok(Box::new(|x: f64, y: f64| (x, y)));
        }

        match (Step::for_crs(src), Step::for_crs(dest)) {
            (Some(inverse), Some(forward)) => {
                debug!("Built transform {} -> {} via WGS 84 geographic", src, dest);
                Ok(Box::new(PipelineTransform { inverse, forward }))
            },
            _ => Err(ProjError::UnsupportedCrsPair(src.description(), dest.description())),
        }
    }
}

/// Provider trying `primary` first and `secondary` for pairs it cannot handle
///
/// Only [`ProjError::UnsupportedCrsPair`] moves on to `secondary`; any other
/// error is returned as is.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackProvider<A, B> {
    primary: A,
    secondary: B,
}

impl<A: TransformProvider, B: TransformProvider> FallbackProvider<A, B> {
    /// Chain two providers
    pub fn new(primary: A, secondary: B) -> Self {
        FallbackProvider { primary, secondary }
    }
}

impl<A: TransformProvider, B: TransformProvider> TransformProvider for FallbackProvider<A, B> {
    fn build_transform(
        &self,
        src: &CoordinateSystem,
        dest: &CoordinateSystem,
    ) -> ProjResult<Box<dyn CoordinateTransform>> {
        match self.primary.build_transform(src, dest) {
            Err(ProjError::UnsupportedCrsPair(_, _)) => {
                debug!("No built-in path {} -> {}, trying fallback provider", src, dest);
                self.secondary.build_transform(src, dest)
            },
            result => result,
        }
    }
}

/// Provider used when the caller does not pass one
///
/// The built-in engine, backed by PROJ when the `proj` feature is enabled.
#[cfg(not(feature = "proj"))]
pub fn default_provider() -> Box<dyn TransformProvider> {
    Box::new(CoordinateTransformer::new())
}

/// Provider used when the caller does not pass one
///
/// The built-in engine, backed by PROJ when the `proj` feature is enabled.
#[cfg(feature = "proj")]
pub fn default_provider() -> Box<dyn TransformProvider> {
    Box::new(FallbackProvider::new(CoordinateTransformer::new(), super::proj_engine::ProjTransformer::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL_DEG: f64 = 1e-9;

    #[test]
    fn test_web_mercator_known_values() {
        let (x, y) = CoordinateTransformer::wgs84_to_web_mercator(180.0, 0.0);
        assert!((x - 20_037_508.342789244).abs() < 1e-6);
        assert!(y.abs() < 1e-6);

        let (lon, lat) = CoordinateTransformer::web_mercator_to_wgs84(x, y);
        assert!((lon - 180.0).abs() < TOL_DEG);
        assert!(lat.abs() < TOL_DEG);
    }

    #[test]
    fn test_web_mercator_beyond_tile_limit() {
        let (x, y) = CoordinateTransformer::wgs84_to_web_mercator(10.0, 89.0);
        assert!(y > 20_037_508.35, "northing not clamped: {}", y);

        let (lon, lat) = CoordinateTransformer::web_mercator_to_wgs84(x, y);
        assert!((lon - 10.0).abs() < TOL_DEG);
        assert!((lat - 89.0).abs() < TOL_DEG);

        let (_, y_south) = CoordinateTransformer::wgs84_to_web_mercator(10.0, -89.0);
        assert!((y_south + y).abs() < 1e-6);
    }

    #[test]
    fn test_web_mercator_poles() {
        assert!(CoordinateTransformer::wgs84_to_web_mercator(0.0, 90.0).1.is_nan());
        assert!(CoordinateTransformer::wgs84_to_web_mercator(0.0, -90.0).1.is_nan());
        assert!(CoordinateTransformer::wgs84_to_web_mercator(0.0, 91.0).1.is_nan());
    }

    #[test]
    fn test_identity_for_same_crs() {
        let transformer = CoordinateTransformer::new();
        let transform = transformer
            .build_transform(&CoordinateSystem::Other(27700), &CoordinateSystem::Other(27700))
            .unwrap();
        assert_eq!(transform.transform(1.5, -2.5), (1.5, -2.5));
    }

    #[test]
    fn test_utm_to_utm_through_geographic() {
        let transformer = CoordinateTransformer::new();
        let zone32 = CoordinateSystem::UTM(32, true);
        let zone33 = CoordinateSystem::UTM(33, true);

        let to_33 = transformer.build_transform(&zone32, &zone33).unwrap();
        let to_32 = transformer.build_transform(&zone33, &zone32).unwrap();

        let (x, y) = to_33.transform(700_000.0, 5_300_000.0);
        let (x2, y2) = to_32.transform(x, y);
        assert!((x2 - 700_000.0).abs() < 1e-3, "easting roundtrip: {}", x2);
        assert!((y2 - 5_300_000.0).abs() < 1e-3, "northing roundtrip: {}", y2);
    }

    #[test]
    fn test_unsupported_pair() {
        let transformer = CoordinateTransformer::new();
        match transformer.build_transform(&CoordinateSystem::WGS84, &CoordinateSystem::Other(27700)) {
            Err(ProjError::UnsupportedCrsPair(from, to)) => {
                assert!(from.contains("4326"));
                assert!(to.contains("27700"));
            },
            Err(e) => panic!("Unexpected error: {}", e),
            Ok(_) => panic!("Expected UnsupportedCrsPair"),
        }
    }

    struct Refusing;

    impl TransformProvider for Refusing {
        fn build_transform(&self, src: &CoordinateSystem, dest: &CoordinateSystem)
            -> ProjResult<Box<dyn CoordinateTransform>> {
            Err(ProjError::UnsupportedCrsPair(src.to_string(), dest.to_string()))
        }
    }

    struct Broken;

    impl TransformProvider for Broken {
        fn build_transform(&self, _src: &CoordinateSystem, _dest: &CoordinateSystem)
            -> ProjResult<Box<dyn CoordinateTransform>> {
            Err(ProjError::InvalidCrsDefinition("broken".to_string()))
        }
    }

    struct Shifting;

    impl TransformProvider for Shifting {
        fn build_transform(&self, _src: &CoordinateSystem, _dest: &CoordinateSystem)
            -> ProjResult<Box<dyn CoordinateTransform>> {
            Ok(Box::new(|x: f64, y: f64| (x + 100.0, y)))
        }
    }

    #[test]
    fn test_fallback_provider() {
        let bng = CoordinateSystem::Other(27700);

        let chained = FallbackProvider::new(CoordinateTransformer::new(), Shifting);
        let transform = chained.build_transform(&CoordinateSystem::WGS84, &bng).unwrap();
        assert_eq!(transform.transform(1.0, 2.0), (101.0, 2.0));

        // supported pairs never reach the fallback
        let transform = chained.build_transform(&CoordinateSystem::WGS84, &CoordinateSystem::WGS84).unwrap();
        assert_eq!(transform.transform(1.0, 2.0), (1.0, 2.0));

        let refusing = FallbackProvider::new(Refusing, Refusing);
        assert!(matches!(refusing.build_transform(&CoordinateSystem::WGS84, &bng),
                         Err(ProjError::UnsupportedCrsPair(_, _))));

        let broken = FallbackProvider::new(Broken, Shifting);
        assert!(matches!(broken.build_transform(&CoordinateSystem::WGS84, &bng),
                         Err(ProjError::InvalidCrsDefinition(_))));
    }

    #[test]
    fn test_closure_is_a_transform() {
        let shift = |x: f64, y: f64| (x + 1.0, y * 2.0);
        assert_eq!(CoordinateTransform::transform(&shift, 1.0, 2.0), (2.0, 4.0));
    }
}
