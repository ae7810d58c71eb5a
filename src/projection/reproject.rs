//! Geometry reprojection
//!
//! A [`GeometryReprojector`] binds a transform to a (source, destination) CRS
//! pair once and then rewrites any number of coordinate trees with it. Each
//! leaf position is transformed as an x/y pair; the input is never modified,
//! a new tree with the same shape is returned.

use log::{debug, warn};

use crate::coordinate::{
    default_provider, CoordinateSystem, CoordinateTransform, IntoCrs, Position, TransformProvider,
};
use crate::geometry::{Coordinates, GeoJson, Geometry};
use crate::projection::errors::{ProjError, ProjResult};

/// What to do with position components beyond x and y
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraDimensions {
    /// Remove them from the output (a warning is logged)
    #[default]
    Drop,
    /// Copy them to the output untouched
    Preserve,
    /// Fail with `MalformedGeometry`
    Reject,
}

impl ExtraDimensions {
    /// Parse a policy name: "drop", "preserve" or "reject"
    pub fn from_name(name: &str) -> ProjResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "drop" => Ok(ExtraDimensions::Drop),
            "preserve" | "keep" => Ok(ExtraDimensions::Preserve),
            "reject" => Ok(ExtraDimensions::Reject),
            other => Err(ProjError::GenericError(format!(
                "Unknown extra dimension policy '{}' (expected drop, preserve or reject)", other))),
        }
    }

    /// Policy name
    pub fn name(&self) -> &'static str {
        match self {
            ExtraDimensions::Drop => "drop",
            ExtraDimensions::Preserve => "preserve",
            ExtraDimensions::Reject => "reject",
        }
    }
}

/// Round a value to `precision` decimal digits
///
/// Non-finite values, and values whose scaled magnitude reaches 2^52 (where
/// f64 has no fractional digits left), are returned unchanged.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision.min(i32::MAX as u32) as i32);
    let scaled = value * factor;
    if !scaled.is_finite() || scaled.abs() >= 4_503_599_627_370_496.0 {
        return value;
    }
    scaled.round() / factor
}

/// Reprojects geometries between a fixed pair of coordinate systems
pub struct GeometryReprojector {
    transform: Box<dyn CoordinateTransform>,
    src: CoordinateSystem,
    dest: CoordinateSystem,
    precision: Option<u32>,
    extra_dimensions: ExtraDimensions,
}

impl GeometryReprojector {
    /// Create a reprojector using the default transform engine
    ///
    /// That is the built-in engine, falling back to PROJ for other pairs when
    /// the `proj` feature is enabled.
    pub fn new(src: impl IntoCrs, dest: impl IntoCrs, precision: Option<u32>) -> ProjResult<Self> {
        Self::with_provider(default_provider().as_ref(), src, dest, precision)
    }

    /// Create a reprojector using the given transform provider
    ///
    /// The transform is built here, once, and reused for every position.
    pub fn with_provider(
        provider: &dyn TransformProvider,
        src: impl IntoCrs,
        dest: impl IntoCrs,
        precision: Option<u32>,
    ) -> ProjResult<Self> {
        let src = src.into_crs()?;
        let dest = dest.into_crs()?;
        let transform = provider.build_transform(&src, &dest)?;

        debug!("Reprojector ready: {} -> {}, precision {:?}", src, dest, precision);

        Ok(GeometryReprojector {
            transform,
            src,
            dest,
            precision,
            extra_dimensions: ExtraDimensions::default(),
        })
    }

    /// Set the policy for components beyond x and y
    pub fn with_extra_dimensions(mut self, policy: ExtraDimensions) -> Self {
        self.extra_dimensions = policy;
        self
    }

    /// Source coordinate system
    pub fn source(&self) -> &CoordinateSystem {
        &self.src
    }

    /// Destination coordinate system
    pub fn destination(&self) -> &CoordinateSystem {
        &self.dest
    }

    /// Output precision in decimal digits
    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    /// Reproject one geometry; all members other than `coordinates` are kept
    pub fn reproject(&self, geometry: &Geometry) -> ProjResult<Geometry> {
        let coordinates = self.reproject_coordinates(&geometry.coordinates)?;
        Ok(geometry.with_coordinates(coordinates))
    }

    /// Reproject every geometry of a GeoJSON document
    pub fn reproject_document(&self, document: &GeoJson) -> ProjResult<GeoJson> {
        document.try_map_geometries(&mut |geometry: &Geometry| self.reproject(geometry))
    }

    /// Reproject a coordinate tree, keeping its shape
    pub fn reproject_coordinates(&self, coordinates: &Coordinates) -> ProjResult<Coordinates> {
        let mut dropped = 0usize;

        let result = coordinates.try_map(&mut |position: &Position| {
            if position.has_z() {
                match self.extra_dimensions {
                    ExtraDimensions::Drop => dropped += 1,
                    ExtraDimensions::Preserve => {},
                    ExtraDimensions::Reject => return Err(ProjError::MalformedGeometry(format!(
                        "Position ({}, {}) has {} components, only 2 are accepted",
                        position.x, position.y, position.dimension()))),
                }
            }
            self.reproject_position(position)
        })?;

        if dropped > 0 {
            warn!("Dropped components beyond x/y from {} position(s) while reprojecting {} -> {}",
                  dropped, self.src, self.dest);
        }

        Ok(result)
    }

    /// Reproject a single position
    pub fn reproject_position(&self, position: &Position) -> ProjResult<Position> {
        let (x, y) = self.transform.transform(position.x, position.y);
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjError::GenericError(format!(
                "Transform {} -> {} produced a non-finite result for ({}, {})",
                self.src, self.dest, position.x, position.y)));
        }

        let extra = match self.extra_dimensions {
            ExtraDimensions::Preserve => position.extra.clone(),
            _ => Vec::new(),
        };

        let mut out = Position { x, y, extra };
        if let Some(precision) = self.precision {
            out.x = round_to(out.x, precision);
            out.y = round_to(out.y, precision);
            for value in out.extra.iter_mut() {
                *value = round_to(*value, precision);
            }
        }

        Ok(out)
    }
}

/// Reproject a geometry from `src_crs` to `dest_crs` with the default engine
///
/// # Arguments
/// * `src_crs` - Source CRS: EPSG code, identifier string or handle
/// * `dest_crs` - Destination CRS
/// * `geometry` - The geometry to reproject; left untouched
/// * `precision` - Optional number of decimal digits to round the output to
///
/// # Returns
/// The reprojected geometry
pub fn reproject(
    src_crs: impl IntoCrs,
    dest_crs: impl IntoCrs,
    geometry: &Geometry,
    precision: Option<u32>,
) -> ProjResult<Geometry> {
    GeometryReprojector::new(src_crs, dest_crs, precision)?.reproject(geometry)
}

/// Reproject a geometry with an explicit transform provider
pub fn reproject_with(
    provider: &dyn TransformProvider,
    src_crs: impl IntoCrs,
    dest_crs: impl IntoCrs,
    geometry: &Geometry,
    precision: Option<u32>,
) -> ProjResult<Geometry> {
    GeometryReprojector::with_provider(provider, src_crs, dest_crs, precision)?.reproject(geometry)
}
