//! Coordinate handling for geospatial data
//!
//! This module provides the CRS handles, the position type and the built-in
//! transform engine used to move coordinates between systems.

mod point;
mod crs;
mod transform;
mod utm;
#[cfg(feature = "proj")]
mod proj_engine;

// Re-export key types
pub use self::point::Position;
pub use self::crs::{CoordinateSystem, CoordinateSystemFactory, CrsDefinition, IntoCrs, ProjectionKind};
pub use self::transform::{default_provider, CoordinateTransform, CoordinateTransformer, FallbackProvider, TransformProvider};
#[cfg(feature = "proj")]
pub use self::proj_engine::ProjTransformer;
pub use self::utm::UtmProjection;
