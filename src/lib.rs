pub mod coordinate;
pub mod geometry;
pub mod projection;
pub mod utils;
pub mod commands;
pub mod api;

pub use crate::api::CrsKit;

pub use coordinate::{CoordinateSystem, CoordinateSystemFactory, CoordinateTransformer, Position};
pub use geometry::{Coordinates, GeoJson, Geometry};
pub use projection::{epsg_from_zone, reproject, reproject_with, ExtraDimensions, GeometryReprojector, ProjError, ProjResult};
