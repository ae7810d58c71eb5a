//! CRS resolution and geometry reprojection
//!
//! This module provides the UTM zone to EPSG lookup, the CRS registry it
//! relies on, and the recursive geometry reprojector.

pub mod errors;
pub mod registry;
pub mod zone;
pub mod reproject;
#[cfg(test)]
mod tests;

pub use errors::{ProjError, ProjResult};
pub use registry::{Authority, AuthorityLookup, CrsRegistry, UtmFamily};
pub use zone::{epsg_from_zone, epsg_from_zone_with, zone_for_lon_lat};
pub use reproject::{reproject, reproject_with, round_to, ExtraDimensions, GeometryReprojector};
