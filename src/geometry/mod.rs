//! GeoJSON geometry model
//!
//! Coordinate trees, geometry values and whole GeoJSON documents, parsed
//! from and written back to `serde_json` values.

mod coords;
mod value;
mod document;

pub use self::coords::{Coordinates, Shape};
pub use self::value::Geometry;
pub use self::document::GeoJson;
