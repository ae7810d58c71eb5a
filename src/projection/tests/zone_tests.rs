//! Tests for UTM zone resolution

extern crate std;

use crate::coordinate::CoordinateSystem;
use crate::projection::errors::ProjError;
use crate::projection::registry::{Authority, AuthorityLookup};
use crate::projection::zone::{epsg_from_zone, epsg_from_zone_with, zone_for_lon_lat};

/// Lookup that knows nothing
struct EmptyLookup;

impl AuthorityLookup for EmptyLookup {
    fn to_authority(&self, _crs: &CoordinateSystem) -> Option<Authority> {
        None
    }
}

/// Lookup that numbers UTM zones in its own namespace
struct LocalLookup;

impl AuthorityLookup for LocalLookup {
    fn to_authority(&self, crs: &CoordinateSystem) -> Option<Authority> {
        match crs {
            CoordinateSystem::UTM(zone, true) => Some(Authority { name: "LOCAL".to_string(), code: 1000 + *zone as u32 }),
            _ => None,
        }
    }
}

#[test]
fn test_zone_32() {
    std::assert_eq!(epsg_from_zone(32, false).unwrap(), 32632);
    std::assert_eq!(epsg_from_zone(32, true).unwrap(), 32732);
}

#[test]
fn test_zone_bounds() {
    std::assert_eq!(epsg_from_zone(1, false).unwrap(), 32601);
    std::assert_eq!(epsg_from_zone(60, true).unwrap(), 32760);
}

#[test]
fn test_every_zone_resolves() {
    for zone in 1..=60u32 {
        std::assert_eq!(epsg_from_zone(zone, false).unwrap(), 32600 + zone);
        std::assert_eq!(epsg_from_zone(zone, true).unwrap(), 32700 + zone);
    }
}

#[test]
fn test_out_of_range_zone() {
    for zone in [0u32, 61, 100] {
        match epsg_from_zone(zone, false) {
            Err(ProjError::InvalidCrsDefinition(_)) => {},
            other => std::panic!("Expected InvalidCrsDefinition for zone {}, got {:?}", zone, other),
        }
    }
}

#[test]
fn test_injected_lookup() {
    std::assert_eq!(epsg_from_zone_with(&LocalLookup, 32, false).unwrap(), 1032);
    std::assert!(matches!(
        epsg_from_zone_with(&LocalLookup, 32, true),
        Err(ProjError::InvalidCrsDefinition(_))
    ));
    std::assert!(matches!(
        epsg_from_zone_with(&EmptyLookup, 32, false),
        Err(ProjError::InvalidCrsDefinition(_))
    ));
}

#[test]
fn test_zone_for_lon_lat() {
    std::assert_eq!(zone_for_lon_lat(10.0, 47.0).unwrap(), (32, false));
    std::assert_eq!(zone_for_lon_lat(-43.2, -22.9).unwrap(), (23, true));

    let (zone, south) = zone_for_lon_lat(10.0, -47.0).unwrap();
    std::assert_eq!(epsg_from_zone(zone, south).unwrap(), 32732);

    std::assert!(zone_for_lon_lat(10.0, 95.0).is_err());
    std::assert!(zone_for_lon_lat(f64::NAN, 0.0).is_err());
}
