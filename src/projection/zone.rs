//! UTM zone to EPSG code resolution

use log::debug;

use crate::coordinate::{CoordinateSystemFactory, CrsDefinition, UtmProjection};
use crate::projection::errors::{ProjError, ProjResult};
use crate::projection::registry::{AuthorityLookup, CrsRegistry};

/// Return the EPSG code of a WGS 84 UTM zone
///
/// # Arguments
/// * `zone_number` - UTM zone number, 1 to 60
/// * `is_southern` - Whether this is a southern hemisphere zone
///
/// # Returns
/// The EPSG code, e.g. 32632 for zone 32 north, or `InvalidCrsDefinition`
/// when the zone cannot be turned into a CRS
pub fn epsg_from_zone(zone_number: u32, is_southern: bool) -> ProjResult<u32> {
    epsg_from_zone_with(CrsRegistry::global(), zone_number, is_southern)
}

/// Same as [`epsg_from_zone`] with an explicit authority lookup
pub fn epsg_from_zone_with(
    lookup: &dyn AuthorityLookup,
    zone_number: u32,
    is_southern: bool,
) -> ProjResult<u32> {
    let definition = CrsDefinition::utm(zone_number, is_southern);
    let crs = CoordinateSystemFactory::from_definition(&definition)?;

    let authority = lookup.to_authority(&crs).ok_or_else(|| ProjError::InvalidCrsDefinition(
        format!("No authority code registered for {:?}", crs)))?;

    debug!("UTM zone {}{} resolves to {}:{}",
           zone_number, if is_southern { 'S' } else { 'N' }, authority.name, authority.code);

    Ok(authority.code)
}

/// Standard UTM zone containing a geographic position
///
/// # Arguments
/// * `lon` - Longitude in degrees
/// * `lat` - Latitude in degrees, -90 to 90
///
/// # Returns
/// `(zone_number, is_southern)`
pub fn zone_for_lon_lat(lon: f64, lat: f64) -> ProjResult<(u32, bool)> {
    if !lon.is_finite() || !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(ProjError::InvalidCrsDefinition(
            format!("No UTM zone for longitude {} latitude {}", lon, lat)));
    }

    let (zone, is_southern) = UtmProjection::zone_for(lon, lat);
    Ok((zone as u32, is_southern))
}
