//! UTM zone lookup command

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::projection::errors::{ProjError, ProjResult};
use crate::projection::zone::{epsg_from_zone, zone_for_lon_lat};
use crate::utils::logger::Logger;

/// Command printing the EPSG code of a UTM zone
pub struct ZoneCommand<'a> {
    /// Zone number, 1 to 60
    zone: u32,
    /// Southern hemisphere flag
    is_southern: bool,
    /// Position the zone was derived from, if any
    derived_from: Option<(f64, f64)>,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> ZoneCommand<'a> {
    /// Create a new zone command from `--zone N [--south]` or `--zone-of LON,LAT`
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> ProjResult<Self> {
        if let Some(position) = args.get_one::<String>("zone-of") {
            let (lon, lat) = parse_lon_lat(position)?;
            let (zone, is_southern) = zone_for_lon_lat(lon, lat)?;
            return Ok(ZoneCommand { zone, is_southern, derived_from: Some((lon, lat)), logger });
        }

        let zone_str = args.get_one::<String>("zone")
            .ok_or_else(|| ProjError::GenericError("Missing UTM zone (--zone)".to_string()))?;
        let zone = zone_str.trim().parse::<u32>().map_err(|_| ProjError::InvalidCrsDefinition(
            format!("Invalid UTM zone number: {}", zone_str)))?;

        Ok(ZoneCommand {
            zone,
            is_southern: args.get_flag("south"),
            derived_from: None,
            logger,
        })
    }
}

/// Parse a position given as "lon,lat"
fn parse_lon_lat(position: &str) -> ProjResult<(f64, f64)> {
    let parts: Vec<&str> = position.split(',').collect();
    if parts.len() != 2 {
        return Err(ProjError::GenericError(
            "Position must be in format 'lon,lat'".to_string()));
    }

    let lon = parts[0].trim().parse::<f64>()
        .map_err(|_| ProjError::GenericError("Invalid longitude".to_string()))?;
    let lat = parts[1].trim().parse::<f64>()
        .map_err(|_| ProjError::GenericError("Invalid latitude".to_string()))?;

    Ok((lon, lat))
}

impl<'a> Command for ZoneCommand<'a> {
    fn execute(&self) -> ProjResult<()> {
        let code = epsg_from_zone(self.zone, self.is_southern)?;
        let hemisphere = if self.is_southern { 'S' } else { 'N' };

        match self.derived_from {
            Some((lon, lat)) => {
                info!("Position ({}, {}) lies in UTM zone {}{}", lon, lat, self.zone, hemisphere);
                println!("zone {}{} EPSG:{}", self.zone, hemisphere, code);
            },
            None => println!("EPSG:{}", code),
        }

        self.logger.log(&format!("UTM zone {}{} -> EPSG:{}", self.zone, hemisphere, code))?;
        Ok(())
    }
}
