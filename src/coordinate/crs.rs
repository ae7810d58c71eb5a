//! Coordinate Reference System handling
//!
//! A [`CoordinateSystem`] is the immutable handle every other part of the
//! crate works with. Handles are built by [`CoordinateSystemFactory`] from an
//! EPSG code, an identifier string, a PROJ-style string, or a structured
//! [`CrsDefinition`].

use std::fmt;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::projection::errors::{ProjError, ProjResult};
use crate::projection::registry::CrsRegistry;

lazy_static! {
    // EPSG:4326, EPSG::4326, urn:ogc:def:crs:EPSG::4326, urn:ogc:def:crs:EPSG:6.6:4326,
    // http://www.opengis.net/def/crs/EPSG/0/4326
    static ref EPSG_PATTERN: Regex = Regex::new(
        r"(?i)^(?:epsg:{1,2}|urn:ogc:def:crs:epsg:[0-9.]*:|https?://www\.opengis\.net/def/crs/epsg/[0-9.]+/)(\d+)$"
    ).expect("EPSG identifier pattern is valid");

    static ref CRS84_PATTERN: Regex = Regex::new(
        r"(?i)^(?:ogc:)?crs:?84$|^urn:ogc:def:crs:ogc:[0-9.]*:crs84$|^https?://www\.opengis\.net/def/crs/ogc/[0-9.]+/crs84$"
    ).expect("CRS84 identifier pattern is valid");

    static ref PROJ_TOKEN: Regex = Regex::new(r"\+([A-Za-z_][A-Za-z0-9_]*)(?:=(\S+))?")
        .expect("PROJ token pattern is valid");
}

/// Identifier for coordinate systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateSystem {
    /// WGS 84 geographic, longitude/latitude in degrees (EPSG:4326)
    WGS84,
    /// WGS 84 / Pseudo-Mercator (EPSG:3857)
    WebMercator,
    /// WGS 84 UTM zone: (zone number, is_northern)
    UTM(u8, bool),
    /// Any other EPSG code
    Other(u32),
}

impl CoordinateSystem {
    /// Get the EPSG code for this coordinate system, if the registry knows one
    pub fn epsg_code(&self) -> Option<u32> {
        CrsRegistry::global().epsg_code(self)
    }

    /// Get a description of this coordinate system
    pub fn description(&self) -> String {
        let registry = CrsRegistry::global();
        match self {
            CoordinateSystem::UTM(zone, is_northern) => {
                let hemisphere = if *is_northern { 'N' } else { 'S' };
                match self.epsg_code() {
                    Some(code) => format!("WGS 84 / UTM zone {}{} (EPSG:{})", zone, hemisphere, code),
                    None => format!("WGS 84 / UTM zone {}{}", zone, hemisphere),
                }
            },
            other => match other.epsg_code() {
                Some(code) => match registry.name(code) {
                    Some(name) => format!("{} (EPSG:{})", name, code),
                    None => format!("EPSG:{}", code),
                },
                None => format!("{:?}", other),
            },
        }
    }

    /// Whether coordinates in this system are longitude/latitude degrees
    pub fn is_geographic(&self) -> bool {
        match self {
            CoordinateSystem::WGS84 => true,
            CoordinateSystem::Other(code) => CrsRegistry::global().is_geographic(*code),
            _ => false,
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.epsg_code() {
            Some(code) => write!(f, "EPSG:{}", code),
            None => write!(f, "{}", self.description()),
        }
    }
}

/// Projection method named by a structured CRS definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    /// Geographic longitude/latitude
    LongLat,
    /// Spherical (Pseudo-)Mercator
    WebMercator,
    /// Universal Transverse Mercator
    Utm,
}

/// Structured projection definition, the equivalent of a PROJ parameter set
#[derive(Debug, Clone, PartialEq)]
pub struct CrsDefinition {
    /// Projection method
    pub projection: ProjectionKind,
    /// UTM zone number, required for [`ProjectionKind::Utm`]
    pub zone: Option<u32>,
    /// Southern hemisphere flag
    pub south: bool,
    /// Datum name, upper-cased
    pub datum: String,
}

impl CrsDefinition {
    /// Definition of a WGS 84 UTM projection
    pub fn utm(zone: u32, south: bool) -> Self {
        CrsDefinition {
            projection: ProjectionKind::Utm,
            zone: Some(zone),
            south,
            datum: "WGS84".to_string(),
        }
    }

    /// Parse a PROJ-style string such as `+proj=utm +zone=32 +south +datum=WGS84`
    pub fn from_proj_string(proj_str: &str) -> ProjResult<Self> {
        let mut projection = None;
        let mut zone = None;
        let mut south = false;
        let mut datum = "WGS84".to_string();
        let mut sphere_radius = None;

        for caps in PROJ_TOKEN.captures_iter(proj_str) {
            let key = caps[1].to_lowercase();
            let value = caps.get(2).map(|m| m.as_str());

            match (key.as_str(), value) {
                ("proj", Some(name)) => {
                    projection = Some(match name.to_lowercase().as_str() {
                        "utm" => ProjectionKind::Utm,
                        "longlat" | "latlong" | "lonlat" | "latlon" => ProjectionKind::LongLat,
                        "webmerc" => ProjectionKind::WebMercator,
                        "merc" => ProjectionKind::WebMercator,
                        other => return Err(ProjError::InvalidCrsDefinition(
                            format!("Unsupported projection method: {}", other))),
                    });
                },
                ("zone", Some(z)) => {
                    let parsed = z.parse::<u32>().map_err(|_| ProjError::InvalidCrsDefinition(
                        format!("Invalid UTM zone: {}", z)))?;
                    zone = Some(parsed);
                },
                ("south", None) => south = true,
                ("south", Some(flag)) => south = matches!(flag.to_lowercase().as_str(), "true" | "1" | "yes"),
                ("datum", Some(d)) | ("ellps", Some(d)) => datum = d.to_uppercase(),
                ("a", Some(a)) | ("r", Some(a)) => sphere_radius = a.parse::<f64>().ok(),
                (other, _) => debug!("Ignoring PROJ parameter +{}", other),
            }
        }

        let projection = projection.ok_or_else(|| ProjError::InvalidCrsDefinition(
            format!("Missing +proj parameter in '{}'", proj_str)))?;

        // Plain +proj=merc is ellipsoidal Mercator unless it is forced onto the WGS 84 sphere
        if projection == ProjectionKind::WebMercator
            && proj_str.to_lowercase().contains("proj=merc")
            && sphere_radius != Some(6378137.0)
        {
            return Err(ProjError::InvalidCrsDefinition(
                "Ellipsoidal Mercator is not supported, only the WGS 84 sphere (+a=6378137)".to_string()));
        }

        if projection == ProjectionKind::Utm && zone.is_none() {
            return Err(ProjError::InvalidCrsDefinition("UTM definition without +zone".to_string()));
        }

        Ok(CrsDefinition { projection, zone, south, datum })
    }
}

/// Factory for creating coordinate systems
pub struct CoordinateSystemFactory;

impl CoordinateSystemFactory {
    /// Create a coordinate system from an EPSG code
    pub fn from_epsg(epsg: u32) -> ProjResult<CoordinateSystem> {
        if epsg == 0 {
            return Err(ProjError::InvalidCrsDefinition("EPSG code 0 is not a CRS".to_string()));
        }

        let registry = CrsRegistry::global();
        let code = registry.resolve_alias(epsg);
        if code != epsg {
            debug!("Resolved EPSG alias {} to {}", epsg, code);
        }

        if let Some((zone, is_northern)) = registry.decode_utm(code) {
            return Ok(CoordinateSystem::UTM(zone, is_northern));
        }

        Ok(match code {
            4326 => CoordinateSystem::WGS84,
            3857 => CoordinateSystem::WebMercator,
            _ => CoordinateSystem::Other(code),
        })
    }

    /// Create a coordinate system from a structured definition
    pub fn from_definition(definition: &CrsDefinition) -> ProjResult<CoordinateSystem> {
        if definition.datum != "WGS84" {
            return Err(ProjError::InvalidCrsDefinition(
                format!("Unsupported datum: {}", definition.datum)));
        }

        match definition.projection {
            ProjectionKind::LongLat => Ok(CoordinateSystem::WGS84),
            ProjectionKind::WebMercator => Ok(CoordinateSystem::WebMercator),
            ProjectionKind::Utm => {
                let zone = definition.zone.ok_or_else(|| ProjError::InvalidCrsDefinition(
                    "UTM definition without zone".to_string()))?;

                let family = CrsRegistry::global().utm_family(&definition.datum).ok_or_else(|| {
                    ProjError::InvalidCrsDefinition(format!("No UTM family for datum {}", definition.datum))
                })?;

                if !family.contains_zone(zone) {
                    return Err(ProjError::InvalidCrsDefinition(format!(
                        "UTM zone {} outside {}-{}", zone, family.min_zone, family.max_zone)));
                }

                Ok(CoordinateSystem::UTM(zone as u8, !definition.south))
            },
        }
    }

    /// Parse a coordinate system from a string (e.g. "EPSG:4326", "OGC:CRS84",
    /// "+proj=utm +zone=32", "32632")
    pub fn from_string(crs_str: &str) -> ProjResult<CoordinateSystem> {
        let trimmed = crs_str.trim();

        if let Some(caps) = EPSG_PATTERN.captures(trimmed) {
            let code = caps[1].parse::<u32>().map_err(|_| ProjError::InvalidCrsDefinition(
                format!("Invalid EPSG code: {}", &caps[1])))?;
            return Self::from_epsg(code);
        }

        if CRS84_PATTERN.is_match(trimmed) {
            return Ok(CoordinateSystem::WGS84);
        }

        if trimmed.starts_with('+') {
            let definition = CrsDefinition::from_proj_string(trimmed)?;
            return Self::from_definition(&definition);
        }

        if let Ok(code) = trimmed.parse::<u32>() {
            return Self::from_epsg(code);
        }

        Err(ProjError::InvalidCrsDefinition(format!("Unsupported CRS format: {}", crs_str)))
    }
}

/// Anything that can stand in for a CRS handle
pub trait IntoCrs {
    /// Resolve into a coordinate system handle
    fn into_crs(self) -> ProjResult<CoordinateSystem>;
}

impl IntoCrs for CoordinateSystem {
    fn into_crs(self) -> ProjResult<CoordinateSystem> {
        Ok(self)
    }
}

impl IntoCrs for &CoordinateSystem {
    fn into_crs(self) -> ProjResult<CoordinateSystem> {
        Ok(*self)
    }
}

impl IntoCrs for u32 {
    fn into_crs(self) -> ProjResult<CoordinateSystem> {
        CoordinateSystemFactory::from_epsg(self)
    }
}

impl IntoCrs for &str {
    fn into_crs(self) -> ProjResult<CoordinateSystem> {
        CoordinateSystemFactory::from_string(self)
    }
}

impl IntoCrs for &String {
    fn into_crs(self) -> ProjResult<CoordinateSystem> {
        CoordinateSystemFactory::from_string(self)
    }
}

impl IntoCrs for String {
    fn into_crs(self) -> ProjResult<CoordinateSystem> {
        CoordinateSystemFactory::from_string(&self)
    }
}

impl IntoCrs for &CrsDefinition {
    fn into_crs(self) -> ProjResult<CoordinateSystem> {
        CoordinateSystemFactory::from_definition(self)
    }
}
