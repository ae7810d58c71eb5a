//! CRS registry and authority lookup
//!
//! The registry is read from `crs_registry.toml`, embedded at build time and
//! parsed once on first use. It names known CRSs, maps legacy aliases onto
//! EPSG codes and describes the UTM code families used to turn a zone and a
//! hemisphere into an authority code.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use log::error;

use crate::coordinate::CoordinateSystem;
use crate::projection::errors::{ProjError, ProjResult};

lazy_static! {
    static ref CRS_REGISTRY: CrsRegistry = {
        let content = include_str!("../../crs_registry.toml");
        CrsRegistry::from_str(content).unwrap_or_else(|e| {
            error!("Failed to parse CRS registry: {}", e);
            CrsRegistry::default()
        })
    };
}

/// An authority namespace and code pair, e.g. ("EPSG", 32632)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authority {
    pub name: String,
    pub code: u32,
}

/// Capability to name a CRS by its registered authority code
pub trait AuthorityLookup {
    /// Look up the authority/code pair of a coordinate system
    fn to_authority(&self, crs: &CoordinateSystem) -> Option<Authority>;
}

/// A family of UTM codes sharing a datum: `code = base + zone`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtmFamily {
    pub datum: String,
    pub name: String,
    pub north_base: u32,
    pub south_base: u32,
    pub min_zone: u32,
    pub max_zone: u32,
}

impl UtmFamily {
    /// Whether the zone number belongs to this family
    pub fn contains_zone(&self, zone: u32) -> bool {
        zone >= self.min_zone && zone <= self.max_zone
    }

    /// Code for a zone and hemisphere
    pub fn code(&self, zone: u32, is_northern: bool) -> Option<u32> {
        if !self.contains_zone(zone) {
            return None;
        }
        let base = if is_northern { self.north_base } else { self.south_base };
        Some(base + zone)
    }

    /// Zone and hemisphere encoded by a code, if it belongs to this family
    pub fn decode(&self, code: u32) -> Option<(u8, bool)> {
        let candidates = [(self.north_base, true), (self.south_base, false)];
        candidates.iter().find_map(|&(base, is_northern)| {
            code.checked_sub(base)
                .filter(|zone| self.contains_zone(*zone))
                .and_then(|zone| u8::try_from(zone).ok())
                .map(|zone| (zone, is_northern))
        })
    }
}

/// Container for CRS names, aliases and UTM families
#[derive(Debug, Default)]
pub struct CrsRegistry {
    /// Authority namespace, "EPSG" for the bundled table
    pub authority: String,
    // Maps codes to CRS names
    names: HashMap<u32, String>,
    // Codes whose coordinates are longitude/latitude degrees
    geographic: HashSet<u32>,
    // Maps alias codes to registered codes
    aliases: HashMap<u32, u32>,
    utm_families: Vec<UtmFamily>,
}

impl CrsRegistry {
    /// The registry embedded in the crate
    pub fn global() -> &'static CrsRegistry {
        &CRS_REGISTRY
    }

    /// Parse a registry from a TOML string
    pub fn from_str(content: &str) -> ProjResult<Self> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => return Err(ProjError::ConfigError(format!("Failed to parse TOML: {}", e))),
        };

        let mut registry = CrsRegistry {
            authority: toml_value.get("authority")
                .and_then(|v| v.get("name"))
                .and_then(|v| v.as_str())
                .unwrap_or("EPSG")
                .to_string(),
            ..CrsRegistry::default()
        };

        Self::parse_name_table(&toml_value, "geographic", &mut registry.names);
        Self::parse_name_table(&toml_value, "projected", &mut registry.names);

        if let Some(table) = toml_value.get("geographic").and_then(|v| v.as_table()) {
            registry.geographic.extend(table.keys().filter_map(|k| k.parse::<u32>().ok()));
        }

        if let Some(table) = toml_value.get("aliases").and_then(|v| v.as_table()) {
            for (k, v) in table {
                if let (Ok(alias), Some(code)) = (k.parse::<u32>(), v.as_integer()) {
                    registry.aliases.insert(alias, code as u32);
                }
            }
        }

        if let Some(table) = toml_value.get("utm").and_then(|v| v.as_table()) {
            for (datum, family) in table {
                registry.utm_families.push(Self::parse_utm_family(datum, family)?);
            }
        }

        Ok(registry)
    }

    // Tables of `code = "name"` pairs
    fn parse_name_table(toml_value: &toml::Value, table_name: &str, target: &mut HashMap<u32, String>) {
        if let Some(table) = toml_value.get(table_name).and_then(|v| v.as_table()) {
            for (k, v) in table {
                if let (Ok(code), Some(name)) = (k.parse::<u32>(), v.as_str()) {
                    target.insert(code, name.to_string());
                }
            }
        }
    }

    fn parse_utm_family(datum: &str, value: &toml::Value) -> ProjResult<UtmFamily> {
        let field = |key: &str| -> ProjResult<u32> {
            value.get(key)
                .and_then(|v| v.as_integer())
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| ProjError::ConfigError(
                    format!("UTM family {} is missing integer field '{}'", datum, key)))
        };

        Ok(UtmFamily {
            datum: datum.to_uppercase(),
            name: value.get("name").and_then(|v| v.as_str()).unwrap_or(datum).to_string(),
            north_base: field("north_base")?,
            south_base: field("south_base")?,
            min_zone: field("min_zone")?,
            max_zone: field("max_zone")?,
        })
    }

    /// Name of a registered code
    pub fn name(&self, code: u32) -> Option<&str> {
        if let Some(name) = self.names.get(&code) {
            return Some(name.as_str());
        }
        self.utm_families.iter().find(|f| f.decode(code).is_some()).map(|f| f.name.as_str())
    }

    /// Whether a code names a geographic (longitude/latitude) CRS
    pub fn is_geographic(&self, code: u32) -> bool {
        self.geographic.contains(&self.resolve_alias(code))
    }

    /// Map an alias onto its registered code; other codes are returned unchanged
    pub fn resolve_alias(&self, code: u32) -> u32 {
        self.aliases.get(&code).copied().unwrap_or(code)
    }

    /// UTM family for a datum
    pub fn utm_family(&self, datum: &str) -> Option<&UtmFamily> {
        let datum = datum.to_uppercase();
        self.utm_families.iter().find(|f| f.datum == datum)
    }

    /// Decode a WGS 84 UTM code into (zone, is_northern)
    pub fn decode_utm(&self, code: u32) -> Option<(u8, bool)> {
        self.utm_family("WGS84").and_then(|family| family.decode(code))
    }

    /// EPSG code of a coordinate system
    pub fn epsg_code(&self, crs: &CoordinateSystem) -> Option<u32> {
        match crs {
            CoordinateSystem::WGS84 => Some(4326),
            CoordinateSystem::WebMercator => Some(3857),
            CoordinateSystem::UTM(zone, is_northern) => {
                self.utm_family("WGS84").and_then(|family| family.code(*zone as u32, *is_northern))
            },
            CoordinateSystem::Other(code) => Some(self.resolve_alias(*code)),
        }
    }
}

impl AuthorityLookup for CrsRegistry {
    fn to_authority(&self, crs: &CoordinateSystem) -> Option<Authority> {
        self.epsg_code(crs).map(|code| Authority {
            name: self.authority.clone(),
            code,
        })
    }
}
