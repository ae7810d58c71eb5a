//! User settings
//!
//! Settings come from an optional TOML file:
//!
//! ```toml
//! [reproject]
//! src_crs = "EPSG:4326"
//! precision = 6
//! extra_dimensions = "drop"
//! progress_threshold = 1000
//!
//! [logging]
//! log_file = "crskit.log"
//! level = "info"
//! ```
//!
//! Command-line flags override anything read here.

use std::fs;
use std::path::Path;

use log::{debug, LevelFilter};

use crate::projection::errors::{ProjError, ProjResult};
use crate::projection::reproject::ExtraDimensions;

/// Settings file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "crskit.toml";

/// Runtime settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// CRS assumed for input that does not say otherwise
    pub src_crs: String,
    /// Output precision in decimal digits
    pub precision: Option<u32>,
    /// Policy for position components beyond x and y
    pub extra_dimensions: ExtraDimensions,
    /// Feature count from which a progress bar is shown
    pub progress_threshold: usize,
    /// Log file path
    pub log_file: String,
    /// Most verbose log level
    pub log_level: LevelFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            // GeoJSON (RFC 7946) coordinates are WGS 84 longitude/latitude
            src_crs: "EPSG:4326".to_string(),
            precision: None,
            extra_dimensions: ExtraDimensions::Drop,
            progress_threshold: 1000,
            log_file: "crskit.log".to_string(),
            log_level: LevelFilter::Info,
        }
    }
}

impl Settings {
    /// Parse settings from a TOML string; missing keys keep their defaults
    pub fn from_str(content: &str) -> ProjResult<Self> {
        let toml_value: toml::Value = content.parse()
            .map_err(|e| ProjError::ConfigError(format!("Failed to parse TOML: {}", e)))?;

        let mut settings = Settings::default();

        if let Some(section) = toml_value.get("reproject") {
            if let Some(src) = section.get("src_crs") {
                settings.src_crs = Self::string_field(src, "reproject.src_crs")?;
            }
            if let Some(precision) = section.get("precision") {
                settings.precision = Some(Self::unsigned_field(precision, "reproject.precision")? as u32);
            }
            if let Some(policy) = section.get("extra_dimensions") {
                let name = Self::string_field(policy, "reproject.extra_dimensions")?;
                settings.extra_dimensions = ExtraDimensions::from_name(&name)
                    .map_err(|e| ProjError::ConfigError(e.to_string()))?;
            }
            if let Some(threshold) = section.get("progress_threshold") {
                settings.progress_threshold = Self::unsigned_field(threshold, "reproject.progress_threshold")? as usize;
            }
        }

        if let Some(section) = toml_value.get("logging") {
            if let Some(file) = section.get("log_file") {
                settings.log_file = Self::string_field(file, "logging.log_file")?;
            }
            if let Some(level) = section.get("level") {
                let name = Self::string_field(level, "logging.level")?;
                settings.log_level = parse_level(&name)?;
            }
        }

        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &str) -> ProjResult<Self> {
        let contents = fs::read_to_string(path)?;
        debug!("Loaded settings from {}", path);
        Self::from_str(&contents)
    }

    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists, or defaults
    pub fn load(path: Option<&str>) -> ProjResult<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Settings::default()),
        }
    }

    fn string_field(value: &toml::Value, name: &str) -> ProjResult<String> {
        value.as_str()
            .map(str::to_string)
            .ok_or_else(|| ProjError::ConfigError(format!("'{}' must be a string", name)))
    }

    fn unsigned_field(value: &toml::Value, name: &str) -> ProjResult<u64> {
        value.as_integer()
            .and_then(|v| u64::try_from(v).ok())
            .filter(|v| *v <= u32::MAX as u64)
            .ok_or_else(|| ProjError::ConfigError(format!("'{}' must be a non-negative integer", name)))
    }
}

/// Parse a log level name ("off", "error", "warn", "info", "debug", "trace")
pub fn parse_level(name: &str) -> ProjResult<LevelFilter> {
    name.trim().parse::<LevelFilter>()
        .map_err(|_| ProjError::ConfigError(format!("Unknown log level '{}'", name)))
}
