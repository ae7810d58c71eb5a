use std::fs;

use log::info;

use crate::coordinate::{CoordinateSystem, CoordinateSystemFactory, IntoCrs};
use crate::geometry::{GeoJson, Geometry};
use crate::projection::errors::ProjResult;
use crate::projection::reproject::GeometryReprojector;
use crate::projection::zone;
use crate::utils::config::Settings;

/// Main interface to the crskit library
///
/// Applies the configured defaults (source CRS, precision, extra dimension
/// policy) to every call.
pub struct CrsKit {
    settings: Settings,
}

impl CrsKit {
    /// Create a new CrsKit instance
    ///
    /// # Arguments
    /// * `config_path` - Optional path to a settings file; without one,
    ///   `crskit.toml` in the working directory is used when present
    ///
    /// # Returns
    /// A CrsKit instance or an error if the settings cannot be read
    pub fn new(config_path: Option<&str>) -> ProjResult<Self> {
        Ok(CrsKit { settings: Settings::load(config_path)? })
    }

    /// Create an instance with explicit settings
    pub fn with_settings(settings: Settings) -> Self {
        CrsKit { settings }
    }

    /// Active settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// EPSG code of a WGS 84 UTM zone
    pub fn epsg_from_zone(&self, zone_number: u32, is_southern: bool) -> ProjResult<u32> {
        zone::epsg_from_zone(zone_number, is_southern)
    }

    /// Parse a CRS identifier
    pub fn crs(&self, crs_str: &str) -> ProjResult<CoordinateSystem> {
        CoordinateSystemFactory::from_string(crs_str)
    }

    /// Build a reprojector from the configured source CRS to `dest_crs`
    pub fn reprojector(&self, dest_crs: impl IntoCrs) -> ProjResult<GeometryReprojector> {
        self.reprojector_from(self.settings.src_crs.as_str(), dest_crs)
    }

    /// Build a reprojector between two CRSs using the configured precision and policy
    pub fn reprojector_from(&self, src_crs: impl IntoCrs, dest_crs: impl IntoCrs) -> ProjResult<GeometryReprojector> {
        Ok(GeometryReprojector::new(src_crs, dest_crs, self.settings.precision)?
            .with_extra_dimensions(self.settings.extra_dimensions))
    }

    /// Reproject one geometry
    pub fn reproject_geometry(&self, src_crs: impl IntoCrs, dest_crs: impl IntoCrs, geometry: &Geometry)
        -> ProjResult<Geometry> {
        self.reprojector_from(src_crs, dest_crs)?.reproject(geometry)
    }

    /// Reproject a GeoJSON document given as text and return the new text
    pub fn reproject_json(&self, src_crs: impl IntoCrs, dest_crs: impl IntoCrs, text: &str) -> ProjResult<String> {
        let document = GeoJson::from_json(text)?;
        let reprojector = self.reprojector_from(src_crs, dest_crs)?;
        reprojector.reproject_document(&document)?.to_json(false)
    }

    /// Reproject a GeoJSON file into another file
    ///
    /// # Arguments
    /// * `input_path` - GeoJSON file to read
    /// * `output_path` - Where to write the reprojected document
    /// * `dest_crs` - Destination CRS; the source is the configured `src_crs`
    ///
    /// # Returns
    /// Number of geometries reprojected
    pub fn reproject_file(&self, input_path: &str, output_path: &str, dest_crs: impl IntoCrs) -> ProjResult<usize> {
        let document = GeoJson::from_json(&fs::read_to_string(input_path)?)?;
        let reprojector = self.reprojector(dest_crs)?;

        let result = reprojector.reproject_document(&document)?;
        fs::write(output_path, result.to_json(true)?)?;

        info!("Reprojected {} geometries from {} into {}", document.geometry_count(), input_path, output_path);
        Ok(document.geometry_count())
    }
}
