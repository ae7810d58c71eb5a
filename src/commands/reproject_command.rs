//! GeoJSON reprojection command
//!
//! Reads a geometry, feature or feature collection from a file or stdin,
//! reprojects every geometry with a single transform and writes the result
//! to a file or stdout.

use std::fs;
use std::io::{self, Read, Write};

use clap::ArgMatches;
use log::{debug, info};

use crate::commands::command_traits::Command;
use crate::geometry::{GeoJson, Geometry};
use crate::projection::errors::{ProjError, ProjResult};
use crate::projection::reproject::{ExtraDimensions, GeometryReprojector};
use crate::utils::config::Settings;
use crate::utils::logger::Logger;
use crate::utils::progress::ProgressTracker;

/// Command for reprojecting GeoJSON documents
pub struct ReprojectCommand<'a> {
    /// Path to the input file, "-" for stdin
    input: String,
    /// Path to the output file, stdout when absent
    output: Option<String>,
    /// Source CRS identifier
    src_crs: String,
    /// Destination CRS identifier
    dest_crs: String,
    /// Output precision in decimal digits
    precision: Option<u32>,
    /// Policy for components beyond x and y
    extra_dimensions: ExtraDimensions,
    /// Pretty-print the output
    pretty: bool,
    /// Geometry count from which a progress bar is drawn
    progress_threshold: usize,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> ReprojectCommand<'a> {
    /// Create a new reproject command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `settings` - Defaults for options not given on the command line
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new ReprojectCommand instance or an error
    pub fn new(args: &ArgMatches, settings: &Settings, logger: &'a Logger) -> ProjResult<Self> {
        let input = args.get_one::<String>("input")
            .ok_or_else(|| ProjError::GenericError("Missing input file (use '-' for stdin)".to_string()))?
            .clone();

        let dest_crs = args.get_one::<String>("dest-crs")
            .ok_or_else(|| ProjError::GenericError("Missing destination CRS (--dest-crs)".to_string()))?
            .clone();

        let src_crs = args.get_one::<String>("src-crs")
            .cloned()
            .unwrap_or_else(|| settings.src_crs.clone());

        let precision = match args.get_one::<String>("precision") {
            Some(p) => Some(p.trim().parse::<u32>().map_err(|_| ProjError::GenericError(
                format!("Precision must be a non-negative integer, got '{}'", p)))?),
            None => settings.precision,
        };

        let extra_dimensions = match args.get_one::<String>("extra-dims") {
            Some(name) => ExtraDimensions::from_name(name)?,
            None => settings.extra_dimensions,
        };

        debug!("Reproject command: {} -> {} ({} to {})", input,
               args.get_one::<String>("output").map_or("stdout", |s| s.as_str()), src_crs, dest_crs);

        Ok(ReprojectCommand {
            input,
            output: args.get_one::<String>("output").cloned(),
            src_crs,
            dest_crs,
            precision,
            extra_dimensions,
            pretty: args.get_flag("pretty"),
            progress_threshold: settings.progress_threshold,
            logger,
        })
    }

    /// Read the whole input document as text
    fn read_input(&self) -> ProjResult<String> {
        if self.input == "-" {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        } else {
            Ok(fs::read_to_string(&self.input)?)
        }
    }

    /// Write the result to the output file or stdout
    fn write_output(&self, text: &str) -> ProjResult<()> {
        match &self.output {
            Some(path) => {
                fs::write(path, format!("{}\n", text))?;
                info!("Wrote reprojected GeoJSON to {}", path);
            },
            None => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                writeln!(handle, "{}", text)?;
            },
        }
        Ok(())
    }

    /// Progress bar for large documents written to a file
    fn progress_for(&self, document: &GeoJson) -> ProgressTracker {
        let total = document.geometry_count();
        if self.output.is_some() && total >= self.progress_threshold {
            ProgressTracker::new(total as u64, "Reprojecting")
        } else {
            ProgressTracker::hidden()
        }
    }
}

impl<'a> Command for ReprojectCommand<'a> {
    fn execute(&self) -> ProjResult<()> {
        let text = self.read_input()?;
        let document = GeoJson::from_json(&text)?;

        info!("Reprojecting {} ({} geometries) from {} to {}",
              document.kind(), document.geometry_count(), self.src_crs, self.dest_crs);

        let reprojector = GeometryReprojector::new(self.src_crs.as_str(), self.dest_crs.as_str(), self.precision)?
            .with_extra_dimensions(self.extra_dimensions);

        let progress = self.progress_for(&document);
        let result = document.try_map_geometries(&mut |geometry: &Geometry| {
            let reprojected = reprojector.reproject(geometry);
            progress.increment(1);
            reprojected
        })?;
        progress.finish("Completed");

        self.write_output(&result.to_json(self.pretty)?)?;

        self.logger.log_summary("Reprojection summary:", &[
            ("input", self.input.clone()),
            ("output", self.output.clone().unwrap_or_else(|| "stdout".to_string())),
            ("source", reprojector.source().description()),
            ("destination", reprojector.destination().description()),
            ("precision", reprojector.precision().map_or("full".to_string(), |p| p.to_string())),
            ("extra dimensions", self.extra_dimensions.name().to_string()),
            ("document", document.kind().to_string()),
            ("features", document.feature_count().to_string()),
            ("geometries", progress.position().to_string()),
        ])?;

        Ok(())
    }
}
