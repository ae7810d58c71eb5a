//! CRS description command

use clap::ArgMatches;

use crate::commands::command_traits::Command;
use crate::coordinate::{default_provider, CoordinateSystem, CoordinateSystemFactory};
use crate::projection::errors::{ProjError, ProjResult};
use crate::projection::registry::{AuthorityLookup, CrsRegistry};
use crate::utils::logger::Logger;

/// Command describing a CRS identifier
pub struct InfoCommand<'a> {
    /// CRS identifier as given on the command line
    crs_str: String,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> InfoCommand<'a> {
    /// Create a new info command
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> ProjResult<Self> {
        let crs_str = args.get_one::<String>("info")
            .ok_or_else(|| ProjError::GenericError("Missing CRS (--info)".to_string()))?
            .clone();

        Ok(InfoCommand { crs_str, logger })
    }

    /// Lines describing a coordinate system
    fn describe(&self, crs: &CoordinateSystem) -> Vec<String> {
        let mut lines = vec![
            format!("Input:       {}", self.crs_str),
            format!("Name:        {}", crs.description()),
        ];

        match CrsRegistry::global().to_authority(crs) {
            Some(authority) => lines.push(format!("Authority:   {}:{}", authority.name, authority.code)),
            None => lines.push("Authority:   unknown".to_string()),
        }

        lines.push(format!("Geographic:  {}", if crs.is_geographic() { "yes" } else { "no" }));

        let supported = default_provider().build_transform(&CoordinateSystem::WGS84, crs).is_ok();
        lines.push(format!("Transforms:  {}", if supported { "supported" } else { "not supported" }));

        lines
    }
}

impl<'a> Command for InfoCommand<'a> {
    fn execute(&self) -> ProjResult<()> {
        let crs = CoordinateSystemFactory::from_string(&self.crs_str)?;

        for line in self.describe(&crs) {
            println!("{}", line);
            self.logger.log(&line)?;
        }

        Ok(())
    }
}
