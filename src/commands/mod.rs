//! CLI command implementations
//!
//! This module contains implementations of various commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod reproject_command;
pub mod zone_command;
pub mod info_command;

pub use command_traits::{Command, CommandFactory};
pub use reproject_command::ReprojectCommand;
pub use zone_command::ZoneCommand;
pub use info_command::InfoCommand;

use clap::ArgMatches;
use crate::utils::config::Settings;
use crate::utils::logger::Logger;
use crate::projection::errors::ProjResult;

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the command-line arguments and creates
/// the appropriate command instance for execution.
#[derive(Default)]
pub struct CrskitCommandFactory;

impl CrskitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        CrskitCommandFactory
    }
}

impl<'a> CommandFactory<'a> for CrskitCommandFactory {
    fn create_command(&self, args: &ArgMatches, settings: &Settings, logger: &'a Logger)
        -> ProjResult<Box<dyn Command + 'a>> {
        // Determine which command to run based on args
        if args.contains_id("zone") || args.contains_id("zone-of") {
            Ok(Box::new(ZoneCommand::new(args, logger)?))
        } else if args.contains_id("info") {
            Ok(Box::new(InfoCommand::new(args, logger)?))
        } else {
            // Default to reprojection
            Ok(Box::new(ReprojectCommand::new(args, settings, logger)?))
        }
    }
}
