use clap::{Arg, Command as ClapCommand, ArgAction};
use std::process;
use log::{error, LevelFilter};

use crskit::utils::config::{parse_level, Settings};
use crskit::utils::logger::Logger;
use crskit::commands::{CommandFactory, CrskitCommandFactory};

fn main() {
    let matches = ClapCommand::new("crskit")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Maurice Schilpp")
        .about("Reproject GeoJSON geometries and resolve UTM zones to EPSG codes")
        .arg(
            Arg::new("input")
                .help("Input GeoJSON file ('-' for stdin)")
                .required_unless_present_any(["zone", "zone-of", "info"])
                .index(1),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output GeoJSON file (stdout when omitted)")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("src-crs")
                .short('s')
                .long("src-crs")
                .help("Source CRS (e.g., EPSG:4326, OGC:CRS84, '+proj=utm +zone=32')")
                .value_name("CRS")
                .required(false),
        )
        .arg(
            Arg::new("dest-crs")
                .short('t')
                .long("dest-crs")
                .help("Destination CRS (e.g., EPSG:32632, EPSG:3857)")
                .value_name("CRS")
                .required_unless_present_any(["zone", "zone-of", "info"]),
        )
        .arg(
            Arg::new("precision")
                .short('p')
                .long("precision")
                .help("Round output coordinates to this many decimal digits")
                .value_name("DIGITS")
                .required(false),
        )
        .arg(
            Arg::new("extra-dims")
                .long("extra-dims")
                .help("What to do with coordinate components beyond x/y")
                .value_name("POLICY")
                .value_parser(["drop", "preserve", "reject"])
                .required(false),
        )
        .arg(
            Arg::new("pretty")
                .long("pretty")
                .help("Pretty-print the output GeoJSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("zone")
                .long("zone")
                .help("Print the EPSG code of this UTM zone (1-60)")
                .value_name("ZONE")
                .conflicts_with_all(["zone-of", "info"])
                .required(false),
        )
        .arg(
            Arg::new("south")
                .long("south")
                .help("Use the southern hemisphere zone with --zone")
                .requires("zone")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("zone-of")
                .long("zone-of")
                .help("Print the UTM zone and EPSG code containing 'lon,lat'")
                .value_name("LON,LAT")
                .allow_hyphen_values(true)
                .conflicts_with("info")
                .required(false),
        )
        .arg(
            Arg::new("info")
                .long("info")
                .help("Describe a CRS identifier")
                .value_name("CRS")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Settings file (defaults to ./crskit.toml when present)")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .help("Log level (off, error, warn, info, debug, trace)")
                .value_name("LEVEL")
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let mut settings = match Settings::load(matches.get_one::<String>("config").map(|s| s.as_str())) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            process::exit(1);
        }
    };

    if let Some(level) = matches.get_one::<String>("log-level") {
        settings.log_level = match parse_level(level) {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        };
    }
    if matches.get_flag("verbose") {
        settings.log_level = LevelFilter::Debug;
    }

    let logger = match Logger::with_level(&settings.log_file, settings.log_level) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    // RUST_LOG hands console logging over to env_logger; the log file then only gets run summaries
    if std::env::var_os("RUST_LOG").is_some() {
        env_logger::init();
    } else {
        Logger::init_global_logger(logger.clone());
    }

    let factory = CrskitCommandFactory::new();

    let command_result = factory.create_command(&matches, &settings, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
