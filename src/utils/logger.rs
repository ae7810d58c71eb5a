//! Logger utility for application-wide logging
//!
//! This module provides a custom logger implementation that works alongside
//! the standard log crate, but adds file output capabilities. Console echo
//! goes to stderr so stdout stays free for GeoJSON output.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use log::{Log, Record, Metadata, LevelFilter};

/// Custom logger implementation
///
/// Clones share the same log file, so one instance can be installed as the
/// global `log` backend while commands keep another for run summaries.
#[derive(Clone)]
pub struct Logger {
    /// File handle for log output
    file: Arc<Mutex<Option<File>>>,
    /// Most verbose level written
    level: LevelFilter,
    /// Whether records are echoed to stderr
    echo: bool,
}

impl Logger {
    /// Creates a new logger instance
    ///
    /// # Arguments
    ///
    /// * `log_file` - Path to the log file
    ///
    /// # Returns
    ///
    /// A new Logger instance or an error if the file cannot be created
    pub fn new(log_file: &str) -> io::Result<Self> {
        Self::with_level(log_file, LevelFilter::Debug)
    }

    /// Creates a logger that records messages up to `level`
    pub fn with_level(log_file: &str, level: LevelFilter) -> io::Result<Self> {
        let file = File::create(Path::new(log_file))?;
        Ok(Logger {
            file: Arc::new(Mutex::new(Some(file))),
            level,
            echo: true,
        })
    }

    /// Stop echoing records to stderr
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    /// Logs a message to the log file
    ///
    /// # Arguments
    ///
    /// * `message` - The message to log
    pub fn log(&self, message: &str) -> io::Result<()> {
        let mut guard = self.file.lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        if let Some(file) = guard.as_mut() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Logs a run summary as aligned `name: value` lines
    ///
    /// # Arguments
    ///
    /// * `title` - Heading line
    /// * `entries` - Pairs of field name and value
    pub fn log_summary(&self, title: &str, entries: &[(&str, String)]) -> io::Result<()> {
        self.log(title)?;

        let width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        for (name, value) in entries {
            self.log(&format!("  {:<width$} : {}", name, value, width = width))?;
        }

        Ok(())
    }

    /// Static method to install a logger as the global `log` backend
    pub fn init_global_logger(logger: Logger) {
        let level = logger.level;

        // Set up the global logger - we'll ignore the SetLoggerError
        // since we only call this once at startup
        if log::set_boxed_logger(Box::new(logger)).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(level);
    }
}

// Implement the Log trait to make our Logger work with the log crate
impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = Logger::log(self, &message);

            if self.echo {
                eprintln!("{}", message);
            }
        }
    }

    fn flush(&self) {
        // Already flushing in the log method
    }
}
