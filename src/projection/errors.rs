//! Custom error types for CRS resolution and geometry reprojection

use std::fmt;
use std::io;

/// Reprojection error types
#[derive(Debug)]
pub enum ProjError {
    /// A zone number or CRS specification could not be turned into a CRS
    InvalidCrsDefinition(String),
    /// No transformation exists between the source and destination CRS
    UnsupportedCrsPair(String, String),
    /// Coordinate structure violates the leaf or nesting invariants
    MalformedGeometry(String),
    /// I/O error
    IoError(io::Error),
    /// JSON parse or serialization error
    JsonError(serde_json::Error),
    /// Settings file could not be parsed
    ConfigError(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for ProjError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjError::InvalidCrsDefinition(msg) => write!(f, "Invalid CRS definition: {}", msg),
            ProjError::UnsupportedCrsPair(from, to) => {
                write!(f, "Unsupported coordinate transformation from {} to {}", from, to)
            },
            ProjError::MalformedGeometry(msg) => write!(f, "Malformed geometry: {}", msg),
            ProjError::IoError(e) => write!(f, "I/O error: {}", e),
            ProjError::JsonError(e) => write!(f, "JSON error: {}", e),
            ProjError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ProjError::GenericError(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for ProjError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProjError::IoError(e) => Some(e),
            ProjError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ProjError {
    fn from(error: io::Error) -> Self {
        ProjError::IoError(error)
    }
}

impl From<serde_json::Error> for ProjError {
    fn from(error: serde_json::Error) -> Self {
        ProjError::JsonError(error)
    }
}

impl From<String> for ProjError {
    fn from(msg: String) -> Self {
        ProjError::GenericError(msg)
    }
}

/// Result type for CRS and reprojection operations
pub type ProjResult<T> = Result<T, ProjError>;
