//! Error type shared by configuration and output

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors that end a run
///
/// Nothing inside the sampling loop can fail; these cover setup and the final
/// write of results.
#[derive(Debug)]
pub enum SimError {
    /// A configuration value is out of range
    InvalidConfig {
        /// Name of the offending parameter
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
    /// The configuration file could not be read
    ConfigRead { path: PathBuf, source: io::Error },
    /// The configuration file is not valid JSON for a run configuration
    ConfigParse { path: PathBuf, message: String },
    /// An output file could not be created or written
    Output { path: PathBuf, source: io::Error },
}

impl SimError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidConfig { field, reason } => {
                write!(f, "Invalid configuration '{field}': {reason}")
            }
            SimError::ConfigRead { path, source } => {
                write!(f, "Failed to read config {}: {source}", path.display())
            }
            SimError::ConfigParse { path, message } => {
                write!(f, "Failed to parse config {}: {message}", path.display())
            }
            SimError::Output { path, source } => {
                write!(f, "Failed to write {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::ConfigRead { source, .. } | SimError::Output { source, .. } => Some(source),
            SimError::InvalidConfig { .. } | SimError::ConfigParse { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_output_error_names_file() {
        let err = SimError::Output {
            path: PathBuf::from("out/phi_x.csv"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("out/phi_x.csv"), "{msg}");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_invalid_config_message() {
        let err = SimError::invalid("grid_size", "must be positive");
        assert_eq!(err.to_string(), "Invalid configuration 'grid_size': must be positive");
        assert!(err.source().is_none());
    }
}
