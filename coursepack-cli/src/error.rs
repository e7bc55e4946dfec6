//! CLI error type.

use std::fmt;

use coursepack::config::ConfigError;
use coursepack::logging::LoggingError;
use coursepack::StageError;

/// Errors surfaced by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Missing or invalid setting (CLI argument or config value).
    Config(String),
    /// Config file could not be read or written.
    ConfigFile(ConfigError),
    /// Logging could not be set up.
    Logging(LoggingError),
    /// Loading or staging a module failed.
    Stage(StageError),
    /// Validation produced this many findings.
    Validation(usize),
}

impl CliError {
    /// Follow-up advice printed after the error, when there is any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CliError::Stage(e) if e.is_not_found() => {
                Some("Check the module folder path and that the required files exist.")
            }
            CliError::ConfigFile(_) => {
                Some("Fix or remove the file shown by 'coursepack config path'.")
            }
            _ => None,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "Config file error: {}", e),
            CliError::Logging(e) => write!(f, "Logging error: {}", e),
            CliError::Stage(e) => write!(f, "Staging error: {}", e),
            CliError::Validation(count) => {
                write!(f, "Validation failed with {} finding(s)", count)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Stage(e) => Some(e),
            CliError::Config(_) | CliError::Validation(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<StageError> for CliError {
    fn from(e: StageError) -> Self {
        CliError::Stage(e)
    }
}
