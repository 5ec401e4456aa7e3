//! Error types and Result alias for cf-shell

use std::io;
use std::path::PathBuf;

/// Result type alias for cf-shell operations
pub type Result<T> = std::result::Result<T, ShellError>;

/// Main error type for cf-shell
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    // === Terminal errors ===
    /// stdin or stdout is not attached to a terminal
    #[error("cf-shell needs an interactive terminal (stdin and stdout must be a TTY)")]
    NotATty,

    /// Raw mode or other terminal control failed
    #[error("terminal error: {0}")]
    Terminal(#[source] io::Error),

    /// The view could not be written to the terminal
    #[error("failed to render to the terminal: {0}")]
    Render(#[source] io::Error),

    // === Configuration errors ===
    /// An explicitly requested configuration file does not exist
    #[error("configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// Configuration file exists but could not be read
    #[error("failed to read configuration file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration file is not valid TOML for our schema
    #[error("failed to parse configuration file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration parsed but holds values we cannot use
    #[error("invalid configuration: {reason}")]
    ConfigInvalid { reason: String },

    // === Logging errors ===
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}
