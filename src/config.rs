//! Configuration loading.
//!
//! Search order:
//! 1. Path given with `--config` or `CF_SHELL_CONFIG` (must exist)
//! 2. `$CONFIG_DIR/cf-shell/config.toml`
//! 3. `~/.cf-shell.toml`
//! 4. Built-in defaults
//!
//! ```toml
//! [display]
//! title = "Cloudflare CLI"
//! padding = 1
//!
//! [theme]
//! informational = "#ffaa00"
//!
//! [logging]
//! file = "/tmp/cf-shell.log"
//! level = "debug"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ShellError};
use crate::render::Theme;

/// Largest accepted `display.padding`.
pub const MAX_PADDING: u16 = 8;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    pub display: DisplayConfig,
    pub theme: Theme,
    pub logging: LoggingConfig,
}

/// Text and spacing of the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub title: String,
    pub hint: String,
    pub placeholder: String,
    pub footer: String,
    pub prompt: String,
    /// Spaces before every non-empty line.
    pub padding: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "Cloudflare CLI".to_string(),
            hint: "Hint: type \"help\" to see available commands".to_string(),
            placeholder: "Enter a command (cf status / cf list / help / clear)".to_string(),
            footer: "Press Enter to run a command, type \"clear\" to clear the result".to_string(),
            prompt: ">".to_string(),
            padding: 1,
        }
    }
}

/// Where logs go and how verbose they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log file; logs are discarded when unset.
    pub file: Option<PathBuf>,
    /// Default filter directive when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl ShellConfig {
    /// Load using the standard search order.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ShellError::ConfigNotFound { path: path.to_path_buf() });
            }
            let config = Self::from_file(path)?;
            return Ok((config, ConfigSource::File(path.to_path_buf())));
        }

        for path in search_paths() {
            if path.is_file() {
                debug!(path = %path.display(), "found configuration file");
                let config = Self::from_file(&path)?;
                return Ok((config, ConfigSource::File(path)));
            }
        }

        info!("no configuration file found, using defaults");
        Ok((Self::default(), ConfigSource::Defaults))
    }

    /// Read and validate one file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ShellError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ShellError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.display.padding > MAX_PADDING {
            return Err(ShellError::ConfigInvalid {
                reason: format!(
                    "display.padding must be at most {MAX_PADDING}, got {}",
                    self.display.padding
                ),
            });
        }
        if self.display.prompt.chars().any(char::is_control) {
            return Err(ShellError::ConfigInvalid {
                reason: "display.prompt must not contain control characters".to_string(),
            });
        }
        if self.logging.level.trim().is_empty() {
            return Err(ShellError::ConfigInvalid {
                reason: "logging.level must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Candidate configuration files, most specific first.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("cf-shell").join("config.toml"));
    }
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".cf-shell.toml"));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ThemeColor;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let file = write_config("");
        let config = ShellConfig::from_file(file.path()).unwrap();
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let file = write_config(
            r##"
            [display]
            title = "Edge Shell"

            [theme]
            informational = "#ffaa00"

            [logging]
            level = "debug"
            "##,
        );
        let config = ShellConfig::from_file(file.path()).unwrap();
        assert_eq!(config.display.title, "Edge Shell");
        assert_eq!(config.display.prompt, ">");
        assert_eq!(config.theme.informational, ThemeColor::Rgb(0xff, 0xaa, 0x00));
        assert_eq!(config.theme.error, Theme::default().error);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_bad_color_is_parse_error() {
        let file = write_config("[theme]\nerror = \"not-a-color\"\n");
        let err = ShellConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ShellError::ConfigParse { .. }));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let file = write_config("[display]\ncolour = \"blue\"\n");
        assert!(matches!(
            ShellConfig::from_file(file.path()),
            Err(ShellError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_padding_is_validated() {
        let file = write_config("[display]\npadding = 40\n");
        assert!(matches!(
            ShellConfig::from_file(file.path()),
            Err(ShellError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn test_explicit_missing_path_fails() {
        let err = ShellConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ShellError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_explicit_path_is_used() {
        let file = write_config("[display]\nprompt = \"$\"\n");
        let (config, source) = ShellConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.display.prompt, "$");
        assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = toml::to_string_pretty(&ShellConfig::default()).unwrap();
        let parsed: ShellConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, ShellConfig::default());
    }
}
