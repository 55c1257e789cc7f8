//! Configuration file discovery and loading.
//!
//! The system configuration lives in `/etc`, with the image's shipped
//! default under `/usr/etc`. The first file that exists wins; there is
//! no merging between them.

use crate::config::schema::Config;
use crate::config::validator::validate;
use crate::error::{Result, UpdateError};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration locations, in priority order.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "/etc/ublue-update/ublue-update.toml",
    "/usr/etc/ublue-update/ublue-update.toml",
];

/// Find the first default config file that exists.
pub fn find_default_config_file() -> Option<PathBuf> {
    find_config_in(DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from))
}

/// Return the first candidate that is a regular file.
pub fn find_config_in<I>(candidates: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    candidates.into_iter().find(|path| path.is_file())
}

/// Load a single config file and parse it into [`Config`].
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the TOML is invalid.
pub fn load_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            UpdateError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            UpdateError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse TOML content into [`Config`].
///
/// # Arguments
///
/// * `content` - The TOML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<Config> {
    toml::from_str(content).map_err(|e| UpdateError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the configuration for this run.
///
/// An explicit path must exist. Without one, the default locations are
/// searched and built-in defaults are used when none is present.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config = match explicit {
        Some(path) => load_config_file(path)?,
        None => match find_default_config_file() {
            Some(path) => load_config_file(&path)?,
            None => {
                tracing::debug!("No configuration file found, using defaults");
                Config::default()
            }
        },
    };

    validate(&config)?;
    Ok(config)
}
