//! Configuration document loading.
//!
//! The document may be JSON or TOML; the format follows the file extension
//! and defaults to JSON.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use listmatch_model::AppConfig;

use crate::error::{ConfigParseError, IngestError, Result};

/// Serialisation format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Format implied by the file extension. Anything but `.toml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Parses a configuration document held in memory.
///
/// # Errors
///
/// The JSON or TOML syntax error, or [`ConfigParseError::Defaults`] when the
/// default threshold is not a finite number.
pub fn parse_config(
    content: &str,
    format: ConfigFormat,
) -> std::result::Result<AppConfig, ConfigParseError> {
    let config: AppConfig = match format {
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };
    config.match_options().validate()?;
    Ok(config)
}

/// Loads the configuration document at `path`.
///
/// # Errors
///
/// [`IngestError::FileRead`] when the file cannot be read,
/// [`IngestError::ConfigParse`] when it is not a valid document.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&content, ConfigFormat::from_path(path)).map_err(|source| {
        IngestError::ConfigParse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!(
        path = %path.display(),
        demos = config.demos.len(),
        "loaded configuration"
    );
    Ok(config)
}

/// Like [`load_config`] but falls back to the built-in configuration.
pub fn load_config_or_default(path: &Path) -> AppConfig {
    match load_config(path) {
        Ok(config) => config,
        Err(IngestError::FileRead { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            info!(path = %path.display(), "no configuration file, using defaults");
            AppConfig::default()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unusable configuration, using defaults");
            AppConfig::default()
        }
    }
}
