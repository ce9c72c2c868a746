// crates/addon-groups-config/src/document.rs
// ============================================================================
// Module: Document Reader
// Description: Bounded reading and format detection for config documents.
// Purpose: Share one fail-closed read path across every document kind.
// Dependencies: serde, serde_yaml, toml
// ============================================================================

//! ## Overview
//! Every document goes through [`read_document`]: path limits, a size cap,
//! UTF-8 enforcement, then YAML or TOML parsing chosen by extension.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::config::ConfigError;
use crate::config::MAX_CONFIG_FILE_SIZE;
use crate::config::MAX_PATH_COMPONENT_LENGTH;
use crate::config::MAX_TOTAL_PATH_LENGTH;

// ============================================================================
// SECTION: Formats
// ============================================================================

/// Document syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML (default).
    Yaml,
    /// TOML, selected by a `.toml` extension.
    Toml,
}

impl DocumentFormat {
    /// Picks the format from a path's extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }

    /// Parses text in this format.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text does not match `T`.
    pub fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T, ConfigError> {
        match self {
            Self::Yaml => {
                serde_yaml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
            }
            Self::Toml => toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Reader
// ============================================================================

/// Reads and parses a document with size, path, and UTF-8 limits.
///
/// # Errors
///
/// Returns [`ConfigError`] when the path is invalid, the file cannot be read,
/// exceeds the size limit, is not UTF-8, or fails to parse.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    validate_path(path)?;
    let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    let content = std::str::from_utf8(&bytes)
        .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
    DocumentFormat::from_path(path).parse(content)
}

/// Validates a path against length limits.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the path or a component is too long.
pub fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
