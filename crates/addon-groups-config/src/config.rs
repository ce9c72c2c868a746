// crates/addon-groups-config/src/config.rs
// ============================================================================
// Module: Groups Configuration
// Description: Loading and validation of the groups document.
// Purpose: Provide strict, fail-closed group parsing with hard limits.
// Dependencies: addon-groups-core, serde, serde_yaml, toml
// ============================================================================

//! ## Overview
//! The groups document maps group names to declarations:
//!
//! ```yaml
//! general:
//!   clusterInterface: ephemeral-local
//!   kubernetesVersion: 1.16.4
//!   addons: [traefik, dashboard]
//! ```
//!
//! It is read from an explicit path, else `ADDON_GROUPS_CONFIG`, else
//! `groups.yaml`, with strict size and path limits. Files ending in `.toml`
//! are parsed as TOML, everything else as YAML. Structural problems fail the
//! whole load. Per-group semantic problems (unsupported interface, bad
//! version) are kept inside the registry so only that group's case fails;
//! [`GroupsConfig::validate_strict`] turns them into a load error instead.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use addon_groups_core::GroupDeclaration;
use addon_groups_core::GroupName;
use addon_groups_core::GroupRegistry;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::document::DocumentFormat;
use crate::document::read_document;
use crate::document::validate_path;
use crate::env::HarnessEnv;
use crate::env::read_env_nonempty;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default groups document when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "groups.yaml";
/// Maximum document size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of declared groups.
pub(crate) const MAX_GROUPS: usize = 256;
/// Maximum number of addons in one group.
pub(crate) const MAX_ADDONS_PER_GROUP: usize = 512;
/// Maximum length of group and addon names.
pub(crate) const MAX_NAME_LENGTH: usize = 253;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading a document.
    #[error("config io error: {0}")]
    Io(String),
    /// YAML or TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Document Model
// ============================================================================

/// Groups document as written on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupsDocument {
    /// Declarations keyed by group name.
    pub groups: BTreeMap<GroupName, GroupDeclaration>,
}

impl GroupsDocument {
    /// Parses a document from text in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not a valid document.
    pub fn parse(content: &str, format: DocumentFormat) -> Result<Self, ConfigError> {
        format.parse(content)
    }

    /// Checks structural limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a limit is exceeded or a name is
    /// empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.groups.len() > MAX_GROUPS {
            return Err(ConfigError::Invalid(format!(
                "too many groups ({} > {MAX_GROUPS})",
                self.groups.len()
            )));
        }
        for (name, declaration) in &self.groups {
            validate_name("group name", name.as_str())?;
            if declaration.addons.len() > MAX_ADDONS_PER_GROUP {
                return Err(ConfigError::Invalid(format!(
                    "group {name} declares too many addons ({} > {MAX_ADDONS_PER_GROUP})",
                    declaration.addons.len()
                )));
            }
            for addon in &declaration.addons {
                validate_name(&format!("addon name in group {name}"), addon.as_str())?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Loaded Config
// ============================================================================

/// Validated groups document plus the registry built from it.
#[derive(Debug, Clone)]
pub struct GroupsConfig {
    /// Document as loaded.
    document: GroupsDocument,
    /// Frozen registry.
    registry: GroupRegistry,
    /// Path the document was read from.
    source: PathBuf,
}

impl GroupsConfig {
    /// Loads the groups document using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or structural validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        let document: GroupsDocument = read_document(&resolved)?;
        Self::from_document(document, resolved)
    }

    /// Builds a config from an in-memory document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when structural validation fails.
    pub fn from_document(document: GroupsDocument, source: PathBuf) -> Result<Self, ConfigError> {
        document.validate()?;
        let registry = GroupRegistry::from_declarations(document.groups.clone());
        Ok(Self {
            document,
            registry,
            source,
        })
    }

    /// Returns the document as loaded.
    #[must_use]
    pub const fn document(&self) -> &GroupsDocument {
        &self.document
    }

    /// Returns the frozen registry.
    #[must_use]
    pub const fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    /// Returns the path the document was read from.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Fails when any group declaration is invalid.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming every invalid group.
    pub fn validate_strict(&self) -> Result<(), ConfigError> {
        let invalid = self.registry.invalid_groups();
        if invalid.is_empty() {
            return Ok(());
        }
        let details: Vec<String> =
            invalid.iter().map(|(name, err)| format!("{name}: {err}")).collect();
        Err(ConfigError::Invalid(details.join("; ")))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the groups document path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    let env_path = read_env_nonempty(HarnessEnv::ConfigPath.as_str()).map_err(ConfigError::Invalid)?;
    if let Some(env_path) = env_path {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_NAME);
    validate_path(&default)?;
    Ok(default)
}

/// Validates a group or addon name.
fn validate_name(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
