// crates/addon-groups-config/src/env.rs
// ============================================================================
// Module: Harness Environment
// Description: Environment-backed settings for group runs.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: addon-groups-core
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 fails closed. The provisioner path is the
//! one value where empty means "use the default" rather than an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use addon_groups_core::runtime::PROVISIONER_PATH_ENV;
use addon_groups_core::runtime::resolve_provisioner_path;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys read by the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessEnv {
    /// Provisioner binary override; empty or unset uses the default.
    ProvisionerPath,
    /// Groups document path override.
    ConfigPath,
}

impl HarnessEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProvisionerPath => PROVISIONER_PATH_ENV,
            Self::ConfigPath => "ADDON_GROUPS_CONFIG",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed harness settings derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessEnvConfig {
    /// Provisioner binary for provisioned-remote clusters.
    pub provisioner_path: PathBuf,
}

impl HarnessEnvConfig {
    /// Loads settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when the provisioner override is not valid UTF-8.
    pub fn load() -> Result<Self, String> {
        let provisioner = read_env_strict(HarnessEnv::ProvisionerPath.as_str())?;
        Ok(Self {
            provisioner_path: resolve_provisioner_path(provisioner.as_deref()),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
pub fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}
