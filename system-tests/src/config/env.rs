// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: addon-groups-config
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 fails closed. Unset values fall back to the
//! fixtures checked in under `system-tests/fixtures`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::num::NonZeroUsize;
use std::path::Path;
use std::path::PathBuf;

use addon_groups_config::read_env_nonempty;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Optional groups document override.
    GroupsPath,
    /// Optional addon index document override.
    IndexPath,
    /// Optional suite parallelism (positive integer).
    Parallelism,
    /// Optional JSON-lines event log destination.
    EventLog,
}

impl SystemTestEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GroupsPath => "ADDON_GROUPS_SYSTEM_TEST_GROUPS",
            Self::IndexPath => "ADDON_GROUPS_SYSTEM_TEST_INDEX",
            Self::Parallelism => "ADDON_GROUPS_SYSTEM_TEST_PARALLELISM",
            Self::EventLog => "ADDON_GROUPS_SYSTEM_TEST_EVENT_LOG",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemTestConfig {
    /// Optional groups document override.
    pub groups_path: Option<PathBuf>,
    /// Optional addon index document override.
    pub index_path: Option<PathBuf>,
    /// Optional suite parallelism.
    pub parallelism: Option<NonZeroUsize>,
    /// Optional event log destination.
    pub event_log: Option<PathBuf>,
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails validation (for example, a zero parallelism).
    pub fn load() -> Result<Self, String> {
        let groups_path = read_env_nonempty(SystemTestEnv::GroupsPath.as_str())?.map(PathBuf::from);
        let index_path = read_env_nonempty(SystemTestEnv::IndexPath.as_str())?.map(PathBuf::from);
        let parallelism = read_env_nonempty(SystemTestEnv::Parallelism.as_str())?
            .map(|value| parse_parallelism(SystemTestEnv::Parallelism.as_str(), &value))
            .transpose()?;
        let event_log = read_env_nonempty(SystemTestEnv::EventLog.as_str())?.map(PathBuf::from);
        Ok(Self {
            groups_path,
            index_path,
            parallelism,
            event_log,
        })
    }

    /// Returns the groups document path, defaulting to the checked-in fixture.
    #[must_use]
    pub fn groups_path_or(&self, fixtures: &Path) -> PathBuf {
        self.groups_path.clone().unwrap_or_else(|| fixtures.join("groups.yaml"))
    }

    /// Returns the addon index path, defaulting to the checked-in fixture.
    #[must_use]
    pub fn index_path_or(&self, fixtures: &Path) -> PathBuf {
        self.index_path.clone().unwrap_or_else(|| fixtures.join("addons.yaml"))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a positive worker count from an environment variable string.
///
/// # Errors
///
/// Returns an error when the value is non-numeric or zero.
fn parse_parallelism(name: &str, raw: &str) -> Result<NonZeroUsize, String> {
    let workers: usize =
        raw.trim().parse().map_err(|_| format!("{name} must be a positive integer"))?;
    NonZeroUsize::new(workers).ok_or_else(|| format!("{name} must be greater than zero"))
}
