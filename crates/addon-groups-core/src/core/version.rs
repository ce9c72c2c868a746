// crates/addon-groups-core/src/core/version.rs
// ============================================================================
// Module: Kubernetes Version
// Description: Strict semantic version parsing for cluster platform versions.
// Purpose: Reject unparsable versions before any cluster is provisioned.
// Dependencies: semver, serde, thiserror
// ============================================================================

//! ## Overview
//! Ephemeral clusters are created at an exact platform version. Versions are
//! parsed by `semver` after stripping an optional `v` prefix, and rendered
//! without it, so `v1.21.0` and `1.21.0` compare equal.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted length of a version string in bytes.
const MAX_VERSION_LENGTH: usize = 128;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Version parsing errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// The version string was empty.
    #[error("version must not be empty")]
    Empty,
    /// The version string exceeded the length limit.
    #[error("version exceeds {MAX_VERSION_LENGTH} bytes")]
    TooLong,
    /// The version string is not a semantic version.
    #[error("version {version:?} is not a semantic version: {reason}")]
    Malformed {
        /// Full version string.
        version: String,
        /// Parser diagnostic.
        reason: String,
    },
}

// ============================================================================
// SECTION: Version Type
// ============================================================================

/// Semantic version of the cluster platform.
///
/// # Invariants
/// - Always a valid semantic version; the `v` prefix is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KubernetesVersion(Version);

impl KubernetesVersion {
    /// Creates a release version from its numeric components.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    /// Parses a version string, accepting an optional `v` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError`] when the input is not a valid semantic version.
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        if raw.is_empty() {
            return Err(VersionError::Empty);
        }
        if raw.len() > MAX_VERSION_LENGTH {
            return Err(VersionError::TooLong);
        }
        let body = raw.strip_prefix('v').unwrap_or(raw);
        Version::parse(body).map(Self).map_err(|err| VersionError::Malformed {
            version: raw.to_string(),
            reason: err.to_string(),
        })
    }

    /// Returns the major component.
    #[must_use]
    pub const fn major(&self) -> u64 {
        self.0.major
    }

    /// Returns the minor component.
    #[must_use]
    pub const fn minor(&self) -> u64 {
        self.0.minor
    }

    /// Returns the patch component.
    #[must_use]
    pub const fn patch(&self) -> u64 {
        self.0.patch
    }

    /// Returns the pre-release identifiers, if any.
    #[must_use]
    pub fn pre_release(&self) -> Option<&str> {
        (!self.0.pre.is_empty()).then_some(self.0.pre.as_str())
    }
}

impl fmt::Display for KubernetesVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for KubernetesVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for KubernetesVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KubernetesVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
