// crates/addon-groups-core/src/core/group.rs
// ============================================================================
// Module: Test Group Model
// Description: Raw group declarations and their typed, validated form.
// Purpose: Reject unsupported cluster interfaces at construction, not dispatch.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`GroupDeclaration`] is the document form of a test group: a free-form
//! cluster interface tag plus optional parameters. [`TestGroup`] is the
//! validated form, where the interface is a closed [`ClusterTarget`] carrying
//! exactly the parameters its backend needs.
//!
//! Invariants:
//! - Unknown interface tags never map to a default interface.
//! - Ephemeral targets always carry a parsed [`KubernetesVersion`].
//! - Addon lists keep declaration order and are not deduplicated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::AddonName;
use crate::core::identifiers::GroupName;
use crate::core::identifiers::ProvisionerId;
use crate::core::version::KubernetesVersion;
use crate::core::version::VersionError;

// ============================================================================
// SECTION: Cluster Interface
// ============================================================================

/// Supported cluster interfaces.
///
/// # Invariants
/// - Variants are stable; wire tags are listed in [`ClusterInterface::parse_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterInterface {
    /// Freshly created local cluster at an exact version.
    EphemeralLocal,
    /// Cluster created by an external provisioner binary.
    ProvisionedRemote,
}

impl ClusterInterface {
    /// Returns the canonical tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EphemeralLocal => "ephemeral-local",
            Self::ProvisionedRemote => "provisioned-remote",
        }
    }

    /// Parses a declared interface tag, accepting the legacy backend names.
    #[must_use]
    pub fn parse_tag(tag: &str) -> Option<Self> {
        match tag {
            "ephemeral-local" | "kind" => Some(Self::EphemeralLocal),
            "provisioned-remote" | "konvoy" => Some(Self::ProvisionedRemote),
            _ => None,
        }
    }
}

impl fmt::Display for ClusterInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cluster configuration of a test group, with the parameters each interface requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "interface", rename_all = "kebab-case")]
pub enum ClusterTarget {
    /// Local ephemeral cluster.
    EphemeralLocal {
        /// Platform version to create.
        version: KubernetesVersion,
    },
    /// Externally provisioned cluster.
    ProvisionedRemote {
        /// Provisioner identifier passed to the backend.
        provisioner_id: ProvisionerId,
        /// Declared platform version, when one was given and parses.
        #[serde(skip_serializing_if = "Option::is_none")]
        version: Option<KubernetesVersion>,
    },
}

impl ClusterTarget {
    /// Returns the interface this target dispatches to.
    #[must_use]
    pub const fn interface(&self) -> ClusterInterface {
        match self {
            Self::EphemeralLocal {
                ..
            } => ClusterInterface::EphemeralLocal,
            Self::ProvisionedRemote {
                ..
            } => ClusterInterface::ProvisionedRemote,
        }
    }

    /// Returns the declared platform version, if any.
    #[must_use]
    pub const fn version(&self) -> Option<&KubernetesVersion> {
        match self {
            Self::EphemeralLocal {
                version,
            } => Some(version),
            Self::ProvisionedRemote {
                version,
                ..
            } => version.as_ref(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while converting a declaration into a [`TestGroup`].
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupSpecError {
    /// The declared interface tag is not supported.
    #[error("'{tag}' is not a supported clusterInterface")]
    UnsupportedClusterInterface {
        /// Offending tag.
        tag: String,
    },
    /// The interface requires a version and the field is absent.
    #[error("clusterInterface '{interface}' requires kubernetesVersion")]
    MissingVersion {
        /// Interface requiring the version.
        interface: ClusterInterface,
    },
    /// The declared version could not be parsed.
    #[error("invalid kubernetesVersion: {0}")]
    InvalidVersion(#[from] VersionError),
    /// The provisioned interface requires a provisioner identifier.
    #[error("clusterInterface '{interface}' requires provisionerId")]
    MissingProvisioner {
        /// Interface requiring the provisioner.
        interface: ClusterInterface,
    },
}

// ============================================================================
// SECTION: Declarations
// ============================================================================

/// Document form of a test group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GroupDeclaration {
    /// Cluster interface tag.
    #[serde(default)]
    pub cluster_interface: String,
    /// Platform version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes_version: Option<String>,
    /// Provisioner identifier for provisioned-remote clusters.
    #[serde(default, alias = "konvoyProvisioner", skip_serializing_if = "Option::is_none")]
    pub provisioner_id: Option<String>,
    /// Ordered addon names.
    #[serde(default)]
    pub addons: Vec<AddonName>,
}

impl GroupDeclaration {
    /// Converts the declared interface into a typed [`ClusterTarget`].
    ///
    /// # Errors
    ///
    /// Returns [`GroupSpecError`] when the tag is unsupported or a required
    /// parameter is missing or invalid.
    pub fn cluster_target(&self) -> Result<ClusterTarget, GroupSpecError> {
        let Some(interface) = ClusterInterface::parse_tag(&self.cluster_interface) else {
            return Err(GroupSpecError::UnsupportedClusterInterface {
                tag: self.cluster_interface.clone(),
            });
        };
        match interface {
            ClusterInterface::EphemeralLocal => {
                let raw = self.kubernetes_version.as_deref().ok_or(GroupSpecError::MissingVersion {
                    interface,
                })?;
                Ok(ClusterTarget::EphemeralLocal {
                    version: KubernetesVersion::parse(raw)?,
                })
            }
            ClusterInterface::ProvisionedRemote => {
                let provisioner_id = self
                    .provisioner_id
                    .as_deref()
                    .filter(|raw| !raw.trim().is_empty())
                    .map(ProvisionerId::from)
                    .ok_or(GroupSpecError::MissingProvisioner {
                        interface,
                    })?;
                // The provisioner never reads the version; keep it only when it parses.
                let version =
                    self.kubernetes_version.as_deref().and_then(|raw| KubernetesVersion::parse(raw).ok());
                Ok(ClusterTarget::ProvisionedRemote {
                    provisioner_id,
                    version,
                })
            }
        }
    }
}

// ============================================================================
// SECTION: Test Group
// ============================================================================

/// Validated test group.
///
/// # Invariants
/// - Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestGroup {
    /// Group name.
    pub name: GroupName,
    /// Cluster configuration.
    pub cluster: ClusterTarget,
    /// Ordered addon names (duplicates preserved).
    pub addons: Vec<AddonName>,
}

impl TestGroup {
    /// Builds a typed group from its declaration.
    ///
    /// # Errors
    ///
    /// Returns [`GroupSpecError`] when the cluster configuration is invalid.
    pub fn from_declaration(
        name: GroupName,
        declaration: &GroupDeclaration,
    ) -> Result<Self, GroupSpecError> {
        Ok(Self {
            name,
            cluster: declaration.cluster_target()?,
            addons: declaration.addons.clone(),
        })
    }

    /// Returns the cluster interface of the group.
    #[must_use]
    pub const fn interface(&self) -> ClusterInterface {
        self.cluster.interface()
    }
}
