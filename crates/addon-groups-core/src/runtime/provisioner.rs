// crates/addon-groups-core/src/runtime/provisioner.rs
// ============================================================================
// Module: Cluster Provisioner Selector
// Description: Dispatches a group's cluster target to its provisioning backend.
// Purpose: Turn a typed cluster target into a live, exclusively owned handle.
// Dependencies: crate::core, crate::interfaces, crate::runtime::cancel
// ============================================================================

//! ## Overview
//! Dispatch is a match over the closed [`ClusterTarget`] sum type, so an
//! unsupported interface can never reach a backend and there is no default
//! interface. Provisioned-remote clusters use the provisioner binary named by
//! `ADDON_GROUPS_PROVISIONER_PATH`, or the compiled-in default when that
//! variable is unset or empty.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::core::ClusterTarget;
use crate::core::TestGroup;
use crate::interfaces::Cluster;
use crate::interfaces::ClusterError;
use crate::interfaces::EphemeralClusterBackend;
use crate::interfaces::ProvisionedClusterBackend;
use crate::runtime::cancel::CancellationToken;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable overriding the provisioner binary path.
pub const PROVISIONER_PATH_ENV: &str = "ADDON_GROUPS_PROVISIONER_PATH";
/// Provisioner binary used when no override is set.
pub const DEFAULT_PROVISIONER_PATH: &str = "/usr/local/bin/konvoy";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Cluster provisioning errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    /// The backend failed to create the cluster.
    #[error(transparent)]
    Cluster(#[from] ClusterError),
    /// Cancellation was requested before provisioning started.
    #[error("cluster provisioning cancelled")]
    Cancelled,
}

// ============================================================================
// SECTION: Path Resolution
// ============================================================================

/// Resolves the provisioner binary path from an optional override value.
///
/// Empty or whitespace-only overrides fall back to the default.
#[must_use]
pub fn resolve_provisioner_path(override_value: Option<&str>) -> PathBuf {
    override_value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_PROVISIONER_PATH), PathBuf::from)
}

// ============================================================================
// SECTION: Selector
// ============================================================================

/// Provisioning backends keyed by cluster interface.
#[derive(Clone)]
pub struct ClusterProvisioner {
    /// Backend for ephemeral local clusters.
    ephemeral: Arc<dyn EphemeralClusterBackend>,
    /// Backend for provisioned remote clusters.
    provisioned: Arc<dyn ProvisionedClusterBackend>,
    /// Provisioner binary path for remote clusters.
    provisioner_path: PathBuf,
}

impl ClusterProvisioner {
    /// Creates a selector with an explicit provisioner path.
    #[must_use]
    pub fn new(
        ephemeral: Arc<dyn EphemeralClusterBackend>,
        provisioned: Arc<dyn ProvisionedClusterBackend>,
        provisioner_path: PathBuf,
    ) -> Self {
        Self {
            ephemeral,
            provisioned,
            provisioner_path,
        }
    }

    /// Creates a selector whose provisioner path comes from an optional
    /// environment value (see [`resolve_provisioner_path`]).
    #[must_use]
    pub fn with_path_override(
        ephemeral: Arc<dyn EphemeralClusterBackend>,
        provisioned: Arc<dyn ProvisionedClusterBackend>,
        override_value: Option<&str>,
    ) -> Self {
        Self::new(ephemeral, provisioned, resolve_provisioner_path(override_value))
    }

    /// Returns the provisioner binary path used for remote clusters.
    #[must_use]
    pub fn provisioner_path(&self) -> &Path {
        &self.provisioner_path
    }

    /// Provisions a cluster for a validated group.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Cancelled`] when cancellation was requested and
    /// [`ProvisionError::Cluster`] when the backend fails.
    pub fn provision(
        &self,
        group: &TestGroup,
        cancel: &CancellationToken,
    ) -> Result<Box<dyn Cluster>, ProvisionError> {
        if cancel.is_cancelled() {
            return Err(ProvisionError::Cancelled);
        }
        let cluster = match &group.cluster {
            ClusterTarget::EphemeralLocal {
                version,
            } => self.ephemeral.create_ephemeral(version, cancel)?,
            ClusterTarget::ProvisionedRemote {
                provisioner_id,
                ..
            } => self.provisioned.create_provisioned(&self.provisioner_path, provisioner_id, cancel)?,
        };
        Ok(cluster)
    }
}
