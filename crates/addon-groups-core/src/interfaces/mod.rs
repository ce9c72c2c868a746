// crates/addon-groups-core/src/interfaces/mod.rs
// ============================================================================
// Module: Addon Groups Interfaces
// Description: Contracts for the addon repository, cluster backends,
//              controller deployment, and test harnesses.
// Purpose: Keep provisioners and harness internals out of the core.
// Dependencies: crate::core, crate::runtime::cancel
// ============================================================================

//! ## Overview
//! The core drives group runs through these narrow contracts and never embeds
//! backend-specific behavior. Implementations own their timeouts; the core
//! only threads a [`CancellationToken`] through the long-running calls.
//!
//! Ownership rules:
//! - A [`Cluster`] handle is owned by exactly one run and released once.
//! - A [`Harness`] is owned by exactly one run and released before its cluster.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::core::Addon;
use crate::core::AddonRevisions;
use crate::core::ClusterInterface;
use crate::core::KubernetesVersion;
use crate::core::ProvisionerId;
use crate::runtime::cancel::CancellationToken;

// ============================================================================
// SECTION: Addon Repository
// ============================================================================

/// Addon repository errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The repository could not produce its listing.
    #[error("addon repository listing failed: {0}")]
    Listing(String),
}

/// Source of addon definitions.
pub trait AddonRepository: Send + Sync {
    /// Returns every addon with all of its revisions; index 0 of each inner
    /// sequence is the selected revision.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the listing cannot be produced.
    fn list_addons(&self) -> Result<Vec<AddonRevisions>, RepositoryError>;
}

// ============================================================================
// SECTION: Clusters
// ============================================================================

/// Descriptor handed to collaborators that need to reach a live cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterAccess {
    /// Backend-assigned cluster name.
    pub name: String,
    /// Interface the cluster was created through.
    pub interface: ClusterInterface,
    /// Platform version reported by the backend.
    pub version: Option<KubernetesVersion>,
    /// Kubeconfig for the cluster, when the backend exposes one.
    pub kubeconfig: Option<PathBuf>,
}

/// Cluster backend errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    /// Cluster creation failed.
    #[error("cluster creation failed: {0}")]
    Create(String),
    /// Cluster teardown failed.
    #[error("cluster release failed: {0}")]
    Release(String),
}

/// Live cluster owned by a single run.
pub trait Cluster: Send {
    /// Returns the access descriptor for the cluster.
    fn access(&self) -> &ClusterAccess;

    /// Tears down the underlying cluster resource.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError`] when teardown fails.
    fn release(&mut self) -> Result<(), ClusterError>;
}

/// Backend creating local ephemeral clusters.
pub trait EphemeralClusterBackend: Send + Sync {
    /// Creates a fresh cluster at the requested version.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError`] when the cluster cannot be created.
    fn create_ephemeral(
        &self,
        version: &KubernetesVersion,
        cancel: &CancellationToken,
    ) -> Result<Box<dyn Cluster>, ClusterError>;
}

/// Backend creating clusters through an external provisioner binary.
pub trait ProvisionedClusterBackend: Send + Sync {
    /// Creates a cluster with the given provisioner binary and identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError`] when the cluster cannot be created.
    fn create_provisioned(
        &self,
        provisioner_path: &Path,
        provisioner_id: &ProvisionerId,
        cancel: &CancellationToken,
    ) -> Result<Box<dyn Cluster>, ClusterError>;
}

// ============================================================================
// SECTION: Controller Deployment
// ============================================================================

/// Controller deployment errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// The controller could not be deployed.
    #[error("controller deployment failed: {0}")]
    Deploy(String),
}

/// Deploys the addon controller onto a cluster.
pub trait ControllerDeployer: Send + Sync {
    /// Deploys the controller, parameterized by the cluster interface.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError`] when deployment fails.
    fn deploy_controller(
        &self,
        cluster: &ClusterAccess,
        interface: ClusterInterface,
        cancel: &CancellationToken,
    ) -> Result<(), ControllerError>;
}

// ============================================================================
// SECTION: Test Harness
// ============================================================================

/// Test harness errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HarnessError {
    /// The harness could not be constructed.
    #[error("harness setup failed: {0}")]
    Setup(String),
    /// The validation pass failed.
    #[error("addon validation failed: {0}")]
    Validate(String),
    /// The deployment pass failed.
    #[error("addon deployment failed: {0}")]
    Deploy(String),
    /// Harness teardown failed.
    #[error("harness release failed: {0}")]
    Release(String),
}

/// Builds harnesses bound to a cluster and a resolved addon set.
pub trait HarnessFactory: Send + Sync {
    /// Creates a harness for the resolved addons.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Setup`] when the harness cannot be constructed.
    fn create(
        &self,
        cluster: &ClusterAccess,
        addons: Vec<Addon>,
        cancel: &CancellationToken,
    ) -> Result<Box<dyn Harness>, HarnessError>;
}

/// Drives validation and deployment of addons against a cluster.
pub trait Harness: Send {
    /// Validates the addon set.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Validate`] when validation fails.
    fn validate(&mut self, cancel: &CancellationToken) -> Result<(), HarnessError>;

    /// Deploys the addon set.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Deploy`] when deployment fails.
    fn deploy(&mut self, cancel: &CancellationToken) -> Result<(), HarnessError>;

    /// Releases harness resources.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Release`] when teardown fails.
    fn release(&mut self) -> Result<(), HarnessError>;
}
