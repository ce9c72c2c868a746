// crates/addon-groups-core/src/lib.rs
// ============================================================================
// Module: Addon Groups Core Library
// Description: Public API surface for addon test-group orchestration.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Addon groups core validates pluggable deployment units ("addons") against
//! ephemeral or provisioned clusters. Named test groups declare a cluster
//! configuration and the addons to validate together; the runtime resolves
//! and overrides addons, provisions a cluster, deploys the controller and
//! drives a validate/deploy cycle with guaranteed cleanup. Clusters, the
//! controller and harnesses are reached through explicit interfaces only.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::AddonRepository;
pub use interfaces::Cluster;
pub use interfaces::ClusterAccess;
pub use interfaces::ClusterError;
pub use interfaces::ControllerDeployer;
pub use interfaces::ControllerError;
pub use interfaces::EphemeralClusterBackend;
pub use interfaces::Harness;
pub use interfaces::HarnessError;
pub use interfaces::HarnessFactory;
pub use interfaces::ProvisionedClusterBackend;
pub use interfaces::RepositoryError;
pub use runtime::AddonResolver;
pub use runtime::CancellationToken;
pub use runtime::ClusterProvisioner;
pub use runtime::CoverageError;
pub use runtime::CoverageReport;
pub use runtime::GroupRegistry;
pub use runtime::GroupRunner;
pub use runtime::InMemoryAddonRepository;
pub use runtime::OverrideRegistry;
pub use runtime::ProvisionError;
pub use runtime::RegistryError;
pub use runtime::ResolveError;
pub use runtime::RunError;
pub use runtime::RunReport;
pub use runtime::SuiteDriver;
pub use runtime::SuiteReport;
