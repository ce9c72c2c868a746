// crates/addon-groups-core/src/core/mod.rs
// ============================================================================
// Module: Addon Groups Core Types
// Description: Identifiers, versions, addons, and test group declarations.
// Purpose: Group the data model shared by the runtime and its collaborators.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Core types are plain data. They carry no I/O and are safe to share across
//! concurrent group runs once constructed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod addon;
pub mod group;
pub mod identifiers;
pub mod version;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use addon::Addon;
pub use addon::AddonRevisions;
pub use addon::AddonSpec;
pub use addon::ChartReference;
pub use addon::ChartValues;
pub use addon::selected_revision;
pub use group::ClusterInterface;
pub use group::ClusterTarget;
pub use group::GroupDeclaration;
pub use group::GroupSpecError;
pub use group::TestGroup;
pub use identifiers::AddonName;
pub use identifiers::GroupName;
pub use identifiers::ProvisionerId;
pub use version::KubernetesVersion;
pub use version::VersionError;
