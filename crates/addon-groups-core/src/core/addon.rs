// crates/addon-groups-core/src/core/addon.rs
// ============================================================================
// Module: Addon Model
// Description: Resolved addon revisions and their deployment specs.
// Purpose: Carry the addon data consumed by the resolver and harness.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Addons are owned by the addon repository; this crate only consumes them.
//! Each addon exposes its name and a deployment spec whose chart reference
//! carries a values slot. Overrides are assigned into that slot before the
//! addon is handed to a harness, and the addon is not mutated afterwards.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::AddonName;

// ============================================================================
// SECTION: Chart Values
// ============================================================================

/// Opaque chart values payload.
///
/// # Invariants
/// - The payload format is owned by the chart system and never interpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartValues(String);

impl ChartValues {
    /// Wraps a raw values payload.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw payload.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChartValues {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Deployment Spec
// ============================================================================

/// Chart reference used to deploy an addon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartReference {
    /// Chart name.
    #[serde(default)]
    pub chart: String,
    /// Chart repository location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    /// Chart version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Values override slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<ChartValues>,
}

/// Deployment spec of an addon revision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonSpec {
    /// Namespace the addon deploys into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Chart reference holding the values override slot.
    #[serde(default)]
    pub chart_reference: ChartReference,
}

// ============================================================================
// SECTION: Addon
// ============================================================================

/// A single addon revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
    /// Addon name.
    pub name: AddonName,
    /// Repository revision label.
    #[serde(default)]
    pub revision: String,
    /// Deployment spec.
    #[serde(default)]
    pub spec: AddonSpec,
}

impl Addon {
    /// Creates an addon revision with an empty deployment spec.
    #[must_use]
    pub fn new(name: impl Into<AddonName>, revision: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            revision: revision.into(),
            spec: AddonSpec::default(),
        }
    }

    /// Returns the addon name.
    #[must_use]
    pub const fn name(&self) -> &AddonName {
        &self.name
    }

    /// Returns the values currently assigned to the chart reference.
    #[must_use]
    pub const fn values(&self) -> Option<&ChartValues> {
        self.spec.chart_reference.values.as_ref()
    }
}

/// All revisions of one addon as returned by a repository listing.
///
/// # Invariants
/// - Index 0 is the selected revision.
pub type AddonRevisions = Vec<Addon>;

/// Returns the selected revision of a listing entry, if any.
#[must_use]
pub fn selected_revision(revisions: &[Addon]) -> Option<&Addon> {
    revisions.first()
}
