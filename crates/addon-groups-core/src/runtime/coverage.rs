// crates/addon-groups-core/src/runtime/coverage.rs
// ============================================================================
// Module: Coverage Validator
// Description: Cross-references repository addons against group addon lists.
// Purpose: Guarantee that no addon silently escapes testing.
// Dependencies: crate::core, crate::interfaces, crate::runtime::registry
// ============================================================================

//! ## Overview
//! The coverage pass reads the selected revision of every repository entry
//! and reports those whose name appears in no group's addon list. Invalid
//! groups still count: a broken declaration fails its own case, not coverage.
//! The pass has no side effects and does not touch any cluster.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::core::Addon;
use crate::core::AddonName;
use crate::core::selected_revision;
use crate::interfaces::AddonRepository;
use crate::interfaces::RepositoryError;
use crate::runtime::registry::GroupRegistry;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Coverage check errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoverageError {
    /// The repository listing failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// Some addons are covered by no group.
    #[error("the following addons are not handled as part of a testing group: {}", join_names(.names))]
    Unhandled {
        /// Offending addon names in repository order.
        names: Vec<AddonName>,
    },
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Addons present in the repository but absent from every group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    /// Number of repository entries inspected.
    pub inspected: usize,
    /// Unhandled addons (selected revisions) in repository order.
    pub unhandled: Vec<Addon>,
}

impl CoverageReport {
    /// Returns true when every repository addon belongs to a group.
    #[must_use]
    pub fn is_covered(&self) -> bool {
        self.unhandled.is_empty()
    }

    /// Returns the unhandled addon names in repository order.
    #[must_use]
    pub fn unhandled_names(&self) -> Vec<AddonName> {
        self.unhandled.iter().map(|addon| addon.name.clone()).collect()
    }

    /// Converts a non-empty report into [`CoverageError::Unhandled`].
    ///
    /// # Errors
    ///
    /// Returns [`CoverageError::Unhandled`] listing every unhandled addon.
    pub fn ensure_covered(&self) -> Result<(), CoverageError> {
        if self.is_covered() {
            return Ok(());
        }
        Err(CoverageError::Unhandled {
            names: self.unhandled_names(),
        })
    }
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Computes the coverage report for a registry and repository.
///
/// # Errors
///
/// Returns [`CoverageError::Repository`] when the listing fails.
pub fn find_unhandled(
    registry: &GroupRegistry,
    repository: &dyn AddonRepository,
) -> Result<CoverageReport, CoverageError> {
    let listing = repository.list_addons()?;
    let handled: BTreeSet<&str> = registry
        .addon_lists()
        .flat_map(|(_, addons)| addons.iter().map(AddonName::as_str))
        .collect();

    let mut report = CoverageReport::default();
    for addon in listing.iter().filter_map(|revisions| selected_revision(revisions)) {
        report.inspected += 1;
        if !handled.contains(addon.name.as_str()) {
            report.unhandled.push(addon.clone());
        }
    }
    Ok(report)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Joins addon names for display.
fn join_names(names: &[AddonName]) -> String {
    let rendered: Vec<&str> = names.iter().map(AddonName::as_str).collect();
    format!("[{}]", rendered.join(", "))
}
