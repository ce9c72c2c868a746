// crates/addon-groups-core/src/runtime/resolver.rs
// ============================================================================
// Module: Addon Resolver
// Description: Resolves requested addon names against a repository listing.
// Purpose: Produce exactly one overridden addon per requested name, or fail.
// Dependencies: crate::core, crate::interfaces, crate::runtime::overrides
// ============================================================================

//! ## Overview
//! Resolution takes one repository listing per call. For each requested name,
//! in request order, every selected revision with that name is overridden and
//! appended. A name requested a second time contributes nothing. The result
//! must have exactly as many entries as were requested, each name matching
//! exactly one entry; otherwise resolution fails with
//! [`ResolveError::Mismatch`], which records which names were missing,
//! requested twice, or matched by several repository entries. A missing name
//! and an ambiguous one never cancel each other out.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;

use crate::core::Addon;
use crate::core::AddonName;
use crate::core::selected_revision;
use crate::interfaces::AddonRepository;
use crate::interfaces::RepositoryError;
use crate::runtime::overrides::OverrideRegistry;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Addon resolution errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The repository listing failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// The resolved count differs from the requested count.
    #[error(
        "got {actual} addons, expected {requested} (missing: {missing:?}, duplicated: \
         {duplicated:?}, ambiguous: {ambiguous:?})"
    )]
    Mismatch {
        /// Number of requested names.
        requested: usize,
        /// Number of resolved addons.
        actual: usize,
        /// Requested names with no repository entry.
        missing: Vec<AddonName>,
        /// Names requested more than once.
        duplicated: Vec<AddonName>,
        /// Names matched by more than one repository entry.
        ambiguous: Vec<AddonName>,
    },
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolves addon names through a repository and the override registry.
#[derive(Clone)]
pub struct AddonResolver {
    /// Addon source.
    repository: Arc<dyn AddonRepository>,
    /// Overrides applied to every matched addon.
    overrides: OverrideRegistry,
}

impl AddonResolver {
    /// Creates a resolver over a repository and override registry.
    #[must_use]
    pub fn new(repository: Arc<dyn AddonRepository>, overrides: OverrideRegistry) -> Self {
        Self {
            repository,
            overrides,
        }
    }

    /// Returns the underlying repository.
    #[must_use]
    pub fn repository(&self) -> &Arc<dyn AddonRepository> {
        &self.repository
    }

    /// Returns the override registry.
    #[must_use]
    pub const fn overrides(&self) -> &OverrideRegistry {
        &self.overrides
    }

    /// Resolves the requested names into overridden addons, in request order.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Repository`] when the listing fails and
    /// [`ResolveError::Mismatch`] when any name does not match exactly one entry.
    pub fn resolve(&self, names: &[AddonName]) -> Result<Vec<Addon>, ResolveError> {
        let listing = self.repository.list_addons()?;
        let selected: Vec<&Addon> =
            listing.iter().filter_map(|revisions| selected_revision(revisions)).collect();

        let mut resolved = Vec::with_capacity(names.len());
        let mut requested = BTreeSet::new();
        let mut missing = Vec::new();
        let mut duplicated = Vec::new();
        let mut ambiguous = Vec::new();

        for name in names {
            if !requested.insert(name) {
                if !duplicated.contains(name) {
                    duplicated.push(name.clone());
                }
                continue;
            }
            let mut matches = 0_usize;
            for addon in selected.iter().filter(|addon| addon.name == *name) {
                let mut addon = (*addon).clone();
                self.overrides.apply(&mut addon);
                resolved.push(addon);
                matches += 1;
            }
            match matches {
                0 => missing.push(name.clone()),
                1 => {}
                _ => ambiguous.push(name.clone()),
            }
        }

        let exact = missing.is_empty() && duplicated.is_empty() && ambiguous.is_empty();
        if !exact || resolved.len() != names.len() {
            return Err(ResolveError::Mismatch {
                requested: names.len(),
                actual: resolved.len(),
                missing,
                duplicated,
                ambiguous,
            });
        }
        Ok(resolved)
    }
}
