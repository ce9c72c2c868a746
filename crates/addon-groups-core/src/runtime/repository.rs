// crates/addon-groups-core/src/runtime/repository.rs
// ============================================================================
// Module: In-Memory Addon Repository
// Description: Fixed addon listing for offline checks, tests, and examples.
// Purpose: Back coverage and resolution without a live addon repository.
// Dependencies: serde, crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`InMemoryAddonRepository`] serves a fixed listing. It deserializes from
//! the addon index document (`addons: [[{name, revision, spec}]]`), where each
//! inner list holds the revisions of one addon, selected revision first.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::Addon;
use crate::core::AddonRevisions;
use crate::interfaces::AddonRepository;
use crate::interfaces::RepositoryError;

// ============================================================================
// SECTION: Repository
// ============================================================================

/// In-memory addon repository for tests and examples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InMemoryAddonRepository {
    /// Listing entries in repository order.
    #[serde(default)]
    addons: Vec<AddonRevisions>,
}

impl InMemoryAddonRepository {
    /// Creates a repository serving the given listing.
    #[must_use]
    pub const fn new(addons: Vec<AddonRevisions>) -> Self {
        Self {
            addons,
        }
    }

    /// Creates a repository with one revision per addon.
    #[must_use]
    pub fn from_addons(addons: impl IntoIterator<Item = Addon>) -> Self {
        Self::new(addons.into_iter().map(|addon| vec![addon]).collect())
    }

    /// Appends a listing entry.
    pub fn push(&mut self, revisions: AddonRevisions) {
        self.addons.push(revisions);
    }

    /// Returns the listing entries.
    #[must_use]
    pub fn entries(&self) -> &[AddonRevisions] {
        &self.addons
    }

    /// Returns the number of listing entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.addons.len()
    }

    /// Returns true when the listing is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addons.is_empty()
    }
}

impl AddonRepository for InMemoryAddonRepository {
    fn list_addons(&self) -> Result<Vec<AddonRevisions>, RepositoryError> {
        Ok(self.addons.clone())
    }
}
