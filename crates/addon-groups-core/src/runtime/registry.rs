// crates/addon-groups-core/src/runtime/registry.rs
// ============================================================================
// Module: Group Registry
// Description: Frozen lookup table of named test groups.
// Purpose: Replace process-wide group state with an explicit immutable value.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The registry is built once from group declarations and never mutated
//! afterwards, so concurrent runs may read it without synchronization.
//! Each declaration is converted into a typed [`TestGroup`] at construction.
//! A declaration that fails conversion stays in the registry as an invalid
//! entry: looking it up fails for that group only, while its addon list still
//! counts towards coverage.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use thiserror::Error;

use crate::core::AddonName;
use crate::core::GroupDeclaration;
use crate::core::GroupName;
use crate::core::GroupSpecError;
use crate::core::TestGroup;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Group lookup errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No group with the requested name exists.
    #[error("{name} group does not exist in the group registry")]
    NotFound {
        /// Requested group name.
        name: String,
    },
    /// The group exists but its declaration is invalid.
    #[error("{name} group is invalid: {source}")]
    Invalid {
        /// Requested group name.
        name: String,
        /// Conversion failure recorded at construction.
        source: GroupSpecError,
    },
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Registry entry pairing the raw declaration with its typed form.
#[derive(Debug, Clone)]
struct RegisteredGroup {
    /// Declaration as loaded.
    declaration: GroupDeclaration,
    /// Typed group, or the reason conversion failed.
    group: Result<TestGroup, GroupSpecError>,
}

/// Immutable registry of test groups keyed by name.
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    /// Entries keyed by group name.
    groups: BTreeMap<GroupName, RegisteredGroup>,
}

impl GroupRegistry {
    /// Builds a registry from named declarations.
    ///
    /// Later declarations with a repeated name replace earlier ones.
    #[must_use]
    pub fn from_declarations(
        declarations: impl IntoIterator<Item = (GroupName, GroupDeclaration)>,
    ) -> Self {
        let groups = declarations
            .into_iter()
            .map(|(name, declaration)| {
                let group = TestGroup::from_declaration(name.clone(), &declaration);
                (
                    name,
                    RegisteredGroup {
                        declaration,
                        group,
                    },
                )
            })
            .collect();
        Self {
            groups,
        }
    }

    /// Looks up a valid group by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when the name is unknown and
    /// [`RegistryError::Invalid`] when its declaration failed conversion.
    pub fn lookup(&self, name: &str) -> Result<&TestGroup, RegistryError> {
        let entry = self.groups.get(name).ok_or_else(|| RegistryError::NotFound {
            name: name.to_string(),
        })?;
        entry.group.as_ref().map_err(|source| RegistryError::Invalid {
            name: name.to_string(),
            source: source.clone(),
        })
    }

    /// Returns the raw declaration of a group.
    #[must_use]
    pub fn declaration(&self, name: &str) -> Option<&GroupDeclaration> {
        self.groups.get(name).map(|entry| &entry.declaration)
    }

    /// Returns the number of declared groups, valid or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true when no group is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterates declared group names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &GroupName> {
        self.groups.keys()
    }

    /// Iterates the valid groups in name order.
    pub fn groups(&self) -> impl Iterator<Item = &TestGroup> {
        self.groups.values().filter_map(|entry| entry.group.as_ref().ok())
    }

    /// Returns every group whose declaration failed conversion.
    #[must_use]
    pub fn invalid_groups(&self) -> Vec<(&GroupName, &GroupSpecError)> {
        self.groups
            .iter()
            .filter_map(|(name, entry)| entry.group.as_ref().err().map(|err| (name, err)))
            .collect()
    }

    /// Iterates every declared addon list, including those of invalid groups.
    pub fn addon_lists(&self) -> impl Iterator<Item = (&GroupName, &[AddonName])> {
        self.groups.iter().map(|(name, entry)| (name, entry.declaration.addons.as_slice()))
    }

    /// Returns true when any group declares the addon.
    #[must_use]
    pub fn lists_addon(&self, addon: &str) -> bool {
        self.addon_lists().any(|(_, addons)| addons.iter().any(|name| name.as_str() == addon))
    }

    /// Returns, per group, the addon names declared more than once.
    #[must_use]
    pub fn duplicate_addons(&self) -> BTreeMap<&GroupName, Vec<&AddonName>> {
        let mut duplicates = BTreeMap::new();
        for (group, addons) in self.addon_lists() {
            let mut seen = BTreeSet::new();
            let mut repeated = BTreeSet::new();
            for addon in addons {
                if !seen.insert(addon) {
                    repeated.insert(addon);
                }
            }
            if !repeated.is_empty() {
                duplicates.insert(group, repeated.into_iter().collect());
            }
        }
        duplicates
    }
}
