// crates/addon-groups-config/src/sources.rs
// ============================================================================
// Module: Override and Index Documents
// Description: Loaders for chart value overrides and offline addon listings.
// Purpose: Feed the override registry and in-memory repository from files.
// Dependencies: addon-groups-core, serde
// ============================================================================

//! ## Overview
//! The override document maps addon names to opaque chart values payloads:
//!
//! ```yaml
//! metallb: |
//!   configInline: {}
//! ```
//!
//! The addon index document is a serialized repository listing, one inner
//! list of revisions per addon with the selected revision first:
//!
//! ```yaml
//! addons:
//!   - - name: traefik
//!       revision: 1.7.24-3
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;

use addon_groups_core::AddonName;
use addon_groups_core::ChartValues;
use addon_groups_core::InMemoryAddonRepository;
use addon_groups_core::OverrideRegistry;
use serde::Deserialize;

use crate::config::ConfigError;
use crate::config::MAX_NAME_LENGTH;
use crate::document::read_document;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of addons in an index or override document.
pub(crate) const MAX_INDEX_ENTRIES: usize = 4096;

// ============================================================================
// SECTION: Overrides
// ============================================================================

/// Override document as written on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct OverridesDocument {
    /// Payloads keyed by addon name.
    pub entries: BTreeMap<AddonName, ChartValues>,
}

impl OverridesDocument {
    /// Reads an override document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let document: Self = read_document(path)?;
        if document.entries.len() > MAX_INDEX_ENTRIES {
            return Err(ConfigError::Invalid("override document has too many entries".to_string()));
        }
        for name in document.entries.keys() {
            if name.as_str().trim().is_empty() || name.as_str().len() > MAX_NAME_LENGTH {
                return Err(ConfigError::Invalid(format!("invalid override addon name '{name}'")));
            }
        }
        Ok(document)
    }

    /// Converts the document into an override registry.
    #[must_use]
    pub fn into_registry(self) -> OverrideRegistry {
        self.entries.into_iter().collect()
    }
}

/// Builds the override registry for a run.
///
/// Starts from the CI defaults unless `include_defaults` is false, then layers
/// the document at `path`, if any, on top.
///
/// # Errors
///
/// Returns [`ConfigError`] when the override document fails to load.
pub fn load_overrides(
    path: Option<&Path>,
    include_defaults: bool,
) -> Result<OverrideRegistry, ConfigError> {
    let mut registry =
        if include_defaults { OverrideRegistry::ci_defaults() } else { OverrideRegistry::new() };
    if let Some(path) = path {
        registry.extend(OverridesDocument::load(path)?.into_registry());
    }
    Ok(registry)
}

// ============================================================================
// SECTION: Addon Index
// ============================================================================

/// Reads an addon index document into an in-memory repository.
///
/// # Errors
///
/// Returns [`ConfigError`] when the document cannot be read or is too large.
pub fn load_addon_index(path: &Path) -> Result<InMemoryAddonRepository, ConfigError> {
    let repository: InMemoryAddonRepository = read_document(path)?;
    if repository.len() > MAX_INDEX_ENTRIES {
        return Err(ConfigError::Invalid("addon index has too many entries".to_string()));
    }
    Ok(repository)
}
