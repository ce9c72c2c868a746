// crates/addon-groups-config/src/lib.rs
// ============================================================================
// Module: Addon Groups Config Library
// Description: Group declarations, override documents, and environment input.
// Purpose: Single source of truth for groups document semantics.
// Dependencies: addon-groups-core, serde, serde_yaml, toml
// ============================================================================

//! ## Overview
//! `addon-groups-config` loads the groups document into a frozen
//! [`addon_groups_core::GroupRegistry`], reads override and addon index
//! documents, and parses the harness environment. All inputs are bounded and
//! fail closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod document;
pub mod env;
pub mod sources;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConfigError;
pub use config::DEFAULT_CONFIG_NAME;
pub use config::GroupsConfig;
pub use config::GroupsDocument;
pub use document::DocumentFormat;
pub use env::HarnessEnv;
pub use env::HarnessEnvConfig;
pub use env::read_env_nonempty;
pub use env::read_env_strict;
pub use sources::OverridesDocument;
pub use sources::load_addon_index;
pub use sources::load_overrides;
