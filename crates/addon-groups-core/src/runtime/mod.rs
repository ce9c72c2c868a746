// crates/addon-groups-core/src/runtime/mod.rs
// ============================================================================
// Module: Addon Groups Runtime
// Description: Registry, resolution, provisioning, and run orchestration.
// Purpose: Execute test groups against pluggable collaborators.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules build the immutable group registry, resolve and override
//! addons, dispatch cluster provisioning, and drive group runs with scoped
//! cleanup. The suite driver and coverage validator sit on top of the same
//! runner so every entry point shares one execution path.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod cancel;
pub mod coverage;
pub mod events;
pub mod guard;
pub mod orchestrator;
pub mod overrides;
pub mod provisioner;
pub mod registry;
pub mod repository;
pub mod resolver;
pub mod suite;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use cancel::CancellationToken;
pub use coverage::CoverageError;
pub use coverage::CoverageReport;
pub use coverage::find_unhandled;
pub use events::EventOutcome;
pub use events::FileRunEventSink;
pub use events::MemoryRunEventSink;
pub use events::NoopRunEventSink;
pub use events::RunEvent;
pub use events::RunEventSink;
pub use events::RunStage;
pub use events::StderrRunEventSink;
pub use guard::CleanupLog;
pub use guard::CleanupScope;
pub use guard::ClusterGuard;
pub use guard::HarnessGuard;
pub use guard::ReleaseFailure;
pub use orchestrator::GroupRunner;
pub use orchestrator::RunError;
pub use orchestrator::RunReport;
pub use overrides::OverrideLookup;
pub use overrides::OverrideOutcome;
pub use overrides::OverrideRegistry;
pub use provisioner::ClusterProvisioner;
pub use provisioner::DEFAULT_PROVISIONER_PATH;
pub use provisioner::PROVISIONER_PATH_ENV;
pub use provisioner::ProvisionError;
pub use provisioner::resolve_provisioner_path;
pub use registry::GroupRegistry;
pub use registry::RegistryError;
pub use repository::InMemoryAddonRepository;
pub use resolver::AddonResolver;
pub use resolver::ResolveError;
pub use suite::COVERAGE_CASE;
pub use suite::CaseOutcome;
pub use suite::CaseStatus;
pub use suite::SuiteCase;
pub use suite::SuiteDriver;
pub use suite::SuiteOptions;
pub use suite::SuiteReport;
