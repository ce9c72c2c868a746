// crates/addon-groups-core/src/runtime/orchestrator.rs
// ============================================================================
// Module: Run Orchestrator
// Description: Drives one named test group from lookup to cleanup.
// Purpose: Provision, deploy, resolve, validate and deploy with guaranteed
//          reverse-order cleanup.
// Dependencies: crate::core, crate::interfaces, crate::runtime
// ============================================================================

//! ## Overview
//! [`GroupRunner::run_group`] executes, in order:
//! 1. group lookup,
//! 2. cluster provisioning (the cluster is now guarded),
//! 3. controller deployment for the group's interface,
//! 4. addon resolution with overrides,
//! 5. harness construction (the harness is now guarded),
//! 6. one validation pass, then one deployment pass.
//!
//! The first failure aborts the run. Cleanup is scope-bound: the harness guard
//! is declared after the cluster guard, so leaving the step function by any
//! path, a panic included, releases the harness and then the cluster, each
//! exactly once. Cancellation is checked before every step.
//!
//! Nothing is retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::core::AddonName;
use crate::core::ClusterInterface;
use crate::core::GroupName;
use crate::core::GroupSpecError;
use crate::interfaces::ClusterAccess;
use crate::interfaces::ControllerDeployer;
use crate::interfaces::ControllerError;
use crate::interfaces::HarnessError;
use crate::interfaces::HarnessFactory;
use crate::runtime::cancel::CancellationToken;
use crate::runtime::events::EventOutcome;
use crate::runtime::events::NoopRunEventSink;
use crate::runtime::events::RunEvent;
use crate::runtime::events::RunEventSink;
use crate::runtime::events::RunStage;
use crate::runtime::guard::CleanupLog;
use crate::runtime::guard::CleanupScope;
use crate::runtime::guard::ClusterGuard;
use crate::runtime::guard::HarnessGuard;
use crate::runtime::guard::ReleaseFailure;
use crate::runtime::provisioner::ClusterProvisioner;
use crate::runtime::provisioner::ProvisionError;
use crate::runtime::registry::GroupRegistry;
use crate::runtime::registry::RegistryError;
use crate::runtime::resolver::AddonResolver;
use crate::runtime::resolver::ResolveError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Group run errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Cleanup has already run when any variant is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// No group with the requested name exists.
    #[error("{name} group does not exist in the group registry")]
    GroupNotFound {
        /// Requested group name.
        name: String,
    },
    /// The group's declaration is invalid.
    #[error("{name} group is invalid: {source}")]
    InvalidGroup {
        /// Requested group name.
        name: String,
        /// Declaration failure.
        source: GroupSpecError,
    },
    /// Cancellation was requested before a step or cleanup started.
    #[error("run cancelled before {}", .stage.as_str())]
    Cancelled {
        /// Step that did not start.
        stage: RunStage,
    },
    /// Cluster provisioning failed.
    #[error("provisioning failed: {0}")]
    Provision(ProvisionError),
    /// Controller deployment failed.
    #[error(transparent)]
    Controller(#[from] ControllerError),
    /// Addon resolution failed.
    #[error("addon resolution failed: {0}")]
    Resolve(#[from] ResolveError),
    /// Harness construction failed.
    #[error(transparent)]
    Harness(HarnessError),
    /// The validation pass failed.
    #[error(transparent)]
    Validate(HarnessError),
    /// The deployment pass failed.
    #[error(transparent)]
    Deploy(HarnessError),
}

impl RunError {
    /// Returns the step the error belongs to.
    #[must_use]
    pub const fn stage(&self) -> RunStage {
        match self {
            Self::GroupNotFound {
                ..
            }
            | Self::InvalidGroup {
                ..
            } => RunStage::Lookup,
            Self::Cancelled {
                stage,
            } => *stage,
            Self::Provision(_) => RunStage::Provision,
            Self::Controller(_) => RunStage::Controller,
            Self::Resolve(_) => RunStage::Resolve,
            Self::Harness(_) => RunStage::Harness,
            Self::Validate(_) => RunStage::Validate,
            Self::Deploy(_) => RunStage::Deploy,
        }
    }

    /// Returns the outcome an event for this error should carry.
    const fn outcome(&self) -> EventOutcome {
        match self {
            Self::Cancelled {
                ..
            } => EventOutcome::Cancelled,
            _ => EventOutcome::Error,
        }
    }
}

impl From<RegistryError> for RunError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound {
                name,
            } => Self::GroupNotFound {
                name,
            },
            RegistryError::Invalid {
                name,
                source,
            } => Self::InvalidGroup {
                name,
                source,
            },
        }
    }
}

impl From<ProvisionError> for RunError {
    fn from(err: ProvisionError) -> Self {
        match err {
            ProvisionError::Cancelled => Self::Cancelled {
                stage: RunStage::Provision,
            },
            other => Self::Provision(other),
        }
    }
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Summary of a successful group run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Group that ran.
    pub group: GroupName,
    /// Cluster interface the group used.
    pub interface: ClusterInterface,
    /// Cluster the addons were tested on.
    pub cluster: ClusterAccess,
    /// Addons validated and deployed, in group order.
    pub addons: Vec<AddonName>,
    /// Releases that failed during cleanup.
    pub cleanup_failures: Vec<ReleaseFailure>,
}

impl RunReport {
    /// Returns true when cleanup completed without failures.
    #[must_use]
    pub fn cleanup_clean(&self) -> bool {
        self.cleanup_failures.is_empty()
    }
}

/// Step output carried out of the guarded scope.
struct Completed {
    /// Group that ran.
    group: GroupName,
    /// Cluster interface the group used.
    interface: ClusterInterface,
    /// Cluster descriptor.
    cluster: ClusterAccess,
    /// Addons that ran.
    addons: Vec<AddonName>,
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Drives group runs against shared, read-only collaborators.
#[derive(Clone)]
pub struct GroupRunner {
    /// Declared groups.
    registry: Arc<GroupRegistry>,
    /// Cluster backends.
    provisioner: ClusterProvisioner,
    /// Controller deployment.
    controller: Arc<dyn ControllerDeployer>,
    /// Addon resolution with overrides.
    resolver: AddonResolver,
    /// Harness construction.
    harnesses: Arc<dyn HarnessFactory>,
    /// Event destination.
    sink: Arc<dyn RunEventSink>,
}

impl GroupRunner {
    /// Creates a runner that discards run events.
    #[must_use]
    pub fn new(
        registry: Arc<GroupRegistry>,
        provisioner: ClusterProvisioner,
        controller: Arc<dyn ControllerDeployer>,
        resolver: AddonResolver,
        harnesses: Arc<dyn HarnessFactory>,
    ) -> Self {
        Self {
            registry,
            provisioner,
            controller,
            resolver,
            harnesses,
            sink: Arc::new(NoopRunEventSink),
        }
    }

    /// Routes run events to the given sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn RunEventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Returns the group registry.
    #[must_use]
    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    /// Returns the addon resolver.
    #[must_use]
    pub const fn resolver(&self) -> &AddonResolver {
        &self.resolver
    }

    /// Returns the event sink.
    #[must_use]
    pub fn event_sink(&self) -> &Arc<dyn RunEventSink> {
        &self.sink
    }

    /// Runs one group end to end.
    ///
    /// # Errors
    ///
    /// Returns the first [`RunError`] hit. Cleanup has completed by the time
    /// this returns, whatever the outcome.
    pub fn run_group(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<RunReport, RunError> {
        self.emit(name, RunStage::Run, EventOutcome::Started, None);
        let log = CleanupLog::new();
        let outcome = self.execute(name, cancel, &log);
        let cleanup_failures = log.into_failures();
        match outcome {
            Ok(completed) => {
                self.emit(name, RunStage::Run, EventOutcome::Ok, None);
                Ok(RunReport {
                    group: completed.group,
                    interface: completed.interface,
                    cluster: completed.cluster,
                    addons: completed.addons,
                    cleanup_failures,
                })
            }
            Err(err) => {
                self.emit(name, RunStage::Run, err.outcome(), Some(err.to_string()));
                Err(err)
            }
        }
    }

    /// Executes the steps inside the guarded scope.
    fn execute(
        &self,
        name: &str,
        cancel: &CancellationToken,
        log: &CleanupLog,
    ) -> Result<Completed, RunError> {
        let scope = CleanupScope::new(name, self.sink.as_ref(), log);

        self.step(name, RunStage::Lookup, cancel)?;
        let group = self.finish(name, RunStage::Lookup, self.registry.lookup(name))?;

        self.step(name, RunStage::Provision, cancel)?;
        let cluster = self.finish(name, RunStage::Provision, self.provisioner.provision(group, cancel))?;
        let access = cluster.access().clone();
        let _cluster_guard = ClusterGuard::new(cluster, scope);

        self.step(name, RunStage::Controller, cancel)?;
        let deployed = self.controller.deploy_controller(&access, group.interface(), cancel);
        self.finish(name, RunStage::Controller, deployed)?;

        self.step(name, RunStage::Resolve, cancel)?;
        let addons = self.finish(name, RunStage::Resolve, self.resolver.resolve(&group.addons))?;

        self.step(name, RunStage::Harness, cancel)?;
        let harness = self
            .harnesses
            .create(&access, addons, cancel)
            .map_err(RunError::Harness);
        let mut harness_guard = HarnessGuard::new(self.finish(name, RunStage::Harness, harness)?, scope);

        self.step(name, RunStage::Validate, cancel)?;
        let validated = harness_guard.validate(cancel).map_err(RunError::Validate);
        self.finish(name, RunStage::Validate, validated)?;

        self.step(name, RunStage::Deploy, cancel)?;
        let deployed = harness_guard.deploy(cancel).map_err(RunError::Deploy);
        self.finish(name, RunStage::Deploy, deployed)?;
        self.ensure_live(name, RunStage::ReleaseHarness, cancel)?;

        Ok(Completed {
            group: group.name.clone(),
            interface: group.interface(),
            cluster: access,
            addons: group.addons.clone(),
        })
    }

    /// Emits a start event, or fails when cancellation was requested.
    fn step(&self, name: &str, stage: RunStage, cancel: &CancellationToken) -> Result<(), RunError> {
        self.ensure_live(name, stage, cancel)?;
        self.emit(name, stage, EventOutcome::Started, None);
        Ok(())
    }

    /// Fails when cancellation was requested, without starting a step.
    fn ensure_live(&self, name: &str, stage: RunStage, cancel: &CancellationToken) -> Result<(), RunError> {
        if cancel.is_cancelled() {
            self.emit(name, stage, EventOutcome::Cancelled, None);
            return Err(RunError::Cancelled {
                stage,
            });
        }
        Ok(())
    }

    /// Emits the outcome of a step and converts its error.
    fn finish<T, E>(&self, name: &str, stage: RunStage, result: Result<T, E>) -> Result<T, RunError>
    where
        E: Into<RunError>,
    {
        match result {
            Ok(value) => {
                self.emit(name, stage, EventOutcome::Ok, None);
                Ok(value)
            }
            Err(err) => {
                let err = err.into();
                self.emit(name, stage, err.outcome(), Some(err.to_string()));
                Err(err)
            }
        }
    }

    /// Records one event.
    fn emit(&self, name: &str, stage: RunStage, outcome: EventOutcome, message: Option<String>) {
        self.sink.record(&RunEvent::group(name, stage, outcome, message));
    }
}
