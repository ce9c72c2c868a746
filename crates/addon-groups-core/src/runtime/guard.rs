// crates/addon-groups-core/src/runtime/guard.rs
// ============================================================================
// Module: Scoped Resource Guards
// Description: Drop guards releasing clusters and harnesses exactly once.
// Purpose: Tie cleanup to scope exit so no path can skip it.
// Dependencies: crate::interfaces, crate::runtime::events
// ============================================================================

//! ## Overview
//! [`ClusterGuard`] and [`HarnessGuard`] own their resource in an `Option` and
//! release it the first time [`release`](ClusterGuard::release) runs or the
//! guard drops, whichever comes first. Drop also runs while unwinding, so a
//! panicking step still releases. Declaring the harness guard after the
//! cluster guard makes scope exit release the harness first.
//!
//! Release failures never propagate. They are emitted as run events and
//! collected in a [`CleanupLog`] shared by both guards of a run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;

use serde::Serialize;

use crate::interfaces::Cluster;
use crate::interfaces::Harness;
use crate::interfaces::HarnessError;
use crate::runtime::cancel::CancellationToken;
use crate::runtime::events::EventOutcome;
use crate::runtime::events::RunEvent;
use crate::runtime::events::RunEventSink;
use crate::runtime::events::RunStage;

// ============================================================================
// SECTION: Cleanup Log
// ============================================================================

/// A release that failed during cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseFailure {
    /// Cleanup step that failed.
    pub stage: RunStage,
    /// Collaborator error text.
    pub message: String,
}

/// Collects release failures for one run.
#[derive(Debug, Default)]
pub struct CleanupLog {
    /// Failures in the order they happened.
    failures: Mutex<Vec<ReleaseFailure>>,
}

impl CleanupLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure.
    fn push(&self, failure: ReleaseFailure) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push(failure);
        }
    }

    /// Consumes the log and returns the recorded failures.
    #[must_use]
    pub fn into_failures(self) -> Vec<ReleaseFailure> {
        self.failures.into_inner().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Shared context for the guards of one run.
#[derive(Clone, Copy)]
pub struct CleanupScope<'a> {
    /// Group the guarded resources belong to.
    group: &'a str,
    /// Event destination.
    sink: &'a dyn RunEventSink,
    /// Failure collector.
    log: &'a CleanupLog,
}

impl<'a> CleanupScope<'a> {
    /// Creates a scope for one group run.
    #[must_use]
    pub fn new(group: &'a str, sink: &'a dyn RunEventSink, log: &'a CleanupLog) -> Self {
        Self {
            group,
            sink,
            log,
        }
    }

    /// Emits the outcome of one release and records failures.
    fn report(&self, stage: RunStage, result: Result<(), String>) {
        match result {
            Ok(()) => {
                self.sink.record(&RunEvent::group(self.group, stage, EventOutcome::Ok, None));
            }
            Err(message) => {
                self.sink.record(&RunEvent::group(
                    self.group,
                    stage,
                    EventOutcome::Error,
                    Some(message.clone()),
                ));
                self.log.push(ReleaseFailure {
                    stage,
                    message,
                });
            }
        }
    }
}

// ============================================================================
// SECTION: Cluster Guard
// ============================================================================

/// Owns a cluster and releases it exactly once.
pub struct ClusterGuard<'a> {
    /// Cluster until released.
    cluster: Option<Box<dyn Cluster>>,
    /// Cleanup context.
    scope: CleanupScope<'a>,
}

impl<'a> ClusterGuard<'a> {
    /// Takes ownership of a freshly provisioned cluster.
    #[must_use]
    pub fn new(cluster: Box<dyn Cluster>, scope: CleanupScope<'a>) -> Self {
        Self {
            cluster: Some(cluster),
            scope,
        }
    }

    /// Returns true once the cluster has been released.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.cluster.is_none()
    }

    /// Releases the cluster if it is still held.
    pub fn release(&mut self) {
        if let Some(mut cluster) = self.cluster.take() {
            let result = cluster.release().map_err(|err| err.to_string());
            self.scope.report(RunStage::ReleaseCluster, result);
        }
    }
}

impl Drop for ClusterGuard<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

// ============================================================================
// SECTION: Harness Guard
// ============================================================================

/// Owns a harness and releases it exactly once.
pub struct HarnessGuard<'a> {
    /// Harness until released.
    harness: Option<Box<dyn Harness>>,
    /// Cleanup context.
    scope: CleanupScope<'a>,
}

impl<'a> HarnessGuard<'a> {
    /// Takes ownership of a constructed harness.
    #[must_use]
    pub fn new(harness: Box<dyn Harness>, scope: CleanupScope<'a>) -> Self {
        Self {
            harness: Some(harness),
            scope,
        }
    }

    /// Runs the validation pass.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Validate`] when validation fails or the harness
    /// was already released.
    pub fn validate(&mut self, cancel: &CancellationToken) -> Result<(), HarnessError> {
        match self.harness.as_deref_mut() {
            Some(harness) => harness.validate(cancel),
            None => Err(HarnessError::Validate("harness already released".to_string())),
        }
    }

    /// Runs the deployment pass.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Deploy`] when deployment fails or the harness
    /// was already released.
    pub fn deploy(&mut self, cancel: &CancellationToken) -> Result<(), HarnessError> {
        match self.harness.as_deref_mut() {
            Some(harness) => harness.deploy(cancel),
            None => Err(HarnessError::Deploy("harness already released".to_string())),
        }
    }

    /// Returns true once the harness has been released.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.harness.is_none()
    }

    /// Releases the harness if it is still held.
    pub fn release(&mut self) {
        if let Some(mut harness) = self.harness.take() {
            let result = harness.release().map_err(|err| err.to_string());
            self.scope.report(RunStage::ReleaseHarness, result);
        }
    }
}

impl Drop for HarnessGuard<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
