// crates/addon-groups-core/src/runtime/events.rs
// ============================================================================
// Module: Run Events
// Description: Structured events for group runs, cleanup, and coverage.
// Purpose: Emit JSON-line run logs without a global logger.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every run step and every cleanup action produces a [`RunEvent`]. Events are
//! routed through a [`RunEventSink`] chosen by the caller: stderr, an
//! append-only file, memory, or nowhere. Sinks never fail the run; write
//! errors are dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Run step an event refers to.
///
/// # Invariants
/// - Variants are stable for log consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    /// Whole run.
    Run,
    /// Group lookup.
    Lookup,
    /// Cluster provisioning.
    Provision,
    /// Controller deployment.
    Controller,
    /// Addon resolution and override injection.
    Resolve,
    /// Harness construction.
    Harness,
    /// Harness validation pass.
    Validate,
    /// Harness deployment pass.
    Deploy,
    /// Harness release.
    ReleaseHarness,
    /// Cluster release.
    ReleaseCluster,
    /// Repository-wide coverage check.
    Coverage,
}

impl RunStage {
    /// Returns a stable label for the stage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Lookup => "lookup",
            Self::Provision => "provision",
            Self::Controller => "controller",
            Self::Resolve => "resolve",
            Self::Harness => "harness",
            Self::Validate => "validate",
            Self::Deploy => "deploy",
            Self::ReleaseHarness => "release_harness",
            Self::ReleaseCluster => "release_cluster",
            Self::Coverage => "coverage",
        }
    }
}

/// Outcome recorded by an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOutcome {
    /// The step started.
    Started,
    /// The step succeeded.
    Ok,
    /// The step failed.
    Error,
    /// The step was skipped because the run was cancelled.
    Cancelled,
}

/// Structured run event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Group the event belongs to, when any.
    pub group: Option<String>,
    /// Step the event refers to.
    pub stage: RunStage,
    /// Step outcome.
    pub outcome: EventOutcome,
    /// Optional detail (error text, counts).
    pub message: Option<String>,
}

impl RunEvent {
    /// Creates a group run event with a consistent timestamp.
    #[must_use]
    pub fn group(
        group: &str,
        stage: RunStage,
        outcome: EventOutcome,
        message: Option<String>,
    ) -> Self {
        Self {
            event: "group_run",
            timestamp_ms: now_ms(),
            group: Some(group.to_string()),
            stage,
            outcome,
            message,
        }
    }

    /// Creates a coverage event with a consistent timestamp.
    #[must_use]
    pub fn coverage(outcome: EventOutcome, message: Option<String>) -> Self {
        Self {
            event: "coverage_check",
            timestamp_ms: now_ms(),
            group: None,
            stage: RunStage::Coverage,
            outcome,
            message,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Destination for run events.
pub trait RunEventSink: Send + Sync {
    /// Records an event.
    fn record(&self, event: &RunEvent);
}

/// Sink that writes JSON lines to stderr.
pub struct StderrRunEventSink;

impl RunEventSink for StderrRunEventSink {
    fn record(&self, event: &RunEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Sink that appends JSON lines to a file.
pub struct FileRunEventSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileRunEventSink {
    /// Opens the log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl RunEventSink for FileRunEventSink {
    fn record(&self, event: &RunEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Sink that discards events.
pub struct NoopRunEventSink;

impl RunEventSink for NoopRunEventSink {
    fn record(&self, _event: &RunEvent) {}
}

/// Sink that keeps events in memory for inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryRunEventSink {
    /// Recorded events in arrival order.
    events: Arc<Mutex<Vec<RunEvent>>>,
}

impl MemoryRunEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<RunEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl RunEventSink for MemoryRunEventSink {
    fn record(&self, event: &RunEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the current time in milliseconds since the epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
