// crates/addon-groups-core/src/runtime/suite.rs
// ============================================================================
// Module: Suite Driver
// Description: Runs the coverage check and group cases as named test cases.
// Purpose: Aggregate independent case outcomes into one exit status.
// Dependencies: crate::runtime
// ============================================================================

//! ## Overview
//! A suite is a list of named cases: the repository-wide coverage check and
//! one case per declared group. Cases are independent. A failing or panicking
//! case is recorded and the remaining cases still run; the suite passes only
//! when every case passed.
//!
//! Cases run sequentially or on scoped worker threads, up to the configured
//! parallelism. Results are reported in case order either way.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::num::NonZeroUsize;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::thread;

use serde::Serialize;

use crate::core::GroupName;
use crate::runtime::cancel::CancellationToken;
use crate::runtime::coverage::CoverageReport;
use crate::runtime::coverage::find_unhandled;
use crate::runtime::events::EventOutcome;
use crate::runtime::events::RunEvent;
use crate::runtime::orchestrator::GroupRunner;
use crate::runtime::orchestrator::RunError;
use crate::runtime::orchestrator::RunReport;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Case name of the coverage check.
pub const COVERAGE_CASE: &str = "coverage";

// ============================================================================
// SECTION: Types
// ============================================================================

/// One runnable case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "group", rename_all = "snake_case")]
pub enum SuiteCase {
    /// Repository-wide coverage check.
    Coverage,
    /// End-to-end run of one group.
    Group(GroupName),
}

impl SuiteCase {
    /// Returns the case name used in reports.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Coverage => COVERAGE_CASE,
            Self::Group(name) => name.as_str(),
        }
    }
}

/// Final state of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// The case passed.
    Passed,
    /// The case returned an error.
    Failed,
    /// The case was cancelled before finishing.
    Cancelled,
    /// The case panicked; its resources were still released.
    Panicked,
}

/// Result of one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseOutcome {
    /// Case that ran.
    pub case: SuiteCase,
    /// Final state.
    pub status: CaseStatus,
    /// Failure text, when the case did not pass.
    pub message: Option<String>,
    /// Group run summary, for passing group cases.
    pub run: Option<RunReport>,
    /// Coverage summary, for coverage cases that reached the repository.
    pub coverage: Option<CoverageReport>,
}

impl CaseOutcome {
    /// Returns true when the case passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == CaseStatus::Passed
    }
}

/// Aggregated suite result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    /// Outcomes in case order.
    pub cases: Vec<CaseOutcome>,
}

impl SuiteReport {
    /// Returns true when every case passed.
    #[must_use]
    pub fn success(&self) -> bool {
        self.cases.iter().all(CaseOutcome::passed)
    }

    /// Returns the outcomes that did not pass.
    #[must_use]
    pub fn failures(&self) -> Vec<&CaseOutcome> {
        self.cases.iter().filter(|case| !case.passed()).collect()
    }

    /// Returns the outcome of a named case.
    #[must_use]
    pub fn case(&self, name: &str) -> Option<&CaseOutcome> {
        self.cases.iter().find(|case| case.case.name() == name)
    }
}

/// Suite execution options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteOptions {
    /// Maximum number of cases running at once.
    pub parallelism: NonZeroUsize,
}

impl Default for SuiteOptions {
    fn default() -> Self {
        Self {
            parallelism: NonZeroUsize::MIN,
        }
    }
}

// ============================================================================
// SECTION: Driver
// ============================================================================

/// Runs suite cases through a [`GroupRunner`].
#[derive(Clone)]
pub struct SuiteDriver {
    /// Runner shared by every case.
    runner: GroupRunner,
    /// Execution options.
    options: SuiteOptions,
}

impl SuiteDriver {
    /// Creates a driver running cases one at a time.
    #[must_use]
    pub fn new(runner: GroupRunner) -> Self {
        Self {
            runner,
            options: SuiteOptions::default(),
        }
    }

    /// Replaces the execution options.
    #[must_use]
    pub const fn with_options(mut self, options: SuiteOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the coverage case followed by one case per declared group.
    #[must_use]
    pub fn cases(&self) -> Vec<SuiteCase> {
        std::iter::once(SuiteCase::Coverage)
            .chain(self.runner.registry().names().cloned().map(SuiteCase::Group))
            .collect()
    }

    /// Runs every case.
    #[must_use]
    pub fn run_all(&self, cancel: &CancellationToken) -> SuiteReport {
        self.run(&self.cases(), cancel)
    }

    /// Runs the given cases and aggregates their outcomes in case order.
    #[must_use]
    pub fn run(&self, cases: &[SuiteCase], cancel: &CancellationToken) -> SuiteReport {
        let workers = self.options.parallelism.get().min(cases.len());
        if workers <= 1 {
            return SuiteReport {
                cases: cases.iter().map(|case| self.run_case(case, cancel)).collect(),
            };
        }

        let next = AtomicUsize::new(0);
        let slots: Mutex<Vec<Option<CaseOutcome>>> = Mutex::new(vec![None; cases.len()]);
        thread::scope(|scope| {
            for _ in 0 .. workers {
                scope.spawn(|| {
                    loop {
                        let index = next.fetch_add(1, Ordering::SeqCst);
                        let Some(case) = cases.get(index) else {
                            break;
                        };
                        let outcome = self.run_case(case, cancel);
                        if let Ok(mut slots) = slots.lock()
                            && let Some(slot) = slots.get_mut(index)
                        {
                            *slot = Some(outcome);
                        }
                    }
                });
            }
        });

        let slots = slots.into_inner().unwrap_or_else(std::sync::PoisonError::into_inner);
        SuiteReport {
            cases: slots
                .into_iter()
                .zip(cases)
                .map(|(slot, case)| slot.unwrap_or_else(|| lost_outcome(case)))
                .collect(),
        }
    }

    /// Runs one case, converting panics into a [`CaseStatus::Panicked`] outcome.
    #[must_use]
    pub fn run_case(&self, case: &SuiteCase, cancel: &CancellationToken) -> CaseOutcome {
        let result = catch_unwind(AssertUnwindSafe(|| match case {
            SuiteCase::Coverage => self.run_coverage(),
            SuiteCase::Group(name) => group_outcome(case, self.runner.run_group(name.as_str(), cancel)),
        }));
        result.unwrap_or_else(|payload| CaseOutcome {
            case: case.clone(),
            status: CaseStatus::Panicked,
            message: Some(panic_message(payload.as_ref())),
            run: None,
            coverage: None,
        })
    }

    /// Runs the coverage check.
    fn run_coverage(&self) -> CaseOutcome {
        let sink = self.runner.event_sink();
        sink.record(&RunEvent::coverage(EventOutcome::Started, None));
        let repository = self.runner.resolver().repository();
        let report = find_unhandled(self.runner.registry(), repository.as_ref());
        let checked = report.as_ref().map_err(ToString::to_string).and_then(|report| {
            report.ensure_covered().map_err(|err| err.to_string())
        });
        match &checked {
            Ok(()) => sink.record(&RunEvent::coverage(EventOutcome::Ok, None)),
            Err(message) => {
                sink.record(&RunEvent::coverage(EventOutcome::Error, Some(message.clone())));
            }
        }
        CaseOutcome {
            case: SuiteCase::Coverage,
            status: if checked.is_ok() { CaseStatus::Passed } else { CaseStatus::Failed },
            message: checked.err(),
            run: None,
            coverage: report.ok(),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a group run result into a case outcome.
fn group_outcome(case: &SuiteCase, result: Result<RunReport, RunError>) -> CaseOutcome {
    match result {
        Ok(report) => CaseOutcome {
            case: case.clone(),
            status: CaseStatus::Passed,
            message: None,
            run: Some(report),
            coverage: None,
        },
        Err(err) => CaseOutcome {
            case: case.clone(),
            status: match &err {
                RunError::Cancelled {
                    ..
                } => CaseStatus::Cancelled,
                _ => CaseStatus::Failed,
            },
            message: Some(err.to_string()),
            run: None,
            coverage: None,
        },
    }
}

/// Outcome for a case whose worker never stored a result.
fn lost_outcome(case: &SuiteCase) -> CaseOutcome {
    CaseOutcome {
        case: case.clone(),
        status: CaseStatus::Failed,
        message: Some("case produced no outcome".to_string()),
        run: None,
        coverage: None,
    }
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return format!("case panicked: {message}");
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return format!("case panicked: {message}");
    }
    "case panicked".to_string()
}
