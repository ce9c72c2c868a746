// crates/addon-groups-core/src/runtime/cancel.rs
// ============================================================================
// Module: Cancellation
// Description: Shared cancellation flag threaded through group runs.
// Purpose: Let callers stop a run between steps without skipping cleanup.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A [`CancellationToken`] is a cloneable flag. Clones observe the same state,
//! so a suite driver can cancel every in-flight run at once. Cancellation is
//! cooperative: the orchestrator checks the flag between steps and passes it
//! to collaborators that block for long periods.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

// ============================================================================
// SECTION: Token
// ============================================================================

/// Cooperative cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    /// Shared cancelled flag.
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the token and all of its clones as cancelled.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`CancellationToken::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
