// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for addon group system-tests.
// Purpose: Provide recording collaborators and a fixture-backed suite.
// Dependencies: system-tests, addon-groups-config, addon-groups-core
// ============================================================================

//! ## Overview
//! Shared helpers for addon group system-tests.
//! Invariants:
//! - System-test execution is deterministic and fail-closed.
//! - Collaborators are recording fakes; no real cluster is created.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod fakes;
