// system-tests/src/lib.rs
// ============================================================================
// Module: Addon Groups System Tests Library
// Description: Shared configuration for the addon group system tests.
// Purpose: Provide typed environment settings to system-test binaries.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the addon group
//! system-test binaries in `system-tests/tests`. Each declared test group is
//! exposed there as its own named test case.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
