// system-tests/tests/suites/groups.rs
// ============================================================================
// Module: Group Cases
// Description: One named test per declared addon testing group.
// Purpose: Validate and deploy each group's addons on its declared cluster.
// Dependencies: helpers
// ============================================================================

//! ## Overview
//! Every group in the fixture document runs through the full lifecycle on a
//! recorded cluster. The coverage case asserts that every indexed addon is
//! listed by at least one group.

#![allow(
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use addon_groups_core::ClusterInterface;

use crate::helpers::world::World;

// ============================================================================
// SECTION: Coverage
// ============================================================================

#[test]
fn every_addon_is_handled_by_a_group() {
    let world = World::load();
    let outcome = world.run_coverage();
    assert!(outcome.passed(), "{:?}", outcome.message);
    let report = outcome.coverage.expect("coverage report");
    assert!(report.unhandled.is_empty());
    assert!(report.inspected > 0);
}

// ============================================================================
// SECTION: Ephemeral Groups
// ============================================================================

#[test]
fn general_group() {
    World::load().assert_group_passed("general");
}

#[test]
fn elasticsearch_group() {
    World::load().assert_group_passed("elasticsearch");
}

#[test]
fn prometheus_group() {
    World::load().assert_group_passed("prometheus");
}

#[test]
fn kommander_group() {
    World::load().assert_group_passed("kommander");
}

// ============================================================================
// SECTION: Provisioned Groups
// ============================================================================

#[test]
fn konvoy_general_group() {
    World::load().assert_group_passed("konvoyGeneral");
}

#[test]
fn istio_group() {
    let world = World::load();
    world.assert_group_passed("istio");
    let clusters = world.ledger.clusters();
    let cluster = clusters.iter().next().expect("istio cluster");
    let addons = world.ledger.harness_addons(cluster).expect("harness addons");
    let istio = addons.iter().find(|addon| addon.name.as_str() == "istio").expect("istio addon");
    let values = istio.spec.chart_reference.values.as_ref().expect("istio override");
    assert!(values.as_str().contains("mtls"));
}

#[test]
fn konvoy_security_group() {
    World::load().assert_group_passed("konvoySecurity");
}

#[test]
fn konvoy_cert_manager_group() {
    let world = World::load();
    world.assert_group_passed("konvoyCertManager");
    let outcome = world.run_group("konvoyCertManager");
    let report = outcome.run.expect("run report");
    assert_eq!(report.interface, ClusterInterface::ProvisionedRemote);
    let paths = world.backend.provisioner_paths.lock().map(|paths| paths.clone()).unwrap_or_default();
    assert_eq!(paths.len(), 2);
    assert!(paths.iter().all(|path| *path == world.harness_env.provisioner_path));
}
