// system-tests/tests/suites/suite_runs.rs
// ============================================================================
// Module: Suite Runs
// Description: Whole-suite runs over the fixture groups.
// Purpose: Ensure failures stay isolated and every cluster is released once.
// Dependencies: helpers, addon-groups-config, tempfile
// ============================================================================

//! ## Overview
//! Runs every case through the suite driver, in parallel, and audits the
//! recorded lifecycle of each cluster.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use addon_groups_config::load_addon_index;
use addon_groups_core::AddonName;
use addon_groups_core::CancellationToken;
use addon_groups_core::InMemoryAddonRepository;
use addon_groups_core::runtime::COVERAGE_CASE;
use addon_groups_core::runtime::CaseStatus;
use addon_groups_core::runtime::EventOutcome;
use addon_groups_core::runtime::RunStage;
use addon_groups_core::runtime::SuiteOptions;

use crate::helpers::fakes::Ledger;
use crate::helpers::world::World;
use crate::helpers::world::WorldOptions;
use crate::helpers::world::entry_kind;
use crate::helpers::world::fixtures_dir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Asserts that every created cluster saw exactly one release of each kind,
/// harness before cluster.
fn assert_released_once(ledger: &Ledger) {
    for cluster in ledger.clusters() {
        let kinds: Vec<&str> = ledger.for_cluster(&cluster).iter().map(entry_kind).collect();
        let harness = kinds.iter().filter(|kind| **kind == "harness-released").count();
        let created = kinds.iter().filter(|kind| **kind == "harness-created").count();
        assert_eq!(harness, created, "{cluster}: {kinds:?}");
        assert_eq!(kinds.iter().filter(|kind| **kind == "cluster-released").count(), 1);
        assert_eq!(kinds.last(), Some(&"cluster-released"), "{cluster}: {kinds:?}");
    }
}

fn parallel(world: &World, workers: usize) -> addon_groups_core::SuiteDriver {
    world.driver.clone().with_options(SuiteOptions {
        parallelism: NonZeroUsize::new(workers).expect("non-zero workers"),
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn full_suite_passes_in_parallel() {
    let world = World::load();
    let report = parallel(&world, 4).run_all(&CancellationToken::new());

    assert!(report.success(), "failures: {:?}", report.failures());
    assert_eq!(report.cases.len(), world.groups.registry().len() + 1);
    assert_eq!(report.cases[0].case.name(), COVERAGE_CASE);
    assert_eq!(world.ledger.clusters().len(), world.groups.registry().len());
    assert_released_once(&world.ledger);
}

#[test]
fn missing_index_entry_fails_only_its_group() {
    let fixture = load_addon_index(&fixtures_dir().join("addons.yaml")).unwrap();
    let trimmed = InMemoryAddonRepository::new(
        fixture
            .entries()
            .iter()
            .filter(|revisions| revisions.first().is_none_or(|addon| addon.name.as_str() != "kibana"))
            .cloned()
            .collect(),
    );
    let dir = tempfile::tempdir().unwrap();
    let index = dir.path().join("addons.yaml");
    std::fs::write(&index, serde_json::to_string(&trimmed).unwrap()).unwrap();

    let world = World::with_options(WorldOptions {
        index: Some(index),
        ..WorldOptions::default()
    });
    let report = parallel(&world, 3).run_all(&CancellationToken::new());

    let failures = report.failures();
    assert_eq!(failures.len(), 1, "{failures:?}");
    assert_eq!(failures[0].case.name(), "elasticsearch");
    assert_eq!(failures[0].status, CaseStatus::Failed);
    assert!(failures[0].message.as_deref().unwrap_or_default().contains("kibana"));
    assert!(report.case(COVERAGE_CASE).is_some_and(|outcome| outcome.passed()));
    assert_released_once(&world.ledger);
}

#[test]
fn validation_failure_skips_deploy_and_cleans_up() {
    let world = World::with_options(WorldOptions {
        reject: BTreeMap::from([(AddonName::new("thanos"), "crd version unsupported".to_string())]),
        ..WorldOptions::default()
    });
    let outcome = world.run_group("kommander");

    assert_eq!(outcome.status, CaseStatus::Failed);
    assert!(outcome.message.as_deref().unwrap_or_default().contains("crd version unsupported"));
    let cluster = world.ledger.clusters().into_iter().next().expect("kommander cluster");
    let kinds: Vec<&str> = world.ledger.for_cluster(&cluster).iter().map(entry_kind).collect();
    assert_eq!(
        kinds,
        vec![
            "cluster-created",
            "controller-deployed",
            "harness-created",
            "validated",
            "harness-released",
            "cluster-released",
        ]
    );
}

#[test]
fn cancelled_suite_creates_no_clusters() {
    let world = World::load();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let report = world.driver.run_all(&cancel);

    assert!(!report.success());
    assert!(world.ledger.clusters().is_empty());
    for outcome in report.cases.iter().skip(1) {
        assert_eq!(outcome.status, CaseStatus::Cancelled, "{}", outcome.case.name());
    }
}

#[test]
fn events_record_each_group_lifecycle() {
    let world = World::load();
    let report = world.driver.run_all(&CancellationToken::new());
    assert!(report.success());

    let events = world.events.events();
    assert!(events.iter().any(|event| event.stage == RunStage::Coverage && event.outcome == EventOutcome::Ok));
    for name in world.groups.registry().names() {
        let released = events.iter().any(|event| {
            event.group.as_deref() == Some(name.as_str())
                && event.stage == RunStage::ReleaseCluster
                && event.outcome == EventOutcome::Ok
        });
        assert!(released, "{name} has no cluster release event");
    }
}
