// crates/addon-groups-core/tests/common/mod.rs
// ============================================================================
// Module: Addon Groups Test Fixtures
// Description: Recording fakes for clusters, controller, and harnesses.
// Purpose: Observe call order and release counts in group run tests.
// Dependencies: addon-groups-core
// ============================================================================

//! ## Overview
//! Every fake appends a label to a shared [`CallLog`], so tests can assert the
//! exact sequence of collaborator calls, including releases.

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Shared fixtures are used by a subset of test binaries."
)]

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use addon_groups_core::Addon;
use addon_groups_core::AddonName;
use addon_groups_core::AddonRepository;
use addon_groups_core::AddonResolver;
use addon_groups_core::CancellationToken;
use addon_groups_core::Cluster;
use addon_groups_core::ClusterAccess;
use addon_groups_core::ClusterError;
use addon_groups_core::ClusterInterface;
use addon_groups_core::ClusterProvisioner;
use addon_groups_core::ControllerDeployer;
use addon_groups_core::ControllerError;
use addon_groups_core::EphemeralClusterBackend;
use addon_groups_core::GroupDeclaration;
use addon_groups_core::GroupName;
use addon_groups_core::GroupRegistry;
use addon_groups_core::GroupRunner;
use addon_groups_core::Harness;
use addon_groups_core::HarnessError;
use addon_groups_core::HarnessFactory;
use addon_groups_core::InMemoryAddonRepository;
use addon_groups_core::KubernetesVersion;
use addon_groups_core::OverrideRegistry;
use addon_groups_core::ProvisionedClusterBackend;
use addon_groups_core::ProvisionerId;
use addon_groups_core::RepositoryError;
use addon_groups_core::runtime::MemoryRunEventSink;

// ============================================================================
// SECTION: Call Log
// ============================================================================

/// Shared, ordered record of collaborator calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|entry| entry.as_str() == call).count()
    }

    pub fn position(&self, call: &str) -> Option<usize> {
        self.calls().iter().position(|entry| entry.as_str() == call)
    }
}

// ============================================================================
// SECTION: Clusters
// ============================================================================

pub struct FakeCluster {
    access: ClusterAccess,
    log: CallLog,
    fail_release: bool,
}

impl Cluster for FakeCluster {
    fn access(&self) -> &ClusterAccess {
        &self.access
    }

    fn release(&mut self) -> Result<(), ClusterError> {
        self.log.push("cluster.release");
        if self.fail_release {
            return Err(ClusterError::Release("cluster teardown refused".to_string()));
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeEphemeralBackend {
    pub log: CallLog,
    pub fail_create: bool,
    pub fail_release: bool,
}

impl EphemeralClusterBackend for FakeEphemeralBackend {
    fn create_ephemeral(
        &self,
        version: &KubernetesVersion,
        _cancel: &CancellationToken,
    ) -> Result<Box<dyn Cluster>, ClusterError> {
        self.log.push("cluster.create");
        if self.fail_create {
            return Err(ClusterError::Create("no capacity".to_string()));
        }
        Ok(Box::new(FakeCluster {
            access: ClusterAccess {
                name: format!("kind-{version}"),
                interface: ClusterInterface::EphemeralLocal,
                version: Some(version.clone()),
                kubeconfig: None,
            },
            log: self.log.clone(),
            fail_release: self.fail_release,
        }))
    }
}

#[derive(Clone, Default)]
pub struct FakeProvisionedBackend {
    pub log: CallLog,
    pub paths: Arc<Mutex<Vec<PathBuf>>>,
    pub fail_create: bool,
}

impl ProvisionedClusterBackend for FakeProvisionedBackend {
    fn create_provisioned(
        &self,
        provisioner_path: &Path,
        provisioner_id: &ProvisionerId,
        _cancel: &CancellationToken,
    ) -> Result<Box<dyn Cluster>, ClusterError> {
        self.log.push("cluster.create");
        self.paths.lock().unwrap().push(provisioner_path.to_path_buf());
        if self.fail_create {
            return Err(ClusterError::Create("provisioner exited 1".to_string()));
        }
        Ok(Box::new(FakeCluster {
            access: ClusterAccess {
                name: provisioner_id.to_string(),
                interface: ClusterInterface::ProvisionedRemote,
                version: None,
                kubeconfig: Some(PathBuf::from("/tmp/kubeconfig")),
            },
            log: self.log.clone(),
            fail_release: false,
        }))
    }
}

// ============================================================================
// SECTION: Controller
// ============================================================================

#[derive(Clone, Default)]
pub struct FakeController {
    pub log: CallLog,
    pub fail: bool,
    pub interfaces: Arc<Mutex<Vec<ClusterInterface>>>,
}

impl ControllerDeployer for FakeController {
    fn deploy_controller(
        &self,
        _cluster: &ClusterAccess,
        interface: ClusterInterface,
        _cancel: &CancellationToken,
    ) -> Result<(), ControllerError> {
        self.log.push("controller.deploy");
        self.interfaces.lock().unwrap().push(interface);
        if self.fail {
            return Err(ControllerError::Deploy("image pull backoff".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Harness
// ============================================================================

/// Failure injected into the harness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HarnessFault {
    #[default]
    None,
    Setup,
    Validate,
    Deploy,
    PanicOnValidate,
    CancelOnValidate,
    CancelOnDeploy,
    Release,
}

#[derive(Clone, Default)]
pub struct FakeHarnessFactory {
    pub log: CallLog,
    pub fault: HarnessFault,
    pub received: Arc<Mutex<Vec<Vec<Addon>>>>,
    pub cancel: CancellationToken,
}

impl HarnessFactory for FakeHarnessFactory {
    fn create(
        &self,
        _cluster: &ClusterAccess,
        addons: Vec<Addon>,
        _cancel: &CancellationToken,
    ) -> Result<Box<dyn Harness>, HarnessError> {
        self.log.push("harness.create");
        if self.fault == HarnessFault::Setup {
            return Err(HarnessError::Setup("chart cache unavailable".to_string()));
        }
        self.received.lock().unwrap().push(addons);
        Ok(Box::new(FakeHarness {
            log: self.log.clone(),
            fault: self.fault,
            cancel: self.cancel.clone(),
        }))
    }
}

pub struct FakeHarness {
    log: CallLog,
    fault: HarnessFault,
    cancel: CancellationToken,
}

impl Harness for FakeHarness {
    fn validate(&mut self, _cancel: &CancellationToken) -> Result<(), HarnessError> {
        self.log.push("harness.validate");
        match self.fault {
            HarnessFault::Validate => Err(HarnessError::Validate("schema mismatch".to_string())),
            HarnessFault::PanicOnValidate => panic!("validator crashed"),
            HarnessFault::CancelOnValidate => {
                self.cancel.cancel();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn deploy(&mut self, _cancel: &CancellationToken) -> Result<(), HarnessError> {
        self.log.push("harness.deploy");
        match self.fault {
            HarnessFault::Deploy => Err(HarnessError::Deploy("release timed out".to_string())),
            HarnessFault::CancelOnDeploy => {
                self.cancel.cancel();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn release(&mut self) -> Result<(), HarnessError> {
        self.log.push("harness.release");
        if self.fault == HarnessFault::Release {
            return Err(HarnessError::Release("namespace stuck terminating".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Repositories
// ============================================================================

pub struct FailingRepository;

impl AddonRepository for FailingRepository {
    fn list_addons(&self) -> Result<Vec<Vec<Addon>>, RepositoryError> {
        Err(RepositoryError::Listing("index unreachable".to_string()))
    }
}

pub fn repository(names: &[&str]) -> InMemoryAddonRepository {
    InMemoryAddonRepository::from_addons(names.iter().map(|name| Addon::new(*name, "1.0.0-1")))
}

// ============================================================================
// SECTION: Declarations
// ============================================================================

pub fn ephemeral(version: &str, addons: &[&str]) -> GroupDeclaration {
    GroupDeclaration {
        cluster_interface: "ephemeral-local".to_string(),
        kubernetes_version: Some(version.to_string()),
        provisioner_id: None,
        addons: addons.iter().map(|name| AddonName::new(*name)).collect(),
    }
}

pub fn provisioned(provisioner: &str, addons: &[&str]) -> GroupDeclaration {
    GroupDeclaration {
        cluster_interface: "provisioned-remote".to_string(),
        kubernetes_version: None,
        provisioner_id: Some(provisioner.to_string()),
        addons: addons.iter().map(|name| AddonName::new(*name)).collect(),
    }
}

pub fn registry(groups: Vec<(&str, GroupDeclaration)>) -> GroupRegistry {
    GroupRegistry::from_declarations(
        groups.into_iter().map(|(name, declaration)| (GroupName::new(name), declaration)),
    )
}

// ============================================================================
// SECTION: Runner Fixture
// ============================================================================

/// Fully wired runner plus handles on every fake.
pub struct Fixture {
    pub log: CallLog,
    pub ephemeral: FakeEphemeralBackend,
    pub provisioned: FakeProvisionedBackend,
    pub controller: FakeController,
    pub harnesses: FakeHarnessFactory,
    pub sink: MemoryRunEventSink,
    pub runner: GroupRunner,
}

#[derive(Default)]
pub struct FixtureOptions {
    pub fail_cluster_create: bool,
    pub fail_cluster_release: bool,
    pub fail_controller: bool,
    pub harness_fault: HarnessFault,
    pub cancel: CancellationToken,
    pub overrides: OverrideRegistry,
}

pub fn fixture(
    groups: Vec<(&str, GroupDeclaration)>,
    repository: Arc<dyn AddonRepository>,
    options: FixtureOptions,
) -> Fixture {
    let log = CallLog::default();
    let ephemeral = FakeEphemeralBackend {
        log: log.clone(),
        fail_create: options.fail_cluster_create,
        fail_release: options.fail_cluster_release,
    };
    let provisioned = FakeProvisionedBackend {
        log: log.clone(),
        paths: Arc::default(),
        fail_create: options.fail_cluster_create,
    };
    let controller = FakeController {
        log: log.clone(),
        fail: options.fail_controller,
        interfaces: Arc::default(),
    };
    let harnesses = FakeHarnessFactory {
        log: log.clone(),
        fault: options.harness_fault,
        received: Arc::default(),
        cancel: options.cancel,
    };
    let sink = MemoryRunEventSink::new();
    let provisioner = ClusterProvisioner::with_path_override(
        Arc::new(ephemeral.clone()),
        Arc::new(provisioned.clone()),
        None,
    );
    let runner = GroupRunner::new(
        Arc::new(registry(groups)),
        provisioner,
        Arc::new(controller.clone()),
        AddonResolver::new(repository, options.overrides),
        Arc::new(harnesses.clone()),
    )
    .with_event_sink(Arc::new(sink.clone()));
    Fixture {
        log,
        ephemeral,
        provisioned,
        controller,
        harnesses,
        sink,
        runner,
    }
}
