// system-tests/tests/helpers/fakes.rs
// ============================================================================
// Module: Recording Collaborators
// Description: In-process cluster, controller, and harness stand-ins.
// Purpose: Record every lifecycle call so suites can audit cleanup.
// Dependencies: addon-groups-core
// ============================================================================

//! ## Overview
//! Each fake appends `"<group-scope> <call>"` style entries to a shared
//! [`Ledger`]. Clusters are keyed by the access name the backend assigns, so
//! concurrent runs remain distinguishable.

#![allow(clippy::unwrap_used, reason = "Poisoned test locks should abort the suite.")]

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use addon_groups_core::Addon;
use addon_groups_core::AddonName;
use addon_groups_core::CancellationToken;
use addon_groups_core::Cluster;
use addon_groups_core::ClusterAccess;
use addon_groups_core::ClusterError;
use addon_groups_core::ClusterInterface;
use addon_groups_core::ControllerDeployer;
use addon_groups_core::ControllerError;
use addon_groups_core::EphemeralClusterBackend;
use addon_groups_core::Harness;
use addon_groups_core::HarnessError;
use addon_groups_core::HarnessFactory;
use addon_groups_core::KubernetesVersion;
use addon_groups_core::ProvisionedClusterBackend;
use addon_groups_core::ProvisionerId;

// ============================================================================
// SECTION: Ledger
// ============================================================================

/// Lifecycle entry recorded by the fakes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEntry {
    /// A cluster was created.
    ClusterCreated {
        /// Backend-assigned cluster name.
        cluster: String,
        /// Interface used.
        interface: ClusterInterface,
    },
    /// The controller was deployed onto a cluster.
    ControllerDeployed {
        /// Target cluster name.
        cluster: String,
    },
    /// A harness was built for a cluster.
    HarnessCreated {
        /// Target cluster name.
        cluster: String,
        /// Addons handed to the harness, in order.
        addons: Vec<Addon>,
    },
    /// Harness validation ran.
    Validated {
        /// Target cluster name.
        cluster: String,
    },
    /// Harness deployment ran.
    Deployed {
        /// Target cluster name.
        cluster: String,
    },
    /// The harness was released.
    HarnessReleased {
        /// Target cluster name.
        cluster: String,
    },
    /// The cluster was released.
    ClusterReleased {
        /// Released cluster name.
        cluster: String,
    },
}

impl LedgerEntry {
    /// Returns the cluster the entry belongs to.
    pub fn cluster(&self) -> &str {
        match self {
            Self::ClusterCreated {
                cluster,
                ..
            }
            | Self::ControllerDeployed {
                cluster,
            }
            | Self::HarnessCreated {
                cluster,
                ..
            }
            | Self::Validated {
                cluster,
            }
            | Self::Deployed {
                cluster,
            }
            | Self::HarnessReleased {
                cluster,
            }
            | Self::ClusterReleased {
                cluster,
            } => cluster,
        }
    }
}

/// Shared, ordered ledger of lifecycle calls.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Arc<Mutex<Vec<LedgerEntry>>>,
}

impl Ledger {
    pub fn push(&self, entry: LedgerEntry) {
        self.entries.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// Entries for one cluster, in arrival order.
    pub fn for_cluster(&self, cluster: &str) -> Vec<LedgerEntry> {
        self.entries().into_iter().filter(|entry| entry.cluster() == cluster).collect()
    }

    /// Names of every cluster that was created.
    pub fn clusters(&self) -> BTreeSet<String> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                LedgerEntry::ClusterCreated {
                    cluster,
                    ..
                } => Some(cluster),
                _ => None,
            })
            .collect()
    }

    /// Addons handed to the harness on the given cluster.
    pub fn harness_addons(&self, cluster: &str) -> Option<Vec<Addon>> {
        self.for_cluster(cluster).into_iter().find_map(|entry| match entry {
            LedgerEntry::HarnessCreated {
                addons,
                ..
            } => Some(addons),
            _ => None,
        })
    }
}

// ============================================================================
// SECTION: Clusters
// ============================================================================

/// Cluster handle that records its release.
pub struct RecordedCluster {
    access: ClusterAccess,
    ledger: Ledger,
}

impl Cluster for RecordedCluster {
    fn access(&self) -> &ClusterAccess {
        &self.access
    }

    fn release(&mut self) -> Result<(), ClusterError> {
        self.ledger.push(LedgerEntry::ClusterReleased {
            cluster: self.access.name.clone(),
        });
        Ok(())
    }
}

/// Backend issuing uniquely named clusters for both interfaces.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    pub ledger: Ledger,
    pub provisioner_paths: Arc<Mutex<Vec<PathBuf>>>,
    sequence: Arc<AtomicUsize>,
}

impl RecordingBackend {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            provisioner_paths: Arc::default(),
            sequence: Arc::default(),
        }
    }

    fn issue(&self, prefix: &str, interface: ClusterInterface, version: Option<KubernetesVersion>) -> Box<dyn Cluster> {
        let id = self.sequence.fetch_add(1, Ordering::SeqCst);
        let name = format!("{prefix}-{id}");
        self.ledger.push(LedgerEntry::ClusterCreated {
            cluster: name.clone(),
            interface,
        });
        Box::new(RecordedCluster {
            access: ClusterAccess {
                name,
                interface,
                version,
                kubeconfig: None,
            },
            ledger: self.ledger.clone(),
        })
    }
}

impl EphemeralClusterBackend for RecordingBackend {
    fn create_ephemeral(
        &self,
        version: &KubernetesVersion,
        _cancel: &CancellationToken,
    ) -> Result<Box<dyn Cluster>, ClusterError> {
        Ok(self.issue("kind", ClusterInterface::EphemeralLocal, Some(version.clone())))
    }
}

impl ProvisionedClusterBackend for RecordingBackend {
    fn create_provisioned(
        &self,
        provisioner_path: &Path,
        provisioner_id: &ProvisionerId,
        _cancel: &CancellationToken,
    ) -> Result<Box<dyn Cluster>, ClusterError> {
        self.provisioner_paths.lock().unwrap().push(provisioner_path.to_path_buf());
        Ok(self.issue(provisioner_id.as_str(), ClusterInterface::ProvisionedRemote, None))
    }
}

// ============================================================================
// SECTION: Controller
// ============================================================================

#[derive(Clone, Default)]
pub struct RecordingController {
    pub ledger: Ledger,
}

impl ControllerDeployer for RecordingController {
    fn deploy_controller(
        &self,
        cluster: &ClusterAccess,
        _interface: ClusterInterface,
        _cancel: &CancellationToken,
    ) -> Result<(), ControllerError> {
        self.ledger.push(LedgerEntry::ControllerDeployed {
            cluster: cluster.name.clone(),
        });
        Ok(())
    }
}

// ============================================================================
// SECTION: Harness
// ============================================================================

/// Harness factory with optional per-addon validation failures.
#[derive(Clone, Default)]
pub struct RecordingHarnesses {
    pub ledger: Ledger,
    pub reject: BTreeMap<AddonName, String>,
}

impl HarnessFactory for RecordingHarnesses {
    fn create(
        &self,
        cluster: &ClusterAccess,
        addons: Vec<Addon>,
        _cancel: &CancellationToken,
    ) -> Result<Box<dyn Harness>, HarnessError> {
        let rejection =
            addons.iter().find_map(|addon| self.reject.get(&addon.name)).cloned();
        self.ledger.push(LedgerEntry::HarnessCreated {
            cluster: cluster.name.clone(),
            addons,
        });
        Ok(Box::new(RecordedHarness {
            cluster: cluster.name.clone(),
            ledger: self.ledger.clone(),
            rejection,
        }))
    }
}

pub struct RecordedHarness {
    cluster: String,
    ledger: Ledger,
    rejection: Option<String>,
}

impl Harness for RecordedHarness {
    fn validate(&mut self, _cancel: &CancellationToken) -> Result<(), HarnessError> {
        self.ledger.push(LedgerEntry::Validated {
            cluster: self.cluster.clone(),
        });
        match &self.rejection {
            Some(reason) => Err(HarnessError::Validate(reason.clone())),
            None => Ok(()),
        }
    }

    fn deploy(&mut self, _cancel: &CancellationToken) -> Result<(), HarnessError> {
        self.ledger.push(LedgerEntry::Deployed {
            cluster: self.cluster.clone(),
        });
        Ok(())
    }

    fn release(&mut self) -> Result<(), HarnessError> {
        self.ledger.push(LedgerEntry::HarnessReleased {
            cluster: self.cluster.clone(),
        });
        Ok(())
    }
}
