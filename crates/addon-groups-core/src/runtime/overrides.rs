// crates/addon-groups-core/src/runtime/overrides.rs
// ============================================================================
// Module: Override Injector
// Description: Typed registry of chart value overrides keyed by addon name.
// Purpose: Substitute CI-specific chart values into addons before testing.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Overrides are opaque payloads assigned into an addon's chart values slot.
//! Lookup is by exact addon name and returns an explicit
//! [`OverrideLookup::NoOverride`] sentinel when nothing is registered.
//! Application is a direct assignment, so applying twice is the same as
//! applying once.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::Addon;
use crate::core::AddonName;
use crate::core::ChartValues;

// ============================================================================
// SECTION: CI Defaults
// ============================================================================

/// Load balancer address pool for the local docker bridge network.
const METALLB_VALUES: &str = r#"---
configInline:
  address-pools:
  - name: default
    protocol: layer2
    addresses:
    - "172.17.1.200-172.17.1.250"
"#;

/// Service mesh values enabling the observability add-ons behind traefik.
const ISTIO_VALUES: &str = r#"---
kiali:
  enabled: true
  contextPath: /ops/portal/kiali
  ingress:
    enabled: true
    kubernetes.io/ingress.class: traefik
    hosts:
      - ""
  dashboard:
    auth:
      strategy: anonymous
  prometheusAddr: http://prometheus-kubeaddons-prom-prometheus.kubeaddons:9090

tracing:
  enabled: true
  contextPath: /ops/portal/jaeger
  ingress:
    enabled: true
    kubernetes.io/ingress.class: traefik
    hosts:
      - ""

grafana:
  enabled: true

prometheus:
  serviceName: prometheus-kubeaddons-prom-prometheus.kubeaddons

istiocoredns:
  enabled: true

security:
  selfSigned: true
  caCert: /etc/cacerts/tls.crt
  caKey: /etc/cacerts/tls.key
  rootCert: /var/run/secrets/kubernetes.io/serviceaccount/ca.crt
  certChain: /etc/cacerts/tls.crt
  enableNamespacesByDefault: false

global:
  podDNSSearchNamespaces:
  - global
  - "{{ valueOrDefault .DeploymentMeta.Namespace \"default\" }}.global"

  mtls:
    enabled: true

  multiCluster:
    enabled: true

  controlPlaneSecurityEnabled: true
"#;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Result of looking up an addon in the override registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideLookup<'a> {
    /// A payload is registered for the addon.
    Override(&'a ChartValues),
    /// Nothing is registered; the addon is used as-is.
    NoOverride,
}

/// Outcome of applying the registry to one addon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideOutcome {
    /// The addon's values slot was assigned.
    Applied,
    /// The addon was left untouched.
    NoOverride,
}

/// Chart value overrides keyed by addon name.
///
/// # Invariants
/// - At most one payload per addon name.
/// - Read-only while runs are in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideRegistry {
    /// Payloads keyed by addon name.
    entries: BTreeMap<AddonName, ChartValues>,
}

impl OverrideRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the payloads CI clusters need.
    #[must_use]
    pub fn ci_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert("metallb", ChartValues::new(METALLB_VALUES));
        registry.insert("istio", ChartValues::new(ISTIO_VALUES));
        registry
    }

    /// Registers a payload, returning the payload it replaced.
    pub fn insert(
        &mut self,
        addon: impl Into<AddonName>,
        values: ChartValues,
    ) -> Option<ChartValues> {
        self.entries.insert(addon.into(), values)
    }

    /// Merges another registry into this one; entries in `other` win.
    pub fn extend(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Looks up the payload for an addon.
    #[must_use]
    pub fn lookup(&self, addon: &str) -> OverrideLookup<'_> {
        self.entries.get(addon).map_or(OverrideLookup::NoOverride, OverrideLookup::Override)
    }

    /// Assigns the registered payload, if any, into the addon's values slot.
    pub fn apply(&self, addon: &mut Addon) -> OverrideOutcome {
        match self.lookup(addon.name.as_str()) {
            OverrideLookup::Override(values) => {
                addon.spec.chart_reference.values = Some(values.clone());
                OverrideOutcome::Applied
            }
            OverrideLookup::NoOverride => OverrideOutcome::NoOverride,
        }
    }

    /// Returns the number of registered payloads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates registered addon names in sorted order.
    pub fn addons(&self) -> impl Iterator<Item = &AddonName> {
        self.entries.keys()
    }
}

impl FromIterator<(AddonName, ChartValues)> for OverrideRegistry {
    fn from_iter<T: IntoIterator<Item = (AddonName, ChartValues)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
