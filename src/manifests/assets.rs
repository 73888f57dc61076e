// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Static manifest assets the template sets are built from.

use crate::error::{DeployerError, Result};
use crate::types::Platform;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::fmt;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Component {
    NodeFeatureDiscovery,
    SchedulerPlugin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubComponent {
    TopologyUpdater,
    Scheduler,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Namespace,
    ServiceAccount,
    ClusterRole,
    ClusterRoleBinding,
    ConfigMap,
    DaemonSet,
    Deployment,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NodeFeatureDiscovery => "nfd",
            Self::SchedulerPlugin => "sched",
        })
    }
}

impl fmt::Display for SubComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TopologyUpdater => "topologyupdater",
            Self::Scheduler => "scheduler",
        })
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Namespace => "namespace",
            Self::ServiceAccount => "serviceaccount",
            Self::ClusterRole => "clusterrole",
            Self::ClusterRoleBinding => "clusterrolebinding",
            Self::ConfigMap => "configmap",
            Self::DaemonSet => "daemonset",
            Self::Deployment => "deployment",
        })
    }
}

/// Provider of raw YAML manifests per platform and component
pub trait AssetSource {
    fn get(
        &self,
        platform: Platform,
        component: Component,
        subcomponent: SubComponent,
        kind: AssetKind,
    ) -> Result<Cow<'static, str>>;
}

/// Fetch an asset and decode it into its typed object
pub fn load<T, S>(
    source: &S,
    platform: Platform,
    component: Component,
    subcomponent: SubComponent,
    kind: AssetKind,
) -> Result<T>
where
    T: DeserializeOwned,
    S: AssetSource + ?Sized,
{
    let text = source.get(platform, component, subcomponent, kind)?;
    debug!(%platform, %component, %subcomponent, %kind, "loading asset");
    serde_yaml::from_str(&text).map_err(|e| DeployerError::MalformedAsset {
        name: format!("{component}/{subcomponent}/{kind}"),
        reason: e.to_string(),
    })
}

/// Assets compiled into the binary
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbeddedAssets;

impl EmbeddedAssets {
    fn lookup(
        platform: Platform,
        component: Component,
        subcomponent: SubComponent,
        kind: AssetKind,
    ) -> Option<&'static str> {
        use AssetKind::*;

        match (platform, component, subcomponent) {
            (
                Platform::Kubernetes | Platform::OpenShift,
                Component::NodeFeatureDiscovery,
                SubComponent::TopologyUpdater,
            ) => match kind {
                Namespace => Some(include_str!("assets/nfd/namespace.yaml")),
                ServiceAccount => Some(include_str!("assets/nfd/serviceaccount.yaml")),
                ClusterRole if platform == Platform::OpenShift => {
                    Some(include_str!("assets/nfd/clusterrole.openshift.yaml"))
                }
                ClusterRole => Some(include_str!("assets/nfd/clusterrole.yaml")),
                ClusterRoleBinding => Some(include_str!("assets/nfd/clusterrolebinding.yaml")),
                DaemonSet => Some(include_str!("assets/nfd/daemonset.yaml")),
                ConfigMap | Deployment => None,
            },
            (
                Platform::Kubernetes | Platform::OpenShift | Platform::HyperShift,
                Component::SchedulerPlugin,
                SubComponent::Scheduler,
            ) => match kind {
                Namespace => Some(include_str!("assets/sched/namespace.yaml")),
                ServiceAccount => Some(include_str!("assets/sched/serviceaccount.yaml")),
                ClusterRole => Some(include_str!("assets/sched/clusterrole.yaml")),
                ClusterRoleBinding => Some(include_str!("assets/sched/clusterrolebinding.yaml")),
                ConfigMap => Some(include_str!("assets/sched/configmap.yaml")),
                Deployment => Some(include_str!("assets/sched/deployment.yaml")),
                DaemonSet => None,
            },
            _ => None,
        }
    }
}

impl AssetSource for EmbeddedAssets {
    fn get(
        &self,
        platform: Platform,
        component: Component,
        subcomponent: SubComponent,
        kind: AssetKind,
    ) -> Result<Cow<'static, str>> {
        Self::lookup(platform, component, subcomponent, kind)
            .map(Cow::Borrowed)
            .ok_or_else(|| DeployerError::AssetNotFound {
                platform: platform.to_string(),
                component: component.to_string(),
                subcomponent: subcomponent.to_string(),
                kind: kind.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::Namespace;
    use k8s_openapi::api::rbac::v1::ClusterRole;

    struct BrokenAssets;

    impl AssetSource for BrokenAssets {
        fn get(
            &self,
            _platform: Platform,
            _component: Component,
            _subcomponent: SubComponent,
            _kind: AssetKind,
        ) -> Result<Cow<'static, str>> {
            Ok(Cow::Borrowed("apiVersion: v1\nkind: Pod\nmetadata:\n  name: nope\n"))
        }
    }

    #[test]
    fn test_load_namespace() {
        let ns: Namespace = load(
            &EmbeddedAssets,
            Platform::Kubernetes,
            Component::NodeFeatureDiscovery,
            SubComponent::TopologyUpdater,
            AssetKind::Namespace,
        )
        .unwrap();
        assert_eq!(ns.metadata.name.as_deref(), Some("tas-topology-updater"));
    }

    #[test]
    fn test_openshift_cluster_role_can_use_scc() {
        let load_role = |platform| -> ClusterRole {
            load(
                &EmbeddedAssets,
                platform,
                Component::NodeFeatureDiscovery,
                SubComponent::TopologyUpdater,
                AssetKind::ClusterRole,
            )
            .unwrap()
        };
        let uses_scc = |role: &ClusterRole| {
            role.rules.iter().flatten().any(|rule| {
                rule.resources
                    .iter()
                    .flatten()
                    .any(|r| r == "securitycontextconstraints")
            })
        };

        assert!(uses_scc(&load_role(Platform::OpenShift)));
        assert!(!uses_scc(&load_role(Platform::Kubernetes)));
    }

    #[test]
    fn test_unknown_platform_has_no_assets() {
        let err = EmbeddedAssets
            .get(
                Platform::Unknown,
                Component::SchedulerPlugin,
                SubComponent::Scheduler,
                AssetKind::Namespace,
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "No namespace asset for sched/scheduler on platform Unknown"
        );
    }

    #[test]
    fn test_hypershift_has_no_updater() {
        assert!(EmbeddedAssets
            .get(
                Platform::HyperShift,
                Component::NodeFeatureDiscovery,
                SubComponent::TopologyUpdater,
                AssetKind::DaemonSet,
            )
            .is_err());
    }

    #[test]
    fn test_wrong_kind_is_malformed() {
        let result: Result<Namespace> = load(
            &BrokenAssets,
            Platform::Kubernetes,
            Component::SchedulerPlugin,
            SubComponent::Scheduler,
            AssetKind::Namespace,
        );
        assert!(matches!(result, Err(DeployerError::MalformedAsset { .. })));
    }
}
