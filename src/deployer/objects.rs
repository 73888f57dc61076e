// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Views over a rendered manifest set handed to the apply/wait driver.

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment};
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, ServiceAccount};
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::{Metadata, Resource};
use serde::Serialize;

/// Any object a manifest set can contain
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ManifestObject {
    Namespace(Namespace),
    ServiceAccount(ServiceAccount),
    ClusterRole(ClusterRole),
    ClusterRoleBinding(ClusterRoleBinding),
    ConfigMap(ConfigMap),
    DaemonSet(DaemonSet),
    Deployment(Deployment),
}

macro_rules! each_object {
    ($obj:expr, $inner:ident => $body:expr) => {
        match $obj {
            ManifestObject::Namespace($inner) => $body,
            ManifestObject::ServiceAccount($inner) => $body,
            ManifestObject::ClusterRole($inner) => $body,
            ManifestObject::ClusterRoleBinding($inner) => $body,
            ManifestObject::ConfigMap($inner) => $body,
            ManifestObject::DaemonSet($inner) => $body,
            ManifestObject::Deployment($inner) => $body,
        }
    };
}

fn kind_of<K: Resource>(_: &K) -> &'static str {
    K::KIND
}

impl ManifestObject {
    pub fn kind(&self) -> &'static str {
        each_object!(self, o => kind_of(o))
    }

    pub fn meta(&self) -> &ObjectMeta {
        each_object!(self, o => o.metadata())
    }

    pub fn name(&self) -> &str {
        self.meta().name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.meta().namespace.as_deref()
    }
}

macro_rules! impl_from {
    ($($kind:ident),*) => {
        $(
            impl From<$kind> for ManifestObject {
                fn from(obj: $kind) -> Self {
                    Self::$kind(obj)
                }
            }
        )*
    };
}

impl_from!(
    Namespace,
    ServiceAccount,
    ClusterRole,
    ClusterRoleBinding,
    ConfigMap,
    DaemonSet,
    Deployment
);

/// Condition the driver polls for after submitting an object
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitPredicate {
    Exists,
    /// Every desired pod is scheduled, updated and ready
    DaemonSetReady,
    /// Rollout complete with all replicas available
    DeploymentReady,
    Gone,
}

impl WaitPredicate {
    pub fn for_creation(obj: &ManifestObject) -> Self {
        match obj {
            ManifestObject::DaemonSet(_) => Self::DaemonSetReady,
            ManifestObject::Deployment(_) => Self::DeploymentReady,
            _ => Self::Exists,
        }
    }

    /// Evaluate against the live object as last observed, `None` when it
    /// does not exist in the cluster.
    pub fn is_satisfied(&self, live: Option<&ManifestObject>) -> bool {
        match (self, live) {
            (Self::Gone, live) => live.is_none(),
            (_, None) => false,
            (Self::Exists, Some(_)) => true,
            (Self::DaemonSetReady, Some(ManifestObject::DaemonSet(ds))) => daemon_set_ready(ds),
            (Self::DeploymentReady, Some(ManifestObject::Deployment(dp))) => deployment_ready(dp),
            (Self::DaemonSetReady | Self::DeploymentReady, Some(_)) => false,
        }
    }
}

fn generation_observed(meta: &ObjectMeta, observed: Option<i64>) -> bool {
    match (meta.generation, observed) {
        (Some(desired), Some(observed)) => observed >= desired,
        (Some(_), None) => false,
        (None, _) => true,
    }
}

fn daemon_set_ready(ds: &DaemonSet) -> bool {
    let Some(status) = ds.status.as_ref() else {
        return false;
    };
    generation_observed(&ds.metadata, status.observed_generation)
        && status.number_ready == status.desired_number_scheduled
        && status.updated_number_scheduled.unwrap_or(0) == status.desired_number_scheduled
}

fn deployment_ready(dp: &Deployment) -> bool {
    let Some(status) = dp.status.as_ref() else {
        return false;
    };
    let desired = dp.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1);
    generation_observed(&dp.metadata, status.observed_generation)
        && status.updated_replicas.unwrap_or(0) == desired
        && status.available_replicas.unwrap_or(0) == desired
        && status.replicas.unwrap_or(0) == desired
}

#[derive(Clone, Debug, PartialEq)]
pub struct WaitableObject {
    pub object: ManifestObject,
    pub wait: WaitPredicate,
}

/// Projections of a rendered manifest set
pub trait ManifestSet {
    /// Objects in creation-safe order: namespace first, workload last
    fn to_objects(&self) -> Vec<ManifestObject>;

    fn to_creatable_objects(&self) -> Vec<WaitableObject> {
        self.to_objects()
            .into_iter()
            .map(|object| WaitableObject {
                wait: WaitPredicate::for_creation(&object),
                object,
            })
            .collect()
    }

    /// Creation order reversed, each waited on until gone
    fn to_deletable_objects(&self) -> Vec<WaitableObject> {
        self.to_objects()
            .into_iter()
            .rev()
            .map(|object| WaitableObject {
                object,
                wait: WaitPredicate::Gone,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifests::{SchedulerRenderOptions, UpdaterRenderOptions};
    use crate::test_utils::{make_scheduler_manifests, make_updater_manifests};
    use crate::types::Platform;
    use k8s_openapi::api::apps::v1::{DaemonSetStatus, DeploymentSpec, DeploymentStatus};

    fn make_daemon_set(generation: i64, observed: i64, desired: i32, ready: i32) -> ManifestObject {
        ManifestObject::DaemonSet(DaemonSet {
            metadata: ObjectMeta {
                generation: Some(generation),
                ..Default::default()
            },
            status: Some(DaemonSetStatus {
                observed_generation: Some(observed),
                desired_number_scheduled: desired,
                number_ready: ready,
                updated_number_scheduled: Some(ready),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn make_deployment(replicas: i32, available: i32) -> ManifestObject {
        ManifestObject::Deployment(Deployment {
            spec: Some(DeploymentSpec {
                replicas: Some(replicas),
                ..Default::default()
            }),
            status: Some(DeploymentStatus {
                replicas: Some(replicas),
                updated_replicas: Some(replicas),
                available_replicas: Some(available),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    #[test]
    fn test_kind_and_name() {
        let mf = make_updater_manifests(Platform::Kubernetes);
        let obj = ManifestObject::from(mf.daemon_set.clone());
        assert_eq!(obj.kind(), "DaemonSet");
        assert_eq!(obj.name(), "topology-updater");
        assert_eq!(obj.namespace(), Some("tas-topology-updater"));
        assert_eq!(ManifestObject::from(mf.cluster_role.clone()).namespace(), None);
    }

    #[test]
    fn test_creatable_objects_wait_for_workloads() {
        let mf = make_scheduler_manifests(Platform::Kubernetes)
            .render(&SchedulerRenderOptions::default())
            .unwrap();
        let waits: Vec<_> = mf.to_creatable_objects().iter().map(|w| w.wait).collect();
        assert_eq!(
            waits,
            vec![
                WaitPredicate::Exists,
                WaitPredicate::Exists,
                WaitPredicate::Exists,
                WaitPredicate::Exists,
                WaitPredicate::Exists,
                WaitPredicate::DeploymentReady,
            ]
        );
    }

    #[test]
    fn test_deletable_objects_reverse_creation_order() {
        let mf = make_updater_manifests(Platform::Kubernetes)
            .render(&UpdaterRenderOptions::default())
            .unwrap();
        let deletable = mf.to_deletable_objects();

        assert!(deletable.iter().all(|w| w.wait == WaitPredicate::Gone));
        assert_eq!(deletable.first().unwrap().object.kind(), "DaemonSet");
        assert_eq!(deletable.last().unwrap().object.kind(), "Namespace");
    }

    #[test]
    fn test_daemon_set_readiness() {
        let pred = WaitPredicate::DaemonSetReady;
        assert!(pred.is_satisfied(Some(&make_daemon_set(2, 2, 3, 3))));
        assert!(!pred.is_satisfied(Some(&make_daemon_set(2, 1, 3, 3))));
        assert!(!pred.is_satisfied(Some(&make_daemon_set(2, 2, 3, 2))));
        assert!(!pred.is_satisfied(None));
    }

    #[test]
    fn test_deployment_readiness() {
        let pred = WaitPredicate::DeploymentReady;
        assert!(pred.is_satisfied(Some(&make_deployment(2, 2))));
        assert!(!pred.is_satisfied(Some(&make_deployment(2, 1))));
        assert!(!pred.is_satisfied(Some(&make_daemon_set(1, 1, 1, 1))));
    }

    #[test]
    fn test_gone_and_exists() {
        let ns = ManifestObject::from(Namespace::default());
        assert!(WaitPredicate::Gone.is_satisfied(None));
        assert!(!WaitPredicate::Gone.is_satisfied(Some(&ns)));
        assert!(WaitPredicate::Exists.is_satisfied(Some(&ns)));
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let mf = make_updater_manifests(Platform::Kubernetes);
        let value = serde_json::to_value(ManifestObject::from(mf.namespace.clone())).unwrap();
        assert_eq!(value["kind"], "Namespace");
        assert_eq!(value["apiVersion"], "v1");
    }
}
