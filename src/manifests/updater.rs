// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Topology updater daemon manifests.

use super::assets::{load, AssetKind, AssetSource, Component, SubComponent};
use crate::constants::updater as consts;
use crate::deployer::{ManifestObject, ManifestSet};
use crate::error::Result;
use crate::objectupdate::{rbac, workload};
use crate::types::Platform;
use k8s_openapi::api::apps::v1::DaemonSet;
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, PodSpec, ServiceAccount};
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use kube::ResourceExt;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Settings of the updater daemon itself. Unset fields keep the template value.
#[derive(Clone, Debug, Default)]
pub struct DaemonSetOptions {
    pub verbose: Option<u32>,
    pub pull_if_not_present: bool,
    /// Report a fingerprint of the pods running on each node
    pub pfp_enable: bool,
    /// React to kubelet state changes instead of only polling
    pub notification_enable: bool,
    pub node_selector: Option<LabelSelector>,
    pub update_interval: Option<Duration>,
}

#[derive(Clone, Debug, Default)]
pub struct UpdaterRenderOptions {
    pub daemon_set: DaemonSetOptions,
    /// Updater configuration; when set it is shipped in a ConfigMap
    pub config_data: String,
    pub namespace: String,
    /// Name of the daemon set
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct UpdaterManifests {
    pub namespace: Namespace,
    pub service_account: ServiceAccount,
    pub cluster_role: ClusterRole,
    pub cluster_role_binding: ClusterRoleBinding,
    pub daemon_set: DaemonSet,
    pub config_map: Option<ConfigMap>,
    platform: Platform,
}

impl UpdaterManifests {
    /// Build the template set from `source`. A non-empty `namespace` renames
    /// the namespace object and is set on the namespaced objects.
    #[instrument(skip(source))]
    pub fn new<S: AssetSource + ?Sized>(
        source: &S,
        platform: Platform,
        namespace: &str,
    ) -> Result<Self> {
        let (c, s) = (Component::NodeFeatureDiscovery, SubComponent::TopologyUpdater);

        let mut ns: Namespace = load(source, platform, c, s, AssetKind::Namespace)?;
        let mut service_account: ServiceAccount =
            load(source, platform, c, s, AssetKind::ServiceAccount)?;
        let cluster_role: ClusterRole = load(source, platform, c, s, AssetKind::ClusterRole)?;
        let cluster_role_binding: ClusterRoleBinding =
            load(source, platform, c, s, AssetKind::ClusterRoleBinding)?;
        let mut daemon_set: DaemonSet = load(source, platform, c, s, AssetKind::DaemonSet)?;

        workload::daemon_set_pod_spec(&daemon_set)?;

        if !namespace.is_empty() {
            ns.metadata.name = Some(namespace.to_string());
            service_account.metadata.namespace = Some(namespace.to_string());
            daemon_set.metadata.namespace = Some(namespace.to_string());
        }

        Ok(Self {
            namespace: ns,
            service_account,
            cluster_role,
            cluster_role_binding,
            daemon_set,
            config_map: None,
            platform,
        })
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Produce a rendered copy; `self` is never modified.
    #[instrument(skip(self, opts), fields(platform = %self.platform))]
    pub fn render(&self, opts: &UpdaterRenderOptions) -> Result<Self> {
        let mut ret = self.clone();

        if !opts.namespace.is_empty() {
            ret.namespace.metadata.name = Some(opts.namespace.clone());
            ret.service_account.metadata.namespace = Some(opts.namespace.clone());
            ret.daemon_set.metadata.namespace = Some(opts.namespace.clone());
        }
        let namespace = ret
            .service_account
            .namespace()
            .unwrap_or_else(|| ret.namespace.name_any());

        if !opts.name.is_empty() {
            ret.daemon_set.metadata.name = Some(opts.name.clone());
        }

        let sa_name = ret.service_account.name_any();
        rbac::cluster_role_binding(&mut ret.cluster_role_binding, &sa_name, &namespace);

        ret.config_map = if opts.config_data.is_empty() {
            None
        } else {
            Some(updater_config_map(
                &format!("{}-config", ret.daemon_set.name_any()),
                &namespace,
                &opts.config_data,
            ))
        };

        let pod_spec = workload::daemon_set_pod_spec_mut(&mut ret.daemon_set)?;
        pod_spec.service_account_name = Some(sa_name);
        update_daemon_set_pod(pod_spec, &opts.daemon_set, ret.config_map.as_ref());

        debug!(
            namespace = %namespace,
            daemon_set = %ret.daemon_set.name_any(),
            "rendered topology updater manifests"
        );
        Ok(ret)
    }
}

fn updater_config_map(name: &str, namespace: &str, data: &str) -> ConfigMap {
    ConfigMap {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([(
            consts::CONFIG_FILE_NAME.to_string(),
            data.to_string(),
        )])),
        ..Default::default()
    }
}

fn update_daemon_set_pod(
    pod_spec: &mut PodSpec,
    opts: &DaemonSetOptions,
    config_map: Option<&ConfigMap>,
) {
    if opts.pull_if_not_present {
        workload::set_pull_if_not_present(pod_spec);
    }
    if let Some(selector) = &opts.node_selector {
        workload::set_node_selector(pod_spec, selector);
    }
    if let Some(cm) = config_map {
        workload::set_config_map_volume(
            pod_spec,
            consts::CONFIG_VOLUME_NAME,
            &cm.name_any(),
            consts::CONFIG_MOUNT_PATH,
        );
    }

    let Some(container) = workload::main_container_mut(pod_spec) else {
        return;
    };

    if let Some(verbose) = opts.verbose {
        workload::set_container_flag(container, "-v", Some(&verbose.to_string()));
    }
    if let Some(interval) = opts.update_interval {
        let interval = format!("{}s", interval.as_secs());
        workload::set_container_flag(container, "-sleep-interval", Some(&interval));
    }
    if opts.pfp_enable {
        workload::set_container_flag(container, "-pods-fingerprint", None);
    } else {
        workload::remove_container_flag(container, "-pods-fingerprint");
    }
    if opts.notification_enable {
        workload::set_container_flag(container, "-kubelet-state-dir", Some(consts::KUBELET_STATE_DIR));
    } else {
        workload::remove_container_flag(container, "-kubelet-state-dir");
    }
    if config_map.is_some() {
        let path = format!("{}/{}", consts::CONFIG_MOUNT_PATH, consts::CONFIG_FILE_NAME);
        workload::set_container_flag(container, "-config", Some(&path));
    }
}

impl ManifestSet for UpdaterManifests {
    fn to_objects(&self) -> Vec<ManifestObject> {
        let mut objects = vec![
            ManifestObject::from(self.namespace.clone()),
            ManifestObject::from(self.service_account.clone()),
            ManifestObject::from(self.cluster_role.clone()),
            ManifestObject::from(self.cluster_role_binding.clone()),
        ];
        if let Some(cm) = &self.config_map {
            objects.push(ManifestObject::from(cm.clone()));
        }
        objects.push(ManifestObject::from(self.daemon_set.clone()));
        objects
    }
}
