// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Secondary topology-aware scheduler manifests.

use super::assets::{load, AssetKind, AssetSource, Component, SubComponent};
use crate::constants::sched;
use crate::deployer::{ManifestObject, ManifestSet};
use crate::error::{DeployerError, Result};
use crate::objectupdate::{rbac, workload};
use crate::schedconfig;
use crate::types::{CacheParams, ConfigParams, Platform};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, ServiceAccount};
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding};
use kube::ResourceExt;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Clone, Debug, Default)]
pub struct SchedulerRenderOptions {
    pub namespace: String,
    pub replicas: Option<i32>,
    pub pull_if_not_present: bool,
    /// Scheduler profile whose plugin args are patched; empty leaves the
    /// configuration as shipped
    pub profile_name: String,
    pub cache_resync_period: Option<Duration>,
    pub ctrl_plane_affinity: bool,
    pub verbose: Option<u32>,
}

impl SchedulerRenderOptions {
    /// Plugin parameters to patch into the scheduler configuration
    pub fn config_params(&self) -> Result<Option<ConfigParams>> {
        if self.profile_name.is_empty() {
            return Ok(None);
        }
        let cache = match self.cache_resync_period {
            Some(period) => {
                let seconds = i64::try_from(period.as_secs()).map_err(|_| {
                    DeployerError::UnsupportedValue {
                        field: "cacheResyncPeriod",
                        value: format!("{period:?}"),
                    }
                })?;
                Some(CacheParams {
                    resync_period_seconds: Some(seconds),
                    ..Default::default()
                })
            }
            None => None,
        };
        Ok(Some(ConfigParams {
            profile_name: self.profile_name.clone(),
            cache,
            scoring_strategy: None,
        }))
    }
}

#[derive(Clone, Debug)]
pub struct SchedulerManifests {
    pub namespace: Namespace,
    pub service_account: ServiceAccount,
    pub cluster_role: ClusterRole,
    pub cluster_role_binding: ClusterRoleBinding,
    pub config_map: ConfigMap,
    pub deployment: Deployment,
    platform: Platform,
}

impl SchedulerManifests {
    #[instrument(skip(source))]
    pub fn new<S: AssetSource + ?Sized>(
        source: &S,
        platform: Platform,
        namespace: &str,
    ) -> Result<Self> {
        let (c, s) = (Component::SchedulerPlugin, SubComponent::Scheduler);

        let mut ns: Namespace = load(source, platform, c, s, AssetKind::Namespace)?;
        let mut service_account: ServiceAccount =
            load(source, platform, c, s, AssetKind::ServiceAccount)?;
        let cluster_role: ClusterRole = load(source, platform, c, s, AssetKind::ClusterRole)?;
        let cluster_role_binding: ClusterRoleBinding =
            load(source, platform, c, s, AssetKind::ClusterRoleBinding)?;
        let mut config_map: ConfigMap = load(source, platform, c, s, AssetKind::ConfigMap)?;
        let mut deployment: Deployment = load(source, platform, c, s, AssetKind::Deployment)?;

        if !config_map
            .data
            .as_ref()
            .is_some_and(|data| data.contains_key(sched::CONFIG_FILE_NAME))
        {
            return Err(DeployerError::MissingTemplateObject(format!(
                "ConfigMap {}: data key {}",
                config_map.name_any(),
                sched::CONFIG_FILE_NAME
            )));
        }
        workload::deployment_pod_spec(&deployment)?;

        if !namespace.is_empty() {
            ns.metadata.name = Some(namespace.to_string());
            service_account.metadata.namespace = Some(namespace.to_string());
            config_map.metadata.namespace = Some(namespace.to_string());
            deployment.metadata.namespace = Some(namespace.to_string());
        }

        Ok(Self {
            namespace: ns,
            service_account,
            cluster_role,
            cluster_role_binding,
            config_map,
            deployment,
            platform,
        })
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Produce a rendered copy; `self` is never modified.
    #[instrument(skip(self, opts), fields(platform = %self.platform))]
    pub fn render(&self, opts: &SchedulerRenderOptions) -> Result<Self> {
        let mut ret = self.clone();

        if !opts.namespace.is_empty() {
            ret.namespace.metadata.name = Some(opts.namespace.clone());
            ret.service_account.metadata.namespace = Some(opts.namespace.clone());
            ret.config_map.metadata.namespace = Some(opts.namespace.clone());
            ret.deployment.metadata.namespace = Some(opts.namespace.clone());
        }
        let namespace = ret
            .service_account
            .namespace()
            .unwrap_or_else(|| ret.namespace.name_any());

        let sa_name = ret.service_account.name_any();
        rbac::cluster_role_binding(&mut ret.cluster_role_binding, &sa_name, &namespace);

        if let Some(replicas) = opts.replicas {
            ret.deployment.spec.get_or_insert_with(Default::default).replicas = Some(replicas);
        }

        let pod_spec = workload::deployment_pod_spec_mut(&mut ret.deployment)?;
        pod_spec.service_account_name = Some(sa_name);
        if opts.pull_if_not_present {
            workload::set_pull_if_not_present(pod_spec);
        }
        if opts.ctrl_plane_affinity {
            workload::set_control_plane_affinity(pod_spec);
        }
        if let (Some(verbose), Some(container)) =
            (opts.verbose, workload::main_container_mut(pod_spec))
        {
            workload::set_container_flag(container, "--v", Some(&verbose.to_string()));
        }

        if let Some(params) = opts.config_params()? {
            schedconfig::scheduler_config(&mut ret.config_map, &opts.profile_name, Some(&params))?;
        }

        debug!(
            namespace = %namespace,
            profile = %opts.profile_name,
            "rendered scheduler manifests"
        );
        Ok(ret)
    }
}

impl ManifestSet for SchedulerManifests {
    fn to_objects(&self) -> Vec<ManifestObject> {
        vec![
            ManifestObject::from(self.namespace.clone()),
            ManifestObject::from(self.service_account.clone()),
            ManifestObject::from(self.cluster_role.clone()),
            ManifestObject::from(self.cluster_role_binding.clone()),
            ManifestObject::from(self.config_map.clone()),
            ManifestObject::from(self.deployment.clone()),
        ]
    }
}
