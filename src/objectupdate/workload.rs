// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Field-level updates of workload pod templates.

use crate::constants::placement::CONTROL_PLANE_LABEL;
use crate::error::{DeployerError, Result};
use crate::objectupdate::flags;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment};
use k8s_openapi::api::core::v1::{
    ConfigMapVolumeSource, Container, PodSpec, Toleration, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::ResourceExt;

fn missing(kind: &str, name: &str, what: &str) -> DeployerError {
    DeployerError::MissingTemplateObject(format!("{kind} {name}: {what}"))
}

fn check_pod_spec<'a>(spec: Option<&'a PodSpec>, kind: &str, name: &str) -> Result<&'a PodSpec> {
    let spec = spec.ok_or_else(|| missing(kind, name, "pod template spec"))?;
    if spec.containers.is_empty() {
        return Err(missing(kind, name, "containers"));
    }
    Ok(spec)
}

pub fn daemon_set_pod_spec(ds: &DaemonSet) -> Result<&PodSpec> {
    let spec = ds.spec.as_ref().and_then(|s| s.template.spec.as_ref());
    check_pod_spec(spec, "DaemonSet", &ds.name_any())
}

pub fn daemon_set_pod_spec_mut(ds: &mut DaemonSet) -> Result<&mut PodSpec> {
    daemon_set_pod_spec(ds)?;
    let name = ds.name_any();
    ds.spec
        .as_mut()
        .and_then(|s| s.template.spec.as_mut())
        .ok_or_else(|| missing("DaemonSet", &name, "pod template spec"))
}

pub fn deployment_pod_spec(dp: &Deployment) -> Result<&PodSpec> {
    let spec = dp.spec.as_ref().and_then(|s| s.template.spec.as_ref());
    check_pod_spec(spec, "Deployment", &dp.name_any())
}

pub fn deployment_pod_spec_mut(dp: &mut Deployment) -> Result<&mut PodSpec> {
    deployment_pod_spec(dp)?;
    let name = dp.name_any();
    dp.spec
        .as_mut()
        .and_then(|s| s.template.spec.as_mut())
        .ok_or_else(|| missing("Deployment", &name, "pod template spec"))
}

/// The first container is the one carrying the component binary
pub fn main_container_mut(spec: &mut PodSpec) -> Option<&mut Container> {
    spec.containers.first_mut()
}

pub fn set_pull_if_not_present(spec: &mut PodSpec) {
    for container in spec.containers.iter_mut() {
        container.image_pull_policy = Some("IfNotPresent".to_string());
    }
}

pub fn set_container_flag(container: &mut Container, name: &str, value: Option<&str>) {
    flags::set_flag(container.args.get_or_insert_with(Vec::new), name, value);
}

pub fn remove_container_flag(container: &mut Container, name: &str) {
    if let Some(args) = container.args.as_mut() {
        flags::remove_flag(args, name);
    }
}

/// Schedule only onto nodes carrying the selector's `matchLabels`
pub fn set_node_selector(spec: &mut PodSpec, selector: &LabelSelector) {
    let node_selector = spec.node_selector.get_or_insert_with(Default::default);
    for (key, value) in selector.match_labels.iter().flatten() {
        node_selector.insert(key.clone(), value.clone());
    }
}

/// Pin the pods to control-plane nodes and tolerate their taint
pub fn set_control_plane_affinity(spec: &mut PodSpec) {
    spec.node_selector
        .get_or_insert_with(Default::default)
        .insert(CONTROL_PLANE_LABEL.to_string(), String::new());

    let tolerations = spec.tolerations.get_or_insert_with(Vec::new);
    if !tolerations
        .iter()
        .any(|t| t.key.as_deref() == Some(CONTROL_PLANE_LABEL))
    {
        tolerations.push(Toleration {
            key: Some(CONTROL_PLANE_LABEL.to_string()),
            operator: Some("Exists".to_string()),
            effect: Some("NoSchedule".to_string()),
            ..Default::default()
        });
    }
}

/// Mount `config_map_name` read-only at `mount_path` in the main container,
/// replacing a volume of the same name.
pub fn set_config_map_volume(
    spec: &mut PodSpec,
    volume_name: &str,
    config_map_name: &str,
    mount_path: &str,
) {
    let volume = Volume {
        name: volume_name.to_string(),
        config_map: Some(ConfigMapVolumeSource {
            name: config_map_name.to_string(),
            ..Default::default()
        }),
        ..Default::default()
    };
    let volumes = spec.volumes.get_or_insert_with(Vec::new);
    volumes.retain(|v| v.name != volume_name);
    volumes.push(volume);

    if let Some(container) = main_container_mut(spec) {
        let mounts = container.volume_mounts.get_or_insert_with(Vec::new);
        mounts.retain(|m| m.name != volume_name);
        mounts.push(VolumeMount {
            name: volume_name.to_string(),
            mount_path: mount_path.to_string(),
            read_only: Some(true),
            ..Default::default()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::apps::v1::DaemonSetSpec;
    use k8s_openapi::api::core::v1::PodTemplateSpec;
    use std::collections::BTreeMap;

    fn make_pod_spec() -> PodSpec {
        PodSpec {
            containers: vec![
                Container {
                    name: "main".to_string(),
                    args: Some(vec!["-v=2".to_string()]),
                    ..Default::default()
                },
                Container {
                    name: "sidecar".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_daemon_set_without_template_spec_is_missing() {
        let ds = DaemonSet {
            spec: Some(DaemonSetSpec {
                template: PodTemplateSpec::default(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            daemon_set_pod_spec(&ds),
            Err(DeployerError::MissingTemplateObject(_))
        ));
    }

    #[test]
    fn test_deployment_without_containers_is_missing() {
        let mut dp = Deployment::default();
        dp.spec.get_or_insert_with(Default::default).template.spec = Some(PodSpec::default());
        let err = deployment_pod_spec(&dp).unwrap_err();
        assert!(err.to_string().contains("containers"));
    }

    #[test]
    fn test_pull_policy_applies_to_all_containers() {
        let mut spec = make_pod_spec();
        set_pull_if_not_present(&mut spec);
        assert!(spec
            .containers
            .iter()
            .all(|c| c.image_pull_policy.as_deref() == Some("IfNotPresent")));
    }

    #[test]
    fn test_node_selector_merges_match_labels() {
        let mut spec = make_pod_spec();
        spec.node_selector = Some(BTreeMap::from([("zone".to_string(), "a".to_string())]));
        let selector = LabelSelector {
            match_labels: Some(BTreeMap::from([("tas".to_string(), "true".to_string())])),
            ..Default::default()
        };

        set_node_selector(&mut spec, &selector);

        let node_selector = spec.node_selector.unwrap();
        assert_eq!(node_selector.len(), 2);
        assert_eq!(node_selector.get("tas").unwrap(), "true");
    }

    #[test]
    fn test_control_plane_affinity_is_idempotent() {
        let mut spec = make_pod_spec();
        set_control_plane_affinity(&mut spec);
        set_control_plane_affinity(&mut spec);
        assert_eq!(spec.tolerations.unwrap().len(), 1);
        assert!(spec.node_selector.unwrap().contains_key(CONTROL_PLANE_LABEL));
    }

    #[test]
    fn test_config_map_volume_replaces_existing() {
        let mut spec = make_pod_spec();
        set_config_map_volume(&mut spec, "cfg", "first", "/etc/a");
        set_config_map_volume(&mut spec, "cfg", "second", "/etc/b");

        let volumes = spec.volumes.unwrap();
        assert_eq!(volumes.len(), 1);
        assert_eq!(volumes[0].config_map.as_ref().unwrap().name, "second");
        let mounts = spec.containers[0].volume_mounts.as_ref().unwrap();
        assert_eq!(mounts.len(), 1);
        assert_eq!(mounts[0].mount_path, "/etc/b");
        assert!(spec.containers[1].volume_mounts.is_none());
    }

    #[test]
    fn test_container_flags() {
        let mut spec = make_pod_spec();
        let container = main_container_mut(&mut spec).unwrap();
        set_container_flag(container, "-v", Some("4"));
        set_container_flag(container, "-pods-fingerprint", None);
        remove_container_flag(container, "-v");
        assert_eq!(container.args.as_deref().unwrap(), ["-pods-fingerprint".to_string()]);
    }
}
