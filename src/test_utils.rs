// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for unit tests.

use crate::manifests::EmbeddedAssets;
use crate::manifests::{SchedulerManifests, UpdaterManifests};
use crate::types::Platform;

pub const PROFILE_NAME: &str = "topology-aware-scheduler";

pub const CONFIG_TEMPLATE_EMPTY: &str = r#"apiVersion: kubescheduler.config.k8s.io/v1beta2
kind: KubeSchedulerConfiguration
leaderElection:
  leaderElect: false
profiles:
- pluginConfig:
  - args: {}
    name: NodeResourceTopologyMatch
  plugins:
    filter:
      enabled:
      - name: NodeResourceTopologyMatch
    reserve:
      enabled:
      - name: NodeResourceTopologyMatch
    score:
      enabled:
      - name: NodeResourceTopologyMatch
  schedulerName: topology-aware-scheduler
"#;

pub const CONFIG_TEMPLATE_ALL_VALUES: &str = r#"apiVersion: kubescheduler.config.k8s.io/v1beta2
kind: KubeSchedulerConfiguration
leaderElection:
  leaderElect: false
profiles:
- pluginConfig:
  - args:
      cacheResyncPeriodSeconds: 5
    name: NodeResourceTopologyMatch
  plugins:
    filter:
      enabled:
      - name: NodeResourceTopologyMatch
    reserve:
      enabled:
      - name: NodeResourceTopologyMatch
    score:
      enabled:
      - name: NodeResourceTopologyMatch
  schedulerName: topology-aware-scheduler
"#;

pub const CONFIG_TEMPLATE_FULL_ARGS: &str = r#"apiVersion: kubescheduler.config.k8s.io/v1
kind: KubeSchedulerConfiguration
profiles:
- pluginConfig:
  - args:
      cache:
        foreignPodsDetect: OnlyExclusiveResources
        informerMode: Dedicated
        resyncMethod: Autodetect
      cacheResyncPeriodSeconds: 10
      scoringStrategy:
        resources:
        - name: cpu
          weight: 2
        - name: memory
          weight: 1.0
        type: LeastAllocated
    name: NodeResourceTopologyMatch
  schedulerName: topology-aware-scheduler
"#;

pub const CONFIG_TEMPLATE_TWO_PROFILES: &str = r#"apiVersion: kubescheduler.config.k8s.io/v1
kind: KubeSchedulerConfiguration
profiles:
- pluginConfig:
  - args:
      cacheResyncPeriodSeconds: 3
    name: NodeResourceTopologyMatch
  schedulerName: first-scheduler
- pluginConfig:
  - args:
      foo: bar
    name: SomeOtherPlugin
  - args:
      cacheResyncPeriodSeconds: 7
    name: NodeResourceTopologyMatch
  schedulerName: second-scheduler
"#;

pub fn make_updater_manifests(platform: Platform) -> UpdaterManifests {
    UpdaterManifests::new(&EmbeddedAssets, platform, "").unwrap()
}

pub fn make_scheduler_manifests(platform: Platform) -> SchedulerManifests {
    SchedulerManifests::new(&EmbeddedAssets, platform, "").unwrap()
}
