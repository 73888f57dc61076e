// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Scheduler configuration document embedded in the scheduler ConfigMap
pub mod sched {
    /// Key of the ConfigMap data entry holding the scheduler configuration
    pub const CONFIG_FILE_NAME: &str = "scheduler-config.yaml";
    /// Plugin whose args carry the topology-aware parameters
    pub const PLUGIN_NAME: &str = "NodeResourceTopologyMatch";
    /// Profile name shipped with the default scheduler configuration
    pub const DEFAULT_PROFILE_NAME: &str = "topology-aware-scheduler";
    /// Resync period applied by `CacheParams::with_defaults`
    pub const DEFAULT_RESYNC_PERIOD_SECONDS: i64 = 5;
}

/// Field names inside the plugin args map
pub mod fields {
    pub const PROFILES: &str = "profiles";
    pub const SCHEDULER_NAME: &str = "schedulerName";
    pub const PLUGIN_CONFIG: &str = "pluginConfig";
    pub const NAME: &str = "name";
    pub const ARGS: &str = "args";
    pub const CACHE_RESYNC_PERIOD_SECONDS: &str = "cacheResyncPeriodSeconds";
    pub const CACHE: &str = "cache";
    pub const RESYNC_METHOD: &str = "resyncMethod";
    pub const FOREIGN_PODS_DETECT: &str = "foreignPodsDetect";
    pub const INFORMER_MODE: &str = "informerMode";
    pub const SCORING_STRATEGY: &str = "scoringStrategy";
    pub const TYPE: &str = "type";
    pub const RESOURCES: &str = "resources";
    pub const WEIGHT: &str = "weight";
}

/// Topology updater daemon settings
pub mod updater {
    /// Key of the ConfigMap data entry holding the updater configuration
    pub const CONFIG_FILE_NAME: &str = "config.yaml";
    /// Where the updater configuration is mounted inside the daemon
    pub const CONFIG_MOUNT_PATH: &str = "/etc/topology-updater";
    pub const CONFIG_VOLUME_NAME: &str = "updater-config";
    /// Kubelet state directory passed when notifications are enabled
    pub const KUBELET_STATE_DIR: &str = "/host-var/lib/kubelet";
}

/// Label and taint keys used for control-plane placement
pub mod placement {
    pub const CONTROL_PLANE_LABEL: &str = "node-role.kubernetes.io/control-plane";
}

/// Platform assumed when nothing else is known
pub mod platform {
    pub const DEFAULT_VERSION: &str = "1.30";
}
