// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::platform::DEFAULT_VERSION;
use crate::manifests::{DaemonSetOptions, SchedulerRenderOptions, UpdaterRenderOptions};
use crate::types::{Platform, PlatformInfo, Source};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => bail!("unsupported output format {other:?}, expected yaml or json"),
        }
    }
}

/// Deployer configuration loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub platform: Option<Platform>,
    pub platform_version: Option<String>,
    /// Namespace of the topology updater; the scheduler keeps its own
    pub namespace: String,
    pub pull_if_not_present: bool,
    pub updater_verbose: Option<u32>,
    pub updater_sync_period: Option<Duration>,
    pub updater_pfp_enable: bool,
    pub updater_notification_enable: bool,
    pub updater_config_data: String,
    pub sched_profile_name: String,
    pub sched_resync_period: Option<Duration>,
    pub sched_verbose: Option<u32>,
    pub sched_replicas: Option<i32>,
    pub sched_ctrl_plane_affinity: bool,
    pub output_format: OutputFormat,
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("invalid value {raw:?} for {name}")),
        None => Ok(None),
    }
}

fn parse_seconds(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<Duration>> {
    Ok(parse_var::<u64>(lookup, name)?.map(Duration::from_secs))
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns the raw value of a
    /// variable when it is set
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).unwrap_or_default();

        Ok(Config {
            platform: parse_var(&lookup, "PLATFORM")?,
            platform_version: lookup("PLATFORM_VERSION").filter(|v| !v.is_empty()),
            namespace: var("NAMESPACE"),
            pull_if_not_present: parse_var(&lookup, "PULL_IF_NOT_PRESENT")?.unwrap_or(false),
            updater_verbose: parse_var(&lookup, "UPDATER_VERBOSE")?,
            updater_sync_period: parse_seconds(&lookup, "UPDATER_SYNC_PERIOD_SECONDS")?,
            updater_pfp_enable: parse_var(&lookup, "UPDATER_PFP_ENABLE")?.unwrap_or(false),
            updater_notification_enable: parse_var(&lookup, "UPDATER_NOTIFICATION_ENABLE")?
                .unwrap_or(false),
            updater_config_data: var("UPDATER_CONFIG_DATA"),
            sched_profile_name: var("SCHED_PROFILE_NAME"),
            sched_resync_period: parse_seconds(&lookup, "SCHED_RESYNC_PERIOD_SECONDS")?,
            sched_verbose: parse_var(&lookup, "SCHED_VERBOSE")?,
            sched_replicas: parse_var(&lookup, "SCHED_REPLICAS")?,
            sched_ctrl_plane_affinity: parse_var(&lookup, "SCHED_CTRL_PLANE_AFFINITY")?
                .unwrap_or(false),
            output_format: parse_var(&lookup, "OUTPUT_FORMAT")?.unwrap_or_default(),
        })
    }

    pub fn platform_info(&self) -> PlatformInfo {
        let (platform, platform_source) = match self.platform {
            Some(platform) => (platform, Source::UserSpecified),
            None => (Platform::Kubernetes, Source::Default),
        };
        let (version, version_source) = match &self.platform_version {
            Some(version) => (version.clone(), Source::UserSpecified),
            None => (DEFAULT_VERSION.to_string(), Source::Default),
        };
        PlatformInfo {
            platform,
            platform_source,
            version,
            version_source,
        }
    }

    pub fn updater_options(&self) -> UpdaterRenderOptions {
        UpdaterRenderOptions {
            daemon_set: DaemonSetOptions {
                verbose: self.updater_verbose,
                pull_if_not_present: self.pull_if_not_present,
                pfp_enable: self.updater_pfp_enable,
                notification_enable: self.updater_notification_enable,
                node_selector: None,
                update_interval: self.updater_sync_period,
            },
            config_data: self.updater_config_data.clone(),
            namespace: self.namespace.clone(),
            name: String::new(),
        }
    }

    pub fn scheduler_options(&self) -> SchedulerRenderOptions {
        SchedulerRenderOptions {
            namespace: String::new(),
            replicas: self.sched_replicas,
            pull_if_not_present: self.pull_if_not_present,
            profile_name: self.sched_profile_name.clone(),
            cache_resync_period: self.sched_resync_period,
            ctrl_plane_affinity: self.sched_ctrl_plane_affinity,
            verbose: self.sched_verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn make_config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = make_config(&[]).unwrap();
        let info = config.platform_info();

        assert_eq!(info.platform, Platform::Kubernetes);
        assert_eq!(info.platform_source, Source::Default);
        assert_eq!(info.version, "1.30");
        assert_eq!(info.version_source, Source::Default);
        assert_eq!(config.output_format, OutputFormat::Yaml);
        assert!(config.updater_options().config_data.is_empty());
        assert_eq!(config.scheduler_options().replicas, None);
    }

    #[test]
    fn test_user_specified_platform() {
        let config = make_config(&[("PLATFORM", "openshift"), ("PLATFORM_VERSION", "4.16")]).unwrap();
        let info = config.platform_info();

        assert_eq!(info.platform, Platform::OpenShift);
        assert_eq!(info.platform_source, Source::UserSpecified);
        assert_eq!(info.version, "4.16");
        assert_eq!(info.version_source, Source::UserSpecified);
    }

    #[test]
    fn test_render_options_from_env() {
        let config = make_config(&[
            ("NAMESPACE", "tas"),
            ("PULL_IF_NOT_PRESENT", "true"),
            ("UPDATER_VERBOSE", "4"),
            ("UPDATER_SYNC_PERIOD_SECONDS", "30"),
            ("UPDATER_PFP_ENABLE", "true"),
            ("SCHED_PROFILE_NAME", "topology-aware-scheduler"),
            ("SCHED_RESYNC_PERIOD_SECONDS", "0"),
            ("SCHED_REPLICAS", "2"),
            ("SCHED_CTRL_PLANE_AFFINITY", "true"),
            ("OUTPUT_FORMAT", "JSON"),
        ])
        .unwrap();

        let updater = config.updater_options();
        assert_eq!(updater.namespace, "tas");
        assert_eq!(updater.daemon_set.verbose, Some(4));
        assert_eq!(updater.daemon_set.update_interval, Some(Duration::from_secs(30)));
        assert!(updater.daemon_set.pfp_enable);
        assert!(!updater.daemon_set.notification_enable);

        let sched = config.scheduler_options();
        assert!(sched.namespace.is_empty());
        assert_eq!(sched.profile_name, "topology-aware-scheduler");
        assert_eq!(sched.cache_resync_period, Some(Duration::ZERO));
        assert_eq!(sched.replicas, Some(2));
        assert!(sched.ctrl_plane_affinity);
        assert!(sched.pull_if_not_present);
        assert_eq!(config.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = make_config(&[("SCHED_REPLICAS", "two")]).unwrap_err();
        assert!(format!("{err:#}").contains("SCHED_REPLICAS"));

        let err = make_config(&[("UPDATER_PFP_ENABLE", "yes")]).unwrap_err();
        assert!(format!("{err:#}").contains("UPDATER_PFP_ENABLE"));

        assert!(make_config(&[("OUTPUT_FORMAT", "toml")]).is_err());
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = make_config(&[("UPDATER_VERBOSE", " "), ("PLATFORM_VERSION", "")]).unwrap();
        assert_eq!(config.updater_verbose, None);
        assert_eq!(config.platform_info().version_source, Source::Default);
    }
}
