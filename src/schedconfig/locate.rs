// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Locating plugin args inside the `profiles` section of a scheduler config.

use crate::constants::fields;
use crate::error::{DeployerError, Result};
use crate::tree;
use serde_yaml::{Sequence, Value};
use tracing::{debug, warn};

/// Position of one matching `pluginConfig` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PluginLocation {
    pub profile_name: String,
    pub profile_index: usize,
    pub plugin_index: usize,
}

impl PluginLocation {
    pub fn path(&self) -> String {
        format!(
            "{}[{}].{}[{}]",
            fields::PROFILES,
            self.profile_index,
            fields::PLUGIN_CONFIG,
            self.plugin_index
        )
    }

    pub fn args_path(&self) -> String {
        format!("{}.{}", self.path(), fields::ARGS)
    }

    /// The `args` value of this entry, if present
    pub fn args<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        self.entry(doc)?.get(fields::ARGS)
    }

    pub fn entry<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        doc.get(fields::PROFILES)?
            .get(self.profile_index)?
            .get(fields::PLUGIN_CONFIG)?
            .get(self.plugin_index)
    }

    pub fn entry_mut<'a>(&self, doc: &'a mut Value) -> Option<&'a mut Value> {
        doc.get_mut(fields::PROFILES)?
            .get_mut(self.profile_index)?
            .get_mut(fields::PLUGIN_CONFIG)?
            .get_mut(self.plugin_index)
    }
}

/// Prefix the path of a shape error with the location it was found under
pub(crate) fn scoped(prefix: &str, err: DeployerError) -> DeployerError {
    match err {
        DeployerError::UnexpectedShape { path, expected } => DeployerError::UnexpectedShape {
            path: if path == "." {
                prefix.to_string()
            } else {
                format!("{prefix}.{path}")
            },
            expected,
        },
        other => other,
    }
}

/// Top-level `profiles` sequence. Absent or malformed documents have none.
pub(crate) fn top_level_profiles(doc: &Value) -> Option<&Sequence> {
    match tree::nested_seq(doc, &[fields::PROFILES]) {
        Ok(Some(profiles)) => Some(profiles),
        Ok(None) => {
            debug!("scheduler config has no profiles");
            None
        }
        Err(e) => {
            warn!(error = %e, "failed to process scheduler config profiles");
            None
        }
    }
}

/// Find every `pluginConfig` entry named `plugin_name`, restricted to the
/// profile called `profile_name` when one is given. Entries are returned in
/// document order. A profile or plugin entry of the wrong shape is an error.
pub(crate) fn locate_plugin_args(
    profiles: &Sequence,
    profile_name: Option<&str>,
    plugin_name: &str,
) -> Result<Vec<PluginLocation>> {
    let mut found = Vec::new();

    for (profile_index, profile) in profiles.iter().enumerate() {
        let profile_path = format!("{}[{}]", fields::PROFILES, profile_index);
        if !profile.is_mapping() {
            return Err(DeployerError::UnexpectedShape {
                path: profile_path,
                expected: "mapping",
            });
        }

        let name = tree::nested_str(profile, &[fields::SCHEDULER_NAME])
            .map_err(|e| scoped(&profile_path, e))?
            .ok_or_else(|| DeployerError::UnexpectedShape {
                path: format!("{profile_path}.{}", fields::SCHEDULER_NAME),
                expected: "string",
            })?;

        if profile_name.is_some_and(|wanted| wanted != name) {
            continue;
        }

        let plugin_configs = tree::nested_seq(profile, &[fields::PLUGIN_CONFIG])
            .map_err(|e| scoped(&profile_path, e))?;
        let Some(plugin_configs) = plugin_configs else {
            debug!(profile = name, "profile has no plugin config");
            continue;
        };

        for (plugin_index, plugin_conf) in plugin_configs.iter().enumerate() {
            let location = PluginLocation {
                profile_name: name.to_string(),
                profile_index,
                plugin_index,
            };
            let plugin_path = location.path();
            if !plugin_conf.is_mapping() {
                return Err(DeployerError::UnexpectedShape {
                    path: plugin_path,
                    expected: "mapping",
                });
            }

            let conf_name = tree::nested_str(plugin_conf, &[fields::NAME])
                .map_err(|e| scoped(&plugin_path, e))?
                .ok_or_else(|| DeployerError::UnexpectedShape {
                    path: format!("{plugin_path}.{}", fields::NAME),
                    expected: "string",
                })?;
            if conf_name != plugin_name {
                continue;
            }

            tree::nested_map(plugin_conf, &[fields::ARGS]).map_err(|e| scoped(&plugin_path, e))?;

            found.push(location);
        }
    }

    Ok(found)
}
