// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Reading plugin parameters back out of a scheduler configuration.
//!
//! Two entry points share the same traversal:
//! - [`extract`] / [`decode_profile`] look up one profile and fail on the first
//!   problem they meet.
//! - [`extract_all`] / [`decode_profiles`] collect every profile, skipping the
//!   ones whose args do not validate.

use super::locate::{locate_plugin_args, scoped, top_level_profiles, PluginLocation};
use crate::constants::{fields, sched::PLUGIN_NAME};
use crate::error::{DeployerError, Result};
use crate::tree;
use crate::types::{CacheParams, ConfigParams, ResourceSpec, ScoringStrategyParams};
use serde_yaml::Value;
use tracing::{debug, warn};

/// Extract the parameters of `plugin_name` inside the profile `profile_name`.
///
/// An empty `profile_name` yields empty parameters. Otherwise a missing
/// profile, a malformed profile entry or an invalid field value is an error.
pub fn extract(doc: &Value, profile_name: &str, plugin_name: &str) -> Result<ConfigParams> {
    if profile_name.is_empty() {
        return Ok(ConfigParams::default());
    }

    let Some(profiles) = top_level_profiles(doc) else {
        return Err(DeployerError::NoParameters(profile_name.to_string()));
    };

    let locations = locate_plugin_args(profiles, Some(profile_name), plugin_name)?;
    let Some(location) = locations.first() else {
        return Err(DeployerError::NoParameters(profile_name.to_string()));
    };

    extract_at(doc, location)
}

/// Extract the parameters of `plugin_name` from every profile.
///
/// Malformed documents produce an empty list. Profiles whose args fail
/// validation are logged and skipped.
pub fn extract_all(doc: &Value, plugin_name: &str) -> Vec<ConfigParams> {
    let Some(profiles) = top_level_profiles(doc) else {
        return Vec::new();
    };

    let locations = match locate_plugin_args(profiles, None, plugin_name) {
        Ok(locations) => locations,
        Err(e) => {
            warn!(error = %e, "failed to process scheduler profiles");
            return Vec::new();
        }
    };

    locations
        .iter()
        .filter_map(|location| match extract_at(doc, location) {
            Ok(params) => Some(params),
            Err(e) => {
                warn!(
                    error = %e,
                    profile = %location.profile_name,
                    plugin = plugin_name,
                    "failed to extract params"
                );
                None
            }
        })
        .collect()
}

/// Decode a scheduler configuration and extract the topology plugin
/// parameters of one profile. Undecodable data counts as "no profiles".
pub fn decode_profile(data: &[u8], profile_name: &str) -> Result<ConfigParams> {
    let doc = tree::decode(data).unwrap_or_else(|e| {
        warn!(error = %e, "cannot unmarshal scheduler config");
        Value::Null
    });
    extract(&doc, profile_name, PLUGIN_NAME)
}

/// Decode a scheduler configuration and extract the topology plugin
/// parameters of every profile.
pub fn decode_profiles(data: &[u8]) -> Vec<ConfigParams> {
    match tree::decode(data) {
        Ok(doc) => extract_all(&doc, PLUGIN_NAME),
        Err(e) => {
            warn!(error = %e, "cannot unmarshal scheduler config");
            Vec::new()
        }
    }
}

fn extract_at(doc: &Value, location: &PluginLocation) -> Result<ConfigParams> {
    debug!(profile = %location.profile_name, path = %location.path(), "extracting params");
    let args_path = location.args_path();
    extract_params(&location.profile_name, location.args(doc))
        .map_err(|e| scoped(&args_path, e))
}

/// Unknown fields are ignored; known fields must hold a supported value.
fn extract_params(profile_name: &str, args: Option<&Value>) -> Result<ConfigParams> {
    let mut cache = CacheParams::default();
    let mut params = ConfigParams {
        profile_name: profile_name.to_string(),
        cache: None,
        scoring_strategy: None,
    };

    let Some(args) = args else {
        params.cache = Some(cache);
        return Ok(params);
    };

    if let Some(period) = tree::nested_i64(args, &[fields::CACHE_RESYNC_PERIOD_SECONDS])? {
        if period < 0 {
            return Err(DeployerError::UnsupportedValue {
                field: "cacheResyncPeriodSeconds",
                value: period.to_string(),
            });
        }
        cache.resync_period_seconds = Some(period);
    }

    if let Some(method) = tree::nested_str(args, &[fields::CACHE, fields::RESYNC_METHOD])? {
        cache.resync_method = Some(method.parse()?);
    }
    if let Some(mode) = tree::nested_str(args, &[fields::CACHE, fields::FOREIGN_PODS_DETECT])? {
        cache.foreign_pods_detect_mode = Some(mode.parse()?);
    }
    if let Some(mode) = tree::nested_str(args, &[fields::CACHE, fields::INFORMER_MODE])? {
        cache.informer_mode = Some(mode.parse()?);
    }
    params.cache = Some(cache);

    if tree::nested_map(args, &[fields::SCORING_STRATEGY])?.is_some() {
        params.scoring_strategy = Some(extract_scoring_strategy(args)?);
    }

    Ok(params)
}

fn extract_scoring_strategy(args: &Value) -> Result<ScoringStrategyParams> {
    let mut strategy = ScoringStrategyParams::default();

    if let Some(type_) = tree::nested_str(args, &[fields::SCORING_STRATEGY, fields::TYPE])? {
        strategy.type_ = Some(type_.parse()?);
    }

    let Some(resources) = tree::nested_seq(args, &[fields::SCORING_STRATEGY, fields::RESOURCES])?
    else {
        return Ok(strategy);
    };

    for (idx, resource) in resources.iter().enumerate() {
        let path = format!("{}.{}[{}]", fields::SCORING_STRATEGY, fields::RESOURCES, idx);
        if !resource.is_mapping() {
            return Err(DeployerError::UnexpectedShape {
                path,
                expected: "mapping",
            });
        }

        let name = tree::nested_str(resource, &[fields::NAME])
            .map_err(|e| scoped(&path, e))?
            .ok_or_else(|| DeployerError::UnexpectedShape {
                path: format!("{path}.{}", fields::NAME),
                expected: "string",
            })?;
        let weight = tree::nested_i64(resource, &[fields::WEIGHT])
            .map_err(|e| scoped(&path, e))?
            .ok_or_else(|| DeployerError::UnexpectedShape {
                path: format!("{path}.{}", fields::WEIGHT),
                expected: "integer",
            })?;

        strategy.resources.push(ResourceSpec {
            name: name.to_string(),
            weight,
        });
    }

    Ok(strategy)
}
