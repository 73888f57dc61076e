// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Rewriting plugin parameters inside a scheduler configuration.
//!
//! Patching never fails the caller: whenever the document cannot be decoded
//! or traversed the original bytes are handed back unchanged.

use super::locate::{locate_plugin_args, PluginLocation};
use crate::constants::{fields, sched};
use crate::error::{DeployerError, Result};
use crate::tree;
use crate::types::{CacheParams, ConfigParams, ScoringStrategyParams};
use k8s_openapi::api::core::v1::ConfigMap;
use kube::ResourceExt;
use serde_yaml::{Mapping, Value};
use tracing::{debug, info, warn};

/// Apply `params` to the topology plugin args of `profile_name`.
///
/// Only fields set in `params` are written. An empty profile name or missing
/// params pass the data through untouched, as does a document without a
/// matching profile.
pub fn render_config(data: &[u8], profile_name: &str, params: Option<&ConfigParams>) -> Vec<u8> {
    let Some(params) = params.filter(|_| !profile_name.is_empty()) else {
        info!(
            profile = profile_name,
            has_params = params.is_some(),
            "missing parameters, passing through"
        );
        return data.to_vec();
    };

    match patch_document(data, profile_name, params) {
        Ok(Some(patched)) => patched,
        Ok(None) => data.to_vec(),
        Err(e) => {
            warn!(error = %e, profile = profile_name, "cannot patch scheduler config, passing through");
            data.to_vec()
        }
    }
}

/// Patch the scheduler configuration stored in `cm`, leaving every other
/// data key alone.
pub fn scheduler_config(
    cm: &mut ConfigMap,
    profile_name: &str,
    params: Option<&ConfigParams>,
) -> Result<()> {
    let cm_ref = format!("{}/{}", cm.namespace().unwrap_or_default(), cm.name_any());

    let Some(data) = cm.data.as_mut() else {
        return Err(DeployerError::ConfigData(format!(
            "no data found in ConfigMap {cm_ref}"
        )));
    };
    let Some(current) = data.get(sched::CONFIG_FILE_NAME) else {
        return Err(DeployerError::ConfigData(format!(
            "no data key named {} found in ConfigMap {cm_ref}",
            sched::CONFIG_FILE_NAME
        )));
    };

    let rendered = render_config(current.as_bytes(), profile_name, params);
    let rendered = String::from_utf8(rendered)
        .map_err(|e| DeployerError::ConfigData(format!("rendered config is not UTF-8: {e}")))?;
    data.insert(sched::CONFIG_FILE_NAME.to_string(), rendered);
    Ok(())
}

/// Returns `Ok(None)` when nothing in the document matched.
fn patch_document(
    data: &[u8],
    profile_name: &str,
    params: &ConfigParams,
) -> Result<Option<Vec<u8>>> {
    let mut doc = tree::decode(data)?;

    let Some(profiles) = tree::nested_seq(&doc, &[fields::PROFILES])? else {
        info!("scheduler config has no profiles, passing through");
        return Ok(None);
    };

    let locations = locate_plugin_args(profiles, Some(profile_name), sched::PLUGIN_NAME)?;
    if locations.is_empty() {
        info!(profile = profile_name, "no matching profile found, passing through");
        return Ok(None);
    }

    for location in &locations {
        let args = plugin_args_mut(&mut doc, location)?;
        update_args(args, params)?;
        debug!(profile = profile_name, path = %location.args_path(), "updated plugin args");
    }

    Ok(Some(tree::encode(&doc)?))
}

/// The args mapping of a located entry, created empty when absent
fn plugin_args_mut<'a>(doc: &'a mut Value, location: &PluginLocation) -> Result<&'a mut Value> {
    let shape_err = || DeployerError::UnexpectedShape {
        path: location.path(),
        expected: "mapping",
    };

    let entry = location.entry_mut(doc).ok_or_else(shape_err)?;
    if entry.get(fields::ARGS).is_none() {
        tree::set_nested_field(entry, Value::Mapping(Mapping::new()), &[fields::ARGS])?;
    }
    tree::nested_field_mut(entry, &[fields::ARGS])?.ok_or_else(shape_err)
}

fn update_args(args: &mut Value, params: &ConfigParams) -> Result<()> {
    if let Some(cache) = &params.cache {
        update_cache_args(args, cache)?;
    }
    if let Some(strategy) = &params.scoring_strategy {
        update_scoring_args(args, strategy)?;
    }
    ensure_backward_compatibility(args)
}

fn update_cache_args(args: &mut Value, cache: &CacheParams) -> Result<()> {
    if let Some(period) = cache.resync_period_seconds {
        if period < 0 {
            return Err(DeployerError::UnsupportedValue {
                field: "cacheResyncPeriodSeconds",
                value: period.to_string(),
            });
        }
        tree::set_nested_field(args, Value::from(period), &[fields::CACHE_RESYNC_PERIOD_SECONDS])?;
    }
    if let Some(method) = cache.resync_method {
        tree::set_nested_field(
            args,
            Value::from(method.as_str()),
            &[fields::CACHE, fields::RESYNC_METHOD],
        )?;
    }
    if let Some(mode) = cache.foreign_pods_detect_mode {
        tree::set_nested_field(
            args,
            Value::from(mode.as_str()),
            &[fields::CACHE, fields::FOREIGN_PODS_DETECT],
        )?;
    }
    if let Some(mode) = cache.informer_mode {
        tree::set_nested_field(
            args,
            Value::from(mode.as_str()),
            &[fields::CACHE, fields::INFORMER_MODE],
        )?;
    }
    Ok(())
}

fn update_scoring_args(args: &mut Value, strategy: &ScoringStrategyParams) -> Result<()> {
    if let Some(type_) = strategy.type_ {
        tree::set_nested_field(
            args,
            Value::from(type_.as_str()),
            &[fields::SCORING_STRATEGY, fields::TYPE],
        )?;
    }
    if !strategy.resources.is_empty() {
        let resources = strategy
            .resources
            .iter()
            .map(|res| {
                let mut entry = Mapping::new();
                entry.insert(Value::from(fields::NAME), Value::from(res.name.clone()));
                entry.insert(Value::from(fields::WEIGHT), Value::from(res.weight));
                Value::Mapping(entry)
            })
            .collect();
        tree::set_nested_field(
            args,
            Value::Sequence(resources),
            &[fields::SCORING_STRATEGY, fields::RESOURCES],
        )?;
    }
    Ok(())
}

/// A zero resync period is removed instead of written out; older plugin
/// versions treat an explicit zero differently from an absent field.
fn ensure_backward_compatibility(args: &mut Value) -> Result<()> {
    let is_zero = matches!(
        tree::nested_field(args, &[fields::CACHE_RESYNC_PERIOD_SECONDS])?,
        Some(Value::Number(n)) if n.as_f64() == Some(0.0)
    );
    if is_zero {
        tree::remove_nested_field(args, &[fields::CACHE_RESYNC_PERIOD_SECONDS])?;
    }
    Ok(())
}
