// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Best-effort removal of every deployed component.

use super::objects::{ManifestSet, WaitableObject};
use crate::error::{DeployerError, Result};
use crate::manifests::{
    AssetSource, SchedulerManifests, SchedulerRenderOptions, UpdaterManifests,
    UpdaterRenderOptions,
};
use crate::types::Platform;
use tracing::{info, warn};

/// Result of preparing the removal of one component
#[derive(Debug)]
pub struct StepOutcome {
    pub step: &'static str,
    pub error: Option<DeployerError>,
}

/// Objects to delete, in order, plus what happened at each step. A failed
/// step contributes no objects but never stops the later ones.
#[derive(Debug, Default)]
pub struct RemovalPlan {
    pub objects: Vec<WaitableObject>,
    pub outcomes: Vec<StepOutcome>,
}

impl RemovalPlan {
    pub fn record(&mut self, step: &'static str, result: Result<Vec<WaitableObject>>) {
        match result {
            Ok(objects) => {
                info!(step, objects = objects.len(), "component queued for removal");
                self.objects.extend(objects);
                self.outcomes.push(StepOutcome { step, error: None });
            }
            Err(e) => {
                warn!(step, error = %e, "cannot prepare component removal, continuing");
                self.outcomes.push(StepOutcome {
                    step,
                    error: Some(e),
                });
            }
        }
    }

    pub fn succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.error.is_none())
    }

    pub fn errors(&self) -> impl Iterator<Item = (&'static str, &DeployerError)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|o| o.error.as_ref().map(|e| (o.step, e)))
    }
}

/// Collect the deletable objects of the scheduler, then the updater. The
/// scheduler goes first since it consumes what the updater publishes.
pub fn plan_removal<S: AssetSource + ?Sized>(
    source: &S,
    platform: Platform,
    updater_opts: &UpdaterRenderOptions,
    sched_opts: &SchedulerRenderOptions,
) -> RemovalPlan {
    let mut plan = RemovalPlan::default();

    plan.record(
        "scheduler",
        SchedulerManifests::new(source, platform, &sched_opts.namespace)
            .and_then(|mf| mf.render(sched_opts))
            .map(|mf| mf.to_deletable_objects()),
    );
    plan.record(
        "updater",
        UpdaterManifests::new(source, platform, &updater_opts.namespace)
            .and_then(|mf| mf.render(updater_opts))
            .map(|mf| mf.to_deletable_objects()),
    );

    plan
}
