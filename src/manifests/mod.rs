// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Template sets: immutable per-platform prototypes rendered into
//! ready-to-submit manifest sets.

pub mod assets;
pub mod scheduler;
pub mod updater;

pub use assets::{load, AssetKind, AssetSource, Component, EmbeddedAssets, SubComponent};
pub use scheduler::{SchedulerManifests, SchedulerRenderOptions};
pub use updater::{DaemonSetOptions, UpdaterManifests, UpdaterRenderOptions};
