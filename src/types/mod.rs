// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Parameter and platform types shared by the renderers.

pub mod params;
pub mod platform;

pub use params::{
    find_profile_by_name, CacheInformerMode, CacheParams, CacheResyncMethod, ConfigParams,
    ForeignPodsDetectMode, ResourceSpec, ScoringStrategyParams, ScoringStrategyType,
};
pub use platform::{Platform, PlatformInfo, Source};
