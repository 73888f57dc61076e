// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed parameters of the topology-aware scheduler plugin

use crate::constants::sched::DEFAULT_RESYNC_PERIOD_SECONDS;
use crate::error::{DeployerError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// How the scheduler cache resynchronizes node topology data
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheResyncMethod {
    Autodetect,
    All,
    OnlyExclusiveResources,
}

impl CacheResyncMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Autodetect => "Autodetect",
            Self::All => "All",
            Self::OnlyExclusiveResources => "OnlyExclusiveResources",
        }
    }
}

impl FromStr for CacheResyncMethod {
    type Err = DeployerError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "Autodetect" => Ok(Self::Autodetect),
            "All" => Ok(Self::All),
            "OnlyExclusiveResources" => Ok(Self::OnlyExclusiveResources),
            _ => Err(DeployerError::UnsupportedValue {
                field: "cacheResyncMethod",
                value: value.to_string(),
            }),
        }
    }
}

/// Which pods not managed by the scheduler are accounted for
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForeignPodsDetectMode {
    None,
    All,
    OnlyExclusiveResources,
}

impl ForeignPodsDetectMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::All => "All",
            Self::OnlyExclusiveResources => "OnlyExclusiveResources",
        }
    }
}

impl FromStr for ForeignPodsDetectMode {
    type Err = DeployerError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "None" => Ok(Self::None),
            "All" => Ok(Self::All),
            "OnlyExclusiveResources" => Ok(Self::OnlyExclusiveResources),
            _ => Err(DeployerError::UnsupportedValue {
                field: "foreignPodsDetectMode",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheInformerMode {
    Shared,
    Dedicated,
}

impl CacheInformerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shared => "Shared",
            Self::Dedicated => "Dedicated",
        }
    }
}

impl FromStr for CacheInformerMode {
    type Err = DeployerError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "Shared" => Ok(Self::Shared),
            "Dedicated" => Ok(Self::Dedicated),
            _ => Err(DeployerError::UnsupportedValue {
                field: "cacheInformerMode",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoringStrategyType {
    MostAllocated,
    BalancedAllocation,
    LeastAllocated,
}

impl ScoringStrategyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MostAllocated => "MostAllocated",
            Self::BalancedAllocation => "BalancedAllocation",
            Self::LeastAllocated => "LeastAllocated",
        }
    }
}

impl FromStr for ScoringStrategyType {
    type Err = DeployerError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "MostAllocated" => Ok(Self::MostAllocated),
            "BalancedAllocation" => Ok(Self::BalancedAllocation),
            "LeastAllocated" => Ok(Self::LeastAllocated),
            _ => Err(DeployerError::UnsupportedValue {
                field: "scoringStrategyType",
                value: value.to_string(),
            }),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(
    CacheResyncMethod,
    ForeignPodsDetectMode,
    CacheInformerMode,
    ScoringStrategyType
);

/// Cache tuning knobs. `None` means "leave the document as it is".
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CacheParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resync_period_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resync_method: Option<CacheResyncMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_pods_detect_mode: Option<ForeignPodsDetectMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub informer_mode: Option<CacheInformerMode>,
}

impl CacheParams {
    /// Values the scheduler plugin assumes when nothing is configured.
    /// The informer mode is deliberately left unset.
    pub fn with_defaults() -> Self {
        Self {
            resync_period_seconds: Some(DEFAULT_RESYNC_PERIOD_SECONDS),
            resync_method: Some(CacheResyncMethod::Autodetect),
            foreign_pods_detect_mode: Some(ForeignPodsDetectMode::OnlyExclusiveResources),
            informer_mode: None,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ResourceSpec {
    pub name: String,
    pub weight: i64,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoringStrategyParams {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<ScoringStrategyType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourceSpec>,
}

/// Parameters of one scheduler profile
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigParams {
    pub profile_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoring_strategy: Option<ScoringStrategyParams>,
}

impl ConfigParams {
    /// Parameters that only touch the cache resync period of `profile_name`
    pub fn with_resync_period(profile_name: &str, seconds: i64) -> Self {
        Self {
            profile_name: profile_name.to_string(),
            cache: Some(CacheParams {
                resync_period_seconds: Some(seconds),
                ..Default::default()
            }),
            scoring_strategy: None,
        }
    }
}

/// Returns the first parameter set belonging to `profile_name`
pub fn find_profile_by_name<'a>(
    params: &'a [ConfigParams],
    profile_name: &str,
) -> Option<&'a ConfigParams> {
    params.iter().find(|p| p.profile_name == profile_name)
}
