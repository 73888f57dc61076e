// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployerError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("No {kind} asset for {component}/{subcomponent} on platform {platform}")]
    AssetNotFound {
        platform: String,
        component: String,
        subcomponent: String,
        kind: String,
    },

    #[error("Malformed asset {name}: {reason}")]
    MalformedAsset { name: String, reason: String },

    #[error("Template is missing required object: {0}")]
    MissingTemplateObject(String),

    #[error("Unexpected data at {path}: expected {expected}")]
    UnexpectedShape {
        path: String,
        expected: &'static str,
    },

    #[error("unsupported {field}: {value}")]
    UnsupportedValue { field: &'static str, value: String },

    #[error("No parameters found for profile {0:?}")]
    NoParameters(String),

    #[error("Config data error: {0}")]
    ConfigData(String),
}

pub type Result<T> = std::result::Result<T, DeployerError>;
