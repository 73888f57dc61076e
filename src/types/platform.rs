// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Platform {
    Kubernetes,
    OpenShift,
    HyperShift,
    Unknown,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kubernetes => "Kubernetes",
            Self::OpenShift => "OpenShift",
            Self::HyperShift => "HyperShift",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    /// Parsing never fails; unrecognized names map to `Unknown`
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match value.to_ascii_lowercase().as_str() {
            "kubernetes" | "k8s" => Self::Kubernetes,
            "openshift" | "ocp" => Self::OpenShift,
            "hypershift" => Self::HyperShift,
            _ => Self::Unknown,
        })
    }
}

/// Where a platform or version value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    UserSpecified,
    Autodetected,
    Default,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UserSpecified => "user-specified",
            Self::Autodetected => "autodetected",
            Self::Default => "default",
        })
    }
}

/// Resolved target platform and version, each tagged with its provenance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformInfo {
    pub platform: Platform,
    pub platform_source: Source,
    pub version: String,
    pub version_source: Source,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse_is_case_insensitive() {
        assert_eq!("OpenShift".parse::<Platform>().unwrap(), Platform::OpenShift);
        assert_eq!("KUBERNETES".parse::<Platform>().unwrap(), Platform::Kubernetes);
    }

    #[test]
    fn test_platform_parse_unknown() {
        assert_eq!("nomad".parse::<Platform>().unwrap(), Platform::Unknown);
    }
}
