// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::shared::error::VolsyncError;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyMethod {
    Direct,
    Clone,
    Snapshot,
    None,
}

impl CopyMethod {
    pub const SUPPORTED: &'static [&'static str] = &["Direct", "Clone", "Snapshot", "None"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CopyMethod::Direct => "Direct",
            CopyMethod::Clone => "Clone",
            CopyMethod::Snapshot => "Snapshot",
            CopyMethod::None => "None",
        }
    }
}

impl std::str::FromStr for CopyMethod {
    type Err = VolsyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Direct" => Ok(CopyMethod::Direct),
            "Clone" => Ok(CopyMethod::Clone),
            "Snapshot" => Ok(CopyMethod::Snapshot),
            "None" => Ok(CopyMethod::None),
            _ => Err(VolsyncError::unsupported_option(
                "copy method",
                s,
                Self::SUPPORTED,
            )),
        }
    }
}

impl fmt::Display for CopyMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    ClusterIP,
    NodePort,
    LoadBalancer,
}

impl ServiceType {
    pub const SUPPORTED: &'static [&'static str] = &["ClusterIP", "NodePort", "LoadBalancer"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::ClusterIP => "ClusterIP",
            ServiceType::NodePort => "NodePort",
            ServiceType::LoadBalancer => "LoadBalancer",
        }
    }
}

impl std::str::FromStr for ServiceType {
    type Err = VolsyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ClusterIP" => Ok(ServiceType::ClusterIP),
            "NodePort" => Ok(ServiceType::NodePort),
            "LoadBalancer" => Ok(ServiceType::LoadBalancer),
            _ => Err(VolsyncError::unsupported_option(
                "service type",
                s,
                Self::SUPPORTED,
            )),
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessMode {
    ReadWriteOnce,
    ReadOnlyMany,
    ReadWriteMany,
    ReadWriteOncePod,
}

impl AccessMode {
    pub const SUPPORTED: &'static [&'static str] = &[
        "ReadWriteOnce",
        "ReadOnlyMany",
        "ReadWriteMany",
        "ReadWriteOncePod",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessMode::ReadWriteOnce => "ReadWriteOnce",
            AccessMode::ReadOnlyMany => "ReadOnlyMany",
            AccessMode::ReadWriteMany => "ReadWriteMany",
            AccessMode::ReadWriteOncePod => "ReadWriteOncePod",
        }
    }

    /// Parse a comma separated list such as `ReadWriteOnce,ReadOnlyMany`.
    pub fn parse_list(s: &str) -> Result<Vec<AccessMode>, VolsyncError> {
        let mut modes = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let mode: AccessMode = part.parse()?;
            if !modes.contains(&mode) {
                modes.push(mode);
            }
        }
        if modes.is_empty() {
            return Err(VolsyncError::unsupported_option(
                "access mode",
                s,
                Self::SUPPORTED,
            ));
        }
        Ok(modes)
    }
}

impl std::str::FromStr for AccessMode {
    type Err = VolsyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ReadWriteOnce" => Ok(AccessMode::ReadWriteOnce),
            "ReadOnlyMany" => Ok(AccessMode::ReadOnlyMany),
            "ReadWriteMany" => Ok(AccessMode::ReadWriteMany),
            "ReadWriteOncePod" => Ok(AccessMode::ReadWriteOncePod),
            _ => Err(VolsyncError::unsupported_option(
                "access mode",
                s,
                Self::SUPPORTED,
            )),
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static QUANTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)(Ki|Mi|Gi|Ti|Pi|Ei|n|u|m|k|M|G|T|P|E|[eE][+-]?\d+)?$")
        .expect("valid quantity pattern")
});

/// Validate a resource quantity string (e.g. `10Gi`, `500M`, `1.5e3`).
pub fn parse_quantity(value: &str) -> Result<Quantity, VolsyncError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !QUANTITY_PATTERN.is_match(trimmed) {
        return Err(VolsyncError::InvalidQuantity(value.to_string()));
    }
    Ok(Quantity(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_method_round_trip_and_rejection() {
        for name in CopyMethod::SUPPORTED {
            let method: CopyMethod = name.parse().unwrap();
            assert_eq!(method.as_str(), *name);
        }
        assert!(matches!(
            "Rsync".parse::<CopyMethod>(),
            Err(VolsyncError::UnsupportedOption { .. })
        ));
        // Matching is case sensitive like the API server's enum validation
        assert!("snapshot".parse::<CopyMethod>().is_err());
    }

    #[test]
    fn test_service_type_rejects_unknown() {
        assert_eq!(
            "NodePort".parse::<ServiceType>().unwrap(),
            ServiceType::NodePort
        );
        assert!(matches!(
            "ExternalName".parse::<ServiceType>(),
            Err(VolsyncError::UnsupportedOption { .. })
        ));
    }

    #[test]
    fn test_access_mode_list() {
        let modes = AccessMode::parse_list("ReadWriteOnce, ReadOnlyMany,ReadWriteOnce").unwrap();
        assert_eq!(
            modes,
            vec![AccessMode::ReadWriteOnce, AccessMode::ReadOnlyMany]
        );
        assert!(AccessMode::parse_list("").is_err());
        assert!(AccessMode::parse_list("ReadWriteSometimes").is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("10Gi").unwrap().0, "10Gi");
        assert_eq!(parse_quantity("500M").unwrap().0, "500M");
        assert_eq!(parse_quantity("1.5").unwrap().0, "1.5");
        assert_eq!(parse_quantity("1e3").unwrap().0, "1e3");
        for bad in ["", "Gi", "10 Gi", "10GB", "ten"] {
            assert!(
                matches!(parse_quantity(bad), Err(VolsyncError::InvalidQuantity(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
