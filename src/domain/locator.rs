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

//! Cross-cluster resource identifiers of the form `[cluster/]namespace/name`

use crate::shared::error::VolsyncError;
use std::fmt;
use std::str::FromStr;

/// A resolved `[cluster/]namespace/name` reference.
///
/// `cluster` is `None` when the identifier used the two-segment form, meaning
/// the current kubeconfig context should be used.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceIdentifier {
    pub cluster: Option<String>,
    pub namespace: String,
    pub name: String,
}

impl ResourceIdentifier {
    pub fn parse(identifier: &str) -> Result<Self, VolsyncError> {
        let segments: Vec<&str> = identifier.split('/').collect();

        let (cluster, namespace, name) = match segments.as_slice() {
            [namespace, name] => (None, *namespace, *name),
            [cluster, namespace, name] => {
                if cluster.is_empty() {
                    return Err(VolsyncError::malformed_identifier(
                        identifier,
                        "cluster segment is empty",
                    ));
                }
                (Some(cluster.to_string()), *namespace, *name)
            }
            _ => {
                return Err(VolsyncError::malformed_identifier(
                    identifier,
                    format!("expected 2 or 3 segments, found {}", segments.len()),
                ))
            }
        };

        if namespace.is_empty() {
            return Err(VolsyncError::malformed_identifier(
                identifier,
                "namespace is empty",
            ));
        }
        if name.is_empty() {
            return Err(VolsyncError::malformed_identifier(identifier, "name is empty"));
        }

        Ok(Self {
            cluster,
            namespace: namespace.to_string(),
            name: name.to_string(),
        })
    }

    /// Cluster context name, or the empty string for the ambient context
    pub fn cluster_name(&self) -> &str {
        self.cluster.as_deref().unwrap_or("")
    }
}

impl FromStr for ResourceIdentifier {
    type Err = VolsyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cluster {
            Some(cluster) => write!(f, "{}/{}/{}", cluster, self.namespace, self.name),
            None => write!(f, "{}/{}", self.namespace, self.name),
        }
    }
}
