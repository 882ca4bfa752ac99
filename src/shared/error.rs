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

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VolsyncError>;

#[derive(Error, Debug)]
pub enum VolsyncError {
    #[error("malformed identifier '{identifier}': {reason} (expected [cluster/]namespace/name)")]
    MalformedIdentifier { identifier: String, reason: String },

    #[error("credential file '{path}' is missing required field '{field}'")]
    MissingCredentialField { field: String, path: String },

    #[error("invalid schedule '{expression}': {reason}")]
    InvalidSchedule { expression: String, reason: String },

    #[error("unsupported {option}: '{value}' (supported: {supported})")]
    UnsupportedOption {
        option: String,
        value: String,
        supported: String,
    },

    #[error("invalid quantity '{0}': expected a resource quantity such as 10Gi")]
    InvalidQuantity(String),

    #[error("PVC '{name}' does not exist in namespace '{namespace}' and no capacity was provided")]
    MissingCapacity { name: String, namespace: String },

    #[error("Resource already exists: {resource_type} '{name}' in namespace '{namespace}'")]
    AlreadyExists {
        resource_type: String,
        name: String,
        namespace: String,
    },

    #[error("Resource not found: {resource_type} '{name}' in namespace '{namespace}'")]
    NotFound {
        resource_type: String,
        name: String,
        namespace: String,
    },

    #[error("timed out after {timeout:?} waiting for {resource}; last observed state: {last_observed}")]
    WaitTimeout {
        resource: String,
        timeout: Duration,
        last_observed: String,
    },

    #[error("relationship store I/O error on '{}': {source}", path.display())]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("relationship '{name}' has schema version {found}, this tool supports up to {supported}")]
    IncompatibleVersion {
        name: String,
        found: u32,
        supported: u32,
    },

    #[error("cluster '{cluster}' is unreachable: {reason}")]
    ClusterUnreachable { cluster: String, reason: String },

    #[error("Kubernetes API error: {0}")]
    KubeApi(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<kube::Error> for VolsyncError {
    fn from(err: kube::Error) -> Self {
        VolsyncError::KubeApi(err.to_string())
    }
}

impl VolsyncError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn malformed_identifier(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_schedule(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSchedule {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported_option(
        option: impl Into<String>,
        value: impl Into<String>,
        supported: &[&str],
    ) -> Self {
        Self::UnsupportedOption {
            option: option.into(),
            value: value.into(),
            supported: supported.join(", "),
        }
    }

    pub fn not_found(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn already_exists(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::AlreadyExists {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn store_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StoreIo {
            path: path.into(),
            source,
        }
    }

    /// Translate a kube API error, mapping 404 and 409 onto the typed variants.
    pub fn from_api(
        err: kube::Error,
        resource_type: &str,
        name: &str,
        namespace: &str,
    ) -> Self {
        match err {
            kube::Error::Api(ae) if ae.code == 404 => Self::not_found(resource_type, name, namespace),
            kube::Error::Api(ae) if ae.code == 409 && ae.reason == "AlreadyExists" => {
                Self::already_exists(resource_type, name, namespace)
            }
            kube::Error::Api(ae) => Self::KubeApi(ae.message),
            other => Self::KubeApi(other.to_string()),
        }
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_option_lists_choices() {
        let err = VolsyncError::unsupported_option("copy method", "Rsync", &["Direct", "Clone"]);
        assert_eq!(
            err.to_string(),
            "unsupported copy method: 'Rsync' (supported: Direct, Clone)"
        );
    }

    #[test]
    fn test_already_exists_and_not_found_predicates() {
        assert!(VolsyncError::already_exists("Secret", "s", "ns").is_already_exists());
        assert!(VolsyncError::not_found("PersistentVolumeClaim", "p", "ns").is_not_found());
        assert!(!VolsyncError::KubeApi("boom".to_string()).is_not_found());
    }

    #[test]
    fn test_wait_timeout_message_carries_last_state() {
        let err = VolsyncError::WaitTimeout {
            resource: "ReplicationSource ns1/nightly-backup-source".to_string(),
            timeout: Duration::from_secs(2),
            last_observed: "{\"status\":null}".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ns1/nightly-backup-source"));
        assert!(msg.contains("{\"status\":null}"));
    }
}
