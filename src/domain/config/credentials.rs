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

//! Restic repository credentials read from a user supplied file.
//!
//! The format follows the file extension: YAML, JSON, TOML, or plain
//! dotenv `KEY=VALUE` lines for anything else.

use crate::infrastructure::constants::{
    AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, REQUIRED_CREDENTIAL_KEYS, RESTIC_PASSWORD,
    RESTIC_REPOSITORY,
};
use crate::shared::error::VolsyncError;
use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct CredentialConfig {
    path: PathBuf,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub repository: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialConfig")
            .field("path", &self.path)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("repository", &self.repository)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl CredentialConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VolsyncError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(VolsyncError::config_error(format!(
                "credential file {} not found",
                path.display()
            )));
        }

        let content = read_to_string(path).map_err(|e| {
            VolsyncError::config_error(format!(
                "failed to read credential file {}: {}",
                path.display(),
                e
            ))
        })?;

        let values = parse_values(path, &content)?;
        Self::from_values(path, &values)
    }

    fn from_values(path: &Path, values: &BTreeMap<String, String>) -> Result<Self, VolsyncError> {
        for key in REQUIRED_CREDENTIAL_KEYS {
            if values.get(key).map_or(true, |v| v.is_empty()) {
                return Err(VolsyncError::MissingCredentialField {
                    field: key.to_string(),
                    path: path.display().to_string(),
                });
            }
        }

        // Presence of every key was checked above
        let get = |key: &str| values.get(key).cloned().unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            access_key_id: get(AWS_ACCESS_KEY_ID),
            secret_access_key: get(AWS_SECRET_ACCESS_KEY),
            repository: get(RESTIC_REPOSITORY),
            password: get(RESTIC_PASSWORD),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Key/value pairs stored in the repository Secret.
    pub fn secret_data(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (AWS_ACCESS_KEY_ID.to_string(), self.access_key_id.clone()),
            (
                AWS_SECRET_ACCESS_KEY.to_string(),
                self.secret_access_key.clone(),
            ),
            (RESTIC_REPOSITORY.to_string(), self.repository.clone()),
            (RESTIC_PASSWORD.to_string(), self.password.clone()),
        ])
    }

    /// Remove the credential file from disk. Failures are logged, never returned.
    pub fn purge(self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::info!(path = %self.path.display(), "Removed credential file"),
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove credential file"
            ),
        }
    }
}

fn parse_values(path: &Path, content: &str) -> Result<BTreeMap<String, String>, VolsyncError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("yaml") | Some("yml") => {
            let doc: serde_yaml::Value = serde_yaml::from_str(content)?;
            let mut values = BTreeMap::new();
            if let serde_yaml::Value::Mapping(map) = doc {
                for (k, v) in map {
                    if let (Some(key), Some(value)) = (k.as_str(), yaml_scalar(&v)) {
                        values.insert(key.to_string(), value);
                    }
                }
            }
            Ok(values)
        }
        Some("json") => {
            let doc: serde_json::Value = serde_json::from_str(content)?;
            let mut values = BTreeMap::new();
            if let serde_json::Value::Object(map) = doc {
                for (key, v) in map {
                    let value = match v {
                        serde_json::Value::String(s) => Some(s),
                        serde_json::Value::Number(n) => Some(n.to_string()),
                        serde_json::Value::Bool(b) => Some(b.to_string()),
                        _ => None,
                    };
                    if let Some(value) = value {
                        values.insert(key, value);
                    }
                }
            }
            Ok(values)
        }
        Some("toml") => {
            let doc: toml::Table = toml::from_str(content)?;
            let mut values = BTreeMap::new();
            for (key, v) in doc {
                let value = match v {
                    toml::Value::String(s) => Some(s),
                    toml::Value::Integer(i) => Some(i.to_string()),
                    toml::Value::Float(f) => Some(f.to_string()),
                    toml::Value::Boolean(b) => Some(b.to_string()),
                    _ => None,
                };
                if let Some(value) = value {
                    values.insert(key, value);
                }
            }
            Ok(values)
        }
        _ => parse_env_lines(content),
    }
}

fn yaml_scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_env_lines(content: &str) -> Result<BTreeMap<String, String>, VolsyncError> {
    dotenvy::from_read_iter(content.as_bytes())
        .map(|item| {
            item.map_err(|e| {
                VolsyncError::config_error(format!("invalid credential file: {}", e))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    const ENV_CONTENT: &str = "\
# restic settings
AWS_ACCESS_KEY_ID=access
export AWS_SECRET_ACCESS_KEY=\"secret\"
RESTIC_REPOSITORY=s3:http://minio:9000/bucket
RESTIC_PASSWORD='pass'
";

    #[test]
    fn test_load_env_style() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "restic.env", ENV_CONTENT);

        let conf = CredentialConfig::load(&path).unwrap();
        assert_eq!(conf.access_key_id, "access");
        assert_eq!(conf.secret_access_key, "secret");
        assert_eq!(conf.repository, "s3:http://minio:9000/bucket");
        assert_eq!(conf.password, "pass");
        assert_eq!(conf.secret_data().len(), 4);
    }

    #[test]
    fn test_load_yaml_json_toml() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = write_file(
            &dir,
            "restic.yaml",
            "AWS_ACCESS_KEY_ID: a\nAWS_SECRET_ACCESS_KEY: b\nRESTIC_REPOSITORY: s3:repo\nRESTIC_PASSWORD: 1234\n",
        );
        let json = write_file(
            &dir,
            "restic.json",
            r#"{"AWS_ACCESS_KEY_ID":"a","AWS_SECRET_ACCESS_KEY":"b","RESTIC_REPOSITORY":"s3:repo","RESTIC_PASSWORD":"p"}"#,
        );
        let toml = write_file(
            &dir,
            "restic.toml",
            "AWS_ACCESS_KEY_ID = \"a\"\nAWS_SECRET_ACCESS_KEY = \"b\"\nRESTIC_REPOSITORY = \"s3:repo\"\nRESTIC_PASSWORD = \"p\"\n",
        );

        let from_yaml = CredentialConfig::load(&yaml).unwrap();
        assert_eq!(from_yaml.password, "1234");
        assert_eq!(CredentialConfig::load(&json).unwrap().repository, "s3:repo");
        assert_eq!(CredentialConfig::load(&toml).unwrap().access_key_id, "a");
    }

    #[test]
    fn test_missing_field_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "restic.env",
            "AWS_ACCESS_KEY_ID=a\nAWS_SECRET_ACCESS_KEY=b\nRESTIC_REPOSITORY=s3:repo\n",
        );

        match CredentialConfig::load(&path) {
            Err(VolsyncError::MissingCredentialField { field, .. }) => {
                assert_eq!(field, "RESTIC_PASSWORD")
            }
            other => panic!("expected MissingCredentialField, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "restic.env",
            "AWS_ACCESS_KEY_ID=\nAWS_SECRET_ACCESS_KEY=b\nRESTIC_REPOSITORY=r\nRESTIC_PASSWORD=p\n",
        );
        assert!(matches!(
            CredentialConfig::load(&path),
            Err(VolsyncError::MissingCredentialField { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CredentialConfig::load(dir.path().join("nope.env")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_purge_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "restic.env", ENV_CONTENT);
        let conf = CredentialConfig::load(&path).unwrap();

        conf.purge();
        assert!(!path.exists());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "restic.env", ENV_CONTENT);
        let conf = CredentialConfig::load(&path).unwrap();
        let rendered = format!("{:?}", conf);
        assert!(!rendered.contains("'pass'"));
        assert!(!rendered.contains("\"pass\""));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_env_line_without_separator_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "restic.env", "AWS_ACCESS_KEY_ID access\n");
        assert!(matches!(
            CredentialConfig::load(&path),
            Err(VolsyncError::ConfigError(_))
        ));
    }
}
