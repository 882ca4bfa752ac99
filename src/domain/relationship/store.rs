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

//! On-disk persistence for relationship records.
//!
//! Each relationship is one YAML document at
//! `<config_dir>/<kind>/<name>.yaml`, edited through dotted key paths.

use super::{RelationshipKind, RelationshipPayload, RelationshipRecord};
use super::{BackupPayload, MigrationPayload};
use crate::infrastructure::constants::{
    CONFIG_DIR_ENV, DEFAULT_CONFIG_DIR_NAME, MAX_RELATIONSHIP_NAME_LEN, RELATIONSHIP_DATA_VERSION,
    RELATIONSHIP_FILE_EXTENSION,
};
use crate::shared::error::VolsyncError;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// A structured document addressed by dotted key paths (`data.destination.port`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipDocument {
    root: Mapping,
}

impl RelationshipDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml(content: &str) -> Result<Self, VolsyncError> {
        match serde_yaml::from_str::<Value>(content)? {
            Value::Mapping(root) => Ok(Self { root }),
            Value::Null => Ok(Self::default()),
            _ => Err(VolsyncError::config_error(
                "relationship document must be a mapping",
            )),
        }
    }

    pub fn to_yaml(&self) -> Result<String, VolsyncError> {
        Ok(serde_yaml::to_string(&self.root)?)
    }

    /// Set `value` at `path`, creating intermediate mappings and replacing
    /// any non-mapping value found on the way.
    pub fn set<V: Serialize + ?Sized>(&mut self, path: &str, value: &V) -> Result<(), VolsyncError> {
        let value = serde_yaml::to_value(value)?;
        let mut keys: Vec<&str> = path.split('.').collect();
        let last = keys
            .pop()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| VolsyncError::config_error(format!("invalid key path '{}'", path)))?;

        let mut current = &mut self.root;
        for key in keys {
            let entry = current
                .entry(Value::String(key.to_string()))
                .or_insert_with(|| Value::Mapping(Mapping::new()));
            if !entry.is_mapping() {
                *entry = Value::Mapping(Mapping::new());
            }
            current = entry.as_mapping_mut().ok_or_else(|| {
                VolsyncError::config_error(format!("key '{}' is not a mapping", key))
            })?;
        }

        current.insert(Value::String(last.to_string()), value);
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut keys = path.split('.');
        let first = keys.next()?;
        let mut current = self.root.get(first)?;
        for key in keys {
            current = current.as_mapping()?.get(key)?;
        }
        Some(current)
    }

    pub fn get_str(&self, path: &str) -> Option<String> {
        self.get(path).and_then(|v| v.as_str()).map(str::to_string)
    }

    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, VolsyncError> {
        match self.get(path) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_yaml::from_value(value.clone())?)),
        }
    }
}

/// Directory-backed store, one file per relationship.
#[derive(Debug, Clone)]
pub struct RelationshipStore {
    config_dir: PathBuf,
}

impl RelationshipStore {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// `$VOLSYNC_CONFIG_DIR`, falling back to `$HOME/.volsync`.
    pub fn default_dir() -> Result<PathBuf, VolsyncError> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        let home = std::env::var("HOME").map_err(|_| {
            VolsyncError::config_error(format!(
                "cannot locate the relationship directory: set {} or HOME",
                CONFIG_DIR_ENV
            ))
        })?;
        Ok(Path::new(&home).join(DEFAULT_CONFIG_DIR_NAME))
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn path_for(&self, kind: RelationshipKind, name: &str) -> PathBuf {
        self.config_dir
            .join(kind.dir_name())
            .join(format!("{}.{}", name, RELATIONSHIP_FILE_EXTENSION))
    }

    pub fn exists(&self, kind: RelationshipKind, name: &str) -> bool {
        self.path_for(kind, name).is_file()
    }

    /// Persist `record`, replacing any earlier relationship of the same kind and name.
    pub fn save(&self, record: &RelationshipRecord) -> Result<PathBuf, VolsyncError> {
        validate_name(&record.name)?;
        let kind = record.kind();
        let path = self.path_for(kind, &record.name);

        let mut doc = RelationshipDocument::new();
        doc.set("name", record.name.as_str())?;
        doc.set("type", kind.as_str())?;
        doc.set("data.version", &record.version)?;
        match &record.payload {
            RelationshipPayload::Migration(payload) => payload.write_to(&mut doc)?,
            RelationshipPayload::Backup(payload) => payload.write_to(&mut doc)?,
        }
        let content = doc.to_yaml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| VolsyncError::store_io(parent, e))?;
        }
        let tmp_path = path.with_extension(format!("{}.tmp", RELATIONSHIP_FILE_EXTENSION));
        std::fs::write(&tmp_path, content).map_err(|e| VolsyncError::store_io(&tmp_path, e))?;
        std::fs::rename(&tmp_path, &path).map_err(|e| VolsyncError::store_io(&path, e))?;

        tracing::debug!(path = %path.display(), kind = kind.as_str(), "Saved relationship");
        Ok(path)
    }

    pub fn load(&self, kind: RelationshipKind, name: &str) -> Result<RelationshipRecord, VolsyncError> {
        validate_name(name)?;
        let path = self.path_for(kind, name);
        if !path.is_file() {
            return Err(VolsyncError::not_found(
                "Relationship",
                name,
                self.config_dir.display().to_string(),
            ));
        }

        let content =
            std::fs::read_to_string(&path).map_err(|e| VolsyncError::store_io(&path, e))?;
        let doc = RelationshipDocument::from_yaml(&content)?;

        let stored_type = doc.get_str("type").unwrap_or_default();
        if stored_type != kind.as_str() {
            return Err(VolsyncError::config_error(format!(
                "relationship '{}' is of type '{}', expected '{}'",
                name,
                stored_type,
                kind.as_str()
            )));
        }

        let version: u32 = doc.get_as("data.version")?.unwrap_or(0);
        if version > RELATIONSHIP_DATA_VERSION {
            return Err(VolsyncError::IncompatibleVersion {
                name: name.to_string(),
                found: version,
                supported: RELATIONSHIP_DATA_VERSION,
            });
        }

        let payload = match kind {
            RelationshipKind::Migration => {
                RelationshipPayload::Migration(MigrationPayload::read_from(&doc)?)
            }
            RelationshipKind::Backup => RelationshipPayload::Backup(BackupPayload::read_from(&doc)?),
        };

        Ok(RelationshipRecord {
            name: name.to_string(),
            version,
            payload,
        })
    }

    pub fn delete(&self, kind: RelationshipKind, name: &str) -> Result<(), VolsyncError> {
        validate_name(name)?;
        let path = self.path_for(kind, name);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VolsyncError::store_io(path, e)),
        }
    }
}

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]([-A-Za-z0-9_.]*[A-Za-z0-9])?$").expect("valid name pattern")
});

/// Relationship names become file names and the value of the relationship
/// label, so they must be valid label values (at most 63 characters).
pub fn validate_name(name: &str) -> Result<(), VolsyncError> {
    if name.len() > MAX_RELATIONSHIP_NAME_LEN || !NAME_PATTERN.is_match(name) {
        return Err(VolsyncError::config_error(format!(
            "invalid relationship name '{}': must be at most {} characters of \
             alphanumerics, '-', '_' or '.', starting and ending with an alphanumeric",
            name, MAX_RELATIONSHIP_NAME_LEN
        )));
    }
    Ok(())
}
