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

use super::store::RelationshipDocument;
use crate::shared::error::VolsyncError;
use serde::{Deserialize, Serialize};

/// State persisted for a pv-backup relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupPayload {
    pub cluster: String,
    pub namespace: String,
    #[serde(rename = "sourcePVCName")]
    pub source_pvc_name: String,
    pub backup_name: String,
    /// Name of the ReplicationSource object
    pub source_object_name: String,
    /// Restic repository URI
    pub repository: String,
    /// Cron expression, empty for manual-only backups
    #[serde(default)]
    pub schedule: String,
}

impl BackupPayload {
    pub fn write_to(&self, doc: &mut RelationshipDocument) -> Result<(), VolsyncError> {
        if self.repository.is_empty() {
            return Err(VolsyncError::config_error(format!(
                "backup '{}' has no repository",
                self.backup_name
            )));
        }
        doc.set("data.source", self)
    }

    pub fn read_from(doc: &RelationshipDocument) -> Result<Self, VolsyncError> {
        doc.get_as("data.source")?
            .ok_or_else(|| VolsyncError::config_error("pv-backup relationship has no source"))
    }
}
