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

//! Relationship records and their persistence

pub mod backup;
pub mod migration;
pub mod store;

pub use self::backup::BackupPayload;
pub use self::migration::{MigrationDestination, MigrationPayload, MigrationSource};
pub use self::store::{validate_name, RelationshipDocument, RelationshipStore};

use crate::infrastructure::constants::RELATIONSHIP_DATA_VERSION;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    Migration,
    Backup,
}

impl RelationshipKind {
    /// Value of the `type` key in the relationship document
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::Migration => "migration",
            RelationshipKind::Backup => "PVBackup",
        }
    }

    pub fn dir_name(&self) -> &'static str {
        match self {
            RelationshipKind::Migration => "migration",
            RelationshipKind::Backup => "pvbackup",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RelationshipPayload {
    Migration(MigrationPayload),
    Backup(BackupPayload),
}

impl RelationshipPayload {
    pub fn kind(&self) -> RelationshipKind {
        match self {
            RelationshipPayload::Migration(_) => RelationshipKind::Migration,
            RelationshipPayload::Backup(_) => RelationshipKind::Backup,
        }
    }
}

/// Durable state of one named relationship. The kind follows the payload
/// and cannot change once the record exists.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipRecord {
    pub name: String,
    pub version: u32,
    pub payload: RelationshipPayload,
}

impl RelationshipRecord {
    pub fn new(name: impl Into<String>, payload: RelationshipPayload) -> Self {
        Self {
            name: name.into(),
            version: RELATIONSHIP_DATA_VERSION,
            payload,
        }
    }

    pub fn kind(&self) -> RelationshipKind {
        self.payload.kind()
    }

    pub fn as_migration(&self) -> Option<&MigrationPayload> {
        match &self.payload {
            RelationshipPayload::Migration(payload) => Some(payload),
            RelationshipPayload::Backup(_) => None,
        }
    }

    pub fn as_backup(&self) -> Option<&BackupPayload> {
        match &self.payload {
            RelationshipPayload::Backup(payload) => Some(payload),
            RelationshipPayload::Migration(_) => None,
        }
    }
}
