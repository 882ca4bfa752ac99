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
use crate::domain::config::{AccessMode, CopyMethod, ServiceType};
use crate::shared::error::VolsyncError;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use serde::{Deserialize, Serialize};

/// State persisted for a migration relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<MigrationSource>,
    pub destination: MigrationDestination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationSource {
    /// Volume to be migrated
    pub volume: String,
    /// Written by hand, see `MigrationPayload::write_to`
    #[serde(skip)]
    pub size: Option<Quantity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationDestination {
    /// Cluster context name, empty for the current context
    pub cluster: String,
    pub namespace: String,
    pub pvc_name: String,
    /// Name of the ReplicationDestination object
    pub destination_object_name: String,
    /// Secret the destination publishes its SSH keys in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key_secret_name: Option<String>,
    pub copy_method: CopyMethod,
    #[serde(default)]
    pub access_modes: Vec<AccessMode>,
    /// Written by hand, see `MigrationPayload::write_to`
    #[serde(skip)]
    pub capacity: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class_name: Option<String>,
    pub service_type: ServiceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_keys: Option<String>,
}

impl MigrationDestination {
    /// True once the controller has published a reachable endpoint
    pub fn is_connected(&self) -> bool {
        self.address.is_some() && self.ssh_keys.is_some()
    }
}

impl MigrationPayload {
    pub fn write_to(&self, doc: &mut RelationshipDocument) -> Result<(), VolsyncError> {
        if let Some(source) = &self.source {
            doc.set("data.source", source)?;
            // Quantity has no exact encoding in the document, render it ourselves
            if let Some(size) = &source.size {
                doc.set("data.source.size", size.0.as_str())?;
            }
        }

        doc.set("data.destination", &self.destination)?;
        if let Some(capacity) = &self.destination.capacity {
            doc.set("data.destination.capacity", capacity.0.as_str())?;
        }

        Ok(())
    }

    pub fn read_from(doc: &RelationshipDocument) -> Result<Self, VolsyncError> {
        let source = match doc.get_as::<MigrationSource>("data.source")? {
            Some(mut source) => {
                source.size = doc.get_str("data.source.size").map(Quantity);
                Some(source)
            }
            None => None,
        };

        let mut destination: MigrationDestination =
            doc.get_as("data.destination")?.ok_or_else(|| {
                VolsyncError::config_error("migration relationship has no destination")
            })?;
        destination.capacity = doc.get_str("data.destination.capacity").map(Quantity);

        Ok(Self {
            source,
            destination,
        })
    }
}
