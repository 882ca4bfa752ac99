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

//! Backup source: a credential secret plus a restic `ReplicationSource`
//! next to the PVC being protected.

use crate::domain::config::CredentialConfig;
use crate::domain::locator::ResourceIdentifier;
use crate::domain::relationship::{
    validate_name, BackupPayload, RelationshipPayload, RelationshipRecord, RelationshipStore,
};
use crate::domain::transfer::readiness::status_present;
use crate::domain::transfer::schedule::validate_schedule;
use crate::infrastructure::constants::BACKUP_SOURCE_SUFFIX;
use crate::infrastructure::kubernetes::client::ClusterClientFactory;
use crate::infrastructure::kubernetes::provisioner::ResourceProvisioner;
use crate::infrastructure::kubernetes::resources::ReplicationSourceBuilder;
use crate::infrastructure::kubernetes::waiter::{wait_until, WaitSettings};
use crate::shared::error::VolsyncError;
use std::path::PathBuf;
use tracing::info;

/// Input of `pv-backup create`
#[derive(Debug, Clone, PartialEq)]
pub struct BackupRequest {
    pub relationship: String,
    pub backup_name: String,
    pub source: ResourceIdentifier,
    pub credential_path: PathBuf,
    /// Cron expression; `None` runs a single manual backup
    pub schedule: Option<String>,
}

impl BackupRequest {
    pub fn parse(
        relationship: &str,
        backup_name: &str,
        pvc: &str,
        credential_path: impl Into<PathBuf>,
        schedule: Option<&str>,
    ) -> Result<Self, VolsyncError> {
        validate_name(relationship)?;
        if backup_name.is_empty() {
            return Err(VolsyncError::config_error("backup name must not be empty"));
        }

        Ok(Self {
            relationship: relationship.to_string(),
            backup_name: backup_name.to_string(),
            source: ResourceIdentifier::parse(pvc)?,
            credential_path: credential_path.into(),
            schedule: schedule
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }

    pub fn source_object_name(&self) -> String {
        format!("{}{}", self.backup_name, BACKUP_SOURCE_SUFFIX)
    }
}

pub struct BackupSourceFlow<'a> {
    factory: &'a dyn ClusterClientFactory,
    store: &'a RelationshipStore,
    wait: WaitSettings,
}

impl<'a> BackupSourceFlow<'a> {
    pub fn new(
        factory: &'a dyn ClusterClientFactory,
        store: &'a RelationshipStore,
        wait: WaitSettings,
    ) -> Self {
        Self {
            factory,
            store,
            wait,
        }
    }

    /// Set up the backup and persist the relationship. The credential file
    /// is removed only after the relationship is saved.
    pub async fn create(&self, request: BackupRequest) -> Result<RelationshipRecord, VolsyncError> {
        let credentials = CredentialConfig::load(&request.credential_path)?;
        if let Some(schedule) = &request.schedule {
            validate_schedule(schedule)?;
        }

        let source = &request.source;
        let object_name = request.source_object_name();

        let client = self
            .factory
            .connect(source.cluster.as_deref(), &source.namespace)
            .await?;
        let provisioner = ResourceProvisioner::new(client.as_ref());

        provisioner
            .ensure_secret(
                &request.backup_name,
                credentials.secret_data(),
                &request.relationship,
            )
            .await?;

        let intent = ReplicationSourceBuilder::new(
            &object_name,
            &source.namespace,
            &source.name,
            &credentials.repository,
        )
        .schedule(request.schedule.clone())
        .relationship(&request.relationship)
        .build();
        client.create_replication_source(&intent).await?;
        info!(
            relationship = %request.relationship,
            source = %object_name,
            namespace = %source.namespace,
            schedule = request.schedule.as_deref().unwrap_or("<manual>"),
            "created ReplicationSource, waiting for status"
        );

        wait_until(
            &format!("ReplicationSource {}/{}", source.namespace, object_name),
            &self.wait,
            || client.get_replication_source(&object_name),
            status_present,
        )
        .await?;

        let payload = BackupPayload {
            cluster: source.cluster_name().to_string(),
            namespace: source.namespace.clone(),
            source_pvc_name: source.name.clone(),
            backup_name: request.backup_name.clone(),
            source_object_name: object_name,
            repository: credentials.repository.clone(),
            schedule: request.schedule.clone().unwrap_or_default(),
        };
        let record = RelationshipRecord::new(
            request.relationship,
            RelationshipPayload::Backup(payload),
        );
        let path = self.store.save(&record)?;
        info!(relationship = %record.name, path = %path.display(), "saved relationship");

        credentials.purge();
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request() {
        let request =
            BackupRequest::parse("nightly", "nightly", "ns1/vol1", "/tmp/restic.env", Some(" 0 2 * * * "))
                .unwrap();
        assert_eq!(request.schedule.as_deref(), Some("0 2 * * *"));
        assert_eq!(request.source.cluster, None);
        assert_eq!(request.source_object_name(), "nightly-backup-source");
    }

    #[test]
    fn test_empty_schedule_is_manual() {
        let request =
            BackupRequest::parse("once", "once", "ns1/vol1", "/tmp/restic.env", Some("")).unwrap();
        assert_eq!(request.schedule, None);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(BackupRequest::parse("r", "", "ns1/vol1", "/tmp/x", None).is_err());
        assert!(matches!(
            BackupRequest::parse("r", "b", "a/b/c/d", "/tmp/x", None),
            Err(VolsyncError::MalformedIdentifier { .. })
        ));
        assert!(BackupRequest::parse("a/b", "b", "ns1/vol1", "/tmp/x", None).is_err());
        assert!(BackupRequest::parse("nightly backup", "b", "ns1/vol1", "/tmp/x", None).is_err());
        assert!(BackupRequest::parse("a:b", "b", "ns1/vol1", "/tmp/x", None).is_err());
    }
}
