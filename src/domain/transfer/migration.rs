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

//! Migration destination: a PVC on the target cluster plus an rsync
//! `ReplicationDestination` that a later sync pushes data into.

use crate::domain::config::{parse_quantity, AccessMode, CopyMethod, ServiceType};
use crate::domain::locator::ResourceIdentifier;
use crate::domain::relationship::{
    validate_name, MigrationDestination, MigrationPayload, RelationshipPayload,
    RelationshipRecord, RelationshipStore,
};
use crate::domain::transfer::readiness::destination_endpoint_ready;
use crate::infrastructure::constants::MIGRATION_DEST_SUFFIX;
use crate::infrastructure::kubernetes::client::ClusterClientFactory;
use crate::infrastructure::kubernetes::provisioner::{PvcOutcome, ResourceProvisioner};
use crate::infrastructure::kubernetes::resources::pvc::pvc_properties;
use crate::infrastructure::kubernetes::resources::ReplicationDestinationBuilder;
use crate::infrastructure::kubernetes::waiter::{wait_until, WaitSettings};
use crate::shared::error::VolsyncError;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use tracing::info;

/// Fully parsed input of `migration create`
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationRequest {
    pub relationship: String,
    pub destination: ResourceIdentifier,
    pub copy_method: CopyMethod,
    pub access_modes: Vec<AccessMode>,
    pub capacity: Option<Quantity>,
    pub storage_class: Option<String>,
    pub service_type: ServiceType,
}

impl MigrationRequest {
    /// Parse raw option strings. Nothing here touches a cluster.
    pub fn parse(
        relationship: &str,
        pvc: &str,
        copy_method: &str,
        access_modes: &str,
        capacity: Option<&str>,
        storage_class: Option<&str>,
        service_type: &str,
    ) -> Result<Self, VolsyncError> {
        validate_name(relationship)?;

        Ok(Self {
            relationship: relationship.to_string(),
            destination: ResourceIdentifier::parse(pvc)?,
            copy_method: copy_method.parse()?,
            access_modes: AccessMode::parse_list(access_modes)?,
            capacity: capacity.map(parse_quantity).transpose()?,
            storage_class: storage_class
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            service_type: service_type.parse()?,
        })
    }

    pub fn destination_object_name(&self) -> String {
        format!(
            "{}-{}{}",
            self.destination.namespace, self.destination.name, MIGRATION_DEST_SUFFIX
        )
    }
}

pub struct MigrationDestinationFlow<'a> {
    factory: &'a dyn ClusterClientFactory,
    store: &'a RelationshipStore,
    wait: WaitSettings,
}

impl<'a> MigrationDestinationFlow<'a> {
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

    /// Provision the destination and persist the relationship once the
    /// controller has published its endpoint. Nothing is saved on failure.
    pub async fn create(&self, request: MigrationRequest) -> Result<RelationshipRecord, VolsyncError> {
        let target = &request.destination;
        let object_name = request.destination_object_name();

        let client = self
            .factory
            .connect(target.cluster.as_deref(), &target.namespace)
            .await?;
        let provisioner = ResourceProvisioner::new(client.as_ref());

        // Fail before mutating anything if a new PVC would have no size
        if request.capacity.is_none() && provisioner.find_pvc(&target.name).await?.is_none() {
            return Err(VolsyncError::MissingCapacity {
                name: target.name.clone(),
                namespace: target.namespace.clone(),
            });
        }

        provisioner.ensure_namespace(&target.namespace).await?;

        let outcome = provisioner
            .ensure_pvc(
                &target.name,
                &request.access_modes,
                request.capacity.as_ref(),
                request.storage_class.as_deref(),
            )
            .await?;

        let (access_modes, capacity, storage_class) = match &outcome {
            PvcOutcome::Existing(pvc) => pvc_properties(pvc),
            PvcOutcome::Created(_) => (
                request.access_modes.clone(),
                request.capacity.clone(),
                request.storage_class.clone(),
            ),
        };

        let intent = ReplicationDestinationBuilder::new(
            &object_name,
            &target.namespace,
            &target.name,
            request.copy_method,
            request.service_type,
        )
        .relationship(&request.relationship)
        .build();
        client.create_replication_destination(&intent).await?;
        info!(
            relationship = %request.relationship,
            destination = %object_name,
            namespace = %target.namespace,
            "created ReplicationDestination, waiting for endpoint"
        );

        let ready = wait_until(
            &format!("ReplicationDestination {}/{}", target.namespace, object_name),
            &self.wait,
            || client.get_replication_destination(&object_name),
            destination_endpoint_ready,
        )
        .await?;

        let rsync = ready.status.and_then(|s| s.rsync).unwrap_or_default();
        info!(
            destination = %object_name,
            address = rsync.address.as_deref().unwrap_or_default(),
            "destination endpoint ready"
        );

        let destination = MigrationDestination {
            cluster: target.cluster_name().to_string(),
            namespace: target.namespace.clone(),
            pvc_name: target.name.clone(),
            destination_object_name: object_name,
            ssh_key_secret_name: rsync.ssh_keys.clone(),
            copy_method: request.copy_method,
            access_modes,
            capacity,
            storage_class_name: storage_class,
            service_type: request.service_type,
            address: rsync.address,
            port: rsync.port,
            ssh_keys: rsync.ssh_keys,
        };

        let record = RelationshipRecord::new(
            request.relationship,
            RelationshipPayload::Migration(MigrationPayload {
                source: None,
                destination,
            }),
        );
        let path = self.store.save(&record)?;
        info!(relationship = %record.name, path = %path.display(), "saved relationship");

        Ok(record)
    }
}
