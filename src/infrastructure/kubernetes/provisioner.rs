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

//! Idempotent creation of the supporting objects a transfer needs.

use super::client::VolsyncKubeClient;
use super::resources::{NamespaceBuilder, PvcBuilder, SecretBuilder};
use crate::domain::config::AccessMode;
use crate::shared::error::VolsyncError;
use k8s_openapi::api::core::v1::PersistentVolumeClaim;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use std::collections::BTreeMap;
use tracing::info;

/// Whether `ensure_pvc` found the claim or had to create it
#[derive(Debug, Clone, PartialEq)]
pub enum PvcOutcome {
    Existing(PersistentVolumeClaim),
    Created(PersistentVolumeClaim),
}

impl PvcOutcome {
    pub fn pvc(&self) -> &PersistentVolumeClaim {
        match self {
            PvcOutcome::Existing(pvc) | PvcOutcome::Created(pvc) => pvc,
        }
    }

    pub fn into_pvc(self) -> PersistentVolumeClaim {
        match self {
            PvcOutcome::Existing(pvc) | PvcOutcome::Created(pvc) => pvc,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, PvcOutcome::Created(_))
    }
}

pub struct ResourceProvisioner<'a> {
    client: &'a dyn VolsyncKubeClient,
}

impl<'a> ResourceProvisioner<'a> {
    pub fn new(client: &'a dyn VolsyncKubeClient) -> Self {
        Self { client }
    }

    pub async fn ensure_namespace(&self, name: &str) -> Result<(), VolsyncError> {
        match self.client.create_namespace(&NamespaceBuilder::new(name).build()).await {
            Ok(()) => {
                info!(namespace = name, "created namespace");
                Ok(())
            }
            Err(e) if e.is_already_exists() => {
                info!(namespace = name, "namespace already exists");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn find_pvc(&self, name: &str) -> Result<Option<PersistentVolumeClaim>, VolsyncError> {
        match self.client.get_pvc(name).await {
            Ok(pvc) => Ok(Some(pvc)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Return the claim if it exists, otherwise create it. An existing claim
    /// is never modified, whatever the requested properties.
    pub async fn ensure_pvc(
        &self,
        name: &str,
        access_modes: &[AccessMode],
        capacity: Option<&Quantity>,
        storage_class: Option<&str>,
    ) -> Result<PvcOutcome, VolsyncError> {
        if let Some(existing) = self.find_pvc(name).await? {
            info!(pvc = name, namespace = self.client.namespace(), "using existing PVC");
            return Ok(PvcOutcome::Existing(existing));
        }

        let capacity = capacity.ok_or_else(|| VolsyncError::MissingCapacity {
            name: name.to_string(),
            namespace: self.client.namespace().to_string(),
        })?;

        let pvc = PvcBuilder::new(
            name,
            self.client.namespace(),
            access_modes.to_vec(),
            capacity.clone(),
        )
        .storage_class(storage_class.map(str::to_string))
        .build();

        let created = self.client.create_pvc(&pvc).await?;
        info!(
            pvc = name,
            namespace = self.client.namespace(),
            capacity = %capacity.0,
            "created PVC"
        );
        Ok(PvcOutcome::Created(created))
    }

    /// Create the secret unless one with the same name exists. Existing
    /// contents are left alone.
    pub async fn ensure_secret(
        &self,
        name: &str,
        string_data: BTreeMap<String, String>,
        relationship: &str,
    ) -> Result<(), VolsyncError> {
        let secret = SecretBuilder::new(name, self.client.namespace(), string_data)
            .relationship(relationship)
            .build();

        match self.client.create_secret(&secret).await {
            Ok(()) => {
                info!(secret = name, namespace = self.client.namespace(), "created secret");
                Ok(())
            }
            Err(e) if e.is_already_exists() => {
                info!(
                    secret = name,
                    namespace = self.client.namespace(),
                    "secret already exists, keeping its contents"
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn delete_secret(&self, name: &str) -> Result<(), VolsyncError> {
        match self.client.delete_secret(name).await {
            Ok(()) => {
                info!(secret = name, namespace = self.client.namespace(), "deleted secret");
                Ok(())
            }
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }
}
