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

//! Transfer intent objects handed to the VolSync controller.

use super::common_labels;
use crate::domain::config::{CopyMethod, ServiceType};
use crate::infrastructure::constants::INITIAL_MANUAL_TRIGGER;
use crate::infrastructure::kubernetes::crd::{
    ReplicationDestination, ReplicationDestinationRsyncSpec, ReplicationDestinationSpec,
    ReplicationSource, ReplicationSourceResticSpec, ReplicationSourceSpec,
    ReplicationSourceTriggerSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Rsync destination that receives data into an existing PVC
pub struct ReplicationDestinationBuilder {
    name: String,
    namespace: String,
    destination_pvc: String,
    copy_method: CopyMethod,
    service_type: ServiceType,
    relationship: Option<String>,
}

impl ReplicationDestinationBuilder {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        destination_pvc: impl Into<String>,
        copy_method: CopyMethod,
        service_type: ServiceType,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            destination_pvc: destination_pvc.into(),
            copy_method,
            service_type,
            relationship: None,
        }
    }

    pub fn relationship(mut self, relationship: impl Into<String>) -> Self {
        self.relationship = Some(relationship.into());
        self
    }

    pub fn build(&self) -> ReplicationDestination {
        let spec = ReplicationDestinationSpec {
            rsync: Some(ReplicationDestinationRsyncSpec {
                copy_method: Some(self.copy_method.as_str().to_string()),
                destination_pvc: Some(self.destination_pvc.clone()),
                service_type: Some(self.service_type.as_str().to_string()),
                ..Default::default()
            }),
        };

        let mut destination = ReplicationDestination::new(&self.name, spec);
        destination.metadata = ObjectMeta {
            name: Some(self.name.clone()),
            namespace: Some(self.namespace.clone()),
            labels: Some(common_labels(self.relationship.as_deref())),
            ..Default::default()
        };
        destination
    }
}

/// Restic source that backs a PVC up on a schedule, or once if no
/// schedule is given
pub struct ReplicationSourceBuilder {
    name: String,
    namespace: String,
    source_pvc: String,
    repository: String,
    schedule: Option<String>,
    relationship: Option<String>,
}

impl ReplicationSourceBuilder {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        source_pvc: impl Into<String>,
        repository: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            source_pvc: source_pvc.into(),
            repository: repository.into(),
            schedule: None,
            relationship: None,
        }
    }

    pub fn schedule(mut self, schedule: Option<String>) -> Self {
        self.schedule = schedule.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn relationship(mut self, relationship: impl Into<String>) -> Self {
        self.relationship = Some(relationship.into());
        self
    }

    pub fn build(&self) -> ReplicationSource {
        let trigger = match &self.schedule {
            Some(schedule) => ReplicationSourceTriggerSpec {
                schedule: Some(schedule.clone()),
                manual: None,
            },
            None => ReplicationSourceTriggerSpec {
                schedule: None,
                manual: Some(INITIAL_MANUAL_TRIGGER.to_string()),
            },
        };

        let spec = ReplicationSourceSpec {
            source_pvc: self.source_pvc.clone(),
            trigger: Some(trigger),
            restic: Some(ReplicationSourceResticSpec {
                repository: self.repository.clone(),
                copy_method: Some(CopyMethod::Clone.as_str().to_string()),
            }),
        };

        let mut source = ReplicationSource::new(&self.name, spec);
        source.metadata = ObjectMeta {
            name: Some(self.name.clone()),
            namespace: Some(self.namespace.clone()),
            labels: Some(common_labels(self.relationship.as_deref())),
            ..Default::default()
        };
        source
    }
}
