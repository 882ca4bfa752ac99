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

use super::common_labels;
use crate::domain::config::AccessMode;
use crate::infrastructure::constants::STORAGE_RESOURCE;
use k8s_openapi::api::core::v1::{
    PersistentVolumeClaim, PersistentVolumeClaimSpec, VolumeResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

pub struct PvcBuilder {
    name: String,
    namespace: String,
    access_modes: Vec<AccessMode>,
    capacity: Quantity,
    storage_class: Option<String>,
}

impl PvcBuilder {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        access_modes: Vec<AccessMode>,
        capacity: Quantity,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            access_modes,
            capacity,
            storage_class: None,
        }
    }

    /// An empty class name leaves the cluster default in place
    pub fn storage_class(mut self, storage_class: Option<String>) -> Self {
        self.storage_class = storage_class.filter(|s| !s.is_empty());
        self
    }

    pub fn build(&self) -> PersistentVolumeClaim {
        let mut requests = BTreeMap::new();
        requests.insert(STORAGE_RESOURCE.to_string(), self.capacity.clone());

        PersistentVolumeClaim {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                namespace: Some(self.namespace.clone()),
                labels: Some(common_labels(None)),
                ..Default::default()
            },
            spec: Some(PersistentVolumeClaimSpec {
                access_modes: Some(
                    self.access_modes
                        .iter()
                        .map(|m| m.as_str().to_string())
                        .collect(),
                ),
                resources: Some(VolumeResourceRequirements {
                    requests: Some(requests),
                    ..Default::default()
                }),
                storage_class_name: self.storage_class.clone(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

/// Access modes, requested storage and class of an existing claim
pub fn pvc_properties(
    pvc: &PersistentVolumeClaim,
) -> (Vec<AccessMode>, Option<Quantity>, Option<String>) {
    let Some(spec) = pvc.spec.as_ref() else {
        return (Vec::new(), None, None);
    };

    let access_modes = spec
        .access_modes
        .iter()
        .flatten()
        .filter_map(|m| m.parse::<AccessMode>().ok())
        .collect();
    let capacity = spec
        .resources
        .as_ref()
        .and_then(|r| r.requests.as_ref())
        .and_then(|r| r.get(STORAGE_RESOURCE))
        .cloned();

    (access_modes, capacity, spec.storage_class_name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requests_capacity() {
        let pvc = PvcBuilder::new(
            "vol1",
            "ns1",
            vec![AccessMode::ReadWriteOnce],
            Quantity("10Gi".to_string()),
        )
        .storage_class(Some("fast".to_string()))
        .build();

        let spec = pvc.spec.unwrap();
        assert_eq!(spec.access_modes, Some(vec!["ReadWriteOnce".to_string()]));
        assert_eq!(spec.storage_class_name.as_deref(), Some("fast"));
        let requests = spec.resources.unwrap().requests.unwrap();
        assert_eq!(requests.get("storage"), Some(&Quantity("10Gi".to_string())));
    }

    #[test]
    fn test_empty_storage_class_is_omitted() {
        let pvc = PvcBuilder::new(
            "vol1",
            "ns1",
            vec![AccessMode::ReadWriteOnce],
            Quantity("1Gi".to_string()),
        )
        .storage_class(Some(String::new()))
        .build();
        assert_eq!(pvc.spec.unwrap().storage_class_name, None);
    }

    #[test]
    fn test_properties_round_trip_through_builder() {
        let pvc = PvcBuilder::new(
            "vol1",
            "ns1",
            vec![AccessMode::ReadWriteMany, AccessMode::ReadOnlyMany],
            Quantity("5Gi".to_string()),
        )
        .storage_class(Some("standard".to_string()))
        .build();

        let (modes, capacity, class) = pvc_properties(&pvc);
        assert_eq!(modes, vec![AccessMode::ReadWriteMany, AccessMode::ReadOnlyMany]);
        assert_eq!(capacity, Some(Quantity("5Gi".to_string())));
        assert_eq!(class.as_deref(), Some("standard"));
    }

    #[test]
    fn test_properties_of_specless_claim() {
        let (modes, capacity, class) = pvc_properties(&PersistentVolumeClaim::default());
        assert!(modes.is_empty());
        assert!(capacity.is_none());
        assert!(class.is_none());
    }
}
