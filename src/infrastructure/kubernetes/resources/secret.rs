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
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// Opaque secret populated through `stringData`
pub struct SecretBuilder {
    name: String,
    namespace: String,
    string_data: BTreeMap<String, String>,
    relationship: Option<String>,
}

impl SecretBuilder {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        string_data: BTreeMap<String, String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            string_data,
            relationship: None,
        }
    }

    pub fn relationship(mut self, relationship: impl Into<String>) -> Self {
        self.relationship = Some(relationship.into());
        self
    }

    pub fn build(&self) -> Secret {
        Secret {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                namespace: Some(self.namespace.clone()),
                labels: Some(common_labels(self.relationship.as_deref())),
                ..Default::default()
            },
            type_: Some("Opaque".to_string()),
            string_data: Some(self.string_data.clone()),
            ..Default::default()
        }
    }
}
