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

pub mod namespace;
pub mod pvc;
pub mod replication;
pub mod secret;

pub use namespace::NamespaceBuilder;
pub use pvc::PvcBuilder;
pub use replication::{ReplicationDestinationBuilder, ReplicationSourceBuilder};
pub use secret::SecretBuilder;

use crate::infrastructure::constants::{FIELD_MANAGER, LABEL_CREATED_BY, LABEL_RELATIONSHIP};
use std::collections::BTreeMap;

/// Labels stamped on every object this tool creates
pub fn common_labels(relationship: Option<&str>) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert(LABEL_CREATED_BY.to_string(), FIELD_MANAGER.to_string());
    if let Some(relationship) = relationship {
        labels.insert(LABEL_RELATIONSHIP.to_string(), relationship.to_string());
    }
    labels
}
