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

//! In-memory cluster used by the flow and provisioner tests.

#![allow(dead_code)]

use k8s_openapi::api::core::v1::{Namespace, PersistentVolumeClaim, Secret};
use kubectl_volsync::infrastructure::kubernetes::crd::{
    ReplicationDestination, ReplicationDestinationRsyncStatus, ReplicationDestinationStatus,
    ReplicationSource, ReplicationSourceStatus,
};
use kubectl_volsync::{ClusterClientFactory, VolsyncError, VolsyncKubeClient};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct ClusterState {
    pub namespaces: BTreeSet<String>,
    pub pvcs: BTreeMap<String, PersistentVolumeClaim>,
    pub secrets: BTreeMap<String, Secret>,
    pub destinations: BTreeMap<String, ReplicationDestination>,
    pub sources: BTreeMap<String, ReplicationSource>,
    /// Mutating calls in order, e.g. `create_pvc ns1/vol1`
    pub calls: Vec<String>,
    pub destination_gets: u32,
    pub source_gets: u32,
    /// Status appears on the Nth get; `None` means never
    pub destination_ready_after: Option<u32>,
    pub destination_endpoint: ReplicationDestinationRsyncStatus,
    pub source_status_after: Option<u32>,
}

/// One fake cluster. Clones share state.
#[derive(Clone, Default)]
pub struct MockCluster {
    state: Arc<Mutex<ClusterState>>,
}

impl MockCluster {
    pub fn new() -> Self {
        let cluster = Self::default();
        cluster.with_state(|s| {
            s.destination_ready_after = Some(2);
            s.destination_endpoint = ReplicationDestinationRsyncStatus {
                address: Some("10.0.0.7".to_string()),
                port: Some(22),
                ssh_keys: Some("volsync-rsync-dst-src-ns1-vol1-migration-dest".to_string()),
            };
            s.source_status_after = Some(1);
        });
        cluster
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut ClusterState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn calls(&self) -> Vec<String> {
        self.with_state(|s| s.calls.clone())
    }

    pub fn add_namespace(&self, name: &str) {
        self.with_state(|s| {
            s.namespaces.insert(name.to_string());
        });
    }

    pub fn add_pvc(&self, namespace: &str, pvc: PersistentVolumeClaim) {
        let name = pvc.metadata.name.clone().unwrap_or_default();
        self.with_state(|s| {
            s.namespaces.insert(namespace.to_string());
            s.pvcs.insert(key(namespace, &name), pvc);
        });
    }

    pub fn add_secret(&self, namespace: &str, secret: Secret) {
        let name = secret.metadata.name.clone().unwrap_or_default();
        self.with_state(|s| {
            s.secrets.insert(key(namespace, &name), secret);
        });
    }

    pub fn pvc(&self, namespace: &str, name: &str) -> Option<PersistentVolumeClaim> {
        self.with_state(|s| s.pvcs.get(&key(namespace, name)).cloned())
    }

    pub fn secret(&self, namespace: &str, name: &str) -> Option<Secret> {
        self.with_state(|s| s.secrets.get(&key(namespace, name)).cloned())
    }

    pub fn destination(&self, namespace: &str, name: &str) -> Option<ReplicationDestination> {
        self.with_state(|s| s.destinations.get(&key(namespace, name)).cloned())
    }

    pub fn source(&self, namespace: &str, name: &str) -> Option<ReplicationSource> {
        self.with_state(|s| s.sources.get(&key(namespace, name)).cloned())
    }

    pub fn client(&self, namespace: &str) -> MockKubeClient {
        MockKubeClient {
            cluster: self.clone(),
            namespace: namespace.to_string(),
        }
    }
}

fn key(namespace: &str, name: &str) -> String {
    format!("{}/{}", namespace, name)
}

fn object_name(meta: &k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta) -> String {
    meta.name.clone().unwrap_or_default()
}

pub struct MockKubeClient {
    cluster: MockCluster,
    namespace: String,
}

#[async_trait::async_trait]
impl VolsyncKubeClient for MockKubeClient {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn create_namespace(&self, namespace: &Namespace) -> Result<(), VolsyncError> {
        let name = object_name(&namespace.metadata);
        self.cluster.with_state(|s| {
            s.calls.push(format!("create_namespace {}", name));
            if !s.namespaces.insert(name.clone()) {
                return Err(VolsyncError::already_exists("Namespace", &name, &name));
            }
            Ok(())
        })
    }

    async fn get_pvc(&self, name: &str) -> Result<PersistentVolumeClaim, VolsyncError> {
        self.cluster.with_state(|s| {
            s.pvcs.get(&key(&self.namespace, name)).cloned().ok_or_else(|| {
                VolsyncError::not_found("PersistentVolumeClaim", name, &self.namespace)
            })
        })
    }

    async fn create_pvc(
        &self,
        pvc: &PersistentVolumeClaim,
    ) -> Result<PersistentVolumeClaim, VolsyncError> {
        let name = object_name(&pvc.metadata);
        self.cluster.with_state(|s| {
            s.calls.push(format!("create_pvc {}/{}", self.namespace, name));
            let k = key(&self.namespace, &name);
            if s.pvcs.contains_key(&k) {
                return Err(VolsyncError::already_exists(
                    "PersistentVolumeClaim",
                    &name,
                    &self.namespace,
                ));
            }
            s.pvcs.insert(k, pvc.clone());
            Ok(pvc.clone())
        })
    }

    async fn create_secret(&self, secret: &Secret) -> Result<(), VolsyncError> {
        let name = object_name(&secret.metadata);
        self.cluster.with_state(|s| {
            s.calls.push(format!("create_secret {}/{}", self.namespace, name));
            let k = key(&self.namespace, &name);
            if s.secrets.contains_key(&k) {
                return Err(VolsyncError::already_exists("Secret", &name, &self.namespace));
            }
            s.secrets.insert(k, secret.clone());
            Ok(())
        })
    }

    async fn delete_secret(&self, name: &str) -> Result<(), VolsyncError> {
        self.cluster.with_state(|s| {
            s.calls.push(format!("delete_secret {}/{}", self.namespace, name));
            s.secrets
                .remove(&key(&self.namespace, name))
                .map(|_| ())
                .ok_or_else(|| VolsyncError::not_found("Secret", name, &self.namespace))
        })
    }

    async fn create_replication_destination(
        &self,
        destination: &ReplicationDestination,
    ) -> Result<ReplicationDestination, VolsyncError> {
        let name = object_name(&destination.metadata);
        self.cluster.with_state(|s| {
            s.calls
                .push(format!("create_replication_destination {}/{}", self.namespace, name));
            let k = key(&self.namespace, &name);
            if s.destinations.contains_key(&k) {
                return Err(VolsyncError::already_exists(
                    "ReplicationDestination",
                    &name,
                    &self.namespace,
                ));
            }
            s.destinations.insert(k, destination.clone());
            Ok(destination.clone())
        })
    }

    async fn get_replication_destination(
        &self,
        name: &str,
    ) -> Result<ReplicationDestination, VolsyncError> {
        self.cluster.with_state(|s| -> Result<ReplicationDestination, VolsyncError> {
            s.destination_gets += 1;
            let gets = s.destination_gets;
            let ready_after = s.destination_ready_after;
            let endpoint = s.destination_endpoint.clone();
            let destination = s
                .destinations
                .get_mut(&key(&self.namespace, name))
                .ok_or_else(|| {
                    VolsyncError::not_found("ReplicationDestination", name, &self.namespace)
                })?;
            if ready_after.is_some_and(|n| gets >= n) {
                destination.status = Some(ReplicationDestinationStatus {
                    rsync: Some(endpoint),
                    ..Default::default()
                });
            }
            Ok(destination.clone())
        })
    }

    async fn create_replication_source(
        &self,
        source: &ReplicationSource,
    ) -> Result<ReplicationSource, VolsyncError> {
        let name = object_name(&source.metadata);
        self.cluster.with_state(|s| {
            s.calls
                .push(format!("create_replication_source {}/{}", self.namespace, name));
            let k = key(&self.namespace, &name);
            if s.sources.contains_key(&k) {
                return Err(VolsyncError::already_exists(
                    "ReplicationSource",
                    &name,
                    &self.namespace,
                ));
            }
            s.sources.insert(k, source.clone());
            Ok(source.clone())
        })
    }

    async fn get_replication_source(
        &self,
        name: &str,
    ) -> Result<ReplicationSource, VolsyncError> {
        self.cluster.with_state(|s| -> Result<ReplicationSource, VolsyncError> {
            s.source_gets += 1;
            let gets = s.source_gets;
            let status_after = s.source_status_after;
            let source = s
                .sources
                .get_mut(&key(&self.namespace, name))
                .ok_or_else(|| {
                    VolsyncError::not_found("ReplicationSource", name, &self.namespace)
                })?;
            if status_after.is_some_and(|n| gets >= n) && source.status.is_none() {
                source.status = Some(ReplicationSourceStatus::default());
            }
            Ok(source.clone())
        })
    }
}

/// Maps cluster names to fake clusters; the empty name is the current
/// context.
#[derive(Default)]
pub struct MockClientFactory {
    clusters: HashMap<String, MockCluster>,
    connects: AtomicU32,
}

impl MockClientFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cluster(mut self, name: &str, cluster: MockCluster) -> Self {
        self.clusters.insert(name.to_string(), cluster);
        self
    }

    pub fn connects(&self) -> u32 {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ClusterClientFactory for MockClientFactory {
    async fn connect(
        &self,
        cluster: Option<&str>,
        namespace: &str,
    ) -> Result<Box<dyn VolsyncKubeClient>, VolsyncError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let name = cluster.unwrap_or_default();
        let cluster = self
            .clusters
            .get(name)
            .ok_or_else(|| VolsyncError::ClusterUnreachable {
                cluster: name.to_string(),
                reason: "no such context".to_string(),
            })?;
        Ok(Box::new(cluster.client(namespace)))
    }
}
