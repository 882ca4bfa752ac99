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

use super::crd::{ReplicationDestination, ReplicationSource};
use crate::shared::error::VolsyncError;
use k8s_openapi::api::core::v1::{Namespace, PersistentVolumeClaim, Secret};
use kube::api::{DeleteParams, PostParams};
use kube::{Api, Client};

/// Namespace-bound view of one cluster. Namespaces themselves are
/// cluster-scoped; everything else lives in `namespace()`.
#[async_trait::async_trait]
pub trait VolsyncKubeClient: Send + Sync {
    fn namespace(&self) -> &str;

    async fn create_namespace(&self, namespace: &Namespace) -> Result<(), VolsyncError>;

    async fn get_pvc(&self, name: &str) -> Result<PersistentVolumeClaim, VolsyncError>;

    async fn create_pvc(
        &self,
        pvc: &PersistentVolumeClaim,
    ) -> Result<PersistentVolumeClaim, VolsyncError>;

    async fn create_secret(&self, secret: &Secret) -> Result<(), VolsyncError>;

    async fn delete_secret(&self, name: &str) -> Result<(), VolsyncError>;

    async fn create_replication_destination(
        &self,
        destination: &ReplicationDestination,
    ) -> Result<ReplicationDestination, VolsyncError>;

    async fn get_replication_destination(
        &self,
        name: &str,
    ) -> Result<ReplicationDestination, VolsyncError>;

    async fn create_replication_source(
        &self,
        source: &ReplicationSource,
    ) -> Result<ReplicationSource, VolsyncError>;

    async fn get_replication_source(&self, name: &str)
        -> Result<ReplicationSource, VolsyncError>;
}

/// Produces a client for the cluster named in a resource identifier.
/// `None` selects the kubeconfig's current context.
#[async_trait::async_trait]
pub trait ClusterClientFactory: Send + Sync {
    async fn connect(
        &self,
        cluster: Option<&str>,
        namespace: &str,
    ) -> Result<Box<dyn VolsyncKubeClient>, VolsyncError>;
}

pub struct VolsyncKubeClientImpl {
    client: Client,
    namespace: String,
}

impl VolsyncKubeClientImpl {
    /// Build a client from a kubeconfig file. `context` doubles as the
    /// cluster name of a `cluster/namespace/name` identifier.
    pub async fn new_with_config(
        namespace: String,
        kubeconfig_path: Option<String>,
        context: Option<String>,
    ) -> Result<Self, VolsyncError> {
        use kube::config::{KubeConfigOptions, Kubeconfig};

        let cluster = context
            .clone()
            .unwrap_or_else(|| "current-context".to_string());
        let unreachable = |reason: String| VolsyncError::ClusterUnreachable {
            cluster: cluster.clone(),
            reason,
        };

        let kubeconfig = if let Some(path) = kubeconfig_path {
            Kubeconfig::read_from(path)
                .map_err(|e| unreachable(format!("Failed to load kubeconfig: {}", e)))?
        } else {
            Kubeconfig::read()
                .map_err(|e| unreachable(format!("Failed to load kubeconfig: {}", e)))?
        };

        let config_options = KubeConfigOptions {
            context,
            cluster: None,
            user: None,
        };

        let config = kube::Config::from_custom_kubeconfig(kubeconfig, &config_options)
            .await
            .map_err(|e| unreachable(format!("Failed to create Kubernetes config: {}", e)))?;

        let client = Client::try_from(config)
            .map_err(|e| unreachable(format!("Failed to create Kubernetes client: {}", e)))?;

        Ok(Self { client, namespace })
    }

    fn namespaced<K>(&self) -> Api<K>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>,
        <K as kube::Resource>::DynamicType: Default,
    {
        Api::namespaced(self.client.clone(), &self.namespace)
    }
}

#[async_trait::async_trait]
impl VolsyncKubeClient for VolsyncKubeClientImpl {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn create_namespace(&self, namespace: &Namespace) -> Result<(), VolsyncError> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let name = namespace.metadata.name.as_deref().unwrap_or_default();

        api.create(&PostParams::default(), namespace)
            .await
            .map_err(|e| VolsyncError::from_api(e, "Namespace", name, name))?;
        Ok(())
    }

    async fn get_pvc(&self, name: &str) -> Result<PersistentVolumeClaim, VolsyncError> {
        let api: Api<PersistentVolumeClaim> = self.namespaced();
        api.get(name).await.map_err(|e| {
            VolsyncError::from_api(e, "PersistentVolumeClaim", name, &self.namespace)
        })
    }

    async fn create_pvc(
        &self,
        pvc: &PersistentVolumeClaim,
    ) -> Result<PersistentVolumeClaim, VolsyncError> {
        let api: Api<PersistentVolumeClaim> = self.namespaced();
        let name = pvc.metadata.name.as_deref().unwrap_or_default();

        api.create(&PostParams::default(), pvc).await.map_err(|e| {
            VolsyncError::from_api(e, "PersistentVolumeClaim", name, &self.namespace)
        })
    }

    async fn create_secret(&self, secret: &Secret) -> Result<(), VolsyncError> {
        let api: Api<Secret> = self.namespaced();
        let name = secret.metadata.name.as_deref().unwrap_or_default();

        api.create(&PostParams::default(), secret)
            .await
            .map_err(|e| VolsyncError::from_api(e, "Secret", name, &self.namespace))?;
        Ok(())
    }

    async fn delete_secret(&self, name: &str) -> Result<(), VolsyncError> {
        let api: Api<Secret> = self.namespaced();

        api.delete(name, &DeleteParams::default())
            .await
            .map_err(|e| VolsyncError::from_api(e, "Secret", name, &self.namespace))?;
        Ok(())
    }

    async fn create_replication_destination(
        &self,
        destination: &ReplicationDestination,
    ) -> Result<ReplicationDestination, VolsyncError> {
        let api: Api<ReplicationDestination> = self.namespaced();
        let name = destination.metadata.name.as_deref().unwrap_or_default();

        api.create(&PostParams::default(), destination)
            .await
            .map_err(|e| {
                VolsyncError::from_api(e, "ReplicationDestination", name, &self.namespace)
            })
    }

    async fn get_replication_destination(
        &self,
        name: &str,
    ) -> Result<ReplicationDestination, VolsyncError> {
        let api: Api<ReplicationDestination> = self.namespaced();
        api.get(name).await.map_err(|e| {
            VolsyncError::from_api(e, "ReplicationDestination", name, &self.namespace)
        })
    }

    async fn create_replication_source(
        &self,
        source: &ReplicationSource,
    ) -> Result<ReplicationSource, VolsyncError> {
        let api: Api<ReplicationSource> = self.namespaced();
        let name = source.metadata.name.as_deref().unwrap_or_default();

        api.create(&PostParams::default(), source)
            .await
            .map_err(|e| VolsyncError::from_api(e, "ReplicationSource", name, &self.namespace))
    }

    async fn get_replication_source(
        &self,
        name: &str,
    ) -> Result<ReplicationSource, VolsyncError> {
        let api: Api<ReplicationSource> = self.namespaced();
        api.get(name)
            .await
            .map_err(|e| VolsyncError::from_api(e, "ReplicationSource", name, &self.namespace))
    }
}

/// Resolves cluster names to kubeconfig contexts.
#[derive(Debug, Clone, Default)]
pub struct KubeconfigClientFactory {
    kubeconfig: Option<String>,
}

impl KubeconfigClientFactory {
    pub fn new(kubeconfig: Option<String>) -> Self {
        Self { kubeconfig }
    }
}

#[async_trait::async_trait]
impl ClusterClientFactory for KubeconfigClientFactory {
    async fn connect(
        &self,
        cluster: Option<&str>,
        namespace: &str,
    ) -> Result<Box<dyn VolsyncKubeClient>, VolsyncError> {
        tracing::debug!(cluster = cluster.unwrap_or("<current>"), namespace, "connecting");
        let client = VolsyncKubeClientImpl::new_with_config(
            namespace.to_string(),
            self.kubeconfig.clone(),
            cluster.map(str::to_string),
        )
        .await?;
        Ok(Box::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_missing_kubeconfig_is_cluster_unreachable() {
        let factory = KubeconfigClientFactory::new(Some(
            "/nonexistent/kubectl-volsync/kubeconfig".to_string(),
        ));
        let err = factory
            .connect(Some("clusterA"), "ns1")
            .await
            .err()
            .unwrap();
        match err {
            VolsyncError::ClusterUnreachable { cluster, .. } => assert_eq!(cluster, "clusterA"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_context_is_cluster_unreachable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "apiVersion: v1\nkind: Config\nclusters: []\ncontexts: []\nusers: []\n"
        )
        .unwrap();

        let factory =
            KubeconfigClientFactory::new(Some(file.path().to_string_lossy().to_string()));
        let result = factory.connect(Some("missing"), "ns1").await;
        assert!(matches!(
            result,
            Err(VolsyncError::ClusterUnreachable { .. })
        ));
    }
}
