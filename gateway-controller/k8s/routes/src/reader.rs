use async_trait::async_trait;
use elbv2_gateway_controller_k8s_api::{self as k8s, NamespaceResourceScope};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// A cluster read failed. These errors are never attributable to a single
/// route and abort the reconcile so the controller runtime retries it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("failed to {verb} {kind}: {message}")]
pub struct ReadError {
    pub verb: &'static str,
    pub kind: String,
    pub message: String,
}

impl ReadError {
    pub(crate) fn get<K: k8s::Resource<DynamicType = ()>>(error: k8s::Error) -> Self {
        Self {
            verb: "get",
            kind: K::kind(&()).to_string(),
            message: error.to_string(),
        }
    }

    pub(crate) fn list<K: k8s::Resource<DynamicType = ()>>(error: k8s::Error) -> Self {
        Self {
            verb: "list",
            kind: K::kind(&()).to_string(),
            message: error.to_string(),
        }
    }
}

/// Read-only access to cluster state, semantically a client-go style cache.
///
/// The engine drives every suspension point through this trait; production
/// wiring hands it a [`k8s::Client`] backed by the watch cache, tests an
/// in-memory fake.
#[async_trait]
pub trait ClusterReader: Send + Sync {
    /// Fetches a namespaced object, returning `None` when it does not exist.
    async fn get<K>(&self, namespace: &str, name: &str) -> Result<Option<K>, ReadError>
    where
        K: k8s::Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + DeserializeOwned
            + Clone
            + Debug
            + Send
            + 'static;

    /// Lists the objects of a namespaced kind within one namespace.
    async fn list_namespaced<K>(&self, namespace: &str) -> Result<Vec<K>, ReadError>
    where
        K: k8s::Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + DeserializeOwned
            + Clone
            + Debug
            + Send
            + 'static;

    /// Lists the objects of a kind across the whole cluster.
    async fn list_all<K>(&self) -> Result<Vec<K>, ReadError>
    where
        K: k8s::Resource<DynamicType = ()> + DeserializeOwned + Clone + Debug + Send + 'static;
}

#[async_trait]
impl ClusterReader for k8s::Client {
    async fn get<K>(&self, namespace: &str, name: &str) -> Result<Option<K>, ReadError>
    where
        K: k8s::Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + DeserializeOwned
            + Clone
            + Debug
            + Send
            + 'static,
    {
        let api = k8s::Api::<K>::namespaced(self.clone(), namespace);
        api.get_opt(name).await.map_err(ReadError::get::<K>)
    }

    async fn list_namespaced<K>(&self, namespace: &str) -> Result<Vec<K>, ReadError>
    where
        K: k8s::Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + DeserializeOwned
            + Clone
            + Debug
            + Send
            + 'static,
    {
        let api = k8s::Api::<K>::namespaced(self.clone(), namespace);
        let list = api
            .list(&k8s::ListParams::default())
            .await
            .map_err(ReadError::list::<K>)?;
        Ok(list.items)
    }

    async fn list_all<K>(&self) -> Result<Vec<K>, ReadError>
    where
        K: k8s::Resource<DynamicType = ()> + DeserializeOwned + Clone + Debug + Send + 'static,
    {
        let api = k8s::Api::<K>::all(self.clone());
        let list = api
            .list(&k8s::ListParams::default())
            .await
            .map_err(ReadError::list::<K>)?;
        Ok(list.items)
    }
}
