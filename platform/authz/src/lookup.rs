//! Out-of-band facts consulted by the cluster inheritance path.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::{GrantedPrivilege, ResourceId, ResourceIdentity};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("privilege store unavailable: {0}")]
    Unavailable(String),
    #[error("inconsistent privilege data: {0}")]
    Inconsistent(String),
}

/// Read access to recorded privileges and view-to-cluster bindings.
///
/// Implementations are shared across concurrent decisions and must tolerate
/// parallel reads. Missing data is `Ok(None)` / `Ok(vec![])`, never an error.
#[async_trait]
pub trait PrivilegeLookup: Send + Sync {
    /// Owning cluster of the view instance stored under `resource_id`.
    /// `None` when no such view instance exists or it is not bound.
    async fn find_cluster_binding(
        &self,
        resource_id: ResourceId,
    ) -> Result<Option<ResourceIdentity>, LookupError>;

    /// Every privilege recorded against `resource_id`, whoever holds it.
    async fn find_privileges_for_resource(
        &self,
        resource_id: ResourceId,
    ) -> Result<Vec<GrantedPrivilege>, LookupError>;
}

#[async_trait]
impl<T: PrivilegeLookup + ?Sized> PrivilegeLookup for Arc<T> {
    async fn find_cluster_binding(
        &self,
        resource_id: ResourceId,
    ) -> Result<Option<ResourceIdentity>, LookupError> {
        (**self).find_cluster_binding(resource_id).await
    }

    async fn find_privileges_for_resource(
        &self,
        resource_id: ResourceId,
    ) -> Result<Vec<GrantedPrivilege>, LookupError> {
        (**self).find_privileges_for_resource(resource_id).await
    }
}

/// Fixed, in-process lookup data. Built once, then read-only.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLookup {
    views: HashMap<ResourceId, Option<ResourceIdentity>>,
    privileges: HashMap<ResourceId, Vec<GrantedPrivilege>>,
}

impl InMemoryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bound_view(mut self, view: ResourceId, cluster: ResourceIdentity) -> Self {
        self.views.insert(view, Some(cluster));
        self
    }

    pub fn with_unbound_view(mut self, view: ResourceId) -> Self {
        self.views.insert(view, None);
        self
    }

    /// Records a privilege under the resource it was granted on.
    pub fn with_privilege(mut self, privilege: GrantedPrivilege) -> Self {
        self.privileges
            .entry(privilege.resource.id)
            .or_default()
            .push(privilege);
        self
    }
}

#[async_trait]
impl PrivilegeLookup for InMemoryLookup {
    async fn find_cluster_binding(
        &self,
        resource_id: ResourceId,
    ) -> Result<Option<ResourceIdentity>, LookupError> {
        Ok(self.views.get(&resource_id).copied().flatten())
    }

    async fn find_privileges_for_resource(
        &self,
        resource_id: ResourceId,
    ) -> Result<Vec<GrantedPrivilege>, LookupError> {
        Ok(self
            .privileges
            .get(&resource_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Permission, PrincipalRecord, ResourceRecord, ResourceType};

    #[tokio::test]
    async fn bindings_distinguish_unbound_from_unknown() {
        let cluster = ResourceIdentity::new(ResourceType::Cluster, 2);
        let lookup = InMemoryLookup::new()
            .with_bound_view(10, cluster)
            .with_unbound_view(11);
        assert_eq!(lookup.find_cluster_binding(10).await.unwrap(), Some(cluster));
        assert_eq!(lookup.find_cluster_binding(11).await.unwrap(), None);
        assert_eq!(lookup.find_cluster_binding(12).await.unwrap(), None);
    }

    #[tokio::test]
    async fn privileges_are_keyed_by_resource() {
        let privilege = GrantedPrivilege::new(
            1,
            PrincipalRecord::new(7, "ALL.CLUSTER.USER"),
            ResourceRecord::new(10, "VIEW"),
            Permission::new(4, "VIEW.USER"),
        );
        let lookup: Arc<dyn PrivilegeLookup> =
            Arc::new(InMemoryLookup::new().with_privilege(privilege.clone()));
        assert_eq!(
            lookup.find_privileges_for_resource(10).await.unwrap(),
            vec![privilege]
        );
        assert!(lookup.find_privileges_for_resource(11).await.unwrap().is_empty());
    }
}
