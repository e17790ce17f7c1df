use async_trait::async_trait;
use entity::{clusters, view_instance};
use platform_authz::{
    GrantedPrivilege, LookupError, PrivilegeLookup, ResourceId, ResourceIdentity, ResourceType,
};
use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter};

use crate::{DbPool, privileges};

/// [`PrivilegeLookup`] over the relational privilege store.
#[derive(Clone, Debug)]
pub struct DbPrivilegeLookup {
    pool: DbPool,
}

impl DbPrivilegeLookup {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn unavailable(err: DbErr) -> LookupError {
    LookupError::Unavailable(err.to_string())
}

#[async_trait]
impl PrivilegeLookup for DbPrivilegeLookup {
    async fn find_cluster_binding(
        &self,
        resource_id: ResourceId,
    ) -> Result<Option<ResourceIdentity>, LookupError> {
        let view = view_instance::Entity::find()
            .filter(view_instance::Column::ResourceId.eq(resource_id))
            .one(&self.pool)
            .await
            .map_err(unavailable)?;
        let Some(cluster_id) = view.and_then(|view| view.cluster_handle) else {
            return Ok(None);
        };
        let cluster = clusters::Entity::find_by_id(cluster_id)
            .one(&self.pool)
            .await
            .map_err(unavailable)?
            .ok_or_else(|| {
                LookupError::Inconsistent(format!(
                    "view resource {resource_id} bound to missing cluster {cluster_id}"
                ))
            })?;
        Ok(Some(ResourceIdentity::new(
            ResourceType::Cluster,
            cluster.resource_id,
        )))
    }

    async fn find_privileges_for_resource(
        &self,
        resource_id: ResourceId,
    ) -> Result<Vec<GrantedPrivilege>, LookupError> {
        privileges::privileges_for_resource(&self.pool, resource_id)
            .await
            .map_err(unavailable)
    }
}
