use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use crate::{
    AuthzError,
    catalog::{GrantedPrivilege, ResourceId, ResourceType, RoleAuthorization},
    lookup::PrivilegeLookup,
    principal::{AuthenticatedPrincipal, PrincipalSource},
};

/// Authorizations of which at least one must be held.
pub type AuthorizationSet = HashSet<RoleAuthorization>;

/// Decides whether a principal may act on a resource.
///
/// The direct pass only reads the principal's own privileges. When it finds
/// nothing and a concrete resource id was asked for, the resource is treated
/// as a possible view instance: a principal holding a cluster permission that
/// the view records as cluster-inherited is let through. Only that path
/// touches the [`PrivilegeLookup`].
#[derive(Debug, Clone)]
pub struct Authorizer<L> {
    lookup: L,
}

impl<L: PrivilegeLookup> Authorizer<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// `resource_type: None` matches any type and `resource_id: None` any
    /// instance. An empty `required` set authorizes everyone.
    #[instrument(
        name = "authz.is_authorized",
        skip_all,
        fields(resource_type = ?resource_type, resource_id = ?resource_id)
    )]
    pub async fn is_authorized(
        &self,
        principal: Option<&AuthenticatedPrincipal>,
        resource_type: Option<ResourceType>,
        resource_id: Option<ResourceId>,
        required: &AuthorizationSet,
    ) -> bool {
        if required.is_empty() {
            return true;
        }
        let Some(principal) = principal.filter(|p| p.has_privileges()) else {
            return false;
        };

        if direct_match(principal, resource_type, resource_id, required) {
            return true;
        }

        match resource_id {
            Some(resource_id) => self.inherited_match(principal, resource_id).await,
            None => false,
        }
    }

    /// Same as [`Self::is_authorized`] for whoever `source` reports as current.
    pub async fn is_authorized_current(
        &self,
        source: &(impl PrincipalSource + Sync),
        resource_type: Option<ResourceType>,
        resource_id: Option<ResourceId>,
        required: &AuthorizationSet,
    ) -> bool {
        self.is_authorized(source.current_principal(), resource_type, resource_id, required)
            .await
    }

    /// Single-authorization form of [`Self::is_authorized`].
    pub async fn is_authorized_for(
        &self,
        principal: Option<&AuthenticatedPrincipal>,
        resource_type: Option<ResourceType>,
        resource_id: Option<ResourceId>,
        authorization: RoleAuthorization,
    ) -> bool {
        self.is_authorized(
            principal,
            resource_type,
            resource_id,
            &AuthorizationSet::from([authorization]),
        )
        .await
    }

    pub async fn verify_authorized(
        &self,
        principal: Option<&AuthenticatedPrincipal>,
        resource_type: Option<ResourceType>,
        resource_id: Option<ResourceId>,
        required: &AuthorizationSet,
    ) -> Result<(), AuthzError> {
        if self
            .is_authorized(principal, resource_type, resource_id, required)
            .await
        {
            Ok(())
        } else {
            Err(AuthzError::Denied)
        }
    }

    pub async fn verify_authorized_current(
        &self,
        source: &(impl PrincipalSource + Sync),
        resource_type: Option<ResourceType>,
        resource_id: Option<ResourceId>,
        required: &AuthorizationSet,
    ) -> Result<(), AuthzError> {
        self.verify_authorized(source.current_principal(), resource_type, resource_id, required)
            .await
    }

    async fn inherited_match(
        &self,
        principal: &AuthenticatedPrincipal,
        resource_id: ResourceId,
    ) -> bool {
        let cluster = match self.lookup.find_cluster_binding(resource_id).await {
            Ok(Some(cluster)) => cluster,
            Ok(None) => return false,
            Err(err) => {
                warn!(resource_id, error = %err, "cluster binding lookup failed; denying");
                return false;
            }
        };

        let recorded = match self.lookup.find_privileges_for_resource(resource_id).await {
            Ok(recorded) => recorded,
            Err(err) => {
                warn!(resource_id, error = %err, "privilege lookup failed; denying");
                return false;
            }
        };

        let inherited: HashSet<&str> = recorded
            .iter()
            .filter(|privilege| privilege.is_cluster_inherited())
            .filter_map(|privilege| privilege.principal.inherited_permission_name())
            .collect();
        if inherited.is_empty() {
            return false;
        }

        for privilege in principal.privileges() {
            if privilege_type(privilege) == Some(ResourceType::Cluster)
                && inherited.contains(privilege.permission.name.as_str())
            {
                debug!(
                    resource_id,
                    cluster_id = cluster.id,
                    permission = %privilege.permission.name,
                    "authorized through cluster-inherited permission"
                );
                return true;
            }
        }
        false
    }
}

fn direct_match(
    principal: &AuthenticatedPrincipal,
    resource_type: Option<ResourceType>,
    resource_id: Option<ResourceId>,
    required: &AuthorizationSet,
) -> bool {
    for privilege in principal.privileges() {
        let granted_type = privilege_type(privilege);
        let resource_ok = if granted_type == Some(ResourceType::Admin) {
            true
        } else if resource_type.is_none() || resource_type == granted_type {
            resource_id.is_none_or(|id| id == privilege.resource.id)
        } else {
            false
        };
        if !resource_ok {
            continue;
        }

        for record in &privilege.permission.authorizations {
            match RoleAuthorization::translate(&record.id) {
                Ok(authorization) if required.contains(&authorization) => {
                    debug!(
                        privilege_id = privilege.id,
                        %authorization,
                        "authorized by direct privilege"
                    );
                    return true;
                }
                Ok(_) => {}
                Err(_) => {
                    warn!(authorization = %record.id, "ignoring unknown authorization id");
                }
            }
        }
    }
    false
}

fn privilege_type(privilege: &GrantedPrivilege) -> Option<ResourceType> {
    match privilege.resource.resource_type() {
        Ok(resource_type) => Some(resource_type),
        Err(err) => {
            warn!(privilege_id = privilege.id, error = %err, "ignoring resource type");
            None
        }
    }
}

/// Display names of every authorization the principal holds, privilege by
/// privilege, in recorded order. Duplicates are kept.
pub fn authorization_names(principal: &AuthenticatedPrincipal) -> Vec<String> {
    let mut names = Vec::new();
    for privilege in principal.privileges() {
        for record in &privilege.permission.authorizations {
            names.push(record.name.clone());
        }
    }
    names
}
