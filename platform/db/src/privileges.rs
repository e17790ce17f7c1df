use std::collections::{BTreeSet, HashMap};

use entity::{
    admin_permission, admin_principal, admin_principal_type, admin_privilege, admin_resource,
    admin_resource_type, permission_role_authorization, role_authorization, users,
};
use platform_authz::{
    AuthenticatedPrincipal, AuthorizationRecord, GrantedPrivilege, Permission, PrincipalRecord,
    ResourceId, ResourceRecord,
};
use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use tracing::warn;

use crate::DbPool;

pub async fn find_active_user(pool: &DbPool, user_name: &str) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::UserName.eq(user_name))
        .filter(users::Column::Active.eq(true))
        .one(pool)
        .await
}

/// Loads `user_name` with every privilege granted to its principal. Unknown
/// or deactivated users yield `None`.
pub async fn load_principal(
    pool: &DbPool,
    user_name: &str,
) -> Result<Option<AuthenticatedPrincipal>, DbErr> {
    let Some(user) = find_active_user(pool, user_name).await? else {
        return Ok(None);
    };
    let privileges = privileges_for_principal(pool, user.principal_id).await?;
    Ok(Some(AuthenticatedPrincipal::new(user.user_name, privileges)))
}

pub async fn privileges_for_principal(
    pool: &DbPool,
    principal_id: i64,
) -> Result<Vec<GrantedPrivilege>, DbErr> {
    let rows = admin_privilege::Entity::find()
        .filter(admin_privilege::Column::PrincipalId.eq(principal_id))
        .order_by_asc(admin_privilege::Column::PrivilegeId)
        .all(pool)
        .await?;
    hydrate(pool, rows).await
}

pub async fn privileges_for_resource(
    pool: &DbPool,
    resource_id: ResourceId,
) -> Result<Vec<GrantedPrivilege>, DbErr> {
    let rows = admin_privilege::Entity::find()
        .filter(admin_privilege::Column::ResourceId.eq(resource_id))
        .order_by_asc(admin_privilege::Column::PrivilegeId)
        .all(pool)
        .await?;
    hydrate(pool, rows).await
}

/// Resolves privilege rows into full records with a fixed number of queries,
/// whatever the row count.
async fn hydrate(
    pool: &DbPool,
    rows: Vec<admin_privilege::Model>,
) -> Result<Vec<GrantedPrivilege>, DbErr> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let permission_ids: BTreeSet<i64> = rows.iter().map(|row| row.permission_id).collect();
    let resource_ids: BTreeSet<i64> = rows.iter().map(|row| row.resource_id).collect();
    let principal_ids: BTreeSet<i64> = rows.iter().map(|row| row.principal_id).collect();

    let permissions = load_permissions(pool, &permission_ids).await?;

    let resource_type_names: HashMap<i32, String> = admin_resource_type::Entity::find()
        .all(pool)
        .await?
        .into_iter()
        .map(|model| (model.resource_type_id, model.resource_type_name))
        .collect();
    let resources: HashMap<i64, ResourceRecord> = admin_resource::Entity::find()
        .filter(admin_resource::Column::ResourceId.is_in(resource_ids))
        .all(pool)
        .await?
        .into_iter()
        .map(|model| {
            let type_name = resource_type_names
                .get(&model.resource_type_id)
                .cloned()
                .unwrap_or_default();
            (model.resource_id, ResourceRecord::new(model.resource_id, type_name))
        })
        .collect();

    let principal_type_names: HashMap<i32, String> = admin_principal_type::Entity::find()
        .all(pool)
        .await?
        .into_iter()
        .map(|model| (model.principal_type_id, model.principal_type_name))
        .collect();
    let principals: HashMap<i64, PrincipalRecord> = admin_principal::Entity::find()
        .filter(admin_principal::Column::PrincipalId.is_in(principal_ids))
        .all(pool)
        .await?
        .into_iter()
        .map(|model| {
            let type_name = principal_type_names
                .get(&model.principal_type_id)
                .cloned()
                .unwrap_or_default();
            (model.principal_id, PrincipalRecord::new(model.principal_id, type_name))
        })
        .collect();

    let mut privileges = Vec::with_capacity(rows.len());
    for row in rows {
        let (Some(permission), Some(resource), Some(principal)) = (
            permissions.get(&row.permission_id),
            resources.get(&row.resource_id),
            principals.get(&row.principal_id),
        ) else {
            warn!(privilege_id = row.privilege_id, "skipping privilege with dangling references");
            continue;
        };
        privileges.push(GrantedPrivilege::new(
            row.privilege_id,
            principal.clone(),
            resource.clone(),
            permission.clone(),
        ));
    }
    Ok(privileges)
}

async fn load_permissions(
    pool: &DbPool,
    permission_ids: &BTreeSet<i64>,
) -> Result<HashMap<i64, Permission>, DbErr> {
    let mut permissions: HashMap<i64, Permission> = admin_permission::Entity::find()
        .filter(admin_permission::Column::PermissionId.is_in(permission_ids.iter().copied()))
        .all(pool)
        .await?
        .into_iter()
        .map(|model| {
            (
                model.permission_id,
                Permission::new(model.permission_id, model.permission_name),
            )
        })
        .collect();

    let grants = permission_role_authorization::Entity::find()
        .filter(
            permission_role_authorization::Column::PermissionId
                .is_in(permission_ids.iter().copied()),
        )
        .order_by_asc(permission_role_authorization::Column::PermissionId)
        .order_by_asc(permission_role_authorization::Column::AuthorizationId)
        .all(pool)
        .await?;
    if grants.is_empty() {
        return Ok(permissions);
    }

    let authorization_ids: BTreeSet<String> = grants
        .iter()
        .map(|grant| grant.authorization_id.clone())
        .collect();
    let names: HashMap<String, String> = role_authorization::Entity::find()
        .filter(role_authorization::Column::AuthorizationId.is_in(authorization_ids))
        .all(pool)
        .await?
        .into_iter()
        .map(|model| (model.authorization_id, model.authorization_name))
        .collect();

    for grant in grants {
        let Some(permission) = permissions.get_mut(&grant.permission_id) else {
            continue;
        };
        let name = names
            .get(&grant.authorization_id)
            .cloned()
            .unwrap_or_else(|| grant.authorization_id.clone());
        permission
            .authorizations
            .push(AuthorizationRecord::new(grant.authorization_id, name));
    }
    Ok(permissions)
}
