use sea_orm_migration::prelude::*;

use crate::m20240101_000001_privilege_store::{
    AdminPermission, AdminPrincipal, AdminPrincipalType, AdminResource, AdminResourceType,
    PermissionRoleAuthorization, RoleAuthorization,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

const RESOURCE_TYPES: &[(i32, &str)] = &[(1, "AMBARI"), (2, "CLUSTER"), (3, "VIEW")];

/// The administrative root resource every `AMBARI` privilege is granted on.
const ADMIN_RESOURCE_ID: i64 = 1;

/// `ALL.*` types stand for every holder of the named cluster permission. Each
/// gets one shared principal (id equal to the type id) so view instances can
/// record which cluster permissions they inherit.
const PRINCIPAL_TYPES: &[(i32, &str)] = &[
    (1, "USER"),
    (2, "GROUP"),
    (3, "ALL.CLUSTER.ADMINISTRATOR"),
    (4, "ALL.CLUSTER.OPERATOR"),
    (5, "ALL.SERVICE.OPERATOR"),
    (6, "ALL.SERVICE.ADMINISTRATOR"),
    (7, "ALL.CLUSTER.USER"),
    (8, "ROLE"),
];

const INHERITED_PRINCIPAL_TYPES: std::ops::RangeInclusive<i32> = 3..=7;

const AUTHORIZATIONS: &[(&str, &str)] = &[
    ("AMBARI.ADD_DELETE_CLUSTERS", "Create new clusters"),
    ("AMBARI.ASSIGN_ROLES", "Assign roles"),
    ("AMBARI.MANAGE_GROUPS", "Manage groups"),
    ("AMBARI.MANAGE_SETTINGS", "Manage settings"),
    ("AMBARI.MANAGE_USERS", "Manage users"),
    ("AMBARI.MANAGE_VIEWS", "Manage Ambari Views"),
    ("AMBARI.RENAME_CLUSTER", "Rename clusters"),
    ("CLUSTER.MANAGE_ALERTS", "Manage cluster-level alerts"),
    ("CLUSTER.MANAGE_CONFIG_GROUPS", "Manage cluster config groups"),
    ("CLUSTER.MODIFY_CONFIGS", "Modify cluster configurations"),
    ("CLUSTER.TOGGLE_KERBEROS", "Enable/disable Kerberos"),
    ("CLUSTER.VIEW_ALERTS", "View cluster-level alerts"),
    ("CLUSTER.VIEW_CONFIGS", "View configuration"),
    ("CLUSTER.VIEW_METRICS", "View metrics"),
    ("CLUSTER.VIEW_STATUS_INFO", "View status information"),
    ("SERVICE.RUN_SERVICE_CHECK", "Run service checks"),
    ("SERVICE.START_STOP", "Start/Stop/Restart Service"),
    ("SERVICE.VIEW_CONFIGS", "View configurations"),
    ("SERVICE.VIEW_METRICS", "View metrics"),
    ("VIEW.USE", "Use View"),
];

const PERMISSIONS: &[(i64, &str, i32, &str)] = &[
    (1, "AMBARI.ADMINISTRATOR", 1, "Ambari Administrator"),
    (2, "CLUSTER.USER", 2, "Cluster User"),
    (3, "CLUSTER.ADMINISTRATOR", 2, "Cluster Administrator"),
    (4, "VIEW.USER", 3, "View User"),
    (5, "CLUSTER.OPERATOR", 2, "Cluster Operator"),
    (6, "SERVICE.OPERATOR", 2, "Service Operator"),
    (7, "SERVICE.ADMINISTRATOR", 2, "Service Administrator"),
];

const CLUSTER_USER_GRANTS: &[&str] = &[
    "CLUSTER.VIEW_ALERTS",
    "CLUSTER.VIEW_CONFIGS",
    "CLUSTER.VIEW_METRICS",
    "CLUSTER.VIEW_STATUS_INFO",
    "SERVICE.VIEW_CONFIGS",
    "SERVICE.VIEW_METRICS",
];

const SERVICE_OPERATOR_GRANTS: &[&str] = &["SERVICE.RUN_SERVICE_CHECK", "SERVICE.START_STOP"];

const CLUSTER_OPERATOR_GRANTS: &[&str] = &[
    "CLUSTER.MANAGE_CONFIG_GROUPS",
    "CLUSTER.MODIFY_CONFIGS",
    "CLUSTER.MANAGE_ALERTS",
];

const CLUSTER_ADMIN_GRANTS: &[&str] = &["CLUSTER.TOGGLE_KERBEROS"];

fn grants_for(permission_id: i64) -> Vec<&'static str> {
    match permission_id {
        1 => AUTHORIZATIONS.iter().map(|(id, _)| *id).collect(),
        2 => CLUSTER_USER_GRANTS.to_vec(),
        6 => [CLUSTER_USER_GRANTS, SERVICE_OPERATOR_GRANTS].concat(),
        7 | 5 => [CLUSTER_USER_GRANTS, SERVICE_OPERATOR_GRANTS, CLUSTER_OPERATOR_GRANTS].concat(),
        3 => [
            CLUSTER_USER_GRANTS,
            SERVICE_OPERATOR_GRANTS,
            CLUSTER_OPERATOR_GRANTS,
            CLUSTER_ADMIN_GRANTS,
        ]
        .concat(),
        4 => vec!["VIEW.USE"],
        _ => Vec::new(),
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (id, name) in RESOURCE_TYPES {
            let stmt = Query::insert()
                .into_table(AdminResourceType::Table)
                .columns([
                    AdminResourceType::ResourceTypeId,
                    AdminResourceType::ResourceTypeName,
                ])
                .values_panic([(*id).into(), (*name).into()])
                .to_owned();
            manager.exec_stmt(stmt).await?;
        }

        let stmt = Query::insert()
            .into_table(AdminResource::Table)
            .columns([AdminResource::ResourceId, AdminResource::ResourceTypeId])
            .values_panic([ADMIN_RESOURCE_ID.into(), 1i32.into()])
            .to_owned();
        manager.exec_stmt(stmt).await?;

        for (id, name) in PRINCIPAL_TYPES {
            let stmt = Query::insert()
                .into_table(AdminPrincipalType::Table)
                .columns([
                    AdminPrincipalType::PrincipalTypeId,
                    AdminPrincipalType::PrincipalTypeName,
                ])
                .values_panic([(*id).into(), (*name).into()])
                .to_owned();
            manager.exec_stmt(stmt).await?;
        }

        for type_id in INHERITED_PRINCIPAL_TYPES {
            let stmt = Query::insert()
                .into_table(AdminPrincipal::Table)
                .columns([AdminPrincipal::PrincipalId, AdminPrincipal::PrincipalTypeId])
                .values_panic([i64::from(type_id).into(), type_id.into()])
                .to_owned();
            manager.exec_stmt(stmt).await?;
        }

        for (id, name) in AUTHORIZATIONS {
            let stmt = Query::insert()
                .into_table(RoleAuthorization::Table)
                .columns([
                    RoleAuthorization::AuthorizationId,
                    RoleAuthorization::AuthorizationName,
                ])
                .values_panic([(*id).into(), (*name).into()])
                .to_owned();
            manager.exec_stmt(stmt).await?;
        }

        for (id, name, resource_type_id, label) in PERMISSIONS {
            let stmt = Query::insert()
                .into_table(AdminPermission::Table)
                .columns([
                    AdminPermission::PermissionId,
                    AdminPermission::PermissionName,
                    AdminPermission::ResourceTypeId,
                    AdminPermission::PermissionLabel,
                ])
                .values_panic([
                    (*id).into(),
                    (*name).into(),
                    (*resource_type_id).into(),
                    (*label).into(),
                ])
                .to_owned();
            manager.exec_stmt(stmt).await?;

            for authorization_id in grants_for(*id) {
                let stmt = Query::insert()
                    .into_table(PermissionRoleAuthorization::Table)
                    .columns([
                        PermissionRoleAuthorization::PermissionId,
                        PermissionRoleAuthorization::AuthorizationId,
                    ])
                    .values_panic([(*id).into(), authorization_id.into()])
                    .to_owned();
                manager.exec_stmt(stmt).await?;
            }
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(PermissionRoleAuthorization::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(AdminPermission::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(RoleAuthorization::Table).to_owned())
            .await?;
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(AdminPrincipal::Table)
                    .and_where(
                        Expr::col(AdminPrincipal::PrincipalTypeId)
                            .is_in(INHERITED_PRINCIPAL_TYPES),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(AdminPrincipalType::Table).to_owned())
            .await?;
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(AdminResource::Table)
                    .and_where(Expr::col(AdminResource::ResourceId).eq(ADMIN_RESOURCE_ID))
                    .to_owned(),
            )
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(AdminResourceType::Table).to_owned())
            .await
    }
}
