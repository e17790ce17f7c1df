use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
pub(crate) enum AdminResourceType {
    #[sea_orm(iden = "adminresourcetype")]
    Table,
    ResourceTypeId,
    ResourceTypeName,
}

#[derive(DeriveIden)]
pub(crate) enum AdminResource {
    #[sea_orm(iden = "adminresource")]
    Table,
    ResourceId,
    ResourceTypeId,
}

#[derive(DeriveIden)]
pub(crate) enum AdminPermission {
    #[sea_orm(iden = "adminpermission")]
    Table,
    PermissionId,
    PermissionName,
    ResourceTypeId,
    PermissionLabel,
}

#[derive(DeriveIden)]
pub(crate) enum RoleAuthorization {
    #[sea_orm(iden = "roleauthorization")]
    Table,
    AuthorizationId,
    AuthorizationName,
}

#[derive(DeriveIden)]
pub(crate) enum PermissionRoleAuthorization {
    #[sea_orm(iden = "permission_roleauthorization")]
    Table,
    PermissionId,
    AuthorizationId,
}

#[derive(DeriveIden)]
pub(crate) enum AdminPrincipalType {
    #[sea_orm(iden = "adminprincipaltype")]
    Table,
    PrincipalTypeId,
    PrincipalTypeName,
}

#[derive(DeriveIden)]
pub(crate) enum AdminPrincipal {
    #[sea_orm(iden = "adminprincipal")]
    Table,
    PrincipalId,
    PrincipalTypeId,
}

#[derive(DeriveIden)]
pub(crate) enum AdminPrivilege {
    #[sea_orm(iden = "adminprivilege")]
    Table,
    PrivilegeId,
    PermissionId,
    ResourceId,
    PrincipalId,
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    UserId,
    UserName,
    PrincipalId,
    Active,
}

#[derive(DeriveIden)]
pub(crate) enum Clusters {
    Table,
    ClusterId,
    ClusterName,
    ResourceId,
}

#[derive(DeriveIden)]
pub(crate) enum ViewInstance {
    #[sea_orm(iden = "viewinstance")]
    Table,
    ViewInstanceId,
    ViewName,
    Name,
    ResourceId,
    ClusterHandle,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminResourceType::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminResourceType::ResourceTypeId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdminResourceType::ResourceTypeName)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdminResource::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminResource::ResourceId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdminResource::ResourceTypeId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_resource_resource_type")
                            .from(AdminResource::Table, AdminResource::ResourceTypeId)
                            .to(AdminResourceType::Table, AdminResourceType::ResourceTypeId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdminPermission::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminPermission::PermissionId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdminPermission::PermissionName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminPermission::ResourceTypeId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AdminPermission::PermissionLabel).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_permission_resource_type")
                            .from(AdminPermission::Table, AdminPermission::ResourceTypeId)
                            .to(AdminResourceType::Table, AdminResourceType::ResourceTypeId),
                    )
                    .index(
                        Index::create()
                            .name("uq_perm_name_resource_type_id")
                            .col(AdminPermission::PermissionName)
                            .col(AdminPermission::ResourceTypeId)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RoleAuthorization::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoleAuthorization::AuthorizationId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RoleAuthorization::AuthorizationName)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PermissionRoleAuthorization::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PermissionRoleAuthorization::PermissionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PermissionRoleAuthorization::AuthorizationId)
                            .string()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_permission_roleauthorization")
                            .col(PermissionRoleAuthorization::PermissionId)
                            .col(PermissionRoleAuthorization::AuthorizationId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_permission_roleauthorization_permission")
                            .from(
                                PermissionRoleAuthorization::Table,
                                PermissionRoleAuthorization::PermissionId,
                            )
                            .to(AdminPermission::Table, AdminPermission::PermissionId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_permission_roleauthorization_authorization")
                            .from(
                                PermissionRoleAuthorization::Table,
                                PermissionRoleAuthorization::AuthorizationId,
                            )
                            .to(RoleAuthorization::Table, RoleAuthorization::AuthorizationId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdminPrincipalType::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminPrincipalType::PrincipalTypeId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdminPrincipalType::PrincipalTypeName)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdminPrincipal::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminPrincipal::PrincipalId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdminPrincipal::PrincipalTypeId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_principal_principal_type")
                            .from(AdminPrincipal::Table, AdminPrincipal::PrincipalTypeId)
                            .to(AdminPrincipalType::Table, AdminPrincipalType::PrincipalTypeId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdminPrivilege::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminPrivilege::PrivilegeId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdminPrivilege::PermissionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminPrivilege::ResourceId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminPrivilege::PrincipalId)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_privilege_permission")
                            .from(AdminPrivilege::Table, AdminPrivilege::PermissionId)
                            .to(AdminPermission::Table, AdminPermission::PermissionId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_privilege_resource")
                            .from(AdminPrivilege::Table, AdminPrivilege::ResourceId)
                            .to(AdminResource::Table, AdminResource::ResourceId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_privilege_principal")
                            .from(AdminPrivilege::Table, AdminPrivilege::PrincipalId)
                            .to(AdminPrincipal::Table, AdminPrincipal::PrincipalId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_adminprivilege_resource_id")
                    .table(AdminPrivilege::Table)
                    .col(AdminPrivilege::ResourceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_adminprivilege_principal_id")
                    .table(AdminPrivilege::Table)
                    .col(AdminPrivilege::PrincipalId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::UserName)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PrincipalId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Users::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_principal")
                            .from(Users::Table, Users::PrincipalId)
                            .to(AdminPrincipal::Table, AdminPrincipal::PrincipalId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Clusters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clusters::ClusterId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Clusters::ClusterName)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Clusters::ResourceId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clusters_resource")
                            .from(Clusters::Table, Clusters::ResourceId)
                            .to(AdminResource::Table, AdminResource::ResourceId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ViewInstance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ViewInstance::ViewInstanceId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ViewInstance::ViewName).string().not_null())
                    .col(ColumnDef::new(ViewInstance::Name).string().not_null())
                    .col(
                        ColumnDef::new(ViewInstance::ResourceId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ViewInstance::ClusterHandle).big_integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_viewinstance_resource")
                            .from(ViewInstance::Table, ViewInstance::ResourceId)
                            .to(AdminResource::Table, AdminResource::ResourceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_viewinstance_cluster")
                            .from(ViewInstance::Table, ViewInstance::ClusterHandle)
                            .to(Clusters::Table, Clusters::ClusterId)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ViewInstance::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clusters::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AdminPrivilege::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AdminPrincipal::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(AdminPrincipalType::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(PermissionRoleAuthorization::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(RoleAuthorization::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(AdminPermission::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AdminResource::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(AdminResourceType::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}
