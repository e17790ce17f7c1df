use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{admin_permission, admin_principal, admin_resource};

/// One permission granted to one principal over one resource.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "adminprivilege")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub privilege_id: i64,
    pub permission_id: i64,
    pub resource_id: i64,
    pub principal_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "admin_permission::Entity",
        from = "Column::PermissionId",
        to = "admin_permission::Column::PermissionId"
    )]
    Permission,
    #[sea_orm(
        belongs_to = "admin_resource::Entity",
        from = "Column::ResourceId",
        to = "admin_resource::Column::ResourceId"
    )]
    Resource,
    #[sea_orm(
        belongs_to = "admin_principal::Entity",
        from = "Column::PrincipalId",
        to = "admin_principal::Column::PrincipalId"
    )]
    Principal,
}

impl Related<admin_permission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Permission.def()
    }
}

impl Related<admin_resource::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Resource.def()
    }
}

impl Related<admin_principal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Principal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
