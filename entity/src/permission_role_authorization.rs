use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{admin_permission, role_authorization};

/// Join table: which authorizations a permission grants.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "permission_roleauthorization")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub permission_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub authorization_id: String,
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
        belongs_to = "role_authorization::Entity",
        from = "Column::AuthorizationId",
        to = "role_authorization::Column::AuthorizationId"
    )]
    Authorization,
}

impl Related<admin_permission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Permission.def()
    }
}

impl Related<role_authorization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Authorization.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
