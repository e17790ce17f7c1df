use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::admin_resource_type;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "adminresource")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub resource_id: i64,
    pub resource_type_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "admin_resource_type::Entity",
        from = "Column::ResourceTypeId",
        to = "admin_resource_type::Column::ResourceTypeId"
    )]
    ResourceType,
}

impl Related<admin_resource_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ResourceType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
