use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::admin_principal_type;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "adminprincipal")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub principal_id: i64,
    pub principal_type_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "admin_principal_type::Entity",
        from = "Column::PrincipalTypeId",
        to = "admin_principal_type::Column::PrincipalTypeId"
    )]
    PrincipalType,
}

impl Related<admin_principal_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrincipalType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
