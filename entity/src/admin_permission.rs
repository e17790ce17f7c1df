use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "adminpermission")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub permission_id: i64,
    pub permission_name: String,
    pub resource_type_id: i32,
    pub permission_label: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
