use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::clusters;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "viewinstance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub view_instance_id: i64,
    pub view_name: String,
    pub name: String,
    pub resource_id: i64,
    /// Owning cluster; `None` for views that stand alone.
    pub cluster_handle: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "clusters::Entity",
        from = "Column::ClusterHandle",
        to = "clusters::Column::ClusterId"
    )]
    Cluster,
}

impl Related<clusters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cluster.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
