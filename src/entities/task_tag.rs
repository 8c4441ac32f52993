//! Join table between tasks and tags.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Task/tag link
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "task_tags")]
pub struct Model {
    /// Linked task
    #[sea_orm(primary_key, auto_increment = false)]
    pub task_id: i64,
    /// Linked tag
    #[sea_orm(primary_key, auto_increment = false)]
    pub tag_id: i64,
}

/// Both sides cascade, so a link never outlives its task or tag
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The tagged task
    #[sea_orm(
        belongs_to = "super::task::Entity",
        from = "Column::TaskId",
        to = "super::task::Column::Id",
        on_delete = "Cascade"
    )]
    Task,
    /// The applied tag
    #[sea_orm(
        belongs_to = "super::tag::Entity",
        from = "Column::TagId",
        to = "super::tag::Column::Id",
        on_delete = "Cascade"
    )]
    Tag,
}

impl ActiveModelBehavior for ActiveModel {}
