//! Tag entity - global labels shared by every user's tasks.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tag database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    /// Unique identifier for the tag
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, unique across the whole system
    #[sea_orm(unique)]
    pub name: String,
    /// Hex color such as `#888888`
    pub color: String,
}

/// Tags only relate to tasks, through `task_tags`
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        super::task_tag::Relation::Task.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::task_tag::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
