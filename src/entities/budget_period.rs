//! Budget period entity - a date range that budget limits apply to.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget period database model. `(owner_id, start_date, end_date)` is unique.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_periods")]
pub struct Model {
    /// Unique identifier for the period
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub owner_id: i64,
    /// First day covered
    pub start_date: Date,
    /// Last day covered
    pub end_date: Date,
}

/// Defines relationships between `BudgetPeriod` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each period belongs to one owner
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
    /// Per-category limits of this period
    #[sea_orm(has_many = "super::budget_item::Entity")]
    Items,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::budget_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
