//! Budget item entity - spending limit for one category within a period.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget item database model. `(period_id, category_id)` is unique.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Period this limit belongs to
    pub period_id: i64,
    /// Category being limited
    pub category_id: i64,
    /// Maximum amount for the period
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub limit_amount: Decimal,
}

/// Defines relationships between `BudgetItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning period
    #[sea_orm(
        belongs_to = "super::budget_period::Entity",
        from = "Column::PeriodId",
        to = "super::budget_period::Column::Id",
        on_delete = "Cascade"
    )]
    Period,
    /// Limited category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::budget_period::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Period.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
