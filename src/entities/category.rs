//! Category entity - classifies transactions as expense, income or transfer.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category kind, used to group transactions for totals
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, DeriveActiveEnum,
    Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Money going out
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Money coming in
    #[sea_orm(string_value = "income")]
    Income,
    /// Money moving between accounts
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

impl CategoryKind {
    /// Stored string form of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
            Self::Transfer => "transfer",
        }
    }
}

/// Category database model. `(owner_id, name, kind)` is unique.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub owner_id: i64,
    /// Display name
    pub name: String,
    /// Expense, income or transfer
    pub kind: CategoryKind,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each category belongs to one owner
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
    /// Transactions filed under this category
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// Budget limits set for this category
    #[sea_orm(has_many = "super::budget_item::Entity")]
    BudgetItems,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::budget_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
