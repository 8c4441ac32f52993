//! Account entity - where money sits (wallet, bank account, card).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of account
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Physical cash
    #[default]
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Bank account
    #[sea_orm(string_value = "bank")]
    Bank,
    /// Credit or debit card
    #[sea_orm(string_value = "card")]
    Card,
    /// Anything else
    #[sea_orm(string_value = "other")]
    Other,
}

/// Account database model. `(owner_id, name)` is unique.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub owner_id: i64,
    /// Name, unique per owner
    pub name: String,
    /// Kind of account
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Recorded balance
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub balance: Decimal,
}

/// Defines relationships between Account and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each account belongs to one owner
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
    /// Transactions booked against this account
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
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

impl ActiveModelBehavior for ActiveModel {}
