//! User entity - the owner identity every private row points at.
//!
//! Authentication itself happens in front of the service; this table only
//! maps a trusted username to the id used for owner scoping.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name supplied by the identity header
    #[sea_orm(unique)]
    pub username: String,
    /// When the user was provisioned
    pub created_at: DateTimeUtc,
}

/// A user owns every private row in the system
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user has many tasks
    #[sea_orm(has_many = "super::task::Entity")]
    Tasks,
    /// One user has many accounts
    #[sea_orm(has_many = "super::account::Entity")]
    Accounts,
    /// One user has many categories
    #[sea_orm(has_many = "super::category::Entity")]
    Categories,
    /// One user has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One user has many budget periods
    #[sea_orm(has_many = "super::budget_period::Entity")]
    BudgetPeriods,
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::budget_period::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetPeriods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
