//! Task entity - a scheduled or unscheduled to-do item.
//!
//! Each task belongs to exactly one owner, may carry a start and a due
//! timestamp (stored in UTC), and is labelled with any number of global tags.
//! Transactions can point back at a task; the task never owns them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Task priority, ordered `Low < Medium < High`
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter,
    DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Can wait
    #[sea_orm(num_value = 1)]
    Low,
    /// Default priority
    #[default]
    #[sea_orm(num_value = 2)]
    Medium,
    /// Do first
    #[sea_orm(num_value = 3)]
    High,
}

/// Task progress
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    #[default]
    #[sea_orm(string_value = "todo")]
    Todo,
    /// Being worked on
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    /// Finished
    #[sea_orm(string_value = "done")]
    Done,
}

/// Task database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    /// Unique identifier for the task
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub owner_id: i64,
    /// Short title shown in lists and on the timeline
    pub title: String,
    /// Free-form notes, empty when not given
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Importance of the task
    pub priority: Priority,
    /// Progress of the task
    pub status: TaskStatus,
    /// When the task starts, if scheduled
    pub start_at: Option<DateTimeUtc>,
    /// When the task is due, if scheduled
    pub due_at: Option<DateTimeUtc>,
    /// Whether the task spans whole days rather than a time window
    pub is_all_day: bool,
    /// When the task was created
    pub created_at: DateTimeUtc,
    /// When the task was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Task and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each task belongs to one owner
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
    /// Transactions that reference this task
    #[sea_orm(has_many = "super::transaction::Entity")]
    LinkedTransactions,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LinkedTransactions.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::task_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::task_tag::Relation::Task.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
