//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod account;
pub mod budget_item;
pub mod budget_period;
pub mod category;
pub mod tag;
pub mod task;
pub mod task_tag;
pub mod transaction;
pub mod user;

// Re-export specific types to avoid conflicts
pub use account::{AccountType, Column as AccountColumn, Entity as Account, Model as AccountModel};
pub use budget_item::{
    Column as BudgetItemColumn, Entity as BudgetItem, Model as BudgetItemModel,
};
pub use budget_period::{
    Column as BudgetPeriodColumn, Entity as BudgetPeriod, Model as BudgetPeriodModel,
};
pub use category::{
    CategoryKind, Column as CategoryColumn, Entity as Category, Model as CategoryModel,
};
pub use tag::{Column as TagColumn, Entity as Tag, Model as TagModel};
pub use task::{Column as TaskColumn, Entity as Task, Model as TaskModel, Priority, TaskStatus};
pub use task_tag::{Column as TaskTagColumn, Entity as TaskTag, Model as TaskTagModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
