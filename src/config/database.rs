//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema (including the foreign key
//! actions that implement cascade, protect and set-null deletion) always
//! matches the Rust structs. Composite unique constraints cannot be expressed on
//! the entities and are created here as unique indexes.

use crate::entities::{
    Account, AccountColumn, BudgetItem, BudgetItemColumn, BudgetPeriod, BudgetPeriodColumn,
    Category, CategoryColumn, Tag, Task, TaskTag, Transaction, User,
};
use crate::errors::Result;
use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::info;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/planbook.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    info!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables and unique indexes if they do not exist yet.
///
/// Tables are created parents first so every foreign key target exists.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    create_table(db, User).await?;
    create_table(db, Tag).await?;
    create_table(db, Task).await?;
    create_table(db, TaskTag).await?;
    create_table(db, Account).await?;
    create_table(db, Category).await?;
    create_table(db, Transaction).await?;
    create_table(db, BudgetPeriod).await?;
    create_table(db, BudgetItem).await?;

    let builder = db.get_database_backend();
    for index in unique_indexes() {
        db.execute(builder.build(&index)).await?;
    }

    Ok(())
}

async fn create_table<C, E>(db: &C, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

fn unique_indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("uq_accounts_owner_name")
            .table(Account)
            .col(AccountColumn::OwnerId)
            .col(AccountColumn::Name)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uq_categories_owner_name_kind")
            .table(Category)
            .col(CategoryColumn::OwnerId)
            .col(CategoryColumn::Name)
            .col(CategoryColumn::Kind)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uq_budget_periods_owner_range")
            .table(BudgetPeriod)
            .col(BudgetPeriodColumn::OwnerId)
            .col(BudgetPeriodColumn::StartDate)
            .col(BudgetPeriodColumn::EndDate)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uq_budget_items_period_category")
            .table(BudgetItem)
            .col(BudgetItemColumn::PeriodId)
            .col(BudgetItemColumn::CategoryId)
            .unique()
            .if_not_exists()
            .to_owned(),
    ]
}
