//! Shared test utilities for planbook.
//!
//! Sets up an in-memory database and creates entities with sensible defaults.

use crate::{
    config::AppConfig,
    core::{
        account::{self, NewAccount},
        category,
        task::{self, NewTask},
        time::{Clock, LocalDateTime},
        transaction::{self, NewTransaction},
        user,
    },
    entities::{self, CategoryKind},
    errors::Result,
    web::AppState,
};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A Seoul clock frozen at 2024-03-18 10:00 local time.
#[allow(clippy::unwrap_used)]
pub fn test_clock() -> Clock {
    let at = Utc.with_ymd_and_hms(2024, 3, 18, 1, 0, 0).unwrap();
    Clock::frozen(chrono_tz::Asia::Seoul, at)
}

/// A local timestamp in the test clock's timezone.
#[allow(clippy::unwrap_used)]
pub fn local(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> LocalDateTime {
    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap();
    test_clock().make_aware(naive)
}

/// Creates a user.
pub async fn create_test_user(db: &DatabaseConnection, username: &str) -> Result<entities::user::Model> {
    user::create_user(db, username).await
}

/// Creates a cash account with a zero balance.
pub async fn create_test_account(
    db: &DatabaseConnection,
    owner_id: i64,
    name: &str,
) -> Result<entities::account::Model> {
    account::create_account(
        db,
        owner_id,
        NewAccount {
            name: name.to_string(),
            ..Default::default()
        },
    )
    .await
}

/// Creates a category of the given kind.
pub async fn create_test_category(
    db: &DatabaseConnection,
    owner_id: i64,
    name: &str,
    kind: CategoryKind,
) -> Result<entities::category::Model> {
    category::create_category(db, owner_id, name, kind).await
}

/// Creates a task with optional start and due timestamps and no tags.
pub async fn create_scheduled_task(
    db: &DatabaseConnection,
    owner_id: i64,
    title: &str,
    start: Option<LocalDateTime>,
    due: Option<LocalDateTime>,
) -> Result<entities::task::Model> {
    let created = task::create_task(
        db,
        owner_id,
        NewTask {
            title: title.to_string(),
            start_at: start.map(|t| t.to_utc()),
            due_at: due.map(|t| t.to_utc()),
            ..Default::default()
        },
    )
    .await?;
    Ok(created.task)
}

/// Creates a transaction with an empty memo.
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    owner_id: i64,
    account_id: i64,
    category_id: i64,
    task_id: Option<i64>,
    amount: Decimal,
    occurred: LocalDateTime,
) -> Result<entities::transaction::Model> {
    transaction::create_transaction(
        db,
        owner_id,
        NewTransaction {
            account_id,
            category_id,
            task_id,
            amount,
            memo: String::new(),
            occurred_at: occurred.to_utc(),
        },
    )
    .await
}

/// Web state over a fresh in-memory database with default configuration.
pub async fn test_app_state() -> Result<AppState> {
    let db = setup_test_db().await?;
    Ok(AppState::new(db, test_clock(), Arc::new(AppConfig::default())))
}
