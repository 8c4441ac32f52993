//! Transaction business logic - owner-scoped bookings against accounts and categories.
//!
//! Every write checks that the referenced account, category and task belong to
//! the same owner as the transaction. Amounts are fixed-point with at most two
//! fractional digits; the sign is free so refunds and corrections can be booked.

use crate::{
    core::{account, category, day::sum_by_kind, task},
    entities::{Category, CategoryKind, Transaction, category as category_entity, transaction},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use std::{collections::BTreeMap, str::FromStr};

/// Largest number of fractional digits an amount may carry
pub const AMOUNT_SCALE: u32 = 2;

/// Input for creating a transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Account the money moved through
    pub account_id: i64,
    /// Category to file the booking under
    pub category_id: i64,
    /// Optional task link
    pub task_id: Option<i64>,
    /// Amount, at most two decimal places
    pub amount: Decimal,
    /// Short note
    pub memo: String,
    /// When the money moved
    pub occurred_at: DateTime<Utc>,
}

/// Partial update of a transaction; `created_at` is never touched
#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    /// New account
    pub account_id: Option<i64>,
    /// New category
    pub category_id: Option<i64>,
    /// New task link, or `Some(None)` to unlink
    pub task_id: Option<Option<i64>>,
    /// New amount
    pub amount: Option<Decimal>,
    /// New note
    pub memo: Option<String>,
    /// New occurrence time
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Rejects amounts with more than [`AMOUNT_SCALE`] fractional digits.
///
/// Trailing zeros do not count, so `12.500` is accepted as `12.50`.
pub fn check_amount(amount: Decimal) -> Result<Decimal> {
    let normalized = amount.normalize();
    if normalized.scale() > AMOUNT_SCALE {
        return Err(Error::InvalidAmount {
            value: amount.to_string(),
        });
    }
    Ok(normalized)
}

/// Parses a user-entered amount such as `"12000"` or `"4.50"`.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    let amount = Decimal::from_str(trimmed).map_err(|_| Error::InvalidAmount {
        value: trimmed.to_string(),
    })?;
    check_amount(amount)
}

async fn check_references<C>(
    db: &C,
    owner_id: i64,
    account_id: i64,
    category_id: i64,
    task_id: Option<i64>,
) -> Result<()>
where
    C: ConnectionTrait,
{
    account::require_account(db, owner_id, account_id).await?;
    category::require_category(db, owner_id, category_id).await?;
    if let Some(task_id) = task_id {
        task::get_owned_task(db, owner_id, task_id)
            .await?
            .ok_or(Error::NotFound {
                entity: "task",
                id: task_id,
            })?;
    }
    Ok(())
}

/// Inserts a transaction on an existing connection or database transaction.
pub async fn insert_transaction<C>(
    db: &C,
    owner_id: i64,
    input: NewTransaction,
) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    let amount = check_amount(input.amount)?;
    check_references(db, owner_id, input.account_id, input.category_id, input.task_id).await?;

    let model = transaction::ActiveModel {
        owner_id: Set(owner_id),
        account_id: Set(input.account_id),
        category_id: Set(input.category_id),
        task_id: Set(input.task_id),
        amount: Set(amount),
        memo: Set(input.memo.trim().to_string()),
        occurred_at: Set(input.occurred_at),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let result = model.insert(db).await?;
    tracing::info!(
        owner_id,
        transaction_id = result.id,
        amount = %result.amount,
        "Created transaction"
    );
    Ok(result)
}

/// Creates a transaction after checking the amount and every reference.
pub async fn create_transaction(
    db: &DatabaseConnection,
    owner_id: i64,
    input: NewTransaction,
) -> Result<transaction::Model> {
    check_amount(input.amount)?;

    let txn = db.begin().await?;
    let result = insert_transaction(&txn, owner_id, input).await?;
    txn.commit().await?;
    Ok(result)
}

/// Lists the owner's transactions, newest first, optionally limited to an
/// inclusive `occurred_at` range.
pub async fn list_transactions(
    db: &DatabaseConnection,
    owner_id: i64,
    range: Option<(DateTime<Utc>, DateTime<Utc>)>,
) -> Result<Vec<transaction::Model>> {
    let mut query = Transaction::find().filter(transaction::Column::OwnerId.eq(owner_id));
    if let Some((from, to)) = range {
        query = query.filter(transaction::Column::OccurredAt.between(from, to));
    }
    query
        .order_by_desc(transaction::Column::OccurredAt)
        .order_by_desc(transaction::Column::CreatedAt)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds one of the owner's transactions.
pub async fn get_transaction(
    db: &DatabaseConnection,
    owner_id: i64,
    transaction_id: i64,
) -> Result<Option<transaction::Model>> {
    Transaction::find_by_id(transaction_id)
        .filter(transaction::Column::OwnerId.eq(owner_id))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn require_transaction<C>(
    db: &C,
    owner_id: i64,
    transaction_id: i64,
) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    Transaction::find_by_id(transaction_id)
        .filter(transaction::Column::OwnerId.eq(owner_id))
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "transaction",
            id: transaction_id,
        })
}

/// Applies a partial update, re-checking every reference that ends up on the row.
pub async fn update_transaction(
    db: &DatabaseConnection,
    owner_id: i64,
    transaction_id: i64,
    changes: TransactionChanges,
) -> Result<transaction::Model> {
    let txn = db.begin().await?;
    let existing = require_transaction(&txn, owner_id, transaction_id).await?;

    let account_id = changes.account_id.unwrap_or(existing.account_id);
    let category_id = changes.category_id.unwrap_or(existing.category_id);
    let task_id = changes.task_id.unwrap_or(existing.task_id);
    check_references(&txn, owner_id, account_id, category_id, task_id).await?;

    let mut active: transaction::ActiveModel = existing.into();
    active.account_id = Set(account_id);
    active.category_id = Set(category_id);
    active.task_id = Set(task_id);
    if let Some(amount) = changes.amount {
        active.amount = Set(check_amount(amount)?);
    }
    if let Some(memo) = changes.memo {
        active.memo = Set(memo.trim().to_string());
    }
    if let Some(occurred_at) = changes.occurred_at {
        active.occurred_at = Set(occurred_at);
    }

    let updated = active.update(&txn).await?;
    txn.commit().await?;
    Ok(updated)
}

/// Deletes one of the owner's transactions.
pub async fn delete_transaction(
    db: &DatabaseConnection,
    owner_id: i64,
    transaction_id: i64,
) -> Result<()> {
    let existing = require_transaction(db, owner_id, transaction_id).await?;
    existing.delete(db).await?;
    tracing::info!(owner_id, transaction_id, "Deleted transaction");
    Ok(())
}

/// Sums the owner's transaction amounts per category kind, optionally within
/// an inclusive `occurred_at` range. Kinds without transactions are absent.
pub async fn totals_by_kind(
    db: &DatabaseConnection,
    owner_id: i64,
    range: Option<(DateTime<Utc>, DateTime<Utc>)>,
) -> Result<BTreeMap<CategoryKind, Decimal>> {
    let mut query = Transaction::find()
        .select_only()
        .column(category_entity::Column::Kind)
        .column(transaction::Column::Amount)
        .inner_join(Category)
        .filter(transaction::Column::OwnerId.eq(owner_id));
    if let Some((from, to)) = range {
        query = query.filter(transaction::Column::OccurredAt.between(from, to));
    }

    let rows: Vec<(CategoryKind, Decimal)> = query.into_tuple().all(db).await?;
    Ok(sum_by_kind(rows))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::PaginatorTrait;

    fn new_transaction(account_id: i64, category_id: i64, amount: Decimal) -> NewTransaction {
        NewTransaction {
            account_id,
            category_id,
            task_id: None,
            amount,
            memo: String::new(),
            occurred_at: local(2024, 3, 5, 12, 0).to_utc(),
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12000").unwrap(), Decimal::new(12_000, 0));
        assert_eq!(parse_amount(" 4.50 ").unwrap(), Decimal::new(45, 1));
        assert_eq!(parse_amount("-3.25").unwrap(), Decimal::new(-325, 2));
        assert_eq!(parse_amount("12.500").unwrap(), Decimal::new(125, 1));
        assert!(matches!(parse_amount("1.234"), Err(Error::InvalidAmount { .. })));
        assert!(matches!(parse_amount("abc"), Err(Error::InvalidAmount { .. })));
        assert!(matches!(parse_amount(""), Err(Error::InvalidAmount { .. })));
    }

    #[tokio::test]
    async fn test_create_transaction_rejects_scale_without_writing() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "alice").await?;
        let wallet = create_test_account(&db, owner.id, "Wallet").await?;
        let food = create_test_category(&db, owner.id, "Food", CategoryKind::Expense).await?;

        let result = create_transaction(
            &db,
            owner.id,
            new_transaction(wallet.id, food.id, Decimal::new(1, 3)),
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        assert_eq!(Transaction::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_transaction_checks_ownership() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;
        let wallet = create_test_account(&db, alice.id, "Wallet").await?;
        let food = create_test_category(&db, alice.id, "Food", CategoryKind::Expense).await?;
        let bobs_food = create_test_category(&db, bob.id, "Food", CategoryKind::Expense).await?;
        let bobs_task = create_scheduled_task(&db, bob.id, "Bob's", None, None).await?;

        let foreign_category =
            create_transaction(&db, alice.id, new_transaction(wallet.id, bobs_food.id, Decimal::ONE))
                .await;
        assert!(matches!(
            foreign_category,
            Err(Error::NotFound { entity: "category", .. })
        ));

        let mut with_task = new_transaction(wallet.id, food.id, Decimal::ONE);
        with_task.task_id = Some(bobs_task.id);
        assert!(matches!(
            create_transaction(&db, alice.id, with_task).await,
            Err(Error::NotFound { entity: "task", .. })
        ));

        assert!(list_transactions(&db, alice.id, None).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_and_update_transactions() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "alice").await?;
        let wallet = create_test_account(&db, owner.id, "Wallet").await?;
        let bank = create_test_account(&db, owner.id, "Bank").await?;
        let food = create_test_category(&db, owner.id, "Food", CategoryKind::Expense).await?;

        let early = create_test_transaction(
            &db,
            owner.id,
            wallet.id,
            food.id,
            None,
            Decimal::new(100, 2),
            local(2024, 3, 1, 9, 0),
        )
        .await?;
        let late = create_test_transaction(
            &db,
            owner.id,
            wallet.id,
            food.id,
            None,
            Decimal::new(200, 2),
            local(2024, 3, 9, 9, 0),
        )
        .await?;

        let ids: Vec<i64> = list_transactions(&db, owner.id, None)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![late.id, early.id]);

        let clock = test_clock();
        let march_first = clock.day_bounds(chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let ranged = list_transactions(&db, owner.id, Some(march_first)).await?;
        assert_eq!(ranged.len(), 1);
        assert_eq!(ranged[0].id, early.id);

        let updated = update_transaction(
            &db,
            owner.id,
            early.id,
            TransactionChanges {
                account_id: Some(bank.id),
                memo: Some(" moved ".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.account_id, bank.id);
        assert_eq!(updated.memo, "moved");
        assert_eq!(updated.created_at, early.created_at);
        assert_eq!(updated.amount, early.amount);

        delete_transaction(&db, owner.id, late.id).await?;
        assert!(get_transaction(&db, owner.id, late.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_totals_by_kind() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "alice").await?;
        let wallet = create_test_account(&db, owner.id, "Wallet").await?;
        let food = create_test_category(&db, owner.id, "Food", CategoryKind::Expense).await?;
        let salary = create_test_category(&db, owner.id, "Salary", CategoryKind::Income).await?;

        for (category_id, cents) in [(food.id, 1250), (food.id, 750), (salary.id, 300_000)] {
            create_test_transaction(
                &db,
                owner.id,
                wallet.id,
                category_id,
                None,
                Decimal::new(cents, 2),
                local(2024, 3, 5, 10, 0),
            )
            .await?;
        }

        let totals = totals_by_kind(&db, owner.id, None).await?;
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&CategoryKind::Expense], Decimal::new(20, 0));
        assert_eq!(totals[&CategoryKind::Income], Decimal::new(3000, 0));
        assert!(!totals.contains_key(&CategoryKind::Transfer));
        Ok(())
    }
}
