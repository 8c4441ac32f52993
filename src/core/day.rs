//! Day context - everything the planner shows for one selected date.
//!
//! Loads the owner's tasks that start or are due on the day together with
//! their linked transactions, the day's transactions, and the data needed by
//! the create forms. All related rows are fetched in batches, never one query
//! per item, and every timestamp handed out is already localized.

use crate::{
    core::{
        account,
        category,
        time::{Clock, LocalDateTime},
    },
    entities::{
        Account, Category, CategoryKind, Task, Transaction, account as account_entity,
        category as category_entity, task, transaction,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{Condition, LoaderTrait, QueryOrder, prelude::*};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// A transaction with its account, category and task attached
#[derive(Debug, Clone, Serialize)]
pub struct TransactionDetail {
    /// The stored transaction
    pub transaction: transaction::Model,
    /// `occurred_at` in local time
    pub occurred_local: LocalDateTime,
    /// Account the money moved through
    pub account: account_entity::Model,
    /// Category the booking is filed under
    pub category: category_entity::Model,
    /// Linked task, if any
    pub task: Option<task::Model>,
}

/// A task of the selected day with its localized window and transactions
#[derive(Debug, Clone, Serialize)]
pub struct TaskEntry {
    /// The stored task
    pub task: task::Model,
    /// Start in local time
    pub start_local: Option<LocalDateTime>,
    /// Due in local time
    pub end_local: Option<LocalDateTime>,
    /// Transactions linked to the task, oldest first
    pub transactions: Vec<TransactionDetail>,
}

impl TaskEntry {
    /// A task is timed when it has a local start or due timestamp.
    #[must_use]
    pub const fn is_timed(&self) -> bool {
        self.start_local.is_some() || self.end_local.is_some()
    }
}

/// Aggregate view-state for one day
#[derive(Debug, Clone, Serialize)]
pub struct DayContext {
    /// The day being shown
    pub selected_date: NaiveDate,
    /// Tasks with a start or due timestamp, ordered by start, due, title
    pub timed_tasks: Vec<TaskEntry>,
    /// Tasks without any timestamp
    pub untimed_tasks: Vec<TaskEntry>,
    /// Every transaction of the day, oldest first
    pub transactions: Vec<TransactionDetail>,
    /// Transactions of the day that are not linked to a task
    pub loose_transactions: Vec<TransactionDetail>,
    /// Sum of amounts per category kind; kinds without transactions are absent
    pub daily_totals: BTreeMap<CategoryKind, Decimal>,
    /// The owner's accounts, for the create forms
    pub accounts: Vec<account_entity::Model>,
    /// The owner's expense categories, for the create forms
    pub categories: Vec<category_entity::Model>,
}

/// Sums amounts per category kind. Only kinds that occur appear in the result.
pub fn sum_by_kind<I>(rows: I) -> BTreeMap<CategoryKind, Decimal>
where
    I: IntoIterator<Item = (CategoryKind, Decimal)>,
{
    rows.into_iter()
        .fold(BTreeMap::new(), |mut totals, (kind, amount)| {
            *totals.entry(kind).or_insert(Decimal::ZERO) += amount;
            totals
        })
}

/// Splits entries into `(timed, untimed)`, preserving order.
#[must_use]
pub fn partition_tasks(entries: Vec<TaskEntry>) -> (Vec<TaskEntry>, Vec<TaskEntry>) {
    entries.into_iter().partition(TaskEntry::is_timed)
}

/// Attaches accounts, categories and tasks to transactions with one query per
/// related table.
pub async fn attach_details<C>(
    db: &C,
    clock: &Clock,
    transactions: Vec<transaction::Model>,
) -> Result<Vec<TransactionDetail>>
where
    C: ConnectionTrait,
{
    if transactions.is_empty() {
        return Ok(Vec::new());
    }

    let account_ids: HashSet<i64> = transactions.iter().map(|t| t.account_id).collect();
    let category_ids: HashSet<i64> = transactions.iter().map(|t| t.category_id).collect();
    let task_ids: HashSet<i64> = transactions.iter().filter_map(|t| t.task_id).collect();

    let accounts: HashMap<i64, account_entity::Model> = Account::find()
        .filter(account_entity::Column::Id.is_in(account_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();
    let categories: HashMap<i64, category_entity::Model> = Category::find()
        .filter(category_entity::Column::Id.is_in(category_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let tasks: HashMap<i64, task::Model> = if task_ids.is_empty() {
        HashMap::new()
    } else {
        Task::find()
            .filter(task::Column::Id.is_in(task_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect()
    };

    transactions
        .into_iter()
        .map(|tx| -> Result<TransactionDetail> {
            let account = accounts.get(&tx.account_id).cloned().ok_or(Error::NotFound {
                entity: "account",
                id: tx.account_id,
            })?;
            let category = categories.get(&tx.category_id).cloned().ok_or(Error::NotFound {
                entity: "category",
                id: tx.category_id,
            })?;
            let task = tx.task_id.and_then(|id| tasks.get(&id).cloned());
            Ok(TransactionDetail {
                occurred_local: clock.localize(tx.occurred_at),
                transaction: tx,
                account,
                category,
                task,
            })
        })
        .collect()
}

/// Loads the owner's tasks whose local start or due date is `date`, each with
/// its linked transactions attached.
pub async fn load_day_tasks(
    db: &DatabaseConnection,
    clock: &Clock,
    owner_id: i64,
    date: NaiveDate,
) -> Result<Vec<TaskEntry>> {
    let (day_start, day_end) = clock.day_bounds(date);

    let tasks = Task::find()
        .filter(task::Column::OwnerId.eq(owner_id))
        .filter(
            Condition::any()
                .add(task::Column::StartAt.between(day_start, day_end))
                .add(task::Column::DueAt.between(day_start, day_end)),
        )
        .order_by_asc(task::Column::StartAt)
        .order_by_asc(task::Column::DueAt)
        .order_by_asc(task::Column::Title)
        .all(db)
        .await?;

    let linked: Vec<Vec<transaction::Model>> = tasks.load_many(Transaction, db).await?;
    let group_sizes: Vec<usize> = linked.iter().map(Vec::len).collect();
    let mut details = attach_details(db, clock, linked.into_iter().flatten().collect())
        .await?
        .into_iter();

    let entries = tasks
        .into_iter()
        .zip(group_sizes)
        .map(|(task, size)| {
            let mut transactions: Vec<TransactionDetail> = details.by_ref().take(size).collect();
            transactions.sort_by_key(|d| (d.transaction.occurred_at, d.transaction.id));
            TaskEntry {
                start_local: clock.localize_opt(task.start_at),
                end_local: clock.localize_opt(task.due_at),
                task,
                transactions,
            }
        })
        .collect();

    Ok(entries)
}

/// Loads the owner's transactions that occurred during the local day `date`.
pub async fn load_day_transactions(
    db: &DatabaseConnection,
    clock: &Clock,
    owner_id: i64,
    date: NaiveDate,
) -> Result<Vec<TransactionDetail>> {
    let (day_start, day_end) = clock.day_bounds(date);

    let transactions = Transaction::find()
        .filter(transaction::Column::OwnerId.eq(owner_id))
        .filter(transaction::Column::OccurredAt.between(day_start, day_end))
        .order_by_asc(transaction::Column::OccurredAt)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await?;

    attach_details(db, clock, transactions).await
}

/// Builds the full view-state for `date`.
#[tracing::instrument(skip(db, clock))]
pub async fn build_day_context(
    db: &DatabaseConnection,
    clock: &Clock,
    owner_id: i64,
    date: NaiveDate,
) -> Result<DayContext> {
    let entries = load_day_tasks(db, clock, owner_id, date).await?;
    let transactions = load_day_transactions(db, clock, owner_id, date).await?;

    let (timed_tasks, untimed_tasks) = partition_tasks(entries);
    let loose_transactions: Vec<TransactionDetail> = transactions
        .iter()
        .filter(|d| d.transaction.task_id.is_none())
        .cloned()
        .collect();
    let daily_totals = sum_by_kind(
        transactions
            .iter()
            .map(|d| (d.category.kind, d.transaction.amount)),
    );

    let accounts = account::list_accounts(db, owner_id).await?;
    let categories = category::list_categories(db, owner_id, Some(CategoryKind::Expense)).await?;

    tracing::debug!(
        timed = timed_tasks.len(),
        untimed = untimed_tasks.len(),
        transactions = transactions.len(),
        "Built day context"
    );

    Ok(DayContext {
        selected_date: date,
        timed_tasks,
        untimed_tasks,
        transactions,
        loose_transactions,
        daily_totals,
        accounts,
        categories,
    })
}
