//! Planner form processing and page assembly.
//!
//! A POST to a planner page carries a `form_type` discriminator and is decoded
//! into a [`PlannerSubmission`]. Processing either rejects the submission with
//! a list of [`FormError`]s and writes nothing, or performs every write in a
//! single database transaction and answers with a redirect target.

use crate::{
    core::{
        account, calendar,
        calendar::CalendarMonth,
        category,
        day::{self, DayContext},
        task::{self, NewTask},
        time::{
            Clock, LOOSE_TRANSACTION_FALLBACK, SCHEDULE_END_FALLBACK, SCHEDULE_START_FALLBACK,
        },
        transaction::{self, NewTransaction},
    },
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use std::collections::HashMap;

/// Form field naming the submission kind
pub const FORM_TYPE_FIELD: &str = "form_type";

/// Money fields shared by both submission kinds. Blank inputs are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentFields {
    /// Raw amount, e.g. `"12.50"`
    pub amount: Option<String>,
    /// Raw account id
    pub account: Option<String>,
    /// Raw category id
    pub category: Option<String>,
    /// Note, trimmed
    pub memo: String,
}

/// A task for the selected day, optionally paid for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleEntry {
    /// Task title, trimmed
    pub title: String,
    /// Task notes, trimmed
    pub description: String,
    /// Raw `HH:MM` start
    pub start_time: Option<String>,
    /// Raw `HH:MM` end
    pub end_time: Option<String>,
    /// Optional linked transaction
    pub payment: PaymentFields,
}

/// A transaction on the selected day without a task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LooseTransaction {
    /// Raw `HH:MM` time of the payment
    pub occurred_time: Option<String>,
    /// The transaction itself
    pub payment: PaymentFields,
}

/// A decoded planner form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerSubmission {
    /// `form_type=schedule_entry`
    ScheduleEntry(ScheduleEntry),
    /// `form_type=loose_transaction`
    LooseTransaction(LooseTransaction),
}

fn field(fields: &HashMap<String, String>, name: &str) -> Option<String> {
    fields
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn text(fields: &HashMap<String, String>, name: &str) -> String {
    field(fields, name).unwrap_or_default()
}

impl PaymentFields {
    fn from_fields(fields: &HashMap<String, String>) -> Self {
        Self {
            amount: field(fields, "amount"),
            account: field(fields, "account"),
            category: field(fields, "category"),
            memo: text(fields, "memo"),
        }
    }
}

impl PlannerSubmission {
    /// Decodes posted form fields. An absent or unknown `form_type` yields `None`.
    #[must_use]
    pub fn from_fields(fields: &HashMap<String, String>) -> Option<Self> {
        match fields.get(FORM_TYPE_FIELD).map(|s| s.trim()) {
            Some("schedule_entry") => Some(Self::ScheduleEntry(ScheduleEntry {
                title: text(fields, "title"),
                description: text(fields, "description"),
                start_time: field(fields, "start_time"),
                end_time: field(fields, "end_time"),
                payment: PaymentFields::from_fields(fields),
            })),
            Some("loose_transaction") => Some(Self::LooseTransaction(LooseTransaction {
                occurred_time: field(fields, "occurred_time"),
                payment: PaymentFields::from_fields(fields),
            })),
            _ => None,
        }
    }
}

/// Reasons a planner submission is rejected, worded for the page
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// Schedule entry without a title
    #[error("일정 제목을 입력해주세요.")]
    MissingTitle,
    /// Schedule entry without a start time
    #[error("시작 시간을 입력해주세요.")]
    MissingStartTime,
    /// Schedule entry with an amount but no account or category
    #[error("금액을 입력했다면 계정과 분류도 선택해주세요.")]
    IncompletePayment,
    /// Loose transaction without a time
    #[error("소비 시간을 입력해주세요.")]
    MissingOccurredTime,
    /// Loose transaction missing the account, category or amount
    #[error("계정, 분류, 금액을 모두 입력해주세요.")]
    IncompleteTransaction,
    /// Time not in `HH:MM` form
    #[error("시간 형식이 올바르지 않습니다: {0}")]
    InvalidTime(String),
    /// Amount not a number with at most two decimal places
    #[error("금액 형식이 올바르지 않습니다: {0}")]
    InvalidAmount(String),
    /// Account id unknown or owned by someone else
    #[error("선택한 계정을 찾을 수 없습니다.")]
    UnknownAccount,
    /// Category id unknown or owned by someone else
    #[error("선택한 분류를 찾을 수 없습니다.")]
    UnknownCategory,
}

/// Result of processing one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Nothing was submitted; render the page as is
    NoAction,
    /// Everything was written; redirect to this location
    Redirect(String),
    /// Nothing was written; render the page with these errors
    Rejected(Vec<FormError>),
}

/// Money part of a submission after validation
#[derive(Debug, Clone)]
struct ValidPayment {
    account_id: i64,
    category_id: i64,
    amount: Decimal,
    memo: String,
}

/// The writes a valid submission performs
#[derive(Debug, Clone)]
enum PlannedWrite {
    Schedule {
        task: NewTask,
        payment: Option<ValidPayment>,
    },
    Loose {
        payment: ValidPayment,
        occurred_at: DateTime<Utc>,
    },
}

type Validated = std::result::Result<PlannedWrite, Vec<FormError>>;

/// Redirect target after a successful submission.
#[must_use]
pub fn success_location(base_path: &str, selected_date: NaiveDate) -> String {
    format!("{base_path}?date={}", selected_date.format("%Y-%m-%d"))
}

fn time_error(err: Error) -> Result<FormError> {
    match err {
        Error::InvalidTime { value } => Ok(FormError::InvalidTime(value)),
        other => Err(other),
    }
}

/// Resolves the account, category and amount of a complete payment,
/// collecting problems into `errors`.
async fn resolve_payment(
    db: &DatabaseConnection,
    owner_id: i64,
    account_raw: &str,
    category_raw: &str,
    amount_raw: &str,
    memo: &str,
    errors: &mut Vec<FormError>,
) -> Result<Option<ValidPayment>> {
    let amount = match transaction::parse_amount(amount_raw) {
        Ok(amount) => Some(amount),
        Err(Error::InvalidAmount { value }) => {
            errors.push(FormError::InvalidAmount(value));
            None
        }
        Err(other) => return Err(other),
    };

    let account_id = match account_raw.parse::<i64>() {
        Ok(id) => account::get_account(db, owner_id, id).await?.map(|a| a.id),
        Err(_) => None,
    };
    if account_id.is_none() {
        errors.push(FormError::UnknownAccount);
    }

    let category_id = match category_raw.parse::<i64>() {
        Ok(id) => category::get_category(db, owner_id, id).await?.map(|c| c.id),
        Err(_) => None,
    };
    if category_id.is_none() {
        errors.push(FormError::UnknownCategory);
    }

    Ok(match (account_id, category_id, amount) {
        (Some(account_id), Some(category_id), Some(amount)) => Some(ValidPayment {
            account_id,
            category_id,
            amount,
            memo: memo.to_string(),
        }),
        _ => None,
    })
}

async fn validate_schedule_entry(
    db: &DatabaseConnection,
    clock: &Clock,
    owner_id: i64,
    selected_date: NaiveDate,
    entry: &ScheduleEntry,
) -> Result<Validated> {
    let mut errors = Vec::new();

    if entry.title.is_empty() {
        errors.push(FormError::MissingTitle);
    }
    if entry.start_time.is_none() {
        errors.push(FormError::MissingStartTime);
    }

    let start_at = match clock.combine_with_date(
        selected_date,
        entry.start_time.as_deref(),
        SCHEDULE_START_FALLBACK,
    ) {
        Ok(at) => Some(at),
        Err(err) => {
            errors.push(time_error(err)?);
            None
        }
    };
    let due_at = match (&entry.end_time, start_at) {
        (Some(end_time), _) => {
            match clock.combine_with_date(selected_date, Some(end_time), SCHEDULE_END_FALLBACK) {
                Ok(at) => Some(at),
                Err(err) => {
                    errors.push(time_error(err)?);
                    None
                }
            }
        }
        (None, Some(start_at)) => Some(start_at + TimeDelta::hours(1)),
        (None, None) => None,
    };

    let payment = match (&entry.payment.amount, &entry.payment.account, &entry.payment.category) {
        (None, _, _) => None,
        (Some(amount), Some(account), Some(category)) => {
            resolve_payment(
                db,
                owner_id,
                account,
                category,
                amount,
                &entry.payment.memo,
                &mut errors,
            )
            .await?
        }
        (Some(_), _, _) => {
            errors.push(FormError::IncompletePayment);
            None
        }
    };

    if !errors.is_empty() {
        return Ok(Err(errors));
    }
    let (Some(start_at), Some(due_at)) = (start_at, due_at) else {
        return Ok(Err(vec![FormError::MissingStartTime]));
    };

    Ok(Ok(PlannedWrite::Schedule {
        task: NewTask {
            title: entry.title.clone(),
            description: entry.description.clone(),
            start_at: Some(start_at.to_utc()),
            due_at: Some(due_at.to_utc()),
            is_all_day: false,
            ..Default::default()
        },
        payment,
    }))
}

async fn validate_loose_transaction(
    db: &DatabaseConnection,
    clock: &Clock,
    owner_id: i64,
    selected_date: NaiveDate,
    loose: &LooseTransaction,
) -> Result<Validated> {
    let mut errors = Vec::new();

    if loose.occurred_time.is_none() {
        errors.push(FormError::MissingOccurredTime);
    }
    let occurred_at = match clock.combine_with_date(
        selected_date,
        loose.occurred_time.as_deref(),
        LOOSE_TRANSACTION_FALLBACK,
    ) {
        Ok(at) => Some(at),
        Err(err) => {
            errors.push(time_error(err)?);
            None
        }
    };

    let payment = match (&loose.payment.account, &loose.payment.category, &loose.payment.amount) {
        (Some(account), Some(category), Some(amount)) => {
            resolve_payment(
                db,
                owner_id,
                account,
                category,
                amount,
                &loose.payment.memo,
                &mut errors,
            )
            .await?
        }
        _ => {
            errors.push(FormError::IncompleteTransaction);
            None
        }
    };

    match (errors.is_empty(), payment, occurred_at) {
        (true, Some(payment), Some(occurred_at)) => Ok(Ok(PlannedWrite::Loose {
            payment,
            occurred_at: occurred_at.to_utc(),
        })),
        _ => Ok(Err(errors)),
    }
}

async fn apply(db: &DatabaseConnection, owner_id: i64, plan: PlannedWrite) -> Result<()> {
    let txn = db.begin().await?;

    match plan {
        PlannedWrite::Schedule { task, payment } => {
            let occurred_at = task.start_at.unwrap_or_else(Utc::now);
            let created = task::insert_task(&txn, owner_id, task).await?;
            if let Some(payment) = payment {
                transaction::insert_transaction(
                    &txn,
                    owner_id,
                    NewTransaction {
                        account_id: payment.account_id,
                        category_id: payment.category_id,
                        task_id: Some(created.id),
                        amount: payment.amount,
                        memo: payment.memo,
                        occurred_at,
                    },
                )
                .await?;
            }
        }
        PlannedWrite::Loose {
            payment,
            occurred_at,
        } => {
            transaction::insert_transaction(
                &txn,
                owner_id,
                NewTransaction {
                    account_id: payment.account_id,
                    category_id: payment.category_id,
                    task_id: None,
                    amount: payment.amount,
                    memo: payment.memo,
                    occurred_at,
                },
            )
            .await?;
        }
    }

    txn.commit().await?;
    Ok(())
}

/// Validates a submission and, when it is valid, performs its writes atomically.
///
/// `None` means nothing was submitted (a read request or an unknown form kind).
#[tracing::instrument(skip(db, clock, submission))]
pub async fn process_submission(
    db: &DatabaseConnection,
    clock: &Clock,
    owner_id: i64,
    selected_date: NaiveDate,
    submission: Option<&PlannerSubmission>,
    success_base_path: &str,
) -> Result<FormOutcome> {
    let Some(submission) = submission else {
        return Ok(FormOutcome::NoAction);
    };

    let validated = match submission {
        PlannerSubmission::ScheduleEntry(entry) => {
            validate_schedule_entry(db, clock, owner_id, selected_date, entry).await?
        }
        PlannerSubmission::LooseTransaction(loose) => {
            validate_loose_transaction(db, clock, owner_id, selected_date, loose).await?
        }
    };

    match validated {
        Ok(plan) => {
            apply(db, owner_id, plan).await?;
            tracing::info!(owner_id, %selected_date, "Planner submission saved");
            Ok(FormOutcome::Redirect(success_location(success_base_path, selected_date)))
        }
        Err(errors) => {
            tracing::debug!(owner_id, errors = errors.len(), "Planner submission rejected");
            Ok(FormOutcome::Rejected(errors))
        }
    }
}

/// Everything a planner page renders
#[derive(Debug, Clone, Serialize)]
pub struct PlannerView {
    /// The selected day
    pub day: DayContext,
    /// Month grid, dashboard only
    pub calendar: Option<CalendarMonth>,
    /// Messages from a rejected submission
    pub form_errors: Vec<String>,
}

/// Assembles the page state for `selected_date`.
pub async fn build_planner_view(
    db: &DatabaseConnection,
    clock: &Clock,
    owner_id: i64,
    selected_date: NaiveDate,
    form_errors: &[FormError],
    include_calendar: bool,
) -> Result<PlannerView> {
    let day = day::build_day_context(db, clock, owner_id, selected_date).await?;
    let calendar = if include_calendar {
        Some(calendar::load_calendar(db, clock, owner_id, selected_date).await?)
    } else {
        None
    };

    Ok(PlannerView {
        day,
        calendar,
        form_errors: form_errors.iter().map(ToString::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{CategoryKind, Task, Transaction};
    use crate::test_utils::*;
    use chrono::Timelike;
    use sea_orm::{EntityTrait, PaginatorTrait};

    const BASE: &str = "/planner/";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    async fn submit(
        db: &DatabaseConnection,
        owner_id: i64,
        selected: NaiveDate,
        pairs: &[(&str, &str)],
    ) -> Result<FormOutcome> {
        let submission = PlannerSubmission::from_fields(&form(pairs));
        process_submission(db, &test_clock(), owner_id, selected, submission.as_ref(), BASE).await
    }

    #[test]
    fn test_from_fields_dispatch() {
        assert_eq!(PlannerSubmission::from_fields(&form(&[("title", "x")])), None);
        assert_eq!(
            PlannerSubmission::from_fields(&form(&[("form_type", "bogus")])),
            None
        );

        let decoded = PlannerSubmission::from_fields(&form(&[
            ("form_type", "schedule_entry"),
            ("title", "  Standup "),
            ("start_time", "09:00"),
            ("end_time", " "),
            ("amount", ""),
        ]))
        .unwrap();
        let PlannerSubmission::ScheduleEntry(entry) = decoded else {
            panic!("expected a schedule entry");
        };
        assert_eq!(entry.title, "Standup");
        assert_eq!(entry.start_time.as_deref(), Some("09:00"));
        assert_eq!(entry.end_time, None);
        assert_eq!(entry.payment.amount, None);
    }

    #[test]
    fn test_form_error_messages() {
        assert_eq!(FormError::MissingTitle.to_string(), "일정 제목을 입력해주세요.");
        assert_eq!(
            FormError::IncompleteTransaction.to_string(),
            "계정, 분류, 금액을 모두 입력해주세요."
        );
    }

    #[tokio::test]
    async fn test_no_submission_is_no_action() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "alice").await?;
        let outcome = submit(&db, owner.id, date(2024, 3, 5), &[("form_type", "other")]).await?;
        assert_eq!(outcome, FormOutcome::NoAction);
        Ok(())
    }

    #[tokio::test]
    async fn test_schedule_entry_defaults_end_to_one_hour_later() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "alice").await?;

        let outcome = submit(
            &db,
            owner.id,
            date(2024, 3, 5),
            &[
                ("form_type", "schedule_entry"),
                ("title", "Standup"),
                ("start_time", "09:00"),
            ],
        )
        .await?;
        assert_eq!(outcome, FormOutcome::Redirect("/planner/?date=2024-03-05".to_string()));

        let task = Task::find().one(&db).await?.unwrap();
        assert_eq!(task.title, "Standup");
        assert!(!task.is_all_day);
        let start = task.start_at.unwrap();
        assert_eq!(task.due_at.unwrap() - start, TimeDelta::hours(1));
        assert_eq!(test_clock().localize(start), local(2024, 3, 5, 9, 0));
        assert_eq!(Transaction::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_schedule_entry_with_payment_links_transaction() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "alice").await?;
        let wallet = create_test_account(&db, owner.id, "Wallet").await?;
        let food = create_test_category(&db, owner.id, "Food", CategoryKind::Expense).await?;

        let outcome = submit(
            &db,
            owner.id,
            date(2024, 3, 5),
            &[
                ("form_type", "schedule_entry"),
                ("title", "Lunch"),
                ("description", "with team"),
                ("start_time", "12:00"),
                ("end_time", "13:30"),
                ("amount", "15000"),
                ("account", &wallet.id.to_string()),
                ("category", &food.id.to_string()),
                ("memo", "noodles"),
            ],
        )
        .await?;
        assert!(matches!(outcome, FormOutcome::Redirect(_)));

        let task = Task::find().one(&db).await?.unwrap();
        let tx = Transaction::find().one(&db).await?.unwrap();
        assert_eq!(tx.task_id, Some(task.id));
        assert_eq!(tx.occurred_at, task.start_at.unwrap());
        assert_eq!(tx.amount, Decimal::new(15_000, 0));
        assert_eq!(tx.memo, "noodles");
        assert_eq!(test_clock().localize(task.due_at.unwrap()).minute(), 30);
        Ok(())
    }

    #[tokio::test]
    async fn test_schedule_entry_amount_without_category_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let clock = test_clock();
        let owner = create_test_user(&db, "alice").await?;
        let wallet = create_test_account(&db, owner.id, "Wallet").await?;

        let outcome = submit(
            &db,
            owner.id,
            date(2024, 3, 5),
            &[
                ("form_type", "schedule_entry"),
                ("title", "Dinner"),
                ("start_time", "19:00"),
                ("amount", "20000"),
                ("account", &wallet.id.to_string()),
            ],
        )
        .await?;

        assert_eq!(outcome, FormOutcome::Rejected(vec![FormError::IncompletePayment]));
        assert_eq!(Task::find().count(&db).await?, 0);
        assert_eq!(Transaction::find().count(&db).await?, 0);

        let view = build_planner_view(&db, &clock, owner.id, date(2024, 3, 5), &[], false).await?;
        assert!(view.day.timed_tasks.is_empty());
        assert!(view.day.untimed_tasks.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_schedule_entry_collects_missing_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "alice").await?;

        let outcome =
            submit(&db, owner.id, date(2024, 3, 5), &[("form_type", "schedule_entry")]).await?;
        assert_eq!(
            outcome,
            FormOutcome::Rejected(vec![FormError::MissingTitle, FormError::MissingStartTime])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_time_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "alice").await?;

        let outcome = submit(
            &db,
            owner.id,
            date(2024, 3, 5),
            &[
                ("form_type", "schedule_entry"),
                ("title", "Standup"),
                ("start_time", "9am"),
            ],
        )
        .await?;
        assert_eq!(
            outcome,
            FormOutcome::Rejected(vec![FormError::InvalidTime("9am".to_string())])
        );
        assert_eq!(Task::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_loose_transaction_on_selected_day() -> Result<()> {
        let db = setup_test_db().await?;
        let clock = test_clock();
        let owner = create_test_user(&db, "alice").await?;
        let wallet = create_test_account(&db, owner.id, "Wallet").await?;
        let food = create_test_category(&db, owner.id, "Food", CategoryKind::Expense).await?;

        let outcome = submit(
            &db,
            owner.id,
            date(2024, 3, 5),
            &[
                ("form_type", "loose_transaction"),
                ("account", &wallet.id.to_string()),
                ("category", &food.id.to_string()),
                ("amount", "12.50"),
                ("occurred_time", "14:30"),
            ],
        )
        .await?;
        assert_eq!(outcome, FormOutcome::Redirect("/planner/?date=2024-03-05".to_string()));

        let tx = Transaction::find().one(&db).await?.unwrap();
        assert_eq!(tx.task_id, None);
        assert_eq!(clock.localize(tx.occurred_at), local(2024, 3, 5, 14, 30));

        let view = build_planner_view(&db, &clock, owner.id, date(2024, 3, 5), &[], true).await?;
        assert_eq!(view.day.loose_transactions.len(), 1);
        assert_eq!(view.day.loose_transactions[0].transaction.id, tx.id);
        assert_eq!(view.day.daily_totals[&CategoryKind::Expense], Decimal::new(1250, 2));
        assert!(view.calendar.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_loose_transaction_requires_everything() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "alice").await?;

        let outcome = submit(
            &db,
            owner.id,
            date(2024, 3, 5),
            &[("form_type", "loose_transaction"), ("amount", "100")],
        )
        .await?;
        assert_eq!(
            outcome,
            FormOutcome::Rejected(vec![
                FormError::MissingOccurredTime,
                FormError::IncompleteTransaction
            ])
        );
        assert_eq!(Transaction::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_foreign_account_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;
        let bobs_wallet = create_test_account(&db, bob.id, "Wallet").await?;
        let food = create_test_category(&db, alice.id, "Food", CategoryKind::Expense).await?;

        let outcome = submit(
            &db,
            alice.id,
            date(2024, 3, 5),
            &[
                ("form_type", "loose_transaction"),
                ("account", &bobs_wallet.id.to_string()),
                ("category", &food.id.to_string()),
                ("amount", "1.999"),
                ("occurred_time", "08:00"),
            ],
        )
        .await?;
        assert_eq!(
            outcome,
            FormOutcome::Rejected(vec![
                FormError::InvalidAmount("1.999".to_string()),
                FormError::UnknownAccount
            ])
        );
        assert_eq!(Transaction::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_view_carries_error_messages() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_user(&db, "alice").await?;
        let view = build_planner_view(
            &db,
            &test_clock(),
            owner.id,
            date(2024, 3, 5),
            &[FormError::MissingTitle],
            false,
        )
        .await?;
        assert_eq!(view.form_errors, vec!["일정 제목을 입력해주세요.".to_string()]);
        assert!(view.calendar.is_none());
        assert_eq!(view.day.selected_date, date(2024, 3, 5));
        Ok(())
    }
}
