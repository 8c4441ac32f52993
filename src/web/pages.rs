//! Planner pages: the dashboard with the month grid and the single-day view.
//!
//! Both pages share one flow. A POST is decoded into a planner submission and
//! processed; success redirects to the same page for the same date, a
//! rejection re-renders the page with the error list.

use crate::{
    core::{
        calendar::CalendarMonth,
        day::{TaskEntry, TransactionDetail},
        planner::{self, FormOutcome, PlannerSubmission, PlannerView},
        time::LocalDateTime,
    },
    entities::CategoryKind,
    errors::Result,
    web::{AppState, identity::PageUser},
};
use askama::Template;
use axum::{
    Form,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

const DASHBOARD_PATH: &str = "/planner/";
const DAY_DETAIL_PATH: &str = "/planner/day/";

/// `?date=YYYY-MM-DD`
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    /// Raw selected date; invalid or missing means today
    pub date: Option<String>,
}

/// `GET /`
pub async fn home() -> Redirect {
    Redirect::to(DASHBOARD_PATH)
}

/// `GET /planner/`
pub async fn dashboard(
    State(state): State<AppState>,
    PageUser(owner): PageUser,
    Query(query): Query<DateQuery>,
) -> Result<Response> {
    handle(&state, owner.id, &query, None, DASHBOARD_PATH, true).await
}

/// `POST /planner/`
pub async fn dashboard_submit(
    State(state): State<AppState>,
    PageUser(owner): PageUser,
    Query(query): Query<DateQuery>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response> {
    handle(&state, owner.id, &query, Some(&fields), DASHBOARD_PATH, true).await
}

/// `GET /planner/day/`
pub async fn day_detail(
    State(state): State<AppState>,
    PageUser(owner): PageUser,
    Query(query): Query<DateQuery>,
) -> Result<Response> {
    handle(&state, owner.id, &query, None, DAY_DETAIL_PATH, false).await
}

/// `POST /planner/day/`
pub async fn day_detail_submit(
    State(state): State<AppState>,
    PageUser(owner): PageUser,
    Query(query): Query<DateQuery>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response> {
    handle(&state, owner.id, &query, Some(&fields), DAY_DETAIL_PATH, false).await
}

async fn handle(
    state: &AppState,
    owner_id: i64,
    query: &DateQuery,
    fields: Option<&HashMap<String, String>>,
    base_path: &'static str,
    include_calendar: bool,
) -> Result<Response> {
    let selected_date = state.clock.parse_selected_date(query.date.as_deref());
    let submission = fields.and_then(PlannerSubmission::from_fields);

    let outcome = planner::process_submission(
        &state.db,
        &state.clock,
        owner_id,
        selected_date,
        submission.as_ref(),
        base_path,
    )
    .await?;

    let errors = match outcome {
        FormOutcome::Redirect(location) => return Ok(Redirect::to(&location).into_response()),
        FormOutcome::Rejected(errors) => errors,
        FormOutcome::NoAction => Vec::new(),
    };

    let view = planner::build_planner_view(
        &state.db,
        &state.clock,
        owner_id,
        selected_date,
        &errors,
        include_calendar,
    )
    .await?;
    let html = PlannerTemplate::from_view(view, base_path).render()?;
    Ok(Html(html).into_response())
}

/// One calendar cell
pub struct CellView {
    /// Day of month
    pub day: u32,
    /// ISO date for the link
    pub iso: String,
    /// CSS classes
    pub classes: String,
    /// Tasks starting or due that day
    pub task_count: usize,
}

/// Month grid ready for rendering
pub struct CalendarView {
    /// e.g. `2024년 3월`
    pub title: String,
    /// Column labels
    pub weekdays: Vec<&'static str>,
    /// Rows of seven cells
    pub weeks: Vec<Vec<CellView>>,
    /// ISO date of the previous month's first day
    pub prev: String,
    /// ISO date of the next month's first day
    pub next: String,
}

/// One transaction line
pub struct TransactionRow {
    /// `HH:MM`
    pub time: String,
    /// Account name
    pub account: String,
    /// Category name
    pub category: String,
    /// Formatted amount
    pub amount: String,
    /// Note
    pub memo: String,
    /// Linked task title, empty when loose
    pub task: String,
}

/// One task with its transactions
pub struct TaskRow {
    /// Title
    pub title: String,
    /// Notes
    pub description: String,
    /// e.g. `09:00 ~ 10:00`, empty for untimed tasks
    pub window: String,
    /// Linked transactions
    pub transactions: Vec<TransactionRow>,
}

/// One daily total
pub struct TotalRow {
    /// Korean label of the kind
    pub label: &'static str,
    /// Formatted sum
    pub amount: String,
}

/// A `<select>` option
pub struct OptionRow {
    /// Row id
    pub id: i64,
    /// Label
    pub name: String,
}

/// The planner page
#[derive(Template)]
#[template(path = "planner.html")]
pub struct PlannerTemplate {
    /// Path the forms post to
    pub base_path: &'static str,
    /// ISO selected date
    pub selected: String,
    /// e.g. `2024년 3월 5일`
    pub selected_label: String,
    /// Form error messages
    pub errors: Vec<String>,
    /// Month grid, dashboard only
    pub calendar: Option<CalendarView>,
    /// Tasks with a start or due time
    pub timed: Vec<TaskRow>,
    /// Tasks without times
    pub untimed: Vec<TaskRow>,
    /// Transactions without a task
    pub loose: Vec<TransactionRow>,
    /// Totals per kind
    pub totals: Vec<TotalRow>,
    /// Account choices
    pub accounts: Vec<OptionRow>,
    /// Expense category choices
    pub categories: Vec<OptionRow>,
}

const fn kind_label(kind: CategoryKind) -> &'static str {
    match kind {
        CategoryKind::Expense => "지출",
        CategoryKind::Income => "수입",
        CategoryKind::Transfer => "이체",
    }
}

fn hhmm(at: &LocalDateTime) -> String {
    at.format("%H:%M").to_string()
}

fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

fn date_label(date: NaiveDate) -> String {
    format!("{}년 {}월 {}일", date.year(), date.month(), date.day())
}

fn transaction_row(detail: &TransactionDetail) -> TransactionRow {
    TransactionRow {
        time: hhmm(&detail.occurred_local),
        account: detail.account.name.clone(),
        category: detail.category.name.clone(),
        amount: format_amount(detail.transaction.amount),
        memo: detail.transaction.memo.clone(),
        task: detail
            .task
            .as_ref()
            .map(|t| t.title.clone())
            .unwrap_or_default(),
    }
}

fn task_row(entry: &TaskEntry) -> TaskRow {
    let window = match (&entry.start_local, &entry.end_local) {
        (Some(start), Some(end)) => format!("{} ~ {}", hhmm(start), hhmm(end)),
        (Some(start), None) => hhmm(start),
        (None, Some(end)) => format!("~ {}", hhmm(end)),
        (None, None) => String::new(),
    };
    TaskRow {
        title: entry.task.title.clone(),
        description: entry.task.description.clone(),
        window,
        transactions: entry.transactions.iter().map(transaction_row).collect(),
    }
}

fn calendar_view(calendar: CalendarMonth, selected: NaiveDate) -> CalendarView {
    let weeks = calendar
        .weeks
        .into_iter()
        .map(|week| {
            week.into_iter()
                .map(|cell| {
                    let mut classes = vec!["day"];
                    if !cell.in_month {
                        classes.push("outside");
                    }
                    if cell.is_today {
                        classes.push("today");
                    }
                    if cell.is_selected {
                        classes.push("selected");
                    }
                    CellView {
                        day: cell.date.day(),
                        iso: cell.date.to_string(),
                        classes: classes.join(" "),
                        task_count: cell.task_count,
                    }
                })
                .collect()
        })
        .collect();

    CalendarView {
        title: format!("{}년 {}월", selected.year(), selected.month()),
        weekdays: calendar.weekdays,
        weeks,
        prev: calendar.prev_month.to_string(),
        next: calendar.next_month.to_string(),
    }
}

impl PlannerTemplate {
    /// Flattens the planner view into display strings.
    #[must_use]
    pub fn from_view(view: PlannerView, base_path: &'static str) -> Self {
        let day = view.day;
        let selected = day.selected_date;
        Self {
            base_path,
            selected: selected.to_string(),
            selected_label: date_label(selected),
            errors: view.form_errors,
            calendar: view.calendar.map(|c| calendar_view(c, selected)),
            timed: day.timed_tasks.iter().map(task_row).collect(),
            untimed: day.untimed_tasks.iter().map(task_row).collect(),
            loose: day.loose_transactions.iter().map(transaction_row).collect(),
            totals: day
                .daily_totals
                .iter()
                .map(|(kind, amount)| TotalRow {
                    label: kind_label(*kind),
                    amount: format_amount(*amount),
                })
                .collect(),
            accounts: day
                .accounts
                .iter()
                .map(|a| OptionRow {
                    id: a.id,
                    name: a.name.clone(),
                })
                .collect(),
            categories: day
                .categories
                .iter()
                .map(|c| OptionRow {
                    id: c.id,
                    name: c.name.clone(),
                })
                .collect(),
        }
    }
}
