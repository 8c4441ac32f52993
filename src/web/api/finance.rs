//! Account, category, transaction and budget endpoints.

use crate::{
    core::{
        account::{self, AccountChanges, NewAccount},
        budget::{self, ItemChanges, PeriodChanges, PeriodWithItems},
        category::{self, CategoryChanges},
        time::Clock,
        transaction::{self, NewTransaction, TransactionChanges},
    },
    entities::{
        AccountType, CategoryKind, account as account_entity, budget_item, budget_period,
        category as category_entity, transaction as transaction_entity,
    },
    errors::{Error, Result},
    web::{AppState, api::double_option, identity::ApiUser},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;

fn not_found(entity: &'static str, id: i64) -> Error {
    Error::NotFound { entity, id }
}

/// Body of `POST /api/finance/accounts`
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Name, unique per owner
    pub name: String,
    /// Defaults to cash
    #[serde(default, rename = "type")]
    pub account_type: AccountType,
    /// Defaults to zero
    #[serde(default)]
    pub balance: Decimal,
}

/// Body of `PATCH /api/finance/accounts/:id`
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccountRequest {
    /// New name
    pub name: Option<String>,
    /// New type
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    /// New balance
    pub balance: Option<Decimal>,
}

/// `GET /api/finance/accounts`
pub async fn list_accounts(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
) -> Result<Json<Vec<account_entity::Model>>> {
    Ok(Json(account::list_accounts(&state.db, owner.id).await?))
}

/// `POST /api/finance/accounts`
pub async fn create_account(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Json(body): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<account_entity::Model>)> {
    let input = NewAccount {
        name: body.name,
        account_type: body.account_type,
        balance: body.balance,
    };
    let created = account::create_account(&state.db, owner.id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/finance/accounts/:id`
pub async fn get_account(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Path(id): Path<i64>,
) -> Result<Json<account_entity::Model>> {
    Ok(Json(account::require_account(&state.db, owner.id, id).await?))
}

/// `PATCH /api/finance/accounts/:id`
pub async fn update_account(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateAccountRequest>,
) -> Result<Json<account_entity::Model>> {
    let changes = AccountChanges {
        name: body.name,
        account_type: body.account_type,
        balance: body.balance,
    };
    Ok(Json(account::update_account(&state.db, owner.id, id, changes).await?))
}

/// `DELETE /api/finance/accounts/:id`
pub async fn delete_account(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    account::delete_account(&state.db, owner.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `?kind=` filter for categories
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    /// Only this kind
    pub kind: Option<CategoryKind>,
}

/// Body of `POST /api/finance/categories`
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Name
    pub name: String,
    /// Expense, income or transfer
    pub kind: CategoryKind,
}

/// Body of `PATCH /api/finance/categories/:id`
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    /// New name
    pub name: Option<String>,
    /// New kind
    pub kind: Option<CategoryKind>,
}

/// `GET /api/finance/categories`
pub async fn list_categories(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<category_entity::Model>>> {
    Ok(Json(
        category::list_categories(&state.db, owner.id, query.kind).await?,
    ))
}

/// `POST /api/finance/categories`
pub async fn create_category(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<category_entity::Model>)> {
    let created = category::create_category(&state.db, owner.id, &body.name, body.kind).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/finance/categories/:id`
pub async fn get_category(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Path(id): Path<i64>,
) -> Result<Json<category_entity::Model>> {
    Ok(Json(category::require_category(&state.db, owner.id, id).await?))
}

/// `PATCH /api/finance/categories/:id`
pub async fn update_category(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCategoryRequest>,
) -> Result<Json<category_entity::Model>> {
    let changes = CategoryChanges {
        name: body.name,
        kind: body.kind,
    };
    Ok(Json(category::update_category(&state.db, owner.id, id, changes).await?))
}

/// `DELETE /api/finance/categories/:id`
pub async fn delete_category(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    category::delete_category(&state.db, owner.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD`, both local and inclusive
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    /// First local day
    pub from: Option<NaiveDate>,
    /// Last local day
    pub to: Option<NaiveDate>,
}

impl RangeQuery {
    fn bounds(&self, clock: &Clock) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>> {
        match (self.from, self.to) {
            (None, None) => Ok(None),
            (Some(from), Some(to)) if from <= to => Ok(Some(clock.range_bounds(from, to))),
            (Some(_), Some(_)) => Err(Error::validation("'from' must not be after 'to'")),
            _ => Err(Error::validation("'from' and 'to' must be given together")),
        }
    }
}

/// Body of `POST /api/finance/transactions`
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Account id
    pub account: i64,
    /// Category id
    pub category: i64,
    /// Optional task id
    pub task: Option<i64>,
    /// Amount, string or number
    pub amount: Decimal,
    /// Note
    #[serde(default)]
    pub memo: String,
    /// RFC 3339 timestamp
    pub occurred_at: DateTime<FixedOffset>,
}

/// Body of `PATCH /api/finance/transactions/:id`; `"task": null` unlinks
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTransactionRequest {
    /// New account
    pub account: Option<i64>,
    /// New category
    pub category: Option<i64>,
    /// New task link
    #[serde(default, deserialize_with = "double_option")]
    pub task: Option<Option<i64>>,
    /// New amount
    pub amount: Option<Decimal>,
    /// New note
    pub memo: Option<String>,
    /// New occurrence time
    pub occurred_at: Option<DateTime<FixedOffset>>,
}

/// `GET /api/finance/transactions`
pub async fn list_transactions(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Query(range): Query<RangeQuery>,
) -> Result<Json<Vec<transaction_entity::Model>>> {
    let bounds = range.bounds(&state.clock)?;
    Ok(Json(
        transaction::list_transactions(&state.db, owner.id, bounds).await?,
    ))
}

/// `GET /api/finance/transactions/totals`
pub async fn transaction_totals(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Query(range): Query<RangeQuery>,
) -> Result<Json<BTreeMap<CategoryKind, Decimal>>> {
    let bounds = range.bounds(&state.clock)?;
    Ok(Json(
        transaction::totals_by_kind(&state.db, owner.id, bounds).await?,
    ))
}

/// `POST /api/finance/transactions`
pub async fn create_transaction(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Json(body): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<transaction_entity::Model>)> {
    let input = NewTransaction {
        account_id: body.account,
        category_id: body.category,
        task_id: body.task,
        amount: body.amount,
        memo: body.memo,
        occurred_at: body.occurred_at.to_utc(),
    };
    let created = transaction::create_transaction(&state.db, owner.id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/finance/transactions/:id`
pub async fn get_transaction(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Path(id): Path<i64>,
) -> Result<Json<transaction_entity::Model>> {
    transaction::get_transaction(&state.db, owner.id, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("transaction", id))
}

/// `PATCH /api/finance/transactions/:id`
pub async fn update_transaction(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateTransactionRequest>,
) -> Result<Json<transaction_entity::Model>> {
    let changes = TransactionChanges {
        account_id: body.account,
        category_id: body.category,
        task_id: body.task,
        amount: body.amount,
        memo: body.memo,
        occurred_at: body.occurred_at.map(|t| t.to_utc()),
    };
    Ok(Json(
        transaction::update_transaction(&state.db, owner.id, id, changes).await?,
    ))
}

/// `DELETE /api/finance/transactions/:id`
pub async fn delete_transaction(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    transaction::delete_transaction(&state.db, owner.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Body of budget period create
#[derive(Debug, Deserialize)]
pub struct CreatePeriodRequest {
    /// First day
    pub start_date: NaiveDate,
    /// Last day
    pub end_date: NaiveDate,
}

/// Body of budget period update
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePeriodRequest {
    /// New first day
    pub start_date: Option<NaiveDate>,
    /// New last day
    pub end_date: Option<NaiveDate>,
}

/// `GET /api/finance/budget-periods`
pub async fn list_periods(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
) -> Result<Json<Vec<PeriodWithItems>>> {
    Ok(Json(budget::list_periods(&state.db, owner.id).await?))
}

/// `POST /api/finance/budget-periods`
pub async fn create_period(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Json(body): Json<CreatePeriodRequest>,
) -> Result<(StatusCode, Json<budget_period::Model>)> {
    let created = budget::create_period(&state.db, owner.id, body.start_date, body.end_date).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/finance/budget-periods/:id`
pub async fn get_period(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Path(id): Path<i64>,
) -> Result<Json<PeriodWithItems>> {
    budget::get_period(&state.db, owner.id, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("budget period", id))
}

/// `PATCH /api/finance/budget-periods/:id`
pub async fn update_period(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdatePeriodRequest>,
) -> Result<Json<budget_period::Model>> {
    let changes = PeriodChanges {
        start_date: body.start_date,
        end_date: body.end_date,
    };
    Ok(Json(budget::update_period(&state.db, owner.id, id, changes).await?))
}

/// `DELETE /api/finance/budget-periods/:id`
pub async fn delete_period(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    budget::delete_period(&state.db, owner.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `?period=<id>` filter for budget items
#[derive(Debug, Deserialize)]
pub struct ItemQuery {
    /// Period whose items to list
    pub period: i64,
}

/// Body of budget item create
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    /// Owning period
    pub period: i64,
    /// Limited category
    pub category: i64,
    /// Limit
    pub limit_amount: Decimal,
}

/// Body of budget item update
#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    /// New category
    pub category: Option<i64>,
    /// New limit
    pub limit_amount: Option<Decimal>,
}

/// `GET /api/finance/budget-items?period=<id>`
pub async fn list_items(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Query(query): Query<ItemQuery>,
) -> Result<Json<Vec<budget_item::Model>>> {
    Ok(Json(budget::list_items(&state.db, owner.id, query.period).await?))
}

/// `POST /api/finance/budget-items`
pub async fn create_item(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Json(body): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<budget_item::Model>)> {
    let created = budget::create_item(
        &state.db,
        owner.id,
        body.period,
        body.category,
        body.limit_amount,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/finance/budget-items/:id`
pub async fn get_item(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Path(id): Path<i64>,
) -> Result<Json<budget_item::Model>> {
    budget::get_item(&state.db, owner.id, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("budget item", id))
}

/// `PATCH /api/finance/budget-items/:id`
pub async fn update_item(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<budget_item::Model>> {
    let changes = ItemChanges {
        category_id: body.category,
        limit_amount: body.limit_amount,
    };
    Ok(Json(budget::update_item(&state.db, owner.id, id, changes).await?))
}

/// `DELETE /api/finance/budget-items/:id`
pub async fn delete_item(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    budget::delete_item(&state.db, owner.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
