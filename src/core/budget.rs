//! Budget business logic - periods and their per-category limits.
//!
//! Items have no owner column of their own; every item operation is scoped
//! through the period it belongs to.

use crate::{
    core::{category, transaction::check_amount},
    entities::{BudgetItem, BudgetPeriod, budget_item, budget_period},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{LoaderTrait, QueryOrder, Set, prelude::*};
use serde::Serialize;

/// A budget period with its items
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodWithItems {
    /// The stored period
    #[serde(flatten)]
    pub period: budget_period::Model,
    /// Limits of the period, by id
    pub items: Vec<budget_item::Model>,
}

/// Partial update of a period
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodChanges {
    /// New first day
    pub start_date: Option<NaiveDate>,
    /// New last day
    pub end_date: Option<NaiveDate>,
}

/// Partial update of a budget item
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemChanges {
    /// New category
    pub category_id: Option<i64>,
    /// New limit
    pub limit_amount: Option<Decimal>,
}

fn check_range(start_date: NaiveDate, end_date: NaiveDate) -> Result<()> {
    if start_date > end_date {
        return Err(Error::validation(format!(
            "Budget period starts {start_date} after it ends {end_date}"
        )));
    }
    Ok(())
}

async fn require_period(
    db: &DatabaseConnection,
    owner_id: i64,
    period_id: i64,
) -> Result<budget_period::Model> {
    BudgetPeriod::find_by_id(period_id)
        .filter(budget_period::Column::OwnerId.eq(owner_id))
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "budget period",
            id: period_id,
        })
}

/// Creates a period covering `start_date..=end_date`.
pub async fn create_period(
    db: &DatabaseConnection,
    owner_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<budget_period::Model> {
    check_range(start_date, end_date)?;

    let period = budget_period::ActiveModel {
        owner_id: Set(owner_id),
        start_date: Set(start_date),
        end_date: Set(end_date),
        ..Default::default()
    };
    let result = period.insert(db).await?;
    tracing::info!(owner_id, period_id = result.id, %start_date, %end_date, "Created budget period");
    Ok(result)
}

/// Lists the owner's periods, latest start first, with their items.
pub async fn list_periods(db: &DatabaseConnection, owner_id: i64) -> Result<Vec<PeriodWithItems>> {
    let periods = BudgetPeriod::find()
        .filter(budget_period::Column::OwnerId.eq(owner_id))
        .order_by_desc(budget_period::Column::StartDate)
        .order_by_desc(budget_period::Column::Id)
        .all(db)
        .await?;
    let items = periods.load_many(BudgetItem, db).await?;

    Ok(periods
        .into_iter()
        .zip(items)
        .map(|(period, mut items)| {
            items.sort_by_key(|i| i.id);
            PeriodWithItems { period, items }
        })
        .collect())
}

/// Finds one of the owner's periods with its items.
pub async fn get_period(
    db: &DatabaseConnection,
    owner_id: i64,
    period_id: i64,
) -> Result<Option<PeriodWithItems>> {
    let Some(period) = BudgetPeriod::find_by_id(period_id)
        .filter(budget_period::Column::OwnerId.eq(owner_id))
        .one(db)
        .await?
    else {
        return Ok(None);
    };
    let items = list_items(db, owner_id, period.id).await?;
    Ok(Some(PeriodWithItems { period, items }))
}

/// Moves a period's dates; the resulting range must still be ordered.
pub async fn update_period(
    db: &DatabaseConnection,
    owner_id: i64,
    period_id: i64,
    changes: PeriodChanges,
) -> Result<budget_period::Model> {
    let existing = require_period(db, owner_id, period_id).await?;
    let start_date = changes.start_date.unwrap_or(existing.start_date);
    let end_date = changes.end_date.unwrap_or(existing.end_date);
    check_range(start_date, end_date)?;

    let mut active: budget_period::ActiveModel = existing.into();
    active.start_date = Set(start_date);
    active.end_date = Set(end_date);
    active.update(db).await.map_err(Into::into)
}

/// Deletes a period together with its items.
pub async fn delete_period(db: &DatabaseConnection, owner_id: i64, period_id: i64) -> Result<()> {
    let existing = require_period(db, owner_id, period_id).await?;
    existing.delete(db).await?;
    tracing::info!(owner_id, period_id, "Deleted budget period");
    Ok(())
}

/// Lists the items of one of the owner's periods.
pub async fn list_items(
    db: &DatabaseConnection,
    owner_id: i64,
    period_id: i64,
) -> Result<Vec<budget_item::Model>> {
    require_period(db, owner_id, period_id).await?;
    BudgetItem::find()
        .filter(budget_item::Column::PeriodId.eq(period_id))
        .order_by_asc(budget_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an item whose period belongs to the owner.
pub async fn get_item(
    db: &DatabaseConnection,
    owner_id: i64,
    item_id: i64,
) -> Result<Option<budget_item::Model>> {
    BudgetItem::find_by_id(item_id)
        .inner_join(BudgetPeriod)
        .filter(budget_period::Column::OwnerId.eq(owner_id))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn require_item(
    db: &DatabaseConnection,
    owner_id: i64,
    item_id: i64,
) -> Result<budget_item::Model> {
    get_item(db, owner_id, item_id).await?.ok_or(Error::NotFound {
        entity: "budget item",
        id: item_id,
    })
}

/// Adds a limit for one of the owner's categories to one of the owner's periods.
pub async fn create_item(
    db: &DatabaseConnection,
    owner_id: i64,
    period_id: i64,
    category_id: i64,
    limit_amount: Decimal,
) -> Result<budget_item::Model> {
    let limit_amount = check_amount(limit_amount)?;
    require_period(db, owner_id, period_id).await?;
    category::require_category(db, owner_id, category_id).await?;

    let item = budget_item::ActiveModel {
        period_id: Set(period_id),
        category_id: Set(category_id),
        limit_amount: Set(limit_amount),
        ..Default::default()
    };
    let result = item.insert(db).await?;
    tracing::info!(owner_id, period_id, item_id = result.id, "Created budget item");
    Ok(result)
}

/// Changes an item's category or limit.
pub async fn update_item(
    db: &DatabaseConnection,
    owner_id: i64,
    item_id: i64,
    changes: ItemChanges,
) -> Result<budget_item::Model> {
    let existing = require_item(db, owner_id, item_id).await?;
    let mut active: budget_item::ActiveModel = existing.into();

    if let Some(category_id) = changes.category_id {
        category::require_category(db, owner_id, category_id).await?;
        active.category_id = Set(category_id);
    }
    if let Some(limit_amount) = changes.limit_amount {
        active.limit_amount = Set(check_amount(limit_amount)?);
    }

    active.update(db).await.map_err(Into::into)
}

/// Removes an item from its period.
pub async fn delete_item(db: &DatabaseConnection, owner_id: i64, item_id: i64) -> Result<()> {
    let existing = require_item(db, owner_id, item_id).await?;
    existing.delete(db).await?;
    tracing::info!(owner_id, item_id, "Deleted budget item");
    Ok(())
}
