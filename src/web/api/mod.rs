//! JSON API. Every route requires a known owner.

/// Accounts, categories, transactions and budgets
pub mod finance;
/// Read-only planner data
pub mod planner;
/// Tasks and tags
pub mod tasks;

use crate::web::AppState;
use axum::{
    Router,
    routing::get,
};
use serde::{Deserialize, Deserializer};

/// Routes mounted under `/api`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route("/tasks/upcoming", get(tasks::upcoming_tasks))
        .route(
            "/tasks/:id",
            get(tasks::get_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/tags", get(tasks::list_tags).post(tasks::create_tag))
        .route(
            "/tags/:id",
            get(tasks::get_tag)
                .patch(tasks::update_tag)
                .delete(tasks::delete_tag),
        )
        .route(
            "/finance/accounts",
            get(finance::list_accounts).post(finance::create_account),
        )
        .route(
            "/finance/accounts/:id",
            get(finance::get_account)
                .patch(finance::update_account)
                .delete(finance::delete_account),
        )
        .route(
            "/finance/categories",
            get(finance::list_categories).post(finance::create_category),
        )
        .route(
            "/finance/categories/:id",
            get(finance::get_category)
                .patch(finance::update_category)
                .delete(finance::delete_category),
        )
        .route(
            "/finance/transactions",
            get(finance::list_transactions).post(finance::create_transaction),
        )
        .route("/finance/transactions/totals", get(finance::transaction_totals))
        .route(
            "/finance/transactions/:id",
            get(finance::get_transaction)
                .patch(finance::update_transaction)
                .delete(finance::delete_transaction),
        )
        .route(
            "/finance/budget-periods",
            get(finance::list_periods).post(finance::create_period),
        )
        .route(
            "/finance/budget-periods/:id",
            get(finance::get_period)
                .patch(finance::update_period)
                .delete(finance::delete_period),
        )
        .route(
            "/finance/budget-items",
            get(finance::list_items).post(finance::create_item),
        )
        .route(
            "/finance/budget-items/:id",
            get(finance::get_item)
                .patch(finance::update_item)
                .delete(finance::delete_item),
        )
        .route("/planner/day", get(planner::day))
        .route("/planner/calendar", get(planner::calendar))
}

/// Tells an absent field (`None`) apart from an explicit `null` (`Some(None)`).
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
