//! Read-only planner data: the day context and the month grid.

use crate::{
    core::{
        calendar::{self, CalendarMonth},
        day::{self, DayContext},
    },
    errors::Result,
    web::{AppState, identity::ApiUser, pages::DateQuery},
};
use axum::{
    Json,
    extract::{Query, State},
};

/// `GET /api/planner/day?date=YYYY-MM-DD`
pub async fn day(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Query(query): Query<DateQuery>,
) -> Result<Json<DayContext>> {
    let date = state.clock.parse_selected_date(query.date.as_deref());
    Ok(Json(
        day::build_day_context(&state.db, &state.clock, owner.id, date).await?,
    ))
}

/// `GET /api/planner/calendar?date=YYYY-MM-DD`
pub async fn calendar(
    State(state): State<AppState>,
    ApiUser(owner): ApiUser,
    Query(query): Query<DateQuery>,
) -> Result<Json<CalendarMonth>> {
    let date = state.clock.parse_selected_date(query.date.as_deref());
    Ok(Json(
        calendar::load_calendar(&state.db, &state.clock, owner.id, date).await?,
    ))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::entities::CategoryKind;
    use crate::test_utils::*;
    use crate::web::{
        api::testing::{USER, json_body, request},
        create_router,
    };
    use axum::http::StatusCode;
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_day_context_json() -> crate::errors::Result<()> {
        let state = test_app_state().await?;
        let owner = create_test_user(&state.db, USER).await?;
        let wallet = create_test_account(&state.db, owner.id, "Wallet").await?;
        let food = create_test_category(&state.db, owner.id, "Food", CategoryKind::Expense).await?;
        let lunch = create_scheduled_task(
            &state.db,
            owner.id,
            "Lunch",
            Some(local(2024, 3, 5, 12, 0)),
            None,
        )
        .await?;
        create_test_transaction(
            &state.db,
            owner.id,
            wallet.id,
            food.id,
            Some(lunch.id),
            Decimal::new(9000, 0),
            local(2024, 3, 5, 12, 30),
        )
        .await?;
        create_test_transaction(
            &state.db,
            owner.id,
            wallet.id,
            food.id,
            None,
            Decimal::new(1500, 0),
            local(2024, 3, 5, 16, 0),
        )
        .await?;

        let response = create_router(state)
            .oneshot(request("GET", "/api/planner/day?date=2024-03-05", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["selected_date"], "2024-03-05");
        assert_eq!(body["timed_tasks"].as_array().unwrap().len(), 1);
        assert_eq!(body["timed_tasks"][0]["task"]["title"], "Lunch");
        assert_eq!(
            body["timed_tasks"][0]["transactions"].as_array().unwrap().len(),
            1
        );
        assert_eq!(body["transactions"].as_array().unwrap().len(), 2);
        assert_eq!(body["loose_transactions"].as_array().unwrap().len(), 1);
        let expense: Decimal =
            serde_json::from_value(body["daily_totals"]["expense"].clone()).unwrap();
        assert_eq!(expense, Decimal::new(10500, 0));
        Ok(())
    }

    #[tokio::test]
    async fn test_calendar_json_defaults_to_today() -> crate::errors::Result<()> {
        let state = test_app_state().await?;
        let owner = create_test_user(&state.db, USER).await?;
        create_scheduled_task(
            &state.db,
            owner.id,
            "Dentist",
            Some(local(2024, 3, 18, 10, 0)),
            Some(local(2024, 3, 18, 11, 0)),
        )
        .await?;

        let response = create_router(state)
            .oneshot(request("GET", "/api/planner/calendar?date=bogus", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["prev_month"], "2024-02-01");
        assert_eq!(body["next_month"], "2024-04-01");

        let cells: Vec<&serde_json::Value> = body["weeks"]
            .as_array()
            .unwrap()
            .iter()
            .flat_map(|week| week.as_array().unwrap())
            .collect();
        let today = cells.iter().find(|c| c["date"] == "2024-03-18").unwrap();
        assert_eq!(today["is_today"], true);
        assert_eq!(today["is_selected"], true);
        assert_eq!(today["task_count"], 1);
        Ok(())
    }
}
