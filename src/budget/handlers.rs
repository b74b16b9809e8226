use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{BudgetUpdated, UpdateBudgetRequest},
    repo::Budget,
};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    money,
    period::{Period, PeriodQuery},
    state::AppState,
};

pub fn budget_routes() -> Router<AppState> {
    Router::new().route("/budget", get(get_budget).put(update_budget))
}

/// GET /budget?month&year (creates the default record when missing)
#[instrument(skip(state, query), fields(user_id = %user.id, username = %user.username))]
pub async fn get_budget(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> AppResult<Json<Budget>> {
    let Query(query) = query?;
    let period = Period::try_from(query)?;
    let budget =
        Budget::get_or_create(&state.db, user.id, period, state.config.default_budget).await?;
    Ok(Json(budget))
}

/// PUT /budget { amount, month?, year? }
#[instrument(skip(state, payload), fields(user_id = %user.id, username = %user.username))]
pub async fn update_budget(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<UpdateBudgetRequest>, JsonRejection>,
) -> AppResult<Json<BudgetUpdated>> {
    let Json(body) = payload?;
    let amount = body
        .amount
        .ok_or_else(|| AppError::validation("amount is required"))?;
    let amount = money::normalize(amount, "amount", false)?;
    let period = Period::resolve(body.month, body.year)?;

    let budget = Budget::upsert(&state.db, user.id, period, amount).await?;
    info!(month = budget.month, year = budget.year, %amount, "budget updated");

    Ok(Json(BudgetUpdated {
        message: "Budget updated successfully",
        budget,
    }))
}
