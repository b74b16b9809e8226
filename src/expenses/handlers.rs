use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{ExpenseRequest, ListExpensesQuery},
    repo_types::{Expense, ExpenseFilter, NewExpense},
};
use crate::{
    auth::AuthUser,
    dto::MessageResponse,
    error::{AppError, AppResult},
    state::AppState,
};

const NOT_FOUND: AppError = AppError::NotFound("Expense not found");

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/:id", put(update_expense).delete(delete_expense))
}

fn expense_id(id: Result<Path<Uuid>, PathRejection>) -> AppResult<Uuid> {
    id.map(|Path(id)| id).map_err(|_| NOT_FOUND)
}

#[instrument(skip(state, query), fields(user_id = %user.id, username = %user.username))]
pub async fn list_expenses(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<ListExpensesQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Expense>>> {
    let Query(query) = query?;
    let filter = ExpenseFilter::try_from(query)?;
    Ok(Json(Expense::list(&state.db, user.id, &filter).await?))
}

/// POST /expenses → 201 with the stored record
#[instrument(skip(state, payload), fields(user_id = %user.id, username = %user.username))]
pub async fn create_expense(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<ExpenseRequest>, JsonRejection>,
) -> AppResult<(StatusCode, HeaderMap, Json<Expense>)> {
    let Json(payload) = payload?;
    let new = NewExpense::try_from(payload)?;
    let expense = Expense::create(&state.db, user.id, &new).await?;
    info!(expense_id = %expense.id, "expense created");

    let mut headers = HeaderMap::new();
    if let Ok(loc) = HeaderValue::from_str(&format!("/api/expenses/{}", expense.id)) {
        headers.insert(LOCATION, loc);
    }
    Ok((StatusCode::CREATED, headers, Json(expense)))
}

#[instrument(skip(state, id, payload), fields(user_id = %user.id, username = %user.username))]
pub async fn update_expense(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ExpenseRequest>, JsonRejection>,
) -> AppResult<Json<Expense>> {
    let id = expense_id(id)?;
    let Json(payload) = payload?;
    let new = NewExpense::try_from(payload)?;

    let expense = Expense::update(&state.db, id, user.id, &new)
        .await?
        .ok_or(NOT_FOUND)?;
    info!(expense_id = %id, "expense updated");
    Ok(Json(expense))
}

#[instrument(skip(state, id), fields(user_id = %user.id, username = %user.username))]
pub async fn delete_expense(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let id = expense_id(id)?;
    if !Expense::delete(&state.db, id, user.id).await? {
        return Err(NOT_FOUND);
    }
    info!(expense_id = %id, "expense deleted");
    Ok(Json(MessageResponse::new("Expense deleted successfully")))
}
