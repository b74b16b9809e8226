//! Monthly spend analytics reconciled against the period's budget.
//!
//! Results are recomputed from `expenses` and `budgets` on every request and
//! never stored. Reading a period with no budget creates the default one.

use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
mod repo;
mod services;

pub fn router() -> Router<AppState> {
    handlers::analytics_routes()
}
