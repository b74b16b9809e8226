use crate::state::AppState;
use axum::Router;
use rust_decimal::Decimal;

mod dto;
pub mod handlers;
mod repo;

pub use repo::Budget;

/// Amount a period receives the first time it is read or at registration.
pub const DEFAULT_BUDGET_AMOUNT: Decimal = Decimal::ONE_THOUSAND;

pub fn router() -> Router<AppState> {
    handlers::budget_routes()
}
