use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use super::{
    dto::{AnalyticsResult, CategoryTotal, NO_CATEGORY},
    repo,
};
use crate::{budget::Budget, error::AppResult, period::Period, state::AppState};

impl AnalyticsResult {
    /// Totals, remaining budget and top category from an ordered breakdown.
    ///
    /// The total is the sum of the breakdown, so the two always agree.
    /// Ties for the top category keep the earliest entry.
    pub fn reconcile(category_breakdown: Vec<CategoryTotal>, budget_amount: Decimal) -> Self {
        let total_expenses: Decimal = category_breakdown.iter().map(|c| c.amount).sum();

        let mut top_category: &str = NO_CATEGORY;
        let mut top_category_amount = Decimal::ZERO;
        for c in &category_breakdown {
            if c.amount > top_category_amount {
                top_category = c.category.as_str();
                top_category_amount = c.amount;
            }
        }
        let top_category = top_category.to_owned();

        Self {
            total_expenses,
            budget_amount,
            remaining_budget: budget_amount - total_expenses,
            top_category,
            top_category_amount,
            category_breakdown,
        }
    }
}

pub async fn compute_analytics(
    state: &AppState,
    user_id: Uuid,
    period: Period,
) -> AppResult<AnalyticsResult> {
    let (start, end) = period.bounds()?;
    let breakdown = repo::category_breakdown(&state.db, user_id, start, end).await?;
    let budget =
        Budget::get_or_create(&state.db, user_id, period, state.config.default_budget).await?;

    let result = AnalyticsResult::reconcile(breakdown, budget.amount);
    debug!(
        %user_id,
        %start,
        %end,
        total = %result.total_expenses,
        remaining = %result.remaining_budget,
        "analytics computed"
    );
    Ok(result)
}
