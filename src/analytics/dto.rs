use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// `topCategory` when the period has no expenses.
pub const NO_CATEGORY: &str = "-";

/// Summed spend for one category within a period.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResult {
    pub total_expenses: Decimal,
    pub budget_amount: Decimal,
    pub remaining_budget: Decimal,
    pub top_category: String,
    pub top_category_amount: Decimal,
    pub category_breakdown: Vec<CategoryTotal>,
}
