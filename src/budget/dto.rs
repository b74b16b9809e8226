use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::repo::Budget;

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBudgetRequest {
    pub amount: Option<Decimal>,
    pub month: Option<i32>,
    pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct BudgetUpdated {
    pub message: &'static str,
    #[serde(flatten)]
    pub budget: Budget,
}
