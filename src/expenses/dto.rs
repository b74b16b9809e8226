use rust_decimal::Decimal;
use serde::Deserialize;

/// Body of POST /expenses and PUT /expenses/:id. Every field is required.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseRequest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// `?category&fromDate&toDate`; empty values are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExpensesQuery {
    pub category: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}
