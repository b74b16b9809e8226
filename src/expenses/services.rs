use time::{macros::format_description, Date};

use super::{
    dto::{ExpenseRequest, ListExpensesQuery},
    repo_types::{ExpenseFilter, NewExpense},
};
use crate::{
    error::{AppError, AppResult},
    money,
};

fn parse_date(raw: &str, field: &str) -> AppResult<Date> {
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::validation(format!("{field} must be a date in YYYY-MM-DD format")))
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

impl TryFrom<ExpenseRequest> for NewExpense {
    type Error = AppError;

    fn try_from(req: ExpenseRequest) -> AppResult<Self> {
        let missing = || AppError::validation("All fields are required");
        let description = non_blank(req.description).ok_or_else(missing)?;
        let category = non_blank(req.category).ok_or_else(missing)?;
        let date = non_blank(req.date).ok_or_else(missing)?;
        let amount = req.amount.ok_or_else(missing)?;

        Ok(Self {
            description,
            amount: money::normalize(amount, "amount", true)?,
            category,
            date: parse_date(&date, "date")?,
        })
    }
}

impl TryFrom<ListExpensesQuery> for ExpenseFilter {
    type Error = AppError;

    fn try_from(q: ListExpensesQuery) -> AppResult<Self> {
        Ok(Self {
            category: non_blank(q.category),
            from_date: non_blank(q.from_date)
                .map(|d| parse_date(&d, "fromDate"))
                .transpose()?,
            to_date: non_blank(q.to_date)
                .map(|d| parse_date(&d, "toDate"))
                .transpose()?,
        })
    }
}
