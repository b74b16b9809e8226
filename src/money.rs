use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};

/// Largest value a NUMERIC(12, 2) column holds.
fn max_amount() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

/// Round to cents and check the value fits the column; `positive` rejects zero.
pub fn normalize(amount: Decimal, field: &str, positive: bool) -> AppResult<Decimal> {
    let amount = amount.round_dp(2);
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AppError::validation(format!("{field} must not be negative")));
    }
    if positive && amount.is_zero() {
        return Err(AppError::validation(format!("{field} must be greater than zero")));
    }
    if amount > max_amount() {
        return Err(AppError::validation(format!("{field} is too large")));
    }
    Ok(amount)
}
