//! Calendar-month periods shared by budgets and analytics.

use serde::Deserialize;
use time::{Date, Month, OffsetDateTime};

use crate::error::{AppError, AppResult};

/// A single calendar month of a given year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    month: Month,
    year: i32,
}

/// `?month=&year=` as sent by the client; both optional.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub month: Option<i32>,
    pub year: Option<i32>,
}

impl Period {
    pub fn new(month: i32, year: i32) -> AppResult<Self> {
        let month = u8::try_from(month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or_else(|| AppError::validation("month must be between 1 and 12"))?;
        if !(1..=9998).contains(&year) {
            return Err(AppError::validation("year is out of range"));
        }
        Ok(Self { month, year })
    }

    pub fn current() -> Self {
        let today = OffsetDateTime::now_utc().date();
        Self {
            month: today.month(),
            year: today.year(),
        }
    }

    /// Resolve a partially filled query, falling back to the current month/year.
    pub fn resolve(month: Option<i32>, year: Option<i32>) -> AppResult<Self> {
        let now = Self::current();
        Self::new(
            month.unwrap_or_else(|| now.month_number()),
            year.unwrap_or(now.year),
        )
    }

    pub fn month_number(&self) -> i32 {
        i32::from(u8::from(self.month))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Half-open `[start, end)` covering the whole month.
    pub fn bounds(&self) -> AppResult<(Date, Date)> {
        let start = first_of(self.year, self.month)?;
        let end = match self.month {
            Month::December => first_of(self.year + 1, Month::January)?,
            m => first_of(self.year, m.next())?,
        };
        Ok((start, end))
    }
}

impl TryFrom<PeriodQuery> for Period {
    type Error = AppError;

    fn try_from(q: PeriodQuery) -> AppResult<Self> {
        Self::resolve(q.month, q.year)
    }
}

fn first_of(year: i32, month: Month) -> AppResult<Date> {
    Date::from_calendar_date(year, month, 1)
        .map_err(|e| AppError::validation(format!("invalid period: {e}")))
}
