use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgExecutor, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::period::Period;

/// One spending limit per user and calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub month: i32,
    pub year: i32,
}

impl Budget {
    pub async fn find(db: &PgPool, user_id: Uuid, period: Period) -> sqlx::Result<Option<Budget>> {
        sqlx::query_as::<_, Budget>(
            r#"
            SELECT id, user_id, amount, month, year
              FROM budgets
             WHERE user_id = $1 AND month = $2 AND year = $3
            "#,
        )
        .bind(user_id)
        .bind(period.month_number())
        .bind(period.year())
        .fetch_optional(db)
        .await
    }

    /// Insert the default record unless one exists. `None` means another writer got there first.
    pub async fn insert_default<'e, E: PgExecutor<'e>>(
        exec: E,
        user_id: Uuid,
        period: Period,
        amount: Decimal,
    ) -> sqlx::Result<Option<Budget>> {
        sqlx::query_as::<_, Budget>(
            r#"
            INSERT INTO budgets (user_id, amount, month, year)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, month, year) DO NOTHING
            RETURNING id, user_id, amount, month, year
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .bind(period.month_number())
        .bind(period.year())
        .fetch_optional(exec)
        .await
    }

    /// Read the period's budget, creating it with `default_amount` on first access.
    pub async fn get_or_create(
        db: &PgPool,
        user_id: Uuid,
        period: Period,
        default_amount: Decimal,
    ) -> sqlx::Result<Budget> {
        if let Some(b) = Self::find(db, user_id, period).await? {
            return Ok(b);
        }
        if let Some(b) = Self::insert_default(db, user_id, period, default_amount).await? {
            debug!(%user_id, month = b.month, year = b.year, "default budget created");
            return Ok(b);
        }
        // Lost the insert race: the winner's row is committed by now.
        Self::find(db, user_id, period)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn upsert(
        db: &PgPool,
        user_id: Uuid,
        period: Period,
        amount: Decimal,
    ) -> sqlx::Result<Budget> {
        sqlx::query_as::<_, Budget>(
            r#"
            INSERT INTO budgets (user_id, amount, month, year)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, month, year) DO UPDATE SET amount = EXCLUDED.amount
            RETURNING id, user_id, amount, month, year
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .bind(period.month_number())
        .bind(period.year())
        .fetch_one(db)
        .await
    }
}
