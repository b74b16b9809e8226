use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::dto::CategoryTotal;

/// Per-category sums over `[start, end)`, in first-seen order.
pub async fn category_breakdown(
    db: &PgPool,
    user_id: Uuid,
    start: Date,
    end: Date,
) -> sqlx::Result<Vec<CategoryTotal>> {
    sqlx::query_as::<_, CategoryTotal>(
        r#"
        SELECT category, SUM(amount) AS amount
          FROM expenses
         WHERE user_id = $1 AND date >= $2 AND date < $3
         GROUP BY category
         ORDER BY MIN(date), MIN(created_at), category
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
}
