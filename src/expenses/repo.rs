use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::repo_types::{Expense, ExpenseFilter, NewExpense};

const EXPENSE_COLUMNS: &str = "id, user_id, description, amount, category, date, created_at";

/// Owned rows matching every present filter, newest date first.
fn list_query(user_id: Uuid, filter: &ExpenseFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
    qb.push(EXPENSE_COLUMNS);
    qb.push(" FROM expenses WHERE user_id = ").push_bind(user_id);
    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(from) = filter.from_date {
        qb.push(" AND date >= ").push_bind(from);
    }
    if let Some(to) = filter.to_date {
        qb.push(" AND date <= ").push_bind(to);
    }
    qb.push(" ORDER BY date DESC, created_at DESC, id DESC");
    qb
}

impl Expense {
    pub async fn list(db: &PgPool, user_id: Uuid, filter: &ExpenseFilter) -> sqlx::Result<Vec<Expense>> {
        list_query(user_id, filter)
            .build_query_as::<Expense>()
            .fetch_all(db)
            .await
    }

    pub async fn create(db: &PgPool, user_id: Uuid, new: &NewExpense) -> sqlx::Result<Expense> {
        sqlx::query_as::<_, Expense>(&format!(
            r#"
            INSERT INTO expenses (user_id, description, amount, category, date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&new.description)
        .bind(new.amount)
        .bind(&new.category)
        .bind(new.date)
        .fetch_one(db)
        .await
    }

    /// Replace all editable fields. `None` when the id isn't owned by `user_id`.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        user_id: Uuid,
        new: &NewExpense,
    ) -> sqlx::Result<Option<Expense>> {
        sqlx::query_as::<_, Expense>(&format!(
            r#"
            UPDATE expenses
               SET description = $1, amount = $2, category = $3, date = $4
             WHERE id = $5 AND user_id = $6
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(&new.description)
        .bind(new.amount)
        .bind(&new.category)
        .bind(new.date)
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    /// `false` when nothing owned by `user_id` had that id.
    pub async fn delete(db: &PgPool, id: Uuid, user_id: Uuid) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
