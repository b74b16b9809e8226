use sqlx::PgPool;
use uuid::Uuid;

/// Insert a bare user row; the hash is never checked by repo tests.
pub async fn seed_user(db: &PgPool, username: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (username, password_hash) VALUES ($1, 'x') RETURNING id",
    )
    .bind(username)
    .fetch_one(db)
    .await
    .expect("seed user")
}
