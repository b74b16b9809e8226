use std::str::FromStr;

use anyhow::Context;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::budget::DEFAULT_BUDGET_AMOUNT;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    /// Amount given to a budget period the first time it is touched.
    pub default_budget: Decimal,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "spendwise".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "spendwise-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES").unwrap_or(60 * 24),
        };
        let default_budget = match std::env::var("DEFAULT_BUDGET_AMOUNT") {
            Ok(raw) => Decimal::from_str(raw.trim())
                .with_context(|| format!("DEFAULT_BUDGET_AMOUNT is not a decimal: {raw}"))?,
            Err(_) => DEFAULT_BUDGET_AMOUNT,
        };
        anyhow::ensure!(
            !default_budget.is_sign_negative(),
            "DEFAULT_BUDGET_AMOUNT must not be negative"
        );

        Ok(Self {
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS").unwrap_or(10),
            jwt,
            default_budget,
        })
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}
