use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, RegisterRequest},
        jwt::JwtKeys,
        password::{hash_password_blocking, verify_password_blocking},
        repo_types::User,
    },
    budget::Budget,
    error::{is_unique_violation, AppError, AppResult},
    period::Period,
    state::AppState,
};

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Registration input after trimming and validation.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Registration {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = AppError;

    fn try_from(req: RegisterRequest) -> AppResult<Self> {
        let username = req.username.trim().to_owned();
        if username.is_empty() {
            return Err(AppError::validation("Username is required"));
        }
        if req.password.is_empty() {
            return Err(AppError::validation("Password is required"));
        }
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation("Password too short"));
        }
        let email = req
            .email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());
        if let Some(email) = &email {
            if !is_valid_email(email) {
                return Err(AppError::validation("Invalid email"));
            }
        }
        Ok(Self {
            username,
            password: req.password,
            email,
        })
    }
}

/// Creates the user and the default budget for the current month in one transaction.
///
/// Stricter than a bare insert: passwords need at least `MIN_PASSWORD_LEN`
/// characters and emails are trimmed and lower-cased before the uniqueness check.
pub async fn register(state: &AppState, req: RegisterRequest) -> AppResult<User> {
    let reg = Registration::try_from(req)?;
    let hash = hash_password_blocking(reg.password).await?;

    let mut tx = state.db.begin().await?;
    let user = match User::create_tx(&mut tx, &reg.username, reg.email.as_deref(), &hash).await {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            warn!(username = %reg.username, "username or email already registered");
            return Err(AppError::Conflict("Username or email already exists".into()));
        }
        Err(e) => return Err(e.into()),
    };
    Budget::insert_default(&mut *tx, user.id, Period::current(), state.config.default_budget)
        .await?;
    tx.commit().await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

pub async fn login(state: &AppState, req: LoginRequest) -> AppResult<LoginResponse> {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(AppError::validation("Username and password are required"));
    }

    let Some(user) = User::find_by_username(&state.db, username).await? else {
        warn!(%username, "login unknown username");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password_blocking(req.password, user.password_hash.clone()).await? {
        warn!(%username, user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = JwtKeys::from_ref(state).sign(user.id, &user.username)?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(LoginResponse {
        token,
        user_id: user.id,
        username: user.username,
    })
}
