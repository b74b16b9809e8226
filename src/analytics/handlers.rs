use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{dto::AnalyticsResult, services};
use crate::{
    auth::AuthUser,
    error::AppResult,
    period::{Period, PeriodQuery},
    state::AppState,
};

pub fn analytics_routes() -> Router<AppState> {
    Router::new().route("/analytics", get(get_analytics))
}

/// GET /analytics?month&year
#[instrument(skip(state, query), fields(user_id = %user.id, username = %user.username))]
pub async fn get_analytics(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> AppResult<Json<AnalyticsResult>> {
    let Query(query) = query?;
    let period = Period::try_from(query)?;
    Ok(Json(services::compute_analytics(&state, user.id, period).await?))
}
