use std::net::SocketAddr;
use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use crate::state::AppState;
use crate::{analytics, auth, budget, expenses};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest("/api",
              Router::new()
                  .merge(auth::router())
                  .merge(budget::router())
                  .merge(expenses::router())
                  .merge(analytics::router())
                  .route("/health", get(|| async { "ok" }))
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
        .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::JwtKeys;
    use axum::{
        body::Body,
        extract::FromRef,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app() -> Router {
        build_app(AppState::fake())
    }

    fn token() -> String {
        JwtKeys::from_ref(&AppState::fake())
            .sign(Uuid::new_v4(), "tester")
            .unwrap()
    }

    async fn send(req: Request<Body>) -> (StatusCode, Value) {
        let res = app().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn authed(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token()));
        match body {
            Some(v) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(v.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn health_is_public() {
        let res = app()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        for (method, uri) in [
            (Method::GET, "/api/me"),
            (Method::GET, "/api/budget"),
            (Method::PUT, "/api/budget"),
            (Method::GET, "/api/expenses"),
            (Method::POST, "/api/expenses"),
            (Method::PUT, "/api/expenses/00000000-0000-0000-0000-000000000000"),
            (Method::DELETE, "/api/expenses/00000000-0000-0000-0000-000000000000"),
            (Method::GET, "/api/analytics"),
        ] {
            let req = Request::builder().method(method.clone()).uri(uri).body(Body::empty()).unwrap();
            let (status, body) = send(req).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(body["error"], "Authentication required");
        }
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_unauthenticated() {
        let req = Request::get("/api/analytics")
            .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn bad_token_is_forbidden() {
        let req = Request::get("/api/analytics")
            .header(header::AUTHORIZATION, "Bearer not.a.jwt")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_forbidden() {
        let other = JwtKeys::from(&crate::config::JwtConfig {
            secret: "someone-else".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
        });
        let forged = other.sign(Uuid::new_v4(), "mallory").unwrap();
        let req = Request::get("/api/expenses")
            .header(header::AUTHORIZATION, format!("Bearer {forged}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn analytics_rejects_invalid_month() {
        let (status, body) = send(authed(Method::GET, "/api/analytics?month=13&year=2024", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "month must be between 1 and 12");
    }

    #[tokio::test]
    async fn budget_get_rejects_non_numeric_month() {
        let (status, body) = send(authed(Method::GET, "/api/budget?month=may", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn budget_update_validates_amount() {
        let (status, body) = send(authed(
            Method::PUT,
            "/api/budget",
            Some(serde_json::json!({ "month": 1, "year": 2025 })),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "amount is required");

        let (status, _) = send(authed(
            Method::PUT,
            "/api/budget",
            Some(serde_json::json!({ "amount": -10, "month": 1, "year": 2025 })),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_expense_requires_all_fields() {
        let (status, body) = send(authed(
            Method::POST,
            "/api/expenses",
            Some(serde_json::json!({ "description": "Lunch", "amount": 12.5 })),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "All fields are required");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let req = Request::post("/api/expenses")
            .header(header::AUTHORIZATION, format!("Bearer {}", token()))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn update_with_non_uuid_id_is_not_found() {
        let (status, body) = send(authed(
            Method::PUT,
            "/api/expenses/42",
            Some(serde_json::json!({
                "description": "Lunch", "amount": 12.5, "category": "Food", "date": "2024-12-01"
            })),
        ))
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Expense not found");
    }

    #[tokio::test]
    async fn delete_with_non_uuid_id_is_not_found() {
        let (status, _) = send(authed(Method::DELETE, "/api/expenses/abc", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_rejects_malformed_date_filter() {
        let (status, body) = send(authed(Method::GET, "/api/expenses?fromDate=12/01/2024", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("fromDate"));
    }

    #[tokio::test]
    async fn register_validates_before_touching_the_store() {
        let req = Request::post("/api/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::json!({ "username": "", "password": "long-enough" }).to_string()))
            .unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Username is required");
    }

    #[tokio::test]
    async fn login_requires_credentials() {
        let req = Request::post("/api/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Username and password are required");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn foreign_expense_is_not_found_over_http(pool: sqlx::PgPool) {
        let state = AppState { db: pool.clone(), ..AppState::fake() };
        let keys = JwtKeys::from_ref(&state);
        let alice = crate::test_utils::seed_user(&pool, "alice").await;
        let mallory = crate::test_utils::seed_user(&pool, "mallory").await;
        let expense = serde_json::json!({
            "description": "Lunch", "amount": 12.5, "category": "Food", "date": "2024-12-01"
        });

        let call = |method: Method, uri: String, user: Uuid, name: &str, body: Option<&Value>| {
            let builder = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", keys.sign(user, name).unwrap()));
            let req = match body {
                Some(v) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(v.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            build_app(state.clone()).oneshot(req)
        };

        let res = call(Method::POST, "/api/expenses".into(), alice, "alice", Some(&expense))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let created: Value = serde_json::from_slice(&bytes).unwrap();
        let uri = format!("/api/expenses/{}", created["id"].as_str().unwrap());

        let res = call(Method::PUT, uri.clone(), mallory, "mallory", Some(&expense)).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let res = call(Method::DELETE, uri.clone(), mallory, "mallory", None).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = call(Method::DELETE, uri, alice, "alice", None).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
