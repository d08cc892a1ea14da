//! HTTP surface under `/api/v1`.
//!
//! Health and login are public; everything else sits behind the session
//! middleware. Role checks live in the handlers themselves.

mod auth;
mod error;
mod executions;
mod faqs;
mod health;
mod leads;
mod maintenance;
mod metrics;
mod model_pricing;
mod users;

pub use error::{ApiError, ErrorResponse};

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::{AppState, middleware::require_session};

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/password", put(auth::change_password))
        .route("/metrics", get(metrics::summary))
        .route("/executions", get(executions::list))
        .route("/leads", get(leads::list))
        .route("/faqs", get(faqs::list))
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/{id}",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route(
            "/model-pricing",
            get(model_pricing::list).put(model_pricing::upsert),
        )
        .route("/maintenance/purge", post(maintenance::purge))
        .route("/maintenance/factory-reset", post(maintenance::factory_reset))
        .route("/maintenance/seed-demo", post(maintenance::seed_demo))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let api = Router::new()
        .route("/health", get(health::health))
        .route("/auth/login", post(auth::login))
        .merge(protected);

    Router::new().nest("/api/v1", api).with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{
        AppState,
        auth::password,
        config::AppConfig,
        db::DbPool,
        db::tests::harness::{create_sqlite_pool, run_sqlite_migrations},
        models::{CreateUserRecord, Role},
    };

    async fn test_state() -> AppState {
        let pool = create_sqlite_pool().await;
        run_sqlite_migrations(&pool).await;
        AppState::new(Arc::new(DbPool::from_sqlite(pool)), AppConfig::default())
    }

    async fn create_user(state: &AppState, email: &str, pass: &str, role: Role) {
        state
            .db
            .users()
            .create(CreateUserRecord {
                email: email.to_string(),
                password_hash: password::hash_password(pass).expect("hash"),
                name: "Test User".to_string(),
                role,
            })
            .await
            .expect("create user");
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let state = test_state().await;
        let app = super::router(state);

        let response = app
            .oneshot(
                Request::get("/api/v1/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["database"], true);
    }

    #[tokio::test]
    async fn test_protected_route_without_token_is_unauthorized() {
        let state = test_state().await;
        let app = super::router(state);

        let response = app
            .oneshot(
                Request::get("/api/v1/executions")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["code"], "unauthorized");
    }

    #[tokio::test]
    async fn test_login_then_me() {
        let state = test_state().await;
        create_user(&state, "ops@example.com", "hunter2hunter2", Role::Editor).await;
        let app = super::router(state);

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"email":"ops@example.com","password":"hunter2hunter2"}"#,
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let token = json["token"].as_str().expect("token").to_string();
        assert_eq!(json["user"]["role"], "editor");

        let response = app
            .oneshot(
                Request::get("/api/v1/auth/me")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["email"], "ops@example.com");
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let state = test_state().await;
        create_user(&state, "ops@example.com", "hunter2hunter2", Role::Admin).await;
        let app = super::router(state);

        let response = app
            .oneshot(
                Request::post("/api/v1/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"email":"ops@example.com","password":"wrong-password"}"#,
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_viewer_cannot_reach_admin_surface() {
        let state = test_state().await;
        create_user(&state, "viewer@example.com", "hunter2hunter2", Role::Viewer).await;

        let user = state
            .db
            .users()
            .get_by_email("viewer@example.com")
            .await
            .expect("query")
            .expect("user");
        let session = state.sessions.create(user.id, user.role);
        let app = super::router(state);

        let response = app
            .oneshot(
                Request::post("/api/v1/maintenance/factory-reset")
                    .header(header::AUTHORIZATION, format!("Bearer {}", session.token))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = body_json(response).await;
        assert_eq!(json["code"], "forbidden");
    }

    #[tokio::test]
    async fn test_metrics_requires_valid_range() {
        let state = test_state().await;
        create_user(&state, "viewer@example.com", "hunter2hunter2", Role::Viewer).await;

        let user = state
            .db
            .users()
            .get_by_email("viewer@example.com")
            .await
            .expect("query")
            .expect("user");
        let session = state.sessions.create(user.id, user.role);
        let app = super::router(state);

        let response = app
            .oneshot(
                Request::get("/api/v1/metrics?start=2026-02-01&end=2026-01-01")
                    .header(header::AUTHORIZATION, format!("Bearer {}", session.token))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "validation_error");
    }

    #[tokio::test]
    async fn test_admin_can_upsert_pricing() {
        let state = test_state().await;
        create_user(&state, "admin@example.com", "hunter2hunter2", Role::Admin).await;

        let user = state
            .db
            .users()
            .get_by_email("admin@example.com")
            .await
            .expect("query")
            .expect("user");
        let session = state.sessions.create(user.id, user.role);
        let app = super::router(state);

        let response = app
            .oneshot(
                Request::put("/api/v1/model-pricing")
                    .header(header::AUTHORIZATION, format!("Bearer {}", session.token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"model":"gpt-4o","provider":"openai","input_per_1m_tokens":250000,"output_per_1m_tokens":1000000}"#,
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["input_per_1m_tokens"], 250000);
    }

    #[tokio::test]
    async fn test_self_deletion_is_rejected() {
        let state = test_state().await;
        create_user(&state, "admin@example.com", "hunter2hunter2", Role::Admin).await;

        let user = state
            .db
            .users()
            .get_by_email("admin@example.com")
            .await
            .expect("query")
            .expect("user");
        let session = state.sessions.create(user.id, user.role);
        let app = super::router(state);

        let response = app
            .oneshot(
                Request::delete(format!("/api/v1/users/{}", user.id))
                    .header(header::AUTHORIZATION, format!("Bearer {}", session.token))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "validation_error");
    }
}
