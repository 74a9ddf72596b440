//! HTTP handlers and route configuration.

mod health;
mod reflections;
mod task_logs;
mod tasks;

use actix_web::web;
use uuid::Uuid;

use carelog_core::limiter::{RateLimitConfig, RateLimitError};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Task routes
            .service(
                web::scope("/taken")
                    .route("", web::post().to(tasks::create))
                    .route("", web::get().to(tasks::list))
                    .route("/{id}", web::get().to(tasks::get))
                    .route("/{id}/logs", web::get().to(task_logs::list_for_task)),
            )
            // Task log routes
            .service(
                web::scope("/task-logs")
                    .route("", web::post().to(task_logs::create))
                    .route("/{id}", web::put().to(task_logs::update)),
            )
            // Reflection routes
            .service(
                web::scope("/reflecties")
                    .route("", web::post().to(reflections::create))
                    .route("", web::get().to(reflections::list))
                    .route("/{id}", web::put().to(reflections::update)),
            ),
    );
}

/// Check the caller's quota for one operation, keyed `{operation}_{user_id}`.
///
/// Quota exhaustion maps to a 429 through `AppError::RateLimited`. A counter
/// store failure fails open: losing abuse protection briefly beats failing
/// every write while Redis hiccups.
pub(crate) async fn enforce_quota(
    state: &AppState,
    operation: &str,
    user_id: Uuid,
    quota: &RateLimitConfig,
) -> AppResult<()> {
    let key = format!("{operation}_{user_id}");
    match state.limiter.check(&key, quota).await {
        Ok(decision) if decision.allowed => Ok(()),
        Ok(decision) => {
            tracing::warn!(key = %key, "rate limit exceeded");
            Err(AppError::RateLimited(decision))
        }
        Err(RateLimitError::Store(e)) => {
            tracing::error!(key = %key, error = %e, "counter store unavailable, failing open");
            Ok(())
        }
        Err(e @ RateLimitError::InvalidConfig(_)) => Err(AppError::Internal(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Quotas;
    use actix_web::{App, test, web::Data};
    use serde_json::{Value, json};

    macro_rules! test_app {
        ($quotas:expr) => {
            test::init_service(
                App::new()
                    .app_data(Data::new(AppState::in_memory($quotas)))
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn create_log_returns_annotation_referencing_task() {
        let app = test_app!(Quotas::default());
        let user = Uuid::new_v4();

        let req = test::TestRequest::post()
            .uri("/api/taken")
            .insert_header(("X-User-Id", user.to_string()))
            .set_json(json!({ "titel": "Wandelen" }))
            .to_request();
        let task: Value = test::call_and_read_body_json(&app, req).await;
        let task_id = task["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri("/api/task-logs")
            .insert_header(("X-User-Id", user.to_string()))
            .set_json(json!({
                "taak_id": task_id,
                "pijn_score": 18,
                "vermoeidheid_score": 18,
                "energie_voor": 20,
                "energie_na": 5,
                "duur_minuten": 45
            }))
            .to_request();
        let log: Value = test::call_and_read_body_json(&app, req).await;

        let annotation = log["annotatie"].as_str().unwrap();
        assert!(annotation.contains("Wandelen"));
        assert!(annotation.contains("kortere sessies"));
    }

    #[actix_web::test]
    async fn exhausted_write_quota_returns_429_with_headers() {
        let quotas = Quotas {
            write: RateLimitConfig::per_minute(1),
            ..Quotas::default()
        };
        let app = test_app!(quotas);
        let user = Uuid::new_v4();

        let first = test::TestRequest::post()
            .uri("/api/taken")
            .insert_header(("X-User-Id", user.to_string()))
            .set_json(json!({ "titel": "Koken" }))
            .to_request();
        let resp = test::call_service(&app, first).await;
        assert_eq!(resp.status(), 201);

        let second = test::TestRequest::post()
            .uri("/api/taken")
            .insert_header(("X-User-Id", user.to_string()))
            .set_json(json!({ "titel": "Koken" }))
            .to_request();
        let resp = test::call_service(&app, second).await;
        assert_eq!(resp.status(), 429);
        assert!(resp.headers().contains_key("Retry-After"));
        assert_eq!(resp.headers().get("X-RateLimit-Limit").unwrap(), "1");
        assert_eq!(resp.headers().get("X-RateLimit-Remaining").unwrap(), "0");
        assert!(resp.headers().contains_key("X-RateLimit-Reset"));

        // Another user still gets through.
        let other = Uuid::new_v4();
        let req = test::TestRequest::post()
            .uri("/api/taken")
            .insert_header(("X-User-Id", other.to_string()))
            .set_json(json!({ "titel": "Koken" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
    }

    #[actix_web::test]
    async fn missing_user_header_is_unauthorized() {
        let app = test_app!(Quotas::default());

        let req = test::TestRequest::post()
            .uri("/api/taken")
            .set_json(json!({ "titel": "Wandelen" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn malformed_score_does_not_fail_the_write() {
        let app = test_app!(Quotas::default());
        let user = Uuid::new_v4();

        let req = test::TestRequest::post()
            .uri("/api/taken")
            .insert_header(("X-User-Id", user.to_string()))
            .set_json(json!({ "titel": "Opdracht lezen", "taak_type": "opdracht" }))
            .to_request();
        let task: Value = test::call_and_read_body_json(&app, req).await;
        let task_id = task["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri("/api/task-logs")
            .insert_header(("X-User-Id", user.to_string()))
            .set_json(json!({
                "taak_id": task_id,
                "pijn_score": "not-a-number"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["pijn_score"].is_null());
        assert!(!body["annotatie"].as_str().unwrap().is_empty());
    }
}
