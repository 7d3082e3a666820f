pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::journey::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Soft-skills journey: catalog is public, progress is premium-only
        .route("/api/v1/journey/tasks", get(handlers::handle_list_tasks))
        .route("/api/v1/journey/tasks/:day", get(handlers::handle_get_task))
        .route("/api/v1/journey", get(handlers::handle_get_journey))
        .route(
            "/api/v1/journey/complete",
            post(handlers::handle_complete_day),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::clock::fixed::FixedClock;
    use crate::journey::store::memory::InMemoryStore;
    use crate::journey::{Catalog, JourneyRules};

    struct Harness {
        store: Arc<InMemoryStore>,
        clock: Arc<FixedClock>,
        router: Router,
    }

    fn harness() -> Harness {
        let store = Arc::new(InMemoryStore::default());
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap(),
        ));
        let state = AppState {
            progress: store.clone(),
            entitlements: store.clone(),
            catalog: Arc::new(Catalog::builtin().unwrap()),
            rules: JourneyRules::default(),
            clock: clock.clone(),
        };
        Harness {
            store,
            clock,
            router: build_router(state),
        }
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn complete_req(user: Uuid, day: u32) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/journey/complete")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "user_id": user, "day": day }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness();
        let (status, body) = send(&h.router, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_task_catalog_is_public() {
        let h = harness();
        let (status, body) = send(&h.router, get_req("/api/v1/journey/tasks")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 30);
        assert_eq!(body[0]["day"], 1);
        assert_eq!(body[0]["category"], "communication");

        let (status, body) = send(&h.router, get_req("/api/v1/journey/tasks/7")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["xp_reward"], 200);

        let (status, body) = send(&h.router, get_req("/api/v1/journey/tasks/31")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_journey_requires_premium() {
        let h = harness();
        let user = Uuid::new_v4();
        let (status, body) = send(
            &h.router,
            get_req(&format!("/api/v1/journey?user_id={user}")),
        )
        .await;
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(body["error"]["code"], "PREMIUM_REQUIRED");

        let (status, _) = send(&h.router, complete_req(user, 1)).await;
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert!(h.store.raw(user).await.is_none());
    }

    #[tokio::test]
    async fn test_nil_user_rejected() {
        let h = harness();
        let (status, body) = send(&h.router, complete_req(Uuid::nil(), 1)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_user_id_uses_error_envelope() {
        let h = harness();
        let (status, body) = send(&h.router, get_req("/api/v1/journey")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_non_numeric_task_day_uses_error_envelope() {
        let h = harness();
        let (status, body) = send(&h.router, get_req("/api/v1/journey/tasks/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_completion_body_uses_error_envelope() {
        let h = harness();
        let user = Uuid::new_v4();
        h.store.grant_premium(user).await;

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/journey/complete")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "user_id": user, "day": -1 }).to_string()))
            .unwrap();
        let (status, body) = send(&h.router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(h.store.raw(user).await.is_none());
    }

    #[tokio::test]
    async fn test_completion_without_json_content_type_uses_error_envelope() {
        let h = harness();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/journey/complete")
            .body(Body::from("user_id=x&day=1"))
            .unwrap();
        let (status, body) = send(&h.router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_complete_then_cooldown_then_next_day() {
        let h = harness();
        let user = Uuid::new_v4();
        h.store.grant_premium(user).await;

        let (status, body) = send(
            &h.router,
            get_req(&format!("/api/v1/journey?user_id={user}")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["days"][0]["status"], "available");
        assert_eq!(body["days"][1]["status"], "locked");

        let (status, body) = send(&h.router, complete_req(user, 1)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["progress"]["experience"], 100);
        assert_eq!(body["progress"]["current_day"], 2);
        assert_eq!(body["badges_awarded"], json!(["Iniciado"]));
        assert_eq!(body["leveled_up"], false);

        // Retried request for the same day must not double-credit.
        let (status, body) = send(&h.router, complete_req(user, 1)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "PRECONDITION_FAILED");

        h.clock.advance(Duration::hours(1));
        let (_, body) = send(
            &h.router,
            get_req(&format!("/api/v1/journey?user_id={user}")),
        )
        .await;
        assert_eq!(body["days"][1]["status"], "cooldown");
        assert_eq!(body["days"][1]["cooldown_remaining"], "23h 0m");

        let (status, _) = send(&h.router, complete_req(user, 2)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        h.clock.advance(Duration::hours(24));
        let (status, body) = send(&h.router, complete_req(user, 2)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["progress"]["experience"], 220);
        assert_eq!(body["progress"]["completed_days"], json!([1, 2]));
        assert_eq!(body["progress"]["streak"], 2);

        let stored = h.store.raw(user).await.unwrap();
        assert_eq!(stored["currentDay"], 3);
        assert_eq!(stored["experience"], 220);
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistence_failure_surfaces_as_unavailable() {
        let h = harness();
        let user = Uuid::new_v4();
        h.store.grant_premium(user).await;
        h.store.fail_next_saves(10);

        let (status, body) = send(&h.router, complete_req(user, 1)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "PERSISTENCE_ERROR");
        assert!(h.store.raw(user).await.is_none());
    }
}
