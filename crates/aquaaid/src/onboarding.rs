//! First-run welcome flag keyed by device id, an explicit store-backed model
//! for what the original product kept in device-local storage.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use crate::engine::store::StoreError;

/// Persistence for the per-device welcome flag.
pub trait WelcomeFlagStore: Send + Sync {
    fn has_seen(&self, device_id: &str) -> Result<bool, StoreError>;
    /// Idempotent; acknowledging twice is not an error.
    fn mark_seen(&self, device_id: &str) -> Result<(), StoreError>;
}

/// Whether a device has dismissed the welcome screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WelcomeStatus {
    pub device_id: String,
    pub seen: bool,
}

/// Router builder exposing the welcome flag endpoints.
pub fn welcome_router<S>(store: Arc<S>) -> Router
where
    S: WelcomeFlagStore + 'static,
{
    Router::new()
        .route("/api/v1/welcome/:device_id", get(status_handler::<S>))
        .route("/api/v1/welcome/:device_id/ack", post(ack_handler::<S>))
        .with_state(store)
}

pub(crate) async fn status_handler<S>(
    State(store): State<Arc<S>>,
    Path(device_id): Path<String>,
) -> Response
where
    S: WelcomeFlagStore + 'static,
{
    match store.has_seen(&device_id) {
        Ok(seen) => {
            (StatusCode::OK, axum::Json(WelcomeStatus { device_id, seen })).into_response()
        }
        Err(error) => store_error_response(error),
    }
}

pub(crate) async fn ack_handler<S>(
    State(store): State<Arc<S>>,
    Path(device_id): Path<String>,
) -> Response
where
    S: WelcomeFlagStore + 'static,
{
    match store.mark_seen(&device_id) {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(WelcomeStatus {
                device_id,
                seen: true,
            }),
        )
            .into_response(),
        Err(error) => store_error_response(error),
    }
}

fn store_error_response(error: StoreError) -> Response {
    let status = match &error {
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::Rejected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    #[derive(Default)]
    struct MemoryFlags {
        seen: Mutex<HashSet<String>>,
    }

    impl WelcomeFlagStore for MemoryFlags {
        fn has_seen(&self, device_id: &str) -> Result<bool, StoreError> {
            Ok(self
                .seen
                .lock()
                .expect("welcome mutex poisoned")
                .contains(device_id))
        }

        fn mark_seen(&self, device_id: &str) -> Result<(), StoreError> {
            self.seen
                .lock()
                .expect("welcome mutex poisoned")
                .insert(device_id.to_string());
            Ok(())
        }
    }

    async fn status_of(router: &Router, device_id: &str) -> Value {
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/welcome/{device_id}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json")
    }

    #[tokio::test]
    async fn ack_flips_the_flag_for_one_device_only() {
        let router = welcome_router(Arc::new(MemoryFlags::default()));

        let status = status_of(&router, "device-1").await;
        assert_eq!(status["seen"], Value::Bool(false));

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/welcome/device-1/ack")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let status = status_of(&router, "device-1").await;
        assert_eq!(status["seen"], Value::Bool(true));
        assert_eq!(status["device_id"], "device-1");

        let status = status_of(&router, "device-2").await;
        assert_eq!(status["seen"], Value::Bool(false));
    }

    #[tokio::test]
    async fn acknowledging_twice_stays_ok() {
        let router = welcome_router(Arc::new(MemoryFlags::default()));

        for _ in 0..2 {
            let response = router
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/api/v1/welcome/device-1/ack")
                        .body(Body::empty())
                        .expect("request"),
                )
                .await
                .expect("router dispatch");
            assert_eq!(response.status(), StatusCode::OK);
        }
    }
}
