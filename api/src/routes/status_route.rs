//! GET / — liveness line for humans and load balancers.

use axum::Json;
use serde::Serialize;

/// Response payload for `GET /`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Handler: GET /
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "AI Tutor Backend is running",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::app_state::AppState, router};
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use std::{path::PathBuf, sync::Arc};
    use tower::util::ServiceExt;
    use tutor_core::ContextRetriever;

    #[tokio::test]
    async fn reports_running_status() {
        let Json(body) = status().await;
        assert_eq!(body.status, "AI Tutor Backend is running");
    }

    #[tokio::test]
    async fn root_route_answers_ok_with_status_field() {
        let state = Arc::new(AppState {
            generator: None,
            retriever: ContextRetriever::disabled(),
            max_tokens: 150,
            static_dir: PathBuf::from("static"),
        });
        let response = router(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "AI Tutor Backend is running");
    }
}
