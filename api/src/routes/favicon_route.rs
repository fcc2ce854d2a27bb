//! GET /favicon.ico — serves the icon from the static directory.

use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
};

/// Handler: GET /favicon.ico
///
/// Reads the icon from disk on every request; the file is tiny and can be
/// swapped without a restart.
pub async fn favicon(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let path = state.static_dir.join("favicon.ico");
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::NotFound)?;
    Ok((
        [(header::CONTENT_TYPE, "image/vnd.microsoft.icon")],
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use std::path::Path;
    use tower::util::ServiceExt;
    use tutor_core::ContextRetriever;

    fn state_with_static_dir(dir: &Path) -> Arc<AppState> {
        Arc::new(AppState {
            generator: None,
            retriever: ContextRetriever::disabled(),
            max_tokens: 150,
            static_dir: dir.to_path_buf(),
        })
    }

    #[tokio::test]
    async fn serves_icon_with_mime_type() {
        let dir = tempfile::tempdir().unwrap();
        let icon = [0x00u8, 0x00, 0x01, 0x00];
        std::fs::write(dir.path().join("favicon.ico"), icon).unwrap();

        let app = router(state_with_static_dir(dir.path()));
        let response = app
            .oneshot(Request::builder().uri("/favicon.ico").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "image/vnd.microsoft.icon"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes.as_ref(), icon);
    }

    #[tokio::test]
    async fn missing_icon_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state_with_static_dir(dir.path()));
        let response = app
            .oneshot(Request::builder().uri("/favicon.ico").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
