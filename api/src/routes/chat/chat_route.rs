//! POST /chat — answers a question, optionally grounded in retrieved context.

use std::sync::Arc;
use std::time::Instant;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::{debug, error, info};

use tutor_core::build_prompt;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::chat::chat_request::{ChatRequest, ChatResponse},
};

/// Handler: POST /chat
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/chat \
///   -H 'content-type: application/json' \
///   -d '{"question":"What is the Pythagorean theorem?"}'
/// ```
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    info!("received chat request");

    // The model gate comes first: a broken payload must not mask a dead
    // backend.
    let generator = state
        .generator
        .as_ref()
        .ok_or(AppError::ModelUnavailable)?;

    let Json(body) = payload?;
    let question = body.question.trim();
    if question.is_empty() {
        return Err(AppError::BadRequest("Question is required.".into()));
    }

    debug!(
        preview = %question.chars().take(50).collect::<String>(),
        "processing question"
    );

    let context = state.retriever.get_context(question).await;
    let prompt = build_prompt(question, context.as_deref());

    let started = Instant::now();
    let answer = generator
        .generate(&prompt, state.max_tokens)
        .await
        .map_err(|err| {
            error!(error = %err, "model inference failed");
            AppError::Inference(err)
        })?;

    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        with_context = context.is_some(),
        "chat response generated"
    );

    Ok(Json(ChatResponse { response: answer }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use llm_service::{LlmError, TextGenerator};
    use std::future::Future;
    use std::path::PathBuf;
    use std::pin::Pin;
    use std::sync::Mutex;
    use tower::util::ServiceExt;
    use tutor_core::{ContextRetriever, ContextSource, RetrieveError};

    struct FixedGenerator(&'static str);

    impl TextGenerator for FixedGenerator {
        fn generate<'a>(
            &'a self,
            _prompt: &'a str,
            _max_tokens: u32,
        ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>> {
            Box::pin(async move { Ok(self.0.to_string()) })
        }
    }

    struct FailingGenerator;

    impl TextGenerator for FailingGenerator {
        fn generate<'a>(
            &'a self,
            _prompt: &'a str,
            _max_tokens: u32,
        ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>> {
            Box::pin(async { Err(LlmError::Decode("truncated response".into())) })
        }
    }

    struct RecordingGenerator {
        prompts: Mutex<Vec<String>>,
    }

    impl TextGenerator for RecordingGenerator {
        fn generate<'a>(
            &'a self,
            prompt: &'a str,
            _max_tokens: u32,
        ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Box::pin(async { Ok("ok".to_string()) })
        }
    }

    struct StaticSource(&'static str);

    impl ContextSource for StaticSource {
        fn fetch<'a>(
            &'a self,
            _question: &'a str,
            _limit: u64,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, RetrieveError>> + Send + 'a>>
        {
            let doc = self.0.to_string();
            Box::pin(async move { Ok(vec![doc]) })
        }
    }

    fn test_router(
        generator: Option<Arc<dyn TextGenerator>>,
        retriever: ContextRetriever,
    ) -> axum::Router {
        let state = Arc::new(AppState {
            generator,
            retriever,
            max_tokens: 150,
            static_dir: PathBuf::from("static"),
        });
        router(state)
    }

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn answers_with_model_response() {
        let app = test_router(
            Some(Arc::new(FixedGenerator("The answer is 4."))),
            ContextRetriever::disabled(),
        );
        let response = app
            .oneshot(chat_request(r#"{"question":"What is 2 + 2?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["response"], "The answer is 4.");
    }

    #[tokio::test]
    async fn missing_question_is_rejected() {
        let app = test_router(
            Some(Arc::new(FixedGenerator("unused"))),
            ContextRetriever::disabled(),
        );
        let response = app.oneshot(chat_request("{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Question is required.");
    }

    #[tokio::test]
    async fn whitespace_question_is_rejected() {
        let app = test_router(
            Some(Arc::new(FixedGenerator("unused"))),
            ContextRetriever::disabled(),
        );
        let response = app
            .oneshot(chat_request(r#"{"question":"   "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Question is required.");
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let app = test_router(
            Some(Arc::new(FixedGenerator("unused"))),
            ContextRetriever::disabled(),
        );
        let response = app.oneshot(chat_request("not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_content_type_is_rejected() {
        let app = test_router(
            Some(Arc::new(FixedGenerator("unused"))),
            ContextRetriever::disabled(),
        );
        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .body(Body::from(r#"{"question":"What is 2 + 2?"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_model_answers_unavailable_even_for_bad_payload() {
        let app = test_router(None, ContextRetriever::disabled());
        let response = app.oneshot(chat_request("not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(
            json["error"],
            "AI model is not loaded. Please check server logs."
        );
    }

    #[tokio::test]
    async fn inference_failure_maps_to_internal_error() {
        let app = test_router(
            Some(Arc::new(FailingGenerator)),
            ContextRetriever::disabled(),
        );
        let response = app
            .clone()
            .oneshot(chat_request(r#"{"question":"What is entropy?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(
            json["error"],
            "Model inference failed. Please try again with a shorter question."
        );

        // A failed generation is terminal for its request only.
        let next = app
            .oneshot(chat_request(r#"{"question":"What is entropy?"}"#))
            .await
            .unwrap();
        assert_eq!(next.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn retrieved_context_lands_in_prompt() {
        let recorder = Arc::new(RecordingGenerator {
            prompts: Mutex::new(Vec::new()),
        });
        let generator: Arc<dyn TextGenerator> = recorder.clone();
        let retriever = ContextRetriever::new(
            Arc::new(StaticSource("Water boils at 100 degrees Celsius at sea level.")),
            1,
        );

        let app = test_router(Some(generator), retriever);
        let response = app
            .oneshot(chat_request(r#"{"question":"Why does water boil?"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let prompts = recorder.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        let prompt = &prompts[0];
        let context = prompt.find("Relevant Context:").unwrap();
        let doc = prompt
            .find("Water boils at 100 degrees Celsius at sea level.")
            .unwrap();
        let question = prompt.find("Question: Why does water boil?").unwrap();
        assert!(context < doc);
        assert!(doc < question);
        assert!(prompt.ends_with("Answer:"));
    }

    #[tokio::test]
    async fn question_without_context_builds_bare_prompt() {
        let recorder = Arc::new(RecordingGenerator {
            prompts: Mutex::new(Vec::new()),
        });
        let generator: Arc<dyn TextGenerator> = recorder.clone();

        let app = test_router(Some(generator), ContextRetriever::disabled());
        let response = app
            .oneshot(chat_request(r#"{"question":"What is a prime number?"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let prompts = recorder.prompts.lock().unwrap();
        assert!(!prompts[0].contains("Relevant Context:"));
        assert!(prompts[0].contains("Question: What is a prime number?"));
    }
}
