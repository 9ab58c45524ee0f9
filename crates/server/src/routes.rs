//! Route handlers.
//!
//! Every endpoint validates its input before any remote call is made, and
//! maps upstream failures to the generic per-endpoint message defined here.

use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tutor_knowledge::Retriever;
use tutor_llm::{ChatClient, ChatRequest};
use tutor_prompt::{build_answer_prompt, build_example_prompt, build_explanation_prompt};

use crate::error::ApiError;
use crate::AppState;

/// Response length caps, matching the original endpoints.
const EXAMPLE_MAX_TOKENS: u32 = 150;
const EXPLAIN_MAX_TOKENS: u32 = 250;
const ANSWER_MAX_TOKENS: u32 = 500;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/get_definition", get(get_definition))
        .route("/generate_example", get(generate_example))
        .route("/explain_math", get(explain_math))
        .route("/ask", get(ask))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct TopicParams {
    topic: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryParams {
    query: Option<String>,
}

/// Treat absent and blank parameters the same way.
fn required(param: Option<String>, message: &str) -> Result<String, ApiError> {
    match param {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::bad_request(message)),
    }
}

/// `GET /`: the static front-end page.
async fn home() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

/// `GET /get_definition?topic=`: catalog lookup, never calls a remote
/// service.
async fn get_definition(
    State(state): State<AppState>,
    Query(params): Query<TopicParams>,
) -> Result<Json<Value>, ApiError> {
    let topic = required(params.topic, "Topic is required")?;

    match state.catalog.definition(&topic) {
        Some(definition) => Ok(Json(json!({ "definition": definition }))),
        None => {
            tracing::debug!(topic = %topic, "Definition lookup miss");
            Err(ApiError::not_found("Topic not found"))
        }
    }
}

/// `GET /generate_example?topic=`: example problem via the chat service.
async fn generate_example(
    State(state): State<AppState>,
    Query(params): Query<TopicParams>,
) -> Result<Json<Value>, ApiError> {
    let topic = required(params.topic, "Topic is required")?;

    let prompt = build_example_prompt(&topic)
        .map_err(|e| ApiError::upstream("/generate_example", "Failed to generate example", &e))?;

    let request = ChatRequest::new(prompt.user, &state.chat_model)
        .with_system(prompt.system)
        .with_max_tokens(EXAMPLE_MAX_TOKENS);

    match state.chat.respond(&request).await {
        Ok(response) => Ok(Json(json!({ "example": response.content }))),
        Err(e) => Err(ApiError::upstream(
            "/generate_example",
            "Failed to generate example",
            &e,
        )),
    }
}

/// `GET /explain_math?query=`: syllabus-gated explanation via the chat
/// service.
async fn explain_math(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Value>, ApiError> {
    let query = required(params.query, "Query is required")?;

    if !state.catalog.in_syllabus(&query) {
        return Err(ApiError::bad_request(
            "This topic is beyond the scope of this course.",
        ));
    }

    let prompt = build_explanation_prompt(&query)
        .map_err(|e| ApiError::upstream("/explain_math", "Failed to explain math concept", &e))?;

    let request = ChatRequest::new(prompt.user, &state.chat_model)
        .with_system(prompt.system)
        .with_max_tokens(EXPLAIN_MAX_TOKENS);

    match state.chat.respond(&request).await {
        Ok(response) => Ok(Json(json!({ "explanation": response.content }))),
        Err(e) => Err(ApiError::upstream(
            "/explain_math",
            "Failed to explain math concept",
            &e,
        )),
    }
}

/// `GET /ask?query=`: retrieval-augmented answer.
async fn ask(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Value>, ApiError> {
    let query = required(params.query, "Query is required")?;

    let context = state
        .retriever
        .retrieve(&query, state.top_k)
        .await
        .map_err(|e| ApiError::upstream("/ask", "Failed to answer question", &e))?;

    tracing::debug!(chunks = context.len(), "Retrieved context for query");

    let prompt = build_answer_prompt(&query, &context)
        .map_err(|e| ApiError::upstream("/ask", "Failed to answer question", &e))?;

    let request = ChatRequest::new(prompt.user, &state.chat_model)
        .with_system(prompt.system)
        .with_max_tokens(ANSWER_MAX_TOKENS);

    match state.chat.respond(&request).await {
        Ok(response) => Ok(Json(json!({ "answer": response.content }))),
        Err(e) => Err(ApiError::upstream("/ask", "Failed to answer question", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;
    use tutor_core::{AppConfig, AppError, AppResult};
    use tutor_knowledge::Retriever;
    use tutor_llm::MockChatClient;

    /// Retriever stub with a call counter.
    struct StubRetriever {
        texts: Vec<String>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl StubRetriever {
        fn with_texts(texts: Vec<&str>) -> Self {
            Self {
                texts: texts.into_iter().map(String::from).collect(),
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                texts: vec![],
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl Retriever for StubRetriever {
        async fn retrieve(&self, _query: &str, top_k: usize) -> AppResult<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::Llm("simulated embedding failure".to_string()));
            }
            Ok(self.texts.iter().take(top_k).cloned().collect())
        }
    }

    fn test_state(chat: Arc<MockChatClient>, retriever: Arc<StubRetriever>) -> AppState {
        AppState::new(
            &AppConfig::default(),
            chat,
            retriever,
            Catalog::default(),
        )
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_home_serves_page() {
        let chat = Arc::new(MockChatClient::replying("unused"));
        let retriever = Arc::new(StubRetriever::with_texts(vec![]));
        let router = router(test_state(chat, retriever));

        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_definition_known_topic() {
        let chat = Arc::new(MockChatClient::replying("unused"));
        let retriever = Arc::new(StubRetriever::with_texts(vec![]));
        let router = router(test_state(chat.clone(), retriever));

        let (status, body) = get_json(router, "/get_definition?topic=exponents").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["definition"].as_str().unwrap().contains("exponent"));
        // Catalog hits never reach the remote service
        assert_eq!(chat.call_count(), 0);
    }

    #[tokio::test]
    async fn test_get_definition_unknown_topic() {
        let chat = Arc::new(MockChatClient::replying("unused"));
        let retriever = Arc::new(StubRetriever::with_texts(vec![]));
        let router = router(test_state(chat.clone(), retriever));

        let (status, body) = get_json(router, "/get_definition?topic=calculus").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Topic not found");
        assert_eq!(chat.call_count(), 0);
    }

    #[tokio::test]
    async fn test_get_definition_missing_topic() {
        let chat = Arc::new(MockChatClient::replying("unused"));
        let retriever = Arc::new(StubRetriever::with_texts(vec![]));
        let router = router(test_state(chat, retriever));

        let (status, body) = get_json(router, "/get_definition").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Topic is required");
    }

    #[tokio::test]
    async fn test_generate_example_success() {
        let chat = Arc::new(MockChatClient::replying("Problem: 2x + 3 = 7"));
        let retriever = Arc::new(StubRetriever::with_texts(vec![]));
        let router = router(test_state(chat.clone(), retriever));

        let (status, body) = get_json(router, "/generate_example?topic=linear%20equations").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["example"], "Problem: 2x + 3 = 7");
        assert_eq!(chat.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_example_missing_topic_makes_no_remote_call() {
        let chat = Arc::new(MockChatClient::replying("unused"));
        let retriever = Arc::new(StubRetriever::with_texts(vec![]));
        let router = router(test_state(chat.clone(), retriever));

        let (status, body) = get_json(router, "/generate_example").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Topic is required");
        assert_eq!(chat.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_example_upstream_failure() {
        let chat = Arc::new(MockChatClient::failing());
        let retriever = Arc::new(StubRetriever::with_texts(vec![]));
        let router = router(test_state(chat, retriever));

        let (status, body) = get_json(router, "/generate_example?topic=fractions").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to generate example");
    }

    #[tokio::test]
    async fn test_explain_math_in_syllabus() {
        let chat = Arc::new(MockChatClient::replying("A slope measures steepness."));
        let retriever = Arc::new(StubRetriever::with_texts(vec![]));
        let router = router(test_state(chat, retriever));

        let (status, body) = get_json(router, "/explain_math?query=what%20are%20slopes").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["explanation"], "A slope measures steepness.");
    }

    #[tokio::test]
    async fn test_explain_math_out_of_scope_makes_no_remote_call() {
        let chat = Arc::new(MockChatClient::replying("unused"));
        let retriever = Arc::new(StubRetriever::with_texts(vec![]));
        let router = router(test_state(chat.clone(), retriever));

        let (status, body) = get_json(router, "/explain_math?query=quantum%20mechanics").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("beyond the scope"));
        assert_eq!(chat.call_count(), 0);
    }

    #[tokio::test]
    async fn test_explain_math_missing_query() {
        let chat = Arc::new(MockChatClient::replying("unused"));
        let retriever = Arc::new(StubRetriever::with_texts(vec![]));
        let router = router(test_state(chat, retriever));

        let (status, body) = get_json(router, "/explain_math").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Query is required");
    }

    #[tokio::test]
    async fn test_ask_uses_retrieved_context() {
        let chat = Arc::new(MockChatClient::replying("Whole numbers start at zero."));
        let retriever = Arc::new(StubRetriever::with_texts(vec![
            "Whole numbers are the counting numbers and zero",
        ]));
        let router = router(test_state(chat.clone(), retriever.clone()));

        let (status, body) = get_json(router, "/ask?query=what%20are%20whole%20numbers").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "Whole numbers start at zero.");
        assert_eq!(retriever.call_count(), 1);
        assert_eq!(chat.call_count(), 1);
    }

    #[tokio::test]
    async fn test_ask_missing_query_makes_no_remote_call() {
        let chat = Arc::new(MockChatClient::replying("unused"));
        let retriever = Arc::new(StubRetriever::with_texts(vec![]));
        let router = router(test_state(chat.clone(), retriever.clone()));

        let (status, body) = get_json(router, "/ask").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Query is required");
        assert_eq!(retriever.call_count(), 0);
        assert_eq!(chat.call_count(), 0);
    }

    #[tokio::test]
    async fn test_ask_retriever_failure_is_generic_500() {
        let chat = Arc::new(MockChatClient::replying("unused"));
        let retriever = Arc::new(StubRetriever::failing());
        let router = router(test_state(chat.clone(), retriever));

        let (status, body) = get_json(router, "/ask?query=inequalities").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to answer question");
        // The chat service is never reached when retrieval fails
        assert_eq!(chat.call_count(), 0);
    }

    #[tokio::test]
    async fn test_ask_chat_failure_is_generic_500() {
        let chat = Arc::new(MockChatClient::failing());
        let retriever = Arc::new(StubRetriever::with_texts(vec!["some context"]));
        let router = router(test_state(chat, retriever));

        let (status, body) = get_json(router, "/ask?query=polynomials").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to answer question");
    }

    #[tokio::test]
    async fn test_blank_parameter_treated_as_missing() {
        let chat = Arc::new(MockChatClient::replying("unused"));
        let retriever = Arc::new(StubRetriever::with_texts(vec![]));
        let router = router(test_state(chat.clone(), retriever));

        let (status, _) = get_json(router, "/generate_example?topic=%20%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(chat.call_count(), 0);
    }
}
