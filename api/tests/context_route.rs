//! `POST /` through the full router with fake providers.

use std::{
    future::Future,
    pin::Pin,
    sync::{
        Arc,
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use api::{core::app_state::AppState, router};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use vector_index::{EmbeddingsProvider, IndexError, IndexMatch, VectorSearch};

const TOKEN: &str = "secret123";

#[derive(Default)]
struct FakeEmbedder {
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
    fail: bool,
}

impl EmbeddingsProvider for FakeEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(text.to_string());
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                Err(IndexError::Decode("embedding provider down".into()))
            } else {
                Ok(vec![0.0; 1536])
            }
        })
    }
}

struct FakeIndex {
    calls: AtomicUsize,
    last_top_k: AtomicUsize,
    matches: Vec<IndexMatch>,
}

impl FakeIndex {
    fn with(matches: Vec<Value>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last_top_k: AtomicUsize::new(0),
            matches: matches
                .into_iter()
                .map(|m| serde_json::from_value(m).unwrap())
                .collect(),
        }
    }
}

impl VectorSearch for FakeIndex {
    fn query<'a>(
        &'a self,
        vector: Vec<f32>,
        top_k: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<IndexMatch>, IndexError>> + Send + 'a>> {
        assert_eq!(vector.len(), 1536);
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_top_k.store(top_k as usize, Ordering::SeqCst);
        Box::pin(async move { Ok(self.matches.clone()) })
    }
}

fn app(embedder: Arc<FakeEmbedder>, index: Arc<FakeIndex>) -> axum::Router {
    router(Arc::new(AppState {
        api_token: TOKEN.into(),
        top_k: 6,
        embedder,
        index,
    }))
}

fn post(auth: Option<&str>, body: &str) -> Request<Body> {
    let mut req = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(a) = auth {
        req = req.header(header::AUTHORIZATION, a);
    }
    req.body(Body::from(body.to_string())).unwrap()
}

async fn call(app: axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn widget_index() -> Arc<FakeIndex> {
    Arc::new(FakeIndex::with(vec![
        json!({ "id": "w1", "metadata": { "text": "A widget is a small part." }, "score": 0.1 }),
    ]))
}

#[tokio::test]
async fn returns_match_texts_for_valid_token() {
    let embedder = Arc::new(FakeEmbedder::default());
    let index = widget_index();

    let (status, body) = call(
        app(embedder.clone(), index.clone()),
        post(Some("Bearer secret123"), r#"{"query": "what is a widget?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["A widget is a small part."]));
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    assert_eq!(index.calls.load(Ordering::SeqCst), 1);
    assert_eq!(index.last_top_k.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn preserves_provider_order() {
    let embedder = Arc::new(FakeEmbedder::default());
    let index = Arc::new(FakeIndex::with(vec![
        json!({ "id": "c", "score": 0.9, "metadata": { "text": "third id, ranked first" } }),
        json!({ "id": "a", "score": 0.5, "metadata": { "text": "first id, ranked second" } }),
        json!({ "id": "b", "score": 0.1, "metadata": { "text": "ranked last", "page": 3 } }),
    ]));

    let (status, body) = call(
        app(embedder, index),
        post(Some("Bearer secret123"), r#"{"query": "order"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!(["third id, ranked first", "first id, ranked second", "ranked last"])
    );
}

#[tokio::test]
async fn repeated_calls_are_identical() {
    let embedder = Arc::new(FakeEmbedder::default());
    let index = widget_index();

    let first = call(
        app(embedder.clone(), index.clone()),
        post(Some("Bearer secret123"), r#"{"query": "what is a widget?"}"#),
    )
    .await;
    let second = call(
        app(embedder, index),
        post(Some("Bearer secret123"), r#"{"query": "what is a widget?"}"#),
    )
    .await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn basic_scheme_is_rejected_without_provider_calls() {
    let embedder = Arc::new(FakeEmbedder::default());
    let index = widget_index();

    let (status, body) = call(
        app(embedder.clone(), index.clone()),
        post(Some("Basic secret123"), r#"{"query": "what is a widget?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "detail": "Invalid authentication scheme" }));
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(index.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn wrong_token_is_rejected_without_provider_calls() {
    let embedder = Arc::new(FakeEmbedder::default());
    let index = widget_index();

    let (status, body) = call(
        app(embedder.clone(), index.clone()),
        post(Some("Bearer nope"), r#"{"query": "q"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "detail": "Invalid token" }));
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(index.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_header_is_rejected_without_provider_calls() {
    let embedder = Arc::new(FakeEmbedder::default());
    let index = widget_index();

    let (status, body) = call(
        app(embedder.clone(), index.clone()),
        post(None, r#"{"query": "q"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "detail": "Not authenticated" }));
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn auth_is_checked_before_the_body() {
    let embedder = Arc::new(FakeEmbedder::default());

    let (status, _) = call(
        app(embedder.clone(), widget_index()),
        post(Some("Bearer nope"), r#"{"nope": 1}"#),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn lowercase_bearer_scheme_is_accepted() {
    let (status, _) = call(
        app(Arc::new(FakeEmbedder::default()), widget_index()),
        post(Some("bearer secret123"), r#"{"query": "q"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn query_reaches_the_embedder_unchanged() {
    for query in ["  padded widget  ", "   ", "tab\there\n"] {
        let embedder = Arc::new(FakeEmbedder::default());
        let body = json!({ "query": query }).to_string();

        let (status, _) = call(
            app(embedder.clone(), widget_index()),
            post(Some("Bearer secret123"), &body),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "query: {query:?}");
        assert_eq!(*embedder.seen.lock().unwrap(), vec![query.to_string()]);
    }
}

#[tokio::test]
async fn malformed_bodies_are_unprocessable() {
    for body in [
        r#"{}"#,
        r#"{"query": 42}"#,
        r#"{"query": null}"#,
        r#"{"query": "#,
        r#"{"query": ""}"#,
    ] {
        let embedder = Arc::new(FakeEmbedder::default());
        let (status, json_body) = call(
            app(embedder.clone(), widget_index()),
            post(Some("Bearer secret123"), body),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body: {body}");
        assert!(json_body["detail"].is_string(), "body: {body}");
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0, "body: {body}");
    }
}

#[tokio::test]
async fn missing_text_metadata_is_a_server_error() {
    let index = Arc::new(FakeIndex::with(vec![
        json!({ "id": "1", "score": 0.1, "metadata": { "text": "ok" } }),
        json!({ "id": "2", "score": 0.2, "metadata": { "title": "no text" } }),
    ]));

    let (status, body) = call(
        app(Arc::new(FakeEmbedder::default()), index),
        post(Some("Bearer secret123"), r#"{"query": "q"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "detail": "Internal Server Error" }));
}

#[tokio::test]
async fn embedding_failure_skips_search_and_is_a_server_error() {
    let embedder = Arc::new(FakeEmbedder {
        fail: true,
        ..Default::default()
    });
    let index = widget_index();

    let (status, _) = call(
        app(embedder.clone(), index.clone()),
        post(Some("Bearer secret123"), r#"{"query": "q"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    assert_eq!(index.calls.load(Ordering::SeqCst), 0);
}
