//! An in-process stand-in for the Gemini endpoint.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// A request the fake endpoint received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub api_key: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct FakeState {
    status: StatusCode,
    reply: Value,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// A running fake endpoint with `base_url` and the requests it has seen.
pub struct FakeGemini {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl FakeGemini {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

/// A `generateContent` response body whose first candidate says `text`.
pub fn text_reply(text: &str) -> Value {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": [{ "text": text }] } }
        ]
    })
}

/// Spawn a fake endpoint on a random port that answers every POST with
/// `status` and `reply`.
pub async fn spawn_fake_gemini(status: StatusCode, reply: Value) -> FakeGemini {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = FakeState {
        status,
        reply,
        requests: requests.clone(),
    };
    let app = Router::new().fallback(handle).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    FakeGemini {
        base_url: format!("http://{addr}"),
        requests,
        _handle: handle,
    }
}

async fn handle(
    State(state): State<FakeState>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let api_key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(RecordedRequest {
            path: uri.path().to_string(),
            api_key,
            body,
        });
    }
    (state.status, Json(state.reply)).into_response()
}
