//! Fake Gemini upstream and relay servers bound on ephemeral ports.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_web::{http::StatusCode, web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::Value;

use gemini_chat::config::RelayConfig;
use gemini_chat::web::routes;
use gemini_chat::AppState;

pub const API_KEY: &str = "test-key";

/// What the fake upstream saw: the API key header and the JSON body.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub api_key: Option<String>,
    pub path: String,
    pub body: Value,
}

#[derive(Clone)]
pub struct FakeUpstream {
    status: StatusCode,
    body: String,
    pub seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl FakeUpstream {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.into(),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(
            200,
            serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }]
            })
            .to_string(),
        )
    }

    /// Starts the server and returns its API base URL.
    pub fn spawn(&self) -> String {
        let data = web::Data::new(self.clone());
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/v1beta/models/{call}", web::post().to(generate))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}/v1beta", addr)
    }
}

async fn generate(state: web::Data<FakeUpstream>, req: HttpRequest, body: web::Bytes) -> HttpResponse {
    let api_key = req
        .headers()
        .get("x-goog-api-key")
        .and_then(|value| value.to_str().ok())
        .map(String::from);
    state.seen.lock().unwrap().push(SeenRequest {
        api_key,
        path: req.path().to_string(),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });
    HttpResponse::build(state.status)
        .content_type("application/json")
        .body(state.body.clone())
}

pub fn relay_config(api_base: &str) -> RelayConfig {
    let mut config = RelayConfig::new(API_KEY);
    config.api_base = api_base.to_string();
    config
}

/// Starts a real relay server in front of `api_base` and returns its base URL.
pub fn spawn_relay(api_base: &str) -> String {
    let state = web::Data::new(AppState::new(&relay_config(api_base)));
    let server = HttpServer::new(move || {
        App::new()
            .wrap(gemini_chat::web::cors())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}", addr)
}

/// A base URL nothing is listening on.
pub fn closed_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
