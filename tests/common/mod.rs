//! Shared fixtures for the integration tests.
//!
//! [`FakeDiscord`] is a real HTTP server on an ephemeral localhost port that
//! records every request it receives and answers with a canned response.

#![allow(dead_code)]

use actix_web::{
    App, HttpRequest, HttpResponse, HttpServer,
    dev::ServerHandle,
    http::{Method, StatusCode, header},
    test, web,
};
use bot_dashboard::{AppConfig, AppState, DiscordClientConfig, RateLimitConfig};
use serde_json::Value;
use std::{
    net::TcpListener,
    sync::{Arc, Mutex},
};

/// Bot token used by the route tests
pub const AUTH: &str = "Bot test-token.abc";

/// One request as seen by the fake upstream
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    /// Raw, still percent-encoded path
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone)]
struct Reply {
    status: u16,
    body: String,
}

#[derive(Clone)]
struct FakeState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    reply: Reply,
}

pub struct FakeDiscord {
    /// Base URL to configure the client with, including the `/api/v10` prefix
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: ServerHandle,
}

impl FakeDiscord {
    /// Start a fake that answers every request with `status` and a JSON body
    pub fn respond_json(status: u16, body: Value) -> Self {
        Self::start(Reply {
            status,
            body: body.to_string(),
        })
    }

    /// Start a fake that answers with `status` and the raw `body`
    pub fn respond_raw(status: u16, body: &str) -> Self {
        Self::start(Reply {
            status,
            body: body.to_string(),
        })
    }

    fn start(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake Discord");
        let port = listener.local_addr().expect("local addr").port();

        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            requests: requests.clone(),
            reply,
        };

        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state.clone()))
                .default_service(web::to(record))
        })
        .workers(1)
        .listen(listener)
        .expect("listen fake Discord")
        .run();

        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://127.0.0.1:{port}/api/v10"),
            requests,
            handle,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("fake Discord received no request")
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

async fn record(req: HttpRequest, body: web::Bytes, state: web::Data<FakeState>) -> HttpResponse {
    state.requests.lock().unwrap().push(RecordedRequest {
        method: req.method().to_string(),
        path: req.path().to_string(),
        query: req.query_string().to_string(),
        authorization: req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    });

    HttpResponse::build(StatusCode::from_u16(state.reply.status).unwrap())
        .content_type("application/json")
        .body(state.reply.body.clone())
}

/// Application state pointing at `base_url`, with every other setting at its default
pub fn state_for(base_url: &str) -> AppState {
    state_with(base_url, RateLimitConfig::default())
}

pub fn state_with(base_url: &str, rate_limit: RateLimitConfig) -> AppState {
    let config = AppConfig {
        discord: DiscordClientConfig {
            base_url: base_url.to_string(),
            read_timeout_seconds: 5,
            write_timeout_seconds: 5,
            ..DiscordClientConfig::default()
        },
        rate_limit,
        ..AppConfig::default()
    };
    AppState::new(config).expect("build app state")
}

/// Build a request with an optional JSON body
pub fn request(method: Method, uri: &str, body: Option<Value>) -> test::TestRequest {
    let req = test::TestRequest::default().method(method).uri(uri);
    match body {
        Some(body) => req.set_json(body),
        None => req,
    }
}

/// Same as [`request`], with the test bot token attached
pub fn authorized(method: Method, uri: &str, body: Option<Value>) -> test::TestRequest {
    request(method, uri, body).insert_header((header::AUTHORIZATION, AUTH))
}
