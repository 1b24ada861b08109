//! Shared utilities for integration tests.

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use layout_control::layout::{ClientState, Layout, LayoutStateMachine, PlayError, PlaybackEngine};
use layout_control::observability::RecentErrors;
use layout_control::playlist::{JsonPlaylistLoader, Playlist, PlaylistLoader};
use layout_control::{ControlGateway, HttpServer, ServerConfig};

/// A valid playlist different from the built-in default.
#[allow(dead_code)]
pub const WALL_CONFIG: &str = r#"{
  "modules": [
    { "name": "clock", "path": "modules/clock" },
    { "name": "stars", "path": "modules/stars", "config": { "density": 3 } }
  ],
  "collections": { "night": ["stars", "clock"] },
  "playlist": [
    { "layout": { "name": "split", "duration": 120 }, "collection": "night" },
    { "layout": { "name": "fullscreen", "duration": 60 }, "modules": ["clock"] }
  ]
}"#;

/// Collaborators behind a gateway, kept for assertions.
#[allow(dead_code)]
pub struct Harness {
    pub router: Router,
    pub gateway: Arc<ControlGateway>,
    pub engine: Arc<PlaybackEngine>,
    pub errors: Arc<RecentErrors>,
    pub loader: Arc<JsonPlaylistLoader>,
}

/// Full middleware stack over the in-memory engine and default playlist.
#[allow(dead_code)]
pub fn harness() -> Harness {
    let loader = Arc::new(JsonPlaylistLoader::with_default_playlist().unwrap());
    let playlist = loader.parse_playlist(&loader.initial_config()).unwrap();
    let engine = Arc::new(PlaybackEngine::new(playlist, 4));
    let errors = Arc::new(RecentErrors::new(16));
    let gateway = Arc::new(ControlGateway::new(
        loader.clone(),
        engine.clone(),
        errors.clone(),
    ));
    let router = HttpServer::new(ServerConfig::default(), gateway.clone()).router();

    Harness { router, gateway, engine, errors, loader }
}

/// State machine double with a scripted `play_module` answer.
#[allow(dead_code)]
pub struct ScriptedMachine {
    pub playlist: Mutex<Playlist>,
    pub play_result: Mutex<Result<(), PlayError>>,
    pub play_calls: Mutex<Vec<String>>,
    pub skips: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedMachine {
    pub fn new(playlist: Playlist, play_result: Result<(), PlayError>) -> Self {
        Self {
            playlist: Mutex::new(playlist),
            play_result: Mutex::new(play_result),
            play_calls: Mutex::new(Vec::new()),
            skips: AtomicUsize::new(0),
        }
    }
}

impl LayoutStateMachine for ScriptedMachine {
    fn set_playlist(&self, playlist: Playlist) {
        *self.playlist.lock().unwrap() = playlist;
    }

    fn playlist(&self) -> Playlist {
        self.playlist.lock().unwrap().clone()
    }

    fn layout(&self) -> Layout {
        Layout {
            index: 0,
            name: "scripted".into(),
            duration: 1,
            module_duration: None,
            modules: vec![],
            elapsed_secs: 0,
            queued: vec![],
        }
    }

    fn client_state(&self) -> BTreeMap<String, ClientState> {
        BTreeMap::new()
    }

    fn skip_ahead(&self) -> bool {
        self.skips.fetch_add(1, Ordering::SeqCst);
        false
    }

    fn play_module(&self, name: &str) -> Result<(), PlayError> {
        self.play_calls.lock().unwrap().push(name.to_string());
        self.play_result.lock().unwrap().clone()
    }
}

/// Router over a [`ScriptedMachine`].
#[allow(dead_code)]
pub fn scripted_router(play_result: Result<(), PlayError>) -> (Router, Arc<ScriptedMachine>) {
    let loader = Arc::new(JsonPlaylistLoader::with_default_playlist().unwrap());
    let playlist = loader.parse_playlist(&loader.initial_config()).unwrap();
    let machine = Arc::new(ScriptedMachine::new(playlist, play_result));
    let gateway = Arc::new(ControlGateway::new(
        loader,
        machine.clone(),
        Arc::new(RecentErrors::new(4)),
    ));
    let router = HttpServer::new(ServerConfig::default(), gateway).router();
    (router, machine)
}

/// Send one request through the router and collect the response.
#[allow(dead_code)]
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    (status, headers, String::from_utf8_lossy(&body).to_string())
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// `POST /api/config` with a urlencoded `config` field.
#[allow(dead_code)]
pub fn post_config_form(config: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/config")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(format!("config={}", urlencoding::encode(config))))
        .unwrap()
}

/// `POST /api/config` with a JSON `{"config": ...}` body.
#[allow(dead_code)]
pub fn post_config_json(config: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/config")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::json!({ "config": config }).to_string()))
        .unwrap()
}
