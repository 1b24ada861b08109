//! HTTP control surface for the layout engine.
//!
//! | Method | Path            | Handler        |
//! |--------|-----------------|----------------|
//! | GET    | `/api/playlist` | `get_playlist` |
//! | GET    | `/api/config`   | `get_config`   |
//! | GET    | `/api/errors`   | `get_errors`   |
//! | POST   | `/api/config`   | `set_config`   |
//! | GET    | `/api/layout`   | `get_layout`   |
//! | GET    | `/api/clients`  | `get_clients`  |
//! | POST   | `/api/skip`     | `skip`         |
//! | POST   | `/api/play`     | `play_module`  |
//! | GET    | `/status`       | `get_status`   |

pub mod body;
pub mod error;
pub mod gateway;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use self::handlers::*;

pub use error::ApiError;
pub use gateway::{ConfigSnapshots, ControlGateway};

/// Where a successful config update redirects to.
pub const STATUS_PATH: &str = "/status";

/// State injected into every control handler.
#[derive(Clone)]
pub struct ControlState {
    pub gateway: Arc<ControlGateway>,
}

impl ControlState {
    pub fn new(gateway: Arc<ControlGateway>) -> Self {
        Self { gateway }
    }
}

pub fn setup_control_router(state: ControlState) -> Router {
    Router::new()
        .route("/api/playlist", get(get_playlist))
        .route("/api/config", get(get_config).post(set_config))
        .route("/api/errors", get(get_errors))
        .route("/api/layout", get(get_layout))
        .route("/api/clients", get(get_clients))
        .route("/api/skip", post(skip))
        .route("/api/play", post(play_module))
        .route(STATUS_PATH, get(get_status))
        .with_state(state)
}
