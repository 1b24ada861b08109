use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::control::body::ConfigUpdate;
use crate::control::error::ApiError;
use crate::control::gateway::ConfigSnapshots;
use crate::control::{ControlState, STATUS_PATH};
use crate::layout::{ClientState, Layout};
use crate::observability::ErrorRecord;
use crate::playlist::Playlist;

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub status: String,
    pub layout: String,
    pub clients: usize,
}

pub async fn get_playlist(State(state): State<ControlState>) -> Json<Playlist> {
    Json(state.gateway.playlist().await)
}

pub async fn get_config(State(state): State<ControlState>) -> Json<ConfigSnapshots> {
    Json(state.gateway.config().await)
}

pub async fn get_errors(State(state): State<ControlState>) -> Json<Vec<ErrorRecord>> {
    Json(state.gateway.recent_errors())
}

pub async fn set_config(
    State(state): State<ControlState>,
    ConfigUpdate(config): ConfigUpdate,
) -> Result<Redirect, ApiError> {
    state.gateway.apply_config(&config).await?;
    Ok(Redirect::to(STATUS_PATH))
}

pub async fn get_layout(State(state): State<ControlState>) -> Json<Layout> {
    Json(state.gateway.layout())
}

pub async fn get_clients(
    State(state): State<ControlState>,
) -> Json<BTreeMap<String, ClientState>> {
    Json(state.gateway.client_state())
}

pub async fn skip(State(state): State<ControlState>) -> StatusCode {
    state.gateway.skip();
    StatusCode::OK
}

pub async fn play_module(
    State(state): State<ControlState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<&'static str, ApiError> {
    let mut modules = params
        .into_iter()
        .filter(|(key, _)| key == "module")
        .map(|(_, value)| value);
    let module = modules.next();
    if modules.next().is_some() {
        return Err(ApiError::ModuleNotUnique);
    }
    state.gateway.play(module.as_deref()).await?;
    Ok("Enqueued")
}

pub async fn get_status(State(state): State<ControlState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
        layout: state.gateway.layout().name,
        clients: state.gateway.client_state().len(),
    })
}
