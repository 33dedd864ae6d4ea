use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::Stream;
use serde::Serialize;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::atomic::Ordering;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

use crate::{
    error::{AppError, Result},
    proxy::error_scenarios::{self, ErrorScenario, ERROR_SCENARIOS},
    state::ProxyState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyStatus {
    pub backend_url: String,
    pub watch_path: Option<String>,
    pub active_error: Option<&'static str>,
    pub forwarded_requests: u64,
    pub reload_count: u64,
    pub reload_clients: usize,
    pub uptime_secs: i64,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn status(State(state): State<ProxyState>) -> Json<ProxyStatus> {
    let active_error = state.active_error().await.map(|s| s.name);

    Json(ProxyStatus {
        backend_url: state.backend_url.clone(),
        watch_path: state.watch_path.as_ref().map(|p| p.display().to_string()),
        active_error,
        forwarded_requests: state.forwarded_requests.load(Ordering::SeqCst),
        reload_count: state.reload_count.load(Ordering::SeqCst),
        reload_clients: state.reload_clients(),
        uptime_secs: (chrono::Utc::now() - state.started_at).num_seconds(),
    })
}

pub async fn list_errors(State(state): State<ProxyState>) -> Json<Value> {
    let active = state.active_error().await.map(|s| s.name);
    Json(json!({
        "active": active,
        "scenarios": ERROR_SCENARIOS,
    }))
}

pub async fn activate_error(
    State(state): State<ProxyState>,
    Path(name): Path<String>,
) -> Result<Json<&'static ErrorScenario>> {
    let scenario =
        error_scenarios::find(&name).ok_or_else(|| AppError::UnknownScenario(name.clone()))?;

    state.set_active_error(Some(scenario)).await;
    tracing::info!(scenario = scenario.name, "Error injection enabled");

    Ok(Json(scenario))
}

pub async fn clear_error(State(state): State<ProxyState>) -> Json<Value> {
    let previous = state.active_error().await.map(|s| s.name);
    state.set_active_error(None).await;
    if let Some(name) = previous {
        tracing::info!(scenario = name, "Error injection disabled");
    }
    Json(json!({ "active": null, "previous": previous }))
}

/// Server-sent reload events; lagging clients skip missed events.
pub async fn reload_stream(
    State(state): State<ProxyState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.subscribe()).filter_map(|message| {
        let event = message.ok()?;
        Event::default().event("reload").json_data(&event).ok().map(Ok)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
