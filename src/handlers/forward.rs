use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::atomic::Ordering;

use crate::{
    error::{AppError, Result},
    state::ProxyState,
};

/// Largest request body buffered for forwarding
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Connection-scoped headers that must not be relayed
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
];

pub fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| name.eq_ignore_ascii_case(h))
}

/// Relay any non-control request to the backend, unless an error scenario
/// is active.
pub async fn forward(State(state): State<ProxyState>, request: Request) -> Result<Response> {
    if let Some(scenario) = state.active_error().await {
        tracing::debug!(scenario = scenario.name, path = %request.uri().path(), "Injecting error");
        return Ok(scenario.respond(request.uri().path()).await);
    }

    let (parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = format!("{}{}", state.backend_url, path_and_query);

    let method = reqwest::Method::from_bytes(parts.method.as_str().as_bytes())
        .map_err(|e| AppError::ProxyUpstream(format!("Unsupported method: {}", e)))?;
    let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| AppError::ProxyUpstream(format!("Failed to read request body: {}", e)))?;

    let mut upstream = state.client.request(method, &url);
    for (name, value) in parts.headers.iter() {
        if !is_hop_by_hop(name.as_str()) {
            upstream = upstream.header(name.as_str(), value.as_bytes());
        }
    }

    let response = upstream.body(body.to_vec()).send().await.map_err(|e| {
        tracing::warn!(url = %url, "Backend unreachable: {}", e);
        AppError::ProxyUpstream(format!("Backend {} unreachable: {}", state.backend_url, e))
    })?;

    state.forwarded_requests.fetch_add(1, Ordering::SeqCst);

    let status = StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut headers = HeaderMap::new();
    for (name, value) in response.headers() {
        if is_hop_by_hop(name.as_str()) {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_str().as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            headers.append(name, value);
        }
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::ProxyUpstream(format!("Failed to read backend response: {}", e)))?;

    tracing::debug!(%url, status = status.as_u16(), "Forwarded request");

    Ok((status, headers, Body::from(bytes)).into_response())
}
