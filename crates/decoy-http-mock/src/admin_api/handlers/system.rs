//! System handlers: root links, health, config.

use crate::admin_api::types::{json_response, AdminState};
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

/// GET / - Links to the admin resources
pub fn handle_root(base_url: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "_links": {
            "expectations": {"href": format!("{}/expectations", base_url)},
            "logs": {"href": format!("{}/logs", base_url)},
            "config": {"href": format!("{}/config", base_url)},
            "health": {"href": format!("{}/health", base_url)}
        }
    });
    json_response(StatusCode::OK, &body)
}

/// GET /health - Health check
pub fn handle_health() -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &serde_json::json!({"status": "ok"}))
}

/// GET /config - Runtime settings of the dispatcher
pub fn handle_config(state: &AdminState) -> Response<Full<Bytes>> {
    let dispatcher = &state.dispatcher;
    let config = serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "hostWhitelist": dispatcher.host_whitelist().patterns(),
        "logsUrl": dispatcher.logs_url(),
        "expectations": state.registry.len(),
        "logEntries": dispatcher.log_container().len(),
    });
    json_response(StatusCode::OK, &config)
}
