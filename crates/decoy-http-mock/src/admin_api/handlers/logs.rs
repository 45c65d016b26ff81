//! Request log handlers.

use crate::admin_api::types::{build_response_with_headers, json_response, AdminState};
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

/// GET /logs and GET /logs/:id
///
/// Unknown or malformed ids answer with the whole log.
pub fn handle_get(state: &AdminState, log_id: &str) -> Response<Full<Bytes>> {
    let body = state.dispatcher.log_messages(log_id);
    build_response_with_headers(
        StatusCode::OK,
        [("Content-Type", "application/json")],
        body,
    )
}

/// DELETE /logs - Clear the log and restart numbering
pub fn handle_clear(state: &AdminState) -> Response<Full<Bytes>> {
    let cleared = state.dispatcher.log_container().len();
    state.dispatcher.clear_log_messages();
    json_response(StatusCode::OK, &serde_json::json!({"cleared": cleared}))
}
