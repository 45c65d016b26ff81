//! Expectation management handlers.

use crate::admin_api::types::{
    collect_body, error_response, json_response, AdminState, IndexedExpectation,
    ListExpectationsResponse,
};
use crate::expectation::{Expectation, RegistryError};
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use tracing::{info, warn};

/// GET /expectations - List registered expectations
pub fn handle_list(state: &AdminState) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &ListExpectationsResponse::from_list(state.registry.list()),
    )
}

/// POST /expectations - Register one expectation or an array of them
pub async fn handle_add(req: Request<Incoming>, state: &AdminState) -> Response<Full<Bytes>> {
    let body = match collect_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e),
    };

    let value: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("Invalid expectation JSON: {e}"),
            )
        }
    };

    let documents = match value {
        serde_json::Value::Array(items) => items,
        single => vec![single],
    };

    // validate everything before registering anything
    let mut expectations = Vec::with_capacity(documents.len());
    for document in documents {
        match serde_json::from_value::<Expectation>(document) {
            Ok(expectation) => expectations.push(expectation),
            Err(e) => {
                warn!("Rejected expectation: {}", e);
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &RegistryError::Invalid(e.to_string()).to_string(),
                );
            }
        }
    }

    let added: Vec<IndexedExpectation> = expectations
        .into_iter()
        .map(|expectation| IndexedExpectation {
            index: state.registry.add(expectation.clone()),
            expectation,
        })
        .collect();
    info!("Added {} expectation(s)", added.len());

    json_response(
        StatusCode::CREATED,
        &serde_json::json!({ "expectations": added }),
    )
}

/// DELETE /expectations - Remove all expectations
pub fn handle_delete_all(state: &AdminState) -> Response<Full<Bytes>> {
    let removed = state.registry.len();
    state.registry.remove_all();
    json_response(StatusCode::OK, &serde_json::json!({ "removed": removed }))
}

/// GET /expectations/:index
pub fn handle_get(index: usize, state: &AdminState) -> Response<Full<Bytes>> {
    match state.registry.get(index) {
        Some(expectation) => json_response(
            StatusCode::OK,
            &IndexedExpectation { index, expectation },
        ),
        None => error_response(
            StatusCode::NOT_FOUND,
            &RegistryError::IndexOutOfBounds(index).to_string(),
        ),
    }
}

/// DELETE /expectations/:index
pub fn handle_delete(index: usize, state: &AdminState) -> Response<Full<Bytes>> {
    match state.registry.remove(index) {
        Ok(expectation) => {
            info!("Removed expectation {}", index);
            json_response(StatusCode::OK, &IndexedExpectation { index, expectation })
        }
        Err(e) => error_response(StatusCode::NOT_FOUND, &e.to_string()),
    }
}

/// POST /expectations/remove - Remove every expectation equal to the body
pub async fn handle_remove_matching(
    req: Request<Incoming>,
    state: &AdminState,
) -> Response<Full<Bytes>> {
    let body = match collect_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e),
    };

    let expectation: Expectation = match serde_json::from_slice(&body) {
        Ok(exp) => exp,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("Invalid expectation JSON: {e}"),
            )
        }
    };

    let removed = state.registry.remove_matching(&expectation);
    info!("Removed {} matching expectation(s)", removed);
    json_response(StatusCode::OK, &serde_json::json!({ "removed": removed }))
}
