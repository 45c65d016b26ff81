//! Route dispatch logic for the Admin API.

use crate::admin_api::handlers::{expectations, logs, system};
use crate::admin_api::types::{error_response, get_base_url, not_found, AdminState};
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};
use tracing::debug;

/// Routes below `/expectations/`
#[derive(Debug, PartialEq, Eq)]
enum ExpectationRoute {
    /// GET/DELETE /expectations/:index
    ByIndex(usize),
    /// POST /expectations/remove
    Remove,
}

impl ExpectationRoute {
    fn parse(rest: &str) -> Option<Self> {
        match rest {
            "remove" => Some(ExpectationRoute::Remove),
            index => index.parse().ok().map(ExpectationRoute::ByIndex),
        }
    }
}

/// Main request router
pub async fn route_request(
    req: Request<Incoming>,
    state: AdminState,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let base_url = get_base_url(&req);

    debug!("Admin API: {} {}", method, path);

    Ok(route_by_path(&method, &path, req, &base_url, &state).await)
}

/// Route based on path
async fn route_by_path(
    method: &Method,
    path: &str,
    req: Request<Incoming>,
    base_url: &str,
    state: &AdminState,
) -> Response<Full<Bytes>> {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    match (method, path) {
        (&Method::GET, "/") => return system::handle_root(base_url),
        (&Method::GET, "/health") => return system::handle_health(),
        (&Method::GET, "/config") => return system::handle_config(state),
        _ => {}
    }

    if path == "/expectations" {
        return match *method {
            Method::GET => expectations::handle_list(state),
            Method::POST => expectations::handle_add(req, state).await,
            Method::DELETE => expectations::handle_delete_all(state),
            _ => method_not_allowed(method),
        };
    }

    if let Some(rest) = path.strip_prefix("/expectations/") {
        return match (method, ExpectationRoute::parse(rest)) {
            (&Method::GET, Some(ExpectationRoute::ByIndex(index))) => {
                expectations::handle_get(index, state)
            }
            (&Method::DELETE, Some(ExpectationRoute::ByIndex(index))) => {
                expectations::handle_delete(index, state)
            }
            (&Method::POST, Some(ExpectationRoute::Remove)) => {
                expectations::handle_remove_matching(req, state).await
            }
            (_, Some(_)) => method_not_allowed(method),
            (_, None) => error_response(StatusCode::BAD_REQUEST, "Invalid expectation index"),
        };
    }

    if path == "/logs" {
        return match *method {
            Method::GET => logs::handle_get(state, ""),
            Method::DELETE => logs::handle_clear(state),
            _ => method_not_allowed(method),
        };
    }

    if let Some(log_id) = path.strip_prefix("/logs/") {
        return match *method {
            Method::GET => logs::handle_get(state, log_id),
            _ => method_not_allowed(method),
        };
    }

    not_found()
}

fn method_not_allowed(method: &Method) -> Response<Full<Bytes>> {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &format!("Method {} not allowed", method),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expectation_route_parse() {
        assert_eq!(
            ExpectationRoute::parse("0"),
            Some(ExpectationRoute::ByIndex(0))
        );
        assert_eq!(
            ExpectationRoute::parse("12"),
            Some(ExpectationRoute::ByIndex(12))
        );
        assert_eq!(
            ExpectationRoute::parse("remove"),
            Some(ExpectationRoute::Remove)
        );
        assert_eq!(ExpectationRoute::parse("-1"), None);
        assert_eq!(ExpectationRoute::parse("abc"), None);
        assert_eq!(ExpectationRoute::parse("0/extra"), None);
    }

    #[test]
    fn test_method_not_allowed() {
        let resp = method_not_allowed(&Method::PATCH);
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
