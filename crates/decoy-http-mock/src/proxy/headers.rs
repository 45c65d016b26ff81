//! Header filtering for forwarded requests and relayed responses.
//!
//! Names are matched case-sensitively. The front end and the transport both
//! hand over Title-Case names (`Content-Length`), which is the form these
//! lists use.

use crate::engine::Headers;
use hyper::header::HeaderMap;
use indexmap::map::Entry;

/// Inbound headers that are never copied to the upstream request
pub const REQUEST_HEADERS_TO_IGNORE: [&str; 3] = ["Host", "Content-Encoding", "Content-Length"];

/// Upstream headers that are never relayed back to the caller
pub const RESPONSE_HEADERS_TO_IGNORE: [&str; 4] = [
    "Content-Encoding",
    "Content-Length",
    "Transfer-Encoding",
    "Strict-Transport-Security",
];

/// Copy `headers`, leaving out every name listed in `ignore`.
pub fn filter_headers<'a, I>(headers: I, ignore: &[&str]) -> Headers
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    headers
        .into_iter()
        .filter(|(name, _)| !ignore.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Headers for the upstream request: inbound headers minus transport-managed
/// ones, then `overlay` inserted on top.
pub fn forward_request_headers(inbound: &Headers, overlay: Option<&Headers>) -> Headers {
    let mut headers = filter_headers(inbound, &REQUEST_HEADERS_TO_IGNORE);
    if let Some(overlay) = overlay {
        headers.extend(overlay.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    headers
}

/// Upstream response headers that may be relayed to the caller
pub fn relayed_response_headers(upstream: &Headers) -> Headers {
    filter_headers(upstream, &RESPONSE_HEADERS_TO_IGNORE)
}

/// Add `value` under `name`. A name seen before keeps its position and gets
/// `value` joined to it with `", "`.
pub fn append_header(headers: &mut Headers, name: String, value: String) {
    match headers.entry(name) {
        Entry::Occupied(mut existing) => {
            let joined = existing.get_mut();
            joined.push_str(", ");
            joined.push_str(&value);
        }
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
    }
}

/// Wire headers with Title-Case names, repeated names joined in arrival order.
pub fn headers_from_wire(wire: &HeaderMap) -> Headers {
    let mut headers = Headers::with_capacity(wire.keys_len());
    for (name, value) in wire {
        append_header(
            &mut headers,
            header_to_title_case(name.as_str()),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        );
    }
    headers
}

/// Canonical Title-Case form of a header name (`content-length` -> `Content-Length`).
pub fn header_to_title_case(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> Headers {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_forward_headers_drop_transport_headers() {
        let inbound = headers(&[
            ("h1", "hv1"),
            ("Host", "travix.com"),
            ("Content-Length", "100"),
            ("Content-Encoding", "gzip"),
        ]);

        let out = forward_request_headers(&inbound, None);
        assert_eq!(out, headers(&[("h1", "hv1")]));
    }

    #[test]
    fn test_forward_headers_overlay_wins() {
        let inbound = headers(&[("h1", "hv1"), ("Authorization", "old")]);
        let overlay = headers(&[("Authorization", "new"), ("X-Extra", "1")]);

        let out = forward_request_headers(&inbound, Some(&overlay));
        assert_eq!(
            out,
            headers(&[("h1", "hv1"), ("Authorization", "new"), ("X-Extra", "1")])
        );
    }

    #[test]
    fn test_overlay_can_set_host_explicitly() {
        let inbound = headers(&[("Host", "inbound.example")]);
        let overlay = headers(&[("Host", "upstream.example")]);

        let out = forward_request_headers(&inbound, Some(&overlay));
        assert_eq!(out.get("Host").map(String::as_str), Some("upstream.example"));
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let inbound = headers(&[("host", "lower.example")]);
        let out = forward_request_headers(&inbound, None);
        assert!(out.contains_key("host"));
    }

    #[test]
    fn test_relayed_response_headers() {
        let upstream = headers(&[
            ("mock_header", "mock_header_value"),
            ("Content-Encoding", "gzip"),
            ("Content-Length", "12"),
            ("Transfer-Encoding", "chunked"),
            ("Strict-Transport-Security", "max-age=31536000"),
            ("Content-Type", "text/plain"),
        ]);

        let out = relayed_response_headers(&upstream);
        assert_eq!(
            out,
            headers(&[
                ("mock_header", "mock_header_value"),
                ("Content-Type", "text/plain")
            ])
        );
    }

    #[test]
    fn test_append_header_joins_repeated_names() {
        let mut out = Headers::new();
        append_header(&mut out, "Set-Cookie".to_string(), "a=1".to_string());
        append_header(&mut out, "X-Other".to_string(), "x".to_string());
        append_header(&mut out, "Set-Cookie".to_string(), "b=2".to_string());

        assert_eq!(out.get("Set-Cookie").map(String::as_str), Some("a=1, b=2"));
        let names: Vec<&str> = out.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Set-Cookie", "X-Other"]);
    }

    #[test]
    fn test_headers_from_wire() {
        let mut wire = HeaderMap::new();
        wire.append("x-zeta", "z".parse().unwrap());
        wire.append("set-cookie", "a=1".parse().unwrap());
        wire.append("set-cookie", "b=2".parse().unwrap());
        wire.append("accept", "text/plain".parse().unwrap());

        let out = headers_from_wire(&wire);
        assert_eq!(out.get("Set-Cookie").map(String::as_str), Some("a=1, b=2"));
        assert_eq!(out.get("X-Zeta").map(String::as_str), Some("z"));
        assert_eq!(out.get("Accept").map(String::as_str), Some("text/plain"));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_forward_headers_keep_inbound_order() {
        let inbound = headers(&[("Zeta", "1"), ("Host", "h"), ("Alpha", "2")]);
        let out = forward_request_headers(&inbound, None);
        let names: Vec<&str> = out.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_header_to_title_case() {
        assert_eq!(header_to_title_case("content-length"), "Content-Length");
        assert_eq!(header_to_title_case("HOST"), "Host");
        assert_eq!(header_to_title_case("x-request-id"), "X-Request-Id");
        assert_eq!(header_to_title_case("strict-transport-security"), "Strict-Transport-Security");
        assert_eq!(header_to_title_case(""), "");
    }
}
