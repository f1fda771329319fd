use std::time::Duration;

use super::*;
use crate::state::AppState;
use crate::table::{ProxyTable, RouteSpec};

fn route(change_origin: bool) -> ProxyRoute {
    let table = ProxyTable::new([RouteSpec::new("/api", "http://localhost:8000", change_origin)]).unwrap();
    table.resolve("/api").unwrap().clone()
}

fn incoming() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::HOST, HeaderValue::from_static("localhost:5173"));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("7"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, x-session-hint"));
    headers.insert(HeaderName::from_static("x-session-hint"), HeaderValue::from_static("abc"));
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(header::COOKIE, HeaderValue::from_static("sid=1"));
    headers
}

#[test]
fn change_origin_rewrites_host_to_target_authority() {
    let headers = upstream_headers(&incoming(), &route(true));
    assert_eq!(headers.get(header::HOST).unwrap(), "localhost:8000");
    assert_eq!(headers.get("x-forwarded-host").unwrap(), "localhost:5173");
    assert_eq!(headers.get("x-forwarded-proto").unwrap(), "http");
}

#[test]
fn without_change_origin_host_passes_through() {
    let headers = upstream_headers(&incoming(), &route(false));
    assert_eq!(headers.get(header::HOST).unwrap(), "localhost:5173");
}

#[test]
fn upstream_headers_keep_end_to_end_fields() {
    let headers = upstream_headers(&incoming(), &route(true));
    assert_eq!(headers.get(header::ACCEPT).unwrap(), "application/json");
    assert_eq!(headers.get(header::COOKIE).unwrap(), "sid=1");
    assert!(headers.get(header::CONTENT_LENGTH).is_none());
}

#[test]
fn strip_hop_by_hop_removes_connection_scoped_headers() {
    let mut headers = incoming();
    headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
    headers.insert(header::UPGRADE, HeaderValue::from_static("websocket"));

    let stripped = strip_hop_by_hop(&headers);
    assert!(stripped.get(header::CONNECTION).is_none());
    assert!(stripped.get(header::TRANSFER_ENCODING).is_none());
    assert!(stripped.get(header::UPGRADE).is_none());
    assert!(stripped.get("x-session-hint").is_none());
    assert!(stripped.get(header::ACCEPT).is_some());
}

#[test]
fn content_length_parses_header() {
    assert_eq!(content_length(&incoming()), Some(7));
    assert_eq!(content_length(&HeaderMap::new()), None);
}

#[test]
fn proxy_error_status_mapping() {
    assert_eq!(ProxyError::BodyTooLarge { limit: 1 }.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(ProxyError::RequestBody("eof".into()).status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        ProxyError::Upstream { target: "http://localhost:8000".into(), reason: "refused".into() }.status(),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(
        ProxyError::Timeout { target: "http://localhost:8000".into() }.status(),
        StatusCode::GATEWAY_TIMEOUT
    );
}

#[test]
fn proxy_error_into_response_uses_status() {
    let response = ProxyError::Upstream { target: "http://localhost:8000".into(), reason: "refused".into() }
        .into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn forward_rejects_oversized_body_without_content_length() {
    let table = ProxyTable::new([RouteSpec::new("/api", "http://localhost:8000", true)]).unwrap();
    let route = table.resolve("/api").unwrap().clone();
    let state = AppState::new(table, Duration::from_secs(1), 16).unwrap();

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/upload")
        .body(Body::from(vec![b'x'; 64]))
        .unwrap();
    assert!(req.headers().get(header::CONTENT_LENGTH).is_none());

    let err = forward(&state, &route, req).await.unwrap_err();
    assert!(matches!(err, ProxyError::BodyTooLarge { limit: 16 }), "got {err:?}");
    assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
