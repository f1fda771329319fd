//! Request forwarding for proxied prefixes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs as middleware in front of the router. A request whose path matches a
//! table entry is sent to that entry's origin and the upstream response is
//! relayed back; everything else falls through to the router (internal
//! endpoints, then static files or 404).
//!
//! TRADE-OFFS
//! ==========
//! Bodies are buffered in both directions. That keeps the forwarding path
//! simple and is fine for a local dev loop; streaming uploads/downloads and
//! websocket upgrades are not relayed. No retries: a failed upstream call is
//! reported to the browser once as `502`/`504`.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;

use crate::state::AppState;
use crate::table::ProxyRoute;

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;

/// Headers meaningful only for a single connection hop.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

const X_FORWARDED_HOST: &str = "x-forwarded-host";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
    #[error("failed to read request body: {0}")]
    RequestBody(String),
    #[error("upstream {target} unreachable: {reason}")]
    Upstream { target: String, reason: String },
    #[error("upstream {target} timed out")]
    Timeout { target: String },
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ProxyError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::RequestBody(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::HttpClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "proxy request failed");
        (self.status(), self.to_string()).into_response()
    }
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

/// Forward requests for proxied prefixes; pass everything else to `next`.
pub async fn proxy_layer(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(route) = state.table.resolve(req.uri().path()).cloned() else {
        return next.run(req).await;
    };
    match forward(&state, &route, req).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

/// Send `req` to `route`'s origin and relay the upstream response.
///
/// # Errors
///
/// Fails if the request body is too large or unreadable, or the upstream
/// cannot be reached in time.
pub async fn forward(state: &AppState, route: &ProxyRoute, req: Request) -> Result<Response, ProxyError> {
    let (parts, body) = req.into_parts();
    let path_and_query = parts.uri.path_and_query().map_or("/", |pq| pq.as_str());
    let url = route.upstream_url(path_and_query);

    let limit = state.max_body_bytes;
    if content_length(&parts.headers).is_some_and(|len| len > limit) {
        return Err(ProxyError::BodyTooLarge { limit });
    }
    let body = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| body_error(e, limit))?;

    let headers = upstream_headers(&parts.headers, route);
    tracing::debug!(method = %parts.method, %url, change_origin = route.change_origin(), "proxying request");

    let upstream = state
        .client
        .request(parts.method, &url)
        .headers(headers)
        .body(body)
        .send()
        .await
        .map_err(|e| upstream_error(route, e))?;

    let status = upstream.status();
    let response_headers = strip_hop_by_hop(upstream.headers());
    let bytes = upstream.bytes().await.map_err(|e| upstream_error(route, e))?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    Ok(response)
}

fn body_error(e: axum::Error, limit: usize) -> ProxyError {
    let inner = e.into_inner();
    if inner.is::<LengthLimitError>() {
        ProxyError::BodyTooLarge { limit }
    } else {
        ProxyError::RequestBody(inner.to_string())
    }
}

fn upstream_error(route: &ProxyRoute, e: reqwest::Error) -> ProxyError {
    let target = route.target().to_owned();
    if e.is_timeout() {
        ProxyError::Timeout { target }
    } else {
        ProxyError::Upstream { target, reason: e.to_string() }
    }
}

fn content_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// Request headers for the upstream call.
///
/// With `change_origin` the backend sees its own authority in `Host`;
/// otherwise the browser's `Host` passes through untouched.
pub(crate) fn upstream_headers(incoming: &HeaderMap, route: &ProxyRoute) -> HeaderMap {
    let mut headers = strip_hop_by_hop(incoming);
    headers.remove(header::CONTENT_LENGTH);

    if let Some(original_host) = incoming.get(header::HOST) {
        headers.insert(X_FORWARDED_HOST, original_host.clone());
    }
    headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("http"));

    if route.change_origin() {
        match HeaderValue::from_str(route.authority()) {
            Ok(host) => {
                headers.insert(header::HOST, host);
            }
            Err(_) => {
                headers.remove(header::HOST);
            }
        }
    }
    headers
}

/// Copy `headers` minus hop-by-hop fields, including any named in `Connection`.
pub(crate) fn strip_hop_by_hop(headers: &HeaderMap) -> HeaderMap {
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    let mut out = headers.clone();
    for name in HOP_BY_HOP {
        out.remove(name);
    }
    for name in &named {
        out.remove(name);
    }
    out
}
