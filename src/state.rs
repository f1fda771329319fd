//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers and middleware via the `State`
//! extractor. It holds the immutable route table and one pooled upstream
//! HTTP client; cloning is cheap.

use std::sync::Arc;
use std::time::Duration;

use crate::proxy::ProxyError;
use crate::table::ProxyTable;

#[derive(Clone, Debug)]
pub struct AppState {
    pub table: Arc<ProxyTable>,
    pub client: reqwest::Client,
    pub max_body_bytes: usize,
}

impl AppState {
    /// Build state with an upstream client that never follows redirects, so
    /// `3xx` responses reach the browser as the backend sent them.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::HttpClientBuild`] if the TLS backend fails to load.
    pub fn new(table: ProxyTable, timeout: Duration, max_body_bytes: usize) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()
            .map_err(|e| ProxyError::HttpClientBuild(e.to_string()))?;
        Ok(Self { table: Arc::new(table), client, max_body_bytes })
    }
}
