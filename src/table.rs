//! Dev proxy route table.
//!
//! DESIGN
//! ======
//! Pure data: which path prefixes the dev server forwards, to which backend
//! origin, and whether the backend should see its own host identity in the
//! `Host` header. Matching is a plain string-prefix test (so `/api` also
//! matches `/apix`); when several prefixes match, the longest one wins.

use std::collections::HashSet;

use reqwest::Url;
use serde::Serialize;

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;

pub const DEFAULT_DEV_PORT: u16 = 5173;
pub const DEFAULT_BACKEND_ORIGIN: &str = "http://localhost:8000";
pub const DEFAULT_PREFIXES: [&str; 3] = ["/api", "/webhook", "/health"];

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("invalid prefix '{0}': must be non-empty and start with '/'")]
    InvalidPrefix(String),
    #[error("duplicate prefix '{0}'")]
    DuplicatePrefix(String),
    #[error("invalid target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },
}

// =============================================================================
// ROUTES
// =============================================================================

/// Unvalidated route declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    pub prefix: String,
    pub target: String,
    pub change_origin: bool,
}

impl RouteSpec {
    pub fn new(prefix: impl Into<String>, target: impl Into<String>, change_origin: bool) -> Self {
        Self { prefix: prefix.into(), target: target.into(), change_origin }
    }
}

/// Validated route. The target is normalized to `scheme://host[:port]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyRoute {
    prefix: String,
    target: String,
    #[serde(skip)]
    authority: String,
    change_origin: bool,
}

impl ProxyRoute {
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// `host[:port]` of the target, used when rewriting `Host`.
    #[must_use]
    pub fn authority(&self) -> &str {
        &self.authority
    }

    #[must_use]
    pub fn change_origin(&self) -> bool {
        self.change_origin
    }

    /// Absolute upstream URL for a request path (plus optional query).
    #[must_use]
    pub fn upstream_url(&self, path_and_query: &str) -> String {
        format!("{}{path_and_query}", self.target)
    }
}

// =============================================================================
// TABLE
// =============================================================================

/// Immutable set of proxy routes with unique prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProxyTable {
    routes: Vec<ProxyRoute>,
}

impl ProxyTable {
    /// Validate and build a table.
    ///
    /// # Errors
    ///
    /// Fails on an empty or relative prefix, a repeated prefix, or a target
    /// that is not a bare `http`/`https` origin.
    pub fn new(specs: impl IntoIterator<Item = RouteSpec>) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        let mut routes = Vec::new();
        for spec in specs {
            if !spec.prefix.starts_with('/') {
                return Err(TableError::InvalidPrefix(spec.prefix));
            }
            if !seen.insert(spec.prefix.clone()) {
                return Err(TableError::DuplicatePrefix(spec.prefix));
            }
            let (target, authority) = parse_origin(&spec.target)?;
            routes.push(ProxyRoute { prefix: spec.prefix, target, authority, change_origin: spec.change_origin });
        }
        Ok(Self { routes })
    }

    /// `/api`, `/webhook` and `/health` forwarded to `origin` with `Host`
    /// rewriting enabled.
    ///
    /// # Errors
    ///
    /// Fails if `origin` is not a valid origin.
    pub fn defaults(origin: &str) -> Result<Self, TableError> {
        Self::new(DEFAULT_PREFIXES.iter().map(|prefix| RouteSpec::new(*prefix, origin, true)))
    }

    /// Route whose prefix starts `path`; the longest such prefix wins.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&ProxyRoute> {
        self.routes
            .iter()
            .filter(|route| path.starts_with(route.prefix.as_str()))
            .max_by_key(|route| route.prefix.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProxyRoute> {
        self.routes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn parse_origin(raw: &str) -> Result<(String, String), TableError> {
    let invalid = |reason: &str| TableError::InvalidTarget { target: raw.to_owned(), reason: reason.to_owned() };

    let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    let Some(host) = url.host_str() else {
        return Err(invalid("missing host"));
    };
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("target must be an origin without path, query or fragment"));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(invalid("credentials are not allowed in the target"));
    }

    let authority = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    };
    Ok((format!("{}://{authority}", url.scheme()), authority))
}
