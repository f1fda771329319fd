//! # devproxy
//!
//! Local development server that forwards a fixed set of URL path prefixes
//! (`/api`, `/webhook`, `/health` by default) to a backend origin and serves
//! the built frontend for everything else.

pub mod config;
pub mod proxy;
pub mod routes;
pub mod state;
pub mod table;
