//! # client
//!
//! Browser-side theme preference: a two-valued [`theme::Theme`], the
//! [`cell::ThemeCell`] that owns the active value, the [`host`] adapters that
//! connect it to `localStorage`, `matchMedia` and the document root, and a
//! Leptos toggle in [`toggle`].

pub mod cell;
pub mod host;
pub mod theme;
pub mod toggle;

pub use cell::{SubscriptionId, ThemeCell};
pub use host::{HostError, MemoryHost, NoopHost, ThemeHost, default_host};
pub use theme::{Theme, ThemeParseError};

/// WASM entry point: client-side renders the toggle into `<body>`.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(toggle::ThemeRoot);
}
