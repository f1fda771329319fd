//! Host rendering environment adapters.
//!
//! SYSTEM CONTEXT
//! ==============
//! The theme cell never touches browser globals directly. Everything it needs
//! from the environment (stored preference, OS color-scheme query, the root
//! element's class list) goes through [`ThemeHost`], and the concrete adapter
//! is chosen once when the cell is constructed.
//!
//! TRADE-OFFS
//! ==========
//! Browser reads are best-effort: an inaccessible `localStorage` looks the
//! same as an empty one, and a failed `matchMedia` reads as "no dark
//! preference". Only writes report failure, and the cell decides to swallow it.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use crate::theme::{DARK_CLASS, STORAGE_KEY, Theme};

#[cfg(test)]
#[path = "host_test.rs"]
mod tests;

/// Failure writing the preference back to durable storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// No storage facility is reachable from this environment.
    #[error("persistent storage unavailable")]
    StorageUnavailable,

    /// The storage facility rejected the write (quota, privacy mode, ...).
    #[error("storage write failed: {0}")]
    StorageWrite(String),
}

/// Capability interface over the host rendering environment.
pub trait ThemeHost {
    /// Whether a browser-like rendering environment is present at all.
    fn is_interactive(&self) -> bool;

    /// Raw value stored under [`STORAGE_KEY`], if any.
    fn stored_theme(&self) -> Option<String>;

    /// One-shot read of the OS dark color-scheme preference.
    fn prefers_dark(&self) -> bool;

    /// Reflect `theme` onto the document root's class list.
    fn apply(&self, theme: Theme);

    /// Persist `theme` under [`STORAGE_KEY`].
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when storage is missing or rejects the write.
    fn persist(&self, theme: Theme) -> Result<(), HostError>;
}

impl<T: ThemeHost + ?Sized> ThemeHost for Box<T> {
    fn is_interactive(&self) -> bool {
        (**self).is_interactive()
    }

    fn stored_theme(&self) -> Option<String> {
        (**self).stored_theme()
    }

    fn prefers_dark(&self) -> bool {
        (**self).prefers_dark()
    }

    fn apply(&self, theme: Theme) {
        (**self).apply(theme);
    }

    fn persist(&self, theme: Theme) -> Result<(), HostError> {
        (**self).persist(theme)
    }
}

// =============================================================================
// NOOP
// =============================================================================

/// Adapter for non-interactive evaluation (native tests, tooling).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost;

impl ThemeHost for NoopHost {
    fn is_interactive(&self) -> bool {
        false
    }

    fn stored_theme(&self) -> Option<String> {
        None
    }

    fn prefers_dark(&self) -> bool {
        false
    }

    fn apply(&self, _theme: Theme) {}

    fn persist(&self, _theme: Theme) -> Result<(), HostError> {
        Ok(())
    }
}

// =============================================================================
// MEMORY
// =============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    interactive: bool,
    storage: HashMap<String, String>,
    prefers_dark: bool,
    root_classes: BTreeSet<String>,
    fail_writes: bool,
    preference_queries: usize,
}

/// In-process host whose state is shared between clones, so a caller can keep
/// a handle and inspect what the cell did to "the page".
#[derive(Debug, Clone)]
pub struct MemoryHost {
    state: Rc<RefCell<MemoryState>>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Interactive host with empty storage and no dark preference.
    #[must_use]
    pub fn new() -> Self {
        Self { state: Rc::new(RefCell::new(MemoryState { interactive: true, ..MemoryState::default() })) }
    }

    /// Host that reports no rendering environment.
    #[must_use]
    pub fn non_interactive() -> Self {
        Self { state: Rc::new(RefCell::new(MemoryState::default())) }
    }

    #[must_use]
    pub fn with_stored(self, raw: &str) -> Self {
        self.set_stored(raw);
        self
    }

    #[must_use]
    pub fn with_prefers_dark(self, prefers_dark: bool) -> Self {
        self.state.borrow_mut().prefers_dark = prefers_dark;
        self
    }

    pub fn set_stored(&self, raw: &str) {
        self.state
            .borrow_mut()
            .storage
            .insert(STORAGE_KEY.to_owned(), raw.to_owned());
    }

    pub fn clear_stored(&self) {
        self.state.borrow_mut().storage.remove(STORAGE_KEY);
    }

    /// Make subsequent writes fail as if storage were full.
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }

    #[must_use]
    pub fn stored(&self) -> Option<String> {
        self.state.borrow().storage.get(STORAGE_KEY).cloned()
    }

    #[must_use]
    pub fn has_root_class(&self, class: &str) -> bool {
        self.state.borrow().root_classes.contains(class)
    }

    /// Number of times the OS preference was consulted.
    #[must_use]
    pub fn preference_queries(&self) -> usize {
        self.state.borrow().preference_queries
    }
}

impl ThemeHost for MemoryHost {
    fn is_interactive(&self) -> bool {
        self.state.borrow().interactive
    }

    fn stored_theme(&self) -> Option<String> {
        self.stored()
    }

    fn prefers_dark(&self) -> bool {
        let mut state = self.state.borrow_mut();
        state.preference_queries += 1;
        state.prefers_dark
    }

    fn apply(&self, theme: Theme) {
        let mut state = self.state.borrow_mut();
        if theme.is_dark() {
            state.root_classes.insert(DARK_CLASS.to_owned());
        } else {
            state.root_classes.remove(DARK_CLASS);
        }
    }

    fn persist(&self, theme: Theme) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(HostError::StorageWrite("quota exceeded".to_owned()));
        }
        state
            .storage
            .insert(STORAGE_KEY.to_owned(), theme.as_str().to_owned());
        Ok(())
    }
}

// =============================================================================
// BROWSER
// =============================================================================

/// `web-sys` adapter over `window`, `localStorage`, and `matchMedia`.
#[cfg(feature = "csr")]
#[derive(Debug, Clone)]
pub struct BrowserHost {
    window: web_sys::Window,
}

#[cfg(feature = "csr")]
impl BrowserHost {
    /// `None` when no `window` global exists (e.g. inside a worker).
    #[must_use]
    pub fn detect() -> Option<Self> {
        web_sys::window().map(|window| Self { window })
    }

    fn storage(&self) -> Option<web_sys::Storage> {
        self.window.local_storage().ok().flatten()
    }
}

#[cfg(feature = "csr")]
impl ThemeHost for BrowserHost {
    fn is_interactive(&self) -> bool {
        self.window.document().is_some()
    }

    fn stored_theme(&self) -> Option<String> {
        self.storage()?.get_item(STORAGE_KEY).ok().flatten()
    }

    fn prefers_dark(&self) -> bool {
        self.window
            .match_media(crate::theme::DARK_SCHEME_QUERY)
            .ok()
            .flatten()
            .map_or(false, |mq| mq.matches())
    }

    fn apply(&self, theme: Theme) {
        let Some(el) = self.window.document().and_then(|doc| doc.document_element()) else {
            return;
        };
        let classes = el.class_list();
        let result = if theme.is_dark() { classes.add_1(DARK_CLASS) } else { classes.remove_1(DARK_CLASS) };
        if let Err(e) = result {
            log::debug!("theme class update failed: {e:?}");
        }
    }

    fn persist(&self, theme: Theme) -> Result<(), HostError> {
        let storage = self.storage().ok_or(HostError::StorageUnavailable)?;
        storage
            .set_item(STORAGE_KEY, theme.as_str())
            .map_err(|e| HostError::StorageWrite(format!("{e:?}")))
    }
}

/// Pick the adapter for the current build and environment.
#[must_use]
pub fn default_host() -> Box<dyn ThemeHost> {
    #[cfg(feature = "csr")]
    {
        if let Some(host) = BrowserHost::detect() {
            return Box::new(host);
        }
    }
    Box::new(NoopHost)
}
