//! Theme preference cell.
//!
//! DESIGN
//! ======
//! One explicitly constructed cell per page, owned by whoever renders the UI
//! and handed to consumers by reference (or through Leptos context, see
//! [`crate::toggle`]). Initialization is synchronous: by the time `new`
//! returns, the value is seeded and the root class already matches it.
//!
//! Seeding order: stored literal, then OS preference, then light. A stored
//! value that is not an exact literal counts as absent.

use crate::host::ThemeHost;
use crate::theme::Theme;

#[cfg(test)]
#[path = "cell_test.rs"]
mod tests;

/// Handle returned by [`ThemeCell::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(Theme)>;

/// Observable single-value cell holding the active theme.
pub struct ThemeCell {
    theme: Theme,
    host: Box<dyn ThemeHost>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl std::fmt::Debug for ThemeCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeCell")
            .field("theme", &self.theme)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl ThemeCell {
    /// Build the cell and seed it from `host`.
    pub fn new(host: impl ThemeHost + 'static) -> Self {
        let theme = initial_theme(&host);
        if host.is_interactive() {
            host.apply(theme);
        }
        log::debug!("theme initialized: {theme}");
        Self { theme, host: Box::new(host), subscribers: Vec::new(), next_subscription: 0 }
    }

    #[must_use]
    pub fn current(&self) -> Theme {
        self.theme
    }

    /// Flip the theme, update the root class, persist, then notify.
    ///
    /// Persistence is best-effort; a failed write is logged and dropped.
    pub fn toggle(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        if self.host.is_interactive() {
            self.host.apply(self.theme);
            if let Err(e) = self.host.persist(self.theme) {
                log::warn!("theme preference not persisted: {e}");
            }
        }
        let theme = self.theme;
        for (_, subscriber) in &mut self.subscribers {
            subscriber(theme);
        }
        theme
    }

    /// Register `f` to run after every toggle with the new value.
    pub fn subscribe(&mut self, f: impl FnMut(Theme) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(f)));
        id
    }

    /// Returns `false` if `id` was not (or no longer) subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }
}

fn initial_theme(host: &dyn ThemeHost) -> Theme {
    if !host.is_interactive() {
        return Theme::default();
    }
    host.stored_theme()
        .as_deref()
        .and_then(Theme::parse_stored)
        .unwrap_or_else(|| Theme::from_prefers_dark(host.prefers_dark()))
}
