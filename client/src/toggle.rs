//! Leptos bindings for the theme cell.
//!
//! SYSTEM CONTEXT
//! ==============
//! The cell itself is framework-agnostic. Here it is parked in a local
//! `StoredValue` and mirrored into an `RwSignal<Theme>` through a cell
//! subscription, so views read the signal and only the toggle button ever
//! mutates the cell.

use leptos::prelude::*;

use crate::cell::ThemeCell;
use crate::host::default_host;
use crate::theme::Theme;

#[cfg(test)]
#[path = "toggle_test.rs"]
mod tests;

/// Copyable handle placed in Leptos context.
#[derive(Clone, Copy)]
pub struct ThemeHandle {
    cell: StoredValue<ThemeCell, LocalStorage>,
    theme: RwSignal<Theme>,
}

impl ThemeHandle {
    /// Wrap an already-initialized cell.
    pub fn new(mut cell: ThemeCell) -> Self {
        let theme = RwSignal::new(cell.current());
        cell.subscribe(move |next| theme.set(next));
        Self { cell: StoredValue::new_local(cell), theme }
    }

    /// Reactive read; tracks the signal when called inside an effect or view.
    pub fn current(&self) -> Theme {
        self.theme.get()
    }

    pub fn current_untracked(&self) -> Theme {
        self.theme.get_untracked()
    }

    pub fn toggle(&self) {
        self.cell.update_value(|cell| {
            cell.toggle();
        });
    }
}

/// Build the page's theme cell and provide it to descendants.
pub fn provide_theme_context() -> ThemeHandle {
    let handle = ThemeHandle::new(ThemeCell::new(default_host()));
    provide_context(handle);
    handle
}

/// Fetch the handle installed by [`provide_theme_context`].
pub fn use_theme() -> ThemeHandle {
    expect_context::<ThemeHandle>()
}

/// Light/dark toggle button.
#[component]
pub fn ThemeToggle() -> impl IntoView {
    let handle = use_theme();

    view! {
        <button
            class="btn theme-toggle"
            on:click=move |_| handle.toggle()
            title="Toggle dark mode"
        >
            {move || if handle.current().is_dark() { "☀" } else { "☾" }}
        </button>
    }
}

/// Root used by the WASM entry point: provides the context, renders the toggle.
#[component]
pub fn ThemeRoot() -> impl IntoView {
    provide_theme_context();

    view! { <ThemeToggle/> }
}
