use leptos::prelude::Owner;

use super::*;
use crate::host::MemoryHost;
use crate::theme::DARK_CLASS;

#[test]
fn handle_mirrors_initial_cell_value() {
    let owner = Owner::new();
    owner.with(|| {
        let host = MemoryHost::new().with_stored("dark");
        let handle = ThemeHandle::new(ThemeCell::new(host));
        assert_eq!(handle.current_untracked(), Theme::Dark);
    });
}

#[test]
fn handle_toggle_updates_signal_and_host() {
    let owner = Owner::new();
    owner.with(|| {
        let host = MemoryHost::new();
        let handle = ThemeHandle::new(ThemeCell::new(host.clone()));

        handle.toggle();
        assert_eq!(handle.current_untracked(), Theme::Dark);
        assert!(host.has_root_class(DARK_CLASS));
        assert_eq!(host.stored().as_deref(), Some("dark"));

        handle.toggle();
        assert_eq!(handle.current_untracked(), Theme::Light);
        assert!(!host.has_root_class(DARK_CLASS));
    });
}

#[cfg(not(feature = "csr"))]
#[test]
fn provided_context_defaults_to_light_outside_browser() {
    let owner = Owner::new();
    owner.with(|| {
        let handle = provide_theme_context();
        assert_eq!(handle.current_untracked(), Theme::Light);
        assert_eq!(use_theme().current_untracked(), Theme::Light);
    });
}

#[cfg(not(feature = "csr"))]
#[test]
fn theme_root_provides_its_own_context() {
    let owner = Owner::new();
    owner.with(|| {
        let _view = ThemeRoot();
        assert_eq!(use_theme().current_untracked(), Theme::Light);
    });
}
