// Integration tests (native) for the `folio-fx` crate.
// These tests avoid wasm-specific functionality and exercise pure Rust logic so
// they can run under `cargo test` on the host.

use folio_fx::config::EffectsConfig;
use folio_fx::debounce::DebounceCore;
use folio_fx::theme::{Theme, initial_theme};

#[test]
fn glyph_alphabet_nonempty() {
    assert!(!folio_fx::GLYPH_ALPHABET.is_empty());
}

#[test]
fn default_config_targets_stock_markup() {
    let cfg = EffectsConfig::default();
    assert_eq!(cfg.storage_key, "theme");
    assert_eq!(cfg.canvas_id, "matrix-canvas");
    assert_eq!(cfg.toggle_id, "theme-toggle");
    assert_eq!(cfg.back_to_top_id, "back-to-top");
    assert_eq!(cfg.nav_link_selector, "nav a");
}

#[test]
fn persisted_preference_wins_over_system_signal() {
    // Stored "dark" makes the initial state dark regardless of the system.
    assert_eq!(initial_theme(Some("dark"), false), Theme::Dark);
    assert_eq!(initial_theme(Some("dark"), true), Theme::Dark);
    assert_eq!(initial_theme(Some("light"), true), Theme::Light);
}

#[test]
fn system_signal_used_only_without_preference() {
    assert_eq!(initial_theme(None, true), Theme::Dark);
    assert_eq!(initial_theme(None, false), Theme::Light);
}

#[test]
fn theme_toggle_is_an_involution() {
    for theme in [Theme::Light, Theme::Dark] {
        assert_eq!(theme.toggled().toggled(), theme);
        assert_ne!(theme.toggled(), theme);
    }
}

#[test]
fn debounced_burst_delivers_once_with_latest_args() {
    let mut core = DebounceCore::new(100.0);
    let mut delivered = Vec::new();
    // Three calls inside the window, polled well past the last deadline.
    core.call(0.0, 1);
    core.call(50.0, 2);
    core.call(90.0, 3);
    for now in [100.0, 150.0, 190.0, 250.0, 400.0] {
        if let Some(args) = core.fire_due(now) {
            delivered.push(args);
        }
    }
    assert_eq!(delivered, vec![3]);
}
