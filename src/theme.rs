//! Dark/light theme toggle persisted to local storage.
//!
//! The toggle owns the body-level `dark-theme` class; everything else reads
//! that class instead of talking to this module. The rain renderer in
//! particular polls it once per frame, so there is no direct coupling
//! between the two.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Storage, window};

use crate::config::EffectsConfig;

/// Body class that marks dark mode.
pub const DARK_CLASS: &str = "dark-theme";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Light => "\u{2600}\u{fe0f}",
            Self::Dark => "\u{1f319}",
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

/// A stored preference always wins; only when none exists does the system
/// color-scheme signal decide.
pub fn initial_theme(stored: Option<&str>, system_dark: bool) -> Theme {
    match stored.and_then(Theme::from_str) {
        Some(theme) => theme,
        None if system_dark => Theme::Dark,
        None => Theme::Light,
    }
}

fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok().flatten()
}

fn system_prefers_dark() -> bool {
    window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

/// Initial theme from storage, falling back to the system signal.
pub fn resolve_initial(storage_key: &str) -> Theme {
    let stored = local_storage().and_then(|s| s.get_item(storage_key).ok().flatten());
    initial_theme(stored.as_deref(), system_prefers_dark())
}

/// Theme currently applied to the document body.
pub fn current(doc: &Document) -> Theme {
    let dark = doc
        .body()
        .map(|body| body.class_list().contains(DARK_CLASS))
        .unwrap_or(false);
    if dark { Theme::Dark } else { Theme::Light }
}

/// Apply `theme`: body class, toggle icon, canvas overlay blend, storage.
/// Each target is optional; whatever is absent is skipped.
pub fn apply(doc: &Document, cfg: &EffectsConfig, theme: Theme) {
    if let Some(body) = doc.body() {
        let _ = body.class_list().toggle_with_force(DARK_CLASS, theme.is_dark());
    }
    if let Some(toggle) = doc.get_element_by_id(cfg.toggle_id) {
        toggle.set_inner_html(theme.icon());
    }
    // The canvas sits behind the content; opacity and blend mode per theme
    // keep the glyph trails visible against either background.
    if let Some(canvas) = doc.get_element_by_id(cfg.canvas_id) {
        if let Ok(el) = canvas.dyn_into::<HtmlElement>() {
            let (opacity, blend) = match theme {
                Theme::Dark => ("0.25", "screen"),
                Theme::Light => ("0.15", "multiply"),
            };
            let style = el.style();
            let _ = style.set_property("opacity", opacity);
            let _ = style.set_property("mix-blend-mode", blend);
        }
    }
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(cfg.storage_key, theme.as_str());
    }
}

/// Create (or reuse) the toggle button, apply the initial theme and wire the
/// click handler. One click flips the state exactly once; clicks are
/// user-paced so no debounce is involved.
pub fn setup(doc: &Document, cfg: &EffectsConfig) -> Result<(), JsValue> {
    let toggle: Element = match doc.get_element_by_id(cfg.toggle_id) {
        Some(el) => el,
        None => {
            let el = doc.create_element("button")?;
            el.set_id(cfg.toggle_id);
            el.set_attribute("aria-label", "Toggle theme")?;
            doc.body()
                .ok_or_else(|| JsValue::from_str("no body"))?
                .append_child(&el)?;
            el
        }
    };

    apply(doc, cfg, resolve_initial(cfg.storage_key));

    let cfg = *cfg;
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
        if let Some(doc) = window().and_then(|w| w.document()) {
            let next = current(&doc).toggled();
            apply(&doc, &cfg, next);
        }
    }) as Box<dyn FnMut(_)>);
    toggle.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
