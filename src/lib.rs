//! Folio FX core crate.
//!
//! Decorative effects layer for a static portfolio page: a matrix-rain
//! canvas background, a persisted dark/light theme toggle, and the scroll /
//! click flourishes (smooth navigation, fade-in reveals, ripples, parallax).
//! Everything is wired by [`start_effects`]; embedders with custom markup
//! can call [`run_with`] and override any id, selector or rain parameter.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod debounce;
pub mod page;
pub mod rain;
pub mod theme;

pub use config::{EffectsConfig, RainConfig};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&format!("[folio-fx] wasm loaded v{}", version()).into());
}

// -----------------------------------------------------------------------------
// Rain glyph alphabet
// Latin transliteration block plus digits; one glyph is sampled per active
// column per frame.
// -----------------------------------------------------------------------------

pub const GLYPH_ALPHABET: &str = "ABVGDEZHZKLMNOPRSTFKHCHTSCH0123456789";

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

/// Start every page effect with the stock configuration.
#[wasm_bindgen]
pub fn start_effects() -> Result<(), JsValue> {
    run_with(EffectsConfig::default())
}

/// Start every page effect with an explicit configuration. The canvas is
/// bootstrapped first so the initial theme can style it, and the theme is
/// applied before the first frame so the renderer never paints with a
/// stale palette.
pub fn run_with(cfg: EffectsConfig) -> Result<(), JsValue> {
    let win = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas = rain::ensure_canvas(&doc, &cfg)?;
    theme::setup(&doc, &cfg)?;
    rain::start(canvas, &cfg)?;
    page::setup(&doc, &cfg)?;
    Ok(())
}

/// Stop the rain renderer loop. Listeners stay bound but become no-ops.
#[wasm_bindgen]
pub fn stop_effects() {
    rain::stop();
}

#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").into()
}
