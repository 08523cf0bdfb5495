// Browser smoke tests (run with `wasm-pack test --headless --firefox`).
// Compiled out entirely on native targets.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn version_matches_package() {
    assert_eq!(folio_fx::version(), env!("CARGO_PKG_VERSION"));
}

#[wasm_bindgen_test]
fn effects_start_and_stop_in_a_bare_page() {
    // A bare harness page has no nav, subtitle or back-to-top button; every
    // feature must skip what is missing without failing startup.
    folio_fx::start_effects().expect("effects should start");
    folio_fx::stop_effects();
}
