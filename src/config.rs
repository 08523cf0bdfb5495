//! Effect configuration.
//!
//! Every tunable the page effects consume lives here instead of being
//! scattered as ambient module state. `EffectsConfig::default()` reproduces
//! the stock portfolio look; embedders calling [`crate::run_with`] can swap
//! any of it. Known cosmetic variants of the rain effect (denser columns,
//! faster fall) are alternate `RainConfig` values, not separate renderers.

/// Parameters of the matrix-rain canvas renderer.
#[derive(Clone, Copy, Debug)]
pub struct RainConfig {
    /// Glyph cell size in pixels; column count is `floor(width / glyph_px)`.
    pub glyph_px: f64,
    /// Probability that a column is seeded with an active drop on reseed.
    pub density: f64,
    /// Fall speed in glyph rows per drawn frame.
    pub speed: f64,
    /// Target frame rate enforced by the elapsed-time gate.
    pub fps: f64,
    /// Active drops start between 0 and this many rows above the top edge.
    pub spawn_stagger_rows: f64,
    /// Per-frame chance that a drop past the bottom edge restarts at the top.
    pub reset_chance: f64,
    /// Glyphs drawn by the rain; one is picked at random per column per frame.
    pub alphabet: &'static str,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            glyph_px: 16.0,
            density: 0.1,
            speed: 0.6,
            fps: 30.0,
            spawn_stagger_rows: 50.0,
            reset_chance: 0.015,
            alphabet: crate::GLYPH_ALPHABET,
        }
    }
}

/// Configuration for the whole effects layer: element ids, selectors,
/// debounce windows and the nested rain parameters.
#[derive(Clone, Copy, Debug)]
pub struct EffectsConfig {
    /// Local-storage key holding `"dark"` or `"light"`.
    pub storage_key: &'static str,
    pub canvas_id: &'static str,
    pub toggle_id: &'static str,
    pub back_to_top_id: &'static str,
    /// Selector for navigation links that smooth-scroll to sections.
    pub nav_link_selector: &'static str,
    /// Selector for the observed fade-in sections.
    pub section_selector: &'static str,
    /// Selector for elements that get a click ripple.
    pub ripple_selector: &'static str,
    pub subtitle_selector: &'static str,
    pub header_selector: &'static str,
    pub resize_debounce_ms: i32,
    pub scroll_debounce_ms: i32,
    /// A section counts as current once `scroll_y >= top - nav_offset_px`.
    pub nav_offset_px: f64,
    /// Scroll depth past which the back-to-top button becomes visible.
    pub back_to_top_reveal_px: f64,
    /// Intersection ratio that triggers the one-shot reveal.
    pub reveal_threshold: f64,
    pub ripple_lifetime_ms: i32,
    /// Header translateY per scrolled pixel.
    pub parallax_factor: f64,
    pub typing_interval_ms: i32,
    pub typing_start_delay_ms: i32,
    pub rain: RainConfig,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme",
            canvas_id: "matrix-canvas",
            toggle_id: "theme-toggle",
            back_to_top_id: "back-to-top",
            nav_link_selector: "nav a",
            section_selector: "section",
            ripple_selector: ".project, .link-card",
            subtitle_selector: ".subtitle",
            header_selector: "header",
            resize_debounce_ms: 150,
            scroll_debounce_ms: 100,
            nav_offset_px: 120.0,
            back_to_top_reveal_px: 300.0,
            reveal_threshold: 0.1,
            ripple_lifetime_ms: 600,
            parallax_factor: 0.35,
            typing_interval_ms: 50,
            typing_start_delay_ms: 1000,
            rain: RainConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rain_matches_stock_look() {
        let cfg = RainConfig::default();
        assert_eq!(cfg.glyph_px, 16.0);
        assert_eq!(cfg.density, 0.1);
        assert!((cfg.fps - 30.0).abs() < 1e-9);
        assert!(!cfg.alphabet.is_empty());
    }

    #[test]
    fn reset_chance_stays_in_documented_band() {
        let cfg = RainConfig::default();
        assert!(cfg.reset_chance >= 0.015 && cfg.reset_chance <= 0.025);
    }
}
