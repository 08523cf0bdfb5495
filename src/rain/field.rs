//! Pure column state for the rain renderer.
//!
//! Everything that can be computed without a canvas lives here: the PRNG,
//! the frame-rate gate and the per-column drop array. The wasm layer in the
//! parent module only binds these to a surface.

use crate::config::RainConfig;

/// 32-bit linear congruential generator (not crypto secure, decorative use
/// only). Deterministic from its seed, which is what the tests rely on.
pub struct Lcg(u32);

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self(seed)
    }

    /// Seed from a millisecond timestamp, keeping sub-millisecond bits.
    pub fn from_time(now_ms: f64) -> Self {
        Self::new((now_ms * 1000.0) as u64 as u32 | 1)
    }

    fn next(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.0
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next() >> 8) / f64::from(1u32 << 24)
    }

    /// Uniform index below `len`; 0 when `len` is 0.
    pub fn below(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        (self.next_f64() * len as f64) as usize % len
    }
}

/// Elapsed-time gate enforcing the target frame rate regardless of how often
/// the host fires the animation callback.
pub struct FrameGate {
    interval_ms: f64,
    last_ms: f64,
}

impl FrameGate {
    pub fn new(fps: f64) -> Self {
        Self {
            interval_ms: 1000.0 / fps.max(1.0),
            last_ms: 0.0,
        }
    }

    /// True when enough time has passed since the last accepted frame.
    pub fn ready(&mut self, now_ms: f64) -> bool {
        if now_ms - self.last_ms > self.interval_ms {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }
}

/// One glyph to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphCell {
    pub col: usize,
    pub y_px: f64,
    pub glyph: char,
}

/// Per-column drop positions in glyph rows; `None` marks a column that never
/// rains. The array is rebuilt wholesale on every reseed, so its length
/// always equals the current column count.
pub struct RainField {
    cols: usize,
    drops: Vec<Option<f64>>,
}

impl RainField {
    pub fn new() -> Self {
        Self {
            cols: 0,
            drops: Vec::new(),
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn drops(&self) -> &[Option<f64>] {
        &self.drops
    }

    pub fn column_count(width_px: f64, glyph_px: f64) -> usize {
        if glyph_px <= 0.0 {
            return 0;
        }
        (width_px / glyph_px).floor() as usize
    }

    /// Wholesale reset for a new surface width. Each column becomes active
    /// with probability `density`, starting staggered above the top edge so
    /// drops do not enter in lockstep.
    pub fn reseed(&mut self, width_px: f64, cfg: &RainConfig, rng: &mut Lcg) {
        self.cols = Self::column_count(width_px, cfg.glyph_px);
        self.drops.clear();
        self.drops.reserve(self.cols);
        for _ in 0..self.cols {
            let drop = if rng.next_f64() < cfg.density {
                Some(rng.next_f64() * -cfg.spawn_stagger_rows)
            } else {
                None
            };
            self.drops.push(drop);
        }
    }

    /// Advance every active drop one frame, collecting the glyphs to draw
    /// into `out`. On-screen drops emit one random glyph; drops past the
    /// bottom edge emit nothing and restart at the top with `reset_chance`
    /// per frame, otherwise they keep falling.
    pub fn step(
        &mut self,
        height_px: f64,
        glyphs: &[char],
        cfg: &RainConfig,
        rng: &mut Lcg,
        out: &mut Vec<GlyphCell>,
    ) {
        out.clear();
        for (col, slot) in self.drops.iter_mut().enumerate() {
            let Some(pos) = slot.as_mut() else { continue };
            let y_px = *pos * cfg.glyph_px;
            if y_px <= height_px {
                if !glyphs.is_empty() {
                    out.push(GlyphCell {
                        col,
                        y_px,
                        glyph: glyphs[rng.below(glyphs.len())],
                    });
                }
                *pos += cfg.speed;
            } else if rng.next_f64() < cfg.reset_chance {
                *pos = 0.0;
            } else {
                *pos += cfg.speed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> RainConfig {
        RainConfig::default()
    }

    const GLYPHS: &[char] = &['A', 'B', 'C'];

    #[test]
    fn column_count_is_floor_of_width_over_glyph() {
        assert_eq!(RainField::column_count(320.0, 16.0), 20);
        assert_eq!(RainField::column_count(319.9, 16.0), 19);
        assert_eq!(RainField::column_count(15.0, 16.0), 0);
        assert_eq!(RainField::column_count(100.0, 0.0), 0);
    }

    #[test]
    fn reseed_keeps_drops_len_equal_to_cols() {
        let mut field = RainField::new();
        let mut rng = Lcg::new(42);
        for width in [320.0, 1280.0, 7.0, 1024.0] {
            field.reseed(width, &cfg(), &mut rng);
            assert_eq!(field.drops().len(), field.cols());
            assert_eq!(field.cols(), RainField::column_count(width, 16.0));
        }
    }

    #[test]
    fn full_density_seeds_every_column_above_the_top() {
        let mut field = RainField::new();
        let mut rng = Lcg::new(7);
        let config = RainConfig {
            density: 1.0,
            ..cfg()
        };
        field.reseed(320.0, &config, &mut rng);
        for drop in field.drops() {
            let pos = drop.expect("column should be active at density 1.0");
            assert!((-config.spawn_stagger_rows..=0.0).contains(&pos));
        }
    }

    #[test]
    fn zero_density_leaves_every_column_inactive() {
        let mut field = RainField::new();
        let mut rng = Lcg::new(7);
        let config = RainConfig {
            density: 0.0,
            ..cfg()
        };
        field.reseed(320.0, &config, &mut rng);
        assert!(field.drops().iter().all(Option::is_none));
    }

    #[test]
    fn on_screen_drop_emits_glyph_and_advances() {
        let mut field = RainField::new();
        let mut rng = Lcg::new(1);
        let config = RainConfig {
            density: 1.0,
            spawn_stagger_rows: 0.0,
            ..cfg()
        };
        field.reseed(16.0, &config, &mut rng); // exactly one column at row 0
        let mut out = Vec::new();
        field.step(480.0, GLYPHS, &config, &mut rng, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].col, 0);
        assert_eq!(out[0].y_px, 0.0);
        assert!(GLYPHS.contains(&out[0].glyph));
        assert_eq!(field.drops()[0], Some(config.speed));
    }

    #[test]
    fn inactive_columns_stay_inactive_and_silent() {
        let mut field = RainField::new();
        let mut rng = Lcg::new(3);
        let config = RainConfig {
            density: 0.0,
            ..cfg()
        };
        field.reseed(160.0, &config, &mut rng);
        let mut out = Vec::new();
        field.step(480.0, GLYPHS, &config, &mut rng, &mut out);
        assert!(out.is_empty());
        assert!(field.drops().iter().all(Option::is_none));
    }

    #[test]
    fn off_screen_drop_is_never_drawn() {
        let mut field = RainField::new();
        let mut rng = Lcg::new(5);
        let config = RainConfig {
            density: 1.0,
            reset_chance: 0.0,
            ..cfg()
        };
        field.reseed(16.0, &config, &mut rng);
        // Push the single drop well past a 100px-tall surface.
        field.drops[0] = Some(50.0);
        let mut out = Vec::new();
        field.step(100.0, GLYPHS, &config, &mut rng, &mut out);
        assert!(out.is_empty());
        // Still falling: no reset at chance 0.
        assert_eq!(field.drops()[0], Some(50.0 + config.speed));
    }

    #[test]
    fn reset_only_happens_past_the_bottom_edge() {
        let mut field = RainField::new();
        let mut rng = Lcg::new(9);
        let config = RainConfig {
            density: 1.0,
            reset_chance: 1.0,
            ..cfg()
        };
        field.reseed(16.0, &config, &mut rng);

        // On-screen: certain reset chance must not trigger.
        field.drops[0] = Some(2.0);
        let mut out = Vec::new();
        field.step(480.0, GLYPHS, &config, &mut rng, &mut out);
        assert_eq!(field.drops()[0], Some(2.0 + config.speed));

        // Past the bottom: certain reset chance restarts at the top.
        field.drops[0] = Some(1000.0);
        field.step(480.0, GLYPHS, &config, &mut rng, &mut out);
        assert_eq!(field.drops()[0], Some(0.0));
    }

    #[test]
    fn lcg_is_deterministic_and_in_range() {
        let mut a = Lcg::new(1234);
        let mut b = Lcg::new(1234);
        for _ in 0..1000 {
            let x = a.next_f64();
            assert_eq!(x, b.next_f64());
            assert!((0.0..1.0).contains(&x));
        }
        for len in [1usize, 3, 37] {
            assert!(a.below(len) < len);
        }
        assert_eq!(a.below(0), 0);
    }

    #[test]
    fn frame_gate_enforces_target_interval() {
        let mut gate = FrameGate::new(30.0);
        assert!(gate.ready(100.0));
        // Host firing at 60Hz: every other callback passes at most.
        assert!(!gate.ready(116.0));
        assert!(gate.ready(134.0));
        assert!(!gate.ready(150.0));
        assert!(gate.ready(168.0));
    }
}
