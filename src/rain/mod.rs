//! Matrix-rain canvas renderer.
//!
//! Owns the background drawing surface and repaints it on a frame-gated
//! animation loop. Construction via [`Rain::create`] has no side effects
//! beyond sizing the surface; [`start`] installs the thread-local state,
//! the debounced resize listener and the animation loop, and [`stop`]
//! cancels the pending frame. The theme is re-read from the body class on
//! every frame, so the renderer never holds a reference to the toggle.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, window};

use crate::config::{EffectsConfig, RainConfig};
use crate::debounce::Debounce;
use crate::theme::{self, Theme};

pub mod field;

use field::{FrameGate, GlyphCell, Lcg, RainField};

const DARK_FADE: &str = "rgba(0,0,0,0.15)";
const LIGHT_FADE: &str = "rgba(255,255,255,0.15)";
const DARK_GLYPH: &str = "#00ff66";
const LIGHT_GLYPH: &str = "#007bff";

/// Canvas renderer state: surface, context and the pure column field.
pub struct Rain {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    cfg: RainConfig,
    glyphs: Vec<char>,
    field: RainField,
    gate: FrameGate,
    rng: Lcg,
    cells: Vec<GlyphCell>,
}

impl Rain {
    /// Bind the drawing surface and size it to the viewport. No listeners
    /// are attached and no frames are scheduled here.
    pub fn create(canvas: HtmlCanvasElement, cfg: RainConfig) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;
        let now = window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0);
        let mut rain = Self {
            canvas,
            ctx,
            cfg,
            glyphs: cfg.alphabet.chars().collect(),
            field: RainField::new(),
            gate: FrameGate::new(cfg.fps),
            rng: seeded_lcg(now),
            cells: Vec::new(),
        };
        rain.resize()?;
        Ok(rain)
    }

    pub fn cols(&self) -> usize {
        self.field.cols()
    }

    /// Full reset for the current viewport: surface size, column count and
    /// drop array are all recomputed, never patched incrementally.
    pub fn resize(&mut self) -> Result<(), JsValue> {
        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
        let width = win.inner_width()?.as_f64().unwrap_or(0.0);
        let height = win.inner_height()?.as_f64().unwrap_or(0.0);
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        self.field.reseed(width, &self.cfg, &mut self.rng);
        self.ctx
            .set_font(&format!("{}px monospace", self.cfg.glyph_px));
        self.ctx.set_text_baseline("top");
        Ok(())
    }

    /// One animation callback. The gate drops callbacks above the target
    /// rate; accepted frames paint the fading trail rectangle first, then
    /// this frame's glyphs in the theme accent color.
    fn frame(&mut self, now_ms: f64, dark: bool) {
        if !self.gate.ready(now_ms) {
            return;
        }
        let width = f64::from(self.canvas.width());
        let height = f64::from(self.canvas.height());

        self.ctx
            .set_fill_style_str(if dark { DARK_FADE } else { LIGHT_FADE });
        self.ctx.fill_rect(0.0, 0.0, width, height);

        self.field
            .step(height, &self.glyphs, &self.cfg, &mut self.rng, &mut self.cells);
        self.ctx
            .set_fill_style_str(if dark { DARK_GLYPH } else { LIGHT_GLYPH });
        let mut buf = [0u8; 4];
        for cell in &self.cells {
            let x = cell.col as f64 * self.cfg.glyph_px;
            self.ctx
                .fill_text(cell.glyph.encode_utf8(&mut buf), x, cell.y_px)
                .ok();
        }
    }
}

fn seeded_lcg(now_ms: f64) -> Lcg {
    #[cfg(feature = "rng")]
    {
        let mut bytes = [0u8; 4];
        if getrandom::getrandom(&mut bytes).is_ok() {
            return Lcg::new(u32::from_le_bytes(bytes));
        }
    }
    Lcg::from_time(now_ms)
}

thread_local! {
    static RAIN: RefCell<Option<Rain>> = RefCell::new(None);
    static RAF_HANDLE: Cell<Option<i32>> = Cell::new(None);
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Reuse `#<canvas_id>` when the page supplies one, otherwise create the
/// full-viewport background canvas behind the content.
pub fn ensure_canvas(doc: &Document, cfg: &EffectsConfig) -> Result<HtmlCanvasElement, JsValue> {
    if let Some(el) = doc.get_element_by_id(cfg.canvas_id) {
        return Ok(el.dyn_into()?);
    }
    let canvas: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
    canvas.set_id(cfg.canvas_id);
    canvas
        .set_attribute(
            "style",
            "position:fixed; top:0; left:0; width:100%; height:100%; \
             z-index:-3; pointer-events:none; opacity:0.15; \
             background:transparent; mix-blend-mode:normal;",
        )
        .ok();
    doc.body()
        .ok_or_else(|| JsValue::from_str("no body"))?
        .append_child(&canvas)?;
    Ok(canvas)
}

/// Install the renderer on `canvas`, bind the debounced resize listener and
/// kick the animation loop. Replaces any previous renderer state.
pub fn start(canvas: HtmlCanvasElement, cfg: &EffectsConfig) -> Result<(), JsValue> {
    // A second start must not leave two frame chains alive.
    stop();
    let rain = Rain::create(canvas, cfg.rain)?;
    RAIN.with(|cell| cell.replace(Some(rain)));

    // Resize bursts coalesce into one full reset.
    let resize = Debounce::new(cfg.resize_debounce_ms, || {
        RAIN.with(|cell| {
            if let Some(rain) = cell.borrow_mut().as_mut() {
                rain.resize().ok();
            }
        });
    });
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
        resize.bump().ok();
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    closure.forget();

    start_loop();
    Ok(())
}

/// Cancel the pending frame and drop the renderer state. The resize
/// listener stays bound but no-ops once the state is gone.
pub fn stop() {
    if let Some(handle) = RAF_HANDLE.with(|c| c.take()) {
        if let Some(win) = window() {
            win.cancel_animation_frame(handle).ok();
        }
    }
    RAIN.with(|cell| cell.replace(None));
}

fn start_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        let dark = window()
            .and_then(|w| w.document())
            .map(|doc| theme::current(&doc))
            .unwrap_or(Theme::Light)
            .is_dark();
        let alive = RAIN.with(|cell| match cell.borrow_mut().as_mut() {
            Some(rain) => {
                rain.frame(ts, dark);
                true
            }
            None => false,
        });
        if !alive {
            return; // stopped; the closure chain ends here
        }
        if let Some(w) = window() {
            if let Ok(handle) =
                w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref())
            {
                RAF_HANDLE.with(|c| c.set(Some(handle)));
            }
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        if let Ok(handle) =
            w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref())
        {
            RAF_HANDLE.with(|c| c.set(Some(handle)));
        }
    }
}
