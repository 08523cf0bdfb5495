//! Trailing-edge debounce.
//!
//! Burst sources (resize, scroll) go through [`Debounce`], which collapses
//! rapid repeats into one host timeout. The timing rules live in
//! [`DebounceCore`] so they stay testable without a browser.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

/// Pure debounce state machine: each `call` re-arms the deadline and keeps
/// only the newest arguments; `fire_due` hands them out exactly once.
pub struct DebounceCore<T> {
    wait_ms: f64,
    deadline: Option<f64>,
    latest: Option<T>,
}

impl<T> DebounceCore<T> {
    pub fn new(wait_ms: f64) -> Self {
        Self {
            wait_ms,
            deadline: None,
            latest: None,
        }
    }

    /// Record a call at `now_ms`. Any pending delivery is superseded.
    pub fn call(&mut self, now_ms: f64, args: T) {
        self.latest = Some(args);
        self.deadline = Some(now_ms + self.wait_ms);
    }

    /// Deliver the latest arguments if the deadline has passed.
    /// With `wait_ms = 0` the deadline is the call instant itself; delivery
    /// still happens on a later poll, never inside `call`.
    pub fn fire_due(&mut self, now_ms: f64) -> Option<T> {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                self.latest.take()
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Host-timer debounce wrapper around a callback closure.
///
/// `bump()` clears the pending timeout (if any) and schedules a new one, so
/// a burst of bumps results in a single trailing callback invocation. The
/// host timer decides *when*; the [`DebounceCore`] underneath guarantees a
/// single delivery per burst.
pub struct Debounce {
    wait_ms: i32,
    core: Rc<RefCell<DebounceCore<()>>>,
    pending: Rc<Cell<Option<i32>>>,
    fire: Closure<dyn FnMut()>,
}

impl Debounce {
    pub fn new(wait_ms: i32, mut callback: impl FnMut() + 'static) -> Self {
        let core = Rc::new(RefCell::new(DebounceCore::new(f64::from(wait_ms))));
        let pending = Rc::new(Cell::new(None));
        let fired_core = core.clone();
        let fired_pending = pending.clone();
        let fire = Closure::wrap(Box::new(move || {
            fired_pending.set(None);
            // The timeout that fires is always the re-armed one; anything
            // pending is due by construction.
            if fired_core.borrow_mut().fire_due(f64::INFINITY).is_some() {
                callback();
            }
        }) as Box<dyn FnMut()>);
        Self {
            wait_ms,
            core,
            pending,
            fire,
        }
    }

    pub fn bump(&self) -> Result<(), JsValue> {
        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
        self.core.borrow_mut().call(now_ms(), ());
        if let Some(handle) = self.pending.take() {
            win.clear_timeout_with_handle(handle);
        }
        let handle = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            self.fire.as_ref().unchecked_ref(),
            self.wait_ms,
        )?;
        self.pending.set(Some(handle));
        Ok(())
    }
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_collapses_to_one_delivery_with_last_args() {
        let mut core = DebounceCore::new(50.0);
        core.call(0.0, "a");
        assert_eq!(core.fire_due(40.0), None);
        core.call(40.0, "b");
        core.call(70.0, "c");
        assert_eq!(core.fire_due(100.0), None); // deadline re-armed to 120
        assert_eq!(core.fire_due(125.0), Some("c"));
        assert_eq!(core.fire_due(200.0), None);
    }

    #[test]
    fn single_call_fires_once_after_wait() {
        let mut core = DebounceCore::new(50.0);
        core.call(10.0, 7);
        assert_eq!(core.fire_due(60.0), Some(7));
        assert!(!core.is_pending());
        assert_eq!(core.fire_due(1000.0), None);
    }

    #[test]
    fn zero_wait_defers_to_next_poll() {
        let mut core = DebounceCore::new(0.0);
        core.call(5.0, "x");
        assert!(core.is_pending());
        assert_eq!(core.fire_due(5.0), Some("x"));
    }

    #[test]
    fn nothing_fires_before_first_call() {
        let mut core: DebounceCore<u32> = DebounceCore::new(10.0);
        assert_eq!(core.fire_due(1e9), None);
    }
}
