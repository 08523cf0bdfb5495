//! Page interaction layer: smooth-scroll navigation, scroll-synced nav
//! highlighting, one-shot fade-in reveals, click ripples and the subtitle
//! typing flourish.
//!
//! Every DOM collaborator is optional. A missing nav, header, subtitle or
//! back-to-top button skips just that behavior; nothing here is fatal.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, ScrollBehavior, ScrollIntoViewOptions,
    ScrollToOptions, window,
};

use crate::config::EffectsConfig;
use crate::debounce::Debounce;

const ACTIVE_CLASS: &str = "active";
const OVERLAY_CLASS: &str = "gradient-overlay";
const CONTAINER_SELECTOR: &str = ".container";

/// Index of the section the viewport is currently "in": the last one whose
/// top edge, minus the offset, has scrolled past.
pub fn active_section(scroll_y: f64, section_tops: &[f64], offset_px: f64) -> Option<usize> {
    let mut active = None;
    for (i, top) in section_tops.iter().enumerate() {
        if scroll_y >= top - offset_px {
            active = Some(i);
        }
    }
    active
}

/// Wire every page behavior. Each sub-setup tolerates missing elements.
pub fn setup(doc: &Document, cfg: &EffectsConfig) -> Result<(), JsValue> {
    ensure_overlay(doc)?;
    raise_content(doc);
    setup_nav(doc, cfg)?;
    setup_scroll(cfg)?;
    setup_reveal(doc, cfg)?;
    setup_ripples(doc, cfg)?;
    setup_back_to_top(doc, cfg)?;
    setup_typing(doc, cfg)?;
    Ok(())
}

/// Append the decorative gradient overlay once.
fn ensure_overlay(doc: &Document) -> Result<(), JsValue> {
    if doc.query_selector(&format!(".{OVERLAY_CLASS}"))?.is_some() {
        return Ok(());
    }
    let overlay = doc.create_element("div")?;
    overlay.set_class_name(OVERLAY_CLASS);
    doc.body()
        .ok_or_else(|| JsValue::from_str("no body"))?
        .append_child(&overlay)?;
    Ok(())
}

/// Lift the main container above the background canvas layers.
fn raise_content(doc: &Document) {
    if let Ok(Some(container)) = doc.query_selector(CONTAINER_SELECTOR) {
        if let Ok(container) = container.dyn_into::<HtmlElement>() {
            let style = container.style();
            let _ = style.set_property("position", "relative");
            let _ = style.set_property("z-index", "10");
        }
    }
}

/// Move the `active` class to the link whose href matches, clearing the rest.
fn mark_active(doc: &Document, selector: &str, active_href: Option<&str>) {
    let Ok(links) = doc.query_selector_all(selector) else {
        return;
    };
    for i in 0..links.length() {
        let Some(node) = links.get(i) else { continue };
        let Ok(link) = node.dyn_into::<Element>() else {
            continue;
        };
        let on = active_href.is_some() && link.get_attribute("href").as_deref() == active_href;
        let _ = link.class_list().toggle_with_force(ACTIVE_CLASS, on);
    }
}

/// Intercept fragment-link clicks and smooth-scroll to the section instead
/// of jumping.
fn setup_nav(doc: &Document, cfg: &EffectsConfig) -> Result<(), JsValue> {
    let links = doc.query_selector_all(cfg.nav_link_selector)?;
    for i in 0..links.length() {
        let Some(node) = links.get(i) else { continue };
        let Ok(link) = node.dyn_into::<Element>() else {
            continue;
        };
        let Some(href) = link.get_attribute("href") else {
            continue;
        };
        if !href.starts_with('#') || href.len() == 1 {
            continue;
        }
        let selector = cfg.nav_link_selector;
        let target_id = href[1..].to_string();
        let self_href = href.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            evt.prevent_default();
            let Some(doc) = window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(target) = doc.get_element_by_id(&target_id) {
                let opts = ScrollIntoViewOptions::new();
                opts.set_behavior(ScrollBehavior::Smooth);
                target.scroll_into_view_with_scroll_into_view_options(&opts);
            }
            mark_active(&doc, selector, Some(&self_href));
        }) as Box<dyn FnMut(_)>);
        link.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

/// Debounced passive scroll handler: active-link sync, back-to-top
/// visibility and the parallax header drift.
fn setup_scroll(cfg: &EffectsConfig) -> Result<(), JsValue> {
    let cfg = *cfg;
    let on_scroll = move || {
        let Some(win) = window() else { return };
        let Some(doc) = win.document() else { return };
        let y = win.scroll_y().unwrap_or(0.0);

        if let Ok(sections) = doc.query_selector_all(cfg.section_selector) {
            let mut tops = Vec::with_capacity(sections.length() as usize);
            let mut ids = Vec::with_capacity(sections.length() as usize);
            for i in 0..sections.length() {
                let Some(node) = sections.get(i) else { continue };
                let Ok(section) = node.dyn_into::<HtmlElement>() else {
                    continue;
                };
                tops.push(f64::from(section.offset_top()));
                ids.push(section.id());
            }
            if let Some(idx) = active_section(y, &tops, cfg.nav_offset_px) {
                if ids[idx].is_empty() {
                    mark_active(&doc, cfg.nav_link_selector, None);
                } else {
                    let href = format!("#{}", ids[idx]);
                    mark_active(&doc, cfg.nav_link_selector, Some(&href));
                }
            }
        }

        if let Some(button) = doc.get_element_by_id(cfg.back_to_top_id) {
            let _ = button
                .class_list()
                .toggle_with_force("visible", y > cfg.back_to_top_reveal_px);
        }

        if let Ok(Some(header)) = doc.query_selector(cfg.header_selector) {
            if let Ok(header) = header.dyn_into::<HtmlElement>() {
                let _ = header.style().set_property(
                    "transform",
                    &format!("translateY({:.1}px)", y * cfg.parallax_factor),
                );
            }
        }
    };

    let debounce = Debounce::new(cfg.scroll_debounce_ms, on_scroll);
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
        debounce.bump().ok();
    }) as Box<dyn FnMut(_)>);
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let opts = AddEventListenerOptions::new();
    opts.set_passive(true);
    win.add_event_listener_with_callback_and_add_event_listener_options(
        "scroll",
        closure.as_ref().unchecked_ref(),
        &opts,
    )?;
    closure.forget();
    Ok(())
}

/// One-shot fade-in: sections start hidden and shifted down; the first
/// qualifying intersection reveals them and stops observing.
fn setup_reveal(doc: &Document, cfg: &EffectsConfig) -> Result<(), JsValue> {
    let sections = doc.query_selector_all(cfg.section_selector)?;
    if sections.length() == 0 {
        return Ok(());
    }

    let callback = Closure::wrap(Box::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                if let Some(el) = target.dyn_ref::<HtmlElement>() {
                    let style = el.style();
                    let _ = style.set_property("opacity", "1");
                    let _ = style.set_property("transform", "translateY(0)");
                }
                // Revealed is final; never re-observed.
                observer.unobserve(&target);
            }
        },
    )
        as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(cfg.reveal_threshold));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();

    for i in 0..sections.length() {
        let Some(node) = sections.get(i) else { continue };
        let Ok(section) = node.dyn_into::<HtmlElement>() else {
            continue;
        };
        let style = section.style();
        let _ = style.set_property("opacity", "0");
        let _ = style.set_property("transform", "translateY(20px)");
        let _ = style.set_property("transition", "opacity 0.6s ease, transform 0.6s ease");
        observer.observe(&section);
    }
    Ok(())
}

/// Click ripples on project cards and link tiles.
fn setup_ripples(doc: &Document, cfg: &EffectsConfig) -> Result<(), JsValue> {
    let targets = doc.query_selector_all(cfg.ripple_selector)?;
    let lifetime = cfg.ripple_lifetime_ms;
    for i in 0..targets.length() {
        let Some(node) = targets.get(i) else { continue };
        let Ok(target) = node.dyn_into::<HtmlElement>() else {
            continue;
        };
        let host = target.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            spawn_ripple(&host, &evt, lifetime).ok();
        }) as Box<dyn FnMut(_)>);
        target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn spawn_ripple(host: &HtmlElement, evt: &web_sys::MouseEvent, lifetime_ms: i32) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    // Offset coordinates are relative to the event target, so the ripple can
    // be positioned without a bounding-rect lookup.
    let size = f64::from(host.offset_width().max(host.offset_height()));
    let x = f64::from(evt.offset_x()) - size / 2.0;
    let y = f64::from(evt.offset_y()) - size / 2.0;
    let ripple: HtmlElement = doc.create_element("span")?.dyn_into()?;
    ripple.set_class_name("ripple");
    ripple.set_attribute(
        "style",
        &format!(
            "position:absolute; left:{x}px; top:{y}px; width:{size}px; \
             height:{size}px; border-radius:50%; pointer-events:none;"
        ),
    )?;
    host.append_child(&ripple)?;
    let remove = Closure::once_into_js(move || {
        ripple.remove();
    });
    win.set_timeout_with_callback_and_timeout_and_arguments_0(remove.unchecked_ref(), lifetime_ms)?;
    Ok(())
}

/// Back-to-top click smooth-scrolls to the page origin. Its visibility
/// class is driven by the scroll handler.
fn setup_back_to_top(doc: &Document, cfg: &EffectsConfig) -> Result<(), JsValue> {
    let Some(button) = doc.get_element_by_id(cfg.back_to_top_id) else {
        return Ok(());
    };
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
        if let Some(win) = window() {
            let opts = ScrollToOptions::new();
            opts.set_top(0.0);
            opts.set_behavior(ScrollBehavior::Smooth);
            win.scroll_to_with_scroll_to_options(&opts);
        }
    }) as Box<dyn FnMut(_)>);
    button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Retype the subtitle one character per tick after a start delay. The
/// `typing-cursor` class stays on until the full text is back.
fn setup_typing(doc: &Document, cfg: &EffectsConfig) -> Result<(), JsValue> {
    let Some(subtitle) = doc.query_selector(cfg.subtitle_selector)? else {
        return Ok(());
    };
    let Some(text) = subtitle.text_content() else {
        return Ok(());
    };
    if text.is_empty() {
        return Ok(());
    }
    subtitle.set_text_content(Some(""));
    let _ = subtitle.class_list().add_1("typing-cursor");

    let chars: Vec<char> = text.chars().collect();
    let index = Rc::new(Cell::new(0usize));
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_again = tick.clone();
    let interval = cfg.typing_interval_ms;
    let target = subtitle.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let i = index.get();
        if i < chars.len() {
            let shown: String = chars[..=i].iter().collect();
            target.set_text_content(Some(&shown));
            index.set(i + 1);
            if let Some(win) = window() {
                let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
                    tick_again.borrow().as_ref().unwrap().as_ref().unchecked_ref(),
                    interval,
                );
            }
        } else {
            let _ = target.class_list().remove_1("typing-cursor");
        }
    }) as Box<dyn FnMut()>));

    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    win.set_timeout_with_callback_and_timeout_and_arguments_0(
        tick.borrow().as_ref().unwrap().as_ref().unchecked_ref(),
        cfg.typing_start_delay_ms,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_section_is_last_one_passed() {
        let tops = [0.0, 400.0, 900.0];
        assert_eq!(active_section(0.0, &tops, 120.0), Some(0));
        assert_eq!(active_section(279.0, &tops, 120.0), Some(0));
        assert_eq!(active_section(280.0, &tops, 120.0), Some(1));
        assert_eq!(active_section(2000.0, &tops, 120.0), Some(2));
    }

    #[test]
    fn no_section_is_active_above_the_first() {
        let tops = [500.0, 900.0];
        assert_eq!(active_section(0.0, &tops, 120.0), None);
        assert_eq!(active_section(379.0, &tops, 120.0), None);
        assert_eq!(active_section(380.0, &tops, 120.0), Some(0));
    }

    #[test]
    fn empty_section_list_yields_none() {
        assert_eq!(active_section(1000.0, &[], 120.0), None);
    }
}
