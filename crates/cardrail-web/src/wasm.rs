#![forbid(unsafe_code)]

use core::time::Duration;

use js_sys::Reflect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, Window};

use crate::DeterministicClock;
use crate::binding::AttachOptions;
use crate::dom::SliderDom;
use crate::event::HostEvent;
use crate::registry::SliderRegistry;

fn js_err(err: impl core::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// [`SliderDom`] over the live browser document.
pub struct WebSysDom {
    window: Window,
    root: Element,
}

impl WebSysDom {
    fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let root = window
            .document()
            .and_then(|doc| doc.document_element())
            .ok_or_else(|| JsValue::from_str("no document element"))?;
        Ok(Self { window, root })
    }

    fn set_style(node: &Element, property: &str, value: &str) {
        if let Some(el) = node.dyn_ref::<HtmlElement>() {
            let _ = el.style().set_property(property, value);
        }
    }
}

impl SliderDom for WebSysDom {
    type Node = Element;

    fn document(&self) -> Element {
        self.root.clone()
    }

    fn find(&self, scope: &Element, selector: &str) -> Option<Element> {
        scope.query_selector(selector).ok().flatten()
    }

    fn find_all(&self, scope: &Element, selector: &str) -> Vec<Element> {
        let Ok(list) = scope.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn client_width(&self, node: &Element) -> f64 {
        f64::from(node.client_width())
    }

    fn rendered_width(&self, node: &Element) -> f64 {
        node.get_bounding_client_rect().width()
    }

    fn column_gap(&self, node: &Element) -> Option<f64> {
        let style = self.window.get_computed_style(node).ok().flatten()?;
        let raw = style.get_property_value("column-gap").ok()?;
        raw.trim().trim_end_matches("px").trim().parse().ok()
    }

    fn set_translate_x(&mut self, node: &Element, px: f64) {
        Self::set_style(node, "transform", &format!("translateX({px}px)"));
    }

    fn toggle_class(&mut self, node: &Element, class: &str, on: bool) {
        let _ = node.class_list().toggle_with_force(class, on);
    }

    fn prepare_track(&mut self, track: &Element) {
        Self::set_style(track, "transition", "none");
        Self::set_style(track, "will-change", "transform");
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media("(prefers-reduced-motion: reduce)")
            .ok()
            .flatten()
            .is_some_and(|mq| mq.matches())
    }

    fn has_animation_frames(&self) -> bool {
        Reflect::has(&self.window, &JsValue::from_str("requestAnimationFrame")).unwrap_or(false)
    }
}

/// Page-level carousel driver exported to JS.
///
/// The host script owns event listeners and the frame loop:
/// - `bootstrap("nb4", null, performance.now())` once the DOM is ready;
/// - `input(rootId, json, now)` per slider event, applying the returned bits
///   (`1` = `preventDefault`, `2` = `stopPropagation`);
/// - `broadcast(json, now)` for resize / visibility / media changes;
/// - `tick(now)` from `requestAnimationFrame` or a timeout set to the
///   returned wake-up (`-1` means idle).
#[wasm_bindgen]
pub struct CardRail {
    dom: WebSysDom,
    registry: SliderRegistry<Element>,
    clock: DeterministicClock,
}

#[wasm_bindgen]
impl CardRail {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<CardRail, JsValue> {
        Ok(Self {
            dom: WebSysDom::new()?,
            registry: SliderRegistry::new(),
            clock: DeterministicClock::new(),
        })
    }

    fn at(&mut self, now_ms: f64) -> Duration {
        self.clock.set_ms(now_ms);
        self.clock.now()
    }

    /// Attach the slider inside `#rootId`. `options` is JSON
    /// (`AttachOptions`); omit it for the conventional selectors using
    /// `rootId` as prefix.
    pub fn bootstrap(
        &mut self,
        root_id: &str,
        options: Option<String>,
        now_ms: f64,
    ) -> Result<bool, JsValue> {
        let options = match options {
            Some(json) => AttachOptions::from_json_str(&json).map_err(js_err)?,
            None => AttachOptions::for_prefix(root_id),
        };
        let now = self.at(now_ms);
        Ok(self
            .registry
            .bootstrap(&mut self.dom, root_id, &options, now))
    }

    /// Forward one slider event; returns dispatch bits.
    pub fn input(&mut self, root_id: &str, event_json: &str, now_ms: f64) -> Result<u8, JsValue> {
        let event = HostEvent::from_json_str(event_json).map_err(js_err)?;
        let now = self.at(now_ms);
        let dispatch = self.registry.handle(&mut self.dom, root_id, event, now);
        Ok(dispatch.bits())
    }

    /// Forward a page-level event to every slider.
    pub fn broadcast(&mut self, event_json: &str, now_ms: f64) -> Result<(), JsValue> {
        let event = HostEvent::from_json_str(event_json).map_err(js_err)?;
        let now = self.at(now_ms);
        self.registry.broadcast(&mut self.dom, event, now);
        Ok(())
    }

    /// Drive a frame. Returns the next wake-up in ms, or `-1` when idle.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let now = self.at(now_ms);
        self.registry
            .frame_all(&mut self.dom, now)
            .map_or(-1.0, |at| at.as_secs_f64() * 1000.0)
    }

    /// Whether the next tick should run on an animation frame.
    #[wasm_bindgen(js_name = needsFrame)]
    pub fn needs_frame(&self) -> bool {
        self.registry.needs_frame()
    }

    /// Move the slider in `#rootId` to `index`.
    #[wasm_bindgen(js_name = goTo)]
    pub fn go_to(&mut self, root_id: &str, index: i32, now_ms: f64) {
        let now = self.at(now_ms);
        if let Some(b) = self.registry.get_mut(root_id) {
            b.go_to(&mut self.dom, i64::from(index), now);
        }
    }

    /// Next card in `#rootId`.
    pub fn advance(&mut self, root_id: &str, now_ms: f64) {
        let now = self.at(now_ms);
        if let Some(b) = self.registry.get_mut(root_id) {
            b.advance(&mut self.dom, now);
        }
    }

    /// Previous card in `#rootId`.
    pub fn retreat(&mut self, root_id: &str, now_ms: f64) {
        let now = self.at(now_ms);
        if let Some(b) = self.registry.get_mut(root_id) {
            b.retreat(&mut self.dom, now);
        }
    }

    /// Current index of the slider in `#rootId`, or `-1` if not attached.
    #[wasm_bindgen(js_name = currentIndex)]
    pub fn current_index(&self, root_id: &str) -> i32 {
        self.registry
            .get(root_id)
            .and_then(|b| i32::try_from(b.carousel().current_index()).ok())
            .unwrap_or(-1)
    }

    /// Detach the slider in `#rootId`.
    pub fn detach(&mut self, root_id: &str) -> bool {
        self.registry.detach(&mut self.dom, root_id)
    }

    /// Explicit teardown for JS callers.
    pub fn destroy(&mut self) {
        self.registry.detach_all(&mut self.dom);
    }
}
