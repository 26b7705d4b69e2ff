#![forbid(unsafe_code)]

//! One controller bound to one slider element tree.
//!
//! [`attach`] resolves the slider, track and optional controls through
//! [`SliderSelectors`], reads layout, and hands back a [`SliderBinding`].
//! The binding translates forwarded [`HostEvent`]s into controller calls and
//! paints the controller's [`Presentation`] back onto the DOM.
//!
//! # Painting
//!
//! Paints are diffed against the last painted presentation: the transform is
//! written only when the offset changed, and each state class only when its
//! flag flipped. Layout is read on attach and after a settled resize burst,
//! never per frame.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | slider or track missing | [`AttachError::MissingElement`] |
//! | prev/next control missing | attached without that control |
//! | cards not measurable yet | attached dormant; activates on the next relayout |
//! | config out of range | [`AttachError::Config`] |

use core::fmt;
use core::time::Duration;

use cardrail_core::carousel::{Carousel, CarouselState, MotionPolicy, Presentation, SurfaceFlags};
use cardrail_core::config::{CarouselConfig, ConfigError};
use cardrail_core::event::{CarouselEvent, ClickDisposition, MouseButton, PointerEvent, PointerKind};
use cardrail_core::gesture::AxisLock;
use cardrail_core::layout::LayoutSample;
use serde::{Deserialize, Serialize};

use crate::dom::SliderDom;
use crate::event::{ClickTarget, Dispatch, HostEvent};

/// Class set on the slider during a drag.
pub const DRAGGING_CLASS: &str = "dragging";
/// Class set on the slider while settling.
pub const ANIMATING_CLASS: &str = "animating";

const STATE_CLASSES: [(SurfaceFlags, &str); 2] = [
    (SurfaceFlags::DRAGGING, DRAGGING_CLASS),
    (SurfaceFlags::ANIMATING, ANIMATING_CLASS),
];

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Selectors naming the parts of one slider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderSelectors {
    /// Slider surface, looked up under the root.
    pub slider: String,
    /// Translated track, looked up under the slider.
    pub track: String,
    /// Cards, looked up under the slider.
    pub card: String,
    /// Previous control, looked up under the root.
    pub prev: String,
    /// Next control, looked up under the root.
    pub next: String,
}

impl SliderSelectors {
    /// The conventional selector set for a section prefix: `nb4` gives
    /// `#nb4Slider`, `.nb4-slider-wrapper`, `.nb4-product-slide`, `#nb4Prev`
    /// and `#nb4Next`.
    #[must_use]
    pub fn for_prefix(prefix: &str) -> Self {
        Self {
            slider: format!("#{prefix}Slider"),
            track: format!(".{prefix}-slider-wrapper"),
            card: format!(".{prefix}-product-slide"),
            prev: format!("#{prefix}Prev"),
            next: format!("#{prefix}Next"),
        }
    }
}

/// Everything [`attach`] needs besides the DOM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachOptions {
    /// Element selectors.
    pub selectors: SliderSelectors,
    /// Controller tunables.
    #[serde(default)]
    pub config: CarouselConfig,
}

impl AttachOptions {
    /// Conventional selectors for `prefix` with default tunables.
    #[must_use]
    pub fn for_prefix(prefix: &str) -> Self {
        Self {
            selectors: SliderSelectors::for_prefix(prefix),
            config: CarouselConfig::default(),
        }
    }

    /// Replace the tunables.
    #[must_use]
    pub fn with_config(mut self, config: CarouselConfig) -> Self {
        self.config = config;
        self
    }

    /// Decode options from host JSON.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a slider could not be attached.
#[derive(Debug, Clone, PartialEq)]
pub enum AttachError {
    /// A required element was not found.
    MissingElement {
        /// Which part (`"slider"` or `"track"`).
        role: &'static str,
        /// Selector that matched nothing.
        selector: String,
    },
    /// The tunables failed validation.
    Config(ConfigError),
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingElement { role, selector } => {
                write!(f, "{role} element not found: {selector}")
            }
            Self::Config(err) => write!(f, "invalid carousel config: {err}"),
        }
    }
}

impl std::error::Error for AttachError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::MissingElement { .. } => None,
        }
    }
}

impl From<ConfigError> for AttachError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

fn prevent_if(prevent: bool) -> Dispatch {
    if prevent {
        Dispatch::prevent()
    } else {
        Dispatch::default()
    }
}

/// A live slider: controller plus the elements it drives.
#[derive(Debug, Clone)]
pub struct SliderBinding<N> {
    carousel: Carousel,
    selectors: SliderSelectors,
    slider: N,
    track: N,
    prev: Option<N>,
    next: Option<N>,
    painted: Option<Presentation>,
}

/// Resolve the slider under `root` and bind a controller to it.
pub fn attach<D: SliderDom>(
    dom: &mut D,
    root: &D::Node,
    options: &AttachOptions,
    now: Duration,
) -> Result<SliderBinding<D::Node>, AttachError> {
    let selectors = &options.selectors;
    let slider = dom
        .find(root, &selectors.slider)
        .ok_or_else(|| AttachError::MissingElement {
            role: "slider",
            selector: selectors.slider.clone(),
        })?;
    let track = dom
        .find(&slider, &selectors.track)
        .ok_or_else(|| AttachError::MissingElement {
            role: "track",
            selector: selectors.track.clone(),
        })?;
    let prev = dom.find(root, &selectors.prev);
    let next = dom.find(root, &selectors.next);

    let motion = MotionPolicy::detect(dom.prefers_reduced_motion(), dom.has_animation_frames());
    let carousel = Carousel::try_new(options.config.clone())?.with_motion(motion);
    dom.prepare_track(&track);

    let mut binding = SliderBinding {
        carousel,
        selectors: selectors.clone(),
        slider,
        track,
        prev,
        next,
        painted: None,
    };
    let sample = binding.read_layout(dom);
    match binding.carousel.measure(sample, now) {
        Ok(metrics) => tracing::debug!(
            slider = %binding.selectors.slider,
            max_index = metrics.max_index,
            ?motion,
            "slider attached"
        ),
        Err(err) => tracing::debug!(
            slider = %binding.selectors.slider,
            %err,
            "slider attached dormant"
        ),
    }
    binding.paint(dom);
    Ok(binding)
}

impl<N: Clone + PartialEq + fmt::Debug> SliderBinding<N> {
    /// The controller.
    #[must_use]
    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    /// Selectors this binding was attached with.
    #[must_use]
    pub fn selectors(&self) -> &SliderSelectors {
        &self.selectors
    }

    /// Slider element.
    #[must_use]
    pub fn slider(&self) -> &N {
        &self.slider
    }

    /// Track element.
    #[must_use]
    pub fn track(&self) -> &N {
        &self.track
    }

    /// Whether the previous/next controls were found.
    #[must_use]
    pub fn has_controls(&self) -> (bool, bool) {
        (self.prev.is_some(), self.next.is_some())
    }

    /// Whether the host should schedule an animation frame.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.carousel.needs_frame()
    }

    /// Take queued controller events.
    pub fn drain_events(&mut self) -> Vec<CarouselEvent> {
        self.carousel.drain_events()
    }

    fn read_layout<D: SliderDom<Node = N>>(&self, dom: &D) -> LayoutSample {
        let cards = dom.find_all(&self.slider, &self.selectors.card);
        LayoutSample {
            container_width: dom.client_width(&self.slider),
            card_width: cards.first().map_or(0.0, |card| dom.rendered_width(card)),
            gap: dom.column_gap(&self.track),
            card_count: cards.len(),
        }
    }

    fn paint<D: SliderDom<Node = N>>(&mut self, dom: &mut D) {
        let next = self.carousel.presentation();
        let prev = self.painted;
        if prev.is_none_or(|p| p.offset != next.offset) {
            dom.set_translate_x(&self.track, next.offset);
        }
        for (flag, class) in STATE_CLASSES {
            let was = prev.is_some_and(|p| p.flags.contains(flag));
            let is = next.flags.contains(flag);
            if prev.is_none() || was != is {
                dom.toggle_class(&self.slider, class, is);
            }
        }
        self.painted = Some(next);
    }

    /// Forward one DOM event.
    pub fn handle<D: SliderDom<Node = N>>(
        &mut self,
        dom: &mut D,
        event: HostEvent,
        now: Duration,
    ) -> Dispatch {
        let dispatch = match event {
            HostEvent::MouseDown { x, y, button } => {
                self.carousel.pointer_down(PointerEvent {
                    kind: PointerKind::Mouse(MouseButton::from_dom(button)),
                    ..PointerEvent::mouse(x, y, now)
                });
                Dispatch::default()
            }
            HostEvent::TouchStart { x, y } => {
                self.carousel.pointer_down(PointerEvent::touch(x, y, now));
                Dispatch::default()
            }
            HostEvent::MouseMove { x, y } => {
                prevent_if(self.carousel.pointer_move(PointerEvent::mouse(x, y, now)).prevent_default)
            }
            HostEvent::TouchMove { x, y } => {
                prevent_if(self.carousel.pointer_move(PointerEvent::touch(x, y, now)).prevent_default)
            }
            HostEvent::MouseUp | HostEvent::TouchEnd | HostEvent::TouchCancel => {
                let owned = self.carousel.state() == CarouselState::Dragging(AxisLock::Horizontal);
                if matches!(event, HostEvent::TouchCancel) {
                    self.carousel.pointer_cancel(now);
                } else {
                    self.carousel.pointer_up(now);
                }
                prevent_if(owned)
            }
            HostEvent::Click {
                target: ClickTarget::Slider,
            } => match self.carousel.click() {
                ClickDisposition::Suppress => Dispatch::swallow(),
                ClickDisposition::Pass => Dispatch::default(),
            },
            HostEvent::Click {
                target: ClickTarget::Prev,
            } => {
                if self.prev.is_some() {
                    self.carousel.press_prev(now);
                }
                Dispatch::default()
            }
            HostEvent::Click {
                target: ClickTarget::Next,
            } => {
                if self.next.is_some() {
                    self.carousel.press_next(now);
                }
                Dispatch::default()
            }
            HostEvent::DragStart => Dispatch::prevent(),
            HostEvent::PointerEnter => {
                self.carousel.pointer_enter(now);
                Dispatch::default()
            }
            HostEvent::PointerLeave => {
                self.carousel.pointer_leave(now);
                Dispatch::default()
            }
            HostEvent::Resize => {
                self.carousel.notify_resize(now);
                Dispatch::default()
            }
            HostEvent::Visibility { hidden } => {
                self.carousel.set_visible(!hidden, now);
                Dispatch::default()
            }
            HostEvent::ReducedMotion { reduce } => {
                let motion = MotionPolicy::detect(reduce, dom.has_animation_frames());
                self.carousel.set_motion(motion, now);
                Dispatch::default()
            }
        };
        tracing::trace!(?event, ?dispatch, "host event");
        self.paint(dom);
        dispatch
    }

    /// Drive one host frame: advance time, re-measure after a settled resize
    /// burst, paint. Returns when the controller next needs a tick.
    pub fn frame<D: SliderDom<Node = N>>(&mut self, dom: &mut D, now: Duration) -> Option<Duration> {
        let result = self.carousel.tick(now);
        if result.relayout {
            let sample = self.read_layout(dom);
            if let Err(err) = self.carousel.relayout(sample, now) {
                tracing::debug!(slider = %self.selectors.slider, %err, "relayout deferred");
            }
        }
        self.paint(dom);
        self.carousel.next_wakeup()
    }

    /// Jump to `index` (clamped).
    pub fn go_to<D: SliderDom<Node = N>>(&mut self, dom: &mut D, index: i64, now: Duration) {
        self.carousel.go_to(index, now);
        self.paint(dom);
    }

    /// Next card, wrapping at the end.
    pub fn advance<D: SliderDom<Node = N>>(&mut self, dom: &mut D, now: Duration) {
        self.carousel.advance(now);
        self.paint(dom);
    }

    /// Previous card.
    pub fn retreat<D: SliderDom<Node = N>>(&mut self, dom: &mut D, now: Duration) {
        self.carousel.retreat(now);
        self.paint(dom);
    }

    /// Stop every timer and animation and clear the state classes. The
    /// track keeps its last transform.
    pub fn detach<D: SliderDom<Node = N>>(&mut self, dom: &mut D) {
        if !self.carousel.is_attached() {
            return;
        }
        self.carousel.detach();
        for (_, class) in STATE_CLASSES {
            dom.toggle_class(&self.slider, class, false);
        }
        tracing::debug!(slider = %self.selectors.slider, "slider detached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_dom::MemoryDom;
    use cardrail_core::animation::Easing;
    use pretty_assertions::assert_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn fixture() -> (MemoryDom, crate::memory_dom::NodeId) {
        let mut dom = MemoryDom::new();
        let root = dom.mount_slider("nb4", 5, 640.0, 300.0, 20.0);
        (dom, root)
    }

    #[test]
    fn prefix_selectors() {
        let s = SliderSelectors::for_prefix("nb3");
        assert_eq!(s.slider, "#nb3Slider");
        assert_eq!(s.track, ".nb3-slider-wrapper");
        assert_eq!(s.card, ".nb3-product-slide");
        assert_eq!(s.prev, "#nb3Prev");
        assert_eq!(s.next, "#nb3Next");
    }

    #[test]
    fn options_from_json_fill_defaults() {
        let json = r##"{
            "selectors": {"slider":"#s","track":".t","card":".c","prev":"#p","next":"#n"},
            "config": {
                "settle_ms": 300,
                "settle_easing": "ease_out_cubic",
                "auto_advance": {"enabled": false}
            }
        }"##;
        let opts = AttachOptions::from_json_str(json).unwrap();
        assert_eq!(opts.config.settle_ms, 300);
        assert_eq!(opts.config.settle_easing, Easing::EaseOutCubic);
        assert!(!opts.config.auto_advance.enabled);
        assert_eq!(opts.config.auto_advance.interval_ms, 4200);
        assert_eq!(opts.config.gesture, CarouselConfig::default().gesture);
    }

    #[test]
    fn attach_measures_and_paints() {
        let (mut dom, root) = fixture();
        let b = attach(&mut dom, &root, &AttachOptions::for_prefix("nb4"), ms(0)).unwrap();
        assert!(b.carousel().is_active());
        assert_eq!(b.carousel().max_index(), 3);
        assert_eq!(b.has_controls(), (true, true));
        assert_eq!(dom.translate_x(*b.track()), Some(0.0));
        assert_eq!(dom.style(*b.track(), "transition"), Some("none"));
    }

    #[test]
    fn missing_track_is_an_error() {
        let (mut dom, root) = fixture();
        let mut opts = AttachOptions::for_prefix("nb4");
        opts.selectors.track = ".nope".into();
        let err = attach(&mut dom, &root, &opts, ms(0)).unwrap_err();
        assert_eq!(
            err,
            AttachError::MissingElement {
                role: "track",
                selector: ".nope".into()
            }
        );
        assert_eq!(err.to_string(), "track element not found: .nope");
    }

    #[test]
    fn bad_config_is_an_error() {
        let (mut dom, root) = fixture();
        let mut config = CarouselConfig::default();
        config.momentum.friction = 1.5;
        let opts = AttachOptions::for_prefix("nb4").with_config(config);
        assert!(matches!(
            attach(&mut dom, &root, &opts, ms(0)),
            Err(AttachError::Config(_))
        ));
    }

    #[test]
    fn drag_toggles_class_and_prevents_default() {
        let (mut dom, root) = fixture();
        let mut b = attach(&mut dom, &root, &AttachOptions::for_prefix("nb4"), ms(0)).unwrap();
        let slider = *b.slider();

        let d = b.handle(&mut dom, HostEvent::MouseDown { x: 500.0, y: 50.0, button: 0 }, ms(10));
        assert_eq!(d, Dispatch::default());
        assert!(dom.has_class(slider, DRAGGING_CLASS));

        let d = b.handle(&mut dom, HostEvent::MouseMove { x: 420.0, y: 50.0 }, ms(210));
        assert_eq!(d, Dispatch::prevent());
        assert_eq!(dom.translate_x(*b.track()), Some(-80.0));

        let d = b.handle(&mut dom, HostEvent::MouseUp, ms(220));
        assert_eq!(d, Dispatch::prevent());
        assert!(!dom.has_class(slider, DRAGGING_CLASS));
        assert!(dom.has_class(slider, ANIMATING_CLASS));

        let d = b.handle(&mut dom, HostEvent::Click { target: ClickTarget::Slider }, ms(230));
        assert_eq!(d, Dispatch::swallow());
        let d = b.handle(&mut dom, HostEvent::Click { target: ClickTarget::Slider }, ms(240));
        assert_eq!(d, Dispatch::default());
    }

    #[test]
    fn non_primary_button_is_ignored() {
        let (mut dom, root) = fixture();
        let mut b = attach(&mut dom, &root, &AttachOptions::for_prefix("nb4"), ms(0)).unwrap();
        b.handle(&mut dom, HostEvent::MouseDown { x: 500.0, y: 50.0, button: 2 }, ms(10));
        assert!(!dom.has_class(*b.slider(), DRAGGING_CLASS));
        let d = b.handle(&mut dom, HostEvent::MouseMove { x: 300.0, y: 50.0 }, ms(20));
        assert_eq!(d, Dispatch::default());
    }

    #[test]
    fn native_dragstart_always_prevented() {
        let (mut dom, root) = fixture();
        let mut b = attach(&mut dom, &root, &AttachOptions::for_prefix("nb4"), ms(0)).unwrap();
        assert_eq!(b.handle(&mut dom, HostEvent::DragStart, ms(0)), Dispatch::prevent());
    }

    #[test]
    fn paints_are_diffed() {
        let (mut dom, root) = fixture();
        let mut b = attach(&mut dom, &root, &AttachOptions::for_prefix("nb4"), ms(0)).unwrap();
        let writes = dom.writes();
        for t in 1..10 {
            b.frame(&mut dom, ms(t * 16));
        }
        assert_eq!(dom.writes(), writes);
    }

    #[test]
    fn next_control_then_frames_settle() {
        let (mut dom, root) = fixture();
        let mut b = attach(&mut dom, &root, &AttachOptions::for_prefix("nb4"), ms(0)).unwrap();
        b.handle(&mut dom, HostEvent::Click { target: ClickTarget::Next }, ms(100));
        assert_eq!(b.carousel().current_index(), 1);
        let mut t = 100;
        while b.needs_frame() {
            t += 16;
            b.frame(&mut dom, ms(t));
        }
        assert_eq!(dom.translate_x(*b.track()), Some(-320.0));
        assert!(!dom.has_class(*b.slider(), ANIMATING_CLASS));
    }

    #[test]
    fn resize_relayouts_from_dom() {
        let (mut dom, root) = fixture();
        let mut b = attach(&mut dom, &root, &AttachOptions::for_prefix("nb4"), ms(0)).unwrap();
        b.go_to(&mut dom, 3, ms(0));
        let slider = *b.slider();
        dom.set_client_width(slider, 960.0);
        b.handle(&mut dom, HostEvent::Resize, ms(1000));
        assert_eq!(b.frame(&mut dom, ms(1100)), Some(ms(1200)));
        b.frame(&mut dom, ms(1200));
        assert_eq!(b.carousel().max_index(), 2);
        assert_eq!(dom.translate_x(*b.track()), Some(-640.0));
    }

    #[test]
    fn reduced_motion_media_change() {
        let (mut dom, root) = fixture();
        let mut b = attach(&mut dom, &root, &AttachOptions::for_prefix("nb4"), ms(0)).unwrap();
        b.handle(&mut dom, HostEvent::ReducedMotion { reduce: true }, ms(0));
        b.advance(&mut dom, ms(10));
        assert_eq!(dom.translate_x(*b.track()), Some(-320.0));
        assert!(!b.needs_frame());
    }

    #[test]
    fn detach_clears_classes() {
        let (mut dom, root) = fixture();
        let mut b = attach(&mut dom, &root, &AttachOptions::for_prefix("nb4"), ms(0)).unwrap();
        b.handle(&mut dom, HostEvent::TouchStart { x: 500.0, y: 50.0 }, ms(10));
        assert!(dom.has_class(*b.slider(), DRAGGING_CLASS));
        b.detach(&mut dom);
        b.detach(&mut dom);
        assert!(!dom.has_class(*b.slider(), DRAGGING_CLASS));
        assert_eq!(b.frame(&mut dom, ms(5000)), None);
        assert_eq!(
            b.drain_events().iter().filter(|e| **e == CarouselEvent::Detached).count(),
            1
        );
    }
}
