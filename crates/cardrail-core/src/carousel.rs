#![forbid(unsafe_code)]

//! The carousel controller.
//!
//! [`Carousel`] owns one horizontal strip of equal-width cards. It turns host
//! input (pointer samples, control presses, resize and visibility
//! notifications) plus host time into a strip offset, a current index, and a
//! queue of [`CarouselEvent`]s.
//!
//! # State machine
//!
//! ```text
//!            pointer_down                 lock x          pointer_up
//!   Idle ───────────────▶ Dragging(undecided) ──▶ Dragging(x) ──┬──▶ Momentum ──▶ Settling ──▶ Idle
//!    ▲                         │ lock y                         └──────────────▶ Settling ──▶ Idle
//!    └─────────────────────────┘ (abandon: page scroll owns the gesture)
//! ```
//!
//! Exactly one [`Phase`] is live at a time, so momentum can never run during
//! a drag and a settle can never overlap a momentum run. Auto-advance and
//! its resume delay share one [`AutoSchedule`] slot.
//!
//! # Invariants
//!
//! 1. `0 <= current_index <= max_index` at all times.
//! 2. In `Idle` after a settle or relayout, `offset == -current_index * step`
//!    exactly.
//! 3. A gesture that locks vertical never moves the strip and never asks the
//!    host to prevent default.
//! 4. A release commits at most one index (with
//!    [`ReleasePolicy::Adjacent`](crate::config::ReleasePolicy::Adjacent)).
//! 5. Auto-advance only fires in `Idle`.
//! 6. After [`detach`](Carousel::detach), no deadline and no frame request
//!    remain and every input is a no-op.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | layout not measurable | controller stays dormant; inputs are no-ops |
//! | zero cards | active, `max_index = 0`, navigation is a no-op |
//! | no animation frames / reduced motion | [`MotionPolicy::Instant`] jumps |
//! | resize storm | one debounced relayout per burst |

use std::time::Duration;

use bitflags::bitflags;

use crate::animation::{Animation, Tween};
use crate::config::{CarouselConfig, ConfigError};
use crate::event::{
    CarouselEvent, ChangeCause, ClickDisposition, MoveResponse, PointerEvent,
};
use crate::gesture::{AxisLock, Gesture, GestureStep, Release, resolve_release};
use crate::layout::{self, LayoutSample, MeasureError, TrackMetrics};
use crate::momentum::Momentum;
use crate::resize::ResizeDebounce;
use crate::schedule::{AutoSchedule, ScheduleTick};

bitflags! {
    /// Presentational state the host mirrors onto the slider element.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SurfaceFlags: u8 {
        /// A pointer gesture is in progress.
        const DRAGGING = 1 << 0;
        /// A settle animation is running.
        const ANIMATING = 1 << 1;
    }
}

/// Whether transitions animate or jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionPolicy {
    /// Ease-out settles and momentum decay.
    #[default]
    Animated,
    /// Every transition lands immediately; no momentum.
    Instant,
}

impl MotionPolicy {
    /// Derive the policy from the host's reduced-motion preference and frame
    /// callback support.
    #[must_use]
    pub fn detect(prefers_reduced_motion: bool, has_animation_frames: bool) -> Self {
        if prefers_reduced_motion || !has_animation_frames {
            Self::Instant
        } else {
            Self::Animated
        }
    }
}

/// What the host should draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    /// Track translation in pixels.
    pub offset: f64,
    /// State classes.
    pub flags: SurfaceFlags,
}

/// Result of [`Carousel::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickResult {
    /// A resize burst settled; sample layout and call
    /// [`Carousel::relayout`].
    pub relayout: bool,
    /// An animation is running; tick again on the next frame.
    pub frame_requested: bool,
}

/// Coarse controller state for hosts and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselState {
    /// Waiting for a usable measurement.
    Dormant,
    /// At rest (possibly auto-advancing).
    Idle,
    /// Pointer gesture active.
    Dragging(AxisLock),
    /// Ease-out animation toward an index.
    Settling,
    /// Free decay after a flick.
    Momentum,
    /// Released; all inputs ignored.
    Detached,
}

#[derive(Debug, Clone, PartialEq)]
struct Settle {
    tween: Tween,
    index: usize,
    last: Duration,
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Dragging(Gesture),
    Settling(Settle),
    Momentum(Momentum),
}

enum MotionOutcome {
    Settled(usize),
    Exhausted(Release),
}

/// Gesture-driven, auto-advancing card carousel.
#[derive(Debug, Clone)]
pub struct Carousel {
    config: CarouselConfig,
    metrics: Option<TrackMetrics>,
    index: usize,
    offset: f64,
    phase: Phase,
    auto: AutoSchedule,
    resize: ResizeDebounce,
    motion: MotionPolicy,
    hidden: bool,
    hovered: bool,
    suppress_click: bool,
    attached: bool,
    events: Vec<CarouselEvent>,
}

impl Carousel {
    /// Create a dormant controller. It activates on the first successful
    /// [`measure`](Self::measure).
    #[must_use]
    pub fn new(config: CarouselConfig) -> Self {
        let resize = ResizeDebounce::new(config.resize_debounce())
            .with_hard_deadline(config.resize_hard_deadline_ms.map(Duration::from_millis));
        Self {
            config,
            metrics: None,
            index: 0,
            offset: 0.0,
            phase: Phase::Idle,
            auto: AutoSchedule::Stopped,
            resize,
            motion: MotionPolicy::Animated,
            hidden: false,
            hovered: false,
            suppress_click: false,
            attached: true,
            events: Vec::new(),
        }
    }

    /// Validate `config`, then create a dormant controller.
    pub fn try_new(config: CarouselConfig) -> Result<Self, ConfigError> {
        if let Err(err) = config.validate() {
            crate::warn!(%err, "rejected carousel config");
            return Err(err);
        }
        Ok(Self::new(config))
    }

    /// Set the initial motion policy (builder).
    #[must_use]
    pub fn with_motion(mut self, motion: MotionPolicy) -> Self {
        self.motion = motion;
        self
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Current index.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Current strip offset in pixels.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Largest valid index (0 while dormant).
    #[must_use]
    pub fn max_index(&self) -> usize {
        self.metrics.map_or(0, |m| m.max_index)
    }

    /// Latest successful measurement.
    #[must_use]
    pub fn metrics(&self) -> Option<&TrackMetrics> {
        self.metrics.as_ref()
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Motion policy in use.
    #[must_use]
    pub fn motion(&self) -> MotionPolicy {
        self.motion
    }

    /// Auto-advance timer slot.
    #[must_use]
    pub fn auto_schedule(&self) -> AutoSchedule {
        self.auto
    }

    /// Whether the controller is attached and measured.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.attached && self.metrics.is_some()
    }

    /// Whether [`detach`](Self::detach) has not been called.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Coarse state.
    #[must_use]
    pub fn state(&self) -> CarouselState {
        if !self.attached {
            return CarouselState::Detached;
        }
        if self.metrics.is_none() {
            return CarouselState::Dormant;
        }
        match &self.phase {
            Phase::Idle => CarouselState::Idle,
            Phase::Dragging(g) => CarouselState::Dragging(g.lock()),
            Phase::Settling(_) => CarouselState::Settling,
            Phase::Momentum(_) => CarouselState::Momentum,
        }
    }

    /// What the host should draw.
    #[must_use]
    pub fn presentation(&self) -> Presentation {
        let flags = match &self.phase {
            Phase::Dragging(g) if g.lock() != AxisLock::Vertical => SurfaceFlags::DRAGGING,
            Phase::Settling(_) => SurfaceFlags::ANIMATING,
            _ => SurfaceFlags::empty(),
        };
        Presentation {
            offset: self.offset,
            flags,
        }
    }

    /// Take queued transition events.
    pub fn drain_events(&mut self) -> Vec<CarouselEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether an animation wants per-frame ticks.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.attached && matches!(self.phase, Phase::Settling(_) | Phase::Momentum(_))
    }

    /// Earliest time the host should call [`tick`](Self::tick) again.
    #[must_use]
    pub fn next_wakeup(&self) -> Option<Duration> {
        if !self.attached {
            return None;
        }
        let frame = match &self.phase {
            Phase::Settling(s) => Some(s.last),
            Phase::Momentum(m) => Some(m.next_frame_at(&self.config.momentum)),
            _ => None,
        };
        [frame, self.auto.deadline(), self.resize.deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    /// Measure the track. The first success activates the controller at
    /// index 0 and starts auto-advance; later successes re-clamp like
    /// [`relayout`](Self::relayout).
    ///
    /// A failure keeps the previous metrics; an active controller whose
    /// auto-advance was paused (by a resize) still schedules its resume.
    pub fn measure(
        &mut self,
        sample: LayoutSample,
        now: Duration,
    ) -> Result<TrackMetrics, MeasureError> {
        let metrics = match layout::measure(sample, self.config.fallback_gap_px) {
            Ok(m) => m,
            Err(err) => {
                crate::trace!(%err, "layout not measurable yet");
                if self.metrics.is_some() && self.auto == AutoSchedule::Stopped {
                    self.request_resume(now, self.config.auto_advance.resume_delay());
                }
                return Err(err);
            }
        };
        if !self.attached {
            return Ok(metrics);
        }
        if self.metrics.is_none() {
            self.activate(metrics, now);
        } else {
            self.apply_relayout(metrics, now);
        }
        Ok(metrics)
    }

    /// Re-measure after a settled resize burst: clamp the index to the new
    /// range and jump to its offset without animation.
    pub fn relayout(
        &mut self,
        sample: LayoutSample,
        now: Duration,
    ) -> Result<TrackMetrics, MeasureError> {
        self.measure(sample, now)
    }

    /// Record a viewport resize. Auto-advance pauses until the burst
    /// settles and [`tick`](Self::tick) reports `relayout`.
    pub fn notify_resize(&mut self, now: Duration) {
        if !self.attached {
            return;
        }
        self.pause_auto();
        self.resize.handle_resize(now);
    }

    fn activate(&mut self, metrics: TrackMetrics, now: Duration) {
        self.metrics = Some(metrics);
        self.index = 0;
        self.offset = metrics.offset_for(0);
        self.phase = Phase::Idle;
        crate::debug!(
            max_index = metrics.max_index,
            visible = metrics.visible_count,
            "carousel activated"
        );
        self.events.push(CarouselEvent::Activated {
            max_index: metrics.max_index,
        });
        if self.config.auto_advance.enabled && !self.hidden && !metrics.is_empty() {
            self.auto.start(now, self.config.auto_advance.interval());
        }
    }

    fn apply_relayout(&mut self, metrics: TrackMetrics, now: Duration) {
        let from = self.index;
        self.metrics = Some(metrics);
        self.phase = Phase::Idle;
        self.index = from.min(metrics.max_index);
        self.offset = metrics.offset_for(self.index);
        crate::debug!(max_index = metrics.max_index, index = self.index, "relayout");
        self.events.push(CarouselEvent::Relayout {
            max_index: metrics.max_index,
        });
        if from != self.index {
            self.events.push(CarouselEvent::IndexChanged {
                from,
                to: self.index,
                cause: ChangeCause::Relayout,
            });
        }
        self.request_resume(now, self.config.auto_advance.resume_delay());
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    fn live_metrics(&self) -> Option<TrackMetrics> {
        self.metrics.filter(|m| self.attached && !m.is_empty())
    }

    /// Move to `index`, clamped into `[0, max_index]`.
    ///
    /// Ignored while dormant, detached, with no cards, or mid-drag.
    pub fn go_to(&mut self, index: i64, now: Duration) {
        self.navigate(index, now, ChangeCause::Navigate);
    }

    /// Move one card forward, wrapping from `max_index` to 0.
    pub fn advance(&mut self, now: Duration) {
        self.advance_with(now, ChangeCause::Navigate);
    }

    /// Move one card back (no wrap).
    pub fn retreat(&mut self, now: Duration) {
        self.retreat_with(now, ChangeCause::Navigate);
    }

    /// Next control pressed: pause auto-advance, advance, resume later.
    pub fn press_next(&mut self, now: Duration) {
        if self.live_metrics().is_none() {
            return;
        }
        self.pause_auto();
        self.advance_with(now, ChangeCause::Control);
        self.request_resume(now, self.config.auto_advance.resume_delay());
    }

    /// Previous control pressed: pause auto-advance, retreat, resume later.
    pub fn press_prev(&mut self, now: Duration) {
        if self.live_metrics().is_none() {
            return;
        }
        self.pause_auto();
        self.retreat_with(now, ChangeCause::Control);
        self.request_resume(now, self.config.auto_advance.resume_delay());
    }

    fn advance_with(&mut self, now: Duration, cause: ChangeCause) {
        let Some(metrics) = self.live_metrics() else {
            return;
        };
        let next = if self.index >= metrics.max_index {
            0
        } else {
            self.index + 1
        };
        self.navigate(next as i64, now, cause);
    }

    fn retreat_with(&mut self, now: Duration, cause: ChangeCause) {
        self.navigate(self.index as i64 - 1, now, cause);
    }

    fn navigate(&mut self, target: i64, now: Duration, cause: ChangeCause) {
        let Some(metrics) = self.live_metrics() else {
            return;
        };
        if matches!(self.phase, Phase::Dragging(_)) {
            crate::trace!(target, "navigation ignored during drag");
            return;
        }
        self.settle_to(metrics.clamp_index(target), now, cause);
    }

    fn settle_to(&mut self, index: usize, now: Duration, cause: ChangeCause) {
        let Some(metrics) = self.metrics else {
            return;
        };
        let from = self.index;
        self.index = index;
        if from != index {
            self.events.push(CarouselEvent::IndexChanged {
                from,
                to: index,
                cause,
            });
        }

        let target = metrics.offset_for(index);
        if self.motion == MotionPolicy::Instant || self.offset == target {
            self.land(index, target);
            return;
        }
        self.phase = Phase::Settling(Settle {
            tween: Tween::new(self.offset, target, self.config.settle_duration())
                .easing(self.config.settle_easing),
            index,
            last: now,
        });
    }

    fn land(&mut self, index: usize, target: f64) {
        self.offset = target;
        self.phase = Phase::Idle;
        crate::debug!(index, "settled");
        self.events.push(CarouselEvent::Settled { index });
    }

    // -----------------------------------------------------------------------
    // Gestures
    // -----------------------------------------------------------------------

    /// Pointer or touch down on the slider.
    ///
    /// Interrupts a running settle or momentum run; the drag starts from the
    /// strip's current visual offset.
    pub fn pointer_down(&mut self, event: PointerEvent) {
        if self.live_metrics().is_none() || !event.can_start_drag() {
            return;
        }
        match &self.phase {
            Phase::Dragging(_) => return,
            Phase::Settling(_) | Phase::Momentum(_) => {
                crate::trace!(offset = self.offset, "gesture interrupts motion");
            }
            Phase::Idle => {}
        }
        self.phase = Phase::Dragging(Gesture::begin(event.sample(), self.offset));
        self.suppress_click = false;
        self.pause_auto();
    }

    /// Pointer or touch move.
    pub fn pointer_move(&mut self, event: PointerEvent) -> MoveResponse {
        let Some(metrics) = self.metrics.filter(|_| self.attached) else {
            return MoveResponse::default();
        };
        let Phase::Dragging(gesture) = &mut self.phase else {
            return MoveResponse::default();
        };
        let was_undecided = gesture.lock() == AxisLock::Undecided;
        match gesture.update(event.sample(), metrics.bounds(), &self.config.gesture) {
            GestureStep::Pending => MoveResponse::default(),
            GestureStep::Abandon => {
                crate::debug!("gesture locked vertical; yielding to page scroll");
                self.events.push(CarouselEvent::DragAbandoned);
                self.phase = Phase::Idle;
                self.come_to_rest(event.time);
                self.request_resume(event.time, self.config.auto_advance.resume_delay());
                MoveResponse::default()
            }
            GestureStep::Pan { offset } => {
                if was_undecided {
                    crate::trace!("gesture locked horizontal");
                    self.events.push(CarouselEvent::DragLocked);
                }
                self.offset = offset;
                MoveResponse {
                    prevent_default: true,
                }
            }
        }
    }

    /// Pointer or touch released.
    pub fn pointer_up(&mut self, now: Duration) {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        let Phase::Dragging(gesture) = phase else {
            self.phase = phase;
            return;
        };

        if gesture.lock() == AxisLock::Horizontal {
            self.suppress_click = true;
            let release = gesture.release();
            let flick = release.velocity.abs() > self.config.gesture.min_velocity;
            if flick && self.motion == MotionPolicy::Animated {
                crate::debug!(velocity = release.velocity, "momentum started");
                self.events.push(CarouselEvent::MomentumStarted {
                    velocity: release.velocity,
                });
                self.phase = Phase::Momentum(Momentum::launch(
                    release.offset,
                    release.velocity,
                    gesture.start_offset(),
                    now,
                ));
            } else {
                self.resolve(release, now);
            }
        } else {
            self.come_to_rest(now);
        }
        self.request_resume(now, self.config.auto_advance.resume_delay());
    }

    /// Touch cancelled; treated as a release.
    pub fn pointer_cancel(&mut self, now: Duration) {
        self.pointer_up(now);
    }

    /// Click on the slider. The first click after a horizontal drag is
    /// swallowed.
    pub fn click(&mut self) -> ClickDisposition {
        if std::mem::take(&mut self.suppress_click) {
            ClickDisposition::Suppress
        } else {
            ClickDisposition::Pass
        }
    }

    fn resolve(&mut self, release: Release, now: Duration) {
        let Some(metrics) = self.metrics else {
            return;
        };
        let index = resolve_release(
            self.config.release,
            release,
            self.index,
            &metrics,
            &self.config.gesture,
        );
        self.settle_to(index, now, ChangeCause::Gesture);
    }

    /// Return to the current index if an interrupted animation left the
    /// strip between boundaries.
    fn come_to_rest(&mut self, now: Duration) {
        match self.metrics {
            Some(m) if self.offset != m.offset_for(self.index) => {
                self.settle_to(self.index, now, ChangeCause::Gesture);
            }
            _ => self.phase = Phase::Idle,
        }
    }

    // -----------------------------------------------------------------------
    // Environment
    // -----------------------------------------------------------------------

    /// Pointer entered the slider.
    pub fn pointer_enter(&mut self, _now: Duration) {
        if !self.attached || !self.config.pause_on_hover {
            return;
        }
        self.hovered = true;
        self.pause_auto();
    }

    /// Pointer left the slider.
    pub fn pointer_leave(&mut self, now: Duration) {
        if !self.attached || !self.config.pause_on_hover {
            return;
        }
        self.hovered = false;
        self.request_resume(now, self.config.auto_advance.resume_delay());
    }

    /// Page visibility changed.
    pub fn set_visible(&mut self, visible: bool, now: Duration) {
        if !self.attached {
            return;
        }
        if !visible {
            self.hidden = true;
            self.pause_auto();
        } else if self.hidden {
            self.hidden = false;
            self.request_resume(now, self.config.auto_advance.visibility_resume_delay());
        }
    }

    /// Switch between animated and instant transitions. A running animation
    /// lands immediately when switching to [`MotionPolicy::Instant`].
    pub fn set_motion(&mut self, motion: MotionPolicy, now: Duration) {
        self.motion = motion;
        if motion == MotionPolicy::Animated {
            return;
        }
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Settling(settle) => self.land(settle.index, settle.tween.target()),
            Phase::Momentum(run) => {
                self.offset = run.offset();
                self.resolve(
                    Release {
                        moved: run.offset() - run.origin_offset(),
                        offset: run.offset(),
                        velocity: 0.0,
                    },
                    now,
                );
            }
            other => self.phase = other,
        }
    }

    fn pause_auto(&mut self) {
        if self.auto != AutoSchedule::Stopped {
            self.auto.pause();
            crate::debug!("auto-advance paused");
            self.events.push(CarouselEvent::AutoPaused);
        }
    }

    fn request_resume(&mut self, now: Duration, delay: Duration) {
        let Some(metrics) = self.live_metrics() else {
            return;
        };
        if !self.config.auto_advance.enabled || self.hidden || self.hovered || metrics.is_empty() {
            return;
        }
        self.auto.resume_later(now, delay);
    }

    // -----------------------------------------------------------------------
    // Time
    // -----------------------------------------------------------------------

    /// Advance animations, the resize debounce, and the auto-advance timer
    /// to `now`.
    pub fn tick(&mut self, now: Duration) -> TickResult {
        if !self.attached {
            return TickResult::default();
        }
        self.step_motion(now);

        let mut result = TickResult::default();
        if let Some(apply) = self.resize.poll(now) {
            crate::debug!(
                coalesced = apply.coalesced,
                forced = apply.forced,
                "resize burst settled"
            );
            result.relayout = apply.coalesced > 0;
        }

        let interval = self.config.auto_advance.interval();
        while let Some(tick) = self.auto.poll(now, interval) {
            match tick {
                ScheduleTick::Resumed => {
                    crate::debug!("auto-advance resumed");
                    self.events.push(CarouselEvent::AutoResumed);
                }
                ScheduleTick::Fire if matches!(self.phase, Phase::Idle) => {
                    self.advance_with(now, ChangeCause::Auto);
                }
                ScheduleTick::Fire => {
                    crate::trace!("auto-advance skipped while in motion");
                }
            }
        }

        result.frame_requested = self.needs_frame();
        result
    }

    fn step_motion(&mut self, now: Duration) {
        let Some(metrics) = self.metrics else {
            return;
        };
        let outcome = match &mut self.phase {
            Phase::Settling(settle) => {
                settle.tween.tick(now.saturating_sub(settle.last));
                settle.last = settle.last.max(now);
                if settle.tween.is_complete() {
                    Some(MotionOutcome::Settled(settle.index))
                } else {
                    self.offset = settle.tween.position();
                    None
                }
            }
            Phase::Momentum(run) => {
                run.advance_to(
                    now,
                    metrics.bounds(),
                    self.config.gesture.min_velocity,
                    &self.config.momentum,
                );
                self.offset = run.offset();
                run.is_exhausted().then(|| {
                    MotionOutcome::Exhausted(Release {
                        moved: run.offset() - run.origin_offset(),
                        offset: run.offset(),
                        velocity: run.velocity(),
                    })
                })
            }
            Phase::Idle | Phase::Dragging(_) => None,
        };

        match outcome {
            Some(MotionOutcome::Settled(index)) => self.land(index, metrics.offset_for(index)),
            Some(MotionOutcome::Exhausted(release)) => {
                self.phase = Phase::Idle;
                self.resolve(release, now);
            }
            None => {}
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Release every timer and animation. Idempotent; later inputs are
    /// ignored.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.phase = Phase::Idle;
        self.auto.pause();
        self.resize.cancel();
        self.suppress_click = false;
        crate::debug!("carousel detached");
        self.events.push(CarouselEvent::Detached);
    }
}
