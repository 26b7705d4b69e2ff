//! Property-based invariant tests for the carousel controller.
//!
//! 1. `max_index == max(0, card_count - visible_count)` and `visible_count >= 1`.
//! 2. `go_to` with any integer lands inside `[0, max_index]`.
//! 3. After any settle, `offset == -index * step` exactly.
//! 4. A slow gesture with zero net displacement returns to the start index.
//! 5. A vertically locked gesture moves nothing and never prevents default.
//! 6. Momentum `|velocity|` strictly decreases and the run terminates.
//! 7. The index never leaves `[0, max_index]` under arbitrary input.

use std::time::Duration;

use cardrail_core::carousel::{Carousel, CarouselState, MotionPolicy};
use cardrail_core::config::{CarouselConfig, MomentumConfig};
use cardrail_core::event::PointerEvent;
use cardrail_core::layout::{LayoutSample, TrackBounds, measure};
use cardrail_core::momentum::Momentum;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn sample_strategy() -> impl Strategy<Value = LayoutSample> {
    (100.0f64..2000.0, 40.0f64..600.0, 0.0f64..48.0, 0usize..24)
        .prop_map(|(container, card, gap, count)| LayoutSample::new(container, card, gap, count))
}

fn nonempty_sample_strategy() -> impl Strategy<Value = LayoutSample> {
    (200.0f64..1200.0, 120.0f64..400.0, 0.0f64..32.0, 3usize..16)
        .prop_map(|(container, card, gap, count)| LayoutSample::new(container, card, gap, count))
}

fn controller(sample: LayoutSample, motion: MotionPolicy) -> Carousel {
    let mut c = Carousel::new(CarouselConfig::default()).with_motion(motion);
    c.measure(sample, Duration::ZERO).expect("measurable");
    c
}

fn settle(c: &mut Carousel, mut t: u64) -> u64 {
    for _ in 0..2000 {
        if !c.needs_frame() {
            break;
        }
        t += 16;
        c.tick(ms(t));
    }
    t
}

fn resting_offset(c: &Carousel) -> f64 {
    let m = c.metrics().expect("active");
    -(c.current_index() as f64 * m.step())
}

#[derive(Debug, Clone)]
enum Input {
    GoTo(i64),
    Advance,
    Retreat,
    Drag { dx: f64, dt: u64 },
    Resize,
    Tick(u64),
}

fn input_strategy() -> impl Strategy<Value = Input> {
    prop_oneof![
        any::<i64>().prop_map(Input::GoTo),
        Just(Input::Advance),
        Just(Input::Retreat),
        (-900.0f64..900.0, 1u64..400).prop_map(|(dx, dt)| Input::Drag { dx, dt }),
        Just(Input::Resize),
        (1u64..5000).prop_map(Input::Tick),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1. max_index formula
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn max_index_matches_visible_count(sample in sample_strategy()) {
        let m = measure(sample, 24.0).expect("positive widths");
        prop_assert!(m.visible_count >= 1);
        prop_assert_eq!(m.max_index, sample.card_count.saturating_sub(m.visible_count));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2 + 3. go_to clamps and lands exactly
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn go_to_clamps_any_integer(sample in nonempty_sample_strategy(), target in any::<i64>()) {
        let mut c = controller(sample, MotionPolicy::Instant);
        c.go_to(target, ms(1));
        prop_assert!(c.current_index() <= c.max_index());
        if target <= 0 {
            prop_assert_eq!(c.current_index(), 0);
        }
        prop_assert_eq!(c.offset(), resting_offset(&c));
    }

    #[test]
    fn animated_settle_has_no_drift(
        sample in nonempty_sample_strategy(),
        targets in prop::collection::vec(-3i64..20, 1..6),
    ) {
        let mut c = controller(sample, MotionPolicy::Animated);
        let mut t = 0;
        for target in targets {
            c.go_to(target, ms(t));
            t = settle(&mut c, t);
            prop_assert_eq!(c.state(), CarouselState::Idle);
            prop_assert_eq!(c.offset(), resting_offset(&c));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Zero-net slow gesture returns home
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn zero_net_gesture_keeps_index(
        sample in nonempty_sample_strategy(),
        start in 0i64..8,
        steps in prop::collection::vec(-20.0f64..20.0, 1..20),
    ) {
        let mut c = controller(sample, MotionPolicy::Animated);
        c.go_to(start, ms(0));
        let mut t = settle(&mut c, 0);
        let before = c.current_index();

        let (x0, y) = (600.0, 300.0);
        let mut x = x0;
        c.pointer_down(PointerEvent::mouse(x, y, ms(t)));
        for dx in steps {
            x += dx;
            t += 100;
            c.pointer_move(PointerEvent::mouse(x, y, ms(t)));
        }
        // Walk back just as slowly, ending exactly on the start point.
        while (x0 - x).abs() > 20.0 {
            x += 20.0 * (x0 - x).signum();
            t += 100;
            c.pointer_move(PointerEvent::mouse(x, y, ms(t)));
        }
        t += 100;
        c.pointer_move(PointerEvent::mouse(x0, y, ms(t)));
        c.pointer_up(ms(t));
        settle(&mut c, t);

        prop_assert_eq!(c.current_index(), before);
        prop_assert_eq!(c.offset(), resting_offset(&c));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Vertical lock yields
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn vertical_gesture_is_inert(
        sample in nonempty_sample_strategy(),
        start in 0i64..8,
        lock_dy in 20.0f64..200.0,
        follow in prop::collection::vec((-300.0f64..300.0, -300.0f64..300.0), 0..12),
    ) {
        let mut c = controller(sample, MotionPolicy::Instant);
        c.go_to(start, ms(0));
        let (index, offset) = (c.current_index(), c.offset());

        c.pointer_down(PointerEvent::touch(300.0, 300.0, ms(10)));
        let r = c.pointer_move(PointerEvent::touch(301.0, 300.0 - lock_dy, ms(26)));
        prop_assert!(!r.prevent_default);
        let mut t = 26;
        for (dx, dy) in follow {
            t += 16;
            let r = c.pointer_move(PointerEvent::touch(300.0 + dx, 300.0 + dy, ms(t)));
            prop_assert!(!r.prevent_default);
        }
        c.pointer_up(ms(t));

        prop_assert_eq!(c.current_index(), index);
        prop_assert_eq!(c.offset(), offset);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Momentum decays and terminates
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn momentum_monotone_and_finite(
        velocity in -20.0f64..20.0,
        span in 0.0f64..5000.0,
        at in 0.0f64..1.0,
        friction in 0.5f64..0.99,
    ) {
        let cfg = MomentumConfig { friction, ..MomentumConfig::default() };
        let bounds = TrackBounds { min: -span, max: 0.0 };
        let mut m = Momentum::launch(-span * at, velocity, 0.0, Duration::ZERO);
        let mut prev = m.velocity().abs();
        let mut frames = 0u32;
        while m.step(bounds, 0.8, &cfg) {
            prop_assert!(m.velocity().abs() < prev);
            prop_assert!(bounds.contains(m.offset()));
            prev = m.velocity().abs();
            frames += 1;
            prop_assert!(frames < 2000, "momentum did not terminate");
        }
        prop_assert!(m.is_exhausted());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Index stays in range under arbitrary input
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn index_always_in_range(
        sample in nonempty_sample_strategy(),
        inputs in prop::collection::vec(input_strategy(), 1..40),
    ) {
        let mut c = controller(sample, MotionPolicy::Animated);
        let mut t = 0u64;
        for input in inputs {
            match input {
                Input::GoTo(i) => c.go_to(i, ms(t)),
                Input::Advance => c.advance(ms(t)),
                Input::Retreat => c.retreat(ms(t)),
                Input::Drag { dx, dt } => {
                    c.pointer_down(PointerEvent::mouse(500.0, 200.0, ms(t)));
                    t += dt;
                    c.pointer_move(PointerEvent::mouse(500.0 + dx, 200.0, ms(t)));
                    c.pointer_up(ms(t));
                }
                Input::Resize => c.notify_resize(ms(t)),
                Input::Tick(dt) => {
                    t += dt;
                    if c.tick(ms(t)).relayout {
                        c.relayout(sample, ms(t)).expect("measurable");
                    }
                }
            }
            prop_assert!(c.current_index() <= c.max_index());
        }
        settle(&mut c, t);
        if c.state() == CarouselState::Idle {
            prop_assert_eq!(c.offset(), resting_offset(&c));
        }
    }
}
