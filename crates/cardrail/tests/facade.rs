#![forbid(unsafe_code)]

use std::time::Duration;

use cardrail::prelude::*;
use cardrail::{DeterministicClock, Error, MeasureError, MemoryDom, NodeId, attach_json};
use pretty_assertions::assert_eq;

fn headless(sample: LayoutSample) -> Result<Carousel> {
    let mut carousel = Carousel::try_new(CarouselConfig::default())?;
    carousel.measure(sample, Duration::ZERO)?;
    Ok(carousel)
}

#[test]
fn headless_controller_through_prelude() {
    let mut carousel = headless(LayoutSample::new(640.0, 300.0, 20.0, 5)).unwrap();
    assert_eq!(carousel.state(), CarouselState::Idle);

    let mut clock = DeterministicClock::new();
    carousel.go_to(2, clock.now());
    while carousel.needs_frame() {
        carousel.tick(clock.advance(Duration::from_millis(16)));
    }
    assert_eq!(carousel.offset(), -640.0);
    assert!(carousel.drain_events().iter().any(|e| matches!(
        e,
        CarouselEvent::IndexChanged {
            from: 0,
            to: 2,
            cause: ChangeCause::Navigate
        }
    )));
}

#[test]
fn measure_errors_convert() {
    let err = headless(LayoutSample::new(0.0, 300.0, 20.0, 5)).unwrap_err();
    assert!(matches!(err, Error::Measure(MeasureError::ContainerWidth(_))));
    assert_eq!(err.to_string(), "container not measurable (width 0)");
}

#[test]
fn config_errors_convert() {
    let mut config = CarouselConfig::default();
    config.momentum.friction = 1.5;
    let err: Error = Carousel::try_new(config).unwrap_err().into();
    assert!(matches!(err, Error::Config(_)));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn attach_json_surfaces_each_failure() {
    let mut dom = MemoryDom::new();
    let root: NodeId = dom.mount_slider("nb4", 5, 640.0, 300.0, 20.0);

    let err = attach_json(&mut dom, &root, "{not json", Duration::ZERO).unwrap_err();
    assert!(matches!(err, Error::Json(_)));

    let missing = r##"{"selectors":{"slider":"#nope","track":".t","card":".c","prev":"#p","next":"#n"}}"##;
    let err = attach_json(&mut dom, &root, missing, Duration::ZERO).unwrap_err();
    assert_eq!(err.to_string(), "slider element not found: #nope");

    let ok = r##"{"selectors":{
        "slider":"#nb4Slider","track":".nb4-slider-wrapper","card":".nb4-product-slide",
        "prev":"#nb4Prev","next":"#nb4Next"}}"##;
    let binding = attach_json(&mut dom, &root, ok, Duration::ZERO).unwrap();
    assert_eq!(binding.carousel().max_index(), 3);
}

#[test]
fn registry_from_facade() {
    let mut dom = MemoryDom::new();
    dom.mount_slider("nb3", 4, 640.0, 300.0, 20.0);
    let mut reg = SliderRegistry::new();
    assert!(reg.bootstrap(&mut dom, "nb3", &AttachOptions::for_prefix("nb3"), Duration::ZERO));
    let d = reg.handle(&mut dom, "nb3", HostEvent::DragStart, Duration::ZERO);
    assert_eq!(d, Dispatch::prevent());
}
