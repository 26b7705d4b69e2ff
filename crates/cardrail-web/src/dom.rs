#![forbid(unsafe_code)]

//! DOM boundary for slider bindings.

use core::fmt::Debug;

/// The element-tree operations a slider binding needs.
///
/// Implementations must never panic: a lookup that fails returns `None` or an
/// empty list, and a layout read on a detached element returns `0.0`.
pub trait SliderDom {
    /// Element handle.
    type Node: Clone + PartialEq + Debug;

    /// The document root that registry lookups start from.
    fn document(&self) -> Self::Node;

    /// First descendant of `scope` matching `selector`.
    fn find(&self, scope: &Self::Node, selector: &str) -> Option<Self::Node>;

    /// All descendants of `scope` matching `selector`, in document order.
    fn find_all(&self, scope: &Self::Node, selector: &str) -> Vec<Self::Node>;

    /// Inner width of `node` in CSS pixels.
    fn client_width(&self, node: &Self::Node) -> f64;

    /// Rendered (bounding box) width of `node` in CSS pixels.
    fn rendered_width(&self, node: &Self::Node) -> f64;

    /// Computed column gap of a flex/grid container, if parsable.
    fn column_gap(&self, node: &Self::Node) -> Option<f64>;

    /// Write `transform: translateX(px)`.
    fn set_translate_x(&mut self, node: &Self::Node, px: f64);

    /// Add or remove a class.
    fn toggle_class(&mut self, node: &Self::Node, class: &str, on: bool);

    /// One-time setup of the track before the first paint (disable CSS
    /// transitions, hint the compositor).
    fn prepare_track(&mut self, track: &Self::Node);

    /// Whether the user asked for reduced motion.
    fn prefers_reduced_motion(&self) -> bool;

    /// Whether the host can deliver per-frame callbacks.
    fn has_animation_frames(&self) -> bool;
}
