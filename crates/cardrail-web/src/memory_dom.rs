#![forbid(unsafe_code)]

//! In-memory element tree implementing [`SliderDom`].
//!
//! Supports the two selector forms slider bindings use, `#id` and `.class`,
//! matched against descendants in document order. Layout numbers are set
//! explicitly by the test or headless host; nothing is computed.

use std::collections::{BTreeMap, BTreeSet};

use crate::dom::SliderDom;

/// Handle to a [`MemoryDom`] element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct Element {
    id: Option<String>,
    classes: BTreeSet<String>,
    children: Vec<NodeId>,
    client_width: f64,
    rendered_width: f64,
    column_gap: Option<f64>,
    translate_x: Option<f64>,
    style: BTreeMap<String, String>,
}

impl Element {
    fn matches(&self, selector: &str) -> bool {
        if let Some(id) = selector.strip_prefix('#') {
            self.id.as_deref() == Some(id)
        } else if let Some(class) = selector.strip_prefix('.') {
            self.classes.contains(class)
        } else {
            false
        }
    }
}

/// Headless DOM.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<Element>,
    reduced_motion: bool,
    animation_frames: bool,
    writes: u64,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// An empty document with animation frames available.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Element::default()],
            reduced_motion: false,
            animation_frames: true,
            writes: 0,
        }
    }

    fn node(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0)
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(node.0)
    }

    /// Append a child element. Appending to an unknown parent creates a
    /// detached element.
    pub fn append(&mut self, parent: NodeId, id: Option<&str>, classes: &[&str]) -> NodeId {
        let child = NodeId(self.nodes.len());
        self.nodes.push(Element {
            id: id.map(str::to_string),
            classes: classes.iter().map(|c| (*c).to_string()).collect(),
            ..Element::default()
        });
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        child
    }

    /// Build the conventional slider section for `prefix` under the
    /// document and return the section element:
    ///
    /// ```text
    /// section#{prefix}
    /// ├── #{prefix}Slider            (client width = container_width)
    /// │   └── .{prefix}-slider-wrapper   (column gap = gap)
    /// │       └── .{prefix}-product-slide × cards   (width = card_width)
    /// ├── #{prefix}Prev
    /// └── #{prefix}Next
    /// ```
    pub fn mount_slider(
        &mut self,
        prefix: &str,
        cards: usize,
        container_width: f64,
        card_width: f64,
        gap: f64,
    ) -> NodeId {
        let doc = self.document();
        let section = self.append(doc, Some(prefix), &["section"]);
        let slider = self.append(section, Some(format!("{prefix}Slider").as_str()), &[]);
        self.set_client_width(slider, container_width);
        let track = self.append(slider, None, &[format!("{prefix}-slider-wrapper").as_str()]);
        self.set_column_gap(track, Some(gap));
        let card_class = format!("{prefix}-product-slide");
        for _ in 0..cards {
            let card = self.append(track, None, &[card_class.as_str()]);
            self.set_rendered_width(card, card_width);
        }
        self.append(section, Some(format!("{prefix}Prev").as_str()), &[]);
        self.append(section, Some(format!("{prefix}Next").as_str()), &[]);
        section
    }

    /// Set the inner width of `node`.
    pub fn set_client_width(&mut self, node: NodeId, width: f64) {
        if let Some(e) = self.node_mut(node) {
            e.client_width = width;
        }
    }

    /// Set the rendered width of `node`.
    pub fn set_rendered_width(&mut self, node: NodeId, width: f64) {
        if let Some(e) = self.node_mut(node) {
            e.rendered_width = width;
        }
    }

    /// Set (or clear) the computed column gap of `node`.
    pub fn set_column_gap(&mut self, node: NodeId, gap: Option<f64>) {
        if let Some(e) = self.node_mut(node) {
            e.column_gap = gap;
        }
    }

    /// Toggle the reduced-motion preference.
    pub fn set_reduced_motion(&mut self, reduce: bool) {
        self.reduced_motion = reduce;
    }

    /// Toggle frame callback support.
    pub fn set_animation_frames(&mut self, available: bool) {
        self.animation_frames = available;
    }

    /// Last written translation of `node`.
    #[must_use]
    pub fn translate_x(&self, node: NodeId) -> Option<f64> {
        self.node(node).and_then(|e| e.translate_x)
    }

    /// Whether `node` carries `class`.
    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node).is_some_and(|e| e.classes.contains(class))
    }

    /// Inline style property of `node`.
    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.node(node)
            .and_then(|e| e.style.get(property))
            .map(String::as_str)
    }

    /// Number of transform and class writes so far.
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes
    }

    fn collect(&self, scope: NodeId, selector: &str, first_only: bool, out: &mut Vec<NodeId>) {
        let Some(e) = self.node(scope) else {
            return;
        };
        for &child in &e.children {
            if first_only && !out.is_empty() {
                return;
            }
            if self.node(child).is_some_and(|c| c.matches(selector)) {
                out.push(child);
            }
            self.collect(child, selector, first_only, out);
        }
    }
}

impl SliderDom for MemoryDom {
    type Node = NodeId;

    fn document(&self) -> NodeId {
        NodeId(0)
    }

    fn find(&self, scope: &NodeId, selector: &str) -> Option<NodeId> {
        let mut out = Vec::with_capacity(1);
        self.collect(*scope, selector, true, &mut out);
        out.first().copied()
    }

    fn find_all(&self, scope: &NodeId, selector: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect(*scope, selector, false, &mut out);
        out
    }

    fn client_width(&self, node: &NodeId) -> f64 {
        self.node(*node).map_or(0.0, |e| e.client_width)
    }

    fn rendered_width(&self, node: &NodeId) -> f64 {
        self.node(*node).map_or(0.0, |e| e.rendered_width)
    }

    fn column_gap(&self, node: &NodeId) -> Option<f64> {
        self.node(*node).and_then(|e| e.column_gap)
    }

    fn set_translate_x(&mut self, node: &NodeId, px: f64) {
        if let Some(e) = self.nodes.get_mut(node.0) {
            e.translate_x = Some(px);
            e.style
                .insert("transform".into(), format!("translateX({px}px)"));
            self.writes += 1;
        }
    }

    fn toggle_class(&mut self, node: &NodeId, class: &str, on: bool) {
        if let Some(e) = self.nodes.get_mut(node.0) {
            if on {
                e.classes.insert(class.to_string());
            } else {
                e.classes.remove(class);
            }
            self.writes += 1;
        }
    }

    fn prepare_track(&mut self, track: &NodeId) {
        if let Some(e) = self.node_mut(*track) {
            e.style.insert("transition".into(), "none".into());
            e.style.insert("will-change".into(), "transform".into());
        }
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn has_animation_frames(&self) -> bool {
        self.animation_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn selectors_match_descendants_in_order() {
        let mut dom = MemoryDom::new();
        let root = dom.mount_slider("nb4", 3, 640.0, 300.0, 20.0);
        let slider = dom.find(&root, "#nb4Slider").unwrap();
        let cards = dom.find_all(&slider, ".nb4-product-slide");
        assert_eq!(cards.len(), 3);
        assert!(cards.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(dom.find(&root, ".nb4-product-slide"), Some(cards[0]));
        assert_eq!(dom.client_width(&slider), 640.0);
    }

    #[test]
    fn find_does_not_match_scope_itself() {
        let mut dom = MemoryDom::new();
        let root = dom.mount_slider("nb3", 1, 640.0, 300.0, 20.0);
        assert_eq!(dom.find(&root, "#nb3"), None);
        assert_eq!(dom.find(&dom.document(), "#nb3"), Some(root));
    }

    #[test]
    fn unsupported_selector_matches_nothing() {
        let mut dom = MemoryDom::new();
        let root = dom.mount_slider("nb4", 2, 640.0, 300.0, 20.0);
        assert!(dom.find_all(&root, "div > span").is_empty());
    }

    #[test]
    fn unknown_node_reads_zero() {
        let dom = MemoryDom::new();
        assert_eq!(dom.client_width(&NodeId(99)), 0.0);
        assert_eq!(dom.column_gap(&NodeId(99)), None);
        assert!(!dom.has_class(NodeId(99), "x"));
    }

    #[test]
    fn writes_are_counted() {
        let mut dom = MemoryDom::new();
        let doc = dom.document();
        let n = dom.append(doc, Some("a"), &[]);
        dom.set_translate_x(&n, -12.5);
        dom.toggle_class(&n, "dragging", true);
        assert_eq!(dom.writes(), 2);
        assert_eq!(dom.style(n, "transform"), Some("translateX(-12.5px)"));
        assert!(dom.has_class(n, "dragging"));
    }
}
