#![forbid(unsafe_code)]

//! Page-wide set of slider bindings.
//!
//! A page may carry several slider sections built from the same markup
//! convention. [`SliderRegistry::bootstrap`] attaches each one at most once,
//! keyed by the section's element id, and silently skips sections that are
//! absent or incomplete. Page-level events (resize, visibility, reduced
//! motion) fan out to every binding; pointer events go to one.

use core::fmt::Debug;
use core::time::Duration;
use std::collections::{BTreeMap, BTreeSet};

use crate::binding::{AttachOptions, SliderBinding, attach};
use crate::dom::SliderDom;
use crate::event::{Dispatch, HostEvent};

/// Bindings keyed by root element id.
#[derive(Debug, Clone)]
pub struct SliderRegistry<N> {
    bindings: BTreeMap<String, SliderBinding<N>>,
    seen: BTreeSet<String>,
}

impl<N> Default for SliderRegistry<N> {
    fn default() -> Self {
        Self {
            bindings: BTreeMap::new(),
            seen: BTreeSet::new(),
        }
    }
}

impl<N: Clone + PartialEq + Debug> SliderRegistry<N> {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the slider in the element with id `root_id`.
    ///
    /// Returns `true` only when a new binding was created. A root seen
    /// before is never attached again, even if its first attach failed; an
    /// absent root is not remembered, so it can be bootstrapped once it
    /// appears.
    pub fn bootstrap<D: SliderDom<Node = N>>(
        &mut self,
        dom: &mut D,
        root_id: &str,
        options: &AttachOptions,
        now: Duration,
    ) -> bool {
        if self.seen.contains(root_id) {
            tracing::trace!(root_id, "slider root already bootstrapped");
            return false;
        }
        let Some(root) = dom.find(&dom.document(), &format!("#{root_id}")) else {
            tracing::debug!(root_id, "slider root absent; skipped");
            return false;
        };
        self.seen.insert(root_id.to_string());
        match attach(dom, &root, options, now) {
            Ok(binding) => {
                self.bindings.insert(root_id.to_string(), binding);
                true
            }
            Err(err) => {
                tracing::debug!(root_id, %err, "slider not attached");
                false
            }
        }
    }

    /// Bootstrap `prefix` with the conventional selectors and default
    /// tunables.
    pub fn bootstrap_prefix<D: SliderDom<Node = N>>(
        &mut self,
        dom: &mut D,
        prefix: &str,
        now: Duration,
    ) -> bool {
        self.bootstrap(dom, prefix, &AttachOptions::for_prefix(prefix), now)
    }

    /// Number of live bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no binding is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Binding for `root_id`.
    #[must_use]
    pub fn get(&self, root_id: &str) -> Option<&SliderBinding<N>> {
        self.bindings.get(root_id)
    }

    /// Mutable binding for `root_id`.
    pub fn get_mut(&mut self, root_id: &str) -> Option<&mut SliderBinding<N>> {
        self.bindings.get_mut(root_id)
    }

    /// Root ids of live bindings, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.bindings.keys().map(String::as_str)
    }

    /// Forward an event to the binding for `root_id`.
    pub fn handle<D: SliderDom<Node = N>>(
        &mut self,
        dom: &mut D,
        root_id: &str,
        event: HostEvent,
        now: Duration,
    ) -> Dispatch {
        self.bindings
            .get_mut(root_id)
            .map_or_else(Dispatch::default, |b| b.handle(dom, event, now))
    }

    /// Forward a page-level event to every binding.
    pub fn broadcast<D: SliderDom<Node = N>>(&mut self, dom: &mut D, event: HostEvent, now: Duration) {
        for binding in self.bindings.values_mut() {
            binding.handle(dom, event, now);
        }
    }

    /// Drive one frame on every binding; returns the earliest wake-up.
    pub fn frame_all<D: SliderDom<Node = N>>(&mut self, dom: &mut D, now: Duration) -> Option<Duration> {
        self.bindings
            .values_mut()
            .filter_map(|b| b.frame(dom, now))
            .min()
    }

    /// Whether any binding is animating.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.bindings.values().any(SliderBinding::needs_frame)
    }

    /// Detach and forget the binding for `root_id`. The root may be
    /// bootstrapped again afterwards.
    pub fn detach<D: SliderDom<Node = N>>(&mut self, dom: &mut D, root_id: &str) -> bool {
        self.seen.remove(root_id);
        match self.bindings.remove(root_id) {
            Some(mut binding) => {
                binding.detach(dom);
                true
            }
            None => false,
        }
    }

    /// Detach every binding.
    pub fn detach_all<D: SliderDom<Node = N>>(&mut self, dom: &mut D) {
        for (_, mut binding) in std::mem::take(&mut self.bindings) {
            binding.detach(dom);
        }
        self.seen.clear();
    }
}
