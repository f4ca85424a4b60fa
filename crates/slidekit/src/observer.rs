use std::collections::{BTreeMap, BTreeSet};

use crate::animation::Effect;
use crate::document::{Document, NodeId, Selector};
use crate::platform::Capabilities;

pub const ANIM_ATTR: &str = "data-anim";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f32,
    pub root_margin: f32,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: 50.0,
        }
    }
}

/// How much of an observed element is inside the (margin-expanded) viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub ratio: f32,
}

impl IntersectionEntry {
    pub fn is_intersecting(&self, options: &ObserverOptions) -> bool {
        self.ratio > 0.0 && self.ratio >= options.threshold
    }
}

/// The set of targets one callback watches.
#[derive(Debug, Clone, Default)]
pub struct IntersectionObserver {
    pub options: ObserverOptions,
    targets: BTreeSet<NodeId>,
}

impl IntersectionObserver {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            targets: BTreeSet::new(),
        }
    }

    pub fn observe(&mut self, node: NodeId) {
        self.targets.insert(node);
    }

    pub fn unobserve(&mut self, node: NodeId) {
        self.targets.remove(&node);
    }

    pub fn is_observing(&self, node: NodeId) -> bool {
        self.targets.contains(&node)
    }

    pub fn targets(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.targets.iter().copied()
    }

    /// Entries for this observer's targets that currently intersect.
    pub fn intersecting<'a>(
        &'a self,
        entries: &'a [IntersectionEntry],
    ) -> impl Iterator<Item = NodeId> + 'a {
        entries
            .iter()
            .filter(|e| self.is_observing(e.target) && e.is_intersecting(&self.options))
            .map(|e| e.target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RevealStyle {
    Fade,
    Slide,
    Scale,
}

impl RevealStyle {
    pub const ALL: [RevealStyle; 3] = [RevealStyle::Fade, RevealStyle::Slide, RevealStyle::Scale];

    pub fn as_str(self) -> &'static str {
        match self {
            RevealStyle::Fade => "fade",
            RevealStyle::Slide => "slide",
            RevealStyle::Scale => "scale",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    pub fn effect(self) -> Effect {
        match self {
            RevealStyle::Fade => Effect::Fade,
            RevealStyle::Slide => Effect::SlideLeft,
            RevealStyle::Scale => Effect::Scale,
        }
    }
}

#[derive(Debug, Default)]
pub struct ObserverController {
    observers: BTreeMap<RevealStyle, IntersectionObserver>,
}

impl ObserverController {
    /// Observe every `[data-anim=<style>]` element. Without observer support
    /// nothing is wired and tagged elements keep their markup styles.
    pub fn new(doc: &Document, caps: &Capabilities) -> Self {
        let mut controller = Self::default();
        if !caps.intersection_observer {
            tracing::warn!("intersection observers unavailable, reveal effects disabled");
            return controller;
        }
        for style in RevealStyle::ALL {
            let mut observer = IntersectionObserver::new(ObserverOptions::default());
            for node in doc.select_all(&Selector::attr_eq(ANIM_ATTR, style.as_str())) {
                observer.observe(node);
            }
            controller.observers.insert(style, observer);
        }
        controller
    }

    /// Every element still waiting to be revealed.
    pub fn targets(&self) -> Vec<NodeId> {
        self.observers.values().flat_map(|o| o.targets()).collect()
    }

    pub fn is_observing(&self, node: NodeId) -> bool {
        self.observers.values().any(|o| o.is_observing(node))
    }

    /// Apply the terminal style to newly visible elements. Each element is
    /// revealed once and then dropped from its observer.
    pub fn on_intersection(&mut self, entries: &[IntersectionEntry], doc: &mut Document) {
        for (style, observer) in self.observers.iter_mut() {
            let revealed: Vec<NodeId> = observer.intersecting(entries).collect();
            for node in revealed {
                let el = doc.get_mut(node);
                el.set_style("opacity", "1");
                el.set_style("transform", style.effect().terminal_transform());
                observer.unobserve(node);
                tracing::trace!(node = node.index(), style = style.as_str(), "revealed");
            }
        }
    }

    /// Pause or resume CSS animations on every tagged element while the host
    /// is hidden.
    pub fn on_visibility_change(&self, hidden: bool, doc: &mut Document) {
        let state = if hidden { "paused" } else { "running" };
        for node in doc.select_all(&Selector::attr(ANIM_ATTR)) {
            doc.get_mut(node).set_style("animation-play-state", state);
        }
    }
}
