use std::collections::BTreeMap;
use std::time::Duration;

use crate::animation::Mutation;
use crate::document::{Document, NodeId, Selector};
use crate::scheduler::{Task, TaskQueue};

pub const ANIMATE_ATTR: &str = "data-animate";
pub const ANIMATED_CLASS: &str = "animated";

const ANIMATE_LEAD: Duration = Duration::from_millis(100);
const ANIMATE_STEP: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaggerEffect {
    /// Start a paused CSS animation.
    Play,
    /// Slide up into place and fade in.
    Rise,
    /// Slide in horizontally and fade in.
    SlideIn,
}

impl StaggerEffect {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "play" => Some(Self::Play),
            "rise" => Some(Self::Rise),
            "slide-in" => Some(Self::SlideIn),
            _ => None,
        }
    }

    /// Style the element carries before its hook runs.
    pub fn initial_style(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Play => &[("animation-play-state", "paused")],
            Self::Rise => &[("opacity", "0"), ("transform", "translateY(30px)")],
            Self::SlideIn => &[("opacity", "0"), ("transform", "translateX(-30px)")],
        }
    }

    fn terminal_style(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Play => &[("animation-play-state", "running")],
            Self::Rise => &[("transform", "translateY(0)"), ("opacity", "1")],
            Self::SlideIn => &[("transform", "translateX(0)"), ("opacity", "1")],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stagger {
    pub selector: Selector,
    pub step: Duration,
    pub effect: StaggerEffect,
}

/// Slide ordinal → stagger hooks run when that slide is entered.
#[derive(Debug, Clone, Default)]
pub struct HookTable {
    hooks: BTreeMap<usize, Vec<Stagger>>,
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, slide: usize, stagger: Stagger) {
        self.hooks.entry(slide).or_default().push(stagger);
    }

    pub fn hooks_for(&self, slide: usize) -> &[Stagger] {
        self.hooks.get(&slide).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Schedule the reveal sequence of `slide`, whose element is `scope`.
    pub fn run(&self, slide: usize, scope: NodeId, doc: &mut Document, tasks: &mut TaskQueue) {
        let items = doc.select_within(scope, &Selector::attr(ANIMATE_ATTR));
        for &node in &items {
            doc.get_mut(node).remove_class(ANIMATED_CLASS);
        }
        for (i, node) in items.into_iter().enumerate() {
            tasks.schedule(
                ANIMATE_LEAD + ANIMATE_STEP * i as u32,
                Task::Mutate(Mutation::AddClass {
                    node,
                    class: ANIMATED_CLASS.to_string(),
                }),
            );
        }

        for stagger in self.hooks_for(slide) {
            let targets = doc.select_within(scope, &stagger.selector);
            for (i, node) in targets.into_iter().enumerate() {
                tasks.schedule(
                    stagger.step * i as u32,
                    Task::Mutate(Mutation::style(node, stagger.effect.terminal_style())),
                );
            }
        }
    }
}
