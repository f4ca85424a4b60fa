use std::time::Duration;

use crate::document::{Document, NodeId};
use crate::scheduler::{Task, TaskQueue};

pub const DEFAULT_DURATION: Duration = Duration::from_millis(500);
pub const DEFAULT_TYPE_SPEED: Duration = Duration::from_millis(50);

/// A document change that runs later, from the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    AddClass {
        node: NodeId,
        class: String,
    },
    SetStyle {
        node: NodeId,
        properties: Vec<(String, String)>,
    },
    /// Append the next character and reschedule the rest.
    Type {
        node: NodeId,
        remaining: String,
        speed: Duration,
    },
}

impl Mutation {
    pub fn style(node: NodeId, properties: &[(&str, &str)]) -> Self {
        Mutation::SetStyle {
            node,
            properties: properties
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn apply(self, doc: &mut Document, tasks: &mut TaskQueue) {
        match self {
            Mutation::AddClass { node, class } => doc.get_mut(node).add_class(&class),
            Mutation::SetStyle { node, properties } => {
                let el = doc.get_mut(node);
                for (property, value) in &properties {
                    el.set_style(property, value);
                }
            }
            Mutation::Type {
                node,
                remaining,
                speed,
            } => {
                let mut chars = remaining.chars();
                let Some(ch) = chars.next() else { return };
                doc.get_mut(node).text.push(ch);
                let rest: String = chars.collect();
                if !rest.is_empty() {
                    tasks.schedule(
                        speed,
                        Task::Mutate(Mutation::Type {
                            node,
                            remaining: rest,
                            speed,
                        }),
                    );
                }
            }
        }
    }
}

/// Enter effects shared by the animation helpers and the reveal observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Fade,
    SlideLeft,
    SlideRight,
    Scale,
}

impl Effect {
    pub fn initial_transform(self) -> &'static str {
        match self {
            Effect::Fade => "translateY(20px)",
            Effect::SlideLeft => "translateX(-100px)",
            Effect::SlideRight => "translateX(100px)",
            Effect::Scale => "scale(0.8)",
        }
    }

    pub fn terminal_transform(self) -> &'static str {
        match self {
            Effect::Fade => "translateY(0)",
            Effect::SlideLeft | Effect::SlideRight => "translateX(0)",
            Effect::Scale => "scale(1)",
        }
    }
}

/// Put `node` in the effect's start state, then move it to the terminal
/// state on the next frame so the `transition` declaration animates it.
pub fn animate(
    effect: Effect,
    node: NodeId,
    duration: Duration,
    doc: &mut Document,
    tasks: &mut TaskQueue,
) {
    let ms = duration.as_millis();
    let el = doc.get_mut(node);
    el.set_style("opacity", "0");
    el.set_style("transform", effect.initial_transform());
    el.set_style(
        "transition",
        &format!("opacity {ms}ms ease, transform {ms}ms ease"),
    );
    tasks.schedule(
        Duration::ZERO,
        Task::Mutate(Mutation::style(
            node,
            &[("opacity", "1"), ("transform", effect.terminal_transform())],
        )),
    );
}

pub fn fade(node: NodeId, duration: Duration, doc: &mut Document, tasks: &mut TaskQueue) {
    animate(Effect::Fade, node, duration, doc, tasks);
}

pub fn slide_left(node: NodeId, duration: Duration, doc: &mut Document, tasks: &mut TaskQueue) {
    animate(Effect::SlideLeft, node, duration, doc, tasks);
}

pub fn slide_right(node: NodeId, duration: Duration, doc: &mut Document, tasks: &mut TaskQueue) {
    animate(Effect::SlideRight, node, duration, doc, tasks);
}

pub fn scale(node: NodeId, duration: Duration, doc: &mut Document, tasks: &mut TaskQueue) {
    animate(Effect::Scale, node, duration, doc, tasks);
}

/// Clear the element text and type `text` into it one character per `speed`.
pub fn typewriter(
    node: NodeId,
    text: &str,
    speed: Duration,
    doc: &mut Document,
    tasks: &mut TaskQueue,
) {
    doc.get_mut(node).text.clear();
    Mutation::Type {
        node,
        remaining: text.to_string(),
        speed,
    }
    .apply(doc, tasks);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Element;

    fn run_all(doc: &mut Document, tasks: &mut TaskQueue, until: Duration) {
        while let Some(task) = tasks.pop_due(until) {
            if let Task::Mutate(m) = task {
                m.apply(doc, tasks);
            }
        }
        tasks.settle(until);
    }

    #[test]
    fn test_fade_sets_start_state_then_terminal() {
        let mut doc = Document::new();
        let node = doc.append(doc.body(), Element::new("div"));
        let mut tasks = TaskQueue::new();

        fade(node, DEFAULT_DURATION, &mut doc, &mut tasks);
        assert_eq!(doc.get(node).style("opacity"), Some("0"));
        assert_eq!(doc.get(node).style("transform"), Some("translateY(20px)"));
        assert_eq!(
            doc.get(node).style("transition"),
            Some("opacity 500ms ease, transform 500ms ease")
        );

        run_all(&mut doc, &mut tasks, Duration::ZERO);
        assert_eq!(doc.get(node).style("opacity"), Some("1"));
        assert_eq!(doc.get(node).style("transform"), Some("translateY(0)"));
    }

    #[test]
    fn test_slide_and_scale_terminal_states() {
        let mut doc = Document::new();
        let a = doc.append(doc.body(), Element::new("div"));
        let b = doc.append(doc.body(), Element::new("div"));
        let mut tasks = TaskQueue::new();

        slide_right(a, Duration::from_millis(300), &mut doc, &mut tasks);
        scale(b, DEFAULT_DURATION, &mut doc, &mut tasks);
        assert_eq!(doc.get(a).style("transform"), Some("translateX(100px)"));
        run_all(&mut doc, &mut tasks, Duration::ZERO);
        assert_eq!(doc.get(a).style("transform"), Some("translateX(0)"));
        assert_eq!(doc.get(b).style("transform"), Some("scale(1)"));
    }

    #[test]
    fn test_typewriter_types_one_char_per_tick() {
        let mut doc = Document::new();
        let node = doc.append(doc.body(), Element::new("p").with_text("old"));
        let mut tasks = TaskQueue::new();

        typewriter(node, "abc", DEFAULT_TYPE_SPEED, &mut doc, &mut tasks);
        assert_eq!(doc.get(node).text, "a");
        run_all(&mut doc, &mut tasks, Duration::from_millis(50));
        assert_eq!(doc.get(node).text, "ab");
        run_all(&mut doc, &mut tasks, Duration::from_millis(100));
        assert_eq!(doc.get(node).text, "abc");
        assert!(tasks.is_idle());
    }
}
