use std::time::Duration;

use crate::document::{Document, Selector};
use crate::hooks::HookTable;
use crate::scheduler::{Task, TaskQueue};

pub const ACTIVE: &str = "active";
const EXIT_RIGHT: &str = "exit-right";
const EXIT_LEFT: &str = "exit-left";
const FROM_RIGHT: &str = "from-right";
const FROM_LEFT: &str = "from-left";

pub fn slide_id(n: usize) -> String {
    format!("slide-{n}")
}

/// `round(current / total * 100)`.
pub fn progress_percent(current: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (current as f64 / total as f64 * 100.0).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTimings {
    /// Old slide carries its exit class.
    pub exit: Duration,
    /// New slide is active and carries its enter class.
    pub enter: Duration,
    /// Enter class is gone; further navigation is still blocked.
    pub settle: Duration,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            exit: Duration::from_millis(500),
            enter: Duration::from_millis(600),
            settle: Duration::ZERO,
        }
    }
}

impl TransitionTimings {
    pub fn duration(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Exit => self.exit,
            Phase::Enter => self.enter,
            Phase::Settle => self.settle,
            Phase::Idle => Duration::ZERO,
        }
    }

    pub fn total(&self) -> Duration {
        self.exit + self.enter + self.settle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Exit,
    Enter,
    Settle,
}

impl Phase {
    pub fn next(self) -> Phase {
        match self {
            Phase::Exit => Phase::Enter,
            Phase::Enter => Phase::Settle,
            Phase::Settle | Phase::Idle => Phase::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn exit_class(self) -> &'static str {
        match self {
            Direction::Forward => EXIT_RIGHT,
            Direction::Backward => EXIT_LEFT,
        }
    }

    fn enter_class(self) -> &'static str {
        match self {
            Direction::Forward => FROM_RIGHT,
            Direction::Backward => FROM_LEFT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    pub current: usize,
    pub total: usize,
    pub animating: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Flight {
    from: usize,
    to: usize,
    direction: Direction,
}

/// Walks `Exit → Enter → Settle → Idle`; the scheduler fires one
/// [`Task::Transition`] at the end of every phase.
#[derive(Debug)]
pub struct SlideNavigator {
    current: usize,
    total: usize,
    phase: Phase,
    flight: Option<Flight>,
    timings: TransitionTimings,
    hooks: HookTable,
}

impl SlideNavigator {
    pub fn new(total: usize, timings: TransitionTimings, hooks: HookTable) -> Self {
        Self {
            current: 1,
            total,
            phase: Phase::Idle,
            flight: None,
            timings,
            hooks,
        }
    }

    pub fn state(&self) -> NavigationState {
        NavigationState {
            current: self.current,
            total: self.total,
            animating: self.flight.is_some(),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_animating(&self) -> bool {
        self.flight.is_some()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn timings(&self) -> TransitionTimings {
        self.timings
    }

    /// Start a transition to `target`. Returns whether one was started;
    /// a busy navigator, the current slide or an out-of-range target are
    /// ignored.
    pub fn go(&mut self, target: usize, doc: &mut Document, tasks: &mut TaskQueue) -> bool {
        if self.is_animating() || target == self.current || target < 1 || target > self.total {
            tracing::trace!(target, current = self.current, "navigation ignored");
            return false;
        }
        let Some(from) = doc.by_id(&slide_id(self.current)) else {
            tracing::warn!(slide = self.current, "current slide missing from document");
            return false;
        };
        if doc.by_id(&slide_id(target)).is_none() {
            tracing::warn!(slide = target, "target slide missing from document");
            return false;
        }

        let direction = if target > self.current {
            Direction::Forward
        } else {
            Direction::Backward
        };
        let flight = Flight {
            from: self.current,
            to: target,
            direction,
        };
        tracing::debug!(from = flight.from, to = flight.to, "slide transition");

        self.flight = Some(flight);
        self.phase = Phase::Exit;
        doc.get_mut(from).add_class(direction.exit_class());
        tasks.schedule(self.timings.duration(Phase::Exit), Task::Transition);
        true
    }

    pub fn next(&mut self, doc: &mut Document, tasks: &mut TaskQueue) -> bool {
        self.current < self.total && self.go(self.current + 1, doc, tasks)
    }

    pub fn prev(&mut self, doc: &mut Document, tasks: &mut TaskQueue) -> bool {
        self.current > 1 && self.go(self.current - 1, doc, tasks)
    }

    pub fn first(&mut self, doc: &mut Document, tasks: &mut TaskQueue) -> bool {
        self.go(1, doc, tasks)
    }

    pub fn last(&mut self, doc: &mut Document, tasks: &mut TaskQueue) -> bool {
        self.go(self.total, doc, tasks)
    }

    /// Called when a [`Task::Transition`] fires: finish the current phase and
    /// enter the next one.
    pub fn advance(&mut self, doc: &mut Document, tasks: &mut TaskQueue) {
        let Some(flight) = self.flight else { return };
        let next = self.phase.next();
        self.enter_phase(next, flight, doc, tasks);
        self.phase = next;
        if next != Phase::Idle {
            tasks.schedule(self.timings.duration(next), Task::Transition);
        }
    }

    fn enter_phase(&mut self, phase: Phase, flight: Flight, doc: &mut Document, tasks: &mut TaskQueue) {
        match phase {
            Phase::Enter => {
                if let Some(old) = doc.by_id_mut(&slide_id(flight.from)) {
                    old.remove_class(ACTIVE);
                    old.remove_class(EXIT_RIGHT);
                    old.remove_class(EXIT_LEFT);
                }
                if let Some(new) = doc.by_id_mut(&slide_id(flight.to)) {
                    new.add_class(ACTIVE);
                    new.add_class(flight.direction.enter_class());
                }
                self.current = flight.to;
                self.refresh_ui(doc);
                if let Some(scope) = doc.by_id(&slide_id(flight.to)) {
                    self.hooks.run(flight.to, scope, doc, tasks);
                }
            }
            Phase::Settle => {
                if let Some(new) = doc.by_id_mut(&slide_id(flight.to)) {
                    new.remove_class(FROM_LEFT);
                    new.remove_class(FROM_RIGHT);
                }
            }
            Phase::Idle => {
                self.flight = None;
                tracing::trace!(slide = self.current, "transition settled");
            }
            Phase::Exit => {}
        }
    }

    /// Run the entry sequence of the current slide without a transition, for
    /// the slide that is showing when the widget starts.
    pub fn replay_hooks(&self, doc: &mut Document, tasks: &mut TaskQueue) {
        if let Some(scope) = doc.by_id(&slide_id(self.current)) {
            self.hooks.run(self.current, scope, doc, tasks);
        }
    }

    /// Bring counters, progress, buttons and dots in line with the current
    /// index. Missing elements are skipped.
    pub fn refresh_ui(&self, doc: &mut Document) {
        let current = self.current.to_string();
        if let Some(el) = doc.by_id_mut("current-slide") {
            el.text = current.clone();
        }
        if let Some(el) = doc.by_id_mut("total-slides") {
            el.text = self.total.to_string();
        }
        if let Some(el) = doc.by_id_mut("progress-current") {
            el.text = current;
        }
        if let Some(el) = doc.by_id_mut("progressBarFill") {
            let width = self.current as f64 / self.total.max(1) as f64 * 100.0;
            el.set_style("width", &format!("{width}%"));
        }
        if let Some(el) = doc.by_id_mut("progressPercentage") {
            el.text = format!("{}%", progress_percent(self.current, self.total));
        }

        if let Some(prev) = doc.select_first(&Selector::class("prev-btn")) {
            doc.get_mut(prev).disabled = self.current == 1;
        }
        if let Some(next) = doc.select_first(&Selector::class("next-btn")) {
            doc.get_mut(next).disabled = self.current == self.total;
        }

        for (i, dot) in doc.select_all(&Selector::class("dot")).into_iter().enumerate() {
            doc.get_mut(dot).toggle_class(ACTIVE, i + 1 == self.current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Element, NodeId};

    struct Rig {
        doc: Document,
        tasks: TaskQueue,
        nav: SlideNavigator,
    }

    impl Rig {
        fn new(total: usize) -> Self {
            let mut doc = Document::new();
            let body = doc.body();
            for n in 1..=total {
                let mut slide = Element::new("section")
                    .with_id(&slide_id(n))
                    .with_class("slide");
                if n == 1 {
                    slide.add_class(ACTIVE);
                }
                doc.append(body, slide);
            }
            doc.append(body, Element::new("button").with_class("prev-btn"));
            for _ in 0..total {
                doc.append(body, Element::new("span").with_class("dot"));
            }
            doc.append(body, Element::new("button").with_class("next-btn"));
            doc.append(body, Element::new("span").with_id("current-slide"));
            doc.append(body, Element::new("span").with_id("total-slides"));
            doc.append(body, Element::new("div").with_id("progressBarFill"));
            doc.append(body, Element::new("span").with_id("progressPercentage"));

            let nav = SlideNavigator::new(total, TransitionTimings::default(), HookTable::new());
            let mut rig = Self {
                doc,
                tasks: TaskQueue::new(),
                nav,
            };
            rig.nav.refresh_ui(&mut rig.doc);
            rig
        }

        fn run_for(&mut self, ms: u64) {
            let until = self.tasks.now() + Duration::from_millis(ms);
            while let Some(task) = self.tasks.pop_due(until) {
                match task {
                    Task::Transition => self.nav.advance(&mut self.doc, &mut self.tasks),
                    Task::Mutate(m) => m.apply(&mut self.doc, &mut self.tasks),
                    Task::Autoplay => {}
                }
            }
            self.tasks.settle(until);
        }

        fn finish(&mut self) {
            self.run_for(10_000);
        }

        fn node(&self, id: &str) -> NodeId {
            self.doc.by_id(id).unwrap()
        }

        fn active_slides(&self) -> Vec<NodeId> {
            self.doc
                .select_all(&Selector::class("slide"))
                .into_iter()
                .filter(|&n| self.doc.get(n).has_class(ACTIVE))
                .collect()
        }

        fn button(&self, class: &str) -> bool {
            let n = self.doc.select_first(&Selector::class(class)).unwrap();
            self.doc.get(n).disabled
        }
    }

    #[test]
    fn test_go_reaches_target_with_single_active_slide() {
        for target in 2..=15 {
            let mut rig = Rig::new(15);
            assert!(rig.nav.go(target, &mut rig.doc, &mut rig.tasks));
            rig.finish();
            assert_eq!(rig.nav.current(), target);
            assert!(!rig.nav.is_animating());
            assert_eq!(rig.active_slides(), vec![rig.node(&slide_id(target))]);
        }
    }

    #[test]
    fn test_go_to_current_is_noop() {
        let mut rig = Rig::new(5);
        let before = rig.nav.state();
        assert!(!rig.nav.go(1, &mut rig.doc, &mut rig.tasks));
        assert_eq!(rig.nav.state(), before);
        assert!(rig.tasks.is_idle());
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let mut rig = Rig::new(5);
        assert!(!rig.nav.go(0, &mut rig.doc, &mut rig.tasks));
        assert!(!rig.nav.go(6, &mut rig.doc, &mut rig.tasks));
        assert!(rig.tasks.is_idle());
    }

    #[test]
    fn test_second_go_while_in_flight_is_ignored() {
        let mut rig = Rig::new(15);
        assert!(rig.nav.go(3, &mut rig.doc, &mut rig.tasks));
        rig.run_for(200);
        assert!(!rig.nav.go(9, &mut rig.doc, &mut rig.tasks));
        rig.finish();
        assert_eq!(rig.nav.current(), 3);
    }

    #[test]
    fn test_phase_sequence() {
        let mut rig = Rig::new(3);
        rig.nav.next(&mut rig.doc, &mut rig.tasks);
        let s1 = rig.node("slide-1");
        let s2 = rig.node("slide-2");
        assert_eq!(rig.nav.phase(), Phase::Exit);
        assert!(rig.doc.get(s1).has_class(EXIT_RIGHT));
        assert_eq!(rig.nav.current(), 1);

        rig.run_for(500);
        assert_eq!(rig.nav.phase(), Phase::Enter);
        assert_eq!(rig.nav.current(), 2);
        assert!(!rig.doc.get(s1).has_class(ACTIVE));
        assert!(!rig.doc.get(s1).has_class(EXIT_RIGHT));
        assert!(rig.doc.get(s2).has_class(ACTIVE));
        assert!(rig.doc.get(s2).has_class(FROM_RIGHT));
        assert!(rig.nav.is_animating());

        rig.run_for(599);
        assert!(rig.doc.get(s2).has_class(FROM_RIGHT));
        rig.run_for(1);
        assert!(!rig.doc.get(s2).has_class(FROM_RIGHT));
        assert_eq!(rig.nav.phase(), Phase::Idle);
        assert!(!rig.nav.is_animating());
    }

    #[test]
    fn test_backward_uses_left_classes() {
        let mut rig = Rig::new(3);
        rig.nav.go(3, &mut rig.doc, &mut rig.tasks);
        rig.finish();
        rig.nav.prev(&mut rig.doc, &mut rig.tasks);
        let s3 = rig.node("slide-3");
        assert!(rig.doc.get(s3).has_class(EXIT_LEFT));
        rig.run_for(500);
        assert!(rig.doc.get(rig.node("slide-2")).has_class(FROM_LEFT));
    }

    #[test]
    fn test_bounds_for_next_and_prev() {
        let mut rig = Rig::new(2);
        assert!(!rig.nav.prev(&mut rig.doc, &mut rig.tasks));
        rig.nav.next(&mut rig.doc, &mut rig.tasks);
        rig.finish();
        assert!(!rig.nav.next(&mut rig.doc, &mut rig.tasks));
        assert!(rig.tasks.is_idle());
        assert_eq!(rig.nav.current(), 2);
    }

    #[test]
    fn test_progress_percent_boundaries() {
        assert_eq!(progress_percent(1, 15), 7);
        assert_eq!(progress_percent(15, 15), 100);
        assert_eq!(progress_percent(8, 15), 53);
        assert_eq!(progress_percent(1, 0), 0);
    }

    #[test]
    fn test_end_jumps_to_last_and_updates_buttons() {
        let mut rig = Rig::new(15);
        assert!(rig.button("prev-btn"));
        assert!(!rig.button("next-btn"));

        rig.nav.last(&mut rig.doc, &mut rig.tasks);
        rig.finish();
        assert_eq!(rig.nav.current(), 15);
        assert!(rig.button("next-btn"));
        assert!(!rig.button("prev-btn"));

        let pct = rig.node("progressPercentage");
        assert_eq!(rig.doc.get(pct).text, "100%");
        let fill = rig.node("progressBarFill");
        assert_eq!(rig.doc.get(fill).style("width"), Some("100%"));
        let counter = rig.node("current-slide");
        assert_eq!(rig.doc.get(counter).text, "15");
    }

    #[test]
    fn test_refresh_ui_marks_matching_dot() {
        let mut rig = Rig::new(4);
        rig.nav.go(3, &mut rig.doc, &mut rig.tasks);
        rig.finish();
        let dots = rig.doc.select_all(&Selector::class("dot"));
        let active: Vec<bool> = dots
            .iter()
            .map(|&d| rig.doc.get(d).has_class(ACTIVE))
            .collect();
        assert_eq!(active, vec![false, false, true, false]);
        let total = rig.node("total-slides");
        assert_eq!(rig.doc.get(total).text, "4");
        let pct = rig.node("progressPercentage");
        assert_eq!(rig.doc.get(pct).text, "75%");
    }
}
