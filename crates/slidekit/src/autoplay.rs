use std::time::Duration;

use crate::document::Document;
use crate::navigator::SlideNavigator;
use crate::scheduler::{Task, TaskId, TaskQueue};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Fixed-interval auto-advance that loops back to the first slide.
#[derive(Debug)]
pub struct Autoplay {
    interval: Duration,
    ticket: Option<TaskId>,
}

impl Autoplay {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ticket: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticket.is_some()
    }

    pub fn start(&mut self, tasks: &mut TaskQueue) {
        self.stop(tasks);
        self.ticket = Some(tasks.schedule(self.interval, Task::Autoplay));
    }

    pub fn stop(&mut self, tasks: &mut TaskQueue) {
        if let Some(ticket) = self.ticket.take() {
            tasks.cancel(ticket);
        }
    }

    /// Handle a fired [`Task::Autoplay`] and arm the next one.
    pub fn on_tick(&mut self, nav: &mut SlideNavigator, doc: &mut Document, tasks: &mut TaskQueue) {
        if self.ticket.is_none() {
            return;
        }
        if nav.current() < nav.total() {
            nav.next(doc, tasks);
        } else {
            nav.first(doc, tasks);
        }
        self.ticket = Some(tasks.schedule(self.interval, Task::Autoplay));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Element;
    use crate::hooks::HookTable;
    use crate::navigator::{ACTIVE, TransitionTimings, slide_id};

    fn setup(total: usize) -> (Document, SlideNavigator, TaskQueue) {
        let mut doc = Document::new();
        for n in 1..=total {
            let mut el = Element::new("section").with_id(&slide_id(n));
            if n == 1 {
                el.add_class(ACTIVE);
            }
            doc.append(doc.body(), el);
        }
        let nav = SlideNavigator::new(total, TransitionTimings::default(), HookTable::new());
        (doc, nav, TaskQueue::new())
    }

    fn run(
        auto: &mut Autoplay,
        nav: &mut SlideNavigator,
        doc: &mut Document,
        tasks: &mut TaskQueue,
        until: Duration,
    ) {
        while let Some(task) = tasks.pop_due(until) {
            match task {
                Task::Transition => nav.advance(doc, tasks),
                Task::Autoplay => auto.on_tick(nav, doc, tasks),
                Task::Mutate(m) => m.apply(doc, tasks),
            }
        }
        tasks.settle(until);
    }

    #[test]
    fn test_advances_and_loops() {
        let (mut doc, mut nav, mut tasks) = setup(2);
        let mut auto = Autoplay::new(Duration::from_secs(10));
        auto.start(&mut tasks);

        run(&mut auto, &mut nav, &mut doc, &mut tasks, Duration::from_secs(11));
        assert_eq!(nav.current(), 2);
        run(&mut auto, &mut nav, &mut doc, &mut tasks, Duration::from_secs(21));
        assert_eq!(nav.current(), 1);
    }

    #[test]
    fn test_stop_cancels_pending_tick() {
        let (mut doc, mut nav, mut tasks) = setup(3);
        let mut auto = Autoplay::new(Duration::from_secs(1));
        auto.start(&mut tasks);
        auto.stop(&mut tasks);
        assert!(!auto.is_running());
        run(&mut auto, &mut nav, &mut doc, &mut tasks, Duration::from_secs(5));
        assert_eq!(nav.current(), 1);
        assert!(tasks.is_idle());
    }
}
