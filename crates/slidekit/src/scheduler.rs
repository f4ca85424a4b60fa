use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;

use crate::animation::Mutation;

/// Everything that can be deferred in the widget.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Advance the in-flight slide transition to its next phase.
    Transition,
    /// Apply a deferred document mutation.
    Mutate(Mutation),
    /// Autoplay interval elapsed.
    Autoplay,
}

pub type TaskQueue = Scheduler<Task>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Entry<T> {
    due: Duration,
    id: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.id == other.id
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the BinaryHeap pops the earliest (due, id) first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Virtual-time queue. A task observes `now()` equal to its own due time,
/// so follow-ups keep the same timeline regardless of frame rate.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    queue: BinaryHeap<Entry<T>>,
    cancelled: HashSet<u64>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BinaryHeap::new(),
            cancelled: HashSet::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Run `task` once `delay` has elapsed from the current virtual time.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        self.queue.push(Entry {
            due: self.now + delay,
            id,
            task,
        });
        TaskId(id)
    }

    pub fn cancel(&mut self, id: TaskId) {
        if self.queue.iter().any(|e| e.id == id.0) {
            self.cancelled.insert(id.0);
        }
    }

    /// Number of live (not cancelled) tasks.
    pub fn pending(&self) -> usize {
        self.queue.len() - self.cancelled.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// Due time of the earliest live task.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue
            .iter()
            .filter(|e| !self.cancelled.contains(&e.id))
            .map(|e| e.due)
            .min()
    }

    /// Pop the earliest task due at or before `until`, moving the clock to
    /// its due time. Returns `None` once nothing else is due; callers then
    /// finish with [`Scheduler::settle`].
    pub fn pop_due(&mut self, until: Duration) -> Option<T> {
        loop {
            let head = self.queue.peek()?;
            if head.due > until {
                return None;
            }
            let entry = self.queue.pop()?;
            if self.cancelled.remove(&entry.id) {
                continue;
            }
            self.now = self.now.max(entry.due);
            return Some(entry.task);
        }
    }

    /// Move the clock forward to `until` after all due tasks ran.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn drain(s: &mut Scheduler<&'static str>, until: Duration) -> Vec<&'static str> {
        let mut out = Vec::new();
        while let Some(t) = s.pop_due(until) {
            out.push(t);
        }
        s.settle(until);
        out
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(ms(300), "c");
        s.schedule(ms(100), "a");
        s.schedule(ms(200), "b");
        assert_eq!(drain(&mut s, ms(250)), vec!["a", "b"]);
        assert_eq!(s.now(), ms(250));
        assert_eq!(drain(&mut s, ms(1000)), vec!["c"]);
        assert!(s.is_idle());
    }

    #[test]
    fn test_same_due_time_keeps_insertion_order() {
        let mut s = Scheduler::new();
        s.schedule(ms(50), "first");
        s.schedule(ms(50), "second");
        assert_eq!(drain(&mut s, ms(50)), vec!["first", "second"]);
    }

    #[test]
    fn test_clock_follows_task_due_time() {
        let mut s = Scheduler::new();
        s.schedule(ms(500), "exit");
        assert_eq!(s.pop_due(ms(5000)), Some("exit"));
        assert_eq!(s.now(), ms(500));
        // A follow-up scheduled from inside a task is relative to its due time.
        s.schedule(ms(600), "enter");
        assert_eq!(s.next_due(), Some(ms(1100)));
    }

    #[test]
    fn test_cancel() {
        let mut s = Scheduler::new();
        let id = s.schedule(ms(10), "tick");
        s.schedule(ms(20), "other");
        s.cancel(id);
        assert_eq!(s.pending(), 1);
        assert_eq!(drain(&mut s, ms(100)), vec!["other"]);
    }
}
