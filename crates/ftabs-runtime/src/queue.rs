#![forbid(unsafe_code)]

//! Deferred task queue with keyed coalescing.
//!
//! Tasks scheduled while the host is handling one edit run on the next
//! drain. Keyed tasks coalesce: scheduling a key that is already pending
//! replaces the queued task but keeps its original position, so the latest
//! task wins while enqueue order is preserved.

use std::collections::VecDeque;
use std::fmt;

/// A deferred task receiving the drain context.
pub type Task<C> = Box<dyn FnOnce(&mut C)>;

struct Entry<K, C> {
    key: Option<K>,
    task: Task<C>,
}

/// FIFO of deferred tasks.
pub struct TaskQueue<K, C> {
    entries: VecDeque<Entry<K, C>>,
}

impl<K, C> Default for TaskQueue<K, C> {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }
}

impl<K: fmt::Debug, C> fmt::Debug for TaskQueue<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field(
                "keys",
                &self.entries.iter().map(|e| &e.key).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<K: PartialEq, C> TaskQueue<K, C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an unkeyed task.
    pub fn schedule(&mut self, task: impl FnOnce(&mut C) + 'static) {
        self.entries.push_back(Entry {
            key: None,
            task: Box::new(task),
        });
    }

    /// Queue a task under `key`. Returns `true` when it replaced a pending
    /// task with the same key.
    pub fn schedule_keyed(&mut self, key: K, task: impl FnOnce(&mut C) + 'static) -> bool {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key.as_ref() == Some(&key)) {
            entry.task = Box::new(task);
            return true;
        }
        self.entries.push_back(Entry {
            key: Some(key),
            task: Box::new(task),
        });
        false
    }

    /// Whether a task is pending under `key`.
    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.entries.iter().any(|e| e.key.as_ref() == Some(key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take every pending task in order, leaving the queue empty.
    ///
    /// Tasks scheduled while the returned batch runs land in the next round.
    pub fn take_round(&mut self) -> Vec<Task<C>> {
        self.entries.drain(..).map(|e| e.task).collect()
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_tasks_coalesce_in_place() {
        let mut queue: TaskQueue<u32, Vec<&'static str>> = TaskQueue::new();
        queue.schedule_keyed(1, |log| log.push("first-1"));
        queue.schedule(|log| log.push("plain"));
        assert!(queue.schedule_keyed(1, |log| log.push("second-1")));
        assert!(!queue.schedule_keyed(2, |log| log.push("2")));
        assert_eq!(queue.len(), 3);
        assert!(queue.is_pending(&1));

        let mut log = Vec::new();
        for task in queue.take_round() {
            task(&mut log);
        }
        assert_eq!(log, vec!["second-1", "plain", "2"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn clear_drops_pending() {
        let mut queue: TaskQueue<u8, ()> = TaskQueue::new();
        queue.schedule(|_| {});
        queue.clear();
        assert!(queue.take_round().is_empty());
    }
}
