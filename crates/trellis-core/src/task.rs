//! Deferred task queue.
//!
//! Tasks posted to a [`TaskQueue`] run later, on the same thread, when the
//! owner drains the queue (typically once per event-loop turn, before the
//! loop goes idle). This is the only scheduling primitive the UI core needs:
//! invalidation requests post a task instead of doing the work inline, which
//! lets many mutations within one native callback collapse into one relayout.
//!
//! The queue is generic over the context `C` the tasks receive. The context
//! usually owns the queue itself, so draining goes through the
//! [`TaskContext`] trait, which pops one task at a time and releases the
//! borrow before running it.
//!
//! ```
//! use trellis_core::{TaskContext, TaskQueue};
//!
//! struct Counter {
//!     value: u32,
//!     tasks: TaskQueue<Counter>,
//! }
//!
//! impl TaskContext for Counter {
//!     fn task_queue(&mut self) -> &mut TaskQueue<Self> {
//!         &mut self.tasks
//!     }
//! }
//!
//! let mut counter = Counter { value: 0, tasks: TaskQueue::new() };
//! counter.tasks.post(|c: &mut Counter| c.value += 1);
//! counter.tasks.post(|c: &mut Counter| c.value *= 10);
//! assert_eq!(counter.value, 0);
//!
//! assert_eq!(counter.process_all_tasks(), 2);
//! assert_eq!(counter.value, 10);
//! ```

use std::collections::VecDeque;
use std::fmt;

use crate::logging::targets;

/// A unique identifier for a posted task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

type BoxedTask<C> = Box<dyn FnOnce(&mut C) + 'static>;

/// A task removed from the queue, ready to run.
pub struct PendingTask<C> {
    id: TaskId,
    task: BoxedTask<C>,
}

impl<C> PendingTask<C> {
    /// The id returned when the task was posted.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Run the task against its context.
    pub fn run(self, cx: &mut C) {
        (self.task)(cx);
    }
}

impl<C> fmt::Debug for PendingTask<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTask").field("id", &self.id).finish()
    }
}

/// FIFO queue of deferred tasks.
///
/// Posted tasks always run, in posting order; there is no withdrawal. Callers
/// that need "at most one pending" semantics keep their own pending flag.
pub struct TaskQueue<C> {
    tasks: VecDeque<PendingTask<C>>,
    next_id: u64,
}

impl<C> TaskQueue<C> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
            next_id: 1,
        }
    }

    /// Post a task to run on the next drain.
    pub fn post<F>(&mut self, task: F) -> TaskId
    where
        F: FnOnce(&mut C) + 'static,
    {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push_back(PendingTask {
            id,
            task: Box::new(task),
        });
        tracing::trace!(target: targets::TASK, task = id.0, pending = self.tasks.len(), "task posted");
        id
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Remove the oldest pending task.
    pub fn pop(&mut self) -> Option<PendingTask<C>> {
        self.tasks.pop_front()
    }
}

impl<C> Default for TaskQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for TaskQueue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.tasks.len())
            .finish()
    }
}

/// A context that owns the task queue its tasks run against.
pub trait TaskContext: Sized {
    /// Access the queue owned by this context.
    fn task_queue(&mut self) -> &mut TaskQueue<Self>;

    /// Run up to `limit` tasks, including tasks posted by tasks that ran
    /// earlier in the same call.
    ///
    /// Returns the number of tasks run.
    fn process_tasks(&mut self, limit: usize) -> usize {
        let mut count = 0;
        while count < limit {
            let Some(task) = self.task_queue().pop() else {
                break;
            };
            task.run(self);
            count += 1;
        }
        if count > 0 {
            tracing::trace!(target: targets::TASK, count, "processed deferred tasks");
        }
        if count == limit && self.task_queue().has_pending() {
            crate::trellis_debug!(
                limit,
                pending = self.task_queue().pending_count(),
                "task limit reached"
            );
        }
        count
    }

    /// Run tasks until the queue is empty.
    ///
    /// Returns the number of tasks run.
    fn process_all_tasks(&mut self) -> usize {
        self.process_tasks(usize::MAX)
    }
}
