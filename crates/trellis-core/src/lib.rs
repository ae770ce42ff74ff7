//! Core systems for Trellis.
//!
//! This crate provides the small, UI-agnostic building blocks the rest of the
//! toolkit is written against:
//!
//! - **Signals**: single-threaded notification lists ([`Signal`])
//! - **Task Queue**: the deferred "run before the next idle" primitive
//!   ([`TaskQueue`], [`TaskContext`])
//! - **Logging**: tracing targets, perf spans and a generic tree printer
//!   ([`logging`])
//!
//! Everything here is single-threaded by construction. A UI context and all
//! of its trees live on one thread; cross-thread hand-off is the job of the
//! embedding event loop.

pub mod logging;
pub mod signal;
pub mod task;

pub use logging::{DebugTree, PerfSpan, TreeDebug, TreeFormatOptions, TreeStyle};
pub use signal::{ConnectionId, Signal};
pub use task::{PendingTask, TaskContext, TaskId, TaskQueue};
