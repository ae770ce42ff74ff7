//! The UI context.

use std::fmt;

use slotmap::SlotMap;
use trellis_core::{TaskContext, TaskQueue, TreeDebug};

use crate::control::{ControlId, ControlTree};
use crate::host::{WindowHost, WindowHostId};
use crate::render::{RenderObjectId, RenderTree};

/// Owns every render object, control and window host of one UI thread,
/// plus the task queue that coalesces relayout and repaint.
///
/// All tree mutation goes through `&mut Ui`. Deferred work posted to the
/// queue runs when the embedding event loop calls
/// [`process_all_tasks`](Ui::process_all_tasks), typically once per turn
/// before going idle.
pub struct Ui {
    pub(crate) render: RenderTree,
    pub(crate) controls: ControlTree,
    pub(crate) hosts: SlotMap<WindowHostId, WindowHost>,
    pub(crate) tasks: TaskQueue<Ui>,
}

static_assertions::assert_not_impl_any!(Ui: Send, Sync);

impl Ui {
    pub fn new() -> Self {
        trellis_core::trellis_trace!("ui context created");
        Self {
            render: RenderTree::new(),
            controls: ControlTree::new(),
            hosts: SlotMap::with_key(),
            tasks: TaskQueue::new(),
        }
    }

    pub fn render_tree(&self) -> &RenderTree {
        &self.render
    }

    /// Run pending tasks until the queue is empty, including tasks posted
    /// while draining. Returns the number of tasks run.
    pub fn process_all_tasks(&mut self) -> usize {
        TaskContext::process_all_tasks(self)
    }

    pub fn has_pending_tasks(&self) -> bool {
        self.tasks.has_pending()
    }

    /// Indented dump of the render subtree under `root`.
    pub fn debug_render_tree(&self, root: RenderObjectId) -> String {
        TreeDebug::new().format_subtree(&self.render, root)
    }

    /// Indented dump of the control subtree under `root`.
    pub fn debug_control_tree(&self, root: ControlId) -> String {
        TreeDebug::new().format_subtree(&self.controls, root)
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskContext for Ui {
    fn task_queue(&mut self) -> &mut TaskQueue<Self> {
        &mut self.tasks
    }
}

impl fmt::Debug for Ui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ui")
            .field("render_objects", &self.render.len())
            .field("controls", &self.controls.len())
            .field("hosts", &self.hosts.len())
            .field("pending_tasks", &self.tasks.pending_count())
            .finish()
    }
}
