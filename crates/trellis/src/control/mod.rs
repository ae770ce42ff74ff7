//! The control tree.
//!
//! A control is the logical, user-facing node of the UI. It owns the render
//! objects that visualize it (the subtree under its root render object at
//! creation time), exposes routed events, and may carry a cursor. Child
//! controls are placed by inserting their root render object into the
//! parent's *child container*, a render object inside the parent's own
//! subtree, so the render tree mirrors the control tree.
//!
//! Controls become attached to a window host when they are added under a
//! control that is attached. Attachment and detachment are recursive and
//! notified through [`ControlEvents::attached_to_host`] and
//! [`ControlEvents::detached_from_host`]; building a subtree off-screen
//! produces no host notifications.

mod events;
mod routed;

use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use trellis_core::DebugTree;
use trellis_core::logging::targets;
use trellis_render::Point;

use crate::cursor::CursorShape;
use crate::error::{UiError, UiResult};
use crate::host::WindowHostId;
use crate::render::{
    BorderRenderObject, BorderStyle, FlexLayoutRenderObject, RenderObjectId, ScrollRenderObject,
    StackLayoutRenderObject,
};
use crate::ui::Ui;

pub use events::{
    ControlEvents, EventArgs, EventSlot, FocusChangeEventArgs, HandlerId, KeyEventArgs,
    KeyModifiers, MouseButton, MouseButtonEventArgs, MouseEventArgs, MouseWheelEventArgs,
    RoutedEvent, UiEventArgs,
};
pub use routed::{EventAccessor, dispatch_routed_event, lowest_common_ancestor};

new_key_type! {
    /// Identifies a control in the [`ControlTree`].
    pub struct ControlId;
}

/// One control.
#[derive(Debug)]
pub struct ControlNode {
    type_name: &'static str,
    parent: Option<ControlId>,
    children: Vec<ControlId>,
    root_render: RenderObjectId,
    container: Option<RenderObjectId>,
    owned_render: Vec<RenderObjectId>,
    cursor: Option<CursorShape>,
    host: Option<WindowHostId>,
    events: Rc<ControlEvents>,
    mouse_over: bool,
}

impl ControlNode {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn parent(&self) -> Option<ControlId> {
        self.parent
    }

    pub fn children(&self) -> &[ControlId] {
        &self.children
    }

    /// The render object that represents this control in its parent's
    /// child container.
    pub fn root_render(&self) -> RenderObjectId {
        self.root_render
    }

    /// Where child controls' root render objects are inserted.
    pub fn child_container(&self) -> Option<RenderObjectId> {
        self.container
    }

    /// Render objects this control owns, its root included.
    pub fn owned_render(&self) -> &[RenderObjectId] {
        &self.owned_render
    }

    /// The control's own cursor, not the inherited one.
    pub fn cursor(&self) -> Option<CursorShape> {
        self.cursor
    }

    pub fn host(&self) -> Option<WindowHostId> {
        self.host
    }

    pub fn events(&self) -> &ControlEvents {
        &self.events
    }

    pub fn is_mouse_over(&self) -> bool {
        self.mouse_over
    }
}

/// Arena holding every control of a [`Ui`].
#[derive(Debug, Default)]
pub struct ControlTree {
    nodes: SlotMap<ControlId, ControlNode>,
}

impl ControlTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ControlId) -> Option<&ControlNode> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: ControlId) -> Option<&mut ControlNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: ControlId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: ControlId) -> Option<ControlId> {
        self.nodes.get(id)?.parent
    }

    /// Controls from the root of `id`'s tree down to `id`.
    pub fn root_path(&self, id: ControlId) -> Vec<ControlId> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            if !self.nodes.contains_key(node) {
                break;
            }
            path.push(node);
            current = self.parent(node);
        }
        path.reverse();
        path
    }

    /// `id` and everything below it, in pre-order.
    pub fn descendants(&self, id: ControlId) -> Vec<ControlId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            let Some(control) = self.nodes.get(node) else {
                continue;
            };
            out.push(node);
            stack.extend(control.children.iter().rev().copied());
        }
        out
    }

    pub fn is_ancestor_or_self(&self, ancestor: ControlId, id: ControlId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    fn insert(&mut self, node: ControlNode) -> ControlId {
        self.nodes.insert(node)
    }

    fn remove(&mut self, id: ControlId) -> Option<ControlNode> {
        self.nodes.remove(id)
    }
}

impl DebugTree for ControlTree {
    type Id = ControlId;

    fn label(&self, id: ControlId) -> Option<String> {
        self.get(id).map(|c| c.type_name.to_string())
    }

    fn children(&self, id: ControlId) -> Vec<ControlId> {
        self.get(id).map(|c| c.children.clone()).unwrap_or_default()
    }

    fn detail(&self, id: ControlId) -> Option<String> {
        let control = self.get(id)?;
        let mut flags = Vec::new();
        if control.host.is_some() {
            flags.push("attached");
        }
        if control.mouse_over {
            flags.push("hover");
        }
        (!flags.is_empty()).then(|| flags.join(","))
    }
}

// =============================================================================
// Ui integration
// =============================================================================

impl Ui {
    pub fn control_tree(&self) -> &ControlTree {
        &self.controls
    }

    pub fn control(&self, id: ControlId) -> UiResult<&ControlNode> {
        self.controls.get(id).ok_or(UiError::ControlNotFound(id))
    }

    /// The event slots of a control. The handle stays valid after the
    /// control is destroyed; its handlers are then never invoked again.
    pub fn control_events(&self, id: ControlId) -> UiResult<Rc<ControlEvents>> {
        Ok(self.control(id)?.events.clone())
    }

    /// Create a control owning the render subtree rooted at `root_render`.
    ///
    /// The subtree must be detached and not owned by another control.
    pub fn create_control(
        &mut self,
        type_name: &'static str,
        root_render: RenderObjectId,
    ) -> UiResult<ControlId> {
        let base = self.render_base(root_render)?;
        if base.parent().is_some() || base.host().is_some() {
            return Err(UiError::AlreadyParented);
        }
        if let Some(owned) = self
            .render
            .descendants(root_render)
            .into_iter()
            .find(|&node| self.render.base(node).is_some_and(|b| b.control().is_some()))
        {
            return Err(UiError::RenderObjectOwned(owned));
        }
        Ok(self.insert_control(type_name, root_render, None))
    }

    pub(crate) fn insert_control(
        &mut self,
        type_name: &'static str,
        root_render: RenderObjectId,
        container: Option<RenderObjectId>,
    ) -> ControlId {
        let owned = self.render.descendants(root_render);
        let events = Rc::new(ControlEvents::default());
        let id = self.controls.insert(ControlNode {
            type_name,
            parent: None,
            children: Vec::new(),
            root_render,
            container,
            owned_render: owned.clone(),
            cursor: None,
            host: None,
            events: events.clone(),
            mouse_over: false,
        });

        for &node in &owned {
            if let Some(base) = self.render.base_mut(node) {
                base.control = Some(id);
            }
        }
        for &node in &owned {
            self.render.with_behavior_mut(node, |behavior, _| {
                behavior.on_control_attached(node, id, &events);
            });
        }

        events
            .mouse_enter
            .direct
            .add_handler(move |ui, _| ui.set_mouse_over(id, true));
        events
            .mouse_leave
            .direct
            .add_handler(move |ui, _| ui.set_mouse_over(id, false));

        tracing::trace!(target: targets::CONTROL, ?id, type_name, owned = owned.len(), "control created");
        id
    }

    /// A control whose only render object is an overlay stack that also
    /// holds its children.
    pub fn create_container(&mut self) -> ControlId {
        let root = self.create_render_object(StackLayoutRenderObject::new());
        self.insert_control("Container", root, Some(root))
    }

    /// A control laying its children out in a row that grows and shrinks
    /// them by their flex factors.
    pub fn create_flex_layout(&mut self) -> ControlId {
        let root = self.create_render_object(FlexLayoutRenderObject::new());
        self.insert_control("FlexLayout", root, Some(root))
    }

    /// A control drawing a border around its single child.
    pub fn create_border(&mut self, style: &BorderStyle) -> ControlId {
        let root = self.create_render_object(BorderRenderObject::with_style(style));
        self.insert_control("Border", root, Some(root))
    }

    /// A control scrolling its single child.
    pub fn create_scroll_view(&mut self) -> ControlId {
        let root = self.create_render_object(ScrollRenderObject::new());
        self.insert_control("ScrollView", root, Some(root))
    }

    /// Designate the render object that receives child controls.
    pub fn set_child_container(
        &mut self,
        control: ControlId,
        container: Option<RenderObjectId>,
    ) -> UiResult<()> {
        let node = self.control(control)?;
        if !node.children.is_empty() {
            return Err(UiError::ContainerInUse(control));
        }
        if let Some(container) = container
            && self.render_base(container)?.control() != Some(control)
        {
            return Err(UiError::RenderObjectOwned(container));
        }
        if let Some(node) = self.controls.get_mut(control) {
            node.container = container;
        }
        Ok(())
    }

    /// Insert `child` under `parent` at `position`.
    ///
    /// The child's root render object is inserted into the parent's child
    /// container before the render object of the control currently at
    /// `position`. If the parent is attached to a host, the child's subtree
    /// is attached too.
    pub fn add_child(
        &mut self,
        parent: ControlId,
        child: ControlId,
        position: usize,
    ) -> UiResult<()> {
        let parent_node = self.control(parent)?;
        let child_node = self.control(child)?;
        if child_node.parent.is_some() {
            return Err(UiError::AlreadyParented);
        }
        if self.host_rooted_at(child).is_some() {
            return Err(UiError::HostRoot(child));
        }
        let len = parent_node.children.len();
        if position > len {
            return Err(UiError::IndexOutOfRange {
                index: position,
                len,
            });
        }
        if self.controls.is_ancestor_or_self(child, parent) {
            return Err(UiError::WouldCreateCycle);
        }
        let container = parent_node
            .container
            .ok_or(UiError::NoChildContainer(parent))?;

        let child_root = child_node.root_render;
        let host = parent_node.host;
        let render_index = parent_node
            .children
            .get(position)
            .and_then(|&next| self.controls.get(next))
            .and_then(|next| self.render.index_in_parent(next.root_render))
            .unwrap_or_else(|| self.render.base(container).map_or(0, |b| b.children().len()));

        self.render.add_child(container, child_root, render_index)?;
        if let Some(node) = self.controls.get_mut(parent) {
            node.children.insert(position, child);
        }
        if let Some(node) = self.controls.get_mut(child) {
            node.parent = Some(parent);
        }
        tracing::trace!(target: targets::CONTROL, ?parent, ?child, position, "control added");

        self.invalidate_render_layout(container);
        if let Some(host) = host {
            self.attach_controls(child, host);
        }
        Ok(())
    }

    /// Remove and return the child at `position`, detaching its subtree.
    ///
    /// Host state pointing into the subtree is reset first: hover moves to
    /// `parent`, focus to the host root, and a capture is released.
    pub fn remove_child(&mut self, parent: ControlId, position: usize) -> UiResult<ControlId> {
        let node = self.control(parent)?;
        let len = node.children.len();
        let Some(&child) = node.children.get(position) else {
            return Err(UiError::IndexOutOfRange {
                index: position,
                len,
            });
        };
        let host = node.host;
        if let Some(host) = host {
            let departing = self.controls.descendants(child);
            self.forget_controls(host, &departing, Some(parent));
        }

        // Handlers run by the reset may have moved the child already.
        let Some(position) = self
            .controls
            .get(parent)
            .and_then(|p| p.children.iter().position(|&c| c == child))
        else {
            return Ok(child);
        };
        let child_root = self.control(child)?.root_render;
        if let Some(render_parent) = self.render.base(child_root).and_then(|b| b.parent())
            && let Some(index) = self.render.index_in_parent(child_root)
        {
            self.render.remove_child(render_parent, index)?;
            self.invalidate_render_layout(render_parent);
        }
        if let Some(node) = self.controls.get_mut(parent) {
            node.children.remove(position);
        }
        if let Some(node) = self.controls.get_mut(child) {
            node.parent = None;
        }
        tracing::trace!(target: targets::CONTROL, ?parent, ?child, position, "control removed");

        self.detach_controls(child);
        Ok(child)
    }

    /// Remove `child` from its parent, if it has one.
    pub fn remove_from_parent(&mut self, child: ControlId) -> UiResult<()> {
        let Some(parent) = self.control(child)?.parent else {
            return Ok(());
        };
        let position = self
            .control(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(UiError::ControlNotFound(child))?;
        self.remove_child(parent, position).map(|_| ())
    }

    /// Destroy a control, its descendants and the render objects they own.
    ///
    /// Destroying the root control of a window host tears the host down.
    pub fn destroy_control(&mut self, id: ControlId) -> UiResult<()> {
        self.control(id)?;
        if let Some(host) = self.host_rooted_at(id) {
            return self.destroy_window_host(host);
        }
        self.remove_from_parent(id)?;
        self.destroy_control_tree(id);
        Ok(())
    }

    /// Drop a detached control subtree.
    pub(crate) fn destroy_control_tree(&mut self, root: ControlId) {
        let Some(root_render) = self.controls.get(root).map(|c| c.root_render) else {
            return;
        };
        let ids = self.controls.descendants(root);
        self.detach_controls(root);
        self.render.remove_subtree(root_render);
        for &id in &ids {
            self.controls.remove(id);
        }
        tracing::debug!(target: targets::CONTROL, ?root, count = ids.len(), "control tree destroyed");
    }

    /// Attach `root` and its descendants to `host` and notify them.
    pub(crate) fn attach_controls(&mut self, root: ControlId, host: WindowHostId) {
        let ids = self.controls.descendants(root);
        let mut notify = Vec::with_capacity(ids.len());
        for &id in &ids {
            if let Some(node) = self.controls.get_mut(id) {
                node.host = Some(host);
                notify.push(node.events.clone());
            }
        }
        tracing::debug!(target: targets::CONTROL, ?root, ?host, count = ids.len(), "controls attached");
        for events in notify {
            events.attached_to_host.emit(host);
        }
    }

    /// Detach `root` and its descendants from their host and notify them.
    pub(crate) fn detach_controls(&mut self, root: ControlId) {
        let mut notify = Vec::new();
        for id in self.controls.descendants(root) {
            if let Some(node) = self.controls.get_mut(id) {
                node.mouse_over = false;
                if let Some(host) = node.host.take() {
                    notify.push((host, node.events.clone()));
                }
            }
        }
        if let Some(root_render) = self.controls.get(root).map(|c| c.root_render) {
            self.render.set_host_recursive(root_render, None);
        }
        if !notify.is_empty() {
            tracing::debug!(target: targets::CONTROL, ?root, count = notify.len(), "controls detached");
        }
        for (host, events) in notify {
            events.detached_from_host.emit(host);
        }
    }

    pub(crate) fn set_mouse_over(&mut self, id: ControlId, over: bool) {
        if let Some(node) = self.controls.get_mut(id) {
            node.mouse_over = over;
        }
    }

    // =========================================================================
    // Cursor, focus and capture
    // =========================================================================

    /// Set the control's own cursor. `None` inherits from the parent.
    pub fn set_cursor(&mut self, id: ControlId, cursor: Option<CursorShape>) -> UiResult<()> {
        let node = self
            .controls
            .get_mut(id)
            .ok_or(UiError::ControlNotFound(id))?;
        node.cursor = cursor;
        if let Some(host) = node.host {
            self.update_cursor(host);
        }
        Ok(())
    }

    /// The first cursor set on `id` or an ancestor; the arrow at the root.
    pub fn inherited_cursor(&self, id: ControlId) -> CursorShape {
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.controls.get(c)) {
            if let Some(cursor) = node.cursor {
                return cursor;
            }
            current = node.parent;
        }
        CursorShape::Arrow
    }

    pub fn is_mouse_over(&self, id: ControlId) -> bool {
        self.controls.get(id).is_some_and(|c| c.mouse_over)
    }

    /// Whether `id` is the focus control of its host.
    pub fn has_focus(&self, id: ControlId) -> bool {
        self.control_host(id)
            .and_then(|host| self.hosts.get(host))
            .is_some_and(|host| host.focus_control() == id)
    }

    /// Move keyboard focus of the control's host to it.
    pub fn set_focus(&mut self, id: ControlId) -> UiResult<()> {
        let host = self.control_host(id).ok_or(UiError::NotAttached(id))?;
        self.request_focus_for(host, Some(id))
    }

    /// Capture the mouse for `id`. Returns `false` if another control holds
    /// the capture or the native window refused it.
    pub fn capture_mouse(&mut self, id: ControlId) -> UiResult<bool> {
        let host = self.control_host(id).ok_or(UiError::NotAttached(id))?;
        self.capture_mouse_for(host, Some(id))
    }

    /// Release the capture if `id` holds it. Returns whether it did.
    pub fn release_mouse(&mut self, id: ControlId) -> UiResult<bool> {
        if !self.is_mouse_captured(id) {
            return Ok(false);
        }
        let host = self.control_host(id).ok_or(UiError::NotAttached(id))?;
        self.capture_mouse_for(host, None)
    }

    pub fn is_mouse_captured(&self, id: ControlId) -> bool {
        self.control_host(id)
            .and_then(|host| self.hosts.get(host))
            .is_some_and(|host| host.mouse_captured_control() == Some(id))
    }

    pub fn control_host(&self, id: ControlId) -> Option<WindowHostId> {
        self.controls.get(id)?.host
    }

    /// Convert a point in window coordinates to `id`'s content coordinates.
    pub fn point_to_control_content(&self, id: ControlId, point: Point) -> Option<Point> {
        let root = self.controls.get(id)?.root_render;
        Some(self.render.from_root_to_content(root, point))
    }
}
