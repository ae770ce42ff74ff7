//! The render object arena and the measure/layout/draw/hit-test drivers.

use slotmap::SlotMap;
use trellis_core::DebugTree;
use trellis_core::logging::targets;
use trellis_render::{Painter, Point, Rect, Size, Thickness};

use super::{
    LayoutContext, MeasureRequirement, MeasureSize, RenderCx, RenderNode, RenderObject,
    RenderObjectBase, RenderObjectId,
};
use crate::control::ControlId;
use crate::error::{UiError, UiResult};
use crate::host::WindowHostId;
use crate::ui::Ui;

/// Arena holding every render object of a [`Ui`].
#[derive(Default)]
pub struct RenderTree {
    nodes: SlotMap<RenderObjectId, RenderNode>,
}

impl RenderTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, behavior: Box<dyn RenderObject>) -> RenderObjectId {
        let mut base = RenderObjectBase::new(behavior.name(), behavior.child_mode());
        base.border = behavior.border_space();
        let id = self.nodes.insert(RenderNode {
            base,
            behavior: Some(behavior),
        });
        tracing::trace!(target: targets::RENDER, ?id, name = self.nodes[id].base.name, "render object created");
        id
    }

    pub fn contains(&self, id: RenderObjectId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn base(&self, id: RenderObjectId) -> Option<&RenderObjectBase> {
        self.nodes.get(id).map(|n| &n.base)
    }

    pub(crate) fn base_mut(&mut self, id: RenderObjectId) -> Option<&mut RenderObjectBase> {
        self.nodes.get_mut(id).map(|n| &mut n.base)
    }

    /// The behavior of a render object. `None` while one of its mutable
    /// hooks is running.
    pub fn behavior(&self, id: RenderObjectId) -> Option<&dyn RenderObject> {
        self.nodes.get(id)?.behavior.as_deref()
    }

    /// Run `f` with the behavior of `id` taken out of the arena so it can
    /// mutate itself while the rest of the tree stays reachable.
    pub(crate) fn with_behavior_mut<R>(
        &mut self,
        id: RenderObjectId,
        f: impl FnOnce(&mut dyn RenderObject, &mut RenderTree) -> R,
    ) -> Option<R> {
        let node = self.nodes.get_mut(id)?;
        let Some(mut behavior) = node.behavior.take() else {
            tracing::warn!(target: targets::RENDER, ?id, name = node.base.name, "render object re-entered while its behavior is in use");
            return None;
        };
        let result = f(behavior.as_mut(), self);
        if let Some(node) = self.nodes.get_mut(id) {
            node.behavior = Some(behavior);
        }
        Some(result)
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Insert `child` into `parent`'s children at `index`.
    ///
    /// The child takes over the parent's window host, recursively.
    pub(crate) fn add_child(
        &mut self,
        parent: RenderObjectId,
        child: RenderObjectId,
        index: usize,
    ) -> UiResult<()> {
        let parent_base = self.base(parent).ok_or(UiError::RenderObjectNotFound(parent))?;
        let child_base = self.base(child).ok_or(UiError::RenderObjectNotFound(child))?;

        if child_base.parent.is_some() || child_base.host.is_some() {
            return Err(UiError::AlreadyParented);
        }
        if !parent_base.child_mode.accepts(parent_base.children.len()) {
            return Err(UiError::ChildCardinality {
                name: parent_base.name,
                mode: parent_base.child_mode,
            });
        }
        let len = parent_base.children.len();
        if index > len {
            return Err(UiError::IndexOutOfRange { index, len });
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(UiError::WouldCreateCycle);
        }

        let host = parent_base.host;
        if let Some(base) = self.base_mut(parent) {
            base.children.insert(index, child);
        }
        if let Some(base) = self.base_mut(child) {
            base.parent = Some(parent);
        }
        self.set_host_recursive(child, host);
        self.with_behavior_mut(parent, |behavior, _| behavior.on_child_inserted(index));

        tracing::trace!(target: targets::RENDER, ?parent, ?child, index, "render child added");
        Ok(())
    }

    /// Remove the child at `index` from `parent`. The child keeps its
    /// subtree but loses its window host.
    pub(crate) fn remove_child(
        &mut self,
        parent: RenderObjectId,
        index: usize,
    ) -> UiResult<RenderObjectId> {
        let base = self.base_mut(parent).ok_or(UiError::RenderObjectNotFound(parent))?;
        let len = base.children.len();
        if index >= len {
            return Err(UiError::IndexOutOfRange { index, len });
        }
        let child = base.children.remove(index);
        if let Some(child_base) = self.base_mut(child) {
            child_base.parent = None;
        }
        self.set_host_recursive(child, None);
        self.with_behavior_mut(parent, |behavior, _| behavior.on_child_removed(index));

        tracing::trace!(target: targets::RENDER, ?parent, ?child, index, "render child removed");
        Ok(child)
    }

    /// Detach `id` from its parent and drop it with its whole subtree.
    ///
    /// Returns the ids that were removed.
    pub(crate) fn remove_subtree(&mut self, id: RenderObjectId) -> Vec<RenderObjectId> {
        if let Some(parent) = self.base(id).and_then(|b| b.parent)
            && let Some(index) = self.index_in_parent(id)
        {
            let _ = self.remove_child(parent, index);
        }
        let removed = self.descendants(id);
        for &node in &removed {
            self.nodes.remove(node);
        }
        removed
    }

    pub(crate) fn set_host_recursive(&mut self, id: RenderObjectId, host: Option<WindowHostId>) {
        for node in self.descendants(id) {
            if let Some(base) = self.base_mut(node) {
                base.host = host;
            }
        }
    }

    /// `id` and every node below it, in pre-order.
    pub fn descendants(&self, id: RenderObjectId) -> Vec<RenderObjectId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            let Some(base) = self.base(node) else {
                continue;
            };
            result.push(node);
            stack.extend(base.children.iter().rev().copied());
        }
        result
    }

    /// Position of `id` within its parent's children.
    pub fn index_in_parent(&self, id: RenderObjectId) -> Option<usize> {
        let parent = self.base(id)?.parent?;
        self.base(parent)?.children.iter().position(|&c| c == id)
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: RenderObjectId, id: RenderObjectId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.base(node).and_then(|b| b.parent);
        }
        false
    }

    /// The nearest node, starting at `id` and walking up, owned by a control.
    pub fn nearest_control(&self, id: RenderObjectId) -> Option<ControlId> {
        let mut current = Some(id);
        while let Some(node) = current {
            let base = self.base(node)?;
            if let Some(control) = base.control {
                return Some(control);
            }
            current = base.parent;
        }
        None
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Sum of offsets from the root of the tree `id` lives in.
    pub fn total_offset(&self, id: RenderObjectId) -> Point {
        let mut offset = Point::ZERO;
        let mut current = Some(id);
        while let Some(node) = current {
            let Some(base) = self.base(node) else {
                break;
            };
            offset += base.offset;
            current = base.parent;
        }
        offset
    }

    /// Convert a point in root coordinates to `id`'s content coordinates.
    pub fn from_root_to_content(&self, id: RenderObjectId, point: Point) -> Point {
        let content = self
            .base(id)
            .map(|b| b.content_rect().top_left())
            .unwrap_or_default();
        point - self.total_offset(id) - content
    }

    /// Names from the root down to `id`, e.g. `"Window -> Border -> Scroll"`.
    pub fn debug_path(&self, id: RenderObjectId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            let Some(base) = self.base(node) else {
                break;
            };
            names.push(base.name);
            current = base.parent;
        }
        names.reverse();
        names.join(" -> ")
    }

    // =========================================================================
    // Measure / Layout
    // =========================================================================

    /// Measure `id` and record its desired size.
    ///
    /// Idempotent for an unchanged subtree. Never fails: space that does not
    /// fit the requirement is clamped and reported on `trellis::layout`.
    pub fn measure(
        &mut self,
        id: RenderObjectId,
        requirement: &MeasureRequirement,
        preferred: &MeasureSize,
    ) -> Size {
        let Some(base) = self.base(id) else {
            tracing::warn!(target: targets::LAYOUT, ?id, "measure called on a missing render object");
            return Size::ZERO;
        };

        let merged = requirement.merge(&base.custom_requirement);
        let preferred = preferred.override_by(base.preferred_size);
        let mut space = base.total_space().total_size();

        if let Some(max) = merged.max.width.value()
            && space.width > max
        {
            tracing::warn!(target: targets::LAYOUT, path = %self.debug_path(id), space = space.width, max, "margin, border and padding exceed available width");
            space.width = max;
        }
        if let Some(max) = merged.max.height.value()
            && space.height > max
        {
            tracing::warn!(target: targets::LAYOUT, path = %self.debug_path(id), space = space.height, max, "margin, border and padding exceed available height");
            space.height = max;
        }

        let content_requirement = merged.minus(space);
        let content_preferred = content_requirement.coerce_hint(preferred.minus(space));

        if tracing::enabled!(target: targets::LAYOUT, tracing::Level::TRACE) {
            tracing::trace!(target: targets::LAYOUT, path = %self.debug_path(id), requirement = %merged, preferred = %preferred, "measure begin");
        }

        let content = self
            .with_behavior_mut(id, |behavior, tree| {
                let mut cx = LayoutContext::new(tree, id);
                behavior.measure_content(&mut cx, &content_requirement, &content_preferred)
            })
            .unwrap_or_else(|| content_preferred.or_zero())
            .at_least_zero();

        if !content_requirement.satisfy(content) {
            tracing::warn!(target: targets::LAYOUT, path = %self.debug_path(id), requirement = %content_requirement, size = %content, "content size does not satisfy the requirement");
        }

        let desired = content + space;
        if let Some(base) = self.base_mut(id) {
            base.desired_size = desired;
        }

        tracing::trace!(target: targets::LAYOUT, ?id, size = %desired, "measure end");
        desired
    }

    /// Commit `offset` and the last measured size, then lay out content.
    pub fn layout(&mut self, id: RenderObjectId, offset: Point) {
        let Some(base) = self.base_mut(id) else {
            tracing::warn!(target: targets::LAYOUT, ?id, "layout called on a missing render object");
            return;
        };
        base.offset = offset;
        base.size = base.desired_size;
        let size = base.size;

        let raw = Rect::from_origin_size(Point::ZERO, size).shrink(base.total_space());
        if raw.width() < 0.0 || raw.height() < 0.0 {
            tracing::warn!(target: targets::LAYOUT, path = %self.debug_path(id), size = %size, "layout space exceeds size, content clamped to zero");
        }
        let content_rect = raw.clamp_within(size);

        if tracing::enabled!(target: targets::LAYOUT, tracing::Level::TRACE) {
            tracing::trace!(target: targets::LAYOUT, path = %self.debug_path(id), offset = %offset, content = %content_rect, "layout");
        }

        self.with_behavior_mut(id, |behavior, tree| {
            let mut cx = LayoutContext::new(tree, id);
            behavior.layout_content(&mut cx, content_rect);
        });
    }

    /// Call [`RenderObject::after_layout`] on `root` and every descendant.
    pub(crate) fn run_after_layout(&mut self, root: RenderObjectId) {
        for id in self.descendants(root) {
            self.with_behavior_mut(id, |behavior, tree| {
                if let Some(cx) = RenderCx::new(tree, id) {
                    behavior.after_layout(&cx);
                }
            });
        }
    }

    // =========================================================================
    // Draw / Hit test
    // =========================================================================

    /// Draw `id` in its own coordinate space.
    pub fn draw(&self, id: RenderObjectId, painter: &mut dyn Painter) {
        let (Some(behavior), Some(cx)) = (self.behavior(id), RenderCx::new(self, id)) else {
            return;
        };
        behavior.draw(&cx, painter);
    }

    /// Hit test `id` with `point` relative to its lefttop.
    pub fn hit_test(&self, id: RenderObjectId, point: Point) -> Option<RenderObjectId> {
        let behavior = self.behavior(id)?;
        let cx = RenderCx::new(self, id)?;
        behavior.hit_test(&cx, point)
    }
}

impl DebugTree for RenderTree {
    type Id = RenderObjectId;

    fn label(&self, id: RenderObjectId) -> Option<String> {
        self.base(id).map(|b| b.name.to_string())
    }

    fn children(&self, id: RenderObjectId) -> Vec<RenderObjectId> {
        self.base(id).map(|b| b.children.clone()).unwrap_or_default()
    }

    fn detail(&self, id: RenderObjectId) -> Option<String> {
        self.base(id)
            .map(|b| format!("offset={} size={}", b.offset, b.size))
    }
}

impl std::fmt::Debug for RenderTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderTree")
            .field("len", &self.nodes.len())
            .finish()
    }
}

// =============================================================================
// Ui integration
// =============================================================================

impl Ui {
    /// Add a render object to the arena. It starts detached.
    pub fn create_render_object<T: RenderObject>(&mut self, object: T) -> RenderObjectId {
        self.render.insert(Box::new(object))
    }

    /// Add a boxed render object to the arena.
    pub fn create_render_object_boxed(&mut self, object: Box<dyn RenderObject>) -> RenderObjectId {
        self.render.insert(object)
    }

    /// Shared state of a render object.
    pub fn render_base(&self, id: RenderObjectId) -> UiResult<&RenderObjectBase> {
        self.render.base(id).ok_or(UiError::RenderObjectNotFound(id))
    }

    /// Typed access to a render object's behavior.
    pub fn render_object<T: RenderObject>(&self, id: RenderObjectId) -> UiResult<&T> {
        let behavior = self
            .render
            .behavior(id)
            .ok_or(UiError::RenderObjectNotFound(id))?;
        behavior
            .downcast_ref::<T>()
            .ok_or(UiError::WrongRenderObjectType {
                id,
                actual: behavior.name(),
            })
    }

    /// Mutate a render object's behavior with read access to its place in
    /// the tree. The caller decides what to invalidate.
    pub fn update_render_object<T: RenderObject, R>(
        &mut self,
        id: RenderObjectId,
        f: impl FnOnce(&mut T, &RenderCx<'_>) -> R,
    ) -> UiResult<R> {
        let name = self.render_base(id)?.name;
        self.render
            .with_behavior_mut(id, |behavior, tree| {
                let cx = RenderCx::new(tree, id)?;
                let typed = behavior.downcast_mut::<T>()?;
                Some(f(typed, &cx))
            })
            .flatten()
            .ok_or(UiError::WrongRenderObjectType { id, actual: name })
    }

    /// Insert `child` into `parent` at `index`, enforcing cardinality.
    pub fn add_render_child(
        &mut self,
        parent: RenderObjectId,
        child: RenderObjectId,
        index: usize,
    ) -> UiResult<()> {
        self.render.add_child(parent, child, index)?;
        self.invalidate_render_layout(parent);
        Ok(())
    }

    /// Remove and return the child at `index`.
    pub fn remove_render_child(
        &mut self,
        parent: RenderObjectId,
        index: usize,
    ) -> UiResult<RenderObjectId> {
        let child = self.render.remove_child(parent, index)?;
        self.invalidate_render_layout(parent);
        Ok(child)
    }

    /// Destroy a render object that is not owned by a control, together
    /// with its subtree.
    pub fn destroy_render_object(&mut self, id: RenderObjectId) -> UiResult<()> {
        let base = self.render_base(id)?;
        let parent = base.parent;
        if self
            .render
            .descendants(id)
            .iter()
            .any(|&node| self.render.base(node).is_some_and(|b| b.control.is_some()))
        {
            return Err(UiError::RenderObjectOwned(id));
        }
        self.render.remove_subtree(id);
        if let Some(parent) = parent {
            self.invalidate_render_layout(parent);
        }
        Ok(())
    }

    pub fn set_margin(&mut self, id: RenderObjectId, margin: Thickness) -> UiResult<()> {
        self.update_base(id, |base| base.margin = margin)
    }

    pub fn set_padding(&mut self, id: RenderObjectId, padding: Thickness) -> UiResult<()> {
        self.update_base(id, |base| base.padding = padding)
    }

    pub fn set_preferred_size(&mut self, id: RenderObjectId, size: MeasureSize) -> UiResult<()> {
        self.update_base(id, |base| base.preferred_size = size)
    }

    pub fn set_custom_requirement(
        &mut self,
        id: RenderObjectId,
        requirement: MeasureRequirement,
    ) -> UiResult<()> {
        self.update_base(id, |base| base.custom_requirement = requirement)
    }

    pub(crate) fn update_base(
        &mut self,
        id: RenderObjectId,
        f: impl FnOnce(&mut RenderObjectBase),
    ) -> UiResult<()> {
        let base = self
            .render
            .base_mut(id)
            .ok_or(UiError::RenderObjectNotFound(id))?;
        f(base);
        self.invalidate_render_layout(id);
        Ok(())
    }

    /// Schedule a relayout of the host `id` is attached to. No-op when
    /// detached.
    pub fn invalidate_render_layout(&mut self, id: RenderObjectId) {
        if let Some(host) = self.render.base(id).and_then(|b| b.host) {
            self.invalidate_layout(host);
        }
    }

    /// Schedule a repaint of the host `id` is attached to. No-op when
    /// detached.
    pub fn invalidate_render_paint(&mut self, id: RenderObjectId) {
        if let Some(host) = self.render.base(id).and_then(|b| b.host) {
            self.invalidate_paint(host);
        }
    }

    /// Measure a detached subtree, e.g. before attaching it to a host.
    pub fn measure(
        &mut self,
        id: RenderObjectId,
        requirement: &MeasureRequirement,
        preferred: &MeasureSize,
    ) -> Size {
        self.render.measure(id, requirement, preferred)
    }

    /// Lay out a subtree at `offset` using its last measured size.
    pub fn layout(&mut self, id: RenderObjectId, offset: Point) {
        self.render.layout(id, offset);
    }

    /// Render object hit test with `point` relative to `id`'s lefttop.
    pub fn hit_test_render(&self, id: RenderObjectId, point: Point) -> Option<RenderObjectId> {
        self.render.hit_test(id, point)
    }

    /// Draw a subtree.
    pub fn draw(&self, id: RenderObjectId, painter: &mut dyn Painter) {
        self.render.draw(id, painter);
    }
}
