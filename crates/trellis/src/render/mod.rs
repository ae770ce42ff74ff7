//! The render tree.
//!
//! Render objects are the visual half of the UI: they negotiate size with
//! their parent and children, draw through a [`Painter`], and answer hit
//! tests. Every render object is a node in the [`RenderTree`] arena made of
//! a shared [`RenderObjectBase`] (margin, padding, size hints, layout
//! results, tree links) and a behavior implementing [`RenderObject`].
//!
//! # Measure and Layout
//!
//! Layout is two passes:
//!
//! 1. **Measure** ([`RenderTree::measure`]) merges the requirement passed by
//!    the parent with the node's own custom requirement (the tighter bound
//!    wins), lets the node's own preferred size override the passed hint,
//!    subtracts margin, border and padding, and asks the behavior for its
//!    content size via [`RenderObject::measure_content`]. The result plus the
//!    subtracted space is recorded as the desired size.
//! 2. **Layout** ([`RenderTree::layout`]) commits an offset relative to the
//!    parent's lefttop, adopts the desired size, and hands the content rect
//!    to [`RenderObject::layout_content`], which lays out children relative
//!    to the node's own lefttop.
//!
//! Space that does not fit is clamped with a `warn` on the `trellis::layout`
//! target; measurement never fails.
//!
//! # Coordinates
//!
//! A node's coordinate space has its origin at its own lefttop, margin
//! included. Child offsets are in the parent's space, so drawing a child
//! pushes a translation by the child's offset and hit testing a child
//! subtracts it.

mod border;
mod flex;
mod measure;
mod scroll;
mod stack;
mod tree;

use std::any::Any;

use slotmap::new_key_type;
use trellis_render::{Painter, Point, Rect, Size, Thickness, Transform2D};

use crate::control::{ControlEvents, ControlId};
use crate::host::WindowHostId;

pub use border::{BorderRenderObject, BorderStyle};
pub use flex::{FlexChildLayoutData, FlexDirection, FlexLayoutRenderObject, FlexMainAlignment};
pub use measure::{MeasureLength, MeasureRequirement, MeasureSize};
pub use scroll::{
    LINE_SCROLL_STEP, Orientation, ScrollKind, ScrollRenderObject, WHEEL_SCROLL_MULTIPLIER,
};
pub use stack::{Align, Alignment, StackLayoutRenderObject};
pub use tree::RenderTree;

new_key_type! {
    /// Identifies a render object in the [`RenderTree`].
    pub struct RenderObjectId;
}

/// How many children a render object accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildMode {
    /// A leaf.
    None,
    /// At most one child.
    Single,
    /// Any number of children.
    Many,
}

impl ChildMode {
    /// Whether a node with `count` children may take one more.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            ChildMode::None => false,
            ChildMode::Single => count == 0,
            ChildMode::Many => true,
        }
    }
}

/// Behavior of a render object.
///
/// Implementations only compute their own content; margin, border and
/// padding accounting happens in [`RenderTree::measure`] and
/// [`RenderTree::layout`] before these hooks are called.
pub trait RenderObject: Any + 'static {
    /// Type name used in diagnostics and debug paths.
    fn name(&self) -> &'static str;

    /// How many children this object accepts.
    fn child_mode(&self) -> ChildMode;

    /// Space this object draws around its padding, counted by measure and
    /// layout like margin and padding.
    fn border_space(&self) -> Thickness {
        Thickness::ZERO
    }

    /// Measure the content area.
    ///
    /// `requirement` and `preferred` already have margin, border and padding
    /// subtracted. Returning a size that does not satisfy `requirement` is
    /// reported as a layout diagnostic.
    fn measure_content(
        &mut self,
        cx: &mut LayoutContext<'_>,
        requirement: &MeasureRequirement,
        preferred: &MeasureSize,
    ) -> Size;

    /// Lay out children inside `content_rect`, given in this object's own
    /// coordinate space.
    fn layout_content(&mut self, cx: &mut LayoutContext<'_>, content_rect: Rect);

    /// Called on every render object of a window host after each relayout.
    fn after_layout(&mut self, _cx: &RenderCx<'_>) {}

    /// Draw this object and its children in its own coordinate space.
    fn draw(&self, cx: &RenderCx<'_>, painter: &mut dyn Painter) {
        cx.draw_children(painter);
    }

    /// Find the render object at `point`, relative to this object's lefttop.
    ///
    /// Children are tested front to back (reverse insertion order) before the
    /// padding rect of this object.
    fn hit_test(&self, cx: &RenderCx<'_>, point: Point) -> Option<RenderObjectId> {
        cx.hit_test_children(point).or_else(|| {
            cx.padding_rect()
                .contains(point)
                .then(|| cx.id())
        })
    }

    /// A child was inserted at `index`.
    fn on_child_inserted(&mut self, _index: usize) {}

    /// The child at `index` was removed.
    fn on_child_removed(&mut self, _index: usize) {}

    /// This object became part of `control`, whose event slots may be
    /// extended.
    fn on_control_attached(&mut self, _this: RenderObjectId, _control: ControlId, _events: &ControlEvents) {}
}

impl dyn RenderObject {
    /// Downcast to a concrete render object type.
    pub fn downcast_ref<T: RenderObject>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Downcast to a concrete render object type.
    pub fn downcast_mut<T: RenderObject>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}

/// State every render object has, regardless of its behavior.
#[derive(Debug, Clone)]
pub struct RenderObjectBase {
    pub(crate) name: &'static str,
    pub(crate) child_mode: ChildMode,
    pub(crate) margin: Thickness,
    pub(crate) border: Thickness,
    pub(crate) padding: Thickness,
    pub(crate) custom_requirement: MeasureRequirement,
    pub(crate) preferred_size: MeasureSize,
    pub(crate) offset: Point,
    pub(crate) size: Size,
    pub(crate) desired_size: Size,
    pub(crate) parent: Option<RenderObjectId>,
    pub(crate) children: Vec<RenderObjectId>,
    pub(crate) control: Option<ControlId>,
    pub(crate) host: Option<WindowHostId>,
}

impl RenderObjectBase {
    pub(crate) fn new(name: &'static str, child_mode: ChildMode) -> Self {
        Self {
            name,
            child_mode,
            margin: Thickness::ZERO,
            border: Thickness::ZERO,
            padding: Thickness::ZERO,
            custom_requirement: MeasureRequirement::UNSPECIFIED,
            preferred_size: MeasureSize::NOT_SPECIFIED,
            offset: Point::ZERO,
            size: Size::ZERO,
            desired_size: Size::ZERO,
            parent: None,
            children: Vec::new(),
            control: None,
            host: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn child_mode(&self) -> ChildMode {
        self.child_mode
    }

    pub fn margin(&self) -> Thickness {
        self.margin
    }

    /// Border thickness taken into account by measure and layout. Zero
    /// unless the behavior draws an enabled border.
    pub fn border(&self) -> Thickness {
        self.border
    }

    pub fn padding(&self) -> Thickness {
        self.padding
    }

    pub fn custom_requirement(&self) -> MeasureRequirement {
        self.custom_requirement
    }

    pub fn preferred_size(&self) -> MeasureSize {
        self.preferred_size
    }

    /// Offset from the parent's lefttop, set by the last layout.
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Size committed by the last layout.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Size computed by the last measure.
    pub fn desired_size(&self) -> Size {
        self.desired_size
    }

    pub fn parent(&self) -> Option<RenderObjectId> {
        self.parent
    }

    pub fn children(&self) -> &[RenderObjectId] {
        &self.children
    }

    /// The control owning this render object.
    pub fn control(&self) -> Option<ControlId> {
        self.control
    }

    /// The window host this render object is attached to.
    pub fn host(&self) -> Option<WindowHostId> {
        self.host
    }

    /// Margin, border and padding combined.
    pub fn total_space(&self) -> Thickness {
        self.margin + self.border + self.padding
    }

    /// Rect inside margin and border, clamped to the current size.
    pub fn padding_rect(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.size)
            .shrink(self.margin + self.border)
            .clamp_within(self.size)
    }

    /// Rect inside margin, border and padding, clamped to the current size.
    pub fn content_rect(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.size)
            .shrink(self.total_space())
            .clamp_within(self.size)
    }
}

/// A node of the [`RenderTree`].
pub(crate) struct RenderNode {
    pub(crate) base: RenderObjectBase,
    /// Taken out while the behavior runs a mutable hook.
    pub(crate) behavior: Option<Box<dyn RenderObject>>,
}

// =============================================================================
// Contexts
// =============================================================================

/// Read-only view of the tree from one render object, used while drawing,
/// hit testing and in `after_layout`.
pub struct RenderCx<'a> {
    tree: &'a RenderTree,
    id: RenderObjectId,
    base: &'a RenderObjectBase,
}

impl<'a> RenderCx<'a> {
    pub(crate) fn new(tree: &'a RenderTree, id: RenderObjectId) -> Option<Self> {
        let base = tree.base(id)?;
        Some(Self { tree, id, base })
    }

    /// The render object this context belongs to.
    pub fn id(&self) -> RenderObjectId {
        self.id
    }

    pub fn base(&self) -> &'a RenderObjectBase {
        self.base
    }

    pub fn tree(&self) -> &'a RenderTree {
        self.tree
    }

    pub fn children(&self) -> &'a [RenderObjectId] {
        &self.base.children
    }

    pub fn first_child(&self) -> Option<RenderObjectId> {
        self.base.children.first().copied()
    }

    pub fn child_base(&self, child: RenderObjectId) -> Option<&'a RenderObjectBase> {
        self.tree.base(child)
    }

    pub fn size(&self) -> Size {
        self.base.size
    }

    pub fn padding_rect(&self) -> Rect {
        self.base.padding_rect()
    }

    pub fn content_rect(&self) -> Rect {
        self.base.content_rect()
    }

    /// Draw `child` translated by its layout offset.
    pub fn draw_child(&self, child: RenderObjectId, painter: &mut dyn Painter) {
        let Some(offset) = self.tree.base(child).map(|b| b.offset) else {
            return;
        };
        painter.push_transform(Transform2D::translate_by(offset));
        self.tree.draw(child, painter);
        painter.pop_transform();
    }

    /// Draw every child in insertion order.
    pub fn draw_children(&self, painter: &mut dyn Painter) {
        for &child in self.children() {
            self.draw_child(child, painter);
        }
    }

    /// Hit test `child` with `point` in this object's space.
    pub fn hit_test_child(&self, child: RenderObjectId, point: Point) -> Option<RenderObjectId> {
        let offset = self.tree.base(child)?.offset;
        self.tree.hit_test(child, point - offset)
    }

    /// Hit test children front to back.
    pub fn hit_test_children(&self, point: Point) -> Option<RenderObjectId> {
        self.children()
            .iter()
            .rev()
            .find_map(|&child| self.hit_test_child(child, point))
    }
}

/// Mutable view of the tree from one render object, used while measuring and
/// laying out. The object's own behavior is not reachable through it.
pub struct LayoutContext<'a> {
    tree: &'a mut RenderTree,
    id: RenderObjectId,
}

impl<'a> LayoutContext<'a> {
    pub(crate) fn new(tree: &'a mut RenderTree, id: RenderObjectId) -> Self {
        Self { tree, id }
    }

    pub fn id(&self) -> RenderObjectId {
        self.id
    }

    /// Children of the object being measured or laid out.
    pub fn children(&self) -> Vec<RenderObjectId> {
        self.tree
            .base(self.id)
            .map(|b| b.children.clone())
            .unwrap_or_default()
    }

    pub fn first_child(&self) -> Option<RenderObjectId> {
        self.tree.base(self.id)?.children.first().copied()
    }

    /// Base of the object being measured or laid out.
    pub fn base(&self) -> Option<&RenderObjectBase> {
        self.tree.base(self.id)
    }

    pub fn child_base(&self, child: RenderObjectId) -> Option<&RenderObjectBase> {
        self.tree.base(child)
    }

    /// Measure a child. See [`RenderTree::measure`].
    pub fn measure(
        &mut self,
        child: RenderObjectId,
        requirement: &MeasureRequirement,
        preferred: &MeasureSize,
    ) -> Size {
        self.tree.measure(child, requirement, preferred)
    }

    /// Lay out a child at `offset` in this object's space.
    pub fn layout(&mut self, child: RenderObjectId, offset: Point) {
        self.tree.layout(child, offset);
    }

    /// The child's size from its last measure.
    pub fn desired_size(&self, child: RenderObjectId) -> Size {
        self.tree
            .base(child)
            .map(|b| b.desired_size)
            .unwrap_or_default()
    }
}
