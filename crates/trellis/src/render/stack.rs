//! Overlay layout: every child occupies the same content area.

use trellis_render::{Point, Rect, Size};

use super::{
    ChildMode, LayoutContext, MeasureRequirement, MeasureSize, RenderObject, RenderObjectId,
};
use crate::error::UiResult;
use crate::ui::Ui;

/// Placement of a child along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
    /// Fill the axis; the child is re-measured with an exact requirement.
    Stretch,
}

impl Align {
    /// Offset of a child of length `child` inside `[start, start + available)`.
    pub fn place(self, start: f32, available: f32, child: f32) -> f32 {
        match self {
            Align::Start | Align::Stretch => start,
            Align::Center => start + (available - child) / 2.0,
            Align::End => start + available - child,
        }
    }
}

/// Per-axis alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Alignment {
    pub horizontal: Align,
    pub vertical: Align,
}

impl Alignment {
    pub const fn new(horizontal: Align, vertical: Align) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// The same alignment on both axes.
    pub const fn uniform(align: Align) -> Self {
        Self::new(align, align)
    }
}

/// Stacks children on top of each other, each aligned inside the content
/// rect. With no children it measures to its preferred size, which makes it
/// a usable sized leaf.
#[derive(Debug, Default)]
pub struct StackLayoutRenderObject {
    default_alignment: Alignment,
    child_alignments: Vec<Option<Alignment>>,
}

impl StackLayoutRenderObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_alignment(alignment: Alignment) -> Self {
        Self {
            default_alignment: alignment,
            child_alignments: Vec::new(),
        }
    }

    pub fn default_alignment(&self) -> Alignment {
        self.default_alignment
    }

    pub fn set_default_alignment(&mut self, alignment: Alignment) {
        self.default_alignment = alignment;
    }

    /// Override the alignment of the child at `index`. `None` falls back to
    /// the default alignment.
    pub fn set_child_alignment(&mut self, index: usize, alignment: Option<Alignment>) {
        if let Some(slot) = self.child_alignments.get_mut(index) {
            *slot = alignment;
        }
    }

    /// Effective alignment of the child at `index`.
    pub fn child_alignment(&self, index: usize) -> Alignment {
        self.child_alignments
            .get(index)
            .copied()
            .flatten()
            .unwrap_or(self.default_alignment)
    }
}

impl RenderObject for StackLayoutRenderObject {
    fn name(&self) -> &'static str {
        "StackLayoutRenderObject"
    }

    fn child_mode(&self) -> ChildMode {
        ChildMode::Many
    }

    fn measure_content(
        &mut self,
        cx: &mut LayoutContext<'_>,
        requirement: &MeasureRequirement,
        preferred: &MeasureSize,
    ) -> Size {
        let children = cx.children();
        let child_requirement = MeasureRequirement::with_max(requirement.max);

        let mut size = preferred.or_zero();
        for &child in &children {
            let child_size = cx.measure(child, &child_requirement, &MeasureSize::NOT_SPECIFIED);
            size = size.max(child_size);
        }
        let size = requirement.coerce(size);

        for (index, &child) in children.iter().enumerate() {
            let alignment = self.child_alignment(index);
            let stretch_h = alignment.horizontal == Align::Stretch;
            let stretch_v = alignment.vertical == Align::Stretch;
            if !stretch_h && !stretch_v {
                continue;
            }
            let mut stretched = child_requirement;
            if stretch_h {
                stretched.max.width = size.width.into();
                stretched.min.width = size.width.into();
            }
            if stretch_v {
                stretched.max.height = size.height.into();
                stretched.min.height = size.height.into();
            }
            cx.measure(child, &stretched, &MeasureSize::NOT_SPECIFIED);
        }

        size
    }

    fn layout_content(&mut self, cx: &mut LayoutContext<'_>, content_rect: Rect) {
        for (index, child) in cx.children().into_iter().enumerate() {
            let alignment = self.child_alignment(index);
            let child_size = cx.desired_size(child);
            let offset = Point::new(
                alignment
                    .horizontal
                    .place(content_rect.left(), content_rect.width(), child_size.width),
                alignment
                    .vertical
                    .place(content_rect.top(), content_rect.height(), child_size.height),
            );
            cx.layout(child, offset);
        }
    }

    fn on_child_inserted(&mut self, index: usize) {
        let index = index.min(self.child_alignments.len());
        self.child_alignments.insert(index, None);
    }

    fn on_child_removed(&mut self, index: usize) {
        if index < self.child_alignments.len() {
            self.child_alignments.remove(index);
        }
    }
}

// =============================================================================
// Ui integration
// =============================================================================

impl Ui {
    pub fn set_stack_default_alignment(
        &mut self,
        id: RenderObjectId,
        alignment: Alignment,
    ) -> UiResult<()> {
        self.update_render_object::<StackLayoutRenderObject, _>(id, |stack, _| {
            stack.set_default_alignment(alignment)
        })?;
        self.invalidate_render_layout(id);
        Ok(())
    }

    /// Override the alignment of the child at `index` of the stack `id`.
    pub fn set_stack_child_alignment(
        &mut self,
        id: RenderObjectId,
        index: usize,
        alignment: Option<Alignment>,
    ) -> UiResult<()> {
        self.update_render_object::<StackLayoutRenderObject, _>(id, |stack, _| {
            stack.set_child_alignment(index, alignment)
        })?;
        self.invalidate_render_layout(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderTree;

    fn sized(tree: &mut RenderTree, w: f32, h: f32) -> crate::render::RenderObjectId {
        let id = tree.insert(Box::new(StackLayoutRenderObject::new()));
        tree.base_mut(id).unwrap().preferred_size = MeasureSize::new(w, h);
        id
    }

    #[test]
    fn test_align_place() {
        assert_eq!(Align::Start.place(10.0, 100.0, 20.0), 10.0);
        assert_eq!(Align::Center.place(10.0, 100.0, 20.0), 50.0);
        assert_eq!(Align::End.place(10.0, 100.0, 20.0), 90.0);
        assert_eq!(Align::Stretch.place(10.0, 100.0, 20.0), 10.0);
    }

    #[test]
    fn test_measures_to_largest_child() {
        let mut tree = RenderTree::new();
        let stack = tree.insert(Box::new(StackLayoutRenderObject::new()));
        let a = sized(&mut tree, 30.0, 10.0);
        let b = sized(&mut tree, 10.0, 40.0);
        tree.add_child(stack, a, 0).unwrap();
        tree.add_child(stack, b, 1).unwrap();

        let size = tree.measure(stack, &MeasureRequirement::UNSPECIFIED, &MeasureSize::NOT_SPECIFIED);
        assert_eq!(size, Size::new(30.0, 40.0));
    }

    #[test]
    fn test_child_alignment_and_stretch() {
        let mut tree = RenderTree::new();
        let stack = tree.insert(Box::new(StackLayoutRenderObject::with_default_alignment(
            Alignment::uniform(Align::Center),
        )));
        let a = sized(&mut tree, 20.0, 20.0);
        let b = tree.insert(Box::new(StackLayoutRenderObject::new()));
        tree.add_child(stack, a, 0).unwrap();
        tree.add_child(stack, b, 1).unwrap();
        tree.with_behavior_mut(stack, |behavior, _| {
            if let Some(stack) = behavior.downcast_mut::<StackLayoutRenderObject>() {
                stack.set_child_alignment(1, Some(Alignment::new(Align::Stretch, Align::End)));
            }
        });

        tree.measure(stack, &MeasureRequirement::exact(Size::new(100.0, 60.0)), &MeasureSize::NOT_SPECIFIED);
        tree.layout(stack, Point::ZERO);

        assert_eq!(tree.base(a).unwrap().offset(), Point::new(40.0, 20.0));
        let b_base = tree.base(b).unwrap();
        assert_eq!(b_base.size(), Size::new(100.0, 0.0));
        assert_eq!(b_base.offset(), Point::new(0.0, 60.0));
    }

    #[test]
    fn test_alignment_slots_follow_children() {
        let mut stack = StackLayoutRenderObject::new();
        stack.on_child_inserted(0);
        stack.on_child_inserted(1);
        stack.set_child_alignment(1, Some(Alignment::uniform(Align::End)));
        stack.on_child_inserted(0);
        assert_eq!(stack.child_alignment(2), Alignment::uniform(Align::End));

        stack.on_child_removed(0);
        assert_eq!(stack.child_alignment(1), Alignment::uniform(Align::End));
        assert_eq!(stack.child_alignment(0), Alignment::default());
    }
}
