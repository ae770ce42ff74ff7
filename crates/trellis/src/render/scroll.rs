//! A single-child viewport that scrolls its content.
//!
//! The child is measured without constraints so it can be larger than the
//! viewport. The requested offset is stored as given (NaN becomes zero) and
//! clamped to `[0, max(0, child - viewport)]` per axis whenever it is read or
//! used for layout. A request made before the child grows therefore takes
//! effect at the next layout.

use trellis_core::logging::targets;
use trellis_render::{Color, Painter, Point, Rect, Size, Thickness};

use super::{
    ChildMode, LayoutContext, MeasureRequirement, MeasureSize, RenderCx, RenderObject,
    RenderObjectId,
};
use crate::control::{ControlEvents, ControlId, EventArgs, MouseWheelEventArgs};
use crate::error::{UiError, UiResult};
use crate::ui::Ui;

/// Distance scrolled by one [`ScrollKind::Line`] unit.
pub const LINE_SCROLL_STEP: f32 = 16.0;

/// Distance scrolled by one wheel notch.
pub const WHEEL_SCROLL_MULTIPLIER: f32 = 24.0;

const SCROLL_BAR_THICKNESS: f32 = 4.0;
const SCROLL_BAR_COLOR: Color = Color::new(0.5, 0.5, 0.5, 0.6);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// How the value passed to [`ScrollRenderObject::apply_scroll`] is
/// interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollKind {
    /// The new offset.
    Absolute,
    /// A delta added to the current offset.
    Relative,
    /// A number of viewport sizes.
    Page,
    /// A number of [`LINE_SCROLL_STEP`]s.
    Line,
}

fn axis(point: Point, orientation: Orientation) -> f32 {
    match orientation {
        Orientation::Horizontal => point.x,
        Orientation::Vertical => point.y,
    }
}

fn axis_len(size: Size, orientation: Orientation) -> f32 {
    match orientation {
        Orientation::Horizontal => size.width,
        Orientation::Vertical => size.height,
    }
}

fn max_offset(child: Size, view: Size) -> Point {
    Point::new(
        (child.width - view.width).max(0.0),
        (child.height - view.height).max(0.0),
    )
}

/// NaN never reaches the stored offset; infinities clamp like any value.
fn sanitize(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value }
}

fn clamp_offset(offset: Point, child: Size, view: Size) -> Point {
    let max = max_offset(child, view);
    Point::new(
        sanitize(offset.x).clamp(0.0, max.x),
        sanitize(offset.y).clamp(0.0, max.y),
    )
}

/// Scroll render object. See the module docs.
#[derive(Debug)]
pub struct ScrollRenderObject {
    scroll_offset: Point,
    mouse_wheel_enabled: bool,
    scroll_bar_visible: bool,
}

impl Default for ScrollRenderObject {
    fn default() -> Self {
        Self {
            scroll_offset: Point::ZERO,
            mouse_wheel_enabled: true,
            scroll_bar_visible: true,
        }
    }
}

impl ScrollRenderObject {
    pub fn new() -> Self {
        Self::default()
    }

    fn child_size(cx: &RenderCx<'_>) -> Size {
        cx.first_child()
            .and_then(|child| cx.child_base(child))
            .map(|base| base.desired_size())
            .unwrap_or_default()
    }

    fn view_size(cx: &RenderCx<'_>) -> Size {
        cx.content_rect().size
    }

    /// The offset the stored value is clamped to.
    pub fn scroll_offset(&self, cx: &RenderCx<'_>) -> Point {
        clamp_offset(self.scroll_offset, Self::child_size(cx), Self::view_size(cx))
    }

    /// Largest reachable offset per axis.
    pub fn max_scroll_offset(&self, cx: &RenderCx<'_>) -> Point {
        max_offset(Self::child_size(cx), Self::view_size(cx))
    }

    /// The offset as last requested, before clamping.
    pub fn requested_scroll_offset(&self) -> Point {
        self.scroll_offset
    }

    /// Store the requested offset. Returns whether the effective offset
    /// changed against the current sizes.
    pub fn set_scroll_offset(&mut self, cx: &RenderCx<'_>, offset: Point) -> bool {
        let before = self.scroll_offset(cx);
        self.scroll_offset = Point::new(sanitize(offset.x), sanitize(offset.y));
        let changed = self.scroll_offset(cx) != before;
        tracing::trace!(target: targets::RENDER, requested = ?self.scroll_offset, changed, "scroll offset set");
        changed
    }

    /// Set either axis, leaving the request for `None` axes unchanged.
    pub fn set_scroll_offset_axes(
        &mut self,
        cx: &RenderCx<'_>,
        x: Option<f32>,
        y: Option<f32>,
    ) -> bool {
        let requested = self.scroll_offset;
        let target = Point::new(x.unwrap_or(requested.x), y.unwrap_or(requested.y));
        self.set_scroll_offset(cx, target)
    }

    /// The part of the child's space currently visible.
    pub fn view_rect(&self, cx: &RenderCx<'_>) -> Rect {
        Rect::from_origin_size(self.scroll_offset(cx), Self::view_size(cx))
    }

    /// Scroll one axis. Returns whether the offset changed.
    pub fn apply_scroll(
        &mut self,
        cx: &RenderCx<'_>,
        orientation: Orientation,
        kind: ScrollKind,
        value: f32,
    ) -> bool {
        let current = axis(self.scroll_offset(cx), orientation);
        let target = match kind {
            ScrollKind::Absolute => value,
            ScrollKind::Relative => current + value,
            ScrollKind::Page => current + value * axis_len(Self::view_size(cx), orientation),
            ScrollKind::Line => current + value * LINE_SCROLL_STEP,
        };
        match orientation {
            Orientation::Horizontal => self.set_scroll_offset_axes(cx, Some(target), None),
            Orientation::Vertical => self.set_scroll_offset_axes(cx, None, Some(target)),
        }
    }

    /// Scroll the minimum distance that brings `rect`, in the child's space
    /// and grown by `margin`, into view. When `rect` is larger than the
    /// viewport its start edge wins.
    pub fn scroll_to_contain(&mut self, cx: &RenderCx<'_>, rect: Rect, margin: Thickness) -> bool {
        let target = rect.expand(margin);
        let view = self.view_rect(cx);

        let fit = |start: f32, end: f32, view_start: f32, view_end: f32| {
            if start < view_start || end - start > view_end - view_start {
                start
            } else if end > view_end {
                view_start + (end - view_end)
            } else {
                view_start
            }
        };
        let x = fit(target.left(), target.right(), view.left(), view.right());
        let y = fit(target.top(), target.bottom(), view.top(), view.bottom());
        self.set_scroll_offset(cx, Point::new(x, y))
    }

    /// Whether the offset can decrease on `orientation`.
    pub fn can_scroll_up(&self, cx: &RenderCx<'_>, orientation: Orientation) -> bool {
        axis(self.scroll_offset(cx), orientation) > 0.0
    }

    /// Whether the offset can increase on `orientation`.
    pub fn can_scroll_down(&self, cx: &RenderCx<'_>, orientation: Orientation) -> bool {
        axis(self.scroll_offset(cx), orientation) < axis(self.max_scroll_offset(cx), orientation)
    }

    pub fn is_mouse_wheel_enabled(&self) -> bool {
        self.mouse_wheel_enabled
    }

    pub fn set_mouse_wheel_enabled(&mut self, enabled: bool) {
        self.mouse_wheel_enabled = enabled;
    }

    pub fn is_scroll_bar_visible(&self) -> bool {
        self.scroll_bar_visible
    }

    pub fn set_scroll_bar_visible(&mut self, visible: bool) {
        self.scroll_bar_visible = visible;
    }

    fn draw_scroll_bars(&self, cx: &RenderCx<'_>, painter: &mut dyn Painter) {
        let child = Self::child_size(cx);
        let content = cx.content_rect();
        let view = content.size;
        let offset = self.scroll_offset(cx);

        if child.height > view.height && view.height > 0.0 {
            let length = view.height * view.height / child.height;
            let top = content.top() + offset.y * view.height / child.height;
            let thumb = Rect::new(
                content.right() - SCROLL_BAR_THICKNESS,
                top,
                SCROLL_BAR_THICKNESS,
                length,
            );
            painter.fill_rect(thumb, SCROLL_BAR_COLOR);
        }
        if child.width > view.width && view.width > 0.0 {
            let length = view.width * view.width / child.width;
            let left = content.left() + offset.x * view.width / child.width;
            let thumb = Rect::new(
                left,
                content.bottom() - SCROLL_BAR_THICKNESS,
                length,
                SCROLL_BAR_THICKNESS,
            );
            painter.fill_rect(thumb, SCROLL_BAR_COLOR);
        }
    }
}

impl RenderObject for ScrollRenderObject {
    fn name(&self) -> &'static str {
        "ScrollRenderObject"
    }

    fn child_mode(&self) -> ChildMode {
        ChildMode::Single
    }

    fn measure_content(
        &mut self,
        cx: &mut LayoutContext<'_>,
        requirement: &MeasureRequirement,
        preferred: &MeasureSize,
    ) -> Size {
        let Some(child) = cx.first_child() else {
            return requirement.coerce(preferred.or_zero());
        };
        let child_size = cx.measure(
            child,
            &MeasureRequirement::UNSPECIFIED,
            &MeasureSize::NOT_SPECIFIED,
        );
        let mut size = requirement.coerce(child_size);
        if let Some(width) = preferred.width.value() {
            size.width = width;
        }
        if let Some(height) = preferred.height.value() {
            size.height = height;
        }
        size
    }

    fn layout_content(&mut self, cx: &mut LayoutContext<'_>, content_rect: Rect) {
        let Some(child) = cx.first_child() else {
            return;
        };
        let offset = clamp_offset(self.scroll_offset, cx.desired_size(child), content_rect.size);
        cx.layout(child, content_rect.top_left() - offset);
    }

    fn draw(&self, cx: &RenderCx<'_>, painter: &mut dyn Painter) {
        painter.push_clip(cx.content_rect());
        cx.draw_children(painter);
        painter.pop_clip();
        if self.scroll_bar_visible {
            self.draw_scroll_bars(cx, painter);
        }
    }

    fn hit_test(&self, cx: &RenderCx<'_>, point: Point) -> Option<RenderObjectId> {
        if cx.content_rect().contains(point)
            && let Some(hit) = cx.hit_test_children(point)
        {
            return Some(hit);
        }
        cx.padding_rect().contains(point).then(|| cx.id())
    }

    fn on_control_attached(&mut self, this: RenderObjectId, control: ControlId, events: &ControlEvents) {
        tracing::trace!(target: targets::RENDER, ?this, ?control, "scroll wheel handler installed");
        events
            .mouse_wheel
            .bubble
            .prepend_handler(move |ui, args| ui.handle_scroll_wheel(this, args));
    }
}

// =============================================================================
// Ui integration
// =============================================================================

impl Ui {
    fn with_scroll<R>(
        &self,
        id: RenderObjectId,
        f: impl FnOnce(&ScrollRenderObject, &RenderCx<'_>) -> R,
    ) -> UiResult<R> {
        let scroll = self.render_object::<ScrollRenderObject>(id)?;
        let cx = RenderCx::new(&self.render, id).ok_or(UiError::RenderObjectNotFound(id))?;
        Ok(f(scroll, &cx))
    }

    /// Every offset request relayouts: the effective offset depends on sizes
    /// the next layout may change.
    fn update_scroll(
        &mut self,
        id: RenderObjectId,
        f: impl FnOnce(&mut ScrollRenderObject, &RenderCx<'_>) -> bool,
    ) -> UiResult<bool> {
        let changed = self.update_render_object::<ScrollRenderObject, _>(id, f)?;
        self.invalidate_render_layout(id);
        Ok(changed)
    }

    pub fn scroll_offset(&self, id: RenderObjectId) -> UiResult<Point> {
        self.with_scroll(id, |scroll, cx| scroll.scroll_offset(cx))
    }

    pub fn scroll_view_rect(&self, id: RenderObjectId) -> UiResult<Rect> {
        self.with_scroll(id, |scroll, cx| scroll.view_rect(cx))
    }

    /// Request a scroll offset. Returns whether the effective offset changed
    /// against the current layout.
    pub fn set_scroll_offset(&mut self, id: RenderObjectId, offset: Point) -> UiResult<bool> {
        self.update_scroll(id, |scroll, cx| scroll.set_scroll_offset(cx, offset))
    }

    pub fn set_scroll_offset_axes(
        &mut self,
        id: RenderObjectId,
        x: Option<f32>,
        y: Option<f32>,
    ) -> UiResult<bool> {
        self.update_scroll(id, |scroll, cx| scroll.set_scroll_offset_axes(cx, x, y))
    }

    pub fn apply_scroll(
        &mut self,
        id: RenderObjectId,
        orientation: Orientation,
        kind: ScrollKind,
        value: f32,
    ) -> UiResult<bool> {
        self.update_scroll(id, |scroll, cx| scroll.apply_scroll(cx, orientation, kind, value))
    }

    pub fn scroll_to_contain(
        &mut self,
        id: RenderObjectId,
        rect: Rect,
        margin: Thickness,
    ) -> UiResult<bool> {
        self.update_scroll(id, |scroll, cx| scroll.scroll_to_contain(cx, rect, margin))
    }

    pub fn can_scroll_up(&self, id: RenderObjectId, orientation: Orientation) -> UiResult<bool> {
        self.with_scroll(id, |scroll, cx| scroll.can_scroll_up(cx, orientation))
    }

    pub fn can_scroll_down(&self, id: RenderObjectId, orientation: Orientation) -> UiResult<bool> {
        self.with_scroll(id, |scroll, cx| scroll.can_scroll_down(cx, orientation))
    }

    pub fn set_mouse_wheel_enabled(&mut self, id: RenderObjectId, enabled: bool) -> UiResult<()> {
        self.update_render_object::<ScrollRenderObject, _>(id, |scroll, _| {
            scroll.set_mouse_wheel_enabled(enabled)
        })
    }

    /// Bubble handler installed on the owning control's wheel event.
    ///
    /// Scrolling forward prefers the vertical axis and falls back to the
    /// horizontal one; the event is marked handled only when something
    /// scrolled.
    pub(crate) fn handle_scroll_wheel(&mut self, id: RenderObjectId, args: &mut MouseWheelEventArgs) {
        let Ok(true) = self.with_scroll(id, |scroll, _| scroll.is_mouse_wheel_enabled()) else {
            return;
        };
        let delta = args.delta * WHEEL_SCROLL_MULTIPLIER;
        let axis = if delta > 0.0 {
            [Orientation::Vertical, Orientation::Horizontal]
                .into_iter()
                .find(|&o| self.can_scroll_down(id, o).unwrap_or(false))
        } else if delta < 0.0 {
            [Orientation::Vertical, Orientation::Horizontal]
                .into_iter()
                .find(|&o| self.can_scroll_up(id, o).unwrap_or(false))
        } else {
            None
        };
        let Some(orientation) = axis else {
            return;
        };
        if let Ok(true) = self.apply_scroll(id, orientation, ScrollKind::Relative, delta) {
            args.set_handled();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RenderTree, StackLayoutRenderObject};

    /// Scroll view of `view` showing a stack child of `content`, laid out.
    fn scroll_tree(view: Size, content: Size) -> (RenderTree, RenderObjectId, RenderObjectId) {
        let mut tree = RenderTree::new();
        let scroll = tree.insert(Box::new(ScrollRenderObject::new()));
        let child = tree.insert(Box::new(StackLayoutRenderObject::new()));
        tree.base_mut(child).unwrap().preferred_size = content.into();
        tree.add_child(scroll, child, 0).unwrap();
        tree.measure(scroll, &MeasureRequirement::exact(view), &MeasureSize::NOT_SPECIFIED);
        tree.layout(scroll, Point::ZERO);
        (tree, scroll, child)
    }

    fn update<R>(
        tree: &mut RenderTree,
        id: RenderObjectId,
        f: impl FnOnce(&mut ScrollRenderObject, &RenderCx<'_>) -> R,
    ) -> R {
        tree.with_behavior_mut(id, |behavior, tree| {
            let cx = RenderCx::new(tree, id).unwrap();
            f(behavior.downcast_mut::<ScrollRenderObject>().unwrap(), &cx)
        })
        .unwrap()
    }

    #[test]
    fn test_offset_is_clamped() {
        let (mut tree, scroll, _) = scroll_tree(Size::new(100.0, 100.0), Size::new(100.0, 300.0));
        assert!(update(&mut tree, scroll, |s, cx| s.set_scroll_offset(cx, Point::new(50.0, 500.0))));
        let offset = update(&mut tree, scroll, |s, cx| s.scroll_offset(cx));
        assert_eq!(offset, Point::new(0.0, 200.0));

        // Setting the same effective offset again is not a change.
        assert!(!update(&mut tree, scroll, |s, cx| s.set_scroll_offset(cx, Point::new(0.0, 900.0))));
        assert!(!update(&mut tree, scroll, |s, cx| s.set_scroll_offset(cx, Point::new(-5.0, 200.0))));
    }

    #[test]
    fn test_layout_moves_child() {
        let (mut tree, scroll, child) = scroll_tree(Size::new(100.0, 100.0), Size::new(100.0, 300.0));
        update(&mut tree, scroll, |s, cx| s.set_scroll_offset(cx, Point::new(0.0, 40.0)));
        tree.layout(scroll, Point::ZERO);
        assert_eq!(tree.base(child).unwrap().offset(), Point::new(0.0, -40.0));
    }

    #[test]
    fn test_apply_scroll_kinds() {
        let (mut tree, scroll, _) = scroll_tree(Size::new(100.0, 100.0), Size::new(100.0, 1000.0));
        update(&mut tree, scroll, |s, cx| {
            s.apply_scroll(cx, Orientation::Vertical, ScrollKind::Line, 2.0)
        });
        assert_eq!(update(&mut tree, scroll, |s, cx| s.scroll_offset(cx)).y, 32.0);

        update(&mut tree, scroll, |s, cx| {
            s.apply_scroll(cx, Orientation::Vertical, ScrollKind::Page, 1.0)
        });
        assert_eq!(update(&mut tree, scroll, |s, cx| s.scroll_offset(cx)).y, 132.0);

        update(&mut tree, scroll, |s, cx| {
            s.apply_scroll(cx, Orientation::Vertical, ScrollKind::Relative, -100.0)
        });
        assert_eq!(update(&mut tree, scroll, |s, cx| s.scroll_offset(cx)).y, 32.0);

        update(&mut tree, scroll, |s, cx| {
            s.apply_scroll(cx, Orientation::Vertical, ScrollKind::Absolute, 5000.0)
        });
        assert_eq!(update(&mut tree, scroll, |s, cx| s.scroll_offset(cx)).y, 900.0);

        // Nothing to scroll horizontally.
        assert!(!update(&mut tree, scroll, |s, cx| {
            s.apply_scroll(cx, Orientation::Horizontal, ScrollKind::Relative, 10.0)
        }));
    }

    #[test]
    fn test_scroll_to_contain() {
        let (mut tree, scroll, _) = scroll_tree(Size::new(100.0, 100.0), Size::new(100.0, 1000.0));
        update(&mut tree, scroll, |s, cx| {
            s.scroll_to_contain(cx, Rect::new(0.0, 250.0, 10.0, 20.0), Thickness::ZERO)
        });
        assert_eq!(update(&mut tree, scroll, |s, cx| s.scroll_offset(cx)).y, 170.0);

        // Already visible: no change.
        assert!(!update(&mut tree, scroll, |s, cx| {
            s.scroll_to_contain(cx, Rect::new(0.0, 200.0, 10.0, 20.0), Thickness::ZERO)
        }));

        // Above the view: align the top edge, margin included.
        update(&mut tree, scroll, |s, cx| {
            s.scroll_to_contain(cx, Rect::new(0.0, 50.0, 10.0, 20.0), Thickness::uniform(5.0))
        });
        assert_eq!(update(&mut tree, scroll, |s, cx| s.scroll_offset(cx)).y, 45.0);
    }

    #[test]
    fn test_shrinking_child_clamps_on_read() {
        let (mut tree, scroll, child) = scroll_tree(Size::new(100.0, 100.0), Size::new(100.0, 300.0));
        update(&mut tree, scroll, |s, cx| s.set_scroll_offset(cx, Point::new(0.0, 200.0)));

        tree.base_mut(child).unwrap().preferred_size = Size::new(100.0, 150.0).into();
        tree.measure(scroll, &MeasureRequirement::exact(Size::new(100.0, 100.0)), &MeasureSize::NOT_SPECIFIED);
        tree.layout(scroll, Point::ZERO);

        assert_eq!(update(&mut tree, scroll, |s, cx| s.scroll_offset(cx)).y, 50.0);
        assert_eq!(tree.base(child).unwrap().offset(), Point::new(0.0, -50.0));
    }

    #[test]
    fn test_request_survives_child_growth() {
        let (mut tree, scroll, child) = scroll_tree(Size::new(100.0, 100.0), Size::new(100.0, 100.0));
        update(&mut tree, scroll, |s, cx| s.set_scroll_offset(cx, Point::new(0.0, 500.0)));
        assert_eq!(update(&mut tree, scroll, |s, cx| s.scroll_offset(cx)), Point::ZERO);

        tree.base_mut(child).unwrap().preferred_size = Size::new(100.0, 1000.0).into();
        tree.measure(scroll, &MeasureRequirement::exact(Size::new(100.0, 100.0)), &MeasureSize::NOT_SPECIFIED);
        tree.layout(scroll, Point::ZERO);

        assert_eq!(update(&mut tree, scroll, |s, cx| s.scroll_offset(cx)).y, 500.0);
        assert_eq!(tree.base(child).unwrap().offset(), Point::new(0.0, -500.0));
    }

    #[test]
    fn test_non_finite_offsets_stay_in_range() {
        let (mut tree, scroll, child) = scroll_tree(Size::new(100.0, 100.0), Size::new(300.0, 300.0));
        update(&mut tree, scroll, |s, cx| s.set_scroll_offset(cx, Point::new(f32::NAN, 50.0)));
        assert_eq!(update(&mut tree, scroll, |s, cx| s.scroll_offset(cx)), Point::new(0.0, 50.0));
        assert_eq!(update(&mut tree, scroll, |s, _| s.requested_scroll_offset()).x, 0.0);

        update(&mut tree, scroll, |s, cx| {
            s.set_scroll_offset(cx, Point::new(f32::INFINITY, f32::NEG_INFINITY))
        });
        assert_eq!(update(&mut tree, scroll, |s, cx| s.scroll_offset(cx)), Point::new(200.0, 0.0));

        update(&mut tree, scroll, |s, cx| {
            s.apply_scroll(cx, Orientation::Vertical, ScrollKind::Relative, f32::NAN)
        });
        tree.layout(scroll, Point::ZERO);
        let offset = tree.base(child).unwrap().offset();
        assert!(offset.x.is_finite() && offset.y.is_finite());
    }

    #[test]
    fn test_measure_uses_unconstrained_child() {
        let mut tree = RenderTree::new();
        let scroll = tree.insert(Box::new(ScrollRenderObject::new()));
        let child = tree.insert(Box::new(StackLayoutRenderObject::new()));
        tree.base_mut(child).unwrap().preferred_size = Size::new(500.0, 500.0).into();
        tree.add_child(scroll, child, 0).unwrap();

        let requirement = MeasureRequirement::with_max(MeasureSize::new(200.0, 100.0));
        let size = tree.measure(scroll, &requirement, &MeasureSize::NOT_SPECIFIED);
        assert_eq!(size, Size::new(200.0, 100.0));
        assert_eq!(tree.base(child).unwrap().desired_size(), Size::new(500.0, 500.0));
    }

    #[test]
    fn test_hit_test_clipped_to_viewport() {
        let (mut tree, scroll, child) = scroll_tree(Size::new(100.0, 100.0), Size::new(100.0, 300.0));
        tree.base_mut(scroll).unwrap().padding = Thickness::uniform(10.0);
        tree.measure(scroll, &MeasureRequirement::exact(Size::new(100.0, 100.0)), &MeasureSize::NOT_SPECIFIED);
        tree.layout(scroll, Point::ZERO);

        assert_eq!(tree.hit_test(scroll, Point::new(50.0, 50.0)), Some(child));
        assert_eq!(tree.hit_test(scroll, Point::new(50.0, 95.0)), Some(scroll));
        assert_eq!(tree.hit_test(scroll, Point::new(150.0, 50.0)), None);
    }

    #[test]
    fn test_draw_clips_and_shows_thumb() {
        use trellis_render::{PaintCommand, RecordingPainter};

        let (tree, scroll, _) = scroll_tree(Size::new(100.0, 100.0), Size::new(100.0, 400.0));
        let mut painter = RecordingPainter::new();
        tree.draw(scroll, &mut painter);

        assert!(painter.is_balanced());
        let thumb = painter.commands().iter().find_map(|command| match command {
            PaintCommand::FillRect { rect, color, .. } if *color == SCROLL_BAR_COLOR => Some(*rect),
            _ => None,
        });
        assert_eq!(thumb, Some(Rect::new(96.0, 0.0, 4.0, 25.0)));
    }
}
