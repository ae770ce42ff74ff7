//! Flexible box layout: children in a row or column that grow and shrink
//! along the main axis by per-child factors.
//!
//! Children are first measured with an unspecified main axis. When their
//! total main length misses the target (the preferred main length, else the
//! maximum when it is exceeded or some child can expand, else the minimum),
//! the difference is spread over the children with a non-zero factor in
//! proportion to it. A child that hits its own minimum (or zero) while
//! shrinking, or its maximum while expanding, leaves the distribution and
//! the rest is spread again over the others.

use trellis_core::logging::targets;
use trellis_render::{Point, Rect, Size};

use super::{
    Align, ChildMode, LayoutContext, MeasureLength, MeasureRequirement, MeasureSize,
    Orientation, RenderObject, RenderObjectId,
};
use crate::error::UiResult;
use crate::ui::Ui;

const MAX_ADJUST_PASSES: usize = 16;
const EPSILON: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlexDirection {
    #[default]
    Horizontal,
    HorizontalReverse,
    Vertical,
    VerticalReverse,
}

impl FlexDirection {
    pub fn orientation(self) -> Orientation {
        match self {
            FlexDirection::Horizontal | FlexDirection::HorizontalReverse => {
                Orientation::Horizontal
            }
            FlexDirection::Vertical | FlexDirection::VerticalReverse => Orientation::Vertical,
        }
    }

    /// Whether children are placed from the end of the main axis.
    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            FlexDirection::HorizontalReverse | FlexDirection::VerticalReverse
        )
    }
}

/// Placement of the whole run of children along the main axis when they do
/// not fill it. Reverse directions mirror it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlexMainAlignment {
    #[default]
    Start,
    Center,
    End,
}

/// Per-child flex settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexChildLayoutData {
    pub expand_factor: f32,
    pub shrink_factor: f32,
    /// `None` uses the layout's item cross alignment.
    pub cross_alignment: Option<Align>,
}

impl Default for FlexChildLayoutData {
    fn default() -> Self {
        Self {
            expand_factor: 0.0,
            shrink_factor: 1.0,
            cross_alignment: None,
        }
    }
}

impl FlexChildLayoutData {
    pub fn with_expand_factor(mut self, factor: f32) -> Self {
        self.expand_factor = factor.max(0.0);
        self
    }

    pub fn with_shrink_factor(mut self, factor: f32) -> Self {
        self.shrink_factor = factor.max(0.0);
        self
    }

    pub fn with_cross_alignment(mut self, alignment: Option<Align>) -> Self {
        self.cross_alignment = alignment;
        self
    }
}

/// Maps main/cross lengths onto width/height.
#[derive(Clone, Copy)]
struct Axes(Orientation);

impl Axes {
    fn main(self, size: Size) -> f32 {
        match self.0 {
            Orientation::Horizontal => size.width,
            Orientation::Vertical => size.height,
        }
    }

    fn cross(self, size: Size) -> f32 {
        match self.0 {
            Orientation::Horizontal => size.height,
            Orientation::Vertical => size.width,
        }
    }

    fn main_length(self, size: MeasureSize) -> MeasureLength {
        match self.0 {
            Orientation::Horizontal => size.width,
            Orientation::Vertical => size.height,
        }
    }

    fn cross_length(self, size: MeasureSize) -> MeasureLength {
        match self.0 {
            Orientation::Horizontal => size.height,
            Orientation::Vertical => size.width,
        }
    }

    fn size(self, main: f32, cross: f32) -> Size {
        match self.0 {
            Orientation::Horizontal => Size::new(main, cross),
            Orientation::Vertical => Size::new(cross, main),
        }
    }

    fn measure_size(self, main: MeasureLength, cross: MeasureLength) -> MeasureSize {
        match self.0 {
            Orientation::Horizontal => MeasureSize::from_lengths(main, cross),
            Orientation::Vertical => MeasureSize::from_lengths(cross, main),
        }
    }

    fn point(self, main: f32, cross: f32) -> Point {
        match self.0 {
            Orientation::Horizontal => Point::new(main, cross),
            Orientation::Vertical => Point::new(cross, main),
        }
    }

    fn main_start(self, rect: Rect) -> f32 {
        match self.0 {
            Orientation::Horizontal => rect.left(),
            Orientation::Vertical => rect.top(),
        }
    }

    fn cross_start(self, rect: Rect) -> f32 {
        match self.0 {
            Orientation::Horizontal => rect.top(),
            Orientation::Vertical => rect.left(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Adjust {
    None,
    Expand(f32),
    Shrink(f32),
}

#[derive(Debug)]
pub struct FlexLayoutRenderObject {
    direction: FlexDirection,
    main_alignment: FlexMainAlignment,
    item_cross_alignment: Align,
    child_data: Vec<FlexChildLayoutData>,
}

impl Default for FlexLayoutRenderObject {
    fn default() -> Self {
        Self {
            direction: FlexDirection::default(),
            main_alignment: FlexMainAlignment::default(),
            item_cross_alignment: Align::Center,
            child_data: Vec::new(),
        }
    }
}

impl FlexLayoutRenderObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_direction(direction: FlexDirection) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    pub fn direction(&self) -> FlexDirection {
        self.direction
    }

    pub fn set_direction(&mut self, direction: FlexDirection) {
        self.direction = direction;
    }

    pub fn main_alignment(&self) -> FlexMainAlignment {
        self.main_alignment
    }

    pub fn set_main_alignment(&mut self, alignment: FlexMainAlignment) {
        self.main_alignment = alignment;
    }

    /// Cross alignment of children without their own. Defaults to center.
    pub fn item_cross_alignment(&self) -> Align {
        self.item_cross_alignment
    }

    pub fn set_item_cross_alignment(&mut self, alignment: Align) {
        self.item_cross_alignment = alignment;
    }

    pub fn child_layout_data(&self, index: usize) -> FlexChildLayoutData {
        self.child_data.get(index).copied().unwrap_or_default()
    }

    pub fn set_child_layout_data(&mut self, index: usize, data: FlexChildLayoutData) {
        if let Some(slot) = self.child_data.get_mut(index) {
            *slot = data;
        }
    }

    fn child_cross_alignment(&self, index: usize) -> Align {
        self.child_layout_data(index)
            .cross_alignment
            .unwrap_or(self.item_cross_alignment)
    }

    fn total_main(cx: &LayoutContext<'_>, axes: Axes, children: &[RenderObjectId]) -> f32 {
        children
            .iter()
            .map(|&child| axes.main(cx.desired_size(child)))
            .sum()
    }

    fn target(
        &self,
        total: f32,
        preferred_main: MeasureLength,
        max_main: MeasureLength,
        min_main: MeasureLength,
        child_count: usize,
    ) -> Adjust {
        if let Some(preferred) = preferred_main.value() {
            return if total > preferred {
                Adjust::Shrink(preferred)
            } else if total < preferred {
                Adjust::Expand(preferred)
            } else {
                Adjust::None
            };
        }
        if let Some(max) = max_main.value() {
            if max < total {
                return Adjust::Shrink(max);
            }
            let can_expand = (0..child_count).any(|i| self.child_layout_data(i).expand_factor > 0.0);
            if max > total && can_expand {
                return Adjust::Expand(max);
            }
        }
        match min_main.value() {
            Some(min) if min > total => Adjust::Expand(min),
            _ => Adjust::None,
        }
    }

    fn shrink(
        &self,
        cx: &mut LayoutContext<'_>,
        axes: Axes,
        children: &[RenderObjectId],
        max_cross: MeasureLength,
        target: f32,
    ) -> f32 {
        let mut active: Vec<usize> = (0..children.len())
            .filter(|&i| self.child_layout_data(i).shrink_factor > 0.0)
            .collect();
        let mut total = Self::total_main(cx, axes, children);

        for pass in 0..MAX_ADJUST_PASSES {
            if active.is_empty() || total <= target + EPSILON {
                break;
            }
            let factors: f32 = active
                .iter()
                .map(|&i| self.child_layout_data(i).shrink_factor)
                .sum();
            let excess = total - target;
            active.retain(|&i| {
                let child = children[i];
                let share = self.child_layout_data(i).shrink_factor / factors * excess;
                let floor = cx
                    .child_base(child)
                    .and_then(|b| axes.main_length(b.custom_requirement().min).value())
                    .unwrap_or(0.0);
                let wanted = axes.main(cx.desired_size(child)) - share;
                let length = wanted.max(floor);

                let requirement = MeasureRequirement::with_max(
                    axes.measure_size(length.into(), max_cross),
                );
                let preferred = axes.measure_size(length.into(), MeasureLength::NOT_SPECIFIED);
                let measured = axes.main(cx.measure(child, &requirement, &preferred));
                wanted > floor && measured <= length + EPSILON
            });
            total = Self::total_main(cx, axes, children);
            tracing::trace!(target: targets::LAYOUT, id = ?cx.id(), pass, total, target, "flex shrink pass");
        }
        total
    }

    fn expand(
        &self,
        cx: &mut LayoutContext<'_>,
        axes: Axes,
        children: &[RenderObjectId],
        max_cross: MeasureLength,
        target: f32,
    ) -> f32 {
        let mut active: Vec<usize> = (0..children.len())
            .filter(|&i| self.child_layout_data(i).expand_factor > 0.0)
            .collect();
        let mut total = Self::total_main(cx, axes, children);

        for pass in 0..MAX_ADJUST_PASSES {
            if active.is_empty() || total >= target - EPSILON {
                break;
            }
            let factors: f32 = active
                .iter()
                .map(|&i| self.child_layout_data(i).expand_factor)
                .sum();
            let missing = target - total;
            active.retain(|&i| {
                let child = children[i];
                let share = self.child_layout_data(i).expand_factor / factors * missing;
                let cap = cx
                    .child_base(child)
                    .and_then(|b| axes.main_length(b.custom_requirement().max).value())
                    .unwrap_or(f32::MAX);
                let wanted = axes.main(cx.desired_size(child)) + share;
                let length = wanted.min(cap);

                let requirement = MeasureRequirement::new(
                    axes.measure_size(MeasureLength::NOT_SPECIFIED, max_cross),
                    axes.measure_size(length.into(), MeasureLength::NOT_SPECIFIED),
                );
                let preferred = axes.measure_size(length.into(), MeasureLength::NOT_SPECIFIED);
                let measured = axes.main(cx.measure(child, &requirement, &preferred));
                wanted < cap && measured >= length - EPSILON
            });
            total = Self::total_main(cx, axes, children);
            tracing::trace!(target: targets::LAYOUT, id = ?cx.id(), pass, total, target, "flex expand pass");
        }
        total
    }
}

impl RenderObject for FlexLayoutRenderObject {
    fn name(&self) -> &'static str {
        "FlexLayoutRenderObject"
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
        let axes = Axes(self.direction.orientation());
        let children = cx.children();

        let max_main = axes.main_length(requirement.max);
        let min_main = axes.main_length(requirement.min);
        let max_cross = axes.cross_length(requirement.max);
        let min_cross = axes.cross_length(requirement.min);

        let natural = MeasureRequirement::with_max(
            axes.measure_size(MeasureLength::NOT_SPECIFIED, max_cross),
        );
        for &child in &children {
            cx.measure(child, &natural, &MeasureSize::NOT_SPECIFIED);
        }
        let total = Self::total_main(cx, axes, &children);

        let adjust = self.target(
            total,
            axes.main_length(*preferred),
            max_main,
            min_main,
            children.len(),
        );
        let mut total = match adjust {
            Adjust::None => total,
            Adjust::Shrink(target) => self.shrink(cx, axes, &children, max_cross, target),
            Adjust::Expand(target) => self.expand(cx, axes, &children, max_cross, target),
        };

        if let Some(max) = max_main.value()
            && total > max
        {
            tracing::warn!(target: targets::LAYOUT, id = ?cx.id(), total, max, "flex children exceed the maximum main length");
            total = max;
        } else if let Some(min) = min_main.value()
            && total < min
        {
            total = min;
        }

        let cross = children
            .iter()
            .map(|&child| axes.cross(cx.desired_size(child)))
            .fold(0.0_f32, f32::max)
            .max(axes.cross_length(*preferred).length_or_zero())
            .max(min_cross.length_or_zero())
            .min(max_cross.length_or_max());

        for (index, &child) in children.iter().enumerate() {
            if self.child_cross_alignment(index) != Align::Stretch {
                continue;
            }
            let desired = cx.desired_size(child);
            let stretched = axes.size(axes.main(desired), cross);
            cx.measure(
                child,
                &MeasureRequirement::exact(stretched),
                &MeasureSize::NOT_SPECIFIED,
            );
        }

        axes.size(total, cross)
    }

    fn layout_content(&mut self, cx: &mut LayoutContext<'_>, content_rect: Rect) {
        let axes = Axes(self.direction.orientation());
        let children = cx.children();
        let available = axes.main(content_rect.size);
        let cross_start = axes.cross_start(content_rect);
        let cross_available = axes.cross(content_rect.size);

        let used = Self::total_main(cx, axes, &children);
        let free = (available - used).max(0.0);
        let lead = match self.main_alignment {
            FlexMainAlignment::Start => 0.0,
            FlexMainAlignment::Center => free / 2.0,
            FlexMainAlignment::End => free,
        };

        let start = axes.main_start(content_rect);
        let end = start + available;
        let mut advance = lead;
        for (index, &child) in children.iter().enumerate() {
            let size = cx.desired_size(child);
            let main = axes.main(size);
            let main_offset = if self.direction.is_reverse() {
                end - advance - main
            } else {
                start + advance
            };
            let cross_offset = self.child_cross_alignment(index).place(
                cross_start,
                cross_available,
                axes.cross(size),
            );
            cx.layout(child, axes.point(main_offset, cross_offset));
            advance += main;
        }
    }

    fn on_child_inserted(&mut self, index: usize) {
        let index = index.min(self.child_data.len());
        self.child_data.insert(index, FlexChildLayoutData::default());
    }

    fn on_child_removed(&mut self, index: usize) {
        if index < self.child_data.len() {
            self.child_data.remove(index);
        }
    }
}

// =============================================================================
// Ui integration
// =============================================================================

impl Ui {
    fn update_flex(
        &mut self,
        id: RenderObjectId,
        f: impl FnOnce(&mut FlexLayoutRenderObject),
    ) -> UiResult<()> {
        self.update_render_object::<FlexLayoutRenderObject, _>(id, |flex, _| f(flex))?;
        self.invalidate_render_layout(id);
        Ok(())
    }

    pub fn set_flex_direction(&mut self, id: RenderObjectId, direction: FlexDirection) -> UiResult<()> {
        self.update_flex(id, |flex| flex.set_direction(direction))
    }

    pub fn set_flex_main_alignment(
        &mut self,
        id: RenderObjectId,
        alignment: FlexMainAlignment,
    ) -> UiResult<()> {
        self.update_flex(id, |flex| flex.set_main_alignment(alignment))
    }

    pub fn set_flex_item_cross_alignment(&mut self, id: RenderObjectId, alignment: Align) -> UiResult<()> {
        self.update_flex(id, |flex| flex.set_item_cross_alignment(alignment))
    }

    /// Replace the flex settings of the child at `index` of the layout `id`.
    pub fn set_flex_child_layout_data(
        &mut self,
        id: RenderObjectId,
        index: usize,
        data: FlexChildLayoutData,
    ) -> UiResult<()> {
        self.update_flex(id, |flex| flex.set_child_layout_data(index, data))
    }
}
