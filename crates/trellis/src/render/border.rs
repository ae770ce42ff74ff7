//! A single-child box with a border ring and optional fills.
//!
//! Three geometries are derived from the current size and style:
//!
//! - the **ring** between the margin-shrunk outer rect and the border-shrunk
//!   inner rect, filled with the border color;
//! - the **inner** rounded rect, filled with the background before the child
//!   is drawn and with the foreground after it;
//! - the **outer** rounded rect, used for hit testing so a click on the ring
//!   itself hits the border even where the child does not reach.
//!
//! Corner radii describe the middle of the ring: the outer edge is half a
//! border thickness rounder, the inner edge half a thickness tighter.
//!
//! Geometry is rebuilt on style change and after a layout that changed the
//! size or margin, never on paint.

use trellis_core::logging::targets;
use trellis_render::{
    Color, CornerRadii, CornerRadius, Geometry, Painter, Point, Rect, Size, Thickness,
};

use super::{
    ChildMode, LayoutContext, MeasureRequirement, MeasureSize, RenderCx, RenderObject,
    RenderObjectBase, RenderObjectId,
};
use crate::error::UiResult;
use crate::ui::Ui;

/// A partial border style. Only the fields that are `Some` are applied by
/// [`BorderRenderObject::apply_style`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BorderStyle {
    pub border_color: Option<Color>,
    pub thickness: Option<Thickness>,
    pub corner_radius: Option<CornerRadii>,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

impl BorderStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_border_color(mut self, color: Color) -> Self {
        self.border_color = Some(color);
        self
    }

    pub fn with_thickness(mut self, thickness: Thickness) -> Self {
        self.thickness = Some(thickness);
        self
    }

    pub fn with_corner_radius(mut self, radius: CornerRadii) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
}

#[derive(Debug, Clone)]
struct BorderGeometry {
    ring: Geometry,
    inner: Geometry,
    outer: Geometry,
    /// Size and margin the geometry was built for.
    key: (Size, Thickness),
}

/// Border render object. See the module docs.
#[derive(Debug, Default)]
pub struct BorderRenderObject {
    enabled: bool,
    border_color: Option<Color>,
    thickness: Thickness,
    corner_radius: CornerRadii,
    foreground: Option<Color>,
    background: Option<Color>,
    geometry: Option<BorderGeometry>,
}

impl BorderRenderObject {
    /// A border with the ring disabled and no fills.
    pub fn new() -> Self {
        Self::default()
    }

    /// A border with `style` applied and the ring enabled.
    pub fn with_style(style: &BorderStyle) -> Self {
        let mut border = Self {
            enabled: true,
            ..Self::default()
        };
        border.apply_style(style);
        border
    }

    /// Merge the present fields of `style` into this border.
    pub fn apply_style(&mut self, style: &BorderStyle) {
        if let Some(color) = style.border_color {
            self.border_color = Some(color);
        }
        if let Some(thickness) = style.thickness {
            self.thickness = thickness;
        }
        if let Some(radius) = style.corner_radius {
            self.corner_radius = radius;
        }
        if let Some(color) = style.foreground {
            self.foreground = Some(color);
        }
        if let Some(color) = style.background {
            self.background = Some(color);
        }
        self.geometry = None;
    }

    pub fn is_border_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_border_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.geometry = None;
    }

    pub fn border_color(&self) -> Option<Color> {
        self.border_color
    }

    /// Configured ring thickness, whether or not the ring is enabled.
    pub fn thickness(&self) -> Thickness {
        self.thickness
    }

    /// Thickness that takes up layout space: zero while disabled.
    pub fn effective_thickness(&self) -> Thickness {
        if self.enabled {
            self.thickness
        } else {
            Thickness::ZERO
        }
    }

    pub fn corner_radius(&self) -> CornerRadii {
        self.corner_radius
    }

    pub fn foreground(&self) -> Option<Color> {
        self.foreground
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    /// Rebuild geometry for the current size and margin of `base`.
    pub fn regenerate_geometry(&mut self, base: &RenderObjectBase) {
        self.geometry = Some(self.build_geometry(base));
    }

    fn build_geometry(&self, base: &RenderObjectBase) -> BorderGeometry {
        let t = self.effective_thickness();
        let outer_rect = Rect::from_origin_size(Point::ZERO, base.size)
            .shrink(base.margin)
            .clamp_within(base.size);
        let inner_rect = outer_rect.shrink(t).clamp_within(base.size);

        let r = self.corner_radius;
        let grow = |c: CornerRadius, h: f32, v: f32, sign: f32| c.adjusted(sign * h / 2.0, sign * v / 2.0);
        let radii = |sign: f32| CornerRadii {
            top_left: grow(r.top_left, t.left, t.top, sign),
            top_right: grow(r.top_right, t.right, t.top, sign),
            bottom_right: grow(r.bottom_right, t.right, t.bottom, sign),
            bottom_left: grow(r.bottom_left, t.left, t.bottom, sign),
        };
        let outer_radii = radii(1.0);
        let inner_radii = radii(-1.0);

        BorderGeometry {
            ring: Geometry::ring(outer_rect, outer_radii, inner_rect, inner_radii),
            inner: Geometry::rounded_rect(inner_rect, inner_radii),
            outer: Geometry::rounded_rect(outer_rect, outer_radii),
            key: (base.size, base.margin),
        }
    }

    fn with_geometry<R>(&self, base: &RenderObjectBase, f: impl FnOnce(&BorderGeometry) -> R) -> R {
        match &self.geometry {
            Some(geometry) if geometry.key == (base.size, base.margin) => f(geometry),
            _ => f(&self.build_geometry(base)),
        }
    }
}

impl RenderObject for BorderRenderObject {
    fn name(&self) -> &'static str {
        "BorderRenderObject"
    }

    fn child_mode(&self) -> ChildMode {
        ChildMode::Single
    }

    fn border_space(&self) -> Thickness {
        self.effective_thickness()
    }

    fn measure_content(
        &mut self,
        cx: &mut LayoutContext<'_>,
        requirement: &MeasureRequirement,
        preferred: &MeasureSize,
    ) -> Size {
        match cx.first_child() {
            Some(child) => cx.measure(child, requirement, preferred),
            None => requirement.coerce(preferred.or_zero()),
        }
    }

    fn layout_content(&mut self, cx: &mut LayoutContext<'_>, content_rect: Rect) {
        if let Some(child) = cx.first_child() {
            cx.layout(child, content_rect.top_left());
        }
    }

    fn after_layout(&mut self, cx: &RenderCx<'_>) {
        let base = cx.base();
        let stale = self
            .geometry
            .as_ref()
            .is_none_or(|g| g.key != (base.size, base.margin));
        if stale {
            self.regenerate_geometry(base);
        }
    }

    fn draw(&self, cx: &RenderCx<'_>, painter: &mut dyn Painter) {
        self.with_geometry(cx.base(), |geometry| {
            if let Some(background) = self.background {
                painter.fill_geometry(&geometry.inner, background);
            }
            if self.enabled {
                match self.border_color {
                    Some(color) => painter.fill_geometry(&geometry.ring, color),
                    None => {
                        tracing::warn!(target: targets::RENDER, id = ?cx.id(), "border enabled without a border color")
                    }
                }
            }
        });

        cx.draw_children(painter);

        if let Some(foreground) = self.foreground {
            self.with_geometry(cx.base(), |geometry| {
                painter.fill_geometry(&geometry.inner, foreground);
            });
        }
    }

    fn hit_test(&self, cx: &RenderCx<'_>, point: Point) -> Option<RenderObjectId> {
        if let Some(hit) = cx.hit_test_children(point) {
            return Some(hit);
        }
        let inside = if self.enabled {
            self.with_geometry(cx.base(), |geometry| geometry.outer.fill_contains(point))
        } else {
            cx.padding_rect().contains(point)
        };
        inside.then(|| cx.id())
    }
}

// =============================================================================
// Ui integration
// =============================================================================

impl Ui {
    /// Merge `style` into a border and relayout.
    pub fn apply_border_style(&mut self, id: RenderObjectId, style: &BorderStyle) -> UiResult<()> {
        self.update_border(id, |border| border.apply_style(style))
    }

    /// Enable or disable the border ring. A disabled ring takes no space.
    pub fn set_border_enabled(&mut self, id: RenderObjectId, enabled: bool) -> UiResult<()> {
        self.update_border(id, |border| border.set_border_enabled(enabled))
    }

    fn update_border(
        &mut self,
        id: RenderObjectId,
        f: impl FnOnce(&mut BorderRenderObject),
    ) -> UiResult<()> {
        let thickness = self.update_render_object::<BorderRenderObject, _>(id, |border, _| {
            f(border);
            border.border_space()
        })?;
        self.update_base(id, |base| base.border = thickness)?;
        self.update_render_object::<BorderRenderObject, _>(id, |border, cx| {
            border.regenerate_geometry(cx.base());
        })
    }
}
