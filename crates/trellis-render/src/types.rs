//! Basic geometry and color types.
//!
//! All coordinates are logical pixels in `f32`. A [`Rect`] is a lefttop
//! [`Point`] plus a [`Size`]; a [`Thickness`] describes per-edge insets such
//! as margin, padding or a border ring.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Component-wise offset.
    #[inline]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A 2D size.
///
/// Sizes produced by layout are never negative; arithmetic that could go
/// below zero goes through [`Size::at_least_zero`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// The largest representable size, used as "no limit".
    pub const MAX: Self = Self {
        width: f32::MAX,
        height: f32::MAX,
    };

    /// Check if the size has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Clamp both components to be non-negative.
    #[inline]
    pub fn at_least_zero(self) -> Self {
        Self::new(self.width.max(0.0), self.height.max(0.0))
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Size) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Size) -> Self {
        Self::new(self.width.min(other.width), self.height.min(other.height))
    }
}

impl Add for Size {
    type Output = Size;

    fn add(self, rhs: Size) -> Size {
        Size::new(self.width + rhs.width, self.height + rhs.height)
    }
}

impl Sub for Size {
    type Output = Size;

    fn sub(self, rhs: Size) -> Size {
        Size::new(self.width - rhs.width, self.height - rhs.height)
    }
}

impl From<(f32, f32)> for Size {
    fn from((width, height): (f32, f32)) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A rectangle defined by lefttop origin and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle from origin and size components.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    /// Create a rectangle from a lefttop point and a size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Create a rectangle from two corners (min and max points).
    #[inline]
    pub fn from_corners(min: Point, max: Point) -> Self {
        Self {
            origin: min,
            size: Size {
                width: max.x - min.x,
                height: max.y - min.y,
            },
        }
    }

    /// Empty rectangle at the origin.
    pub const ZERO: Self = Self {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.height
    }

    /// The lefttop corner.
    #[inline]
    pub fn top_left(&self) -> Point {
        self.origin
    }

    /// The bottom-right corner.
    #[inline]
    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    /// The center point.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Check if a point is inside the rectangle.
    ///
    /// Left/top edges are inclusive, right/bottom edges exclusive.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Compute the intersection of two rectangles.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left < right && top < bottom {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Offset the rectangle by the given amount.
    #[inline]
    pub fn offset(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            origin: self.origin.offset(dx, dy),
            size: self.size,
        }
    }

    /// Shrink every edge inward by `thickness`.
    ///
    /// The result may have a negative size if the insets exceed the
    /// rectangle; use [`Rect::clamp_within`] to normalize.
    pub fn shrink(&self, thickness: Thickness) -> Rect {
        Rect::new(
            self.origin.x + thickness.left,
            self.origin.y + thickness.top,
            self.size.width - thickness.horizontal_total(),
            self.size.height - thickness.vertical_total(),
        )
    }

    /// Grow every edge outward by `thickness`.
    pub fn expand(&self, thickness: Thickness) -> Rect {
        Rect::new(
            self.origin.x - thickness.left,
            self.origin.y - thickness.top,
            self.size.width + thickness.horizontal_total(),
            self.size.height + thickness.vertical_total(),
        )
    }

    /// Normalize a rect derived from a box of `bounds` size: the lefttop is
    /// clamped inside the box and the size is clamped to be non-negative.
    pub fn clamp_within(&self, bounds: Size) -> Rect {
        Rect {
            origin: Point::new(self.origin.x.min(bounds.width), self.origin.y.min(bounds.height)),
            size: self.size.at_least_zero(),
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}]", self.origin, self.size)
    }
}

/// Per-edge insets: margin, padding or border thickness.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Thickness {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Thickness {
    /// No insets.
    pub const ZERO: Self = Self::uniform(0.0);

    /// Create insets from all four edges.
    #[inline]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The same inset on every edge.
    #[inline]
    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// `horizontal` on left/right, `vertical` on top/bottom.
    #[inline]
    pub const fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self::new(horizontal, vertical, horizontal, vertical)
    }

    /// left + right.
    #[inline]
    pub fn horizontal_total(&self) -> f32 {
        self.left + self.right
    }

    /// top + bottom.
    #[inline]
    pub fn vertical_total(&self) -> f32 {
        self.top + self.bottom
    }

    /// Total space taken on both axes.
    #[inline]
    pub fn total_size(&self) -> Size {
        Size::new(self.horizontal_total(), self.vertical_total())
    }

    /// Offset of the inner area from the outer lefttop.
    #[inline]
    pub fn lefttop(&self) -> Point {
        Point::new(self.left, self.top)
    }
}

impl Add for Thickness {
    type Output = Thickness;

    fn add(self, rhs: Thickness) -> Thickness {
        Thickness::new(
            self.left + rhs.left,
            self.top + rhs.top,
            self.right + rhs.right,
            self.bottom + rhs.bottom,
        )
    }
}

impl From<f32> for Thickness {
    fn from(value: f32) -> Self {
        Self::uniform(value)
    }
}

impl fmt::Display for Thickness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.left, self.top, self.right, self.bottom)
    }
}

/// Elliptical radius of one corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadius {
    pub x: f32,
    pub y: f32,
}

impl CornerRadius {
    /// A circular corner.
    #[inline]
    pub const fn circular(radius: f32) -> Self {
        Self { x: radius, y: radius }
    }

    /// A square corner.
    pub const ZERO: Self = Self::circular(0.0);

    /// Grow or shrink both axes, never below zero.
    #[inline]
    pub fn adjusted(self, delta_x: f32, delta_y: f32) -> Self {
        Self {
            x: (self.x + delta_x).max(0.0),
            y: (self.y + delta_y).max(0.0),
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.x <= 0.0 || self.y <= 0.0
    }
}

/// Radii of the four corners of a rounded rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadii {
    pub top_left: CornerRadius,
    pub top_right: CornerRadius,
    pub bottom_right: CornerRadius,
    pub bottom_left: CornerRadius,
}

impl CornerRadii {
    /// The same radius on every corner.
    #[inline]
    pub const fn uniform(radius: CornerRadius) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_right: radius,
            bottom_left: radius,
        }
    }

    /// The same circular radius on every corner.
    #[inline]
    pub const fn circular(radius: f32) -> Self {
        Self::uniform(CornerRadius::circular(radius))
    }

    /// Square corners.
    pub const ZERO: Self = Self::uniform(CornerRadius::ZERO);

    /// Apply `f` to every corner.
    pub fn map(self, f: impl Fn(CornerRadius) -> CornerRadius) -> Self {
        Self {
            top_left: f(self.top_left),
            top_right: f(self.top_right),
            bottom_right: f(self.bottom_right),
            bottom_left: f(self.bottom_left),
        }
    }
}

impl From<f32> for CornerRadii {
    fn from(radius: f32) -> Self {
        Self::uniform(CornerRadius::circular(radius))
    }
}

/// An RGBA color with straight (non-premultiplied) alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a color from components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    #[inline]
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create a color from 8-bit components.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Some(Self::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Same color with a different alpha.
    #[inline]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { a: alpha, ..self }
    }

    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::from_rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::from_rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::from_rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::from_rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::from_rgb(0.0, 0.0, 1.0);
    pub const GRAY: Self = Self::from_rgb(0.5, 0.5, 0.5);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_rect_edges() {
        let outer = Rect::new(5.0, 5.0, 40.0, 30.0);
        let content = outer.shrink(Thickness::uniform(5.0));
        assert_eq!((content.left(), content.top()), (10.0, 10.0));
        assert_eq!(content.bottom_right(), Point::new(40.0, 30.0));

        // Edges toward the bottom right belong to the neighbor.
        assert!(content.contains(Point::new(10.0, 10.0)));
        assert!(!content.contains(Point::new(40.0, 20.0)));

        let clip = Rect::new(0.0, 20.0, 100.0, 100.0);
        assert_eq!(content.intersect(&clip), Some(Rect::new(10.0, 20.0, 30.0, 10.0)));
        assert_eq!(content.intersect(&content.offset(100.0, 0.0)), None);
    }

    #[test]
    fn test_shrink_and_expand_with_thickness() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        let t = Thickness::new(1.0, 2.0, 3.0, 4.0);

        let inner = r.shrink(t);
        assert_eq!(inner, Rect::new(1.0, 2.0, 96.0, 44.0));
        assert_eq!(inner.expand(t), r);
    }

    #[test]
    fn test_clamp_within_handles_oversized_insets() {
        let bounds = Size::new(10.0, 10.0);
        let r = Rect::from_origin_size(Point::ZERO, bounds).shrink(Thickness::uniform(8.0));

        let clamped = r.clamp_within(bounds);
        assert_eq!(clamped.origin, Point::new(8.0, 8.0));
        assert_eq!(clamped.size, Size::ZERO);
    }

    #[test]
    fn test_thickness_totals() {
        let t = Thickness::symmetric(4.0, 2.0);
        assert_eq!(t.horizontal_total(), 8.0);
        assert_eq!(t.vertical_total(), 4.0);
        assert_eq!(t.total_size(), Size::new(8.0, 4.0));
        assert_eq!((t + Thickness::uniform(1.0)).total_size(), Size::new(10.0, 6.0));
    }

    #[test]
    fn test_corner_radius_adjusted_never_negative() {
        let r = CornerRadius::circular(3.0);
        assert_eq!(r.adjusted(2.0, 2.0), CornerRadius::circular(5.0));
        assert_eq!(r.adjusted(-5.0, -1.0), CornerRadius { x: 0.0, y: 2.0 });
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#0000ff"), Some(Color::BLUE));
        let translucent = Color::from_hex("FFFFFF40").unwrap();
        assert!((translucent.a - 0.25).abs() < 0.01);
        assert_eq!(Color::from_hex("#fff"), None);
    }
}
