//! 2D affine transforms.
//!
//! The render tree only ever composes translations (each child is drawn at
//! its layout offset, scroll content is shifted by the scroll offset), but the
//! painter interface accepts any affine transform so backends and custom
//! render objects can scale or skew.

use crate::types::{Point, Rect};

/// A 2D affine transformation matrix.
///
/// Stored as a 3x2 matrix in column-major order:
/// ```text
/// | m0 m2 m4 |   | scale_x  skew_x   translate_x |
/// | m1 m3 m5 | = | skew_y   scale_y  translate_y |
/// ```
///
/// ```
/// use trellis_render::{Point, Transform2D};
///
/// let t = Transform2D::translate(10.0, 5.0).then(&Transform2D::scale(2.0));
/// // scale first, then translate
/// assert_eq!(t.transform_point(Point::new(1.0, 1.0)), Point::new(12.0, 7.0));
///
/// let back = t.inverse().unwrap().transform_point(Point::new(12.0, 7.0));
/// assert_eq!(back, Point::new(1.0, 1.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    m: [f32; 6],
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    /// Create a transform from raw matrix elements in column-major order.
    #[inline]
    pub const fn from_matrix(m0: f32, m1: f32, m2: f32, m3: f32, m4: f32, m5: f32) -> Self {
        Self {
            m: [m0, m1, m2, m3, m4, m5],
        }
    }

    /// A translation.
    #[inline]
    pub const fn translate(tx: f32, ty: f32) -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 1.0, tx, ty],
        }
    }

    /// A translation by a point's components.
    #[inline]
    pub const fn translate_by(offset: Point) -> Self {
        Self::translate(offset.x, offset.y)
    }

    /// A uniform scale around the origin.
    #[inline]
    pub const fn scale(s: f32) -> Self {
        Self::scale_xy(s, s)
    }

    /// A non-uniform scale around the origin.
    #[inline]
    pub const fn scale_xy(sx: f32, sy: f32) -> Self {
        Self {
            m: [sx, 0.0, 0.0, sy, 0.0, 0.0],
        }
    }

    /// Compose two transforms: the result applies `other` first, then `self`.
    #[inline]
    pub fn then(&self, other: &Self) -> Self {
        let a = &self.m;
        let b = &other.m;
        Self {
            m: [
                a[0] * b[0] + a[2] * b[1],
                a[1] * b[0] + a[3] * b[1],
                a[0] * b[2] + a[2] * b[3],
                a[1] * b[2] + a[3] * b[3],
                a[0] * b[4] + a[2] * b[5] + a[4],
                a[1] * b[4] + a[3] * b[5] + a[5],
            ],
        }
    }

    /// Map a point through the transform.
    #[inline]
    pub fn transform_point(&self, p: Point) -> Point {
        Point {
            x: self.m[0] * p.x + self.m[2] * p.y + self.m[4],
            y: self.m[1] * p.x + self.m[3] * p.y + self.m[5],
        }
    }

    /// The inverse transform, if the matrix is invertible.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < 1e-10 {
            return None;
        }

        let inv = 1.0 / det;
        let m = &self.m;
        Some(Self {
            m: [
                m[3] * inv,
                -m[1] * inv,
                -m[2] * inv,
                m[0] * inv,
                (m[2] * m[5] - m[3] * m[4]) * inv,
                (m[1] * m[4] - m[0] * m[5]) * inv,
            ],
        })
    }

    #[inline]
    pub fn determinant(&self) -> f32 {
        self.m[0] * self.m[3] - self.m[1] * self.m[2]
    }

    /// The translation component.
    #[inline]
    pub fn translation(&self) -> Point {
        Point::new(self.m[4], self.m[5])
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Whether the transform is a pure translation.
    #[inline]
    pub fn is_translation_only(&self) -> bool {
        self.m[0] == 1.0 && self.m[1] == 0.0 && self.m[2] == 0.0 && self.m[3] == 1.0
    }

    /// Raw matrix elements.
    #[inline]
    pub fn as_array(&self) -> &[f32; 6] {
        &self.m
    }

    /// Axis-aligned bounding box of a transformed rectangle.
    pub fn transform_rect(&self, rect: &Rect) -> Rect {
        if self.is_translation_only() {
            return rect.offset(self.m[4], self.m[5]);
        }

        let corners = [
            self.transform_point(rect.top_left()),
            self.transform_point(Point::new(rect.right(), rect.top())),
            self.transform_point(Point::new(rect.left(), rect.bottom())),
            self.transform_point(rect.bottom_right()),
        ];
        let (mut min, mut max) = (corners[0], corners[0]);
        for p in &corners[1..] {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        Rect::from_corners(min, max)
    }
}
