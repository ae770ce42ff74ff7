//! Paths and filled geometry.
//!
//! [`Path`] is a backend-neutral command list. [`Geometry`] pairs a path with
//! a fill rule and a flattened lyon representation so it can answer
//! point-containment queries, which is what border hit testing needs: a click
//! on a rounded border ring must hit, a click in the cut-off corner must not.

use lyon::algorithms::hit_test::hit_test_path;
use lyon::math::point as lyon_point;
use lyon::path::Path as LyonPath;

use crate::types::{CornerRadii, CornerRadius, Point, Rect};

/// Tolerance used when flattening curves for hit testing.
const HIT_TEST_TOLERANCE: f32 = 0.1;

/// Commands that make up a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start a new subpath at a point.
    MoveTo(Point),
    /// Straight line to a point.
    LineTo(Point),
    /// Quadratic bezier curve.
    QuadTo { control: Point, end: Point },
    /// Cubic bezier curve.
    CubicTo { control1: Point, control2: Point, end: Point },
    /// Close the current subpath.
    Close,
}

/// How overlapping subpaths combine when filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Inside if the winding number is non-zero.
    #[default]
    NonZero,
    /// Inside if the number of crossings is odd. Used for rings.
    EvenOdd,
}

impl From<FillRule> for lyon::path::FillRule {
    fn from(rule: FillRule) -> Self {
        match rule {
            FillRule::NonZero => lyon::path::FillRule::NonZero,
            FillRule::EvenOdd => lyon::path::FillRule::EvenOdd,
        }
    }
}

/// A 2D path built from move/line/curve commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    /// Create an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::LineTo(p));
        self
    }

    pub fn quad_to(&mut self, control: Point, end: Point) -> &mut Self {
        self.commands.push(PathCommand::QuadTo { control, end });
        self
    }

    pub fn cubic_to(&mut self, control1: Point, control2: Point, end: Point) -> &mut Self {
        self.commands.push(PathCommand::CubicTo { control1, control2, end });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Append every command of `other`.
    pub fn extend(&mut self, other: &Path) -> &mut Self {
        self.commands.extend_from_slice(&other.commands);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// A closed rounded-rectangle subpath.
    ///
    /// Radii are clamped so opposite corners never overlap. Zero radii yield
    /// a plain rectangle.
    pub fn rounded_rect(rect: Rect, radii: CornerRadii) -> Self {
        let half_w = (rect.width() / 2.0).max(0.0);
        let half_h = (rect.height() / 2.0).max(0.0);
        let clamp = |r: CornerRadius| CornerRadius {
            x: r.x.clamp(0.0, half_w),
            y: r.y.clamp(0.0, half_h),
        };
        let tl = clamp(radii.top_left);
        let tr = clamp(radii.top_right);
        let br = clamp(radii.bottom_right);
        let bl = clamp(radii.bottom_left);
        let (l, t, r, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());

        let mut path = Self::new();
        path.move_to(Point::new(l + tl.x, t));
        path.line_to(Point::new(r - tr.x, t));
        if !tr.is_zero() {
            path.quad_to(Point::new(r, t), Point::new(r, t + tr.y));
        }
        path.line_to(Point::new(r, b - br.y));
        if !br.is_zero() {
            path.quad_to(Point::new(r, b), Point::new(r - br.x, b));
        }
        path.line_to(Point::new(l + bl.x, b));
        if !bl.is_zero() {
            path.quad_to(Point::new(l, b), Point::new(l, b - bl.y));
        }
        path.line_to(Point::new(l, t + tl.y));
        if !tl.is_zero() {
            path.quad_to(Point::new(l, t), Point::new(l + tl.x, t));
        }
        path.close();
        path
    }

    /// Bounding box of every point the commands reference.
    pub fn bounds(&self) -> Option<Rect> {
        let mut points = self.commands.iter().flat_map(|cmd| match *cmd {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => vec![p],
            PathCommand::QuadTo { control, end } => vec![control, end],
            PathCommand::CubicTo { control1, control2, end } => vec![control1, control2, end],
            PathCommand::Close => Vec::new(),
        });
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Some(Rect::from_corners(min, max))
    }

    /// Convert to lyon's path representation.
    pub fn to_lyon(&self) -> LyonPath {
        let mut builder = LyonPath::builder();
        let mut open = false;

        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) => {
                    if open {
                        builder.end(false);
                    }
                    builder.begin(lyon_point(p.x, p.y));
                    open = true;
                }
                PathCommand::LineTo(p) if open => {
                    builder.line_to(lyon_point(p.x, p.y));
                }
                PathCommand::QuadTo { control, end } if open => {
                    builder.quadratic_bezier_to(
                        lyon_point(control.x, control.y),
                        lyon_point(end.x, end.y),
                    );
                }
                PathCommand::CubicTo { control1, control2, end } if open => {
                    builder.cubic_bezier_to(
                        lyon_point(control1.x, control1.y),
                        lyon_point(control2.x, control2.y),
                        lyon_point(end.x, end.y),
                    );
                }
                PathCommand::Close if open => {
                    builder.end(true);
                    open = false;
                }
                _ => {
                    tracing::trace!(target: "trellis_render::geometry", ?cmd, "drawing command without a current subpath ignored");
                }
            }
        }
        if open {
            builder.end(false);
        }
        builder.build()
    }
}

/// A path prepared for filling and hit testing.
#[derive(Debug, Clone)]
pub struct Geometry {
    path: Path,
    fill_rule: FillRule,
    lyon: LyonPath,
}

impl Geometry {
    /// Prepare `path` with the given fill rule.
    pub fn new(path: Path, fill_rule: FillRule) -> Self {
        let lyon = path.to_lyon();
        Self {
            path,
            fill_rule,
            lyon,
        }
    }

    /// A rounded rectangle geometry.
    pub fn rounded_rect(rect: Rect, radii: CornerRadii) -> Self {
        Self::new(Path::rounded_rect(rect, radii), FillRule::NonZero)
    }

    /// The area between an outer and an inner rounded rectangle.
    pub fn ring(outer: Rect, outer_radii: CornerRadii, inner: Rect, inner_radii: CornerRadii) -> Self {
        let mut path = Path::rounded_rect(outer, outer_radii);
        path.extend(&Path::rounded_rect(inner, inner_radii));
        Self::new(path, FillRule::EvenOdd)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    /// Whether `point` lies inside the filled area.
    pub fn fill_contains(&self, point: Point) -> bool {
        hit_test_path(
            &lyon_point(point.x, point.y),
            self.lyon.iter(),
            self.fill_rule.into(),
            HIT_TEST_TOLERANCE,
        )
    }

    /// Bounding box of the geometry.
    pub fn bounds(&self) -> Option<Rect> {
        self.path.bounds()
    }
}

impl PartialEq for Geometry {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.fill_rule == other.fill_rule
    }
}
