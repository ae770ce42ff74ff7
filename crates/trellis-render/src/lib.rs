//! Geometry and painting primitives for Trellis.
//!
//! This crate contains the value types the layout engine computes with and
//! the [`Painter`] contract render objects draw through:
//!
//! - [`Point`], [`Size`], [`Rect`], [`Thickness`] for layout arithmetic
//! - [`CornerRadius`]/[`CornerRadii`] and [`Color`] for border styling
//! - [`Transform2D`] for the transform stack
//! - [`Path`] and [`Geometry`] for rounded shapes and their hit testing
//! - [`Painter`], [`PainterState`] and [`RecordingPainter`]
//!
//! No GPU or windowing code lives here; a backend implements [`Painter`] on
//! top of whatever surface it owns.
//!
//! # Example
//!
//! ```
//! use trellis_render::{Point, Rect, Size, Thickness};
//!
//! let bounds = Rect::from_origin_size(Point::ZERO, Size::new(100.0, 40.0));
//! let content = bounds.shrink(Thickness::uniform(4.0));
//! assert_eq!(content, Rect::new(4.0, 4.0, 92.0, 32.0));
//! ```

pub mod geometry;
pub mod painter;
pub mod transform;
pub mod types;

pub use geometry::{FillRule, Geometry, Path, PathCommand};
pub use painter::{PaintCommand, Painter, PainterState, RecordingPainter};
pub use transform::Transform2D;
pub use types::{Color, CornerRadii, CornerRadius, Point, Rect, Size, Thickness};
