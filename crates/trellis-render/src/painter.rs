//! The painter interface render objects draw through.
//!
//! A [`Painter`] is provided by the native window for the duration of one
//! paint. Render objects issue rectangle and geometry fills/strokes in their
//! own coordinate space; parents establish that space by pushing a transform
//! (the child's layout offset) and, for viewports, a clip.
//!
//! Push and pop calls must balance. [`PainterState`] is a ready-made stack
//! backends can embed to track the effective transform and clip.
//!
//! # Frame Lifecycle
//!
//! ```ignore
//! painter.clear(Color::WHITE);
//! painter.push_transform(Transform2D::translate(10.0, 10.0));
//! painter.fill_rect(Rect::new(0.0, 0.0, 50.0, 20.0), Color::RED);
//! painter.pop_transform();
//! ```

use crate::geometry::Geometry;
use crate::transform::Transform2D;
use crate::types::{Color, Rect};

/// The 2D drawing interface.
pub trait Painter {
    /// Fill the whole target with a color, ignoring clip and transform.
    fn clear(&mut self, color: Color);

    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Stroke the outline of a rectangle.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);

    /// Fill a geometry using its fill rule.
    fn fill_geometry(&mut self, geometry: &Geometry, color: Color);

    /// Stroke the outline of a geometry.
    fn stroke_geometry(&mut self, geometry: &Geometry, color: Color, width: f32);

    // =========================================================================
    // State
    // =========================================================================

    /// Intersect the clip with `rect` (in current coordinates) until the
    /// matching [`pop_clip`](Self::pop_clip).
    fn push_clip(&mut self, rect: Rect);

    /// Restore the clip active before the last [`push_clip`](Self::push_clip).
    fn pop_clip(&mut self);

    /// Concatenate `transform` onto the current transform until the matching
    /// [`pop_transform`](Self::pop_transform).
    fn push_transform(&mut self, transform: Transform2D);

    /// Restore the transform active before the last push.
    fn pop_transform(&mut self);

    /// The current accumulated transform.
    fn transform(&self) -> Transform2D;
}

/// Transform and clip stacks shared by painter implementations.
///
/// Clips are tracked as axis-aligned bounds in target coordinates.
#[derive(Debug, Clone, Default)]
pub struct PainterState {
    transforms: Vec<Transform2D>,
    current: Transform2D,
    clips: Vec<Option<Rect>>,
    clip: Option<Rect>,
}

impl PainterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current accumulated transform.
    pub fn transform(&self) -> Transform2D {
        self.current
    }

    /// The current clip bounds in target coordinates, `None` when unclipped.
    pub fn clip_bounds(&self) -> Option<Rect> {
        self.clip
    }

    pub fn push_transform(&mut self, transform: Transform2D) {
        self.transforms.push(self.current);
        self.current = self.current.then(&transform);
    }

    pub fn pop_transform(&mut self) {
        match self.transforms.pop() {
            Some(previous) => self.current = previous,
            None => tracing::warn!(target: "trellis_render::painter", "pop_transform without matching push"),
        }
    }

    pub fn push_clip(&mut self, rect: Rect) {
        let device = self.current.transform_rect(&rect);
        let next = match self.clip {
            Some(clip) => Some(clip.intersect(&device).unwrap_or(Rect::from_origin_size(device.origin, Default::default()))),
            None => Some(device),
        };
        self.clips.push(self.clip);
        self.clip = next;
    }

    pub fn pop_clip(&mut self) {
        match self.clips.pop() {
            Some(previous) => self.clip = previous,
            None => tracing::warn!(target: "trellis_render::painter", "pop_clip without matching push"),
        }
    }

    /// Number of pushed transforms plus pushed clips.
    pub fn depth(&self) -> usize {
        self.transforms.len() + self.clips.len()
    }
}

/// One operation captured by [`RecordingPainter`].
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    Clear(Color),
    FillRect {
        /// Rectangle in target coordinates.
        rect: Rect,
        color: Color,
        clip: Option<Rect>,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f32,
        clip: Option<Rect>,
    },
    FillGeometry {
        /// Geometry bounds in target coordinates.
        bounds: Option<Rect>,
        color: Color,
        clip: Option<Rect>,
    },
    StrokeGeometry {
        bounds: Option<Rect>,
        color: Color,
        width: f32,
        clip: Option<Rect>,
    },
}

/// A painter that records commands in target coordinates.
///
/// Used by the headless window and by tests to assert what a render tree
/// draws and where.
#[derive(Debug, Default)]
pub struct RecordingPainter {
    state: PainterState,
    commands: Vec<PaintCommand>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far.
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the painter empty.
    pub fn take_commands(&mut self) -> Vec<PaintCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Whether every push has been matched by a pop.
    pub fn is_balanced(&self) -> bool {
        self.state.depth() == 0
    }

    fn device_bounds(&self, geometry: &Geometry) -> Option<Rect> {
        geometry
            .bounds()
            .map(|b| self.state.transform().transform_rect(&b))
    }
}

impl Painter for RecordingPainter {
    fn clear(&mut self, color: Color) {
        self.commands.push(PaintCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(PaintCommand::FillRect {
            rect: self.state.transform().transform_rect(&rect),
            color,
            clip: self.state.clip_bounds(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.commands.push(PaintCommand::StrokeRect {
            rect: self.state.transform().transform_rect(&rect),
            color,
            width,
            clip: self.state.clip_bounds(),
        });
    }

    fn fill_geometry(&mut self, geometry: &Geometry, color: Color) {
        let bounds = self.device_bounds(geometry);
        self.commands.push(PaintCommand::FillGeometry {
            bounds,
            color,
            clip: self.state.clip_bounds(),
        });
    }

    fn stroke_geometry(&mut self, geometry: &Geometry, color: Color, width: f32) {
        let bounds = self.device_bounds(geometry);
        self.commands.push(PaintCommand::StrokeGeometry {
            bounds,
            color,
            width,
            clip: self.state.clip_bounds(),
        });
    }

    fn push_clip(&mut self, rect: Rect) {
        self.state.push_clip(rect);
    }

    fn pop_clip(&mut self) {
        self.state.pop_clip();
    }

    fn push_transform(&mut self, transform: Transform2D) {
        self.state.push_transform(transform);
    }

    fn pop_transform(&mut self) {
        self.state.pop_transform();
    }

    fn transform(&self) -> Transform2D {
        self.state.transform()
    }
}
