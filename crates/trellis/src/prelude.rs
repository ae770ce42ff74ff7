//! Commonly used types:
//!
//! ```
//! use trellis::prelude::*;
//! ```

pub use crate::Ui;
pub use crate::error::{UiError, UiResult};

pub use crate::control::{
    ControlEvents, ControlId, EventArgs, FocusChangeEventArgs, KeyEventArgs, KeyModifiers,
    MouseButton, MouseButtonEventArgs, MouseEventArgs, MouseWheelEventArgs,
};
pub use crate::cursor::CursorShape;
pub use crate::host::{WindowHostConfig, WindowHostId};
pub use crate::render::{
    Align, Alignment, BorderStyle, FlexChildLayoutData, FlexDirection, FlexMainAlignment,
    MeasureRequirement, MeasureSize, Orientation, RenderObject, RenderObjectId, ScrollKind,
};

pub use trellis_core::{Signal, TaskContext};
pub use trellis_render::{Color, CornerRadii, Painter, Point, Rect, Size, Thickness};
