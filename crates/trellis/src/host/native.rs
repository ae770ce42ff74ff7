//! The native window abstraction a window host drives.

use trellis_render::{Painter, Point, Size};
use winit::keyboard::KeyCode;

use crate::control::{KeyModifiers, MouseButton};
use crate::cursor::CursorShape;

/// A platform window as seen by a [`WindowHost`](super::WindowHost).
///
/// Sizes and positions are logical pixels in client coordinates.
pub trait NativeWindow {
    fn client_size(&self) -> Size;

    fn set_client_size(&mut self, size: Size);

    /// Last known pointer position, if the pointer is over the window.
    fn mouse_position(&self) -> Option<Point>;

    /// Route all pointer input to this window. Returns `false` if the
    /// platform refused.
    fn capture_mouse(&mut self) -> bool;

    fn release_mouse(&mut self);

    fn request_focus(&mut self);

    fn has_focus(&self) -> bool;

    fn set_cursor(&mut self, cursor: CursorShape);

    /// Ask the platform for a [`NativeEvent::Paint`].
    fn request_repaint(&mut self);

    /// Paint one frame. The window supplies a painter for its surface and
    /// calls `draw` once.
    fn paint(&mut self, draw: &mut dyn FnMut(&mut dyn Painter));

    /// Close the platform window. Called at most once, and never after the
    /// window reported [`NativeEvent::Destroy`].
    fn close(&mut self);
}

/// A notification from the native window, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeEvent {
    /// The platform window is gone.
    Destroy,
    Paint,
    Resize(Size),
    /// The window gained (`true`) or lost keyboard focus.
    FocusChanged(bool),
    /// The pointer left the client area.
    MouseLeave,
    MouseMove(Point),
    MouseDown {
        button: MouseButton,
        point: Point,
        modifiers: KeyModifiers,
    },
    MouseUp {
        button: MouseButton,
        point: Point,
        modifiers: KeyModifiers,
    },
    MouseWheel {
        /// Notches; positive scrolls toward the end of the content.
        delta: f32,
        point: Point,
        modifiers: KeyModifiers,
    },
    KeyDown {
        key: KeyCode,
        modifiers: KeyModifiers,
    },
    KeyUp {
        key: KeyCode,
        modifiers: KeyModifiers,
    },
}
