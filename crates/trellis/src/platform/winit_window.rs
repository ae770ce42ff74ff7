//! A [`NativeWindow`] over a winit window.
//!
//! winit delivers events through the application's event loop, so the
//! adapter is split in two: [`WinitNativeWindow`] is handed to
//! [`Ui::create_window`](crate::Ui::create_window) and serves the host's
//! requests, while a [`WinitInputTranslator`] stays with the event loop and
//! turns each [`WindowEvent`] into a [`NativeEvent`] for
//! [`Ui::handle_native_event`](crate::Ui::handle_native_event).
//!
//! ```ignore
//! let native = WinitNativeWindow::new(window.clone());
//! let mut translator = native.input_translator();
//! let host = ui.create_window(Some(Box::new(native)), WindowHostConfig::new());
//!
//! // In `ApplicationHandler::window_event`:
//! if let Some(event) = translator.translate(&event) {
//!     ui.handle_native_event(host, event)?;
//! }
//! ui.process_all_tasks();
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use trellis_core::logging::targets;
use trellis_render::{PaintCommand, Painter, Point, RecordingPainter, Size};
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{ModifiersState, PhysicalKey};
use winit::window::{CursorGrabMode, Window};

use crate::control::{KeyModifiers, MouseButton};
use crate::cursor::CursorShape;
use crate::host::{NativeEvent, NativeWindow};

/// Pixels per wheel notch for [`MouseScrollDelta::PixelDelta`].
const PIXELS_PER_NOTCH: f64 = 24.0;

/// Receives the commands of one frame. Rasterizing them is up to the
/// application's renderer.
pub type PaintHandler = Box<dyn FnMut(&Window, &[PaintCommand])>;

/// Serves host requests against a winit [`Window`].
pub struct WinitNativeWindow {
    window: Option<Arc<Window>>,
    cursor: Rc<Cell<Option<Point>>>,
    paint_handler: Option<PaintHandler>,
}

impl WinitNativeWindow {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window: Some(window),
            cursor: Rc::new(Cell::new(None)),
            paint_handler: None,
        }
    }

    /// Route painted frames to `handler`. Without one, frames are recorded
    /// and dropped.
    pub fn with_paint_handler(mut self, handler: PaintHandler) -> Self {
        self.paint_handler = Some(handler);
        self
    }

    /// A translator for this window's events. It shares the pointer
    /// position with the window so [`NativeWindow::mouse_position`] follows
    /// the translated moves.
    pub fn input_translator(&self) -> WinitInputTranslator {
        let scale_factor = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
        WinitInputTranslator {
            modifiers: ModifiersState::empty(),
            cursor: self.cursor.clone(),
            scale_factor,
        }
    }

    pub fn winit_window(&self) -> Option<&Arc<Window>> {
        self.window.as_ref()
    }
}

impl fmt::Debug for WinitNativeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WinitNativeWindow")
            .field("window", &self.window.as_ref().map(|w| w.id()))
            .field("cursor", &self.cursor.get())
            .field("has_paint_handler", &self.paint_handler.is_some())
            .finish()
    }
}

impl NativeWindow for WinitNativeWindow {
    fn client_size(&self) -> Size {
        let Some(window) = self.window.as_ref() else {
            return Size::ZERO;
        };
        let size: LogicalSize<f64> = window.inner_size().to_logical(window.scale_factor());
        Size::new(size.width as f32, size.height as f32)
    }

    fn set_client_size(&mut self, size: Size) {
        if let Some(window) = self.window.as_ref() {
            let _ = window.request_inner_size(LogicalSize::new(
                f64::from(size.width),
                f64::from(size.height),
            ));
        }
    }

    fn mouse_position(&self) -> Option<Point> {
        self.cursor.get()
    }

    fn capture_mouse(&mut self) -> bool {
        let Some(window) = self.window.as_ref() else {
            return false;
        };
        // Confined is unsupported on macOS, Locked elsewhere.
        let result = window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
        if let Err(err) = result {
            tracing::debug!(target: targets::NATIVE, error = %err, "cursor grab failed");
            return false;
        }
        true
    }

    fn release_mouse(&mut self) {
        if let Some(window) = self.window.as_ref()
            && let Err(err) = window.set_cursor_grab(CursorGrabMode::None)
        {
            tracing::debug!(target: targets::NATIVE, error = %err, "cursor release failed");
        }
    }

    fn request_focus(&mut self) {
        if let Some(window) = self.window.as_ref() {
            window.focus_window();
        }
    }

    fn has_focus(&self) -> bool {
        self.window.as_ref().is_some_and(|w| w.has_focus())
    }

    fn set_cursor(&mut self, cursor: CursorShape) {
        if let Some(window) = self.window.as_ref() {
            window.set_cursor(cursor.to_cursor_icon());
        }
    }

    fn request_repaint(&mut self) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn paint(&mut self, draw: &mut dyn FnMut(&mut dyn Painter)) {
        let mut painter = RecordingPainter::new();
        draw(&mut painter);
        let commands = painter.take_commands();
        match (self.window.as_ref(), self.paint_handler.as_mut()) {
            (Some(window), Some(handler)) => handler(window, &commands),
            _ => tracing::trace!(
                target: targets::NATIVE,
                commands = commands.len(),
                "frame dropped, no paint handler"
            ),
        }
    }

    fn close(&mut self) {
        // winit closes a window when its last handle drops.
        self.window = None;
    }
}

/// Turns winit window events into [`NativeEvent`]s.
///
/// Tracks the modifier state and the pointer position between events, since
/// winit reports them separately from button and wheel input.
#[derive(Debug)]
pub struct WinitInputTranslator {
    modifiers: ModifiersState,
    cursor: Rc<Cell<Option<Point>>>,
    scale_factor: f64,
}

impl WinitInputTranslator {
    /// A translator not tied to a [`WinitNativeWindow`].
    pub fn new(scale_factor: f64) -> Self {
        Self {
            modifiers: ModifiersState::empty(),
            cursor: Rc::new(Cell::new(None)),
            scale_factor,
        }
    }

    pub fn cursor_position(&self) -> Option<Point> {
        self.cursor.get()
    }

    /// Translate one event. Events the host has no use for yield `None`.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<NativeEvent> {
        match event {
            WindowEvent::Destroyed => Some(NativeEvent::Destroy),
            WindowEvent::RedrawRequested => Some(NativeEvent::Paint),
            WindowEvent::Resized(size) => Some(self.resized(*size)),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = *scale_factor;
                None
            }
            WindowEvent::Focused(focused) => Some(NativeEvent::FocusChanged(*focused)),
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers_changed(modifiers.state());
                None
            }
            WindowEvent::CursorMoved { position, .. } => Some(self.cursor_moved(*position)),
            WindowEvent::CursorLeft { .. } => Some(self.cursor_left()),
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse_input(*state, (*button).into())
            }
            WindowEvent::MouseWheel { delta, .. } => self.mouse_wheel(*delta),
            WindowEvent::KeyboardInput { event, .. } => {
                self.keyboard_input(event.state, event.physical_key)
            }
            _ => None,
        }
    }

    pub fn resized(&self, size: PhysicalSize<u32>) -> NativeEvent {
        let size: LogicalSize<f64> = size.to_logical(self.scale_factor);
        NativeEvent::Resize(Size::new(size.width as f32, size.height as f32))
    }

    pub fn modifiers_changed(&mut self, state: ModifiersState) {
        self.modifiers = state;
    }

    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> NativeEvent {
        let logical = position.to_logical::<f64>(self.scale_factor);
        let point = Point::new(logical.x as f32, logical.y as f32);
        self.cursor.set(Some(point));
        NativeEvent::MouseMove(point)
    }

    pub fn cursor_left(&mut self) -> NativeEvent {
        self.cursor.set(None);
        NativeEvent::MouseLeave
    }

    /// `None` while the pointer position is unknown.
    pub fn mouse_input(&self, state: ElementState, button: MouseButton) -> Option<NativeEvent> {
        let point = self.cursor.get()?;
        let modifiers = KeyModifiers::from(self.modifiers);
        Some(match state {
            ElementState::Pressed => NativeEvent::MouseDown {
                button,
                point,
                modifiers,
            },
            ElementState::Released => NativeEvent::MouseUp {
                button,
                point,
                modifiers,
            },
        })
    }

    /// winit reports scrolling toward the top as positive; hosts expect
    /// positive notches toward the end of the content.
    pub fn mouse_wheel(&self, delta: MouseScrollDelta) -> Option<NativeEvent> {
        let point = self.cursor.get()?;
        let notches = match delta {
            MouseScrollDelta::LineDelta(_, y) => -y,
            MouseScrollDelta::PixelDelta(pos) => (-pos.y / PIXELS_PER_NOTCH) as f32,
        };
        if notches == 0.0 {
            return None;
        }
        Some(NativeEvent::MouseWheel {
            delta: notches,
            point,
            modifiers: KeyModifiers::from(self.modifiers),
        })
    }

    /// Keys without a known code are dropped.
    pub fn keyboard_input(&self, state: ElementState, key: PhysicalKey) -> Option<NativeEvent> {
        let PhysicalKey::Code(key) = key else {
            return None;
        };
        let modifiers = KeyModifiers::from(self.modifiers);
        Some(match state {
            ElementState::Pressed => NativeEvent::KeyDown { key, modifiers },
            ElementState::Released => NativeEvent::KeyUp { key, modifiers },
        })
    }
}

#[cfg(test)]
mod tests {
    use winit::keyboard::{KeyCode, NativeKeyCode};

    use super::*;

    #[test]
    fn test_cursor_moved_uses_logical_pixels() {
        let mut translator = WinitInputTranslator::new(2.0);
        let event = translator.cursor_moved(PhysicalPosition::new(40.0, 20.0));
        assert_eq!(event, NativeEvent::MouseMove(Point::new(20.0, 10.0)));
        assert_eq!(translator.cursor_position(), Some(Point::new(20.0, 10.0)));

        assert_eq!(translator.cursor_left(), NativeEvent::MouseLeave);
        assert_eq!(translator.cursor_position(), None);
    }

    #[test]
    fn test_buttons_need_a_position() {
        let mut translator = WinitInputTranslator::new(1.0);
        assert_eq!(translator.mouse_input(ElementState::Pressed, MouseButton::Left), None);

        translator.cursor_moved(PhysicalPosition::new(5.0, 6.0));
        translator.modifiers_changed(ModifiersState::SHIFT);
        assert_eq!(
            translator.mouse_input(ElementState::Released, MouseButton::Right),
            Some(NativeEvent::MouseUp {
                button: MouseButton::Right,
                point: Point::new(5.0, 6.0),
                modifiers: KeyModifiers::SHIFT,
            })
        );
    }

    #[test]
    fn test_wheel_direction() {
        let mut translator = WinitInputTranslator::new(1.0);
        translator.cursor_moved(PhysicalPosition::new(0.0, 0.0));

        let Some(NativeEvent::MouseWheel { delta, .. }) =
            translator.mouse_wheel(MouseScrollDelta::LineDelta(0.0, -1.0))
        else {
            panic!("expected a wheel event");
        };
        assert_eq!(delta, 1.0);

        let Some(NativeEvent::MouseWheel { delta, .. }) = translator
            .mouse_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 48.0)))
        else {
            panic!("expected a wheel event");
        };
        assert_eq!(delta, -2.0);

        assert_eq!(translator.mouse_wheel(MouseScrollDelta::LineDelta(1.0, 0.0)), None);
    }

    #[test]
    fn test_keyboard_input() {
        let translator = WinitInputTranslator::new(1.0);
        assert_eq!(
            translator.keyboard_input(ElementState::Pressed, PhysicalKey::Code(KeyCode::Enter)),
            Some(NativeEvent::KeyDown {
                key: KeyCode::Enter,
                modifiers: KeyModifiers::NONE,
            })
        );
        assert_eq!(
            translator.keyboard_input(
                ElementState::Pressed,
                PhysicalKey::Unidentified(NativeKeyCode::Unidentified)
            ),
            None
        );
    }

    #[test]
    fn test_resize_in_logical_pixels() {
        let translator = WinitInputTranslator::new(1.5);
        assert_eq!(
            translator.resized(PhysicalSize::new(300, 150)),
            NativeEvent::Resize(Size::new(200.0, 100.0))
        );
    }
}
