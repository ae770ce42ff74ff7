//! A native window without a display.
//!
//! [`HeadlessWindow`] keeps its state behind a shared handle so a test or a
//! server-side renderer can inspect what the host asked of the window:
//!
//! ```
//! use trellis::host::{HeadlessWindow, WindowHostConfig};
//! use trellis::{Size, Ui};
//!
//! let mut ui = Ui::new();
//! let window = HeadlessWindow::new(Size::new(320.0, 240.0));
//! let state = window.state();
//! let host = ui.create_window(Some(Box::new(window)), WindowHostConfig::new());
//!
//! ui.process_all_tasks();
//! let root = ui.window_host(host).unwrap().root_render();
//! assert_eq!(ui.render_base(root).unwrap().size(), Size::new(320.0, 240.0));
//! assert_eq!(state.borrow().repaint_requests, 1);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use trellis_render::{PaintCommand, Painter, Point, RecordingPainter, Size};

use super::NativeWindow;
use crate::cursor::CursorShape;

/// Everything a [`HeadlessWindow`] records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessState {
    pub client_size: Size,
    pub mouse_position: Option<Point>,
    pub captured: bool,
    pub focused: bool,
    pub cursor: CursorShape,
    pub repaint_requests: usize,
    pub closed: bool,
    /// Commands of every painted frame, oldest first.
    pub paints: Vec<Vec<PaintCommand>>,
    /// Make [`NativeWindow::capture_mouse`] fail.
    pub deny_capture: bool,
}

/// A [`NativeWindow`] that records into a [`HeadlessState`].
#[derive(Debug)]
pub struct HeadlessWindow {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessWindow {
    pub fn new(client_size: Size) -> Self {
        Self {
            state: Rc::new(RefCell::new(HeadlessState {
                client_size,
                ..HeadlessState::default()
            })),
        }
    }

    /// A handle to the shared state, valid after the window is dropped.
    pub fn state(&self) -> Rc<RefCell<HeadlessState>> {
        self.state.clone()
    }
}

impl NativeWindow for HeadlessWindow {
    fn client_size(&self) -> Size {
        self.state.borrow().client_size
    }

    fn set_client_size(&mut self, size: Size) {
        self.state.borrow_mut().client_size = size;
    }

    fn mouse_position(&self) -> Option<Point> {
        self.state.borrow().mouse_position
    }

    fn capture_mouse(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        if state.deny_capture {
            return false;
        }
        state.captured = true;
        true
    }

    fn release_mouse(&mut self) {
        self.state.borrow_mut().captured = false;
    }

    fn request_focus(&mut self) {
        self.state.borrow_mut().focused = true;
    }

    fn has_focus(&self) -> bool {
        self.state.borrow().focused
    }

    fn set_cursor(&mut self, cursor: CursorShape) {
        self.state.borrow_mut().cursor = cursor;
    }

    fn request_repaint(&mut self) {
        self.state.borrow_mut().repaint_requests += 1;
    }

    fn paint(&mut self, draw: &mut dyn FnMut(&mut dyn Painter)) {
        let mut painter = RecordingPainter::new();
        draw(&mut painter);
        self.state.borrow_mut().paints.push(painter.take_commands());
    }

    fn close(&mut self) {
        self.state.borrow_mut().closed = true;
    }
}
