//! Trellis - the core of a retained-mode UI toolkit.
//!
//! Trellis keeps two parallel trees inside one [`Ui`] context:
//!
//! - the **render tree** ([`render`]), where render objects negotiate size
//!   through a two-pass measure and layout protocol, draw through a
//!   [`Painter`] and answer hit tests;
//! - the **control tree** ([`control`]), the logical nodes that own render
//!   objects and receive routed input events in tunnel, bubble and direct
//!   phases.
//!
//! A [`WindowHost`](host::WindowHost) bridges one native window and one
//! control tree. It tracks focus, hover and mouse capture, resolves the
//! cursor, and coalesces relayout and repaint requests into tasks that run
//! when the event loop drains the queue.
//!
//! # Example
//!
//! ```
//! use trellis::host::{HeadlessWindow, NativeEvent};
//! use trellis::prelude::*;
//!
//! let mut ui = Ui::new();
//! let host = ui.create_window(
//!     Some(Box::new(HeadlessWindow::new(Size::new(200.0, 100.0)))),
//!     WindowHostConfig::new(),
//! );
//! let root = ui.window_host(host).unwrap().root_control();
//!
//! let border = ui.create_border(
//!     &BorderStyle::new()
//!         .with_thickness(Thickness::uniform(1.0))
//!         .with_border_color(Color::BLACK),
//! );
//! let border_render = ui.control(border).unwrap().root_render();
//! ui.set_preferred_size(border_render, MeasureSize::new(50.0, 30.0)).unwrap();
//! ui.add_child(root, border, 0).unwrap();
//! ui.process_all_tasks();
//!
//! ui.handle_native_event(host, NativeEvent::MouseMove(Point::new(10.0, 10.0)))
//!     .unwrap();
//! assert!(ui.is_mouse_over(border));
//! ```
//!
//! # Logging
//!
//! Everything is reported through `tracing` under the `trellis::*` targets
//! listed in [`trellis_core::logging::targets`]. Install any subscriber to
//! see them, for example `RUST_LOG=trellis::event=debug`.

pub mod control;
pub mod cursor;
pub mod error;
pub mod host;
pub mod platform;
pub mod prelude;
pub mod render;
mod ui;

pub use error::{UiError, UiResult};
pub use ui::Ui;

pub use trellis_core::{ConnectionId, Signal, TaskContext};
pub use trellis_render::{
    Color, CornerRadii, CornerRadius, PaintCommand, Painter, Point, RecordingPainter, Rect, Size,
    Thickness, Transform2D,
};
