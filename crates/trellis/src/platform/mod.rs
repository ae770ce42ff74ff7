//! Platform adapters implementing [`NativeWindow`](crate::host::NativeWindow).
//!
//! The headless window lives in [`crate::host`]; this module holds adapters
//! over real windowing systems.

mod winit_window;

pub use winit_window::{PaintHandler, WinitInputTranslator, WinitNativeWindow};
