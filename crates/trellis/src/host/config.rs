//! Window host configuration.

use trellis_render::{Color, Size};

/// Configuration of a [`WindowHost`](super::WindowHost).
///
/// # Example
///
/// ```
/// use trellis::host::WindowHostConfig;
/// use trellis::{Color, Size};
///
/// let config = WindowHostConfig::new()
///     .with_fallback_client_size(Size::new(800.0, 600.0))
///     .with_clear_color(Color::BLACK)
///     .with_retain_after_destroy(true);
///
/// assert!(config.layout_prefer_to_fill_window());
/// assert_eq!(config.fallback_client_size(), Size::new(800.0, 600.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WindowHostConfig {
    /// Relayout passes the client size as both the minimum requirement and
    /// the preferred size of the root.
    layout_prefer_to_fill_window: bool,
    /// Client size assumed while no native window is available.
    fallback_client_size: Size,
    /// Keep the control tree alive when the native window is destroyed first.
    retain_after_destroy: bool,
    /// Painted before the root is drawn.
    clear_color: Color,
}

impl Default for WindowHostConfig {
    fn default() -> Self {
        Self {
            layout_prefer_to_fill_window: true,
            fallback_client_size: Size::new(640.0, 480.0),
            retain_after_destroy: false,
            clear_color: Color::WHITE,
        }
    }
}

impl WindowHostConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout_prefer_to_fill_window(mut self, fill: bool) -> Self {
        self.layout_prefer_to_fill_window = fill;
        self
    }

    pub fn with_fallback_client_size(mut self, size: Size) -> Self {
        self.fallback_client_size = size;
        self
    }

    pub fn with_retain_after_destroy(mut self, retain: bool) -> Self {
        self.retain_after_destroy = retain;
        self
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn layout_prefer_to_fill_window(&self) -> bool {
        self.layout_prefer_to_fill_window
    }

    pub fn fallback_client_size(&self) -> Size {
        self.fallback_client_size
    }

    pub fn retain_after_destroy(&self) -> bool {
        self.retain_after_destroy
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }
}
