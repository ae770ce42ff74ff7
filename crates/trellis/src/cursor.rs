//! Cursor shapes.
//!
//! Each control may carry a cursor shape. The window host resolves the
//! effective cursor from the captured control (or, without capture, the
//! hovered control) by walking up the control tree until a control with an
//! explicit cursor is found; the root default is [`CursorShape::Arrow`].
//!
//! A host-wide override cursor takes precedence over every control cursor:
//!
//! ```ignore
//! ui.set_override_cursor(host, Some(CursorShape::Wait));
//! // ... long operation ...
//! ui.set_override_cursor(host, None);
//! ```

use cursor_icon::CursorIcon;

/// The shape (icon) of the mouse cursor.
///
/// The actual appearance varies by platform and theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum CursorShape {
    /// The default arrow cursor.
    #[default]
    Arrow,
    /// A pointing hand, for clickable elements.
    Hand,
    /// An I-beam, for text.
    IBeam,
    /// A crosshair for precise selection.
    Crosshair,
    /// The action is not allowed.
    Forbidden,
    /// The program is busy.
    Wait,
    /// Something can be moved.
    Move,
    /// Something can be grabbed.
    Grab,
    /// Something is being grabbed.
    Grabbing,
    /// Horizontal (east-west) resize.
    ResizeHorizontal,
    /// Vertical (north-south) resize.
    ResizeVertical,
    /// Diagonal resize (northeast-southwest).
    ResizeNeSw,
    /// Diagonal resize (northwest-southeast).
    ResizeNwSe,
}

impl CursorShape {
    /// The platform cursor icon for this shape.
    pub fn to_cursor_icon(self) -> CursorIcon {
        match self {
            CursorShape::Arrow => CursorIcon::Default,
            CursorShape::Hand => CursorIcon::Pointer,
            CursorShape::IBeam => CursorIcon::Text,
            CursorShape::Crosshair => CursorIcon::Crosshair,
            CursorShape::Forbidden => CursorIcon::NotAllowed,
            CursorShape::Wait => CursorIcon::Wait,
            CursorShape::Move => CursorIcon::Move,
            CursorShape::Grab => CursorIcon::Grab,
            CursorShape::Grabbing => CursorIcon::Grabbing,
            CursorShape::ResizeHorizontal => CursorIcon::EwResize,
            CursorShape::ResizeVertical => CursorIcon::NsResize,
            CursorShape::ResizeNeSw => CursorIcon::NeswResize,
            CursorShape::ResizeNwSe => CursorIcon::NwseResize,
        }
    }

    /// Check if this is a resize cursor.
    pub fn is_resize_cursor(self) -> bool {
        matches!(
            self,
            CursorShape::ResizeHorizontal
                | CursorShape::ResizeVertical
                | CursorShape::ResizeNeSw
                | CursorShape::ResizeNwSe
        )
    }
}

impl From<CursorShape> for CursorIcon {
    fn from(shape: CursorShape) -> Self {
        shape.to_cursor_icon()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_arrow() {
        assert_eq!(CursorShape::default(), CursorShape::Arrow);
        assert_eq!(CursorShape::Arrow.to_cursor_icon(), CursorIcon::Default);
    }

    #[test]
    fn test_icon_mapping() {
        assert_eq!(CursorIcon::from(CursorShape::Hand), CursorIcon::Pointer);
        assert_eq!(CursorShape::IBeam.to_cursor_icon(), CursorIcon::Text);
        assert!(CursorShape::ResizeNwSe.is_resize_cursor());
        assert!(!CursorShape::Wait.is_resize_cursor());
    }
}
