//! Error types for tree and host operations.
//!
//! Only programmer-contract violations are errors. Layout constraint
//! violations are logged on the `trellis::layout` target and recovered by
//! clamping; a missing or destroyed native window degrades functionality
//! without failing.

use thiserror::Error;

use crate::control::ControlId;
use crate::host::WindowHostId;
use crate::render::{ChildMode, RenderObjectId};

/// Errors reported by [`Ui`](crate::Ui) tree, focus and host operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UiError {
    /// The parent render object does not accept another child.
    #[error("render object {name} accepts {mode:?} children and cannot take another")]
    ChildCardinality {
        name: &'static str,
        mode: ChildMode,
    },

    /// The child already has a parent.
    #[error("child already has a parent")]
    AlreadyParented,

    /// The child is the root of a window host and cannot be re-parented.
    #[error("control {0:?} is the root of a window host")]
    HostRoot(ControlId),

    /// A child position was outside `0..=len` (insert) or `0..len` (remove).
    #[error("index {index} out of range for {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    /// Adding the child would make a node its own ancestor.
    #[error("adding the child would create a cycle")]
    WouldCreateCycle,

    /// The control never designated a render object for its children.
    #[error("control {0:?} has no child container")]
    NoChildContainer(ControlId),

    /// The child container cannot change while it holds child controls.
    #[error("child container of control {0:?} still holds children")]
    ContainerInUse(ControlId),

    /// The render object already belongs to another control, or does not
    /// belong to the control it was used with.
    #[error("render object {0:?} is owned by another control")]
    RenderObjectOwned(RenderObjectId),

    /// The operation requires the control to be attached to a window host.
    #[error("control {0:?} is not attached to a window host")]
    NotAttached(ControlId),

    /// Focus was requested for no control.
    #[error("focus target must not be null")]
    NullFocusTarget,

    #[error("render object {0:?} not found")]
    RenderObjectNotFound(RenderObjectId),

    #[error("control {0:?} not found")]
    ControlNotFound(ControlId),

    #[error("window host {0:?} not found")]
    WindowHostNotFound(WindowHostId),

    /// A typed accessor was used with a render object of a different type.
    #[error("render object {id:?} is a {actual}, not the requested type")]
    WrongRenderObjectType {
        id: RenderObjectId,
        actual: &'static str,
    },
}

/// Result type for UI operations.
pub type UiResult<T> = Result<T, UiError>;
