//! Routed event slots and argument types.
//!
//! Every control carries one [`RoutedEvent`] per input kind. A routed event
//! has three handler lists that run in a fixed order for each dispatch:
//!
//! 1. **tunnel** on every control from the root down to the target,
//! 2. **bubble** from the target up to the root, only if no tunnel handler
//!    marked the event handled,
//! 3. **direct** on every control of the route, always.
//!
//! Each control on the route receives freshly built arguments, so `handled`
//! only travels along one phase through the value returned by the handler
//! that set it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use trellis_core::Signal;
use trellis_render::Point;
use winit::keyboard::KeyCode;

use super::ControlId;
use crate::host::WindowHostId;
use crate::ui::Ui;

/// Identifies a handler inside one [`EventSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

type Handler<A> = Rc<dyn Fn(&mut Ui, &mut A)>;

/// An ordered list of handlers for one phase of one event.
///
/// Handlers may add or remove handlers on the slot that is currently being
/// invoked; the change takes effect on the next invocation.
pub struct EventSlot<A> {
    handlers: RefCell<Vec<(HandlerId, Handler<A>)>>,
    next_id: Cell<u64>,
}

impl<A: 'static> EventSlot<A> {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    fn next_id(&self) -> HandlerId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        HandlerId(id)
    }

    /// Append a handler.
    pub fn add_handler<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&mut Ui, &mut A) + 'static,
    {
        let id = self.next_id();
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Insert a handler before every existing one.
    pub fn prepend_handler<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&mut Ui, &mut A) + 'static,
    {
        let id = self.next_id();
        self.handlers.borrow_mut().insert(0, (id, Rc::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if it was not registered.
    pub fn remove_handler(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler, _)| *handler != id);
        handlers.len() != before
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Run every handler in order. All handlers run, even after one of them
    /// marks the arguments handled.
    pub fn invoke(&self, ui: &mut Ui, args: &mut A) {
        let snapshot: Vec<Handler<A>> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in snapshot {
            handler(ui, args);
        }
    }
}

impl<A: 'static> Default for EventSlot<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for EventSlot<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSlot")
            .field("handlers", &self.handlers.borrow().len())
            .finish()
    }
}

/// The three phases of one routed event on one control.
#[derive(Debug)]
pub struct RoutedEvent<A> {
    pub tunnel: EventSlot<A>,
    pub bubble: EventSlot<A>,
    pub direct: EventSlot<A>,
}

impl<A: 'static> Default for RoutedEvent<A> {
    fn default() -> Self {
        Self {
            tunnel: EventSlot::new(),
            bubble: EventSlot::new(),
            direct: EventSlot::new(),
        }
    }
}

/// All events a control exposes.
#[derive(Debug, Default)]
pub struct ControlEvents {
    pub mouse_enter: RoutedEvent<MouseEventArgs>,
    pub mouse_leave: RoutedEvent<MouseEventArgs>,
    pub mouse_move: RoutedEvent<MouseEventArgs>,
    pub mouse_down: RoutedEvent<MouseButtonEventArgs>,
    pub mouse_up: RoutedEvent<MouseButtonEventArgs>,
    pub mouse_wheel: RoutedEvent<MouseWheelEventArgs>,
    pub key_down: RoutedEvent<KeyEventArgs>,
    pub key_up: RoutedEvent<KeyEventArgs>,
    pub gain_focus: RoutedEvent<FocusChangeEventArgs>,
    pub lose_focus: RoutedEvent<FocusChangeEventArgs>,
    /// Emitted after the control joined a window host.
    pub attached_to_host: Signal<WindowHostId>,
    /// Emitted after the control left a window host.
    pub detached_from_host: Signal<WindowHostId>,
}

// =============================================================================
// Arguments
// =============================================================================

/// State shared by all routed event arguments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiEventArgs {
    sender: ControlId,
    original_sender: ControlId,
    handled: bool,
}

impl UiEventArgs {
    pub fn new(sender: ControlId, original_sender: ControlId) -> Self {
        Self {
            sender,
            original_sender,
            handled: false,
        }
    }

    /// The control whose handler is running.
    pub fn sender(&self) -> ControlId {
        self.sender
    }

    /// The control the event was dispatched to.
    pub fn original_sender(&self) -> ControlId {
        self.original_sender
    }

    pub fn is_handled(&self) -> bool {
        self.handled
    }

    pub fn set_handled(&mut self) {
        self.handled = true;
    }
}

/// Access to the shared part of an argument type.
pub trait EventArgs: 'static {
    fn base(&self) -> &UiEventArgs;

    fn base_mut(&mut self) -> &mut UiEventArgs;

    fn sender(&self) -> ControlId {
        self.base().sender()
    }

    fn original_sender(&self) -> ControlId {
        self.base().original_sender()
    }

    fn is_handled(&self) -> bool {
        self.base().is_handled()
    }

    fn set_handled(&mut self) {
        self.base_mut().set_handled();
    }
}

macro_rules! impl_event_args {
    ($($ty:ty),* $(,)?) => {
        $(
            impl EventArgs for $ty {
                fn base(&self) -> &UiEventArgs {
                    &self.base
                }

                fn base_mut(&mut self) -> &mut UiEventArgs {
                    &mut self.base
                }
            }
        )*
    };
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        use winit::event::MouseButton as W;
        match button {
            W::Left => MouseButton::Left,
            W::Right => MouseButton::Right,
            W::Middle => MouseButton::Middle,
            W::Back => MouseButton::Back,
            W::Forward => MouseButton::Forward,
            W::Other(code) => MouseButton::Other(code),
        }
    }
}

/// Keyboard modifiers held during an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyModifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyModifiers {
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        control: true,
        ..Self::NONE
    };

    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }
}

impl From<winit::keyboard::ModifiersState> for KeyModifiers {
    fn from(state: winit::keyboard::ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            control: state.control_key(),
            alt: state.alt_key(),
            meta: state.super_key(),
        }
    }
}

/// Arguments of mouse enter, leave and move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEventArgs {
    base: UiEventArgs,
    /// Pointer position in window coordinates, when known.
    pub point: Option<Point>,
}

impl MouseEventArgs {
    pub fn new(base: UiEventArgs, point: Option<Point>) -> Self {
        Self { base, point }
    }

    /// The pointer position in the content coordinates of the sender.
    pub fn point_to_content(&self, ui: &Ui) -> Option<Point> {
        let point = self.point?;
        ui.point_to_control_content(self.base.sender(), point)
    }
}

/// Arguments of mouse down and up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseButtonEventArgs {
    base: UiEventArgs,
    pub button: MouseButton,
    pub point: Point,
    pub modifiers: KeyModifiers,
}

impl MouseButtonEventArgs {
    pub fn new(base: UiEventArgs, button: MouseButton, point: Point, modifiers: KeyModifiers) -> Self {
        Self {
            base,
            button,
            point,
            modifiers,
        }
    }

    pub fn point_to_content(&self, ui: &Ui) -> Option<Point> {
        ui.point_to_control_content(self.base.sender(), self.point)
    }
}

/// Arguments of a wheel rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseWheelEventArgs {
    base: UiEventArgs,
    pub point: Point,
    /// Notches rotated. Positive scrolls toward the end of the content.
    pub delta: f32,
    pub modifiers: KeyModifiers,
}

impl MouseWheelEventArgs {
    pub fn new(base: UiEventArgs, point: Point, delta: f32, modifiers: KeyModifiers) -> Self {
        Self {
            base,
            point,
            delta,
            modifiers,
        }
    }
}

/// Arguments of key down and up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyEventArgs {
    base: UiEventArgs,
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyEventArgs {
    pub fn new(base: UiEventArgs, key: KeyCode, modifiers: KeyModifiers) -> Self {
        Self {
            base,
            key,
            modifiers,
        }
    }
}

/// Arguments of gain and lose focus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusChangeEventArgs {
    base: UiEventArgs,
    /// The change came from the native window gaining or losing focus, not
    /// from focus moving between controls.
    pub is_window: bool,
}

impl FocusChangeEventArgs {
    pub fn new(base: UiEventArgs, is_window: bool) -> Self {
        Self { base, is_window }
    }
}

impl_event_args!(
    MouseEventArgs,
    MouseButtonEventArgs,
    MouseWheelEventArgs,
    KeyEventArgs,
    FocusChangeEventArgs,
);
