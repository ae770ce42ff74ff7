//! Single-threaded signal/slot notifications.
//!
//! A [`Signal<Args>`] holds a set of connected slots (closures) and invokes
//! each of them when the signal is emitted. Trellis uses signals for
//! notifications that observers only need to *see*, such as a control being
//! attached to a window host or a relayout having finished. Handlers that must
//! mutate the UI tree use routed events instead.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use trellis_core::Signal;
//!
//! let resized = Signal::<(f32, f32)>::new();
//! let last_width = Rc::new(Cell::new(0.0));
//!
//! let sink = last_width.clone();
//! let id = resized.connect(move |(w, _h)| sink.set(*w));
//!
//! resized.emit((320.0, 200.0));
//! assert_eq!(last_width.get(), 320.0);
//!
//! assert!(resized.disconnect(id));
//! resized.emit((640.0, 480.0));
//! assert_eq!(last_width.get(), 320.0);
//! ```
//!
//! # Re-entrancy
//!
//! Emission snapshots the connected slots before invoking them, so a slot may
//! connect or disconnect slots (including itself) on the signal that is
//! currently emitting. Such changes take effect on the next emission.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Identifies one connection between a [`Signal`] and a slot.
    ///
    /// Returned by [`Signal::connect`] and accepted by
    /// [`Signal::disconnect`]. Ids are never reused by the same signal.
    pub struct ConnectionId;
}

type Slot<Args> = Rc<dyn Fn(&Args)>;

/// A notification source with any number of connected slots.
pub struct Signal<Args> {
    slots: RefCell<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: Cell<bool>,
}

impl<Args> Signal<Args> {
    /// Create a signal with no connections.
    pub fn new() -> Self {
        Self {
            slots: RefCell::new(SlotMap::with_key()),
            blocked: Cell::new(false),
        }
    }

    /// Connect a slot. The slot is invoked with a reference to the emitted
    /// arguments.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + 'static,
    {
        let id = self.slots.borrow_mut().insert(Rc::new(slot));
        tracing::trace!(target: targets::SIGNAL, ?id, "slot connected");
        id
    }

    /// Disconnect a slot.
    ///
    /// Returns `false` if the id was unknown or already disconnected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let removed = self.slots.borrow_mut().remove(id).is_some();
        if removed {
            tracing::trace!(target: targets::SIGNAL, ?id, "slot disconnected");
        }
        removed
    }

    /// Disconnect every slot.
    pub fn disconnect_all(&self) {
        self.slots.borrow_mut().clear();
    }

    /// Number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Block or unblock emission. A blocked signal ignores [`emit`](Self::emit).
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.set(blocked);
    }

    /// Whether emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.get()
    }

    /// Invoke every connected slot with `args`.
    pub fn emit(&self, args: Args) {
        if self.blocked.get() {
            tracing::trace!(target: targets::SIGNAL, "emit skipped, signal blocked");
            return;
        }

        let snapshot: Vec<Slot<Args>> = self.slots.borrow().values().cloned().collect();
        for slot in snapshot {
            slot(&args);
        }
    }
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connection_count())
            .field("blocked", &self.is_blocked())
            .finish()
    }
}

static_assertions::assert_not_impl_any!(Signal<()>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_all_slots() {
        let signal = Signal::<i32>::new();
        let total = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let total = total.clone();
            signal.connect(move |v| total.set(total.get() + *v));
        }

        signal.emit(5);
        assert_eq!(total.get(), 15);
        assert_eq!(signal.connection_count(), 3);
    }

    #[test]
    fn test_disconnect() {
        let signal = Signal::<()>::new();
        let hits = Rc::new(Cell::new(0));

        let h = hits.clone();
        let id = signal.connect(move |_| h.set(h.get() + 1));
        signal.emit(());
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit(());

        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_blocked_signal_is_silent() {
        let signal = Signal::<()>::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        signal.connect(move |_| h.set(h.get() + 1));

        signal.set_blocked(true);
        signal.emit(());
        assert_eq!(hits.get(), 0);

        signal.set_blocked(false);
        signal.emit(());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_slot_may_disconnect_itself() {
        let signal = Rc::new(Signal::<()>::new());
        let hits = Rc::new(Cell::new(0));
        let own_id: Rc<Cell<Option<ConnectionId>>> = Rc::new(Cell::new(None));

        let weak = Rc::downgrade(&signal);
        let h = hits.clone();
        let slot_id = own_id.clone();
        let id = signal.connect(move |_| {
            h.set(h.get() + 1);
            if let (Some(signal), Some(id)) = (weak.upgrade(), slot_id.get()) {
                signal.disconnect(id);
            }
        });
        own_id.set(Some(id));

        signal.emit(());
        signal.emit(());
        assert_eq!(hits.get(), 1);
        assert_eq!(signal.connection_count(), 0);
    }
}
