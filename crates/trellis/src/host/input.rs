//! Translation of native window notifications into hover tracking and
//! routed events.

use trellis_core::logging::targets;
use trellis_render::Point;

use super::{NativeEvent, WindowHostId};
use crate::control::{
    ControlId, FocusChangeEventArgs, KeyEventArgs, MouseButtonEventArgs, MouseEventArgs,
    MouseWheelEventArgs, dispatch_routed_event, lowest_common_ancestor,
};
use crate::error::UiResult;
use crate::ui::Ui;

impl Ui {
    /// Feed one native notification into the host.
    pub fn handle_native_event(&mut self, id: WindowHostId, event: NativeEvent) -> UiResult<()> {
        if let NativeEvent::Destroy = event {
            self.native_destroyed(id);
            return Ok(());
        }
        self.window_host(id)?;
        tracing::trace!(target: targets::INPUT, host = ?id, ?event, "native event");

        match event {
            NativeEvent::Destroy => {}
            NativeEvent::Paint => self.repaint(id)?,
            NativeEvent::Resize(size) => {
                tracing::debug!(target: targets::HOST, host = ?id, %size, "native window resized");
                self.invalidate_layout(id);
            }
            NativeEvent::FocusChanged(focused) => {
                let focus = self.window_host(id)?.focus_control();
                if focused {
                    dispatch_routed_event(
                        self,
                        focus,
                        |e| &e.gain_focus,
                        None,
                        |base| FocusChangeEventArgs::new(base, true),
                        "GainFocus",
                    );
                } else {
                    dispatch_routed_event(
                        self,
                        focus,
                        |e| &e.lose_focus,
                        None,
                        |base| FocusChangeEventArgs::new(base, true),
                        "LoseFocus",
                    );
                }
            }
            NativeEvent::MouseLeave => self.native_mouse_leave(id)?,
            NativeEvent::MouseMove(point) => self.native_mouse_move(id, point)?,
            NativeEvent::MouseDown {
                button,
                point,
                modifiers,
            } => {
                let target = self.mouse_target(id, point)?;
                dispatch_routed_event(
                    self,
                    target,
                    |e| &e.mouse_down,
                    None,
                    |base| MouseButtonEventArgs::new(base, button, point, modifiers),
                    "MouseDown",
                );
            }
            NativeEvent::MouseUp {
                button,
                point,
                modifiers,
            } => {
                let target = self.mouse_target(id, point)?;
                dispatch_routed_event(
                    self,
                    target,
                    |e| &e.mouse_up,
                    None,
                    |base| MouseButtonEventArgs::new(base, button, point, modifiers),
                    "MouseUp",
                );
            }
            NativeEvent::MouseWheel {
                delta,
                point,
                modifiers,
            } => {
                let target = self.mouse_target(id, point)?;
                dispatch_routed_event(
                    self,
                    target,
                    |e| &e.mouse_wheel,
                    None,
                    |base| MouseWheelEventArgs::new(base, point, delta, modifiers),
                    "MouseWheel",
                );
            }
            NativeEvent::KeyDown { key, modifiers } => {
                let focus = self.window_host(id)?.focus_control();
                dispatch_routed_event(
                    self,
                    focus,
                    |e| &e.key_down,
                    None,
                    |base| KeyEventArgs::new(base, key, modifiers),
                    "KeyDown",
                );
            }
            NativeEvent::KeyUp { key, modifiers } => {
                let focus = self.window_host(id)?.focus_control();
                dispatch_routed_event(
                    self,
                    focus,
                    |e| &e.key_up,
                    None,
                    |base| KeyEventArgs::new(base, key, modifiers),
                    "KeyUp",
                );
            }
        }
        Ok(())
    }

    /// The captured control, or the control under `point`.
    fn mouse_target(&self, id: WindowHostId, point: Point) -> UiResult<ControlId> {
        match self.window_host(id)?.mouse_captured_control() {
            Some(captured) => Ok(captured),
            None => self.hit_test_control(id, point),
        }
    }

    fn dispatch_mouse_leave(&mut self, from: ControlId, stop: Option<ControlId>, point: Option<Point>) {
        dispatch_routed_event(
            self,
            from,
            |e| &e.mouse_leave,
            stop,
            |base| MouseEventArgs::new(base, point),
            "MouseLeave",
        );
    }

    fn dispatch_mouse_enter(&mut self, to: ControlId, stop: Option<ControlId>, point: Option<Point>) {
        dispatch_routed_event(
            self,
            to,
            |e| &e.mouse_enter,
            stop,
            |base| MouseEventArgs::new(base, point),
            "MouseEnter",
        );
    }

    /// Without capture, hover follows the hit test: leave and enter are
    /// pruned at the lowest common ancestor, then move goes to the new hover
    /// control. With capture, only the chain shared with the captured
    /// control counts as hovered, and move goes to the captured control.
    fn native_mouse_move(&mut self, id: WindowHostId, point: Point) -> UiResult<()> {
        let host = self.window_host(id)?;
        let old_hover = host.mouse_hover_control();
        let capture = host.mouse_captured_control();
        let new_hover = self.hit_test_control(id, point)?;
        self.window_host_mut(id)?.hover = Some(new_hover);

        let receiver = match capture {
            None => {
                if old_hover != Some(new_hover) {
                    self.dispatch_hover_change(old_hover, Some(new_hover), Some(point), false, false);
                }
                new_hover
            }
            Some(captured) => {
                let new_shared = lowest_common_ancestor(self, new_hover, captured);
                let old_shared = old_hover.and_then(|h| lowest_common_ancestor(self, h, captured));
                let stop = match (new_shared, old_shared) {
                    (Some(n), Some(o)) => lowest_common_ancestor(self, n, o),
                    _ => None,
                };
                if let Some(old) = old_shared
                    && Some(old) != stop
                {
                    self.dispatch_mouse_leave(old, stop, Some(point));
                }
                if let Some(new) = new_shared
                    && Some(new) != stop
                {
                    self.dispatch_mouse_enter(new, stop, Some(point));
                }
                captured
            }
        };

        if self.controls.contains(receiver) {
            dispatch_routed_event(
                self,
                receiver,
                |e| &e.mouse_move,
                None,
                |base| MouseEventArgs::new(base, Some(point)),
                "MouseMove",
            );
        }
        self.update_cursor(id);
        Ok(())
    }

    /// The pointer left the client area: everything hovered is left.
    fn native_mouse_leave(&mut self, id: WindowHostId) -> UiResult<()> {
        let host = self.window_host_mut(id)?;
        let hover = host.hover.take();
        let capture = host.capture;
        let from = match capture {
            Some(captured) => hover.and_then(|h| lowest_common_ancestor(self, h, captured)),
            None => hover,
        };
        if let Some(from) = from {
            self.dispatch_mouse_leave(from, None, None);
        }
        self.update_cursor(id);
        Ok(())
    }
}
