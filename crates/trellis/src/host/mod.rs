//! Window hosts.
//!
//! A [`WindowHost`] bridges one native window and one control tree. It owns
//! the root control and its root render object, tracks focus, hover and
//! mouse capture, and coalesces relayout and repaint requests: any number of
//! [`Ui::invalidate_layout`] calls within one tick post a single relayout
//! task, which clears the pending flag when it runs.
//!
//! # Teardown
//!
//! Either side may end a host first. The native window reports
//! [`NativeEvent::Destroy`], or the owner calls [`Ui::destroy_window_host`]
//! (or destroys the root control). A [`TeardownState`] records who started,
//! so the other side is never asked to destroy again: a host destroyed by
//! its owner closes the native window exactly once, a host destroyed by the
//! native window never calls [`NativeWindow::close`].

mod config;
mod headless;
mod input;
mod native;

use std::fmt;

use slotmap::new_key_type;
use trellis_core::logging::{span_names, targets};
use trellis_core::{PerfSpan, Signal};
use trellis_render::{Painter, Point, Size};

use crate::control::{
    ControlId, FocusChangeEventArgs, dispatch_routed_event, lowest_common_ancestor,
};
use crate::cursor::CursorShape;
use crate::error::{UiError, UiResult};
use crate::render::{MeasureRequirement, MeasureSize, RenderObjectId, StackLayoutRenderObject};
use crate::ui::Ui;

pub use config::WindowHostConfig;
pub use headless::{HeadlessState, HeadlessWindow};
pub use native::{NativeEvent, NativeWindow};

new_key_type! {
    /// Identifies a window host of a [`Ui`].
    pub struct WindowHostId;
}

/// Which side started tearing a host down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TeardownState {
    #[default]
    Alive,
    DestroyedByNative,
    DestroyedByOwner,
}

type AfterLayoutAction = Box<dyn FnOnce(&mut Ui)>;

/// State of one window. See the module docs.
pub struct WindowHost {
    config: WindowHostConfig,
    native: Option<Box<dyn NativeWindow>>,
    root_control: ControlId,
    root_render: RenderObjectId,
    focus: ControlId,
    hover: Option<ControlId>,
    capture: Option<ControlId>,
    override_cursor: Option<CursorShape>,
    need_layout: bool,
    need_paint: bool,
    after_layout_stable: Vec<AfterLayoutAction>,
    after_layout: Signal<Size>,
    teardown: TeardownState,
}

impl WindowHost {
    pub fn config(&self) -> &WindowHostConfig {
        &self.config
    }

    pub fn has_native_window(&self) -> bool {
        self.native.is_some()
    }

    pub fn root_control(&self) -> ControlId {
        self.root_control
    }

    pub fn root_render(&self) -> RenderObjectId {
        self.root_render
    }

    /// Never empty; the root control when nothing else has focus.
    pub fn focus_control(&self) -> ControlId {
        self.focus
    }

    pub fn mouse_hover_control(&self) -> Option<ControlId> {
        self.hover
    }

    pub fn mouse_captured_control(&self) -> Option<ControlId> {
        self.capture
    }

    pub fn override_cursor(&self) -> Option<CursorShape> {
        self.override_cursor
    }

    /// Whether a relayout is scheduled and has not run yet.
    pub fn need_layout(&self) -> bool {
        self.need_layout
    }

    pub fn teardown_state(&self) -> TeardownState {
        self.teardown
    }

    /// Emitted with the root size after every relayout.
    pub fn after_layout(&self) -> &Signal<Size> {
        &self.after_layout
    }
}

impl fmt::Debug for WindowHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowHost")
            .field("root_control", &self.root_control)
            .field("focus", &self.focus)
            .field("hover", &self.hover)
            .field("capture", &self.capture)
            .field("need_layout", &self.need_layout)
            .field("has_native", &self.native.is_some())
            .field("teardown", &self.teardown)
            .finish()
    }
}

impl Ui {
    /// Create a window host with a root `"Window"` control.
    ///
    /// Without a native window the host lays out against the configured
    /// fallback client size and never paints. A first relayout is scheduled.
    pub fn create_window(
        &mut self,
        native: Option<Box<dyn NativeWindow>>,
        config: WindowHostConfig,
    ) -> WindowHostId {
        let root_render = self.create_render_object(StackLayoutRenderObject::new());
        let root_control = self.insert_control("Window", root_render, Some(root_render));
        let id = self.hosts.insert(WindowHost {
            config,
            native,
            root_control,
            root_render,
            focus: root_control,
            hover: None,
            capture: None,
            override_cursor: None,
            need_layout: false,
            need_paint: false,
            after_layout_stable: Vec::new(),
            after_layout: Signal::new(),
            teardown: TeardownState::Alive,
        });
        self.render.set_host_recursive(root_render, Some(id));
        self.attach_controls(root_control, id);
        tracing::debug!(target: targets::HOST, host = ?id, ?root_control, "window host created");
        self.invalidate_layout(id);
        id
    }

    pub fn window_host(&self, id: WindowHostId) -> UiResult<&WindowHost> {
        self.hosts.get(id).ok_or(UiError::WindowHostNotFound(id))
    }

    fn window_host_mut(&mut self, id: WindowHostId) -> UiResult<&mut WindowHost> {
        self.hosts.get_mut(id).ok_or(UiError::WindowHostNotFound(id))
    }

    /// The host whose root control is `control`.
    pub fn host_rooted_at(&self, control: ControlId) -> Option<WindowHostId> {
        self.hosts
            .iter()
            .find(|(_, host)| host.root_control == control)
            .map(|(id, _)| id)
    }

    fn host_mouse_position(&self, id: WindowHostId) -> Option<Point> {
        self.hosts.get(id)?.native.as_ref()?.mouse_position()
    }

    // =========================================================================
    // Layout and paint scheduling
    // =========================================================================

    /// Schedule one relayout. Calls while one is pending are no-ops.
    pub fn invalidate_layout(&mut self, id: WindowHostId) {
        let Some(host) = self.hosts.get_mut(id) else {
            return;
        };
        if host.need_layout {
            return;
        }
        host.need_layout = true;
        tracing::trace!(target: targets::HOST, host = ?id, "relayout scheduled");
        self.tasks.post(move |ui: &mut Ui| {
            if ui.hosts.get(id).is_some_and(|h| h.need_layout) {
                ui.relayout_with_fill(id, None);
            }
        });
    }

    /// Schedule one repaint request to the native window.
    pub fn invalidate_paint(&mut self, id: WindowHostId) {
        let Some(host) = self.hosts.get_mut(id) else {
            return;
        };
        if host.need_paint {
            return;
        }
        host.need_paint = true;
        self.tasks.post(move |ui: &mut Ui| {
            let Some(host) = ui.hosts.get_mut(id) else {
                return;
            };
            host.need_paint = false;
            match host.native.as_mut() {
                Some(native) => native.request_repaint(),
                None => {
                    tracing::debug!(target: targets::NATIVE, host = ?id, "no native window to repaint")
                }
            }
        });
    }

    /// Measure and lay out the root against the native client size, or the
    /// fallback size without a native window.
    pub fn relayout(&mut self, id: WindowHostId) -> UiResult<()> {
        self.window_host(id)?;
        self.relayout_with_fill(id, None);
        Ok(())
    }

    /// Lay out against `available` instead of the client size. With
    /// `fit_content` the root is measured to its content within `available`
    /// and the native window is resized to the result.
    pub fn relayout_with_size(
        &mut self,
        id: WindowHostId,
        available: Size,
        fit_content: bool,
    ) -> UiResult<()> {
        let fill = self.window_host(id)?.config.layout_prefer_to_fill_window() && !fit_content;
        let size = self.relayout_impl(id, available, fill);
        if fit_content && let Some(native) = self.window_host_mut(id)?.native.as_mut() {
            native.set_client_size(size);
        }
        Ok(())
    }

    fn relayout_with_fill(&mut self, id: WindowHostId, fill: Option<bool>) {
        let Some(host) = self.hosts.get(id) else {
            return;
        };
        let client = match host.native.as_ref() {
            Some(native) => native.client_size(),
            None => {
                tracing::debug!(target: targets::NATIVE, host = ?id, "no native window, using fallback client size");
                host.config.fallback_client_size()
            }
        };
        let fill = fill.unwrap_or(host.config.layout_prefer_to_fill_window());
        self.relayout_impl(id, client, fill);
    }

    fn relayout_impl(&mut self, id: WindowHostId, available: Size, fill: bool) -> Size {
        let Some(host) = self.hosts.get_mut(id) else {
            return Size::ZERO;
        };
        let _span = PerfSpan::new(span_names::RELAYOUT);
        host.need_layout = false;
        let root = host.root_render;

        let (requirement, preferred) = if fill {
            (MeasureRequirement::exact(available), MeasureSize::from(available))
        } else {
            (
                MeasureRequirement::with_max(MeasureSize::from(available)),
                MeasureSize::NOT_SPECIFIED,
            )
        };
        let size = self.render.measure(root, &requirement, &preferred);
        self.render.layout(root, Point::ZERO);
        self.render.run_after_layout(root);
        tracing::debug!(target: targets::LAYOUT, host = ?id, %available, %size, fill, "relayout");

        let actions = self
            .hosts
            .get_mut(id)
            .map(|h| std::mem::take(&mut h.after_layout_stable))
            .unwrap_or_default();
        for action in actions {
            action(self);
        }
        if let Some(host) = self.hosts.get(id) {
            host.after_layout.emit(size);
        }
        self.invalidate_paint(id);
        size
    }

    /// Run `action` after the pending relayout, or now if none is pending.
    pub fn run_after_layout_stable(
        &mut self,
        id: WindowHostId,
        action: impl FnOnce(&mut Ui) + 'static,
    ) -> UiResult<()> {
        let host = self.window_host_mut(id)?;
        if host.need_layout {
            host.after_layout_stable.push(Box::new(action));
            return Ok(());
        }
        action(self);
        Ok(())
    }

    /// Paint the tree through the native window.
    pub fn repaint(&mut self, id: WindowHostId) -> UiResult<()> {
        let host = self.window_host_mut(id)?;
        let Some(mut native) = host.native.take() else {
            tracing::debug!(target: targets::NATIVE, host = ?id, "no native window to paint");
            return Ok(());
        };
        let root = host.root_render;
        let clear = host.config.clear_color();

        let _span = PerfSpan::new(span_names::REPAINT);
        let render = &self.render;
        native.paint(&mut |painter: &mut dyn Painter| {
            painter.clear(clear);
            render.draw(root, painter);
        });
        if let Some(host) = self.hosts.get_mut(id) {
            host.native = Some(native);
        }
        Ok(())
    }

    // =========================================================================
    // Focus, capture, cursor
    // =========================================================================

    /// Move keyboard focus to `target`, which must be attached to `id`.
    ///
    /// Dispatches lose focus to the old control, then gain focus to the new
    /// one, and asks the native window for focus if it lacks it.
    pub fn request_focus_for(&mut self, id: WindowHostId, target: Option<ControlId>) -> UiResult<()> {
        let target = target.ok_or(UiError::NullFocusTarget)?;
        let old = self.window_host(id)?.focus;
        if self.control_host(target) != Some(id) {
            return Err(UiError::NotAttached(target));
        }
        if old == target {
            return Ok(());
        }
        self.window_host_mut(id)?.focus = target;
        tracing::debug!(target: targets::HOST, host = ?id, ?old, new = ?target, "focus changed");

        dispatch_routed_event(
            self,
            old,
            |e| &e.lose_focus,
            None,
            |base| FocusChangeEventArgs::new(base, false),
            "LoseFocus",
        );
        dispatch_routed_event(
            self,
            target,
            |e| &e.gain_focus,
            None,
            |base| FocusChangeEventArgs::new(base, false),
            "GainFocus",
        );

        if let Some(native) = self.hosts.get_mut(id).and_then(|h| h.native.as_mut())
            && !native.has_focus()
        {
            native.request_focus();
        }
        Ok(())
    }

    /// Capture the mouse for `target`, or release it with `None`.
    ///
    /// Capture is exclusive: while one control holds it, a request for a
    /// different control returns `false`; a repeated request for the holder
    /// returns `true`. Releasing always succeeds. When the released control
    /// is not the hover control, mouse enter is delivered along the hover
    /// chain below their lowest common ancestor, pairing the leaves sent
    /// while the capture was active.
    pub fn capture_mouse_for(&mut self, id: WindowHostId, target: Option<ControlId>) -> UiResult<bool> {
        let host = self.window_host(id)?;
        let current = host.capture;
        let hover = host.hover;
        let point = self.host_mouse_position(id);

        let Some(target) = target else {
            let Some(released) = current else {
                return Ok(true);
            };
            let host = self.window_host_mut(id)?;
            host.capture = None;
            if let Some(native) = host.native.as_mut() {
                native.release_mouse();
            }
            tracing::debug!(target: targets::HOST, host = ?id, control = ?released, "mouse released");
            if hover != Some(released) {
                self.dispatch_hover_change(Some(released), hover, point, true, false);
            }
            self.update_cursor(id);
            return Ok(true);
        };

        if self.control_host(target) != Some(id) {
            return Err(UiError::NotAttached(target));
        }
        if let Some(current) = current {
            return Ok(current == target);
        }
        let host = self.window_host_mut(id)?;
        let Some(native) = host.native.as_mut() else {
            tracing::debug!(target: targets::NATIVE, host = ?id, "no native window to capture the mouse");
            return Ok(false);
        };
        if !native.capture_mouse() {
            tracing::debug!(target: targets::NATIVE, host = ?id, "native window refused mouse capture");
            return Ok(false);
        }
        host.capture = Some(target);
        tracing::debug!(target: targets::HOST, host = ?id, control = ?target, "mouse captured");

        if hover != Some(target) {
            self.dispatch_hover_change(hover, Some(target), point, false, true);
        }
        self.update_cursor(id);
        Ok(true)
    }

    /// The control under `point`, in window coordinates. Falls back to the
    /// root control when nothing else is hit.
    pub fn hit_test_control(&self, id: WindowHostId, point: Point) -> UiResult<ControlId> {
        let host = self.window_host(id)?;
        Ok(self
            .render
            .hit_test(host.root_render, point)
            .and_then(|hit| self.render.nearest_control(hit))
            .filter(|&control| self.controls.contains(control))
            .unwrap_or(host.root_control))
    }

    /// Replace every control cursor with `cursor` until cleared.
    pub fn set_override_cursor(&mut self, id: WindowHostId, cursor: Option<CursorShape>) -> UiResult<()> {
        self.window_host_mut(id)?.override_cursor = cursor;
        self.update_cursor(id);
        Ok(())
    }

    /// The cursor the host currently shows.
    pub fn effective_cursor(&self, id: WindowHostId) -> UiResult<CursorShape> {
        let host = self.window_host(id)?;
        Ok(host.override_cursor.unwrap_or_else(|| {
            host.capture
                .or(host.hover)
                .map_or(CursorShape::Arrow, |control| self.inherited_cursor(control))
        }))
    }

    pub(crate) fn update_cursor(&mut self, id: WindowHostId) {
        let Ok(cursor) = self.effective_cursor(id) else {
            return;
        };
        if let Some(native) = self.hosts.get_mut(id).and_then(|h| h.native.as_mut()) {
            native.set_cursor(cursor);
        }
    }

    /// Reset hover, capture and focus that point into a subtree about to
    /// leave the host. `fallback` is the departing subtree's parent, which
    /// becomes the hover control if the hover was inside the subtree.
    ///
    /// Must run while the subtree is still linked. No event reaches the
    /// departing controls.
    pub(crate) fn forget_controls(
        &mut self,
        id: WindowHostId,
        departing: &[ControlId],
        fallback: Option<ControlId>,
    ) {
        let Some(host) = self.hosts.get_mut(id) else {
            return;
        };
        let mut changed = false;
        if host.hover.is_some_and(|h| departing.contains(&h)) {
            host.hover = fallback;
            changed = true;
        }
        if departing.contains(&host.focus) {
            host.focus = host.root_control;
            tracing::debug!(target: targets::HOST, host = ?id, "focus control left the host, focus reset to root");
        }
        let released = host.capture.filter(|c| departing.contains(c));
        if let Some(released) = released {
            host.capture = None;
            if let Some(native) = host.native.as_mut() {
                native.release_mouse();
            }
            let hover = host.hover;
            if let Some(hover) = hover
                && hover != released
            {
                let stop = lowest_common_ancestor(self, hover, released);
                let point = self.host_mouse_position(id);
                dispatch_routed_event(
                    self,
                    hover,
                    |e| &e.mouse_enter,
                    stop,
                    |base| crate::control::MouseEventArgs::new(base, point),
                    "MouseEnter",
                );
            }
            changed = true;
        }
        if changed {
            self.update_cursor(id);
        }
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Tear the host down from the owner side: close the native window,
    /// destroy the control tree and remove the host.
    pub fn destroy_window_host(&mut self, id: WindowHostId) -> UiResult<()> {
        let host = self.window_host_mut(id)?;
        if host.teardown != TeardownState::Alive {
            return Ok(());
        }
        host.teardown = TeardownState::DestroyedByOwner;
        if let Some(mut native) = host.native.take() {
            native.close();
        }
        let root = host.root_control;
        self.destroy_control_tree(root);
        self.hosts.remove(id);
        tracing::debug!(target: targets::HOST, host = ?id, "window host destroyed by owner");
        Ok(())
    }

    /// The native window is gone. Never calls back into it.
    fn native_destroyed(&mut self, id: WindowHostId) {
        let Some(host) = self.hosts.get_mut(id) else {
            return;
        };
        if host.teardown != TeardownState::Alive {
            return;
        }
        host.teardown = TeardownState::DestroyedByNative;
        host.native = None;
        let root = host.root_control;
        if host.config.retain_after_destroy() {
            self.detach_controls(root);
        } else {
            self.destroy_control_tree(root);
        }
        self.hosts.remove(id);
        tracing::debug!(target: targets::HOST, host = ?id, "window host destroyed by native window");
    }
}
