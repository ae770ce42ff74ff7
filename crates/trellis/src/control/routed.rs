//! Routed event dispatch over the control tree.

use std::rc::Rc;

use trellis_core::PerfSpan;
use trellis_core::logging::{span_names, targets};
use trellis_render::Point;

use super::{ControlEvents, ControlId, EventArgs, MouseEventArgs, RoutedEvent, UiEventArgs};
use crate::ui::Ui;

/// Selects one routed event out of a control's event set.
pub type EventAccessor<A> = fn(&ControlEvents) -> &RoutedEvent<A>;

/// Dispatch a routed event to `original` and its ancestors.
///
/// The route runs from `original` up to, but not including, `stop`; with no
/// `stop` it reaches the root. Tunnel handlers run root to target and stop at
/// the first control whose handlers mark the event handled. Bubble handlers
/// run target to root, only if the tunnel was not handled, with the same
/// early exit. Direct handlers run target to root unconditionally.
///
/// `make_args` builds fresh arguments for every control on the route. The
/// route is captured before the first handler runs; controls destroyed by a
/// handler are skipped afterwards.
pub fn dispatch_routed_event<A: EventArgs>(
    ui: &mut Ui,
    original: ControlId,
    event: EventAccessor<A>,
    stop: Option<ControlId>,
    make_args: impl Fn(UiEventArgs) -> A,
    name: &'static str,
) {
    if Some(original) == stop {
        return;
    }
    let _span = PerfSpan::new(span_names::DISPATCH);

    let mut route: Vec<(ControlId, Rc<ControlEvents>)> = Vec::new();
    let mut current = Some(original);
    while let Some(id) = current {
        if Some(id) == stop {
            break;
        }
        let Some(node) = ui.controls.get(id) else {
            break;
        };
        route.push((id, node.events.clone()));
        current = node.parent;
    }
    if route.is_empty() {
        tracing::debug!(target: targets::EVENT, event = name, ?original, "dispatch target not found");
        return;
    }

    if tracing::enabled!(target: targets::EVENT, tracing::Level::DEBUG) {
        let path = route
            .iter()
            .rev()
            .filter_map(|(id, _)| ui.controls.get(*id).map(|c| c.type_name()))
            .collect::<Vec<_>>()
            .join(" -> ");
        tracing::debug!(target: targets::EVENT, event = name, %path, "routed event");
    }

    let mut handled = false;
    for (id, events) in route.iter().rev() {
        if !ui.controls.contains(*id) {
            continue;
        }
        let mut args = make_args(UiEventArgs::new(*id, original));
        event(events).tunnel.invoke(ui, &mut args);
        if args.is_handled() {
            tracing::trace!(target: targets::EVENT, event = name, sender = ?id, "handled in tunnel");
            handled = true;
            break;
        }
    }

    if !handled {
        for (id, events) in &route {
            if !ui.controls.contains(*id) {
                continue;
            }
            let mut args = make_args(UiEventArgs::new(*id, original));
            event(events).bubble.invoke(ui, &mut args);
            if args.is_handled() {
                tracing::trace!(target: targets::EVENT, event = name, sender = ?id, "handled in bubble");
                break;
            }
        }
    }

    for (id, events) in &route {
        if !ui.controls.contains(*id) {
            continue;
        }
        let mut args = make_args(UiEventArgs::new(*id, original));
        event(events).direct.invoke(ui, &mut args);
    }
}

/// The deepest control that is an ancestor-or-self of both `a` and `b`.
///
/// `None` when they are in different trees.
pub fn lowest_common_ancestor(ui: &Ui, a: ControlId, b: ControlId) -> Option<ControlId> {
    let path_a = ui.controls.root_path(a);
    let path_b = ui.controls.root_path(b);
    path_a
        .iter()
        .zip(&path_b)
        .take_while(|(x, y)| x == y)
        .last()
        .map(|(x, _)| *x)
}

impl Ui {
    /// Deliver mouse leave to `old` and mouse enter to `new`, each pruned at
    /// their lowest common ancestor, which itself stays hovered.
    pub(crate) fn dispatch_hover_change(
        &mut self,
        old: Option<ControlId>,
        new: Option<ControlId>,
        point: Option<Point>,
        no_leave: bool,
        no_enter: bool,
    ) {
        let lca = match (old, new) {
            (Some(old), Some(new)) => lowest_common_ancestor(self, old, new),
            _ => None,
        };
        if !no_leave && let Some(old) = old {
            dispatch_routed_event(
                self,
                old,
                |e| &e.mouse_leave,
                lca,
                |base| MouseEventArgs::new(base, point),
                "MouseLeave",
            );
        }
        if !no_enter && let Some(new) = new {
            dispatch_routed_event(
                self,
                new,
                |e| &e.mouse_enter,
                lca,
                |base| MouseEventArgs::new(base, point),
                "MouseEnter",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    type Log = Rc<RefCell<Vec<String>>>;

    fn record(ui: &Ui, id: ControlId, label: &'static str, log: &Log) {
        let events = ui.control_events(id).unwrap();
        let l = log.clone();
        events.mouse_move.tunnel.add_handler(move |_, _: &mut MouseEventArgs| {
            l.borrow_mut().push(format!("tunnel {label}"))
        });
        let l = log.clone();
        events.mouse_move.bubble.add_handler(move |_, _: &mut MouseEventArgs| {
            l.borrow_mut().push(format!("bubble {label}"))
        });
        let l = log.clone();
        events.mouse_move.direct.add_handler(move |_, _: &mut MouseEventArgs| {
            l.borrow_mut().push(format!("direct {label}"))
        });
    }

    /// root > mid > leaf, plus a sibling of mid.
    fn tree(ui: &mut Ui) -> (ControlId, ControlId, ControlId, ControlId) {
        let root = ui.create_container();
        let mid = ui.create_container();
        let leaf = ui.create_container();
        let sibling = ui.create_container();
        ui.add_child(root, mid, 0).unwrap();
        ui.add_child(mid, leaf, 0).unwrap();
        ui.add_child(root, sibling, 1).unwrap();
        (root, mid, leaf, sibling)
    }

    fn move_event(ui: &mut Ui, target: ControlId, stop: Option<ControlId>) {
        dispatch_routed_event(
            ui,
            target,
            |e| &e.mouse_move,
            stop,
            |base| MouseEventArgs::new(base, None),
            "MouseMove",
        );
    }

    #[test]
    fn test_phase_order() {
        let mut ui = Ui::new();
        let (root, mid, leaf, _) = tree(&mut ui);
        let log = Log::default();
        record(&ui, root, "root", &log);
        record(&ui, mid, "mid", &log);
        record(&ui, leaf, "leaf", &log);

        move_event(&mut ui, leaf, None);
        assert_eq!(
            *log.borrow(),
            vec![
                "tunnel root", "tunnel mid", "tunnel leaf",
                "bubble leaf", "bubble mid", "bubble root",
                "direct leaf", "direct mid", "direct root",
            ]
        );
    }

    #[test]
    fn test_stop_is_exclusive() {
        let mut ui = Ui::new();
        let (root, mid, leaf, _) = tree(&mut ui);
        let log = Log::default();
        record(&ui, root, "root", &log);
        record(&ui, mid, "mid", &log);
        record(&ui, leaf, "leaf", &log);

        move_event(&mut ui, leaf, Some(mid));
        assert_eq!(*log.borrow(), vec!["tunnel leaf", "bubble leaf", "direct leaf"]);

        log.borrow_mut().clear();
        move_event(&mut ui, mid, Some(mid));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_tunnel_handled_skips_bubble_not_direct() {
        let mut ui = Ui::new();
        let (root, mid, leaf, _) = tree(&mut ui);
        let log = Log::default();
        record(&ui, root, "root", &log);
        record(&ui, leaf, "leaf", &log);
        ui.control_events(mid)
            .unwrap()
            .mouse_move
            .tunnel
            .add_handler(|_, args: &mut MouseEventArgs| args.set_handled());

        move_event(&mut ui, leaf, None);
        assert_eq!(
            *log.borrow(),
            vec!["tunnel root", "direct leaf", "direct root"]
        );
    }

    #[test]
    fn test_bubble_handled_stops_bubble() {
        let mut ui = Ui::new();
        let (root, mid, leaf, _) = tree(&mut ui);
        let log = Log::default();
        record(&ui, root, "root", &log);
        ui.control_events(mid)
            .unwrap()
            .mouse_move
            .bubble
            .add_handler(|_, args: &mut MouseEventArgs| args.set_handled());

        move_event(&mut ui, leaf, None);
        assert_eq!(*log.borrow(), vec!["tunnel root", "direct root"]);
    }

    #[test]
    fn test_senders_per_node() {
        let mut ui = Ui::new();
        let (root, _, leaf, _) = tree(&mut ui);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        ui.control_events(root)
            .unwrap()
            .mouse_move
            .bubble
            .add_handler(move |_, args: &mut MouseEventArgs| {
                s.borrow_mut().push((args.sender(), args.original_sender()))
            });

        move_event(&mut ui, leaf, None);
        assert_eq!(*seen.borrow(), vec![(root, leaf)]);
    }

    #[test]
    fn test_lowest_common_ancestor() {
        let mut ui = Ui::new();
        let (root, mid, leaf, sibling) = tree(&mut ui);
        let stranger = ui.create_container();

        assert_eq!(lowest_common_ancestor(&ui, leaf, sibling), Some(root));
        assert_eq!(lowest_common_ancestor(&ui, leaf, mid), Some(mid));
        assert_eq!(lowest_common_ancestor(&ui, leaf, leaf), Some(leaf));
        assert_eq!(lowest_common_ancestor(&ui, leaf, stranger), None);
    }

    #[test]
    fn test_handler_may_destroy_route() {
        let mut ui = Ui::new();
        let (root, mid, leaf, _) = tree(&mut ui);
        let log = Log::default();
        record(&ui, root, "root", &log);
        ui.control_events(leaf)
            .unwrap()
            .mouse_move
            .bubble
            .add_handler(move |ui, _: &mut MouseEventArgs| {
                ui.destroy_control(mid).unwrap();
            });

        move_event(&mut ui, leaf, None);
        assert!(!ui.control_tree().contains(leaf));
        assert_eq!(*log.borrow(), vec!["tunnel root", "bubble root", "direct root"]);
    }
}
