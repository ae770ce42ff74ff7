//! Integration tests for hover, capture, focus and cursor handling driven by
//! native events on a headless window.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use trellis::host::{HeadlessState, HeadlessWindow, NativeEvent, WindowHostConfig};
use trellis::prelude::*;
use winit::keyboard::KeyCode;

type Log = Rc<RefCell<Vec<String>>>;

struct Fixture {
    ui: Ui,
    host: WindowHostId,
    state: Rc<RefCell<HeadlessState>>,
    root: ControlId,
    /// 50x50 at the origin.
    a: ControlId,
    /// 30x30 inside `a`, at (10, 10).
    a1: ControlId,
    /// 50x50 at (100, 0).
    b: ControlId,
}

/// A container occupying `(x, y, w, h)` of its parent's content.
fn place(ui: &mut Ui, parent: ControlId, x: f32, y: f32, w: f32, h: f32) -> ControlId {
    let control = ui.create_container();
    let render = ui.control(control).unwrap().root_render();
    ui.set_margin(render, Thickness::new(x, y, 0.0, 0.0)).unwrap();
    ui.set_preferred_size(render, MeasureSize::new(x + w, y + h))
        .unwrap();
    let position = ui.control(parent).unwrap().children().len();
    ui.add_child(parent, control, position).unwrap();
    control
}

fn fixture() -> Fixture {
    let mut ui = Ui::new();
    let window = HeadlessWindow::new(Size::new(200.0, 100.0));
    let state = window.state();
    let host = ui.create_window(Some(Box::new(window)), WindowHostConfig::new());
    let root = ui.window_host(host).unwrap().root_control();
    let a = place(&mut ui, root, 0.0, 0.0, 50.0, 50.0);
    let a1 = place(&mut ui, a, 10.0, 10.0, 30.0, 30.0);
    let b = place(&mut ui, root, 100.0, 0.0, 50.0, 50.0);
    ui.process_all_tasks();
    Fixture {
        ui,
        host,
        state,
        root,
        a,
        a1,
        b,
    }
}

impl Fixture {
    fn send(&mut self, event: NativeEvent) {
        self.ui.handle_native_event(self.host, event).unwrap();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.state.borrow_mut().mouse_position = Some(Point::new(x, y));
        self.send(NativeEvent::MouseMove(Point::new(x, y)));
    }

    fn hover(&self) -> Option<ControlId> {
        self.ui.window_host(self.host).unwrap().mouse_hover_control()
    }

    /// Record enter, leave and move as seen by `control`'s direct handlers.
    fn record_mouse(&self, control: ControlId, label: &'static str, log: &Log) {
        let events = self.ui.control_events(control).unwrap();
        let l = log.clone();
        events
            .mouse_enter
            .direct
            .add_handler(move |_, _: &mut MouseEventArgs| l.borrow_mut().push(format!("enter {label}")));
        let l = log.clone();
        events
            .mouse_leave
            .direct
            .add_handler(move |_, _: &mut MouseEventArgs| l.borrow_mut().push(format!("leave {label}")));
        let l = log.clone();
        events
            .mouse_move
            .direct
            .add_handler(move |_, _: &mut MouseEventArgs| l.borrow_mut().push(format!("move {label}")));
    }

    fn record_all(&self, log: &Log) {
        self.record_mouse(self.root, "root", log);
        self.record_mouse(self.a, "a", log);
        self.record_mouse(self.a1, "a1", log);
        self.record_mouse(self.b, "b", log);
    }
}

fn counts(log: &Log) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for entry in log.borrow().iter() {
        *counts.entry(entry.clone()).or_insert(0) += 1;
    }
    counts
}

fn assert_paired(log: &Log, labels: &[&str]) {
    let counts = counts(log);
    for label in labels {
        let enters = counts.get(&format!("enter {label}")).copied().unwrap_or(0);
        let leaves = counts.get(&format!("leave {label}")).copied().unwrap_or(0);
        assert_eq!(enters, leaves, "enter/leave mismatch for {label}: {:?}", log.borrow());
    }
}

#[test]
fn test_hit_testing_finds_deepest_control() {
    let mut f = fixture();
    f.move_to(20.0, 20.0);
    assert_eq!(f.hover(), Some(f.a1));
    f.move_to(5.0, 5.0);
    assert_eq!(f.hover(), Some(f.a));
    f.move_to(120.0, 20.0);
    assert_eq!(f.hover(), Some(f.b));
    f.move_to(180.0, 80.0);
    assert_eq!(f.hover(), Some(f.root));
}

#[test]
fn test_move_between_unrelated_controls() {
    let mut f = fixture();
    f.move_to(5.0, 5.0);
    let log = Log::default();
    f.record_all(&log);

    f.move_to(120.0, 20.0);
    assert_eq!(*log.borrow(), vec!["leave a", "enter b", "move b", "move root"]);
}

#[test]
fn test_first_move_enters_whole_chain() {
    let mut f = fixture();
    let log = Log::default();
    f.record_all(&log);

    f.move_to(20.0, 20.0);
    assert_eq!(
        *log.borrow(),
        vec!["enter a1", "enter a", "enter root", "move a1", "move a", "move root"]
    );
    assert!(f.ui.is_mouse_over(f.a1));
    assert!(f.ui.is_mouse_over(f.a));
    assert!(f.ui.is_mouse_over(f.root));
    assert!(!f.ui.is_mouse_over(f.b));
}

#[test]
fn test_enter_leave_pairing_over_moves() {
    let mut f = fixture();
    let log = Log::default();
    f.record_all(&log);

    for (x, y) in [
        (20.0, 20.0),
        (5.0, 5.0),
        (120.0, 20.0),
        (180.0, 80.0),
        (15.0, 15.0),
        (130.0, 40.0),
        (25.0, 25.0),
    ] {
        f.move_to(x, y);
    }
    f.send(NativeEvent::MouseLeave);

    assert_paired(&log, &["root", "a", "a1", "b"]);
    assert_eq!(f.hover(), None);
    assert!(!f.ui.is_mouse_over(f.root));
    assert!(!f.ui.is_mouse_over(f.a1));
}

#[test]
fn test_capture_is_exclusive() {
    let mut f = fixture();
    assert_eq!(f.ui.capture_mouse(f.a), Ok(true));
    assert_eq!(f.ui.capture_mouse(f.b), Ok(false));
    assert!(f.ui.is_mouse_captured(f.a));
    assert!(!f.ui.is_mouse_captured(f.b));
    assert_eq!(f.ui.capture_mouse(f.a), Ok(true));
    assert!(f.state.borrow().captured);

    assert_eq!(f.ui.release_mouse(f.b), Ok(false));
    assert!(f.ui.is_mouse_captured(f.a));
    assert_eq!(f.ui.release_mouse(f.a), Ok(true));
    assert!(!f.state.borrow().captured);
    assert_eq!(f.ui.capture_mouse_for(f.host, None), Ok(true));
    assert_eq!(f.ui.capture_mouse(f.b), Ok(true));
}

#[test]
fn test_captured_control_receives_pointer_input() {
    let mut f = fixture();
    f.move_to(20.0, 20.0);
    f.ui.capture_mouse(f.b).unwrap();

    let downs = Rc::new(RefCell::new(Vec::new()));
    for control in [f.a1, f.b] {
        let d = downs.clone();
        f.ui.control_events(control)
            .unwrap()
            .mouse_down
            .direct
            .add_handler(move |_, args: &mut MouseButtonEventArgs| {
                d.borrow_mut().push((args.sender(), args.button))
            });
    }

    f.send(NativeEvent::MouseDown {
        button: MouseButton::Left,
        point: Point::new(20.0, 20.0),
        modifiers: KeyModifiers::NONE,
    });
    assert_eq!(*downs.borrow(), vec![(f.b, MouseButton::Left)]);

    f.ui.release_mouse(f.b).unwrap();
    f.send(NativeEvent::MouseDown {
        button: MouseButton::Right,
        point: Point::new(20.0, 20.0),
        modifiers: KeyModifiers::NONE,
    });
    assert_eq!(downs.borrow().last(), Some(&(f.a1, MouseButton::Right)));
}

#[test]
fn test_capture_keeps_hover_consistent() {
    let mut f = fixture();
    let log = Log::default();
    f.record_all(&log);

    f.move_to(20.0, 20.0);
    log.borrow_mut().clear();

    // Capturing elsewhere leaves the part of the hover chain not shared
    // with the captured control.
    f.ui.capture_mouse(f.b).unwrap();
    assert_eq!(*log.borrow(), vec!["leave a1", "leave a"]);
    log.borrow_mut().clear();

    f.move_to(15.0, 15.0);
    assert_eq!(*log.borrow(), vec!["move b", "move root"]);
    log.borrow_mut().clear();

    f.move_to(120.0, 20.0);
    assert_eq!(*log.borrow(), vec!["enter b", "move b", "move root"]);
    log.borrow_mut().clear();

    f.move_to(20.0, 20.0);
    assert_eq!(*log.borrow(), vec!["leave b", "move b", "move root"]);
    log.borrow_mut().clear();

    // Releasing while over a1 enters the hover chain below the common
    // ancestor.
    f.ui.release_mouse(f.b).unwrap();
    assert_eq!(*log.borrow(), vec!["enter a1", "enter a"]);
    assert!(f.ui.is_mouse_over(f.a1));
    assert!(!f.ui.is_mouse_over(f.b));
}

#[test]
fn test_pairing_survives_capture_cycles() {
    let mut f = fixture();
    let log = Log::default();
    f.record_all(&log);

    f.move_to(20.0, 20.0);
    f.ui.capture_mouse(f.a1).unwrap();
    f.move_to(120.0, 20.0);
    f.move_to(180.0, 80.0);
    f.ui.release_mouse(f.a1).unwrap();
    f.move_to(5.0, 5.0);
    f.ui.capture_mouse(f.b).unwrap();
    f.move_to(25.0, 25.0);
    f.send(NativeEvent::MouseLeave);
    f.ui.release_mouse(f.b).unwrap();
    f.move_to(130.0, 10.0);
    f.send(NativeEvent::MouseLeave);

    assert_paired(&log, &["root", "a", "a1", "b"]);
}

#[test]
fn test_cursor_resolution() {
    let mut f = fixture();
    f.ui.set_cursor(f.a, Some(CursorShape::Hand)).unwrap();

    f.move_to(20.0, 20.0);
    assert_eq!(f.state.borrow().cursor, CursorShape::Hand);
    f.move_to(120.0, 20.0);
    assert_eq!(f.state.borrow().cursor, CursorShape::Arrow);

    f.ui.set_override_cursor(f.host, Some(CursorShape::Wait)).unwrap();
    assert_eq!(f.state.borrow().cursor, CursorShape::Wait);
    f.move_to(20.0, 20.0);
    assert_eq!(f.state.borrow().cursor, CursorShape::Wait);
    f.ui.set_override_cursor(f.host, None).unwrap();
    assert_eq!(f.state.borrow().cursor, CursorShape::Hand);

    // The captured control's cursor wins over the hovered one.
    f.ui.set_cursor(f.b, Some(CursorShape::IBeam)).unwrap();
    f.ui.capture_mouse(f.b).unwrap();
    assert_eq!(f.state.borrow().cursor, CursorShape::IBeam);
    f.ui.release_mouse(f.b).unwrap();
    assert_eq!(f.state.borrow().cursor, CursorShape::Hand);
}

#[test]
fn test_focus_routing() {
    let mut f = fixture();
    let log = Log::default();
    for (control, label) in [(f.root, "root"), (f.a, "a"), (f.a1, "a1")] {
        let events = f.ui.control_events(control).unwrap();
        let l = log.clone();
        events
            .gain_focus
            .direct
            .add_handler(move |_, args: &mut FocusChangeEventArgs| {
                l.borrow_mut().push(format!("gain {label} {}", args.is_window))
            });
        let l = log.clone();
        events
            .lose_focus
            .direct
            .add_handler(move |_, args: &mut FocusChangeEventArgs| {
                l.borrow_mut().push(format!("lose {label} {}", args.is_window))
            });
        let l = log.clone();
        events.key_down.bubble.add_handler(move |_, args: &mut KeyEventArgs| {
            l.borrow_mut().push(format!("key {label} {:?}", args.key))
        });
    }

    assert!(f.ui.has_focus(f.root));
    f.ui.set_focus(f.a1).unwrap();
    assert_eq!(
        *log.borrow(),
        vec![
            "lose root false",
            "gain a1 false",
            "gain a false",
            "gain root false"
        ]
    );
    assert!(f.ui.has_focus(f.a1));
    assert!(f.state.borrow().focused);

    log.borrow_mut().clear();
    f.ui.set_focus(f.a1).unwrap();
    assert!(log.borrow().is_empty());

    f.send(NativeEvent::FocusChanged(false));
    assert_eq!(log.borrow().first().map(String::as_str), Some("lose a1 true"));

    log.borrow_mut().clear();
    f.send(NativeEvent::KeyDown {
        key: KeyCode::KeyA,
        modifiers: KeyModifiers::NONE,
    });
    assert_eq!(*log.borrow(), vec!["key a1 KeyA", "key a KeyA", "key root KeyA"]);
}

#[test]
fn test_handled_key_stops_bubbling() {
    let mut f = fixture();
    f.ui.set_focus(f.a1).unwrap();
    let reached_root = Rc::new(RefCell::new(false));

    f.ui.control_events(f.a)
        .unwrap()
        .key_down
        .bubble
        .add_handler(|_, args: &mut KeyEventArgs| args.set_handled());
    let r = reached_root.clone();
    f.ui.control_events(f.root)
        .unwrap()
        .key_down
        .bubble
        .add_handler(move |_, _: &mut KeyEventArgs| *r.borrow_mut() = true);

    f.send(NativeEvent::KeyDown {
        key: KeyCode::Enter,
        modifiers: KeyModifiers::NONE,
    });
    assert!(!*reached_root.borrow());
}

#[test]
fn test_removing_hovered_subtree_resets_host_state() {
    let mut f = fixture();
    let log = Log::default();
    f.move_to(20.0, 20.0);
    f.ui.set_focus(f.a1).unwrap();
    f.ui.capture_mouse(f.a1).unwrap();
    f.record_all(&log);

    f.ui.remove_from_parent(f.a).unwrap();

    let host = f.ui.window_host(f.host).unwrap();
    assert_eq!(host.mouse_hover_control(), Some(f.root));
    assert_eq!(host.mouse_captured_control(), None);
    assert_eq!(host.focus_control(), f.root);
    assert!(!f.state.borrow().captured);
    assert!(log.borrow().is_empty());
    assert!(!f.ui.is_mouse_over(f.a1));
    assert_eq!(f.ui.control_host(f.a1), None);
}

#[test]
fn test_mouse_args_convert_to_content_space() {
    let mut f = fixture();
    let seen = Rc::new(RefCell::new(None));
    let s = seen.clone();
    f.ui.control_events(f.a1)
        .unwrap()
        .mouse_move
        .bubble
        .add_handler(move |ui, args: &mut MouseEventArgs| {
            *s.borrow_mut() = args.point_to_content(ui);
        });

    f.move_to(25.0, 30.0);
    assert_eq!(*seen.borrow(), Some(Point::new(15.0, 20.0)));
}
