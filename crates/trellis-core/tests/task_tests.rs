//! Integration tests for signals and the deferred task queue.

use std::cell::RefCell;
use std::rc::Rc;

use trellis_core::{Signal, TaskContext, TaskQueue};

#[derive(Default)]
struct App {
    log: Vec<String>,
    tasks: TaskQueue<App>,
    changed: Rc<Signal<u32>>,
}

impl TaskContext for App {
    fn task_queue(&mut self) -> &mut TaskQueue<Self> {
        &mut self.tasks
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

#[test]
fn test_tasks_posted_by_tasks_run_in_same_drain() {
    init_tracing();
    let mut app = App::default();
    app.tasks.post(|app: &mut App| {
        app.log.push("first".into());
        app.tasks.post(|app: &mut App| app.log.push("nested".into()));
    });
    app.tasks.post(|app: &mut App| app.log.push("second".into()));

    assert_eq!(app.process_all_tasks(), 3);
    assert_eq!(app.log, ["first", "second", "nested"]);
    assert!(!app.tasks.has_pending());
}

#[test]
fn test_limit_leaves_remaining_tasks_queued() {
    init_tracing();
    let mut app = App::default();
    for i in 0..4 {
        app.tasks.post(move |app: &mut App| app.log.push(i.to_string()));
    }
    assert_eq!(app.process_tasks(3), 3);
    assert_eq!(app.tasks.pending_count(), 1);
    assert_eq!(app.process_all_tasks(), 1);
    assert_eq!(app.log, ["0", "1", "2", "3"]);
}

#[test]
fn test_signal_slot_may_disconnect_during_emit() {
    init_tracing();
    let app = App::default();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let signal = app.changed.clone();

    let id = Rc::new(RefCell::new(None));
    let (s, i, weak) = (seen.clone(), id.clone(), Rc::downgrade(&signal));
    let conn = signal.connect(move |v: &u32| {
        s.borrow_mut().push(*v);
        if let (Some(signal), Some(id)) = (weak.upgrade(), *i.borrow()) {
            signal.disconnect(id);
        }
    });
    *id.borrow_mut() = Some(conn);

    signal.emit(1);
    signal.emit(2);
    assert_eq!(*seen.borrow(), [1]);
    assert_eq!(signal.connection_count(), 0);
}
