use chrono::{Duration, NaiveDate, NaiveDateTime};
use taskboard_core::{
    scan_due_tasks, AlertedSet, DueAlert, DueAlertMonitor, FixedClock, RecordingAlertSink, Task,
    TaskId, TaskStore,
};

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 4, 2)
        .and_then(|day| day.and_hms_opt(hour, minute, 0))
        .expect("fixture time should be valid")
}

fn task(id: u64, name: &str, deadline: &str) -> Task {
    Task {
        id: TaskId(id),
        name: name.to_string(),
        deadline: deadline.to_string(),
        completed: false,
    }
}

#[test]
fn alerts_once_within_hour_and_never_for_far_or_past() {
    let clock = FixedClock::new(at(18, 30));
    let tasks = vec![
        task(1, "soon", "2025-04-02 | 19:00"),
        task(2, "later", "2025-04-02 | 21:00"),
        task(3, "missed", "2025-04-02 | 17:00"),
    ];
    let mut monitor = DueAlertMonitor::new();
    let mut sink = RecordingAlertSink::new();

    for _ in 0..10 {
        monitor.tick_with(&clock, &tasks, &mut sink);
        clock.advance(Duration::seconds(1));
    }

    assert_eq!(sink.names(), vec!["soon"]);
    assert_eq!(sink.alerts[0].due_in, Duration::minutes(30));
    assert_eq!(sink.alerts[0].message(), "Task \"soon\" is due within 1 hour!");
    assert_eq!(monitor.alerted().iter().collect::<Vec<_>>(), vec![TaskId(1)]);
}

#[test]
fn editing_deadline_into_window_allows_one_alert() {
    let clock = FixedClock::new(at(18, 30));
    let mut store = TaskStore::empty(&clock);
    store
        .add_task("report", "2025-04-02 | 21:30")
        .expect("valid task should be added");
    let id = store.tasks()[0].id;

    let mut monitor = DueAlertMonitor::new();
    let mut sink = RecordingAlertSink::new();
    for _ in 0..3 {
        monitor.tick_with(&clock, store.tasks(), &mut sink);
    }
    assert!(sink.alerts.is_empty());
    assert!(!monitor.alerted().contains(id));

    store
        .edit_task(id, "report", "2025-04-02 | 19:00")
        .expect("valid edit should be applied");
    for _ in 0..5 {
        monitor.tick_with(&clock, store.tasks(), &mut sink);
        clock.advance(Duration::seconds(1));
    }
    assert_eq!(sink.alerts.len(), 1);
    assert_eq!(sink.alerts[0].task_id, id);
}

#[test]
fn task_alerts_when_clock_reaches_window() {
    let clock = FixedClock::new(at(17, 0));
    let tasks = vec![task(1, "standup", "2025-04-02 | 18:30")];
    let mut monitor = DueAlertMonitor::new();
    let mut sink = RecordingAlertSink::new();

    assert_eq!(monitor.tick_with(&clock, &tasks, &mut sink), 0);
    clock.set(at(17, 30));
    assert_eq!(monitor.tick_with(&clock, &tasks, &mut sink), 1);
    clock.set(at(18, 29));
    assert_eq!(monitor.tick_with(&clock, &tasks, &mut sink), 0);
    clock.set(at(19, 0));
    assert_eq!(monitor.tick_with(&clock, &tasks, &mut sink), 0);
    assert_eq!(sink.alerts.len(), 1);
}

#[test]
fn unreadable_deadlines_are_skipped_without_stopping_scan() {
    let tasks = vec![
        task(1, "broken", "2025-04-02 19:00"),
        task(2, "fine", "2025-04-02 | 19:00"),
    ];
    let mut monitor = DueAlertMonitor::new();
    let mut sink = RecordingAlertSink::new();

    assert_eq!(monitor.tick(at(18, 30), &tasks, &mut sink), 1);
    assert_eq!(sink.names(), vec!["fine"]);
}

#[test]
fn scan_is_pure_over_inputs() {
    let tasks = vec![task(1, "soon", "2025-04-02 | 19:00")];
    let previous = AlertedSet::new();

    let first = scan_due_tasks(at(18, 30), &tasks, &previous, Duration::hours(1));
    let again = scan_due_tasks(at(18, 30), &tasks, &previous, Duration::hours(1));
    assert_eq!(first, again);
    assert!(previous.is_empty());

    let carried = scan_due_tasks(at(18, 31), &tasks, &first.alerted, Duration::hours(1));
    assert!(carried.alerts.is_empty());
    assert_eq!(carried.alerted, first.alerted);
}

#[test]
fn completed_tasks_still_alert() {
    let mut done = task(1, "done", "2025-04-02 | 19:00");
    done.completed = true;
    let mut monitor = DueAlertMonitor::new();
    let mut sink = RecordingAlertSink::new();
    assert_eq!(monitor.tick(at(18, 30), &[done], &mut sink), 1);
}

#[test]
fn custom_horizon_and_closure_sink() {
    let tasks = vec![
        task(1, "ten", "2025-04-02 | 18:40"),
        task(2, "twenty", "2025-04-02 | 18:50"),
    ];
    let mut monitor = DueAlertMonitor::with_horizon(Duration::minutes(15));
    let mut messages = Vec::new();
    let mut sink = |alert: &DueAlert| messages.push(alert.message());

    monitor.tick(at(18, 30), &tasks, &mut sink);
    assert_eq!(messages, vec!["Task \"ten\" is due within 15 minutes!".to_string()]);
}

#[test]
fn reset_allows_alerts_again() {
    let tasks = vec![task(1, "soon", "2025-04-02 | 19:00")];
    let mut monitor = DueAlertMonitor::new();
    let mut sink = RecordingAlertSink::new();

    monitor.tick(at(18, 30), &tasks, &mut sink);
    monitor.reset();
    monitor.tick(at(18, 31), &tasks, &mut sink);
    assert_eq!(sink.alerts.len(), 2);
}
