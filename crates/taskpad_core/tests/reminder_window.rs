use chrono::{Duration as ChronoDuration, Local, TimeZone};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use taskpad_core::{reminder_delay, schedule, Notifier, Permission, Task, NOTIFICATION_TITLE};

#[derive(Default)]
struct CountingNotifier {
    permission: Option<Permission>,
    fired: AtomicUsize,
    last: Mutex<Option<(String, String)>>,
}

impl Notifier for CountingNotifier {
    fn permission(&self) -> Permission {
        self.permission.unwrap_or(Permission::Granted)
    }

    fn notify(&self, title: &str, body: &str, _icon: &str) {
        self.fired.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((title.to_string(), body.to_string()));
    }
}

fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

#[test]
fn early_morning_of_the_due_date_is_in_the_window() {
    let now = local(2030, 5, 5, 1, 0, 0);
    let delay = reminder_delay("2030-05-05", now).unwrap();
    assert_eq!(delay, Duration::from_secs(8 * 3600));
}

#[test]
fn the_evening_before_is_in_the_window() {
    let now = local(2030, 5, 4, 20, 0, 0);
    let delay = reminder_delay("2030-05-05", now).unwrap();
    assert_eq!(delay, Duration::from_secs(13 * 3600));
}

#[test]
fn the_threshold_itself_and_past_dates_never_schedule() {
    assert_eq!(reminder_delay("2030-05-05", local(2030, 5, 5, 9, 0, 0)), None);
    assert_eq!(
        reminder_delay("2030-05-05", local(2030, 5, 5, 10, 0, 0)),
        None
    );
    assert_eq!(reminder_delay("2020-01-01", local(2030, 5, 5, 8, 0, 0)), None);
}

#[test]
fn a_full_day_ahead_is_outside_the_window() {
    // Exactly 24h falls out; one second inside the window is accepted.
    assert_eq!(reminder_delay("2030-05-06", local(2030, 5, 5, 9, 0, 0)), None);
    assert!(reminder_delay("2030-05-06", local(2030, 5, 5, 9, 0, 1)).is_some());
}

#[test]
fn empty_and_malformed_dates_never_schedule() {
    let now = local(2030, 5, 5, 8, 0, 0);
    assert_eq!(reminder_delay("", now), None);
    assert_eq!(reminder_delay("2030-5-5", now), None);
    assert_eq!(reminder_delay("tomorrow", now), None);
}

#[test]
fn armed_timer_fires_once_with_the_task_text() {
    let task = Task::new("standup", "2030-05-05", "", "").unwrap();
    let now = local(2030, 5, 5, 9, 0, 0) - ChronoDuration::milliseconds(40);
    let notifier = Arc::new(CountingNotifier::default());

    let handle = schedule(&task, now, notifier.clone()).unwrap();
    handle.wait();

    assert_eq!(notifier.fired.load(Ordering::SeqCst), 1);
    let last = notifier.last.lock().unwrap().clone().unwrap();
    assert_eq!(last.0, NOTIFICATION_TITLE);
    assert_eq!(last.1, "Task due today: standup");
}

#[test]
fn cancel_prevents_the_timer_from_firing() {
    let task = Task::new("cancelled", "2030-05-05", "", "").unwrap();
    let now = local(2030, 5, 5, 9, 0, 0) - ChronoDuration::seconds(30);
    let notifier = Arc::new(CountingNotifier::default());

    let handle = schedule(&task, now, notifier.clone()).unwrap();
    handle.cancel();

    assert_eq!(notifier.fired.load(Ordering::SeqCst), 0);
}

#[test]
fn denied_permission_is_a_silent_no_op() {
    let task = Task::new("quiet", "2030-05-05", "", "").unwrap();
    let now = local(2030, 5, 5, 9, 0, 0) - ChronoDuration::milliseconds(20);
    let notifier = Arc::new(CountingNotifier {
        permission: Some(Permission::Denied),
        ..CountingNotifier::default()
    });

    let handle = schedule(&task, now, notifier.clone()).unwrap();
    handle.wait();

    assert_eq!(notifier.fired.load(Ordering::SeqCst), 0);
}

#[test]
fn unsupported_environment_is_a_silent_no_op() {
    let task = Task::new("nowhere", "2030-05-05", "", "").unwrap();
    let now = local(2030, 5, 5, 9, 0, 0) - ChronoDuration::milliseconds(20);
    let notifier = Arc::new(CountingNotifier {
        permission: Some(Permission::Unsupported),
        ..CountingNotifier::default()
    });

    let handle = schedule(&task, now, notifier.clone()).unwrap();
    handle.wait();

    assert_eq!(notifier.fired.load(Ordering::SeqCst), 0);
}
