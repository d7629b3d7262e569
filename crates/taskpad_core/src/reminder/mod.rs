//! Due-date reminder scheduling.
//!
//! # Responsibility
//! - Compute the reminder window for a task's due date.
//! - Arm cancellable one-shot timers that raise notifications through the
//!   notifier port.
//!
//! # Invariants
//! - A timer is armed only when `0 < delay < 86_400_000 ms`.
//! - A cancelled timer never fires; a fired timer ignores cancellation.

use crate::model::task::Task;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use log::info;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Forward window within which a reminder is armed.
const DUE_WINDOW_MS: i64 = 86_400_000;
/// Fixed notification title.
pub const NOTIFICATION_TITLE: &str = "Reminder";
/// Icon reference forwarded to the notifier.
pub const NOTIFICATION_ICON: &str =
    "https://cdn-icons-png.flaticon.com/512/4436/4436481.png";

/// Outcome of the notifier permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// The hosting environment has no notification capability at all.
    Unsupported,
}

/// Notification delivery port.
///
/// Implementations own the platform prompt and delivery mechanics; the
/// scheduler only sequences them. Both methods run on the timer worker
/// thread, never on the caller's.
pub trait Notifier: Send + Sync {
    /// Resolves the permission prompt.
    fn permission(&self) -> Permission;
    /// Raises one notification. Best-effort; failures stay in the port.
    fn notify(&self, title: &str, body: &str, icon: &str);
}

/// Delay from `now` until `date` at 09:00 local, when inside the window.
///
/// Returns `None` for empty or malformed dates, thresholds already past,
/// and thresholds a full day or more ahead.
pub fn reminder_delay(date: &str, now: DateTime<Local>) -> Option<Duration> {
    let due_day = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let due_at = Local
        .from_local_datetime(&due_day.and_hms_opt(9, 0, 0)?)
        .single()?;
    let delay_ms = due_at.signed_duration_since(now).num_milliseconds();
    if delay_ms > 0 && delay_ms < DUE_WINDOW_MS {
        Some(Duration::from_millis(delay_ms as u64))
    } else {
        None
    }
}

/// Handle to a pending one-shot reminder.
pub struct ReminderHandle {
    cancel_tx: Sender<()>,
    worker: JoinHandle<()>,
}

impl ReminderHandle {
    /// Cancels the pending reminder and waits for its worker to wind down.
    ///
    /// A no-op when the timer already fired.
    pub fn cancel(self) {
        let _ = self.cancel_tx.send(());
        let _ = self.worker.join();
    }

    /// Waits for the timer to resolve without cancelling it.
    pub fn wait(self) {
        let Self { cancel_tx, worker } = self;
        let _ = worker.join();
        // The sender must outlive the join so the worker times out
        // instead of observing a disconnect.
        drop(cancel_tx);
    }
}

/// Arms a one-shot reminder for `task` when its due window applies.
///
/// Returns `None` without side effects when the date is unset, malformed,
/// past, or outside the one-day window. The permission prompt resolves on
/// the worker thread; a denied or unsupported outcome ends the worker
/// silently before any timing starts.
pub fn schedule(
    task: &Task,
    now: DateTime<Local>,
    notifier: Arc<dyn Notifier>,
) -> Option<ReminderHandle> {
    let delay = reminder_delay(&task.date, now)?;
    info!(
        "event=reminder_armed module=reminder status=ok delay_ms={}",
        delay.as_millis()
    );
    Some(arm(delay, format!("Task due today: {}", task.text), notifier))
}

fn arm(delay: Duration, body: String, notifier: Arc<dyn Notifier>) -> ReminderHandle {
    let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
    let worker = thread::spawn(move || {
        if notifier.permission() != Permission::Granted {
            return;
        }
        let started = Instant::now();
        match cancel_rx.recv_timeout(delay) {
            Ok(()) => return,
            Err(RecvTimeoutError::Disconnected) => {
                // The handle is gone, so nothing can cancel any more;
                // sleep out whatever remains of the delay.
                if let Some(rest) = delay.checked_sub(started.elapsed()) {
                    thread::sleep(rest);
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
        }
        notifier.notify(NOTIFICATION_TITLE, &body, NOTIFICATION_ICON);
    });

    ReminderHandle { cancel_tx, worker }
}
