//! Reminder scheduling.
//!
//! Due-ness is derived, never stored: each poll recomputes the due set from
//! the store's current snapshot. A (plant, care type) pair is PENDING while
//! its next-due timestamp is in the future and DUE once the poll observes
//! the threshold crossed; only the matching mark-done on the store moves it
//! back to PENDING. Records without a timestamp are never due.

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, select, tick, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::models::{CareType, DueItem, PlantRecord};
use crate::store::PlantStore;

/// How often the poller re-evaluates the due set.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Compute the due set at `now` from a collection snapshot.
///
/// Pure and idempotent: identical inputs yield identical due sets, so tests
/// can drive it directly without a timer. Output order follows the
/// collection order, watering before fertilizing per record.
pub fn tick_due(now: DateTime<Utc>, plants: &[PlantRecord]) -> Vec<DueItem> {
    let mut due = Vec::new();
    for plant in plants {
        for care in [CareType::Watering, CareType::Fertilizing] {
            if let Some(due_at) = plant.next_due_at(care) {
                if due_at <= now {
                    due.push(DueItem {
                        plant_id: plant.id,
                        plant_name: plant.name.clone(),
                        care,
                        due_at,
                    });
                }
            }
        }
    }
    due
}

/// Best-effort side channel to the environment's alerting mechanism.
///
/// Failures are reported to the caller only so they can be logged; they
/// never affect the due set or the store.
pub trait Notifier: Send + Sync {
    fn notify(&self, item: &DueItem) -> Result<(), NotifyError>;
}

#[derive(Debug)]
pub struct NotifyError(pub String);

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Notification failed: {}", self.0)
    }
}

impl std::error::Error for NotifyError {}

/// Notifier that writes reminders to the log. The default when no
/// platform alerting is wired up.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, item: &DueItem) -> Result<(), NotifyError> {
        log::info!("Reminder: '{}' needs {}", item.plant_name, item.care);
        Ok(())
    }
}

/// Background driver that calls [`tick_due`] with the wall clock on a fixed
/// interval and pushes the resulting due set through a [`Notifier`].
///
/// The timer is an explicit, cancellable task: `stop()` interrupts the tick
/// and joins the thread, so teardown never waits for the next interval.
pub struct Poller {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn start(
        store: Arc<Mutex<PlantStore>>,
        notifier: Arc<dyn Notifier>,
        interval: Duration,
    ) -> Self {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let ticker = tick(interval);

        let handle = std::thread::spawn(move || loop {
            select! {
                recv(ticker) -> _ => {
                    let now = Utc::now();
                    let due = {
                        let store = store.lock().unwrap();
                        tick_due(now, store.snapshot())
                    };
                    for item in &due {
                        if let Err(e) = notifier.notify(item) {
                            log::warn!("{}", e);
                        }
                    }
                }
                recv(stop_rx) -> _ => break,
            }
        });

        Self {
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Cancel the poll timer and wait for the thread to exit.
    pub fn stop(mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
