// Plant catalog and care-reminder core for the PlantInfo app.
// The UI layer renders snapshots and feeds field values back in;
// everything durable lives behind these modules.

pub mod accounts;
pub mod models;
pub mod scheduler;
pub mod storage;
pub mod store;

pub use models::{CareType, DueItem, NewPlant, PlantRecord};
pub use scheduler::{tick_due, LogNotifier, Notifier, Poller};
pub use storage::Storage;
pub use store::{PlantStore, StoreError};
