use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{
    due_after, CareType, NewPlant, PlantRecord, DEFAULT_FERTILIZE_INTERVAL_DAYS,
    DEFAULT_WATERING_INTERVAL_DAYS,
};
use crate::storage::{Storage, StorageError};

/// Storage key holding the serialized plant collection.
pub const PLANTS_KEY: &str = "plants";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Missing required field: {0}")]
    Validation(&'static str),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Sole authority over the plant collection and its durability.
///
/// The whole collection is the unit of persistence: every mutation rewrites
/// the serialized array under the `plants` key in the same call, so the
/// durable state always reflects either the previous or the current
/// collection, never a partial one. Nothing else writes that key.
pub struct PlantStore {
    storage: Storage,
    plants: Vec<PlantRecord>,
}

impl PlantStore {
    /// Load the persisted collection. Absent or unparsable state falls back
    /// to an empty collection; this never fails.
    pub fn load(storage: Storage) -> Self {
        let plants = match storage.get(PLANTS_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(plants) => plants,
                Err(e) => {
                    log::warn!("Discarding unparsable plant collection: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Failed to read plant collection, starting empty: {}", e);
                Vec::new()
            }
        };
        Self { storage, plants }
    }

    /// Ordered read-only view of the collection. Insertion order is the
    /// display order.
    pub fn snapshot(&self) -> &[PlantRecord] {
        &self.plants
    }

    /// Validate the supplied fields, create a record with fresh reminder
    /// timestamps, append it and persist.
    pub fn add(&mut self, fields: NewPlant, now: DateTime<Utc>) -> StoreResult<PlantRecord> {
        if fields.name.is_empty() {
            return Err(StoreError::Validation("name"));
        }
        if fields.plant_type.is_empty() {
            return Err(StoreError::Validation("type"));
        }
        if fields.image.is_empty() {
            return Err(StoreError::Validation("image"));
        }

        let watering_interval_days = fields
            .watering_interval_days
            .unwrap_or(DEFAULT_WATERING_INTERVAL_DAYS);
        let fertilize_interval_days = fields
            .fertilize_interval_days
            .unwrap_or(DEFAULT_FERTILIZE_INTERVAL_DAYS);

        let record = PlantRecord {
            id: self.next_id(now),
            name: fields.name,
            plant_type: fields.plant_type,
            watering_notes: fields.watering_notes,
            image: fields.image,
            watering_interval_days,
            fertilize_interval_days,
            next_watering_at: Some(due_after(now, watering_interval_days)),
            next_fertilize_at: Some(due_after(now, fertilize_interval_days)),
        };

        self.plants.push(record.clone());
        if let Err(e) = self.persist() {
            self.plants.pop();
            return Err(e);
        }
        log::debug!("Added plant {} ({})", record.id, record.name);
        Ok(record)
    }

    /// Remove the matching record. Returns whether a record was removed;
    /// an unknown id is a no-op, not an error.
    pub fn remove(&mut self, id: i64) -> StoreResult<bool> {
        let before = self.plants.len();
        self.plants.retain(|p| p.id != id);
        if self.plants.len() == before {
            return Ok(false);
        }
        self.persist()?;
        log::debug!("Removed plant {}", id);
        Ok(true)
    }

    /// Reset the watering reminder to one interval past `now`.
    pub fn mark_watered(&mut self, id: i64, now: DateTime<Utc>) -> StoreResult<bool> {
        self.mark_done(id, CareType::Watering, now)
    }

    /// Reset the fertilizing reminder to one interval past `now`.
    pub fn mark_fertilized(&mut self, id: i64, now: DateTime<Utc>) -> StoreResult<bool> {
        self.mark_done(id, CareType::Fertilizing, now)
    }

    fn mark_done(&mut self, id: i64, care: CareType, now: DateTime<Utc>) -> StoreResult<bool> {
        let Some(plant) = self.plants.iter_mut().find(|p| p.id == id) else {
            // Unknown id is a soft no-op.
            return Ok(false);
        };

        let next = due_after(now, plant.interval_days(care));
        match care {
            CareType::Watering => plant.next_watering_at = Some(next),
            CareType::Fertilizing => plant.next_fertilize_at = Some(next),
        }
        self.persist()?;
        log::debug!("Marked plant {} {} until {}", id, care, next);
        Ok(true)
    }

    /// Ids come from the millisecond clock, bumped to stay strictly above
    /// every existing id so two adds within the same millisecond (or a
    /// backwards clock step) still produce unique, increasing ids.
    fn next_id(&self, now: DateTime<Utc>) -> i64 {
        let max_existing = self.plants.iter().map(|p| p.id).max().unwrap_or(0);
        now.timestamp_millis().max(max_existing + 1)
    }

    fn persist(&self) -> StoreResult<()> {
        let json = serde_json::to_string(&self.plants)?;
        self.storage.put(PLANTS_KEY, &json)?;
        Ok(())
    }
}
