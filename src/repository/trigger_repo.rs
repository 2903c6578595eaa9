// ==========================================
// GPL Cart - trigger repository
// ==========================================
// Conditions live in the `data` blob: {"conditions": [...]}
// ==========================================

use crate::domain::Trigger;
use crate::repository::database::{to_record, Database};
use crate::repository::error::RepositoryResult;
use crate::repository::query::{Conditions, QueryOptions};

const TABLE: &str = "trigger";

pub struct TriggerRepository {
    db: Database,
}

impl TriggerRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a trigger (trigger_id 0 = auto)
    pub fn insert(&self, trigger: &Trigger) -> RepositoryResult<i64> {
        self.db.insert(TABLE, &to_record(trigger)?)
    }

    pub fn update(&self, trigger: &Trigger) -> RepositoryResult<bool> {
        let affected = self.db.update(
            TABLE,
            &to_record(trigger)?,
            &Conditions::new().eq("trigger_id", trigger.trigger_id),
        )?;
        Ok(affected > 0)
    }

    pub fn find(&self, trigger_id: i64) -> RepositoryResult<Option<Trigger>> {
        self.db
            .with(|ex| ex.fetch_as(TABLE, &Conditions::new().eq("trigger_id", trigger_id)))
    }

    /// Triggers of a store ordered by weight
    ///
    /// # Arguments
    /// - enabled_only: skip disabled triggers
    pub fn list_by_store(&self, store_id: i64, enabled_only: bool) -> RepositoryResult<Vec<Trigger>> {
        let mut conditions = Conditions::new().eq("store_id", store_id);
        if enabled_only {
            conditions = conditions.eq("status", 1);
        }
        self.db.with(|ex| {
            ex.fetch_all_as(TABLE, &conditions, &QueryOptions::new().order_by("weight"))
        })
    }

    pub fn delete(&self, trigger_id: i64) -> RepositoryResult<bool> {
        Ok(self
            .db
            .delete(TABLE, &Conditions::new().eq("trigger_id", trigger_id))?
            > 0)
    }
}
