// ==========================================
// GPL Cart - store repository
// ==========================================

use crate::domain::Store;
use crate::repository::database::{to_record, Database, Executor};
use crate::repository::error::RepositoryResult;
use crate::repository::query::{Conditions, QueryOptions};

const TABLE: &str = "store";

pub struct StoreRepository {
    db: Database,
}

impl StoreRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn find_tx(ex: &Executor, store_id: i64) -> RepositoryResult<Option<Store>> {
        ex.fetch_as(TABLE, &Conditions::new().eq("store_id", store_id))
    }

    pub fn exists_tx(ex: &Executor, store_id: i64) -> RepositoryResult<bool> {
        ex.exists(TABLE, &Conditions::new().eq("store_id", store_id))
    }

    pub fn find(&self, store_id: i64) -> RepositoryResult<Option<Store>> {
        self.db.with(|ex| Self::find_tx(ex, store_id))
    }

    pub fn list(&self) -> RepositoryResult<Vec<Store>> {
        self.db.with(|ex| {
            ex.fetch_all_as(TABLE, &Conditions::new(), &QueryOptions::new().order_by("store_id"))
        })
    }

    /// Insert a store (store_id 0 = auto)
    pub fn insert(&self, store: &Store) -> RepositoryResult<i64> {
        let record = to_record(store)?;
        self.db.insert(TABLE, &record)
    }
}
