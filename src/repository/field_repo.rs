// ==========================================
// GPL Cart - field / field value repository
// ==========================================

use crate::domain::{Field, FieldValue};
use crate::repository::database::{Database, Executor, Record};
use crate::repository::error::RepositoryResult;
use crate::repository::query::{Conditions, QueryOptions};

const TABLE: &str = "field";
const VALUE_TABLE: &str = "field_value";

pub struct FieldRepository {
    db: Database,
}

impl FieldRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn find_tx(ex: &Executor, field_id: i64) -> RepositoryResult<Option<Field>> {
        ex.fetch_as(TABLE, &Conditions::new().eq("field_id", field_id))
    }

    pub fn exists_tx(ex: &Executor, field_id: i64) -> RepositoryResult<bool> {
        ex.exists(TABLE, &Conditions::new().eq("field_id", field_id))
    }

    pub fn insert_tx(ex: &Executor, record: &Record) -> RepositoryResult<i64> {
        ex.insert(TABLE, record)
    }

    pub fn update_tx(ex: &Executor, field_id: i64, record: &Record) -> RepositoryResult<usize> {
        ex.update(TABLE, record, &Conditions::new().eq("field_id", field_id))
    }

    pub fn find_value_tx(ex: &Executor, field_value_id: i64) -> RepositoryResult<Option<FieldValue>> {
        ex.fetch_as(VALUE_TABLE, &Conditions::new().eq("field_value_id", field_value_id))
    }

    pub fn value_exists_tx(ex: &Executor, field_value_id: i64) -> RepositoryResult<bool> {
        ex.exists(VALUE_TABLE, &Conditions::new().eq("field_value_id", field_value_id))
    }

    pub fn insert_value_tx(ex: &Executor, record: &Record) -> RepositoryResult<i64> {
        ex.insert(VALUE_TABLE, record)
    }

    pub fn update_value_tx(
        ex: &Executor,
        field_value_id: i64,
        record: &Record,
    ) -> RepositoryResult<usize> {
        ex.update(
            VALUE_TABLE,
            record,
            &Conditions::new().eq("field_value_id", field_value_id),
        )
    }

    pub fn find(&self, field_id: i64) -> RepositoryResult<Option<Field>> {
        self.db.with(|ex| Self::find_tx(ex, field_id))
    }

    pub fn list(&self) -> RepositoryResult<Vec<Field>> {
        self.db.with(|ex| {
            ex.fetch_all_as(TABLE, &Conditions::new(), &QueryOptions::new().order_by("weight"))
        })
    }

    /// Values of a field ordered by weight
    pub fn values(&self, field_id: i64) -> RepositoryResult<Vec<FieldValue>> {
        self.db.with(|ex| {
            ex.fetch_all_as(
                VALUE_TABLE,
                &Conditions::new().eq("field_id", field_id),
                &QueryOptions::new().order_by("weight"),
            )
        })
    }
}
