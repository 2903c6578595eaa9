// ==========================================
// GPL Cart - product repository
// ==========================================
// Constraint: sku is unique within a store (checked here, not by SQLite,
// because empty SKUs are allowed until one is generated)
// ==========================================

use crate::domain::Product;
use crate::repository::database::{Database, Executor, Record};
use crate::repository::error::RepositoryResult;
use crate::repository::query::{Conditions, QueryOptions};
use serde_json::Value;

const TABLE: &str = "product";

pub struct ProductRepository {
    db: Database,
}

impl ProductRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // ===== transactional helpers =====

    pub fn find_tx(ex: &Executor, product_id: i64) -> RepositoryResult<Option<Product>> {
        ex.fetch_as(TABLE, &Conditions::new().eq("product_id", product_id))
    }

    pub fn exists_tx(ex: &Executor, product_id: i64) -> RepositoryResult<bool> {
        ex.exists(TABLE, &Conditions::new().eq("product_id", product_id))
    }

    pub fn find_by_sku_tx(
        ex: &Executor,
        store_id: i64,
        sku: &str,
    ) -> RepositoryResult<Option<Product>> {
        ex.fetch_as(
            TABLE,
            &Conditions::new().eq("store_id", store_id).eq("sku", sku),
        )
    }

    /// Whether another product of the store already uses `sku`
    pub fn sku_taken_tx(
        ex: &Executor,
        store_id: i64,
        sku: &str,
        exclude_product_id: Option<i64>,
    ) -> RepositoryResult<bool> {
        let mut conditions = Conditions::new().eq("store_id", store_id).eq("sku", sku);
        if let Some(id) = exclude_product_id {
            conditions = conditions.ne("product_id", id);
        }
        ex.exists(TABLE, &conditions)
    }

    pub fn insert_tx(ex: &Executor, record: &Record) -> RepositoryResult<i64> {
        ex.insert(TABLE, record)
    }

    pub fn update_tx(ex: &Executor, product_id: i64, record: &Record) -> RepositoryResult<usize> {
        ex.update(TABLE, record, &Conditions::new().eq("product_id", product_id))
    }

    /// Fill an empty SKU from the pattern (`%i` = product id)
    ///
    /// A numeric suffix is appended while the generated SKU is taken.
    pub fn generate_sku_tx(
        ex: &Executor,
        product_id: i64,
        store_id: i64,
        pattern: &str,
    ) -> RepositoryResult<String> {
        let base = pattern.replace("%i", &product_id.to_string());
        let mut sku = base.clone();
        let mut suffix = 1;
        while Self::sku_taken_tx(ex, store_id, &sku, Some(product_id))? {
            sku = format!("{}-{}", base, suffix);
            suffix += 1;
        }

        let mut record = Record::new();
        record.insert("sku".to_string(), Value::String(sku.clone()));
        Self::update_tx(ex, product_id, &record)?;
        Ok(sku)
    }

    // ===== shared-connection API =====

    pub fn find(&self, product_id: i64) -> RepositoryResult<Option<Product>> {
        self.db.with(|ex| Self::find_tx(ex, product_id))
    }

    pub fn find_by_sku(&self, store_id: i64, sku: &str) -> RepositoryResult<Option<Product>> {
        self.db.with(|ex| Self::find_by_sku_tx(ex, store_id, sku))
    }

    pub fn list_by_store(&self, store_id: i64) -> RepositoryResult<Vec<Product>> {
        self.db.with(|ex| {
            ex.fetch_all_as(
                TABLE,
                &Conditions::new().eq("store_id", store_id),
                &QueryOptions::new().order_by("product_id"),
            )
        })
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        self.db.count(TABLE, &Conditions::new())
    }

    pub fn delete(&self, product_id: i64) -> RepositoryResult<bool> {
        Ok(self
            .db
            .delete(TABLE, &Conditions::new().eq("product_id", product_id))?
            > 0)
    }
}
