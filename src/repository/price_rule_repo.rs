// ==========================================
// GPL Cart - price rule repository
// ==========================================

use crate::domain::PriceRule;
use crate::repository::database::{to_record, Database};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::query::{Conditions, QueryOptions};
use rusqlite::params;
use tracing::debug;

const TABLE: &str = "price_rule";

pub struct PriceRuleRepository {
    db: Database,
}

impl PriceRuleRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a price rule (price_rule_id 0 = auto)
    pub fn insert(&self, rule: &PriceRule) -> RepositoryResult<i64> {
        self.db.insert(TABLE, &to_record(rule)?)
    }

    pub fn find(&self, price_rule_id: i64) -> RepositoryResult<Option<PriceRule>> {
        self.db.with(|ex| {
            ex.fetch_as(TABLE, &Conditions::new().eq("price_rule_id", price_rule_id))
        })
    }

    /// Enabled rules of a store ordered by weight
    pub fn list_enabled(&self, store_id: i64) -> RepositoryResult<Vec<PriceRule>> {
        self.db.with(|ex| {
            ex.fetch_all_as(
                TABLE,
                &Conditions::new().eq("store_id", store_id).eq("status", 1),
                &QueryOptions::new().order_by("weight"),
            )
        })
    }

    /// Enabled rule carrying exactly this coupon code
    pub fn find_by_code(&self, store_id: i64, code: &str) -> RepositoryResult<Option<PriceRule>> {
        if code.is_empty() {
            return Ok(None);
        }
        self.db.with(|ex| {
            ex.fetch_as(
                TABLE,
                &Conditions::new()
                    .eq("store_id", store_id)
                    .eq("status", 1)
                    .eq("code", code),
            )
        })
    }

    /// Record one more use of a rule
    pub fn increment_used(&self, price_rule_id: i64) -> RepositoryResult<()> {
        self.db.with(|ex| {
            let affected = ex.connection().execute(
                "UPDATE price_rule SET used = used + 1 WHERE price_rule_id = ?1",
                params![price_rule_id],
            )?;
            if affected == 0 {
                return Err(RepositoryError::NotFound {
                    entity: "PriceRule".to_string(),
                    id: price_rule_id.to_string(),
                });
            }
            debug!(price_rule_id, "price rule used");
            Ok(())
        })
    }
}
