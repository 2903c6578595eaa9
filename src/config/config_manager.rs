// ==========================================
// GPL Cart - settings manager
// ==========================================
// Storage: settings table (id, value = JSON, created)
// Missing or malformed values fall back to the documented defaults.
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::repository::{Conditions, Database, QueryOptions, RepositoryResult};
use async_trait::async_trait;
use rusqlite::params;
use serde_json::{Map, Value};
use tracing::warn;

const TABLE: &str = "settings";

// ==========================================
// ConfigManager
// ==========================================
#[derive(Clone)]
pub struct ConfigManager {
    db: Database,
}

impl ConfigManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open a database file and wrap it
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        Ok(Self::new(Database::open(db_path)?))
    }

    /// Stored value of a setting
    ///
    /// # Returns
    /// - Some(Value): the decoded JSON value
    /// - None: the setting does not exist
    pub fn get(&self, key: &str) -> RepositoryResult<Option<Value>> {
        let row = self.db.fetch(TABLE, &Conditions::new().eq("id", key))?;
        Ok(row.and_then(|mut r| r.remove("value")))
    }

    /// Insert or replace a setting
    pub fn set(&self, key: &str, value: &Value) -> RepositoryResult<()> {
        let now = chrono::Utc::now().timestamp();
        self.db.with(|ex| {
            ex.connection().execute(
                "INSERT INTO settings (id, value, created) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET value = ?2",
                params![key, value.to_string(), now],
            )?;
            Ok(())
        })
    }

    pub fn remove(&self, key: &str) -> RepositoryResult<bool> {
        Ok(self.db.delete(TABLE, &Conditions::new().eq("id", key))? > 0)
    }

    /// All settings as one JSON object, keys sorted
    pub fn snapshot(&self) -> RepositoryResult<Map<String, Value>> {
        let rows = self
            .db
            .fetch_all(TABLE, &Conditions::new(), &QueryOptions::new().order_by("id"))?;

        let mut map = Map::new();
        for mut row in rows.into_iter() {
            let Some(Value::String(id)) = row.remove("id") else {
                continue;
            };
            map.insert(id, row.remove("value").unwrap_or(Value::Null));
        }
        Ok(map)
    }

    /// Text form of a setting (numbers and booleans are stringified)
    fn get_string_or(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(match self.get(key)? {
            Some(Value::String(s)) if !s.is_empty() => s,
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => default.to_string(),
        })
    }

    fn get_parsed_or<T: std::str::FromStr + Copy>(&self, key: &str, default: T) -> RepositoryResult<T> {
        let raw = self.get_string_or(key, "")?;
        if raw.is_empty() {
            return Ok(default);
        }
        Ok(raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!(config_key = key, raw_value = %raw, "malformed setting, using default");
            default
        }))
    }
}

// ==========================================
// ImportConfigReader
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_csv_delimiter(&self) -> RepositoryResult<u8> {
        let value = self.get_string_or(config_keys::CSV_DELIMITER, ",")?;
        Ok(match value.as_bytes() {
            [b] => *b,
            b"\\t" => b'\t',
            _ => {
                warn!(config_key = config_keys::CSV_DELIMITER, raw_value = %value, "delimiter must be one byte");
                b','
            }
        })
    }

    async fn get_csv_delimiter_multiple(&self) -> RepositoryResult<String> {
        self.get_string_or(config_keys::CSV_DELIMITER_MULTIPLE, "|")
    }

    async fn get_csv_delimiter_key_value(&self) -> RepositoryResult<String> {
        self.get_string_or(config_keys::CSV_DELIMITER_KEY_VALUE, ":")
    }

    async fn get_import_limit(&self) -> RepositoryResult<usize> {
        let limit = self.get_parsed_or(config_keys::IMPORT_LIMIT, 50usize)?;
        Ok(limit.max(1))
    }

    async fn get_import_limit_bytes(&self) -> RepositoryResult<u64> {
        self.get_parsed_or(config_keys::IMPORT_LIMIT_BYTES, 0u64)
    }

    async fn get_default_currency(&self) -> RepositoryResult<String> {
        Ok(self.get_string_or(config_keys::CURRENCY, "USD")?.to_uppercase())
    }

    async fn get_default_store_id(&self) -> RepositoryResult<i64> {
        self.get_parsed_or(config_keys::STORE, 1i64)
    }

    async fn get_password_min_length(&self) -> RepositoryResult<usize> {
        self.get_parsed_or(config_keys::USER_PASSWORD_MIN_LENGTH, 8usize)
    }

    async fn get_password_max_length(&self) -> RepositoryResult<usize> {
        self.get_parsed_or(config_keys::USER_PASSWORD_MAX_LENGTH, 255usize)
    }

    async fn get_product_sku_pattern(&self) -> RepositoryResult<String> {
        self.get_string_or(config_keys::PRODUCT_SKU_PATTERN, "PRODUCT-%i")
    }
}

// ==========================================
// Setting keys
// ==========================================
pub mod config_keys {
    // CSV
    pub const CSV_DELIMITER: &str = "csv_delimiter";
    pub const CSV_DELIMITER_MULTIPLE: &str = "csv_delimiter_multiple";
    pub const CSV_DELIMITER_KEY_VALUE: &str = "csv_delimiter_key_value";

    // Import job
    pub const IMPORT_LIMIT: &str = "import_limit";
    pub const IMPORT_LIMIT_BYTES: &str = "import_limit_bytes";

    // Defaults
    pub const CURRENCY: &str = "currency";
    pub const STORE: &str = "store";
    pub const USER_PASSWORD_MIN_LENGTH: &str = "user_password_min_length";
    pub const USER_PASSWORD_MAX_LENGTH: &str = "user_password_max_length";
    pub const PRODUCT_SKU_PATTERN: &str = "product_sku_pattern";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manager() -> ConfigManager {
        let db = Database::open_in_memory().unwrap();
        db.install().unwrap();
        ConfigManager::new(db)
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let config = manager();
        assert_eq!(config.get_csv_delimiter().await.unwrap(), b',');
        assert_eq!(config.get_csv_delimiter_multiple().await.unwrap(), "|");
        assert_eq!(config.get_import_limit().await.unwrap(), 50);
        assert_eq!(config.get_import_limit_bytes().await.unwrap(), 0);
        assert_eq!(config.get_default_currency().await.unwrap(), "USD");
        assert_eq!(config.get_default_store_id().await.unwrap(), 1);
        assert_eq!(config.get_product_sku_pattern().await.unwrap(), "PRODUCT-%i");
    }

    #[tokio::test]
    async fn test_set_overrides_default() {
        let config = manager();
        config.set(config_keys::CSV_DELIMITER, &json!(";")).unwrap();
        config.set(config_keys::IMPORT_LIMIT, &json!(10)).unwrap();
        config.set(config_keys::CURRENCY, &json!("eur")).unwrap();

        assert_eq!(config.get_csv_delimiter().await.unwrap(), b';');
        assert_eq!(config.get_import_limit().await.unwrap(), 10);
        assert_eq!(config.get_default_currency().await.unwrap(), "EUR");

        config.set(config_keys::IMPORT_LIMIT, &json!(20)).unwrap();
        assert_eq!(config.get_import_limit().await.unwrap(), 20);
    }

    #[tokio::test]
    async fn test_malformed_value_falls_back() {
        let config = manager();
        config.set(config_keys::IMPORT_LIMIT, &json!("lots")).unwrap();
        assert_eq!(config.get_import_limit().await.unwrap(), 50);
    }

    #[test]
    fn test_snapshot_and_remove() {
        let config = manager();
        config.set("b_key", &json!({"nested": true})).unwrap();
        config.set("a_key", &json!("x")).unwrap();

        let snapshot = config.snapshot().unwrap();
        let keys: Vec<_> = snapshot.keys().cloned().collect();
        assert_eq!(keys, vec!["a_key".to_string(), "b_key".to_string()]);
        assert_eq!(snapshot["b_key"], json!({"nested": true}));

        assert!(config.remove("a_key").unwrap());
        assert!(config.get("a_key").unwrap().is_none());
    }
}
