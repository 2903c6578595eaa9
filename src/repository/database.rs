// ==========================================
// GPL Cart - generic database helper
// ==========================================
// Record = JSON object keyed by column name.
// Executor: CRUD over one borrowed connection (plain or inside a transaction)
// Database: shared connection, delegates to Executor
// ==========================================
// Constraint: no SQL text is built from record keys or condition columns
// that are not declared in the schema.
// ==========================================

use crate::db::schema::{quote_ident, Schema, TableDef};
use crate::db::{configure_sqlite_connection, install, open_in_memory, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::query::{from_sql_value, to_sql_value, Conditions, QueryOptions};
use rusqlite::{params_from_iter, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

/// One table row as column -> value
pub type Record = Map<String, Value>;

/// Serialize a typed model into a Record
pub fn to_record<T: Serialize>(value: &T) -> RepositoryResult<Record> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(RepositoryError::SerializationError(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

/// Deserialize a Record into a typed model
pub fn from_record<T: DeserializeOwned>(record: Record) -> RepositoryResult<T> {
    Ok(serde_json::from_value(Value::Object(record))?)
}

// ==========================================
// Executor
// ==========================================
pub struct Executor<'a> {
    conn: &'a Connection,
    schema: &'a Schema,
}

impl<'a> Executor<'a> {
    pub fn new(conn: &'a Connection, schema: &'a Schema) -> Self {
        Self { conn, schema }
    }

    /// Raw connection for statements the helper does not cover
    pub fn connection(&self) -> &Connection {
        self.conn
    }

    pub fn schema(&self) -> &Schema {
        self.schema
    }

    fn table(&self, name: &str) -> RepositoryResult<&'a TableDef> {
        self.schema
            .table(name)
            .ok_or_else(|| RepositoryError::UnknownTable(name.to_string()))
    }

    /// Insert a record
    ///
    /// - keys that are not columns of the table are dropped
    /// - an auto-increment key that is absent, null or 0 is left to SQLite
    ///
    /// # Returns
    /// - last_insert_rowid()
    pub fn insert(&self, table: &str, record: &Record) -> RepositoryResult<i64> {
        let def = self.table(table)?;

        let mut columns = Vec::new();
        let mut params = Vec::new();
        for (key, value) in record {
            let Some(field) = def.field(key) else {
                trace!(table, column = %key, "dropping unknown column");
                continue;
            };
            if field.auto_increment && (value.is_null() || value.as_i64() == Some(0)) {
                continue;
            }
            columns.push(quote_ident(key));
            params.push(to_sql_value(value, field.field_type));
        }

        let sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", quote_ident(table))
        } else {
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_ident(table),
                columns.join(", "),
                vec!["?"; columns.len()].join(", ")
            )
        };

        debug!(table, sql = %sql, "insert");
        self.conn.execute(&sql, params_from_iter(params))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Update the records matching `conditions`
    ///
    /// The primary key is never part of the SET list; an empty change set
    /// returns 0 without touching the database.
    pub fn update(
        &self,
        table: &str,
        record: &Record,
        conditions: &Conditions,
    ) -> RepositoryResult<usize> {
        let def = self.table(table)?;

        if conditions.is_empty() {
            return Err(RepositoryError::MissingConditions {
                operation: "update".to_string(),
                table: table.to_string(),
            });
        }

        let mut sets = Vec::new();
        let mut params = Vec::new();
        for (key, value) in record {
            match def.field(key) {
                Some(field) if !field.primary => {
                    sets.push(format!("{} = ?", quote_ident(key)));
                    params.push(to_sql_value(value, field.field_type));
                }
                _ => continue,
            }
        }

        if sets.is_empty() {
            return Ok(0);
        }

        let (where_sql, where_params) = conditions.to_sql(def)?;
        params.extend(where_params);

        let sql = format!("UPDATE {} SET {}{}", quote_ident(table), sets.join(", "), where_sql);
        debug!(table, sql = %sql, "update");
        Ok(self.conn.execute(&sql, params_from_iter(params))?)
    }

    /// Delete the records matching `conditions` (never the whole table)
    pub fn delete(&self, table: &str, conditions: &Conditions) -> RepositoryResult<usize> {
        let def = self.table(table)?;

        if conditions.is_empty() {
            return Err(RepositoryError::MissingConditions {
                operation: "delete".to_string(),
                table: table.to_string(),
            });
        }

        let (where_sql, params) = conditions.to_sql(def)?;
        let sql = format!("DELETE FROM {}{}", quote_ident(table), where_sql);
        debug!(table, sql = %sql, "delete");
        Ok(self.conn.execute(&sql, params_from_iter(params))?)
    }

    /// First matching record
    pub fn fetch(&self, table: &str, conditions: &Conditions) -> RepositoryResult<Option<Record>> {
        let mut rows = self.fetch_all(table, conditions, &QueryOptions::new().limit(1))?;
        Ok(if rows.is_empty() { None } else { Some(rows.swap_remove(0)) })
    }

    /// All matching records
    pub fn fetch_all(
        &self,
        table: &str,
        conditions: &Conditions,
        options: &QueryOptions,
    ) -> RepositoryResult<Vec<Record>> {
        let def = self.table(table)?;
        let (where_sql, params) = conditions.to_sql(def)?;
        let tail = options.to_sql(def)?;

        let sql = format!("SELECT * FROM {}{}{}", quote_ident(table), where_sql, tail);
        trace!(table, sql = %sql, "select");

        let mut stmt = self.conn.prepare(&sql)?;
        let columns: Vec<(String, Option<crate::db::FieldType>)> = stmt
            .column_names()
            .into_iter()
            .map(|name| (name.to_string(), def.field(name).map(|f| f.field_type)))
            .collect();

        let rows = stmt.query_map(params_from_iter(params), |row| {
            let mut record = Record::new();
            for (idx, (name, ty)) in columns.iter().enumerate() {
                record.insert(name.clone(), from_sql_value(row.get_ref(idx)?, *ty));
            }
            Ok(record)
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Typed variant of `fetch`
    pub fn fetch_as<T: DeserializeOwned>(
        &self,
        table: &str,
        conditions: &Conditions,
    ) -> RepositoryResult<Option<T>> {
        self.fetch(table, conditions)?.map(from_record).transpose()
    }

    /// Typed variant of `fetch_all`
    pub fn fetch_all_as<T: DeserializeOwned>(
        &self,
        table: &str,
        conditions: &Conditions,
        options: &QueryOptions,
    ) -> RepositoryResult<Vec<T>> {
        self.fetch_all(table, conditions, options)?
            .into_iter()
            .map(from_record)
            .collect()
    }

    pub fn count(&self, table: &str, conditions: &Conditions) -> RepositoryResult<i64> {
        let def = self.table(table)?;
        let (where_sql, params) = conditions.to_sql(def)?;
        let sql = format!("SELECT COUNT(*) FROM {}{}", quote_ident(table), where_sql);
        Ok(self
            .conn
            .query_row(&sql, params_from_iter(params), |row| row.get(0))?)
    }

    pub fn exists(&self, table: &str, conditions: &Conditions) -> RepositoryResult<bool> {
        Ok(self.count(table, conditions)? > 0)
    }
}

// ==========================================
// Database
// ==========================================
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    schema: Arc<Schema>,
}

impl Database {
    /// Open a database file with the default schema
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        Ok(Self::from_connection(open_sqlite_connection(db_path)?))
    }

    /// In-memory database (tests)
    pub fn open_in_memory() -> RepositoryResult<Self> {
        Ok(Self::from_connection(open_in_memory()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            schema: Arc::new(Schema::default_schema()),
        }
    }

    /// Share an existing connection
    ///
    /// The common PRAGMAs are applied again (idempotent).
    pub fn from_shared(conn: Arc<Mutex<Connection>>, schema: Schema) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }
        Ok(Self {
            conn,
            schema: Arc::new(schema),
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Create tables and seed defaults
    pub fn install(&self) -> RepositoryResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        install(&conn)?;
        Ok(())
    }

    /// Run `f` with the connection locked
    pub fn with<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        F: FnOnce(&Executor) -> RepositoryResult<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let executor = Executor::new(&conn, &self.schema);
        f(&executor)
    }

    /// Run `f` inside a transaction
    ///
    /// Commit on Ok, rollback (drop) on Err.
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<RepositoryError>,
        F: FnOnce(&Executor) -> Result<T, E>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let result = {
            let executor = Executor::new(&tx, &self.schema);
            f(&executor)
        };

        match result {
            Ok(value) => {
                tx.commit()
                    .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
                Ok(value)
            }
            Err(e) => Err(e),
        }
    }

    // ===== delegated CRUD =====

    pub fn insert(&self, table: &str, record: &Record) -> RepositoryResult<i64> {
        self.with(|ex| ex.insert(table, record))
    }

    pub fn update(
        &self,
        table: &str,
        record: &Record,
        conditions: &Conditions,
    ) -> RepositoryResult<usize> {
        self.with(|ex| ex.update(table, record, conditions))
    }

    pub fn delete(&self, table: &str, conditions: &Conditions) -> RepositoryResult<usize> {
        self.with(|ex| ex.delete(table, conditions))
    }

    pub fn fetch(&self, table: &str, conditions: &Conditions) -> RepositoryResult<Option<Record>> {
        self.with(|ex| ex.fetch(table, conditions))
    }

    pub fn fetch_all(
        &self,
        table: &str,
        conditions: &Conditions,
        options: &QueryOptions,
    ) -> RepositoryResult<Vec<Record>> {
        self.with(|ex| ex.fetch_all(table, conditions, options))
    }

    pub fn count(&self, table: &str, conditions: &Conditions) -> RepositoryResult<i64> {
        self.with(|ex| ex.count(table, conditions))
    }

    pub fn exists(&self, table: &str, conditions: &Conditions) -> RepositoryResult<bool> {
        self.with(|ex| ex.exists(table, conditions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.install().unwrap();
        db
    }

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_insert_and_fetch() {
        let db = db();
        let id = db
            .insert(
                "field",
                &record(json!({"title": "Color", "type": "option", "widget": "color", "bogus": 1})),
            )
            .unwrap();
        assert!(id > 0);

        let row = db
            .fetch("field", &Conditions::new().eq("field_id", id))
            .unwrap()
            .unwrap();
        assert_eq!(row["title"], json!("Color"));
        assert_eq!(row["weight"], json!(0));
        assert!(!row.contains_key("bogus"));
    }

    #[test]
    fn test_blob_round_trip() {
        let db = db();
        let id = db
            .insert(
                "store",
                &record(json!({"name": "Second", "data": {"theme": "frontend", "langs": ["en"]}})),
            )
            .unwrap();

        let row = db
            .fetch("store", &Conditions::new().eq("store_id", id))
            .unwrap()
            .unwrap();
        assert_eq!(row["data"], json!({"theme": "frontend", "langs": ["en"]}));
    }

    #[test]
    fn test_update_skips_primary_key() {
        let db = db();
        let id = db
            .insert("field", &record(json!({"title": "Size", "type": "attribute", "widget": "select"})))
            .unwrap();

        let affected = db
            .update(
                "field",
                &record(json!({"field_id": 999, "title": "Dimensions"})),
                &Conditions::new().eq("field_id", id),
            )
            .unwrap();
        assert_eq!(affected, 1);

        let row = db
            .fetch("field", &Conditions::new().eq("field_id", id))
            .unwrap()
            .unwrap();
        assert_eq!(row["field_id"], json!(id));
        assert_eq!(row["title"], json!("Dimensions"));
    }

    #[test]
    fn test_delete_requires_conditions() {
        let db = db();
        let result = db.delete("field", &Conditions::new());
        assert!(matches!(result, Err(RepositoryError::MissingConditions { .. })));
    }

    #[test]
    fn test_unknown_table() {
        let db = db();
        let result = db.count("nope", &Conditions::new());
        assert!(matches!(result, Err(RepositoryError::UnknownTable(_))));
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let db = db();
        let result: RepositoryResult<()> = db.transaction(|ex| {
            ex.insert("field", &record(json!({"title": "A", "type": "option", "widget": "radio"})))?;
            Err(RepositoryError::InternalError("abort".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(db.count("field", &Conditions::new()).unwrap(), 0);
    }

    #[test]
    fn test_unique_violation_mapped() {
        let db = db();
        let user = record(json!({"email": "a@example.com", "name": "A", "store_id": 1}));
        db.insert("user", &user).unwrap();
        let result = db.insert("user", &user);
        assert!(matches!(result, Err(RepositoryError::UniqueConstraintViolation(_))));
    }

    #[test]
    fn test_fetch_all_ordered() {
        let db = db();
        for (title, weight) in [("B", 2), ("A", 1), ("C", 3)] {
            db.insert(
                "field",
                &record(json!({"title": title, "type": "option", "widget": "select", "weight": weight})),
            )
            .unwrap();
        }

        let rows = db
            .fetch_all("field", &Conditions::new(), &QueryOptions::new().order_by("weight").desc())
            .unwrap();
        let titles: Vec<_> = rows.iter().map(|r| r["title"].clone()).collect();
        assert_eq!(titles, vec![json!("C"), json!("B"), json!("A")]);
    }
}
