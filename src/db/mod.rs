// ==========================================
// GPL Cart - SQLite connection and schema
// ==========================================
// Goals:
// - every Connection::open goes through the same PRAGMA setup
//   (foreign keys are per-connection in SQLite)
// - one busy_timeout for all connections
// - the schema is declared once (tables.rs) and installed from it
// ==========================================

pub mod schema;
pub mod tables;

pub use schema::{create_index_sql, create_table_sql, FieldDef, FieldType, Schema, TableDef};
pub use tables::tables;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;
use tracing::{debug, info};

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Schema version written by `install`
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Apply the common PRAGMAs to a connection
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite file and apply the common configuration
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (tests, dry runs)
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Read schema_version (None when the table does not exist)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// Create all tables and seed the rows the rest of the system relies on
///
/// Idempotent: tables use IF NOT EXISTS and seeds use INSERT OR IGNORE.
///
/// # Seeds
/// - store 1 (default store)
/// - role 1 (customer), role 2 (administrator)
/// - category_group 1 (catalog) and 2 (brand) for store 1
pub fn install(conn: &Connection) -> rusqlite::Result<()> {
    let tx = conn.unchecked_transaction()?;

    for table in tables() {
        debug!(table = %table.name, "creating table");
        tx.execute_batch(&create_table_sql(&table))?;
        for sql in create_index_sql(&table) {
            tx.execute_batch(&sql)?;
        }
    }

    tx.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![CURRENT_SCHEMA_VERSION, chrono::Utc::now().timestamp()],
    )?;

    tx.execute_batch(
        r#"
        INSERT OR IGNORE INTO store (store_id, name, domain, basepath, status, data)
            VALUES (1, 'GPL Cart', 'localhost', '', 1, '{}');
        INSERT OR IGNORE INTO role (role_id, name, status, permissions)
            VALUES (1, 'Customer', 1, '[]');
        INSERT OR IGNORE INTO role (role_id, name, status, permissions)
            VALUES (2, 'Administrator', 1, '["*"]');
        INSERT OR IGNORE INTO category_group (category_group_id, store_id, title, type)
            VALUES (1, 1, 'Catalog', 'catalog');
        INSERT OR IGNORE INTO category_group (category_group_id, store_id, title, type)
            VALUES (2, 1, 'Brand', 'brand');
        "#,
    )?;

    tx.commit()?;
    info!(version = CURRENT_SCHEMA_VERSION, "database schema installed");
    Ok(())
}
