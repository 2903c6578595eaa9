// ==========================================
// Test helpers
// ==========================================
// Temporary installed databases, CSV fixtures, job runners
// ==========================================

#![allow(dead_code)]

use gplcart::config::ConfigManager;
use gplcart::importer::ImportJobRunner;
use gplcart::repository::Database;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::{NamedTempFile, TempDir};

/// Create a temporary database file with the schema installed
///
/// # Returns
/// - NamedTempFile: keeps the file alive
/// - String: database path
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().ok_or("non-utf8 temp path")?.to_string();

    Database::open(&db_path)?.install()?;

    Ok((temp_file, db_path))
}

/// Installed database, its settings and a scratch directory
pub struct TestEnv {
    pub dir: TempDir,
    pub db: Database,
    pub config: Arc<ConfigManager>,
}

impl TestEnv {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let db_path = dir.path().join("gplcart.db");
        let db = Database::open(db_path.to_str().ok_or("non-utf8 temp path")?)?;
        db.install()?;
        let config = Arc::new(ConfigManager::new(db.clone()));
        Ok(Self { dir, db, config })
    }

    pub fn runner(&self) -> ImportJobRunner<ConfigManager> {
        ImportJobRunner::new(self.db.clone(), self.config.clone(), self.log_dir())
    }

    pub fn log_dir(&self) -> PathBuf {
        self.dir.path().join("logs")
    }

    /// Write a CSV file into the scratch directory
    pub fn write_csv(&self, name: &str, content: &str) -> Result<PathBuf, Box<dyn Error>> {
        write_csv(self.dir.path(), name, content)
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

pub fn write_csv(dir: &Path, name: &str, content: &str) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(name);
    std::fs::write(&path, content)?;
    Ok(path)
}

/// Product CSV with `count` valid rows
pub fn product_csv(count: usize) -> String {
    let mut csv = String::from("title,sku,price,currency,stock,status\n");
    for i in 1..=count {
        csv.push_str(&format!("Product {i},SKU-{i},{i}.50,USD,{i},1\n"));
    }
    csv
}
