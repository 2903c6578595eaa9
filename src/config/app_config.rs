// ==========================================
// GPL Cart - process-level configuration
// ==========================================
// Resolves where the database and logs live.
// Priority: environment variable > user data directory > working directory
// ==========================================

use std::path::PathBuf;

/// Environment variable overriding the database path
pub const DB_PATH_ENV: &str = "GPLCART_DB";

const APP_DIR: &str = "gplcart";
const DB_FILE: &str = "gplcart.db";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Resolve paths from the environment
    ///
    /// Directories are created on a best-effort basis; a failure surfaces
    /// later when the database is opened.
    pub fn from_env() -> Self {
        let data_dir = dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("."));

        let db_path = match std::env::var(DB_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path.trim()),
            _ => data_dir.join(DB_FILE),
        };

        let log_dir = db_path
            .parent()
            .map(|p| p.join("import_logs"))
            .unwrap_or_else(|| data_dir.join("import_logs"));

        let config = Self { db_path, log_dir };
        config.ensure_dirs();
        config
    }

    /// Fixed paths under `root` (tests)
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            db_path: root.join(DB_FILE),
            log_dir: root.join("import_logs"),
        }
    }

    pub fn db_path_str(&self) -> String {
        self.db_path.to_string_lossy().into_owned()
    }

    fn ensure_dirs(&self) {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        std::fs::create_dir_all(&self.log_dir).ok();
    }
}
