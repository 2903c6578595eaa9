// ==========================================
// GPL Cart - configuration layer
// ==========================================
// Storage: `settings` table (id -> JSON value)
// ==========================================

pub mod app_config;
pub mod config_manager;
pub mod import_config_trait;

pub use app_config::AppConfig;
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::ImportConfigReader;
