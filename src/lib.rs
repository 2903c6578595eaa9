// ==========================================
// GPL Cart - core library
// ==========================================
// Schema + database helper, CSV import/export jobs,
// condition/trigger engine and price rules over SQLite
// ==========================================

// Message catalogs
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// Modules
// ==========================================

// Entities and enums
pub mod domain;

// Database helper and typed repositories
pub mod repository;

// Conditions, triggers, price rules
pub mod engine;

// CSV import/export
pub mod importer;

// Settings
pub mod config;

// Connection setup and schema
pub mod db;

pub mod logging;

pub mod i18n;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    Address, Category, CategoryGroup, Condition, Field, FieldValue, ImportOptions, Job, JobStatus,
    Operator, PriceRule, Product, Role, Store, Trigger, User,
};

pub use repository::{Conditions, Database, QueryOptions, RepositoryError, RepositoryResult};

pub use engine::{ConditionContext, ConditionRegistry, PriceRuleCalculator, TriggerEngine};

pub use importer::{Exporter, HandlerRegistry, ImportError, ImportJobRunner, ImportResult, JobExecutor};

pub use config::{ConfigManager, ImportConfigReader};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "GPL Cart";
