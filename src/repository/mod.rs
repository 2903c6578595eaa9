// ==========================================
// GPL Cart - repository layer
// ==========================================
// Generic helper (Database / Executor / Conditions) plus one typed
// repository per entity. No business rules here.
// ==========================================
// Constraint: every query is parameterised
// ==========================================

pub mod category_repo;
pub mod database;
pub mod error;
pub mod field_repo;
pub mod job_repo;
pub mod price_rule_repo;
pub mod product_repo;
pub mod query;
pub mod store_repo;
pub mod trigger_repo;
pub mod user_repo;

pub use category_repo::CategoryRepository;
pub use database::{from_record, to_record, Database, Executor, Record};
pub use error::{RepositoryError, RepositoryResult};
pub use field_repo::FieldRepository;
pub use job_repo::JobRepository;
pub use price_rule_repo::PriceRuleRepository;
pub use product_repo::ProductRepository;
pub use query::{Conditions, Filter, QueryOptions};
pub use store_repo::StoreRepository;
pub use trigger_repo::TriggerRepository;
pub use user_repo::UserRepository;
