// ==========================================
// GPL Cart - domain layer
// ==========================================
// Plain entity types, one struct per table row.
// No data access and no rule evaluation here.
// ==========================================

pub mod catalog;
pub mod condition;
pub mod field;
pub mod job;
pub mod price_rule;
pub mod store;
pub mod types;
pub mod user;

pub use catalog::{Category, CategoryGroup, Product};
pub use condition::{Condition, Operator};
pub use field::{Field, FieldValue};
pub use job::{ImportOptions, Job};
pub use price_rule::{PriceRule, Trigger, TriggerData};
pub use store::Store;
pub use types::{CategoryGroupType, FieldKind, FieldWidget, JobStatus, PriceRuleValueType};
pub use user::{Address, Role, User};
