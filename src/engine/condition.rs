// ==========================================
// GPL Cart - condition engine
// ==========================================
// Conditions are "<handler id> <operator> <values>" lines stored on a
// trigger. Each handler reads one fact from the ConditionContext and
// compares it with the stored values.
// ==========================================

mod context;
mod error;
mod handlers;
mod operator;
mod parser;
mod registry;


pub use context::{Cart, CartItem, ConditionContext};
pub use error::{ConditionError, ConditionResult};
pub use handlers::{
    CartTotalCondition, ConditionHandler, DateCondition, PriceRuleUsedCondition,
    ProductCategoryIdCondition, ProductIdCondition, ShippingCountryCodeCondition,
    ShippingStateIdCondition, ShippingZoneIdCondition, UserIdCondition, UserRoleIdCondition,
};
pub use operator::compare;
pub use parser::{parse_condition, parse_conditions};
pub use registry::ConditionRegistry;
