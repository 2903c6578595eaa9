// ==========================================
// GPL Cart - engine layer
// ==========================================
// Rule evaluation without SQL: conditions, triggers, price rules,
// password hashing.
// ==========================================

pub mod condition;
pub mod password;
pub mod price_rule;
pub mod trigger;

pub use condition::{
    compare, parse_condition, parse_conditions, Cart, CartItem, ConditionContext, ConditionError,
    ConditionHandler, ConditionRegistry, ConditionResult,
};
pub use password::{hash_password, verify_password};
pub use price_rule::{PriceCalculation, PriceComponent, PriceRuleCalculator};
pub use trigger::TriggerEngine;
