// ==========================================
// GPL Cart - triggers and price rules
// ==========================================
// Trigger: stored condition set, evaluated per store
// PriceRule: discount/markup applied when its trigger fires
// ==========================================

use crate::domain::condition::Condition;
use crate::domain::types::{bool_int, null_default, PriceRuleValueType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerData {
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub trigger_id: i64,
    pub store_id: i64,
    pub name: String,
    #[serde(with = "bool_int")]
    pub status: bool,
    pub weight: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub data: TriggerData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRule {
    pub price_rule_id: i64,
    pub trigger_id: i64,
    pub store_id: i64,
    pub name: String,
    /// Coupon code, empty when the rule applies without one
    pub code: String,
    /// Percent (may be negative) or amount in major units of `currency`
    pub value: Decimal,
    pub value_type: PriceRuleValueType,
    pub currency: String,
    #[serde(with = "bool_int")]
    pub status: bool,
    pub weight: i64,
    pub used: i64,
}

impl PriceRule {
    pub fn requires_code(&self) -> bool {
        !self.code.is_empty()
    }
}
