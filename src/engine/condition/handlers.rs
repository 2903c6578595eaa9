// ==========================================
// Condition handlers
// ==========================================
// One handler per condition id. A handler that cannot find its fact in
// the context (anonymous user, no cart, no shipping address) is not met.
// ==========================================

use super::context::ConditionContext;
use super::error::{ConditionError, ConditionResult};
use super::operator::compare;
use crate::domain::{Condition, Operator};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

const EQUALITY: &[Operator] = &[Operator::Eq, Operator::Ne];

pub trait ConditionHandler: Send + Sync {
    fn id(&self) -> &'static str;

    /// Operators that make sense for this condition
    fn operators(&self) -> &'static [Operator] {
        &Operator::ALL
    }

    /// Check stored values before a trigger is saved
    fn validate(&self, values: &[String]) -> ConditionResult<()>;

    fn is_met(&self, condition: &Condition, ctx: &ConditionContext) -> bool;
}

fn invalid(id: &str, message: impl Into<String>) -> ConditionError {
    ConditionError::InvalidValue {
        id: id.to_string(),
        message: message.into(),
    }
}

fn require_values(id: &str, values: &[String]) -> ConditionResult<()> {
    if values.is_empty() {
        return Err(invalid(id, "no value"));
    }
    Ok(())
}

fn validate_ids(id: &str, values: &[String]) -> ConditionResult<()> {
    require_values(id, values)?;
    match values.iter().find(|v| v.trim().parse::<i64>().map_or(true, |n| n < 0)) {
        Some(bad) => Err(invalid(id, format!("'{}' is not a non-negative integer", bad))),
        None => Ok(()),
    }
}

/// "YYYY-MM-DD" (midnight UTC) or a unix timestamp
fn parse_timestamp(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp());
    }
    value.parse::<i64>().ok()
}

/// "100|USD" -> (10000, "USD")
fn parse_amount(value: &str) -> Option<(i64, String)> {
    let (amount, currency) = value.split_once('|')?;
    let currency = currency.trim();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let amount = Decimal::from_str(amount.trim()).ok()?;
    let minor = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        * Decimal::ONE_HUNDRED;
    Some((minor.to_i64()?, currency.to_uppercase()))
}

// ==========================================
// date
// ==========================================
pub struct DateCondition;

impl ConditionHandler for DateCondition {
    fn id(&self) -> &'static str {
        "date"
    }

    fn validate(&self, values: &[String]) -> ConditionResult<()> {
        require_values(self.id(), values)?;
        match values.iter().find(|v| parse_timestamp(v).is_none()) {
            Some(bad) => Err(invalid(self.id(), format!("'{}' is not a date", bad))),
            None => Ok(()),
        }
    }

    fn is_met(&self, condition: &Condition, ctx: &ConditionContext) -> bool {
        let Some(stamps) = condition
            .value
            .iter()
            .map(|v| parse_timestamp(v).map(|t| t.to_string()))
            .collect::<Option<Vec<_>>>()
        else {
            return false;
        };
        compare(&[ctx.now.timestamp().to_string()], &stamps, condition.operator)
    }
}

// ==========================================
// user_id / user_role_id
// ==========================================
pub struct UserIdCondition;

impl ConditionHandler for UserIdCondition {
    fn id(&self) -> &'static str {
        "user_id"
    }

    fn operators(&self) -> &'static [Operator] {
        EQUALITY
    }

    fn validate(&self, values: &[String]) -> ConditionResult<()> {
        validate_ids(self.id(), values)
    }

    fn is_met(&self, condition: &Condition, ctx: &ConditionContext) -> bool {
        match &ctx.user {
            Some(user) => compare(&[user.user_id.to_string()], &condition.value, condition.operator),
            None => false,
        }
    }
}

pub struct UserRoleIdCondition;

impl ConditionHandler for UserRoleIdCondition {
    fn id(&self) -> &'static str {
        "user_role_id"
    }

    fn operators(&self) -> &'static [Operator] {
        EQUALITY
    }

    fn validate(&self, values: &[String]) -> ConditionResult<()> {
        validate_ids(self.id(), values)
    }

    fn is_met(&self, condition: &Condition, ctx: &ConditionContext) -> bool {
        match &ctx.user {
            Some(user) => compare(&[user.role_id.to_string()], &condition.value, condition.operator),
            None => false,
        }
    }
}

// ==========================================
// cart_total
// ==========================================
// Single value "amount|CUR"; a cart in another currency never matches.
pub struct CartTotalCondition;

impl ConditionHandler for CartTotalCondition {
    fn id(&self) -> &'static str {
        "cart_total"
    }

    fn validate(&self, values: &[String]) -> ConditionResult<()> {
        match values {
            [value] if parse_amount(value).is_some() => Ok(()),
            [value] => Err(invalid(self.id(), format!("'{}' is not amount|currency", value))),
            _ => Err(invalid(self.id(), "exactly one value expected")),
        }
    }

    fn is_met(&self, condition: &Condition, ctx: &ConditionContext) -> bool {
        let (Some(cart), [value]) = (&ctx.cart, condition.value.as_slice()) else {
            return false;
        };
        let Some((amount, currency)) = parse_amount(value) else {
            return false;
        };
        if !cart.currency.eq_ignore_ascii_case(&currency) {
            return false;
        }
        compare(&[cart.total().to_string()], &[amount.to_string()], condition.operator)
    }
}

// ==========================================
// product_id / product_category_id
// ==========================================
pub struct ProductIdCondition;

impl ConditionHandler for ProductIdCondition {
    fn id(&self) -> &'static str {
        "product_id"
    }

    fn operators(&self) -> &'static [Operator] {
        EQUALITY
    }

    fn validate(&self, values: &[String]) -> ConditionResult<()> {
        validate_ids(self.id(), values)
    }

    fn is_met(&self, condition: &Condition, ctx: &ConditionContext) -> bool {
        let Some(cart) = ctx.cart.as_ref().filter(|c| !c.items.is_empty()) else {
            return false;
        };
        let ids: Vec<String> = cart.items.iter().map(|i| i.product_id.to_string()).collect();
        compare(&ids, &condition.value, condition.operator)
    }
}

/// Matches catalog and brand categories of the cart items
pub struct ProductCategoryIdCondition;

impl ConditionHandler for ProductCategoryIdCondition {
    fn id(&self) -> &'static str {
        "product_category_id"
    }

    fn operators(&self) -> &'static [Operator] {
        EQUALITY
    }

    fn validate(&self, values: &[String]) -> ConditionResult<()> {
        validate_ids(self.id(), values)
    }

    fn is_met(&self, condition: &Condition, ctx: &ConditionContext) -> bool {
        let Some(cart) = &ctx.cart else {
            return false;
        };
        let ids: Vec<String> = cart
            .items
            .iter()
            .flat_map(|i| [i.category_id, i.brand_category_id])
            .filter(|id| *id > 0)
            .map(|id| id.to_string())
            .collect();
        if ids.is_empty() {
            return false;
        }
        compare(&ids, &condition.value, condition.operator)
    }
}

// ==========================================
// shipping_*
// ==========================================
pub struct ShippingCountryCodeCondition;

impl ConditionHandler for ShippingCountryCodeCondition {
    fn id(&self) -> &'static str {
        "shipping_country_code"
    }

    fn operators(&self) -> &'static [Operator] {
        EQUALITY
    }

    fn validate(&self, values: &[String]) -> ConditionResult<()> {
        require_values(self.id(), values)?;
        match values
            .iter()
            .find(|v| v.trim().len() != 2 || !v.trim().chars().all(|c| c.is_ascii_alphabetic()))
        {
            Some(bad) => Err(invalid(self.id(), format!("'{}' is not a country code", bad))),
            None => Ok(()),
        }
    }

    fn is_met(&self, condition: &Condition, ctx: &ConditionContext) -> bool {
        let Some(address) = ctx.shipping.as_ref().filter(|a| !a.country.is_empty()) else {
            return false;
        };
        let codes: Vec<String> = condition.value.iter().map(|v| v.trim().to_uppercase()).collect();
        compare(&[address.country.to_uppercase()], &codes, condition.operator)
    }
}

pub struct ShippingStateIdCondition;

impl ConditionHandler for ShippingStateIdCondition {
    fn id(&self) -> &'static str {
        "shipping_state_id"
    }

    fn operators(&self) -> &'static [Operator] {
        EQUALITY
    }

    fn validate(&self, values: &[String]) -> ConditionResult<()> {
        validate_ids(self.id(), values)
    }

    fn is_met(&self, condition: &Condition, ctx: &ConditionContext) -> bool {
        match ctx.shipping.as_ref().filter(|a| a.state_id > 0) {
            Some(address) => compare(&[address.state_id.to_string()], &condition.value, condition.operator),
            None => false,
        }
    }
}

pub struct ShippingZoneIdCondition;

impl ConditionHandler for ShippingZoneIdCondition {
    fn id(&self) -> &'static str {
        "shipping_zone_id"
    }

    fn operators(&self) -> &'static [Operator] {
        EQUALITY
    }

    fn validate(&self, values: &[String]) -> ConditionResult<()> {
        validate_ids(self.id(), values)
    }

    fn is_met(&self, condition: &Condition, ctx: &ConditionContext) -> bool {
        match ctx.shipping.as_ref().filter(|a| a.zone_id > 0) {
            Some(address) => compare(&[address.zone_id.to_string()], &condition.value, condition.operator),
            None => false,
        }
    }
}

// ==========================================
// pricerule_used
// ==========================================
pub struct PriceRuleUsedCondition;

impl ConditionHandler for PriceRuleUsedCondition {
    fn id(&self) -> &'static str {
        "pricerule_used"
    }

    fn validate(&self, values: &[String]) -> ConditionResult<()> {
        validate_ids(self.id(), values)
    }

    fn is_met(&self, condition: &Condition, ctx: &ConditionContext) -> bool {
        match ctx.price_rule_used {
            Some(used) => compare(&[used.to_string()], &condition.value, condition.operator),
            None => false,
        }
    }
}
