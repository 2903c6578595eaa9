// ==========================================
// GPL Cart - price rule calculation
// ==========================================
// Rules are applied in weight order on the running amount (minor units).
//   percent: amount * value / 100, rounded half away from zero
//   fixed  : value * 100, only when the rule currency matches
// A rule with a coupon code applies only when exactly that code is given.
// The final total is never negative.
// ==========================================

use crate::domain::{PriceRule, PriceRuleValueType};
use crate::repository::{PriceRuleRepository, RepositoryResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

/// One applied rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceComponent {
    pub price_rule_id: i64,
    pub name: String,
    /// Signed change in minor units
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceCalculation {
    /// Original amount in minor units
    pub subtotal: i64,
    pub total: i64,
    pub currency: String,
    pub components: Vec<PriceComponent>,
}

impl PriceCalculation {
    pub fn applied_rule_ids(&self) -> Vec<i64> {
        self.components.iter().map(|c| c.price_rule_id).collect()
    }
}

#[derive(Debug, Default)]
pub struct PriceRuleCalculator;

impl PriceRuleCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Apply the rules whose trigger fired
    ///
    /// # Arguments
    /// - `amount`: minor units
    /// - `triggered`: ids returned by the trigger engine
    /// - `code`: coupon code submitted by the customer
    pub fn calculate(
        &self,
        amount: i64,
        currency: &str,
        rules: &[PriceRule],
        triggered: &[i64],
        code: Option<&str>,
    ) -> PriceCalculation {
        let mut applicable: Vec<&PriceRule> = rules
            .iter()
            .filter(|r| r.status && triggered.contains(&r.trigger_id))
            .filter(|r| !r.requires_code() || code == Some(r.code.as_str()))
            .collect();
        applicable.sort_by_key(|r| (r.weight, r.price_rule_id));

        let mut running = amount;
        let mut components = Vec::new();
        for rule in applicable {
            let Some(delta) = self.rule_delta(rule, running, currency) else {
                continue;
            };
            running += delta;
            components.push(PriceComponent {
                price_rule_id: rule.price_rule_id,
                name: rule.name.clone(),
                amount: delta,
            });
        }

        let total = running.max(0);
        debug!(subtotal = amount, total, currency, rules = components.len(), "price rules applied");

        PriceCalculation {
            subtotal: amount,
            total,
            currency: currency.to_string(),
            components,
        }
    }

    /// Count one use of every applied rule
    pub fn record_usage(
        &self,
        repo: &PriceRuleRepository,
        calculation: &PriceCalculation,
    ) -> RepositoryResult<()> {
        calculation
            .components
            .iter()
            .try_for_each(|c| repo.increment_used(c.price_rule_id))
    }

    fn rule_delta(&self, rule: &PriceRule, running: i64, currency: &str) -> Option<i64> {
        let delta = match rule.value_type {
            PriceRuleValueType::Percent => {
                Decimal::from(running) * rule.value / Decimal::ONE_HUNDRED
            }
            PriceRuleValueType::Fixed => {
                if !rule.currency.eq_ignore_ascii_case(currency) {
                    return None;
                }
                rule.value * Decimal::ONE_HUNDRED
            }
        };
        delta
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
    }
}
