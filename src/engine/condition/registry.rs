// ==========================================
// Condition handler registry
// ==========================================

use super::context::ConditionContext;
use super::error::{ConditionError, ConditionResult};
use super::handlers::*;
use crate::domain::Condition;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone, Default)]
pub struct ConditionRegistry {
    handlers: BTreeMap<&'static str, Arc<dyn ConditionHandler>>,
}

impl ConditionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DateCondition));
        registry.register(Arc::new(UserIdCondition));
        registry.register(Arc::new(UserRoleIdCondition));
        registry.register(Arc::new(CartTotalCondition));
        registry.register(Arc::new(ProductIdCondition));
        registry.register(Arc::new(ProductCategoryIdCondition));
        registry.register(Arc::new(ShippingCountryCodeCondition));
        registry.register(Arc::new(ShippingStateIdCondition));
        registry.register(Arc::new(ShippingZoneIdCondition));
        registry.register(Arc::new(PriceRuleUsedCondition));
        registry
    }

    pub fn register(&mut self, handler: Arc<dyn ConditionHandler>) {
        self.handlers.insert(handler.id(), handler);
    }

    pub fn get(&self, id: &str) -> ConditionResult<Arc<dyn ConditionHandler>> {
        self.handlers
            .get(id)
            .cloned()
            .ok_or_else(|| ConditionError::UnknownHandler(id.to_string()))
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }

    /// Known handler, supported operator, well-formed values
    pub fn validate(&self, condition: &Condition) -> ConditionResult<()> {
        let handler = self.get(&condition.id)?;
        if !handler.operators().contains(&condition.operator) {
            return Err(ConditionError::UnsupportedOperator {
                id: condition.id.clone(),
                operator: condition.operator.to_string(),
            });
        }
        handler.validate(&condition.value)
    }

    /// Unknown handlers and unsupported operators are never met
    pub fn is_met(&self, condition: &Condition, ctx: &ConditionContext) -> bool {
        match self.handlers.get(condition.id.as_str()) {
            Some(handler) if !handler.operators().contains(&condition.operator) => {
                warn!(condition = %condition, "unsupported condition operator");
                false
            }
            Some(handler) => handler.is_met(condition, ctx),
            None => {
                warn!(condition = %condition, "unknown condition handler");
                false
            }
        }
    }

    /// Every condition met; an empty list is never met
    pub fn all_met(&self, conditions: &[Condition], ctx: &ConditionContext) -> bool {
        !conditions.is_empty() && conditions.iter().all(|c| self.is_met(c, ctx))
    }
}
