// ==========================================
// GPL Cart - trigger evaluation
// ==========================================
// A trigger fires when it is enabled, belongs to the context store and
// every one of its conditions is met. A trigger without conditions never
// fires.
// ==========================================

use crate::domain::Trigger;
use crate::engine::condition::{ConditionContext, ConditionError, ConditionRegistry, ConditionResult};
use crate::repository::{RepositoryResult, TriggerRepository};
use tracing::debug;

pub struct TriggerEngine {
    registry: ConditionRegistry,
}

impl Default for TriggerEngine {
    fn default() -> Self {
        Self::new(ConditionRegistry::with_defaults())
    }
}

impl TriggerEngine {
    pub fn new(registry: ConditionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ConditionRegistry {
        &self.registry
    }

    /// Ids of the fired triggers, ordered by weight then id
    pub fn triggered(&self, triggers: &[Trigger], ctx: &ConditionContext) -> Vec<i64> {
        let mut fired: Vec<&Trigger> = triggers
            .iter()
            .filter(|t| t.status && t.store_id == ctx.store_id)
            .filter(|t| self.registry.all_met(&t.data.conditions, ctx))
            .collect();
        fired.sort_by_key(|t| (t.weight, t.trigger_id));

        let ids: Vec<i64> = fired.iter().map(|t| t.trigger_id).collect();
        debug!(store_id = ctx.store_id, ?ids, "triggers fired");
        ids
    }

    /// Load the store's enabled triggers and evaluate them
    pub fn triggered_for_store(
        &self,
        repo: &TriggerRepository,
        ctx: &ConditionContext,
    ) -> RepositoryResult<Vec<i64>> {
        let triggers = repo.list_by_store(ctx.store_id, true)?;
        Ok(self.triggered(&triggers, ctx))
    }

    /// Every stored condition must pass its handler's validation
    pub fn validate(&self, trigger: &Trigger) -> ConditionResult<()> {
        if trigger.data.conditions.is_empty() {
            return Err(ConditionError::Syntax(format!("trigger {} has no conditions", trigger.name)));
        }
        trigger
            .data
            .conditions
            .iter()
            .try_for_each(|c| self.registry.validate(c))
    }
}
