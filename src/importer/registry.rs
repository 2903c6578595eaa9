// ==========================================
// GPL Cart - import handler registry
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::handler_trait::ImportHandler;
use crate::importer::handlers::{
    CategoryImportHandler, FieldImportHandler, FieldValueImportHandler, ProductImportHandler,
    UserImportHandler,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Handlers by registry key
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: BTreeMap<&'static str, Arc<dyn ImportHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// product, category, user, field, field_value
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ProductImportHandler));
        registry.register(Arc::new(CategoryImportHandler));
        registry.register(Arc::new(UserImportHandler));
        registry.register(Arc::new(FieldImportHandler));
        registry.register(Arc::new(FieldValueImportHandler));
        registry
    }

    /// Add or replace a handler under its own id
    pub fn register(&mut self, handler: Arc<dyn ImportHandler>) {
        self.handlers.insert(handler.id(), handler);
    }

    pub fn get(&self, id: &str) -> ImportResult<Arc<dyn ImportHandler>> {
        self.handlers
            .get(id)
            .cloned()
            .ok_or_else(|| ImportError::UnknownHandler(id.to_string()))
    }

    /// Registered keys, sorted
    pub fn ids(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_handlers() {
        let registry = HandlerRegistry::with_defaults();
        assert_eq!(
            registry.ids(),
            vec!["category", "field", "field_value", "product", "user"]
        );
        assert_eq!(registry.get("product").unwrap().table(), "product");
    }

    #[test]
    fn test_unknown_handler() {
        let registry = HandlerRegistry::with_defaults();
        assert!(matches!(
            registry.get("order"),
            Err(ImportError::UnknownHandler(id)) if id == "order"
        ));
    }

    #[test]
    fn test_required_columns_are_columns() {
        let registry = HandlerRegistry::with_defaults();
        for id in registry.ids() {
            let handler = registry.get(id).unwrap();
            assert!(handler.columns().contains(&handler.id_column()));
            for required in handler.required_columns() {
                assert!(handler.columns().contains(required), "{}: {}", id, required);
            }
        }
    }
}
