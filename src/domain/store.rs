// ==========================================
// GPL Cart - store
// ==========================================
// Multi-store: products, categories, users, triggers belong to a store.
// ==========================================

use crate::domain::types::{bool_int, null_default};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub store_id: i64,
    pub name: String,
    pub domain: String,
    pub basepath: String,
    #[serde(with = "bool_int")]
    pub status: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub data: Map<String, Value>,
}
