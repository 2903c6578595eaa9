// ==========================================
// GPL Cart - catalog entities
// ==========================================
// Product / Category / CategoryGroup
// Price: integer minor units (2 decimals)
// ==========================================

use crate::domain::types::{bool_int, null_default, CategoryGroupType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ==========================================
// Product
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i64,
    pub store_id: i64,
    pub sku: String,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub currency: String,
    pub stock: i64,
    #[serde(with = "bool_int")]
    pub status: bool,
    pub category_id: i64,
    pub brand_category_id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub data: Map<String, Value>,
    pub created: i64,
    pub modified: i64,
}

// ==========================================
// CategoryGroup
// ==========================================
// One catalog tree and one brand list per store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category_group_id: i64,
    pub store_id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub group_type: CategoryGroupType,
}

// ==========================================
// Category
// ==========================================
// parent_id = 0: root of the group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i64,
    pub category_group_id: i64,
    pub parent_id: i64,
    pub title: String,
    pub description: String,
    #[serde(with = "bool_int")]
    pub status: bool,
    pub weight: i64,
    pub alias: String,
    #[serde(default, deserialize_with = "null_default")]
    pub data: Map<String, Value>,
}
