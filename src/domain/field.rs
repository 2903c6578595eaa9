// ==========================================
// GPL Cart - product fields
// ==========================================

use crate::domain::types::{FieldKind, FieldWidget};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub field_id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub widget: FieldWidget,
    pub weight: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub field_value_id: i64,
    pub field_id: i64,
    pub title: String,
    /// #rrggbb or empty
    pub color: String,
    pub weight: i64,
}
