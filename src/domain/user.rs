// ==========================================
// GPL Cart - users, roles, addresses
// ==========================================

use crate::domain::types::{bool_int, null_default};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub store_id: i64,
    /// 0: no role (NULL column)
    #[serde(default, deserialize_with = "null_default")]
    pub role_id: i64,
    pub email: String,
    pub name: String,
    /// Argon2id PHC string, empty when no password was set
    #[serde(skip_serializing)]
    pub hash: String,
    #[serde(with = "bool_int")]
    pub status: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub data: Map<String, Value>,
    pub created: i64,
    pub modified: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub role_id: i64,
    pub name: String,
    #[serde(with = "bool_int")]
    pub status: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub permissions: Vec<String>,
}

/// Shipping/billing address as seen by the condition engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// ISO 3166-1 alpha-2
    pub country: String,
    pub state_id: i64,
    pub zone_id: i64,
    pub city: String,
    pub postcode: String,
}
