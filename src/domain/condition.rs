// ==========================================
// GPL Cart - stored conditions
// ==========================================
// A condition is "<handler id> <operator> <value list>", e.g.
//   user_role_id = 1,2
//   cart_total >= 100|USD
// Evaluation lives in engine::condition.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "!=")]
    Ne,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Lt,
        Operator::Gt,
        Operator::Eq,
        Operator::Le,
        Operator::Ge,
        Operator::Ne,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Eq => "=",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::Ne => "!=",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One stored condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Condition handler id
    pub id: String,
    pub operator: Operator,
    pub value: Vec<String>,
}

impl Condition {
    pub fn new(id: &str, operator: Operator, value: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            operator,
            value: value.iter().map(|v| v.to_string()).collect(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.id, self.operator, self.value.join(","))
    }
}
