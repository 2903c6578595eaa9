// ==========================================
// GPL Cart - domain type definitions
// ==========================================
// Enums are stored in the database as lowercase strings.
// ==========================================

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ==========================================
// Category group type
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryGroupType {
    Catalog,
    Brand,
}

impl fmt::Display for CategoryGroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryGroupType::Catalog => write!(f, "catalog"),
            CategoryGroupType::Brand => write!(f, "brand"),
        }
    }
}

// ==========================================
// Product field kind
// ==========================================
// option: selectable, changes the product variant
// attribute: descriptive only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Option,
    Attribute,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Option => write!(f, "option"),
            FieldKind::Attribute => write!(f, "attribute"),
        }
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "option" => Ok(FieldKind::Option),
            "attribute" => Ok(FieldKind::Attribute),
            other => Err(other.to_string()),
        }
    }
}

// ==========================================
// Field widget
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldWidget {
    Select,
    Radio,
    Button,
    Image,
    Color,
}

impl fmt::Display for FieldWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldWidget::Select => "select",
            FieldWidget::Radio => "radio",
            FieldWidget::Button => "button",
            FieldWidget::Image => "image",
            FieldWidget::Color => "color",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for FieldWidget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "select" => Ok(FieldWidget::Select),
            "radio" => Ok(FieldWidget::Radio),
            "button" => Ok(FieldWidget::Button),
            "image" => Ok(FieldWidget::Image),
            "color" => Ok(FieldWidget::Color),
            other => Err(other.to_string()),
        }
    }
}

// ==========================================
// Price rule value type
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceRuleValueType {
    /// value is a percentage of the running amount
    Percent,
    /// value is an amount in the rule currency
    Fixed,
}

impl fmt::Display for PriceRuleValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceRuleValueType::Percent => write!(f, "percent"),
            PriceRuleValueType::Fixed => write!(f, "fixed"),
        }
    }
}

// ==========================================
// Import job status
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Finished,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// Pending or Running: more steps may follow
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::Running)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Finished => "finished",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

// ==========================================
// serde helpers for database rows
// ==========================================

/// INTEGER 0/1 columns as bool
pub mod bool_int {
    use super::*;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(i64::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Int(i64),
            Str(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => b,
            Raw::Int(i) => i != 0,
            Raw::Str(s) => !matches!(s.trim(), "" | "0"),
        })
    }
}

/// NULL columns as the type's default
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Row {
        #[serde(with = "bool_int")]
        status: bool,
        #[serde(default, deserialize_with = "null_default")]
        images: Vec<String>,
    }

    #[test]
    fn test_bool_int_round_trip() {
        let row: Row = serde_json::from_value(json!({"status": 1, "images": null})).unwrap();
        assert!(row.status);
        assert!(row.images.is_empty());

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["status"], json!(1));
    }

    #[test]
    fn test_bool_int_accepts_strings() {
        let row: Row = serde_json::from_value(json!({"status": "0"})).unwrap();
        assert!(!row.status);
    }

    #[test]
    fn test_field_widget_parse() {
        assert_eq!("Color".parse::<FieldWidget>(), Ok(FieldWidget::Color));
        assert!("slider".parse::<FieldWidget>().is_err());
    }

    #[test]
    fn test_job_status_active() {
        assert!(JobStatus::Pending.is_active());
        assert!(JobStatus::Running.is_active());
        assert!(!JobStatus::Finished.is_active());
        assert!(!JobStatus::Cancelled.is_active());
    }
}
