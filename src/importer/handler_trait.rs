// ==========================================
// GPL Cart - import handler trait
// ==========================================
// One implementation per entity, selected by string key.
// A handler validates one CSV row and writes it through the typed
// repositories inside the caller's transaction.
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::ImportOptions;
use crate::i18n::t_with_args;
use crate::importer::csv_reader::CsvRow;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::{Executor, Record, RepositoryResult};
use serde_json::Value;

// ==========================================
// ImportContext
// ==========================================
/// Settings and options shared by every row of a job step
#[derive(Debug, Clone, PartialEq)]
pub struct ImportContext {
    pub options: ImportOptions,
    pub default_store_id: i64,
    pub default_currency: String,
    pub delimiter_multiple: String,
    pub delimiter_key_value: String,
    pub password_min_length: usize,
    pub password_max_length: usize,
    pub sku_pattern: String,
    /// Unix seconds stamped into created/modified
    pub now: i64,
}

impl Default for ImportContext {
    fn default() -> Self {
        Self {
            options: ImportOptions::default(),
            default_store_id: 1,
            default_currency: "USD".to_string(),
            delimiter_multiple: "|".to_string(),
            delimiter_key_value: ":".to_string(),
            password_min_length: 8,
            password_max_length: 255,
            sku_pattern: "PRODUCT-%i".to_string(),
            now: chrono::Utc::now().timestamp(),
        }
    }
}

impl ImportContext {
    /// Snapshot the settings for one step
    pub async fn load(
        config: &dyn ImportConfigReader,
        options: ImportOptions,
    ) -> RepositoryResult<Self> {
        Ok(Self {
            options,
            default_store_id: config.get_default_store_id().await?,
            default_currency: config.get_default_currency().await?,
            delimiter_multiple: config.get_csv_delimiter_multiple().await?,
            delimiter_key_value: config.get_csv_delimiter_key_value().await?,
            password_min_length: config.get_password_min_length().await?,
            password_max_length: config.get_password_max_length().await?,
            sku_pattern: config.get_product_sku_pattern().await?,
            now: chrono::Utc::now().timestamp(),
        })
    }

    /// Store for rows without a store_id
    pub fn store_id(&self) -> i64 {
        self.options.store_id.unwrap_or(self.default_store_id)
    }
}

/// What happened to an accepted row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Inserted(i64),
    Updated(i64),
}

// ==========================================
// ImportHandler Trait
// ==========================================
pub trait ImportHandler: Send + Sync {
    /// Registry key, e.g. "product"
    fn id(&self) -> &'static str;

    /// Human readable name
    fn name(&self) -> &'static str;

    fn table(&self) -> &'static str;

    /// Column that selects update (non-zero) or insert
    fn id_column(&self) -> &'static str;

    /// CSV columns in export order
    fn columns(&self) -> &'static [&'static str];

    /// Columns the header must contain
    fn required_columns(&self) -> &'static [&'static str];

    /// Validate and write one row
    ///
    /// # Errors
    /// - RowRejected: every validation message of the row
    /// - Repository: the write itself failed
    fn import_row(&self, ex: &Executor, row: &CsvRow, ctx: &ImportContext) -> ImportResult<RowOutcome>;

    /// One CSV line for a stored record, aligned with `columns()`
    fn export_row(&self, record: &Record, ctx: &ImportContext) -> Vec<String> {
        self.columns()
            .iter()
            .map(|column| export_value(record.get(*column), ctx))
            .collect()
    }
}

/// Stored value -> CSV cell
///
/// Lists are joined with the multi-value delimiter, maps become
/// `key:value` items.
pub fn export_value(value: Option<&Value>, ctx: &ImportContext) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => if *b { "1" } else { "0" }.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| export_value(Some(item), ctx))
            .collect::<Vec<_>>()
            .join(&ctx.delimiter_multiple),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| format!("{}{}{}", k, ctx.delimiter_key_value, export_value(Some(v), ctx)))
            .collect::<Vec<_>>()
            .join(&ctx.delimiter_multiple),
    }
}

// ==========================================
// Row validation helpers
// ==========================================

/// Accumulates the messages of one row
#[derive(Debug, Default)]
pub struct RowErrors {
    messages: Vec<String>,
}

impl RowErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: String) {
        self.messages.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn required(&mut self, field: &str) {
        self.push(t_with_args("validation.required", &[("field", field)]));
    }

    pub fn not_found(&mut self, entity: &str, id: i64) {
        self.push(t_with_args(
            "validation.not_found",
            &[("entity", entity), ("id", &id.to_string())],
        ));
    }

    /// Err(RowRejected) when anything was recorded
    pub fn check(self, line: u64) -> ImportResult<()> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(ImportError::RowRejected {
                line,
                errors: self.messages,
            })
        }
    }
}

/// Typed cell readers that record a message on bad input
pub struct RowReader<'a> {
    pub row: &'a CsvRow,
    pub cleaner: DataCleaner,
}

impl<'a> RowReader<'a> {
    pub fn new(row: &'a CsvRow) -> Self {
        Self {
            row,
            cleaner: DataCleaner,
        }
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.cleaner.normalize_null(self.row.values.get(key).map(String::as_str))
    }

    /// Non-empty text no longer than `max` characters
    pub fn text_max(&self, key: &str, max: usize, errors: &mut RowErrors) -> Option<String> {
        let value = self.text(key)?;
        if value.chars().count() > max {
            errors.push(t_with_args(
                "validation.length_max",
                &[("field", key), ("max", &max.to_string())],
            ));
            return None;
        }
        Some(value)
    }

    pub fn int(&self, key: &str, errors: &mut RowErrors) -> Option<i64> {
        let raw = self.text(key)?;
        match self.cleaner.parse_int(&raw) {
            Some(v) => Some(v),
            None => {
                errors.push(t_with_args("validation.integer", &[("field", key)]));
                None
            }
        }
    }

    pub fn non_negative_int(&self, key: &str, errors: &mut RowErrors) -> Option<i64> {
        let value = self.int(key, errors)?;
        if value < 0 {
            errors.push(t_with_args("validation.negative", &[("field", key)]));
            return None;
        }
        Some(value)
    }

    pub fn bool(&self, key: &str, errors: &mut RowErrors) -> Option<bool> {
        let raw = self.text(key)?;
        match self.cleaner.parse_bool(&raw) {
            Some(v) => Some(v),
            None => {
                errors.push(t_with_args("validation.boolean", &[("field", key)]));
                None
            }
        }
    }

    pub fn list(&self, key: &str, ctx: &ImportContext) -> Option<Vec<String>> {
        let raw = self.text(key)?;
        Some(self.cleaner.split_multiple(&raw, &ctx.delimiter_multiple))
    }

    pub fn key_values(
        &self,
        key: &str,
        ctx: &ImportContext,
        errors: &mut RowErrors,
    ) -> Option<serde_json::Map<String, Value>> {
        let raw = self.text(key)?;
        match self
            .cleaner
            .split_key_value(&raw, &ctx.delimiter_multiple, &ctx.delimiter_key_value)
        {
            Ok(map) => Some(map),
            Err(item) => {
                errors.push(t_with_args("validation.key_value", &[("value", &item)]));
                None
            }
        }
    }
}

/// Write mode chosen by the id column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTarget {
    Insert,
    Update(i64),
    /// The id column is unusable; a message has been recorded
    Invalid,
}

impl RowTarget {
    pub fn is_insert(&self) -> bool {
        matches!(self, RowTarget::Insert)
    }

    pub fn update_id(&self) -> Option<i64> {
        match self {
            RowTarget::Update(id) => Some(*id),
            _ => None,
        }
    }
}

/// Decide between insert and update from the id column
///
/// - absent, empty or 0: insert
/// - non-zero: update of an existing record; a missing record or disabled
///   updates are recorded in `errors`
pub fn resolve_update_target<F>(
    reader: &RowReader,
    id_column: &str,
    entity: &str,
    ctx: &ImportContext,
    errors: &mut RowErrors,
    exists: F,
) -> ImportResult<RowTarget>
where
    F: FnOnce(i64) -> RepositoryResult<bool>,
{
    if reader.text(id_column).is_none() {
        return Ok(RowTarget::Insert);
    }
    let id = match reader.int(id_column, errors) {
        Some(0) => return Ok(RowTarget::Insert),
        Some(id) => id,
        None => return Ok(RowTarget::Invalid),
    };

    if !ctx.options.update {
        errors.push(crate::i18n::t("validation.update_disabled"));
        return Ok(RowTarget::Invalid);
    }

    if !exists(id)? {
        errors.not_found(entity, id);
        return Ok(RowTarget::Invalid);
    }

    Ok(RowTarget::Update(id))
}

/// Record value helper
pub fn set(record: &mut Record, key: &str, value: impl Into<Value>) {
    record.insert(key.to_string(), value.into());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn row(pairs: &[(&str, &str)]) -> CsvRow {
        CsvRow {
            line: 2,
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_export_value() {
        let ctx = ImportContext::default();
        assert_eq!(export_value(None, &ctx), "");
        assert_eq!(export_value(Some(&json!(["a", "b"])), &ctx), "a|b");
        assert_eq!(export_value(Some(&json!({"k": "v", "n": 1})), &ctx), "k:v|n:1");
        assert_eq!(export_value(Some(&json!(true)), &ctx), "1");
    }

    #[test]
    fn test_row_errors_accumulate() {
        let reader_row = row(&[("stock", "-1"), ("status", "maybe"), ("weight", "x")]);
        let reader = RowReader::new(&reader_row);
        let mut errors = RowErrors::new();

        assert_eq!(reader.non_negative_int("stock", &mut errors), None);
        assert_eq!(reader.bool("status", &mut errors), None);
        assert_eq!(reader.int("weight", &mut errors), None);
        assert_eq!(reader.int("missing", &mut errors), None);

        match errors.check(2) {
            Err(ImportError::RowRejected { line, errors }) => {
                assert_eq!(line, 2);
                assert_eq!(errors.len(), 3);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_update_target() {
        let ctx = ImportContext::default();

        let insert_row = row(&[("product_id", "0")]);
        let mut errors = RowErrors::new();
        let target =
            resolve_update_target(&RowReader::new(&insert_row), "product_id", "product", &ctx, &mut errors, |_| Ok(true))
                .unwrap();
        assert_eq!(target, RowTarget::Insert);
        assert!(errors.is_empty());

        let update_row = row(&[("product_id", "7")]);
        let target =
            resolve_update_target(&RowReader::new(&update_row), "product_id", "product", &ctx, &mut errors, |_| Ok(true))
                .unwrap();
        assert_eq!(target, RowTarget::Update(7));

        let target =
            resolve_update_target(&RowReader::new(&update_row), "product_id", "product", &ctx, &mut errors, |_| Ok(false))
                .unwrap();
        assert_eq!(target, RowTarget::Invalid);
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_resolve_update_disabled() {
        let mut ctx = ImportContext::default();
        ctx.options.update = false;

        let update_row = row(&[("product_id", "7")]);
        let mut errors = RowErrors::new();
        let target =
            resolve_update_target(&RowReader::new(&update_row), "product_id", "product", &ctx, &mut errors, |_| Ok(true))
                .unwrap();
        assert_eq!(target, RowTarget::Invalid);
        assert!(!errors.is_empty());
    }
}
