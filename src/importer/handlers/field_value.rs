// ==========================================
// GPL Cart - field value import handler
// ==========================================
// Columns: field_value_id, field_id, title, color, weight
// ==========================================

use crate::i18n::t_with_args;
use crate::importer::csv_reader::CsvRow;
use crate::importer::error::ImportResult;
use crate::importer::handler_trait::{
    resolve_update_target, set, ImportContext, ImportHandler, RowErrors, RowOutcome, RowReader,
    RowTarget,
};
use crate::repository::{Executor, FieldRepository, Record};
use tracing::debug;

const COLUMNS: &[&str] = &["field_value_id", "field_id", "title", "color", "weight"];

pub struct FieldValueImportHandler;

impl ImportHandler for FieldValueImportHandler {
    fn id(&self) -> &'static str {
        "field_value"
    }

    fn name(&self) -> &'static str {
        "Field values"
    }

    fn table(&self) -> &'static str {
        "field_value"
    }

    fn id_column(&self) -> &'static str {
        "field_value_id"
    }

    fn columns(&self) -> &'static [&'static str] {
        COLUMNS
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &["field_id", "title"]
    }

    fn import_row(&self, ex: &Executor, row: &CsvRow, ctx: &ImportContext) -> ImportResult<RowOutcome> {
        let reader = RowReader::new(row);
        let mut errors = RowErrors::new();
        let mut record = Record::new();

        let target = resolve_update_target(&reader, "field_value_id", "field value", ctx, &mut errors, |id| {
            FieldRepository::value_exists_tx(ex, id)
        })?;

        match reader.int("field_id", &mut errors) {
            Some(field_id) => {
                if !FieldRepository::exists_tx(ex, field_id)? {
                    errors.not_found("field", field_id);
                }
                set(&mut record, "field_id", field_id);
            }
            None if target.is_insert() && reader.text("field_id").is_none() => errors.required("field_id"),
            None => {}
        }

        match reader.text_max("title", 255, &mut errors) {
            Some(title) => set(&mut record, "title", title),
            None if target.is_insert() && reader.text("title").is_none() => errors.required("title"),
            None => {}
        }

        if let Some(color) = reader.text("color") {
            if reader.cleaner.is_valid_color(&color) {
                set(&mut record, "color", color.to_lowercase());
            } else {
                errors.push(t_with_args("validation.color", &[("value", &color)]));
            }
        }

        if let Some(weight) = reader.int("weight", &mut errors) {
            set(&mut record, "weight", weight);
        }

        errors.check(row.line)?;

        match target {
            RowTarget::Update(field_value_id) => {
                FieldRepository::update_value_tx(ex, field_value_id, &record)?;
                debug!(field_value_id, line = row.line, "field value updated");
                Ok(RowOutcome::Updated(field_value_id))
            }
            _ => {
                let field_value_id = FieldRepository::insert_value_tx(ex, &record)?;
                debug!(field_value_id, line = row.line, "field value inserted");
                Ok(RowOutcome::Inserted(field_value_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::error::ImportError;
    use crate::repository::Database;
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
    fn test_values_for_field() {
        let db = Database::open_in_memory().unwrap();
        db.install().unwrap();
        let field_id = db
            .insert(
                "field",
                json!({"title": "Color", "type": "option", "widget": "color"})
                    .as_object()
                    .unwrap(),
            )
            .unwrap();
        let ctx = ImportContext::default();
        let field = field_id.to_string();

        for (title, color) in [("Red", "#F00"), ("Blue", "#0000ff")] {
            db.transaction(|ex| {
                FieldValueImportHandler.import_row(
                    ex,
                    &row(&[("field_id", &field), ("title", title), ("color", color)]),
                    &ctx,
                )
            })
            .unwrap();
        }

        let values = FieldRepository::new(db.clone()).values(field_id).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].color, "#f00");

        let result = db.transaction(|ex| {
            FieldValueImportHandler.import_row(
                ex,
                &row(&[("field_id", "99"), ("title", "Green"), ("color", "green")]),
                &ctx,
            )
        });
        match result {
            Err(ImportError::RowRejected { errors, .. }) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
