// ==========================================
// GPL Cart - field import handler
// ==========================================
// Columns: field_id, title, type, widget, weight
// ==========================================

use crate::domain::{FieldKind, FieldWidget};
use crate::i18n::t_with_args;
use crate::importer::csv_reader::CsvRow;
use crate::importer::error::ImportResult;
use crate::importer::handler_trait::{
    resolve_update_target, set, ImportContext, ImportHandler, RowErrors, RowOutcome, RowReader,
    RowTarget,
};
use crate::repository::{Executor, FieldRepository, Record};
use tracing::debug;

const COLUMNS: &[&str] = &["field_id", "title", "type", "widget", "weight"];

pub struct FieldImportHandler;

impl ImportHandler for FieldImportHandler {
    fn id(&self) -> &'static str {
        "field"
    }

    fn name(&self) -> &'static str {
        "Fields"
    }

    fn table(&self) -> &'static str {
        "field"
    }

    fn id_column(&self) -> &'static str {
        "field_id"
    }

    fn columns(&self) -> &'static [&'static str] {
        COLUMNS
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &["title", "type", "widget"]
    }

    fn import_row(&self, ex: &Executor, row: &CsvRow, ctx: &ImportContext) -> ImportResult<RowOutcome> {
        let reader = RowReader::new(row);
        let mut errors = RowErrors::new();
        let mut record = Record::new();

        let target = resolve_update_target(&reader, "field_id", "field", ctx, &mut errors, |id| {
            FieldRepository::exists_tx(ex, id)
        })?;

        match reader.text_max("title", 255, &mut errors) {
            Some(title) => set(&mut record, "title", title),
            None if target.is_insert() && reader.text("title").is_none() => errors.required("title"),
            None => {}
        }

        match reader.text("type") {
            Some(raw) => match raw.parse::<FieldKind>() {
                Ok(kind) => set(&mut record, "type", kind.to_string()),
                Err(_) => errors.push(t_with_args("validation.field_type", &[("value", &raw)])),
            },
            None if target.is_insert() => errors.required("type"),
            None => {}
        }

        match reader.text("widget") {
            Some(raw) => match raw.parse::<FieldWidget>() {
                Ok(widget) => set(&mut record, "widget", widget.to_string()),
                Err(_) => errors.push(t_with_args("validation.widget", &[("value", &raw)])),
            },
            None if target.is_insert() => errors.required("widget"),
            None => {}
        }

        if let Some(weight) = reader.int("weight", &mut errors) {
            set(&mut record, "weight", weight);
        }

        errors.check(row.line)?;

        match target {
            RowTarget::Update(field_id) => {
                FieldRepository::update_tx(ex, field_id, &record)?;
                debug!(field_id, line = row.line, "field updated");
                Ok(RowOutcome::Updated(field_id))
            }
            _ => {
                let field_id = FieldRepository::insert_tx(ex, &record)?;
                debug!(field_id, line = row.line, "field inserted");
                Ok(RowOutcome::Inserted(field_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::error::ImportError;
    use crate::repository::Database;
    use std::collections::HashMap;

    fn row(pairs: &[(&str, &str)]) -> CsvRow {
        CsvRow {
            line: 4,
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_insert_and_reject() {
        let db = Database::open_in_memory().unwrap();
        db.install().unwrap();
        let ctx = ImportContext::default();

        let outcome = db
            .transaction(|ex| {
                FieldImportHandler.import_row(
                    ex,
                    &row(&[("title", "Color"), ("type", "Option"), ("widget", "color"), ("weight", "2")]),
                    &ctx,
                )
            })
            .unwrap();
        let RowOutcome::Inserted(id) = outcome else {
            panic!("expected insert");
        };
        let field = FieldRepository::new(db.clone()).find(id).unwrap().unwrap();
        assert_eq!(field.kind, FieldKind::Option);
        assert_eq!(field.widget, FieldWidget::Color);
        assert_eq!(field.weight, 2);

        let result = db.transaction(|ex| {
            FieldImportHandler.import_row(
                ex,
                &row(&[("title", "Size"), ("type", "variant"), ("widget", "slider")]),
                &ctx,
            )
        });
        match result {
            Err(ImportError::RowRejected { line, errors }) => {
                assert_eq!(line, 4);
                assert_eq!(errors.len(), 2);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
