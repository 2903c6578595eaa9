// ==========================================
// GPL Cart - category import handler
// ==========================================
// Columns: category_id, category_group_id, parent_id, title,
// description, status, weight, alias
// Constraint: the parent belongs to the same group and is not the
// category itself
// ==========================================

use crate::i18n::{t, t_with_args};
use crate::importer::csv_reader::CsvRow;
use crate::importer::error::ImportResult;
use crate::importer::handler_trait::{
    resolve_update_target, set, ImportContext, ImportHandler, RowErrors, RowOutcome, RowReader,
    RowTarget,
};
use crate::repository::{CategoryRepository, Executor, Record};
use tracing::debug;

const COLUMNS: &[&str] = &[
    "category_id",
    "category_group_id",
    "parent_id",
    "title",
    "description",
    "status",
    "weight",
    "alias",
];

pub struct CategoryImportHandler;

impl ImportHandler for CategoryImportHandler {
    fn id(&self) -> &'static str {
        "category"
    }

    fn name(&self) -> &'static str {
        "Categories"
    }

    fn table(&self) -> &'static str {
        "category"
    }

    fn id_column(&self) -> &'static str {
        "category_id"
    }

    fn columns(&self) -> &'static [&'static str] {
        COLUMNS
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &["title", "category_group_id"]
    }

    fn import_row(&self, ex: &Executor, row: &CsvRow, ctx: &ImportContext) -> ImportResult<RowOutcome> {
        let reader = RowReader::new(row);
        let mut errors = RowErrors::new();
        let mut record = Record::new();

        let target = resolve_update_target(&reader, "category_id", "category", ctx, &mut errors, |id| {
            CategoryRepository::exists_tx(ex, id)
        })?;
        let existing = match target.update_id() {
            Some(id) => CategoryRepository::find_tx(ex, id)?,
            None => None,
        };

        // ----- group -----
        let group_id = match reader.int("category_group_id", &mut errors) {
            Some(id) => {
                if CategoryRepository::find_group_tx(ex, id)?.is_none() {
                    errors.not_found("category group", id);
                }
                set(&mut record, "category_group_id", id);
                Some(id)
            }
            None => {
                if target.is_insert() && reader.text("category_group_id").is_none() {
                    errors.required("category_group_id");
                }
                existing.as_ref().map(|c| c.category_group_id)
            }
        };

        // ----- parent -----
        if let Some(parent_id) = reader.int("parent_id", &mut errors) {
            if target.update_id() == Some(parent_id) {
                errors.push(t("validation.self_parent"));
            } else if parent_id > 0 {
                match CategoryRepository::find_tx(ex, parent_id)? {
                    None => errors.not_found("category", parent_id),
                    Some(parent) if Some(parent.category_group_id) != group_id => {
                        errors.push(t_with_args(
                            "validation.parent_group",
                            &[("id", &parent_id.to_string())],
                        ));
                    }
                    Some(_) => {}
                }
            }
            set(&mut record, "parent_id", parent_id);
        }

        // ----- text / flags -----
        match reader.text_max("title", 255, &mut errors) {
            Some(title) => set(&mut record, "title", title),
            None if target.is_insert() && reader.text("title").is_none() => errors.required("title"),
            None => {}
        }
        if let Some(description) = reader.text("description") {
            set(&mut record, "description", description);
        }
        if let Some(alias) = reader.text_max("alias", 255, &mut errors) {
            set(&mut record, "alias", alias);
        }
        if let Some(status) = reader.bool("status", &mut errors) {
            set(&mut record, "status", status);
        }
        if let Some(weight) = reader.int("weight", &mut errors) {
            set(&mut record, "weight", weight);
        }

        errors.check(row.line)?;

        match target {
            RowTarget::Update(category_id) => {
                CategoryRepository::update_tx(ex, category_id, &record)?;
                debug!(category_id, line = row.line, "category updated");
                Ok(RowOutcome::Updated(category_id))
            }
            _ => {
                let category_id = CategoryRepository::insert_tx(ex, &record)?;
                debug!(category_id, line = row.line, "category inserted");
                Ok(RowOutcome::Inserted(category_id))
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

    fn db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.install().unwrap();
        db
    }

    fn row(pairs: &[(&str, &str)]) -> CsvRow {
        CsvRow {
            line: 2,
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    fn import(db: &Database, row: &CsvRow) -> ImportResult<RowOutcome> {
        let ctx = ImportContext::default();
        db.transaction(|ex| CategoryImportHandler.import_row(ex, row, &ctx))
    }

    #[test]
    fn test_insert_tree() {
        let db = db();
        let RowOutcome::Inserted(root) =
            import(&db, &row(&[("title", "Clothes"), ("category_group_id", "1"), ("status", "yes")])).unwrap()
        else {
            panic!("expected insert");
        };
        let RowOutcome::Inserted(child) = import(
            &db,
            &row(&[("title", "Shirts"), ("category_group_id", "1"), ("parent_id", &root.to_string())]),
        )
        .unwrap() else {
            panic!("expected insert");
        };

        let repo = CategoryRepository::new(db);
        let children = repo.children(1, root).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].category_id, child);
        assert!(repo.find(root).unwrap().unwrap().status);
    }

    #[test]
    fn test_parent_from_other_group_rejected() {
        let db = db();
        let RowOutcome::Inserted(brand) =
            import(&db, &row(&[("title", "Acme"), ("category_group_id", "2")])).unwrap()
        else {
            panic!("expected insert");
        };

        let result = import(
            &db,
            &row(&[("title", "Shirts"), ("category_group_id", "1"), ("parent_id", &brand.to_string())]),
        );
        assert!(matches!(result, Err(ImportError::RowRejected { .. })));
    }

    #[test]
    fn test_own_parent_rejected() {
        let db = db();
        let RowOutcome::Inserted(id) =
            import(&db, &row(&[("title", "Loop"), ("category_group_id", "1")])).unwrap()
        else {
            panic!("expected insert");
        };

        let result = import(
            &db,
            &row(&[("category_id", &id.to_string()), ("parent_id", &id.to_string())]),
        );
        assert!(matches!(result, Err(ImportError::RowRejected { .. })));
    }

    #[test]
    fn test_unknown_group_rejected() {
        let db = db();
        let result = import(&db, &row(&[("title", "Orphan"), ("category_group_id", "9")]));
        match result {
            Err(ImportError::RowRejected { errors, .. }) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
