// ==========================================
// GPL Cart - user import handler
// ==========================================
// Columns: user_id, store_id, role_id, email, name, password, status
// Passwords are hashed on import and never exported.
// ==========================================

use crate::engine::password;
use crate::i18n::t_with_args;
use crate::importer::csv_reader::CsvRow;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::handler_trait::{
    resolve_update_target, set, ImportContext, ImportHandler, RowErrors, RowOutcome, RowReader,
    RowTarget,
};
use crate::repository::user_repo::normalize_email;
use crate::repository::{Executor, Record, StoreRepository, UserRepository};
use serde_json::Value;
use tracing::debug;

const COLUMNS: &[&str] = &[
    "user_id", "store_id", "role_id", "email", "name", "password", "status",
];

pub struct UserImportHandler;

impl ImportHandler for UserImportHandler {
    fn id(&self) -> &'static str {
        "user"
    }

    fn name(&self) -> &'static str {
        "Users"
    }

    fn table(&self) -> &'static str {
        "user"
    }

    fn id_column(&self) -> &'static str {
        "user_id"
    }

    fn columns(&self) -> &'static [&'static str] {
        COLUMNS
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &["email", "name"]
    }

    fn import_row(&self, ex: &Executor, row: &CsvRow, ctx: &ImportContext) -> ImportResult<RowOutcome> {
        let reader = RowReader::new(row);
        let mut errors = RowErrors::new();
        let mut record = Record::new();

        let target = resolve_update_target(&reader, "user_id", "user", ctx, &mut errors, |id| {
            UserRepository::exists_tx(ex, id)
        })?;

        // ----- email -----
        match reader.text("email").map(|e| normalize_email(&e)) {
            Some(email) => {
                if !reader.cleaner.is_valid_email(&email) || email.chars().count() > 255 {
                    errors.push(t_with_args("validation.email", &[("value", &email)]));
                } else if UserRepository::email_taken_tx(ex, &email, target.update_id())? {
                    errors.push(t_with_args("validation.email_taken", &[("value", &email)]));
                }
                set(&mut record, "email", email);
            }
            None if target.is_insert() => errors.required("email"),
            None => {}
        }

        // ----- name -----
        match reader.text_max("name", 255, &mut errors) {
            Some(name) => set(&mut record, "name", name),
            None if target.is_insert() && reader.text("name").is_none() => errors.required("name"),
            None => {}
        }

        // ----- password -----
        let plain = reader.text("password");
        match &plain {
            Some(p) if !password::length_in_range(p, ctx.password_min_length, ctx.password_max_length) => {
                errors.push(t_with_args(
                    "validation.length_range",
                    &[
                        ("field", "password"),
                        ("min", &ctx.password_min_length.to_string()),
                        ("max", &ctx.password_max_length.to_string()),
                    ],
                ));
            }
            None if target.is_insert() => errors.required("password"),
            _ => {}
        }

        // ----- store / role / status -----
        match reader.int("store_id", &mut errors) {
            Some(store_id) => {
                if !StoreRepository::exists_tx(ex, store_id)? {
                    errors.not_found("store", store_id);
                }
                set(&mut record, "store_id", store_id);
            }
            None if target.is_insert() => {
                let store_id = ctx.store_id();
                if !StoreRepository::exists_tx(ex, store_id)? {
                    errors.not_found("store", store_id);
                }
                set(&mut record, "store_id", store_id);
            }
            None => {}
        }

        if let Some(role_id) = reader.int("role_id", &mut errors) {
            if role_id == 0 {
                set(&mut record, "role_id", Value::Null);
            } else {
                if !UserRepository::role_exists_tx(ex, role_id)? {
                    errors.not_found("role", role_id);
                }
                set(&mut record, "role_id", role_id);
            }
        }

        if let Some(status) = reader.bool("status", &mut errors) {
            set(&mut record, "status", status);
        }

        errors.check(row.line)?;

        if let Some(plain) = plain {
            let hash = password::hash_password(&plain)
                .map_err(|e| ImportError::InternalError(format!("password hash failed: {}", e)))?;
            set(&mut record, "hash", hash);
        }

        set(&mut record, "modified", ctx.now);
        match target {
            RowTarget::Update(user_id) => {
                UserRepository::update_tx(ex, user_id, &record)?;
                debug!(user_id, line = row.line, "user updated");
                Ok(RowOutcome::Updated(user_id))
            }
            _ => {
                set(&mut record, "created", ctx.now);
                let user_id = UserRepository::insert_tx(ex, &record)?;
                debug!(user_id, line = row.line, "user inserted");
                Ok(RowOutcome::Inserted(user_id))
            }
        }
    }

    fn export_row(&self, record: &Record, ctx: &ImportContext) -> Vec<String> {
        COLUMNS
            .iter()
            .map(|column| match *column {
                "password" => String::new(),
                other => crate::importer::handler_trait::export_value(record.get(other), ctx),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
        db.transaction(|ex| UserImportHandler.import_row(ex, row, &ctx))
    }

    #[test]
    fn test_insert_user_hashes_password() {
        let db = db();
        let outcome = import(
            &db,
            &row(&[
                ("email", "Jane@Example.com"),
                ("name", "Jane"),
                ("password", "s3cret-pass"),
                ("role_id", "2"),
                ("status", "1"),
            ]),
        )
        .unwrap();
        assert!(matches!(outcome, RowOutcome::Inserted(_)));

        let repo = UserRepository::new(db);
        let user = repo.find_by_email("jane@example.com").unwrap().unwrap();
        assert_eq!(user.role_id, 2);
        assert_ne!(user.hash, "s3cret-pass");
        assert!(repo.authenticate("jane@example.com", "s3cret-pass").unwrap().is_some());
        assert!(repo.authenticate("jane@example.com", "wrong-pass").unwrap().is_none());
    }

    #[test]
    fn test_login_with_imported_spelling() {
        let db = db();
        import(
            &db,
            &row(&[("email", "Jane@Example.com"), ("name", "Jane"), ("password", "secret-pass"), ("status", "1")]),
        )
        .unwrap();

        let repo = UserRepository::new(db);
        assert!(repo.authenticate("Jane@Example.com", "secret-pass").unwrap().is_some());
        assert!(repo.authenticate(" JANE@example.com ", "secret-pass").unwrap().is_some());
    }

    #[test]
    fn test_role_zero_stored_as_null() {
        let db = db();
        let RowOutcome::Inserted(id) = import(
            &db,
            &row(&[("email", "r@example.com"), ("name", "R"), ("password", "password1"), ("role_id", "0")]),
        )
        .unwrap() else {
            panic!("expected insert");
        };

        let record = db
            .fetch("user", &crate::repository::Conditions::new().eq("user_id", id))
            .unwrap()
            .unwrap();
        assert_eq!(record.get("role_id"), Some(&Value::Null));
        assert_eq!(UserRepository::new(db).find(id).unwrap().unwrap().role_id, 0);
    }

    #[test]
    fn test_unknown_role_blocked_by_foreign_key() {
        let db = db();
        let result = db.insert(
            "user",
            &serde_json::json!({"email": "fk@example.com", "name": "Fk", "role_id": 77})
                .as_object()
                .cloned()
                .unwrap(),
        );
        assert!(matches!(result, Err(crate::repository::RepositoryError::ForeignKeyViolation(_))));
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let db = db();
        let user = row(&[("email", "a@example.com"), ("name", "A"), ("password", "password1")]);
        import(&db, &user).unwrap();

        let result = import(&db, &user);
        assert!(matches!(result, Err(ImportError::RowRejected { .. })));
    }

    #[test]
    fn test_update_keeps_own_email() {
        let db = db();
        let RowOutcome::Inserted(id) = import(
            &db,
            &row(&[("email", "b@example.com"), ("name", "B"), ("password", "password1")]),
        )
        .unwrap() else {
            panic!("expected insert");
        };

        let outcome = import(
            &db,
            &row(&[("user_id", &id.to_string()), ("email", "b@example.com"), ("name", "Bee")]),
        )
        .unwrap();
        assert_eq!(outcome, RowOutcome::Updated(id));
        assert_eq!(UserRepository::new(db).find(id).unwrap().unwrap().name, "Bee");
    }

    #[test]
    fn test_validation_messages_collected() {
        let db = db();
        let result = import(
            &db,
            &row(&[("email", "not-an-email"), ("name", ""), ("password", "short"), ("role_id", "77")]),
        );
        match result {
            Err(ImportError::RowRejected { errors, .. }) => assert_eq!(errors.len(), 4),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_export_omits_password() {
        let ctx = ImportContext::default();
        let mut record = Record::new();
        set(&mut record, "user_id", 3);
        set(&mut record, "email", "c@example.com");
        set(&mut record, "hash", "$argon2id$...");
        let line = UserImportHandler.export_row(&record, &ctx);
        assert_eq!(line[0], "3");
        assert_eq!(line[3], "c@example.com");
        assert_eq!(line[5], "");
    }
}
