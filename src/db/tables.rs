// ==========================================
// GPL Cart - table definitions
// ==========================================
// Timestamps: INTEGER unix seconds
// Prices: INTEGER minor units
// BLOB columns: serialized JSON
// ==========================================

use super::schema::{FieldDef, TableDef};

pub fn tables() -> Vec<TableDef> {
    vec![
        TableDef::new(
            "schema_version",
            vec![
                FieldDef::int("version").primary(),
                FieldDef::int("applied_at").not_null().default("0"),
            ],
        ),
        TableDef::new(
            "settings",
            vec![
                FieldDef::varchar("id", 255).primary(),
                FieldDef::blob("value"),
                FieldDef::int("created").not_null().default("0"),
            ],
        ),
        TableDef::new(
            "store",
            vec![
                FieldDef::serial("store_id"),
                FieldDef::varchar("name", 255).not_null(),
                FieldDef::varchar("domain", 255).not_null().default("''"),
                FieldDef::varchar("basepath", 255).not_null().default("''"),
                FieldDef::int("status").not_null().default("0"),
                FieldDef::blob("data"),
            ],
        ),
        TableDef::new(
            "role",
            vec![
                FieldDef::serial("role_id"),
                FieldDef::varchar("name", 255).not_null(),
                FieldDef::int("status").not_null().default("0"),
                FieldDef::blob("permissions"),
            ],
        ),
        TableDef::new(
            "user",
            vec![
                FieldDef::serial("user_id"),
                FieldDef::int("store_id")
                    .not_null()
                    .default("1")
                    .references("store", "store_id"),
                FieldDef::int("role_id").references("role", "role_id"),
                FieldDef::varchar("email", 255).not_null().unique(),
                FieldDef::varchar("name", 255).not_null(),
                FieldDef::text("hash").not_null().default("''"),
                FieldDef::int("status").not_null().default("0"),
                FieldDef::blob("data"),
                FieldDef::int("created").not_null().default("0"),
                FieldDef::int("modified").not_null().default("0"),
            ],
        )
        .index(&["role_id"]),
        TableDef::new(
            "category_group",
            vec![
                FieldDef::serial("category_group_id"),
                FieldDef::int("store_id")
                    .not_null()
                    .references("store", "store_id"),
                FieldDef::varchar("title", 255).not_null(),
                FieldDef::varchar("type", 50).not_null().default("'catalog'"),
            ],
        ),
        TableDef::new(
            "category",
            vec![
                FieldDef::serial("category_id"),
                FieldDef::int("category_group_id")
                    .not_null()
                    .references("category_group", "category_group_id")
                    .cascade(),
                FieldDef::int("parent_id").not_null().default("0"),
                FieldDef::varchar("title", 255).not_null(),
                FieldDef::text("description").not_null().default("''"),
                FieldDef::int("status").not_null().default("0"),
                FieldDef::int("weight").not_null().default("0"),
                FieldDef::varchar("alias", 255).not_null().default("''"),
                FieldDef::blob("data"),
            ],
        )
        .index(&["category_group_id", "parent_id"]),
        TableDef::new(
            "product",
            vec![
                FieldDef::serial("product_id"),
                FieldDef::int("store_id")
                    .not_null()
                    .references("store", "store_id"),
                FieldDef::varchar("sku", 255).not_null().default("''"),
                FieldDef::varchar("title", 255).not_null(),
                FieldDef::text("description").not_null().default("''"),
                FieldDef::int("price").not_null().default("0"),
                FieldDef::varchar("currency", 3).not_null(),
                FieldDef::int("stock").not_null().default("0"),
                FieldDef::int("status").not_null().default("0"),
                FieldDef::int("category_id").not_null().default("0"),
                FieldDef::int("brand_category_id").not_null().default("0"),
                FieldDef::blob("images"),
                FieldDef::blob("data"),
                FieldDef::int("created").not_null().default("0"),
                FieldDef::int("modified").not_null().default("0"),
            ],
        )
        .index(&["store_id", "sku"])
        .index(&["category_id"]),
        TableDef::new(
            "field",
            vec![
                FieldDef::serial("field_id"),
                FieldDef::varchar("title", 255).not_null(),
                FieldDef::varchar("type", 50).not_null(),
                FieldDef::varchar("widget", 50).not_null(),
                FieldDef::int("weight").not_null().default("0"),
            ],
        ),
        TableDef::new(
            "field_value",
            vec![
                FieldDef::serial("field_value_id"),
                FieldDef::int("field_id")
                    .not_null()
                    .references("field", "field_id")
                    .cascade(),
                FieldDef::varchar("title", 255).not_null(),
                FieldDef::varchar("color", 10).not_null().default("''"),
                FieldDef::int("weight").not_null().default("0"),
            ],
        )
        .index(&["field_id"]),
        TableDef::new(
            "trigger",
            vec![
                FieldDef::serial("trigger_id"),
                FieldDef::int("store_id")
                    .not_null()
                    .references("store", "store_id"),
                FieldDef::varchar("name", 255).not_null(),
                FieldDef::int("status").not_null().default("0"),
                FieldDef::int("weight").not_null().default("0"),
                FieldDef::blob("data"),
            ],
        ),
        TableDef::new(
            "price_rule",
            vec![
                FieldDef::serial("price_rule_id"),
                FieldDef::int("trigger_id")
                    .not_null()
                    .references("trigger", "trigger_id")
                    .cascade(),
                FieldDef::int("store_id")
                    .not_null()
                    .references("store", "store_id"),
                FieldDef::varchar("name", 255).not_null(),
                FieldDef::varchar("code", 255).not_null().default("''"),
                FieldDef::varchar("value", 50).not_null().default("'0'"),
                FieldDef::varchar("value_type", 10).not_null().default("'percent'"),
                FieldDef::varchar("currency", 3).not_null(),
                FieldDef::int("status").not_null().default("0"),
                FieldDef::int("weight").not_null().default("0"),
                FieldDef::int("used").not_null().default("0"),
            ],
        ),
        TableDef::new(
            "job",
            vec![
                FieldDef::varchar("job_id", 64).primary(),
                FieldDef::varchar("handler_id", 50).not_null(),
                FieldDef::varchar("status", 20).not_null(),
                FieldDef::text("file").not_null(),
                FieldDef::int("total").not_null().default("0"),
                FieldDef::int("offset").not_null().default("0"),
                FieldDef::int("line").not_null().default("0"),
                FieldDef::int("inserted").not_null().default("0"),
                FieldDef::int("updated").not_null().default("0"),
                FieldDef::int("errors").not_null().default("0"),
                FieldDef::text("log_file").not_null().default("''"),
                FieldDef::blob("options"),
                FieldDef::text("message").not_null().default("''"),
                FieldDef::int("created").not_null().default("0"),
                FieldDef::int("modified").not_null().default("0"),
            ],
        )
        .index(&["status"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_names_unique() {
        let all = tables();
        let names: HashSet<_> = all.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), all.len());
    }

    #[test]
    fn test_every_table_has_primary_key() {
        for table in tables() {
            assert!(table.primary_key().is_some(), "{} has no primary key", table.name);
        }
    }

    #[test]
    fn test_references_point_to_declared_tables() {
        let all = tables();
        let names: HashSet<_> = all.iter().map(|t| t.name).collect();
        for table in &all {
            for field in &table.fields {
                if let Some((target, _)) = field.references {
                    assert!(names.contains(target), "{}.{} -> {}", table.name, field.name, target);
                }
            }
        }
    }
}
