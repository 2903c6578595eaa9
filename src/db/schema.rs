// ==========================================
// GPL Cart - schema definition types
// ==========================================
// Tables are declared as plain data (see tables.rs) and turned into
// CREATE TABLE / CREATE INDEX statements here.
// Identifiers are always double-quoted ("trigger" is a keyword).
// ==========================================

use std::collections::HashMap;

/// Column storage type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Real,
    Text,
    Varchar(u32),
    /// Serialized JSON (arrays and objects of ad hoc attributes)
    Blob,
}

impl FieldType {
    pub fn sql(&self) -> String {
        match self {
            FieldType::Integer => "INTEGER".to_string(),
            FieldType::Real => "REAL".to_string(),
            FieldType::Text => "TEXT".to_string(),
            FieldType::Varchar(len) => format!("VARCHAR({})", len),
            FieldType::Blob => "BLOB".to_string(),
        }
    }

    pub fn is_serialized(&self) -> bool {
        matches!(self, FieldType::Blob)
    }
}

/// One column of a table
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: &'static str,
    pub field_type: FieldType,
    pub primary: bool,
    pub auto_increment: bool,
    pub not_null: bool,
    pub unique: bool,
    pub default: Option<&'static str>,
    /// (table, column)
    pub references: Option<(&'static str, &'static str)>,
    pub on_delete_cascade: bool,
}

impl FieldDef {
    fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            primary: false,
            auto_increment: false,
            not_null: false,
            unique: false,
            default: None,
            references: None,
            on_delete_cascade: false,
        }
    }

    pub fn int(name: &'static str) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub fn real(name: &'static str) -> Self {
        Self::new(name, FieldType::Real)
    }

    pub fn text(name: &'static str) -> Self {
        Self::new(name, FieldType::Text)
    }

    pub fn varchar(name: &'static str, len: u32) -> Self {
        Self::new(name, FieldType::Varchar(len))
    }

    pub fn blob(name: &'static str) -> Self {
        Self::new(name, FieldType::Blob)
    }

    /// INTEGER PRIMARY KEY AUTOINCREMENT
    pub fn serial(name: &'static str) -> Self {
        let mut f = Self::int(name);
        f.primary = true;
        f.auto_increment = true;
        f
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub fn references(mut self, table: &'static str, column: &'static str) -> Self {
        self.references = Some((table, column));
        self
    }

    pub fn cascade(mut self) -> Self {
        self.on_delete_cascade = true;
        self
    }

    fn column_sql(&self) -> String {
        let mut sql = format!("{} {}", quote_ident(self.name), self.field_type.sql());

        if self.primary {
            sql.push_str(" PRIMARY KEY");
            if self.auto_increment {
                sql.push_str(" AUTOINCREMENT");
            }
        }
        if self.not_null && !self.primary {
            sql.push_str(" NOT NULL");
        }
        if self.unique {
            sql.push_str(" UNIQUE");
        }
        if let Some(default) = self.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(default);
        }
        if let Some((table, column)) = self.references {
            sql.push_str(&format!(
                " REFERENCES {}({})",
                quote_ident(table),
                quote_ident(column)
            ));
            if self.on_delete_cascade {
                sql.push_str(" ON DELETE CASCADE");
            }
        }

        sql
    }
}

/// A table: columns plus composite unique keys and indexes
#[derive(Debug, Clone, PartialEq)]
pub struct TableDef {
    pub name: &'static str,
    pub fields: Vec<FieldDef>,
    pub unique_keys: Vec<Vec<&'static str>>,
    pub indexes: Vec<Vec<&'static str>>,
}

impl TableDef {
    pub fn new(name: &'static str, fields: Vec<FieldDef>) -> Self {
        Self {
            name,
            fields,
            unique_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn unique_key(mut self, columns: &[&'static str]) -> Self {
        self.unique_keys.push(columns.to_vec());
        self
    }

    pub fn index(mut self, columns: &[&'static str]) -> Self {
        self.indexes.push(columns.to_vec());
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn primary_key(&self) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.primary)
    }
}

/// All tables keyed by name
#[derive(Debug, Clone, Default)]
pub struct Schema {
    tables: HashMap<&'static str, TableDef>,
}

impl Schema {
    pub fn new(tables: Vec<TableDef>) -> Self {
        Self {
            tables: tables.into_iter().map(|t| (t.name, t)).collect(),
        }
    }

    /// The installed GPL Cart schema
    pub fn default_schema() -> Self {
        Self::new(super::tables::tables())
    }

    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.get(name)
    }

    pub fn table_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.tables.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// Double-quote an identifier
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// CREATE TABLE IF NOT EXISTS statement for a table definition
pub fn create_table_sql(def: &TableDef) -> String {
    let mut parts: Vec<String> = def.fields.iter().map(FieldDef::column_sql).collect();

    for key in &def.unique_keys {
        let cols: Vec<String> = key.iter().map(|c| quote_ident(c)).collect();
        parts.push(format!("UNIQUE ({})", cols.join(", ")));
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n);",
        quote_ident(def.name),
        parts.join(",\n    ")
    )
}

/// CREATE INDEX IF NOT EXISTS statements (index name: idx_<table>_<cols>)
pub fn create_index_sql(def: &TableDef) -> Vec<String> {
    def.indexes
        .iter()
        .map(|cols| {
            let name = format!("idx_{}_{}", def.name, cols.join("_"));
            let quoted: Vec<String> = cols.iter().map(|c| quote_ident(c)).collect();
            format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} ({});",
                quote_ident(&name),
                quote_ident(def.name),
                quoted.join(", ")
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TableDef {
        TableDef::new(
            "item",
            vec![
                FieldDef::serial("item_id"),
                FieldDef::int("store_id").not_null().references("store", "store_id"),
                FieldDef::varchar("sku", 255).not_null(),
                FieldDef::int("status").not_null().default("0"),
                FieldDef::blob("data"),
            ],
        )
        .unique_key(&["store_id", "sku"])
        .index(&["status"])
    }

    #[test]
    fn test_create_table_sql() {
        let sql = create_table_sql(&sample());

        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"item\""));
        assert!(sql.contains("\"item_id\" INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sql.contains("\"store_id\" INTEGER NOT NULL REFERENCES \"store\"(\"store_id\")"));
        assert!(sql.contains("\"sku\" VARCHAR(255) NOT NULL"));
        assert!(sql.contains("\"status\" INTEGER NOT NULL DEFAULT 0"));
        assert!(sql.contains("UNIQUE (\"store_id\", \"sku\")"));
    }

    #[test]
    fn test_create_index_sql() {
        let sql = create_index_sql(&sample());
        assert_eq!(
            sql,
            vec!["CREATE INDEX IF NOT EXISTS \"idx_item_status\" ON \"item\" (\"status\");".to_string()]
        );
    }

    #[test]
    fn test_quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("trigger"), "\"trigger\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_schema_lookup() {
        let schema = Schema::new(vec![sample()]);
        let table = schema.table("item").unwrap();
        assert_eq!(table.primary_key().unwrap().name, "item_id");
        assert!(table.has_field("sku"));
        assert!(!table.has_field("missing"));
        assert!(schema.table("missing").is_none());
    }
}
