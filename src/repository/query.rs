// ==========================================
// GPL Cart - key/value conditions to SQL
// ==========================================
// Conditions are an ordered AND-list of (column, filter).
// Column names are checked against the table definition before they
// reach the SQL text; values are always bound parameters.
// ==========================================

use crate::db::schema::{quote_ident, FieldType, TableDef};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::{Value as SqlValue, ValueRef};
use serde_json::Value;

/// One column filter
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Ge(Value),
    Lt(Value),
    Le(Value),
    In(Vec<Value>),
    Like(String),
    IsNull,
    NotNull,
}

/// AND-combined column filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    items: Vec<(String, Filter)>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, column: &str, filter: Filter) -> Self {
        self.items.push((column.to_string(), filter));
        self
    }

    pub fn eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(column, Filter::Eq(value.into()))
    }

    pub fn ne(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(column, Filter::Ne(value.into()))
    }

    pub fn gt(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(column, Filter::Gt(value.into()))
    }

    pub fn ge(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(column, Filter::Ge(value.into()))
    }

    pub fn lt(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(column, Filter::Lt(value.into()))
    }

    pub fn le(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(column, Filter::Le(value.into()))
    }

    pub fn in_list<V, I>(self, column: &str, values: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.filter(column, Filter::In(values))
    }

    pub fn like(self, column: &str, pattern: &str) -> Self {
        self.filter(column, Filter::Like(pattern.to_string()))
    }

    pub fn is_null(self, column: &str) -> Self {
        self.filter(column, Filter::IsNull)
    }

    pub fn not_null(self, column: &str) -> Self {
        self.filter(column, Filter::NotNull)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// WHERE clause (empty string when there are no conditions) and its parameters
    pub fn to_sql(&self, table: &TableDef) -> RepositoryResult<(String, Vec<SqlValue>)> {
        if self.items.is_empty() {
            return Ok((String::new(), Vec::new()));
        }

        let mut clauses = Vec::with_capacity(self.items.len());
        let mut params = Vec::new();

        for (column, filter) in &self.items {
            let field = table.field(column).ok_or_else(|| RepositoryError::UnknownColumn {
                table: table.name.to_string(),
                column: column.clone(),
            })?;
            let col = quote_ident(column);
            let ty = field.field_type;

            let clause = match filter {
                Filter::Eq(v) => binary(&col, "=", v, ty, &mut params),
                Filter::Ne(v) => binary(&col, "!=", v, ty, &mut params),
                Filter::Gt(v) => binary(&col, ">", v, ty, &mut params),
                Filter::Ge(v) => binary(&col, ">=", v, ty, &mut params),
                Filter::Lt(v) => binary(&col, "<", v, ty, &mut params),
                Filter::Le(v) => binary(&col, "<=", v, ty, &mut params),
                Filter::In(values) if values.is_empty() => "1 = 0".to_string(),
                Filter::In(values) => {
                    let marks = vec!["?"; values.len()].join(", ");
                    params.extend(values.iter().map(|v| to_sql_value(v, ty)));
                    format!("{} IN ({})", col, marks)
                }
                Filter::Like(pattern) => {
                    params.push(SqlValue::Text(pattern.clone()));
                    format!("{} LIKE ?", col)
                }
                Filter::IsNull => format!("{} IS NULL", col),
                Filter::NotNull => format!("{} IS NOT NULL", col),
            };
            clauses.push(clause);
        }

        Ok((format!(" WHERE {}", clauses.join(" AND ")), params))
    }
}

fn binary(col: &str, op: &str, value: &Value, ty: FieldType, params: &mut Vec<SqlValue>) -> String {
    // `= NULL` never matches in SQL
    if value.is_null() {
        return match op {
            "=" => format!("{} IS NULL", col),
            "!=" => format!("{} IS NOT NULL", col),
            _ => "1 = 0".to_string(),
        };
    }
    params.push(to_sql_value(value, ty));
    format!("{} {} ?", col, op)
}

/// ORDER BY / LIMIT / OFFSET
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pub order_by: Option<String>,
    pub descending: bool,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_by(mut self, column: &str) -> Self {
        self.order_by = Some(column.to_string());
        self
    }

    pub fn desc(mut self) -> Self {
        self.descending = true;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn to_sql(&self, table: &TableDef) -> RepositoryResult<String> {
        let mut sql = String::new();

        if let Some(column) = &self.order_by {
            if !table.has_field(column) {
                return Err(RepositoryError::UnknownColumn {
                    table: table.name.to_string(),
                    column: column.clone(),
                });
            }
            sql.push_str(&format!(
                " ORDER BY {} {}",
                quote_ident(column),
                if self.descending { "DESC" } else { "ASC" }
            ));
        }

        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset)),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {}", limit)),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {}", offset)),
            (None, None) => {}
        }

        Ok(sql)
    }
}

/// JSON value -> SQLite value for a column of the given type
///
/// Blob columns store the JSON text of the value; booleans become 0/1.
pub fn to_sql_value(value: &Value, ty: FieldType) -> SqlValue {
    if value.is_null() {
        return SqlValue::Null;
    }

    if ty.is_serialized() {
        return SqlValue::Text(value.to_string());
    }

    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or(0.0)),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(value.to_string()),
    }
}

/// SQLite value -> JSON value for a column of the given type
///
/// Blob columns are parsed back from JSON; text that is not valid JSON is
/// returned as a plain string.
pub fn from_sql_value(value: ValueRef<'_>, ty: Option<FieldType>) -> Value {
    let serialized = ty.map(|t| t.is_serialized()).unwrap_or(false);

    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            if serialized {
                serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text.into_owned()))
            } else {
                Value::String(text.into_owned())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::FieldDef;
    use serde_json::json;

    fn table() -> TableDef {
        TableDef::new(
            "product",
            vec![
                FieldDef::serial("product_id"),
                FieldDef::int("store_id"),
                FieldDef::varchar("sku", 255),
                FieldDef::blob("data"),
            ],
        )
    }

    #[test]
    fn test_empty_conditions() {
        let (sql, params) = Conditions::new().to_sql(&table()).unwrap();
        assert_eq!(sql, "");
        assert!(params.is_empty());
    }

    #[test]
    fn test_conditions_to_sql() {
        let conditions = Conditions::new()
            .eq("store_id", 1)
            .in_list("product_id", vec![1, 2, 3])
            .like("sku", "ABC%");

        let (sql, params) = conditions.to_sql(&table()).unwrap();

        assert_eq!(
            sql,
            " WHERE \"store_id\" = ? AND \"product_id\" IN (?, ?, ?) AND \"sku\" LIKE ?"
        );
        assert_eq!(params.len(), 5);
        assert_eq!(params[0], SqlValue::Integer(1));
        assert_eq!(params[4], SqlValue::Text("ABC%".to_string()));
    }

    #[test]
    fn test_unknown_column_rejected() {
        let result = Conditions::new().eq("1=1; DROP TABLE product", 1).to_sql(&table());
        assert!(matches!(result, Err(RepositoryError::UnknownColumn { .. })));
    }

    #[test]
    fn test_empty_in_list_matches_nothing() {
        let (sql, params) = Conditions::new()
            .in_list("product_id", Vec::<i64>::new())
            .to_sql(&table())
            .unwrap();
        assert_eq!(sql, " WHERE 1 = 0");
        assert!(params.is_empty());
    }

    #[test]
    fn test_eq_null_becomes_is_null() {
        let (sql, params) = Conditions::new()
            .eq("sku", Value::Null)
            .to_sql(&table())
            .unwrap();
        assert_eq!(sql, " WHERE \"sku\" IS NULL");
        assert!(params.is_empty());
    }

    #[test]
    fn test_query_options() {
        let sql = QueryOptions::new()
            .order_by("sku")
            .desc()
            .limit(10)
            .offset(20)
            .to_sql(&table())
            .unwrap();
        assert_eq!(sql, " ORDER BY \"sku\" DESC LIMIT 10 OFFSET 20");

        let sql = QueryOptions::new().offset(5).to_sql(&table()).unwrap();
        assert_eq!(sql, " LIMIT -1 OFFSET 5");
    }

    #[test]
    fn test_blob_values_serialized() {
        let value = json!({"color": "red"});
        assert_eq!(
            to_sql_value(&value, FieldType::Blob),
            SqlValue::Text("{\"color\":\"red\"}".to_string())
        );

        let back = from_sql_value(ValueRef::Text(b"{\"color\":\"red\"}"), Some(FieldType::Blob));
        assert_eq!(back, value);
    }

    #[test]
    fn test_invalid_blob_json_kept_as_string() {
        let back = from_sql_value(ValueRef::Text(b"not json"), Some(FieldType::Blob));
        assert_eq!(back, Value::String("not json".to_string()));
    }

    #[test]
    fn test_bool_to_integer() {
        assert_eq!(to_sql_value(&json!(true), FieldType::Integer), SqlValue::Integer(1));
    }
}
