use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;
use sqlx::MySql;
use sqlx::mysql::MySqlArguments;
use sqlx::query::{Query, QueryAs};

use crate::error::AppError;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Json(Value),
    Null,
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::String(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::String(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl From<NaiveTime> for SqlValue {
    fn from(v: NaiveTime) -> Self {
        SqlValue::Time(v)
    }
}

/// ===============================
/// SQL statement container
/// ===============================
#[derive(Debug)]
pub struct SqlStatement {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// WHERE clause builder
/// ===============================
#[derive(Debug, Default)]
pub struct WhereClause {
    conditions: Vec<String>,
    values: Vec<SqlValue>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.conditions.push(format!("{} = ?", column));
        self.values.push(value.into());
        self
    }

    pub fn eq_opt<V: Into<SqlValue>>(self, column: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.eq(column, v),
            None => self,
        }
    }

    /// `column >= ?`
    pub fn from_opt<V: Into<SqlValue>>(mut self, column: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.conditions.push(format!("{} >= ?", column));
            self.values.push(v.into());
        }
        self
    }

    /// `column <= ?`
    pub fn until_opt<V: Into<SqlValue>>(mut self, column: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.conditions.push(format!("{} <= ?", column));
            self.values.push(v.into());
        }
        self
    }

    /// Case-insensitive substring match against any of `columns`.
    pub fn search_opt(mut self, columns: &[&str], term: Option<&str>) -> Self {
        let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
            return self;
        };
        let like = format!("%{}%", term.to_lowercase());
        let parts = columns
            .iter()
            .map(|c| format!("LOWER({}) LIKE ?", c))
            .collect::<Vec<_>>()
            .join(" OR ");
        self.conditions.push(format!("({})", parts));
        for _ in columns {
            self.values.push(SqlValue::String(like.clone()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Renders `WHERE a = ? AND b = ?` (or nothing) plus the values to bind.
    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        if self.conditions.is_empty() {
            (String::new(), self.values)
        } else {
            (format!(" WHERE {}", self.conditions.join(" AND ")), self.values)
        }
    }
}

/// Convert JSON values → SqlValue
fn json_to_sql(value: &Value) -> SqlValue {
    match value {
        Value::String(s) => {
            if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                SqlValue::Date(d)
            } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                SqlValue::DateTime(dt)
            } else if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
                SqlValue::DateTime(dt.naive_utc())
            } else {
                SqlValue::String(s.clone())
            }
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                SqlValue::I64(i)
            } else {
                SqlValue::F64(n.as_f64().unwrap_or_default())
            }
        }
        Value::Bool(b) => SqlValue::Bool(*b),
        Value::Null => SqlValue::Null,
        Value::Object(_) | Value::Array(_) => SqlValue::Json(value.clone()),
    }
}

fn as_object<'a>(payload: &'a Value) -> Result<&'a serde_json::Map<String, Value>, AppError> {
    payload
        .as_object()
        .ok_or_else(|| AppError::bad_request("Payload must be a JSON object"))
}

/// ===============================
/// Build dynamic INSERT SQL
/// ===============================
pub fn build_insert_sql(table: &str, payload: &Value) -> Result<SqlStatement, AppError> {
    let obj = as_object(payload)?;

    if obj.is_empty() {
        return Err(AppError::bad_request("No fields provided for insert"));
    }

    let columns = obj.keys().cloned().collect::<Vec<_>>().join(", ");
    let placeholders = vec!["?"; obj.len()].join(", ");

    let sql = format!("INSERT INTO {} ({}) VALUES ({})", table, columns, placeholders);
    let values = obj.values().map(json_to_sql).collect();

    Ok(SqlStatement { sql, values })
}

/// ===============================
/// Build dynamic UPDATE SQL
/// ===============================
pub fn build_update_sql(
    table: &str,
    payload: &Value,
    id_column: &str,
    id_value: &str,
) -> Result<SqlStatement, AppError> {
    let obj = as_object(payload)?;

    if obj.is_empty() {
        return Err(AppError::bad_request("No fields provided for update"));
    }

    // Build SET clause
    let set_clause = obj
        .keys()
        .map(|k| format!("{} = ?", k))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);

    let mut values = Vec::with_capacity(obj.len() + 1);
    values.extend(obj.values().map(json_to_sql));

    // WHERE id = ?
    values.push(SqlValue::String(id_value.to_string()));

    Ok(SqlStatement { sql, values })
}

/// ===============================
/// Bind values onto a query
/// ===============================
// `Query` and `QueryAs` share `bind` by name only, not through a trait.
macro_rules! bind_sql_values {
    ($query:expr, $values:expr) => {{
        let mut query = $query;
        for value in $values {
            query = match value {
                SqlValue::String(v) => query.bind(v),
                SqlValue::I64(v) => query.bind(v),
                SqlValue::F64(v) => query.bind(v),
                SqlValue::Bool(v) => query.bind(v),
                SqlValue::Date(v) => query.bind(v),
                SqlValue::Time(v) => query.bind(v),
                SqlValue::DateTime(v) => query.bind(v),
                SqlValue::Json(v) => query.bind(sqlx::types::Json(v)),
                SqlValue::Null => query.bind(None::<String>),
            };
        }
        query
    }};
}

pub fn bind_query<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    values: Vec<SqlValue>,
) -> Query<'q, MySql, MySqlArguments> {
    bind_sql_values!(query, values)
}

pub fn bind_query_as<'q, O>(
    query: QueryAs<'q, MySql, O, MySqlArguments>,
    values: Vec<SqlValue>,
) -> QueryAs<'q, MySql, O, MySqlArguments> {
    bind_sql_values!(query, values)
}
