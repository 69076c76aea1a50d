//! Translation of [`Predicate`] trees into parameterised SQLite.
//!
//! Field access goes through `json_extract(body, path)`. Field names and
//! values are always bound as parameters, never spliced into the SQL text.

use rusqlite::types::Value as SqlValue;
use serde_json::Value;

use tracity_core::{Predicate, SortDirection, SortSpec};

/// A WHERE fragment with its positional parameters.
#[derive(Debug, Default)]
pub struct SqlFragment {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// JSON path for a top-level key. Quotes are dropped since SQLite paths
/// cannot escape them.
pub fn json_path(field: &str) -> String {
    format!("$.\"{}\"", field.replace('"', ""))
}

/// Bind a JSON scalar as an SQLite value, matching what `json_extract`
/// returns for the same scalar.
pub fn bind_json(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

/// Decode a value read back from `json_extract`.
pub fn sql_to_json(value: SqlValue) -> Option<Value> {
    match value {
        SqlValue::Null | SqlValue::Blob(_) => None,
        SqlValue::Integer(i) => Some(Value::from(i)),
        SqlValue::Real(f) => serde_json::Number::from_f64(f).map(Value::Number),
        SqlValue::Text(s) => Some(Value::String(s)),
    }
}

pub fn predicate_to_sql(predicate: &Predicate) -> SqlFragment {
    let mut out = SqlFragment::default();
    write_predicate(predicate, &mut out);
    out
}

fn write_predicate(predicate: &Predicate, out: &mut SqlFragment) {
    match predicate {
        Predicate::All => out.sql.push('1'),
        Predicate::Eq { field, value } => {
            out.params.push(SqlValue::Text(json_path(field)));
            if value.is_null() {
                out.sql.push_str("json_extract(body, ?) IS NULL");
            } else {
                out.sql.push_str("json_extract(body, ?) = ?");
                out.params.push(bind_json(value));
            }
        }
        Predicate::In { field, values } => {
            if values.is_empty() {
                out.sql.push('0');
                return;
            }
            out.sql.push_str("json_extract(body, ?) IN (");
            out.params.push(SqlValue::Text(json_path(field)));
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    out.sql.push_str(", ");
                }
                out.sql.push('?');
                out.params.push(bind_json(value));
            }
            out.sql.push(')');
        }
        Predicate::StartsWith { field, prefix } => {
            let path = json_path(field);
            out.sql
                .push_str("(json_type(body, ?) = 'text' AND substr(json_extract(body, ?), 1, ?) = ?)");
            out.params.push(SqlValue::Text(path.clone()));
            out.params.push(SqlValue::Text(path));
            out.params.push(SqlValue::Integer(prefix.chars().count() as i64));
            out.params.push(SqlValue::Text(prefix.clone()));
        }
        Predicate::And { clauses } => write_joined(clauses, " AND ", '1', out),
        Predicate::Or { clauses } => write_joined(clauses, " OR ", '0', out),
    }
}

fn write_joined(clauses: &[Predicate], joiner: &str, empty: char, out: &mut SqlFragment) {
    if clauses.is_empty() {
        out.sql.push(empty);
        return;
    }
    out.sql.push('(');
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 {
            out.sql.push_str(joiner);
        }
        write_predicate(clause, out);
    }
    out.sql.push(')');
}

/// ORDER BY clause. Insertion order breaks ties and is the default.
pub fn order_by(sort: Option<&SortSpec>, params: &mut Vec<SqlValue>) -> String {
    match sort {
        Some(spec) => {
            params.push(SqlValue::Text(json_path(&spec.field)));
            let dir = match spec.direction {
                SortDirection::Asc => "ASC",
                SortDirection::Desc => "DESC",
            };
            format!("ORDER BY json_extract(body, ?) {}, id ASC", dir)
        }
        None => "ORDER BY id ASC".to_string(),
    }
}
