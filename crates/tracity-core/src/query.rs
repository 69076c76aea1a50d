//! Backend-neutral query representation.
//!
//! A [`CompiledQuery`] is a predicate tree plus sort and limit directives.
//! Stores either translate it into their native query language or evaluate
//! it record by record with [`Predicate::matches`].

use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::record::Record;

/// Predicate tree over record fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    /// Matches every record.
    All,
    Eq { field: String, value: Value },
    In { field: String, values: Vec<Value> },
    /// Text field starts with `prefix`. Non-text values never match.
    StartsWith { field: String, prefix: String },
    And { clauses: Vec<Predicate> },
    Or { clauses: Vec<Predicate> },
}

impl Predicate {
    /// Conjoin clauses, collapsing the trivial cases.
    pub fn and(mut clauses: Vec<Predicate>) -> Self {
        clauses.retain(|c| !c.is_all());
        match clauses.len() {
            0 => Self::All,
            1 => clauses.remove(0),
            _ => Self::And { clauses },
        }
    }

    /// Disjoin clauses. An empty disjunction matches nothing, so callers
    /// should only build one from a non-empty list.
    pub fn or(mut clauses: Vec<Predicate>) -> Self {
        if clauses.len() == 1 {
            clauses.remove(0)
        } else {
            Self::Or { clauses }
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Evaluate against a record. Missing fields never match a comparison.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::All => true,
            Self::Eq { field, value } => record.get(field).is_some_and(|v| values_equal(v, value)),
            Self::In { field, values } => record
                .get(field)
                .is_some_and(|v| values.iter().any(|candidate| values_equal(v, candidate))),
            Self::StartsWith { field, prefix } => record
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| s.starts_with(prefix.as_str())),
            Self::And { clauses } => clauses.iter().all(|c| c.matches(record)),
            Self::Or { clauses } => clauses.iter().any(|c| c.matches(record)),
        }
    }
}

/// Numbers compare by value (`2020 == 2020.0`); everything else structurally.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

/// Total order used for sorting: missing/null < bool < number < string < other.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Sort direction. Anything other than `desc` reads as ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

impl<'de> Deserialize<'de> for SortDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::parse).unwrap_or_default())
    }
}

/// Single-field sort directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// Predicate plus sort and limit, ready for a store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub predicate: Predicate,
    /// `None` leaves the backend's default (insertion) order.
    pub sort: Option<SortSpec>,
    pub limit: usize,
}

impl CompiledQuery {
    pub const DEFAULT_LIMIT: usize = 100;

    pub fn new(predicate: Predicate, limit: usize) -> Self {
        Self {
            predicate,
            sort: None,
            limit,
        }
    }

    pub fn match_all(limit: usize) -> Self {
        Self::new(Predicate::All, limit)
    }
}
