/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

//! The value domain and column-type descriptors shared by every relation.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// A conjunction of column->literal equalities, the reduced form every supported predicate takes
/// once the statement tree's where-clause has been translated.
pub type ValueDict = HashMap<String, Value>;

/// Intersect two predicate dictionaries key-wise: a key survives only if both sides agree on its
/// value. This is the merge rule for `AND`ed where-clauses.
pub fn intersect_value_dicts(a: &ValueDict, b: &ValueDict) -> ValueDict {
    let mut merged = ValueDict::new();
    for (key, value) in a {
        if b.get(key) == Some(value) {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Declared type of a column, as recorded in `_columns.data_type`.
///
/// `Boolean` is deliberately absent from the set a user can name in `CREATE TABLE` (see
/// [`ColumnType::parse`]) — it exists only so `_indices.is_unique` has somewhere to live.
/// `Double` is representable but has no marshalling support and is always rejected at
/// `CREATE TABLE` time; it exists so the rejection itself has a type to name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Text,
    Boolean,
    Double,
}

impl ColumnType {
    /// Name used in `_columns.data_type` and accepted back from it.
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Int => "INT",
            ColumnType::Text => "TEXT",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Double => "DOUBLE",
        }
    }

    /// Parse a user-facing column type name. Rejects `BOOLEAN` and `DOUBLE`, neither of which
    /// `CREATE TABLE` may name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "INT" => Some(ColumnType::Int),
            "TEXT" => Some(ColumnType::Text),
            _ => None,
        }
    }

    /// Parse a catalog-stored type name, including the internal-only `BOOLEAN` and the
    /// never-creatable `DOUBLE`.
    pub fn parse_catalog(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "INT" => Some(ColumnType::Int),
            "TEXT" => Some(ColumnType::Text),
            "BOOLEAN" => Some(ColumnType::Boolean),
            "DOUBLE" => Some(ColumnType::Double),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A value of one of the three supported column types.
///
/// Cross-type ordering is `Boolean < Int < Text`, matching the rank used to merge predicate
/// dictionaries in the executor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Int(i32),
    Text(String),
    Boolean(bool),
}

impl Value {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Int(_) => ColumnType::Int,
            Value::Text(_) => ColumnType::Text,
            Value::Boolean(_) => ColumnType::Boolean,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Boolean(_) => 0,
            Value::Int(_) => 1,
            Value::Text(_) => 2,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_type_order_is_boolean_int_text() {
        assert!(Value::Boolean(true) < Value::Int(-1_000_000));
        assert!(Value::Int(i32::MAX) < Value::Text(String::new()));
    }

    #[test]
    fn same_type_order_is_natural() {
        assert!(Value::Int(1) < Value::Int(2));
        assert!(Value::Text("a".into()) < Value::Text("b".into()));
    }

    #[test]
    fn column_type_parse_rejects_boolean() {
        assert_eq!(ColumnType::parse("INT"), Some(ColumnType::Int));
        assert_eq!(ColumnType::parse("TEXT"), Some(ColumnType::Text));
        assert_eq!(ColumnType::parse("BOOLEAN"), None);
        assert_eq!(ColumnType::parse_catalog("BOOLEAN"), Some(ColumnType::Boolean));
    }
}
