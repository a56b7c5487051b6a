/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

//! Rows and the marshalling codec that turns them into block payload bytes.
//!
//! Data format, one field per declared column in schema order:
//! ```text
//! INT:     4 bytes, host-endian i32
//! TEXT:    2-byte host-endian length, then that many bytes
//! BOOLEAN: 1 byte, 0 or 1
//! ```

use crate::constants::{BlockIdT, RecordIdT, MAX_ROW_SZ};
use crate::error::{Error, Result};
use crate::io;
use crate::relation::schema::Schema;
use crate::relation::types::{ColumnType, Value};
use std::collections::HashMap;

/// A relation-global address for a single record: the block it lives in and its slot id inside
/// that block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    pub block_id: BlockIdT,
    pub record_id: RecordIdT,
}

impl Handle {
    pub fn new(block_id: BlockIdT, record_id: RecordIdT) -> Self {
        Self {
            block_id,
            record_id,
        }
    }
}

/// A mapping of column name to value. Iteration order is unspecified; on-disk order always comes
/// from a [`Schema`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    values: HashMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            values: pairs.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Marshal `row` into bytes using `schema`'s declared column order. Every column in `schema` must
/// be present in `row`; callers validate this ahead of time (see
/// [`crate::relation::relation::Relation::validate`]).
pub fn marshal(row: &Row, schema: &Schema) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    for attr in schema.attributes() {
        let value = row
            .get(attr.name())
            .ok_or_else(|| Error::UnknownColumn(attr.name().to_string()))?;
        match (attr.column_type(), value) {
            (ColumnType::Int, Value::Int(v)) => {
                let offset = buf.len() as u32;
                buf.extend_from_slice(&[0u8; 4]);
                io::write_i32(&mut buf, offset, *v)?;
            }
            (ColumnType::Text, Value::Text(s)) => {
                let bytes = s.as_bytes();
                let offset = buf.len() as u32;
                buf.extend_from_slice(&[0u8; 2]);
                io::write_u16(&mut buf, offset, bytes.len() as u16)?;
                buf.extend_from_slice(bytes);
            }
            (ColumnType::Boolean, Value::Boolean(v)) => {
                let offset = buf.len() as u32;
                buf.push(0);
                io::write_bool(&mut buf, offset, *v)?;
            }
            _ => {
                return Err(Error::UnsupportedType(attr.column_type().name().to_string()));
            }
        }
    }
    if buf.len() as u32 > MAX_ROW_SZ {
        return Err(Error::RowTooLarge {
            len: buf.len() as u32,
            max: MAX_ROW_SZ,
        });
    }
    Ok(buf)
}

/// Inverse of [`marshal`]: reconstruct a [`Row`] from payload bytes using `schema`'s declared
/// column order and types.
pub fn unmarshal(bytes: &[u8], schema: &Schema) -> Result<Row> {
    let mut row = Row::new();
    let mut offset = 0u32;
    for attr in schema.attributes() {
        match attr.column_type() {
            ColumnType::Int => {
                let v = io::read_i32(bytes, offset)?;
                offset += 4;
                row.insert(attr.name(), Value::Int(v));
            }
            ColumnType::Text => {
                let len = io::read_u16(bytes, offset)? as u32;
                offset += 2;
                let data = io::read_bytes(bytes, offset, len)?;
                offset += len;
                row.insert(attr.name(), Value::Text(String::from_utf8_lossy(&data).into_owned()));
            }
            ColumnType::Boolean => {
                let v = io::read_bool(bytes, offset)?;
                offset += 1;
                row.insert(attr.name(), Value::Boolean(v));
            }
            ColumnType::Double => {
                return Err(Error::UnsupportedType(ColumnType::Double.name().to_string()));
            }
        }
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::attribute::Attribute;

    fn schema() -> Schema {
        Schema::new(vec![
            Attribute::new("id", ColumnType::Int),
            Attribute::new("name", ColumnType::Text),
            Attribute::new("active", ColumnType::Boolean),
        ])
    }

    #[test]
    fn marshal_then_unmarshal_round_trips() {
        let schema = schema();
        let mut row = Row::new();
        row.insert("id", Value::Int(42));
        row.insert("name", Value::Text("widget".to_string()));
        row.insert("active", Value::Boolean(true));

        let bytes = marshal(&row, &schema).unwrap();
        let restored = unmarshal(&bytes, &schema).unwrap();
        assert_eq!(restored.get("id"), Some(&Value::Int(42)));
        assert_eq!(restored.get("name"), Some(&Value::Text("widget".to_string())));
        assert_eq!(restored.get("active"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn marshal_rejects_missing_column() {
        let schema = schema();
        let mut row = Row::new();
        row.insert("id", Value::Int(1));
        assert!(matches!(marshal(&row, &schema), Err(Error::UnknownColumn(_))));
    }

    #[test]
    fn marshal_rejects_oversized_row() {
        let schema = Schema::new(vec![Attribute::new("blob", ColumnType::Text)]);
        let mut row = Row::new();
        row.insert("blob", Value::Text("x".repeat(MAX_ROW_SZ as usize)));
        assert!(matches!(marshal(&row, &schema), Err(Error::RowTooLarge { .. })));
    }
}
