/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

//! A relation ties a [`Schema`] to a [`HeapFile`] and is the unit the catalog and executor
//! operate on: one relation per user table, plus one for each of the three system catalog tables.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::heap_file::HeapFile;
use crate::relation::record::{marshal, unmarshal, Handle, Row};
use crate::relation::schema::Schema;
use crate::relation::types::ValueDict;

pub struct Relation {
    name: String,
    schema: Schema,
    heap: HeapFile,
}

impl Relation {
    pub fn new(config: &Config, name: &str, schema: Schema) -> Self {
        Self {
            name: name.to_string(),
            schema,
            heap: HeapFile::new(config, name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn is_open(&self) -> bool {
        self.heap.is_open()
    }

    pub fn create(&mut self) -> Result<()> {
        self.heap.create()
    }

    pub fn create_if_not_exists(&mut self) -> Result<bool> {
        self.heap.create_if_not_exists()
    }

    pub fn open(&mut self) -> Result<()> {
        self.heap.open()
    }

    pub fn close(&mut self) {
        self.heap.close();
    }

    pub fn drop_file(&mut self) -> Result<()> {
        self.heap.drop_file()
    }

    /// Expand a user-supplied column map into a row covering every declared column, in no
    /// particular order, failing if any declared column is absent. There are no NULLs and no
    /// column defaults: every column must be supplied explicitly.
    pub fn validate(&self, input: &Row) -> Result<Row> {
        let mut row = Row::new();
        for attr in self.schema.attributes() {
            let value = input
                .get(attr.name())
                .ok_or_else(|| Error::UnknownColumn(attr.name().to_string()))?;
            row.insert(attr.name(), value.clone());
        }
        Ok(row)
    }

    /// Validate, marshal, then append the row to the first block with enough free space,
    /// allocating a new block if none of the existing ones fit it.
    pub fn insert(&mut self, input: &Row) -> Result<Handle> {
        let row = self.validate(input)?;
        let bytes = marshal(&row, &self.schema)?;
        self.append(&bytes)
    }

    fn append(&mut self, bytes: &[u8]) -> Result<Handle> {
        for block_id in self.heap.block_ids() {
            let mut block = self.heap.get(block_id)?;
            match block.add(bytes) {
                Ok(record_id) => {
                    self.heap.put(block_id, &block)?;
                    return Ok(Handle::new(block_id, record_id));
                }
                Err(Error::NoRoom { .. }) => continue,
                Err(other) => return Err(other),
            }
        }
        let (block_id, mut block) = self.heap.get_new()?;
        let record_id = block.add(bytes)?;
        self.heap.put(block_id, &block)?;
        Ok(Handle::new(block_id, record_id))
    }

    pub fn delete(&mut self, handle: Handle) -> Result<()> {
        let mut block = self.heap.get(handle.block_id)?;
        block.del(handle.record_id)?;
        self.heap.put(handle.block_id, &block)
    }

    pub fn get(&mut self, handle: Handle) -> Result<Row> {
        let block = self.heap.get(handle.block_id)?;
        let bytes = block.get(handle.record_id)?;
        unmarshal(&bytes, &self.schema)
    }

    /// Every live handle in the heap file, lowest block first, lowest record id first.
    pub fn all_handles(&mut self) -> Result<Vec<Handle>> {
        let mut handles = Vec::new();
        for block_id in self.heap.block_ids() {
            let block = self.heap.get(block_id)?;
            for record_id in block.ids() {
                handles.push(Handle::new(block_id, record_id));
            }
        }
        Ok(handles)
    }

    /// Enumerate every live row, optionally filtered by a conjunction of column equalities. A
    /// handle is kept only if every predicate column is present in the row and equal to it.
    pub fn select(&mut self, predicate: Option<&ValueDict>) -> Result<Vec<(Handle, Row)>> {
        let mut results = Vec::new();
        for handle in self.all_handles()? {
            let row = self.get(handle)?;
            if row_matches(&row, predicate) {
                results.push((handle, row));
            }
        }
        Ok(results)
    }

    /// Restrict `row` to `columns`, in the order requested. `None` returns the full declared
    /// column order.
    pub fn project(&self, row: &Row, columns: Option<&[String]>) -> Result<Row> {
        let names: Vec<&str> = match columns {
            Some(cols) => cols.iter().map(String::as_str).collect(),
            None => self.schema.column_names(),
        };
        let mut projected = Row::new();
        for name in names {
            let value = row
                .get(name)
                .ok_or_else(|| Error::UnknownColumn(name.to_string()))?;
            projected.insert(name, value.clone());
        }
        Ok(projected)
    }
}

fn row_matches(row: &Row, predicate: Option<&ValueDict>) -> bool {
    match predicate {
        None => true,
        Some(dict) => dict.iter().all(|(col, value)| row.get(col) == Some(value)),
    }
}
