/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

//! Secondary index metadata and the placeholder implementations the catalog wires up for it.
//!
//! Physical index maintenance is out of scope: `BtreeIndex` and `HashIndex` satisfy [`Index`] but
//! do no real work. A real implementation needs to replace their `insert`/`del`/`lookup` bodies
//! before the executor can use an index for anything but bookkeeping.

pub mod btree_index;
pub mod hash_table_index;

use crate::error::Result;
use crate::relation::{Handle, Value};

pub use btree_index::BtreeIndex;
pub use hash_table_index::HashIndex;

/// Identifies one secondary index: the table it's on, its name, and the ordered key columns.
#[derive(Clone, Debug)]
pub struct IndexMeta {
    pub table_name: String,
    pub index_name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl IndexMeta {
    pub fn new(table_name: &str, index_name: &str, columns: Vec<String>, unique: bool) -> Self {
        Self {
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
            columns,
            unique,
        }
    }
}

/// Shared interface for a secondary index, keyed by the values of its declared columns.
pub trait Index {
    fn meta(&self) -> &IndexMeta;
    fn create(&mut self) -> Result<()>;
    fn drop_index(&mut self) -> Result<()>;
    fn open(&mut self) -> Result<()>;
    fn close(&mut self);
    fn insert(&mut self, key: &[Value], handle: Handle) -> Result<()>;
    fn del(&mut self, key: &[Value], handle: Handle) -> Result<()>;
    fn lookup(&self, key: &[Value]) -> Result<Vec<Handle>>;
}
