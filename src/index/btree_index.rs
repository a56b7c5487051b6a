/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

//! A database index meant to be backed by a B-tree. NOT a B+ tree, which is what production
//! databases actually use for secondary indexes.
//!
//! This is a documented stub (see module docs on [`crate::index`]): it satisfies [`Index`] but
//! performs no real lookups. `insert`/`del` are no-ops; `lookup` always returns an empty result.

use crate::error::Result;
use crate::index::{Index, IndexMeta};
use crate::relation::{Handle, Value};
use log::debug;

pub struct BtreeIndex {
    meta: IndexMeta,
    open: bool,
}

impl BtreeIndex {
    pub fn new(meta: IndexMeta) -> Self {
        Self { meta, open: false }
    }
}

impl Index for BtreeIndex {
    fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    fn create(&mut self) -> Result<()> {
        debug!(
            "stub btree index `{}` on `{}` created (no physical structure)",
            self.meta.index_name, self.meta.table_name
        );
        self.open = true;
        Ok(())
    }

    fn drop_index(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }

    fn open(&mut self) -> Result<()> {
        self.open = true;
        Ok(())
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn insert(&mut self, _key: &[Value], _handle: Handle) -> Result<()> {
        Ok(())
    }

    fn del(&mut self, _key: &[Value], _handle: Handle) -> Result<()> {
        Ok(())
    }

    fn lookup(&self, _key: &[Value]) -> Result<Vec<Handle>> {
        Ok(Vec::new())
    }
}
