/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

//! A documented stub for a hash-table-backed index. See module docs on [`crate::index`].

use crate::error::Result;
use crate::index::{Index, IndexMeta};
use crate::relation::{Handle, Value};
use log::debug;

pub struct HashIndex {
    meta: IndexMeta,
    open: bool,
}

impl HashIndex {
    pub fn new(meta: IndexMeta) -> Self {
        Self { meta, open: false }
    }
}

impl Index for HashIndex {
    fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    fn create(&mut self) -> Result<()> {
        debug!(
            "stub hash index `{}` on `{}` created (no physical structure)",
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
