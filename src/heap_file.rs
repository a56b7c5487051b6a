/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

//! A heap file owns an ordered sequence of blocks persisted as records 1..last in one
//! [`crate::store::RecordStore`] file named `<relation>.db`.

use crate::block::Block;
use crate::config::Config;
use crate::constants::{BlockIdT, FIRST_BLOCK_ID};
use crate::error::Result;
use crate::store::RecordStore;
use log::debug;

pub struct HeapFile {
    name: String,
    store: RecordStore,
    last: BlockIdT,
}

impl HeapFile {
    pub fn new(config: &Config, relation_name: &str) -> Self {
        let path = config.relation_path(relation_name);
        Self {
            name: relation_name.to_string(),
            store: RecordStore::new(path, config.block_size()),
            last: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_open(&self) -> bool {
        self.store.is_open()
    }

    /// Create the underlying file and allocate block 1 as an empty page.
    pub fn create(&mut self) -> Result<()> {
        self.store.create()?;
        let block = Block::new();
        self.store.put(FIRST_BLOCK_ID, block.bytes())?;
        self.last = FIRST_BLOCK_ID;
        debug!("created heap file for relation `{}`", self.name);
        Ok(())
    }

    /// Create the file if it doesn't already exist on disk, otherwise open the existing one.
    /// Returns `true` if the file was freshly created.
    pub fn create_if_not_exists(&mut self) -> Result<bool> {
        if self.store.path().exists() {
            self.open()?;
            Ok(false)
        } else {
            self.create()?;
            Ok(true)
        }
    }

    /// Close (if open) and remove the underlying file.
    pub fn drop_file(&mut self) -> Result<()> {
        self.store.remove_file()?;
        self.last = 0;
        debug!("dropped heap file for relation `{}`", self.name);
        Ok(())
    }

    /// Open the existing file and restore `last` from the record count. No-op if already open.
    pub fn open(&mut self) -> Result<()> {
        if self.store.is_open() {
            return Ok(());
        }
        self.store.open()?;
        self.last = self.store.record_count()?;
        Ok(())
    }

    pub fn close(&mut self) {
        self.store.close();
    }

    /// Allocate a new block at the end of the file, zero-initialized, and return it bound to the
    /// buffer the underlying store now owns.
    pub fn get_new(&mut self) -> Result<(BlockIdT, Block)> {
        let id = self.last + 1;
        let empty = Block::new();
        self.store.put(id, empty.bytes())?;
        let bytes = self.store.get(id)?;
        self.last = id;
        Ok((id, Block::from_bytes(bytes)))
    }

    pub fn get(&mut self, id: BlockIdT) -> Result<Block> {
        let bytes = self.store.get(id)?;
        Ok(Block::from_bytes(bytes))
    }

    pub fn put(&mut self, id: BlockIdT, block: &Block) -> Result<()> {
        self.store.put(id, block.bytes())
    }

    pub fn last(&self) -> BlockIdT {
        self.last
    }

    pub fn block_ids(&self) -> Vec<BlockIdT> {
        (FIRST_BLOCK_ID..=self.last).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &std::path::Path) -> Config {
        Config::new(dir)
    }

    #[test]
    fn create_allocates_block_one() {
        let dir = tempfile::tempdir().unwrap();
        test_config(dir.path()).open().unwrap();
        let mut heap = HeapFile::new(&test_config(dir.path()), "widgets");
        heap.create().unwrap();
        assert_eq!(heap.block_ids(), vec![1]);
    }

    #[test]
    fn get_new_extends_block_ids_in_order() {
        let dir = tempfile::tempdir().unwrap();
        test_config(dir.path()).open().unwrap();
        let mut heap = HeapFile::new(&test_config(dir.path()), "widgets");
        heap.create().unwrap();
        let (id2, _) = heap.get_new().unwrap();
        let (id3, _) = heap.get_new().unwrap();
        assert_eq!(id2, 2);
        assert_eq!(id3, 3);
        assert_eq!(heap.block_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn put_then_get_round_trips_bytes() {
        let dir = tempfile::tempdir().unwrap();
        test_config(dir.path()).open().unwrap();
        let mut heap = HeapFile::new(&test_config(dir.path()), "widgets");
        heap.create().unwrap();
        let mut block = heap.get(1).unwrap();
        block.add(b"some bytes").unwrap();
        heap.put(1, &block).unwrap();

        let reloaded = heap.get(1).unwrap();
        assert_eq!(reloaded.get(1).unwrap(), b"some bytes");
    }

    #[test]
    fn drop_then_recreate_resets_last() {
        let dir = tempfile::tempdir().unwrap();
        test_config(dir.path()).open().unwrap();
        let mut heap = HeapFile::new(&test_config(dir.path()), "widgets");
        heap.create().unwrap();
        heap.get_new().unwrap();
        heap.drop_file().unwrap();
        assert_eq!(heap.last(), 0);
        heap.create().unwrap();
        assert_eq!(heap.block_ids(), vec![1]);
    }

    #[test]
    fn open_restores_last_from_record_count() {
        let dir = tempfile::tempdir().unwrap();
        test_config(dir.path()).open().unwrap();
        {
            let mut heap = HeapFile::new(&test_config(dir.path()), "widgets");
            heap.create().unwrap();
            heap.get_new().unwrap();
            heap.get_new().unwrap();
        }
        let mut reopened = HeapFile::new(&test_config(dir.path()), "widgets");
        reopened.open().unwrap();
        assert_eq!(reopened.last(), 3);
        assert_eq!(reopened.block_ids(), vec![1, 2, 3]);
    }
}
