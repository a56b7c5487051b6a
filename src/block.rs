/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

//! An in-memory representation of a single slotted-page block.
//!
//! Contains a header and variable-length records that grow in opposite directions, similarly to
//! a heap and a stack.
//!
//! Data format:
//! ```text
//! +---------------------+--------------+----------------------+
//! |  HEADER (grows ->)  | ... FREE ... | (<- grows) RECORDS   |
//! +---------------------+--------------+----------------------+
//!                                      ^ end_free
//!
//! Header slot 0 (4 bytes): NUM RECORDS (u16) | END FREE (u16)
//! Header slot i, i >= 1 (4 bytes): SIZE_i (u16) | OFFSET_i (u16)
//! ```
//!
//! A deleted record's slot is overwritten with `(size=0, offset=0)` — a tombstone. Offset 0 is
//! otherwise unreachable (the header itself starts at offset 0), so it's safe to reuse as a
//! sentinel without a separate status byte.

use crate::constants::{RecordIdT, BLOCK_SZ, SLOT_SZ};
use crate::error::{Error, Result};
use crate::io::{read_bytes, read_u16, write_bytes, write_u16};

pub struct Block {
    buf: Vec<u8>,
}

impl Block {
    /// Build a freshly initialized, empty block.
    pub fn new() -> Self {
        let mut buf = vec![0u8; BLOCK_SZ as usize];
        write_u16(&mut buf, 0, 0).unwrap();
        write_u16(&mut buf, 2, (BLOCK_SZ - 1) as u16).unwrap();
        Self { buf }
    }

    /// Wrap an existing byte buffer (e.g. one just read back from the record store) as a block.
    /// The buffer is assumed to already hold a valid header.
    pub fn from_bytes(buf: Vec<u8>) -> Self {
        debug_assert_eq!(buf.len(), BLOCK_SZ as usize);
        Self { buf }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn num_records(&self) -> RecordIdT {
        self.read_slot0().0
    }

    /// Space available for a new record's payload: the raw header/payload gap, less room for
    /// one more slot (the slot the next `add` would need) and slot 0.
    pub fn free_space(&self) -> u32 {
        let (num_records, end_free) = self.read_slot0();
        (end_free as u32).saturating_sub(SLOT_SZ * (num_records as u32 + 2))
    }

    /// Live (non-tombstone) record ids, in ascending order.
    pub fn ids(&self) -> Vec<RecordIdT> {
        let num_records = self.num_records();
        (1..=num_records)
            .filter(|&id| !self.is_tombstone(id))
            .collect()
    }

    /// Add a new record, returning its freshly assigned id.
    pub fn add(&mut self, data: &[u8]) -> Result<RecordIdT> {
        let (num_records, end_free) = self.read_slot0();
        let free = self.free_space();
        if data.len() as u32 > free {
            return Err(Error::NoRoom {
                len: data.len() as u32,
                free,
            });
        }
        let id = num_records + 1;
        let new_end_free = end_free - data.len() as u16;
        write_bytes(&mut self.buf, new_end_free as u32 + 1, data)?;
        self.write_slot(id, data.len() as u16, new_end_free + 1);
        self.write_slot0(id, new_end_free);
        Ok(id)
    }

    /// Fetch the payload for `id`. A tombstone returns an empty vector; callers must treat a
    /// zero-length result as "deleted", not as a legitimately empty record (rows are never
    /// zero-length — the marshal codec always writes at least a type's fixed-width prefix).
    pub fn get(&self, id: RecordIdT) -> Result<Vec<u8>> {
        self.check_id(id)?;
        if self.is_tombstone(id) {
            return Ok(Vec::new());
        }
        let (size, offset) = self.read_slot(id);
        read_bytes(&self.buf, offset as u32, size as u32)
    }

    /// Replace the record at `id` with `data`, sliding neighboring payloads to make or reclaim
    /// room as needed.
    pub fn put(&mut self, id: RecordIdT, data: &[u8]) -> Result<()> {
        self.check_id(id)?;
        let (old_size, old_offset) = self.read_slot(id);
        let new_size = data.len() as u32;
        let diff = new_size as i64 - old_size as i64;
        if diff > 0 {
            let free = self.free_space();
            if diff as u32 > free {
                return Err(Error::NoRoom {
                    len: new_size,
                    free,
                });
            }
        }
        let new_offset = (old_offset as i64 - diff) as u16;
        self.slide(old_offset as u32, new_offset as u32);
        write_bytes(&mut self.buf, new_offset as u32, data)?;
        self.write_slot(id, new_size as u16, new_offset);
        Ok(())
    }

    /// Delete the record at `id`, reclaiming its space. Idempotent: deleting an already-deleted
    /// id is a no-op rather than an error, since the caller (the heap relation) may legitimately
    /// retry a delete during rollback.
    pub fn del(&mut self, id: RecordIdT) -> Result<()> {
        self.check_id(id)?;
        if self.is_tombstone(id) {
            return Ok(());
        }
        let (size, offset) = self.read_slot(id);
        self.slide(offset as u32, offset as u32 + size as u32);
        self.write_slot(id, 0, 0);
        Ok(())
    }

    fn is_tombstone(&self, id: RecordIdT) -> bool {
        let (size, offset) = self.read_slot(id);
        size == 0 && offset == 0
    }

    fn check_id(&self, id: RecordIdT) -> Result<()> {
        let num_records = self.num_records();
        if id == 0 || id > num_records {
            return Err(Error::SlotOutOfBounds(id));
        }
        Ok(())
    }

    /// Move every payload byte in `[end_free+1, start)` by `end - start`, then adjust the
    /// offset of every live (non-tombstone) slot whose offset is `<= start`. Tombstones keep
    /// their sentinel `(0, 0)` untouched.
    fn slide(&mut self, start: u32, end: u32) {
        let (num_records, end_free) = self.read_slot0();
        let shift = end as i64 - start as i64;
        if shift != 0 {
            let move_start = end_free as usize + 1;
            let move_end = start as usize;
            if move_end > move_start {
                let dst = (move_start as i64 + shift) as usize;
                self.buf.copy_within(move_start..move_end, dst);
            }
        }
        for id in 1..=num_records {
            let (size, offset) = self.read_slot(id);
            if size == 0 && offset == 0 {
                continue;
            }
            if offset as u32 <= start {
                let new_offset = (offset as i64 + shift) as u16;
                self.write_slot(id, size, new_offset);
            }
        }
        let new_end_free = (end_free as i64 + shift) as u16;
        self.write_slot0(num_records, new_end_free);
    }

    fn slot_addr(id: RecordIdT) -> u32 {
        SLOT_SZ * id as u32
    }

    fn read_slot0(&self) -> (RecordIdT, u16) {
        let num_records = read_u16(&self.buf, 0).unwrap();
        let end_free = read_u16(&self.buf, 2).unwrap();
        (num_records, end_free)
    }

    fn write_slot0(&mut self, num_records: RecordIdT, end_free: u16) {
        write_u16(&mut self.buf, 0, num_records).unwrap();
        write_u16(&mut self.buf, 2, end_free).unwrap();
    }

    fn read_slot(&self, id: RecordIdT) -> (u16, u16) {
        let addr = Self::slot_addr(id);
        let size = read_u16(&self.buf, addr).unwrap();
        let offset = read_u16(&self.buf, addr + 2).unwrap();
        (size, offset)
    }

    fn write_slot(&mut self, id: RecordIdT, size: u16, offset: u16) {
        let addr = Self::slot_addr(id);
        write_u16(&mut self.buf, addr, size).unwrap();
        write_u16(&mut self.buf, addr + 2, offset).unwrap();
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_block_has_no_live_ids() {
        let block = Block::new();
        assert!(block.ids().is_empty());
        assert_eq!(block.num_records(), 0);
    }

    #[test]
    fn add_then_get_round_trips() {
        let mut block = Block::new();
        let id = block.add(b"hello").unwrap();
        assert_eq!(id, 1);
        assert_eq!(block.get(id).unwrap(), b"hello");
        assert_eq!(block.ids(), vec![1]);
    }

    #[test]
    fn add_fails_with_no_room_when_oversized() {
        let mut block = Block::new();
        let huge = vec![0u8; BLOCK_SZ as usize];
        assert!(matches!(block.add(&huge), Err(Error::NoRoom { .. })));
    }

    #[test]
    fn deleted_record_reads_as_zero_length_and_is_excluded_from_ids() {
        let mut block = Block::new();
        let id = block.add(b"gone soon").unwrap();
        block.del(id).unwrap();
        assert_eq!(block.get(id).unwrap(), Vec::<u8>::new());
        assert!(block.ids().is_empty());
        assert_eq!(block.num_records(), 1, "record ids are never reused");
    }

    #[test]
    fn double_delete_is_idempotent() {
        let mut block = Block::new();
        let id = block.add(b"x").unwrap();
        block.del(id).unwrap();
        block.del(id).unwrap();
        assert_eq!(block.get(id).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn out_of_bounds_id_is_rejected() {
        let block = Block::new();
        assert!(matches!(block.get(1), Err(Error::SlotOutOfBounds(1))));
    }

    /// Mirrors the canonical sequence from the design's testable-properties section: a run of
    /// adds, a delete, more adds, then a grow-in-place and a shrink-in-place put.
    #[test]
    fn canonical_add_del_put_sequence() {
        let mut block = Block::new();
        block.add(&[0u8; 42]).unwrap(); // id 1
        block.add(&[0u8; 100]).unwrap(); // id 2
        block.add(&[0u8; 59]).unwrap(); // id 3
        block.del(2).unwrap();
        block.add(&[0u8; 14]).unwrap(); // id 4
        block.add(&[0u8; 77]).unwrap(); // id 5
        block.put(3, &[0u8; 50]).unwrap();
        block.put(4, &[0u8; 18]).unwrap();

        assert_eq!(block.ids(), vec![1, 3, 4, 5]);
        assert_eq!(block.get(1).unwrap().len(), 42);
        assert_eq!(block.get(2).unwrap().len(), 0);
        assert_eq!(block.get(3).unwrap().len(), 50);
        assert_eq!(block.get(4).unwrap().len(), 18);
        assert_eq!(block.get(5).unwrap().len(), 77);
    }

    #[test]
    fn put_preserves_bytes_of_unrelated_records() {
        let mut block = Block::new();
        block.add(b"first").unwrap();
        let second = block.add(b"second-record").unwrap();
        block.add(b"third").unwrap();

        block.put(second, b"grown considerably longer than before").unwrap();

        assert_eq!(block.get(1).unwrap(), b"first");
        assert_eq!(
            block.get(second).unwrap(),
            b"grown considerably longer than before"
        );
        assert_eq!(block.get(3).unwrap(), b"third");
    }

    #[test]
    fn free_space_shrinks_by_payload_plus_slot_on_add() {
        let mut block = Block::new();
        let before = block.free_space();
        block.add(b"0123456789").unwrap();
        let after = block.free_space();
        assert_eq!(before - after, 10 + SLOT_SZ);
    }

    /// Pins `free_space()` to the exact formula `end_free - (num_records + 2) * SLOT_SZ`, and
    /// confirms `add` accepts a record of exactly that many bytes and rejects one byte more.
    #[test]
    fn free_space_matches_exact_formula_at_the_boundary() {
        let block = Block::new();
        let (num_records, end_free) = (0u32, BLOCK_SZ - 1);
        let expected = end_free.saturating_sub(SLOT_SZ * (num_records + 2));
        assert_eq!(block.free_space(), expected);

        let mut block = Block::new();
        let free = block.free_space();
        let exact = vec![0u8; free as usize];
        block.add(&exact).unwrap();

        let mut block = Block::new();
        let free = block.free_space();
        let one_too_many = vec![0u8; free as usize + 1];
        assert!(matches!(block.add(&one_too_many), Err(Error::NoRoom { .. })));
    }

    #[test]
    fn bytes_round_trip_through_from_bytes() {
        let mut block = Block::new();
        block.add(b"round trip me").unwrap();
        let raw = block.into_bytes();
        let reloaded = Block::from_bytes(raw);
        assert_eq!(reloaded.get(1).unwrap(), b"round trip me");
    }
}
