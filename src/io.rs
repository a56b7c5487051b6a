/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

//! Utility functions for reading and writing fixed-width values in a block's byte array.
//!
//! Every value here is stored host-endian (`to_ne_bytes`/`from_ne_bytes`): pages are never shared
//! across machines, so there is no portability requirement, and native byte order avoids a swap
//! on every access.

use crate::error::{Error, Result};

#[inline(always)]
fn check_overflow(array_len: usize, offset: usize, length: usize) -> Result<()> {
    if offset + length > array_len {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!(
                "read/write of {length} bytes at offset {offset} overflows a buffer of {array_len} bytes"
            ),
        )));
    }
    Ok(())
}

#[inline]
pub fn read_u32(array: &[u8], offset: u32) -> Result<u32> {
    let offset = offset as usize;
    check_overflow(array.len(), offset, 4)?;
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&array[offset..offset + 4]);
    Ok(u32::from_ne_bytes(bytes))
}

#[inline]
pub fn write_u32(array: &mut [u8], offset: u32, value: u32) -> Result<()> {
    let offset = offset as usize;
    check_overflow(array.len(), offset, 4)?;
    array[offset..offset + 4].copy_from_slice(&value.to_ne_bytes());
    Ok(())
}

#[inline]
pub fn read_u16(array: &[u8], offset: u32) -> Result<u16> {
    let offset = offset as usize;
    check_overflow(array.len(), offset, 2)?;
    let mut bytes = [0u8; 2];
    bytes.copy_from_slice(&array[offset..offset + 2]);
    Ok(u16::from_ne_bytes(bytes))
}

#[inline]
pub fn write_u16(array: &mut [u8], offset: u32, value: u16) -> Result<()> {
    let offset = offset as usize;
    check_overflow(array.len(), offset, 2)?;
    array[offset..offset + 2].copy_from_slice(&value.to_ne_bytes());
    Ok(())
}

#[inline]
pub fn read_i32(array: &[u8], offset: u32) -> Result<i32> {
    let offset = offset as usize;
    check_overflow(array.len(), offset, 4)?;
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&array[offset..offset + 4]);
    Ok(i32::from_ne_bytes(bytes))
}

#[inline]
pub fn write_i32(array: &mut [u8], offset: u32, value: i32) -> Result<()> {
    let offset = offset as usize;
    check_overflow(array.len(), offset, 4)?;
    array[offset..offset + 4].copy_from_slice(&value.to_ne_bytes());
    Ok(())
}

#[inline]
pub fn read_bool(array: &[u8], offset: u32) -> Result<bool> {
    let offset = offset as usize;
    check_overflow(array.len(), offset, 1)?;
    match array[offset] {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("expected 0 or 1 for a boolean byte, found {other}"),
        ))),
    }
}

#[inline]
pub fn write_bool(array: &mut [u8], offset: u32, value: bool) -> Result<()> {
    let offset = offset as usize;
    check_overflow(array.len(), offset, 1)?;
    array[offset] = value as u8;
    Ok(())
}

/// Read `len` raw bytes at `offset`, returned as an owned copy.
#[inline]
pub fn read_bytes(array: &[u8], offset: u32, len: u32) -> Result<Vec<u8>> {
    let offset = offset as usize;
    let len = len as usize;
    check_overflow(array.len(), offset, len)?;
    Ok(array[offset..offset + len].to_vec())
}

/// Write raw bytes at `offset`.
#[inline]
pub fn write_bytes(array: &mut [u8], offset: u32, data: &[u8]) -> Result<()> {
    let offset = offset as usize;
    check_overflow(array.len(), offset, data.len())?;
    array[offset..offset + data.len()].copy_from_slice(data);
    Ok(())
}
