/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

use crate::constants::RecordIdT;
use thiserror::Error;

/// Errors raised anywhere in the storage and execution core.
///
/// Lower layers (block, heap file, relation, catalog) raise the variants relevant to them; the
/// executor wraps whichever variant escapes a statement handler in [`crate::executor::ExecError`]
/// together with the offending statement text.
#[derive(Error, Debug)]
pub enum Error {
    #[error("record of {len} bytes does not fit in the block's free space ({free} bytes)")]
    NoRoom { len: u32, free: u32 },

    #[error("marshalled row of {len} bytes exceeds the maximum row size ({max} bytes)")]
    RowTooLarge { len: u32, max: u32 },

    #[error("slot {0} is out of bounds for this block")]
    SlotOutOfBounds(RecordIdT),

    #[error("unknown column `{0}`")]
    UnknownColumn(String),

    #[error("unknown table `{0}`")]
    UnknownTable(String),

    #[error("unknown index `{1}` on table `{0}`")]
    UnknownIndex(String, String),

    #[error("table `{0}` already exists")]
    DuplicateTable(String),

    #[error("column `{1}` already exists on table `{0}`")]
    DuplicateColumn(String, String),

    #[error("index `{1}` already exists on table `{0}`")]
    DuplicateIndex(String, String),

    #[error("unsupported column type `{0}`")]
    UnsupportedType(String),

    #[error("unsupported predicate shape")]
    UnsupportedPredicate,

    #[error("unsupported literal")]
    UnsupportedLiteral,

    #[error("insert into `{table}` has {got} values but the table has {expected} columns")]
    ColumnCountMismatch {
        table: String,
        expected: usize,
        got: usize,
    },

    #[error("`{0}` is a system catalog table and cannot be dropped")]
    CannotDropSchema(String),

    #[error("`{0}` is not a valid identifier")]
    InvalidIdentifier(String),

    #[error("relation `{0}` already exists on disk")]
    AlreadyExists(String),

    #[error("relation `{0}` does not exist on disk")]
    NotFound(String),

    #[error("underlying storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
