/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

/// Note: This file is NOT a configuration file. The type aliases and global constants below are
/// primarily meant to improve readability throughout the codebase. Prefer `crate::config::Config`
/// for anything that should be tunable at runtime; the values here should not be modified unless
/// explicitly annotated with "safe to modify".

/// Type aliases
pub type BlockIdT = u32;
pub type RecordIdT = u16;

/// Global constants
pub const BLOCK_SZ: u32 = 4096; // safe to modify
pub const SLOT_SZ: u32 = 4;
pub const MAX_ROW_SZ: u32 = BLOCK_SZ - 8;
pub const FIRST_BLOCK_ID: BlockIdT = 1;

/// Names of the three bootstrapped system catalog tables.
pub const TABLES_TABLE: &str = "_tables";
pub const COLUMNS_TABLE: &str = "_columns";
pub const INDICES_TABLE: &str = "_indices";

/// Suffix appended to a relation name to form its underlying record-store file name.
pub const DB_FILE_SUFFIX: &str = ".db";
