/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

use crate::constants::BLOCK_SZ;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Runtime configuration for one database environment.
///
/// An "environment" is a single directory that holds every relation's `<name>.db` file. This
/// mirrors the process-wide environment handle described in the design's concurrency model
/// (§5): one `Config` is constructed at startup and threaded explicitly into the
/// [`crate::catalog::Catalog`] and [`crate::executor::Executor`], rather than reached through a
/// global.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding every relation's on-disk file.
    dir: PathBuf,

    /// Block size used for newly created heap files. Exposed for tests; production code should
    /// leave this at [`BLOCK_SZ`].
    block_size: u32,

    /// Create the environment directory if it does not already exist.
    create_if_missing: bool,
}

impl Config {
    /// Build a config pointed at `dir` with the default block size.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            block_size: BLOCK_SZ,
            create_if_missing: true,
        }
    }

    pub fn with_block_size(mut self, block_size: u32) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_create_if_missing(mut self, create_if_missing: bool) -> Self {
        self.create_if_missing = create_if_missing;
        self
    }

    /// Validate and, if requested, create the environment directory.
    ///
    /// This is the sole source of the non-zero exit code described in §6: a shell wiring this
    /// crate to a CLI should map an `Err` here directly to a non-zero exit status.
    pub fn open(&self) -> Result<()> {
        if self.dir.is_dir() {
            return Ok(());
        }
        if self.dir.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("{} exists and is not a directory", self.dir.display()),
            )));
        }
        if self.create_if_missing {
            std::fs::create_dir_all(&self.dir)?;
            Ok(())
        } else {
            Err(Error::NotFound(self.dir.display().to_string()))
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Full path for a relation's underlying record-store file.
    pub fn relation_path(&self, relation: &str) -> PathBuf {
        self.dir.join(format!("{relation}{}", crate::constants::DB_FILE_SUFFIX))
    }
}
