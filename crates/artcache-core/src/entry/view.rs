//! Views handed to closures running under an entry lock.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use super::EntryPaths;
use crate::error::{CacheError, Result};
use crate::http::Validators;

/// Read-only access to an entry, valid while a shared (or exclusive) lock is held.
#[derive(Debug)]
pub struct ReadView<'a> {
    paths: &'a EntryPaths,
}

impl<'a> ReadView<'a> {
    pub(super) fn new(paths: &'a EntryPaths) -> Self {
        Self { paths }
    }

    /// True once a complete data file is in place.
    pub fn cached(&self) -> bool {
        self.paths.data.is_file()
    }

    pub fn has_etag(&self) -> bool {
        self.paths.etag.is_file()
    }

    pub fn has_last_modified(&self) -> bool {
        self.paths.last_modified.is_file()
    }

    pub fn has_validators(&self) -> bool {
        self.has_etag() || self.has_last_modified()
    }

    pub fn etag(&self) -> Result<Option<String>> {
        read_optional(&self.paths.etag)
    }

    pub fn last_modified(&self) -> Result<Option<String>> {
        read_optional(&self.paths.last_modified)
    }

    pub fn validators(&self) -> Result<Validators> {
        Ok(Validators {
            etag: self.etag()?,
            last_modified: self.last_modified()?,
        })
    }

    /// Hands the data file path to `f`. The lock outlives the call.
    pub fn data<R>(&self, f: impl FnOnce(&Path) -> R) -> R {
        f(&self.paths.data)
    }
}

/// Mutable access to an entry, valid only while the exclusive lock is held.
#[derive(Debug)]
pub struct WriteView<'a> {
    paths: &'a EntryPaths,
}

impl<'a> WriteView<'a> {
    pub(super) fn new(paths: &'a EntryPaths) -> Self {
        Self { paths }
    }

    pub fn cached(&self) -> bool {
        self.paths.data.is_file()
    }

    /// Streams new data into the entry.
    ///
    /// `write` gets a fresh `.part` file. If it returns `Ok`, the file is
    /// synced, the old validators are removed (they describe the old data) and
    /// the part file replaces the data file. If it returns `Err`, the part file
    /// is discarded and the entry is left exactly as it was. The outer `Result`
    /// reports local I/O failures of the commit itself.
    pub fn persist_data<T, E>(
        &mut self,
        write: impl FnOnce(&mut File, &Path) -> std::result::Result<T, E>,
    ) -> Result<std::result::Result<T, E>> {
        let paths = self.paths;
        let part = &paths.part;
        let mut file = File::create(part).map_err(CacheError::io("create", part))?;
        match write(&mut file, part) {
            Ok(value) => {
                file.sync_all().map_err(CacheError::io("sync", part))?;
                drop(file);
                self.clear_validators()?;
                fs::rename(part, &paths.data).map_err(CacheError::io("rename", part))?;
                Ok(Ok(value))
            }
            Err(e) => {
                drop(file);
                remove_if_exists(part)?;
                Ok(Err(e))
            }
        }
    }

    /// Copies `source` in as the entry's data. Records no validators.
    pub fn persist_file(&mut self, source: &Path) -> Result<u64> {
        let copied = self.persist_data(|file, _| {
            let mut src = File::open(source)?;
            io::copy(&mut src, file)
        })?;
        copied.map_err(CacheError::io("copy", source))
    }

    pub fn persist_etag(&mut self, etag: &str) -> Result<()> {
        fs::write(&self.paths.etag, etag).map_err(CacheError::io("write", &self.paths.etag))
    }

    pub fn persist_last_modified(&mut self, last_modified: &str) -> Result<()> {
        fs::write(&self.paths.last_modified, last_modified)
            .map_err(CacheError::io("write", &self.paths.last_modified))
    }

    /// Writes whichever validators are present. An absent header leaves no
    /// file; a present-but-empty one leaves an empty file.
    pub fn persist_validators(&mut self, validators: &Validators) -> Result<()> {
        if let Some(etag) = &validators.etag {
            self.persist_etag(etag)?;
        }
        if let Some(lm) = &validators.last_modified {
            self.persist_last_modified(lm)?;
        }
        Ok(())
    }

    pub fn clear_validators(&mut self) -> Result<()> {
        remove_if_exists(&self.paths.etag)?;
        remove_if_exists(&self.paths.last_modified)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CacheError::io("read", path)(e)),
    }
}

pub(super) fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CacheError::io("remove", path)(e)),
    }
}
