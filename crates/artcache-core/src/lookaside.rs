//! Read-only look-aside cache used when the network cannot be used.
//!
//! A pre-populated directory holding `<escaped-uri>.cached` files. Whatever
//! is restored from here carries no validators, so the entry is treated as
//! permanently fresh afterwards.

use std::fs;
use std::path::PathBuf;

use crate::entry::{escape_uri, WriteView};
use crate::error::{CacheError, Result};

/// Suffix appended to the escaped URI in the look-aside directory.
pub const LOOKASIDE_SUFFIX: &str = ".cached";

#[derive(Debug, Clone, Default)]
pub struct LookAside {
    root: Option<PathBuf>,
}

impl LookAside {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// File name a URI would have in the look-aside directory.
    pub fn file_name(uri: &str) -> String {
        format!("{}{}", escape_uri(uri), LOOKASIDE_SUFFIX)
    }

    /// Path of the look-aside copy of `uri`, if one exists.
    pub fn locate(&self, uri: &str) -> Option<PathBuf> {
        let path = self.root.as_ref()?.join(Self::file_name(uri));
        path.is_file().then_some(path)
    }

    /// Copies the look-aside copy of `uri` into the entry, or fails with
    /// `FallbackExhausted` listing what the directory does contain.
    pub fn restore(&self, uri: &str, view: &mut WriteView<'_>) -> Result<()> {
        match self.locate(uri) {
            Some(source) => {
                let bytes = view.persist_file(&source)?;
                tracing::info!(uri, source = %source.display(), bytes, "restored from look-aside cache");
                Ok(())
            }
            None => {
                let err = CacheError::FallbackExhausted {
                    uri: uri.to_string(),
                    dir: self
                        .root
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "<none>".to_string()),
                    listing: self.listing(),
                };
                tracing::error!("{}", err);
                Err(err)
            }
        }
    }

    fn listing(&self) -> String {
        let Some(root) = &self.root else {
            return "no look-aside directory configured".to_string();
        };
        match fs::read_dir(root) {
            Ok(entries) => {
                let mut names: Vec<String> = entries
                    .flatten()
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect();
                if names.is_empty() {
                    return "empty".to_string();
                }
                names.sort();
                names.join(", ")
            }
            Err(e) => format!("unreadable: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::CacheEntry;

    const URI: &str = "https://h/a.jar";

    #[test]
    fn file_name_uses_escaped_uri_and_suffix() {
        assert_eq!(LookAside::file_name(URI), "https%3A%2F%2Fh%2Fa.jar.cached");
    }

    #[test]
    fn restore_copies_bytes_without_validators() {
        let side = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        fs::write(side.path().join(LookAside::file_name(URI)), b"C").unwrap();

        let lookaside = LookAside::new(Some(side.path().to_path_buf()));
        let entry = CacheEntry::new(cache.path(), URI);
        entry.lock_exclusive(|v| lookaside.restore(URI, v)).unwrap();

        entry
            .lock_shared(|v| {
                assert!(!v.has_validators());
                assert_eq!(v.data(|p| fs::read(p)).unwrap(), b"C");
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn missing_file_lists_directory() {
        let side = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        fs::write(side.path().join("other.cached"), b"x").unwrap();
        fs::write(side.path().join("another.cached"), b"y").unwrap();

        let lookaside = LookAside::new(Some(side.path().to_path_buf()));
        let entry = CacheEntry::new(cache.path(), URI);
        let err = entry.lock_exclusive(|v| lookaside.restore(URI, v)).unwrap_err();
        match err {
            CacheError::FallbackExhausted { listing, .. } => {
                assert_eq!(listing, "another.cached, other.cached")
            }
            other => panic!("expected FallbackExhausted, got {other:?}"),
        }
        assert!(!entry.paths().data.exists());
    }

    #[test]
    fn no_root_configured() {
        let cache = tempfile::tempdir().unwrap();
        let lookaside = LookAside::new(None);
        assert!(lookaside.locate(URI).is_none());
        let entry = CacheEntry::new(cache.path(), URI);
        let err = entry.lock_exclusive(|v| lookaside.restore(URI, v)).unwrap_err();
        assert!(err.to_string().contains("no look-aside directory configured"));
    }
}
