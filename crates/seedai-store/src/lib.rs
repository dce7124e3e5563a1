//! SeedAI Storage Layer
//!
//! Persists extracted seed values as a content-addressed corpus directory.
//!
//! # Layout
//!
//! - Flat directory, one file per seed
//! - File name: 40-character lowercase hex SHA1 of the content
//! - Content: the exact UTF-8 bytes of the seed, nothing else
//!
//! Entries are never rewritten or pruned. Saving a seed whose hash already
//! exists is a no-op, so concurrent runs on the same directory at worst
//! disagree about how many seeds each of them wrote.
//!
//! # Examples
//!
//! ```no_run
//! use seedai_store::SeedStore;
//!
//! let store = SeedStore::new("corpus");
//! let written = store.save(&["hello", "world", "hello"]).unwrap();
//! assert_eq!(written, 2);
//! ```

#![warn(missing_docs)]

use sha1::{Digest, Sha1};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Length of a hex-encoded SHA1 digest
pub const HASH_LEN: usize = 40;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// The corpus directory could not be created
    #[error("Failed to create corpus directory {}: {source}", path.display())]
    CreateDir {
        /// Directory that was being created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A seed file could not be written
    #[error("Failed to write seed file {}: {source}", path.display())]
    Write {
        /// Target path of the seed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The corpus could not be read
    #[error("Failed to read corpus entry {}: {source}", path.display())]
    Read {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Lowercase hex SHA1 of `bytes`
///
/// # Examples
///
/// ```
/// use seedai_store::seed_hash;
///
/// assert_eq!(seed_hash(b""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
/// ```
pub fn seed_hash(bytes: &[u8]) -> String {
    hex::encode(Sha1::digest(bytes))
}

/// Whether `name` looks like a corpus entry name
pub fn is_seed_name(name: &str) -> bool {
    name.len() == HASH_LEN
        && name
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Save `seeds` into `dir`, returning how many were newly written
///
/// Shorthand for `SeedStore::new(dir).save(seeds)`.
pub fn save_seeds<S: AsRef<str>>(dir: impl Into<PathBuf>, seeds: &[S]) -> Result<usize, StoreError> {
    SeedStore::new(dir).save(seeds)
}

/// Content-addressed, deduplicating seed corpus
#[derive(Debug, Clone)]
pub struct SeedStore {
    dir: PathBuf,
}

impl SeedStore {
    /// Create a store rooted at `dir`
    ///
    /// The directory is created lazily on the first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The corpus directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the corpus directory if it does not exist
    pub fn ensure_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::CreateDir {
            path: self.dir.clone(),
            source,
        })
    }

    /// Path of the entry for `hash`
    pub fn path_for(&self, hash: &str) -> PathBuf {
        self.dir.join(hash)
    }

    /// Whether an entry for `hash` exists
    pub fn contains(&self, hash: &str) -> bool {
        self.path_for(hash).exists()
    }

    /// Persist each seed as UTF-8 bytes named by their SHA1
    ///
    /// Returns the number of files that did not exist before this call.
    /// Stops at the first I/O failure; the failing seed leaves no file behind.
    pub fn save<S: AsRef<str>>(&self, seeds: &[S]) -> Result<usize, StoreError> {
        self.ensure_dir()?;

        let mut written = 0;
        for seed in seeds {
            if self.write_seed(seed.as_ref().as_bytes())? {
                written += 1;
            }
        }

        Ok(written)
    }

    /// Write one seed; `Ok(false)` when the entry already existed
    fn write_seed(&self, bytes: &[u8]) -> Result<bool, StoreError> {
        let hash = seed_hash(bytes);
        let path = self.path_for(&hash);

        if path.exists() {
            debug!("Seed {} already in corpus", hash);
            return Ok(false);
        }

        let write_err = |source| StoreError::Write {
            path: path.clone(),
            source,
        };

        // Temp file in the same directory so the final link is atomic
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        tmp.write_all(bytes).map_err(write_err)?;
        tmp.flush().map_err(write_err)?;

        match tmp.persist_noclobber(&path) {
            Ok(_) => {
                debug!("Wrote seed {} ({} bytes)", hash, bytes.len());
                Ok(true)
            }
            // Another writer got there first; content is identical by construction
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(write_err(e.error)),
        }
    }

    /// Names of all corpus entries, sorted
    ///
    /// A missing directory is an empty corpus.
    pub fn entries(&self) -> Result<Vec<String>, StoreError> {
        let read_err = |source| StoreError::Read {
            path: self.dir.clone(),
            source,
        };

        let dir = match fs::read_dir(&self.dir) {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(read_err(e)),
        };

        let mut names = Vec::new();
        for entry in dir {
            let entry = entry.map_err(read_err)?;
            if let Some(name) = entry.file_name().to_str() {
                if is_seed_name(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();

        Ok(names)
    }

    /// Number of corpus entries
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.entries()?.len())
    }

    /// Whether the corpus has no entries
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.entries()?.is_empty())
    }

    /// Entries whose name is not the SHA1 of their content
    pub fn verify(&self) -> Result<Vec<String>, StoreError> {
        let mut mismatched = Vec::new();
        for name in self.entries()? {
            let path = self.path_for(&name);
            let bytes = fs::read(&path).map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?;
            if seed_hash(&bytes) != name {
                mismatched.push(name);
            }
        }
        Ok(mismatched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_hash_is_lowercase_hex() {
        let hash = seed_hash(b"hello world");
        assert_eq!(hash, "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
        assert!(is_seed_name(&hash));
    }

    #[test]
    fn test_is_seed_name() {
        assert!(is_seed_name("da39a3ee5e6b4b0d3255bfef95601890afd80709"));
        assert!(!is_seed_name("DA39A3EE5E6B4B0D3255BFEF95601890AFD80709"));
        assert!(!is_seed_name(".tmpAbC123"));
        assert!(!is_seed_name("da39a3ee"));
    }

    #[test]
    fn test_save_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("corpus");
        let store = SeedStore::new(&dir);

        assert_eq!(store.save(&["x"]).unwrap(), 1);
        assert!(dir.is_dir());
    }

    #[test]
    fn test_duplicates_in_one_batch_count_once() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SeedStore::new(tmp.path());

        let written = store.save(&["a", "b", "a", "a"]).unwrap();
        assert_eq!(written, 2);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_entries_of_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SeedStore::new(tmp.path().join("absent"));
        assert!(store.entries().unwrap().is_empty());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_contains_after_save() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SeedStore::new(tmp.path());
        store.save(&["seed"]).unwrap();
        assert!(store.contains(&seed_hash(b"seed")));
        assert!(!store.contains(&seed_hash(b"other")));
    }

    #[test]
    fn test_verify_reports_tampered_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SeedStore::new(tmp.path());
        store.save(&["good", "bad"]).unwrap();

        let bad = seed_hash(b"bad");
        fs::write(store.path_for(&bad), b"tampered").unwrap();

        assert_eq!(store.verify().unwrap(), vec![bad]);
    }

    #[test]
    fn test_create_dir_error_carries_path() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, b"not a directory").unwrap();

        let store = SeedStore::new(blocker.join("corpus"));
        match store.save(&["x"]) {
            Err(StoreError::CreateDir { path, .. }) => assert_eq!(path, blocker.join("corpus")),
            other => panic!("Expected CreateDir error, got {:?}", other),
        }
    }

    #[test]
    fn test_write_error_carries_target_path() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SeedStore::new(tmp.path().join("corpus"));
        store.ensure_dir().unwrap();
        fs::remove_dir(store.dir()).unwrap();

        let target = store.path_for(&seed_hash(b"x"));
        match store.write_seed(b"x") {
            Err(StoreError::Write { path, .. }) => assert_eq!(path, target),
            other => panic!("Expected Write error, got {:?}", other),
        }
        assert!(!target.exists());
    }
}
