//! File-backed obfuscated key-value store.
//!
//! One JSON file holding a string map; every value is sealed by the
//! [`Obfuscator`]. Mutations are in-memory until [`commit`] writes the
//! whole map back, matching how cached license state is updated (read at
//! startup, rewritten after each server round trip).
//!
//! [`commit`]: ObfuscatedStore::commit

use crate::error::{ObfuscatorError, ObfuscatorResult};
use crate::seal::Obfuscator;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A file-backed string map with obfuscated values.
#[derive(Debug)]
pub struct ObfuscatedStore {
    path: PathBuf,
    obfuscator: Obfuscator,
    /// Keyed by plain name; values are sealed.
    entries: HashMap<String, String>,
}

impl ObfuscatedStore {
    /// Opens the store at `path`, loading existing entries if the file
    /// exists. A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not
    /// valid JSON.
    pub fn open(path: impl Into<PathBuf>, obfuscator: Obfuscator) -> ObfuscatorResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            debug!(path = %path.display(), "no existing store file, starting empty");
            HashMap::new()
        };

        Ok(Self {
            path,
            obfuscator,
            entries,
        })
    }

    /// Opens the store at the default platform location
    /// (`<cache dir>/storegate/license.cache`).
    ///
    /// # Errors
    ///
    /// Returns [`ObfuscatorError::NoCacheDir`] if the platform has no
    /// cache directory, or any error from [`open`](Self::open).
    pub fn open_default(obfuscator: Obfuscator) -> ObfuscatorResult<Self> {
        let dir = dirs::cache_dir().ok_or(ObfuscatorError::NoCacheDir)?;
        Self::open(dir.join("storegate").join("license.cache"), obfuscator)
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the unsealed value for `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the stored value fails to unseal
    /// (tampered file, or a cache written on another device).
    pub fn get(&self, key: &str) -> ObfuscatorResult<Option<String>> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(sealed) => match self.obfuscator.unobfuscate(sealed) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    warn!(key, error = %e, "stored value failed validation");
                    Err(e)
                }
            },
        }
    }

    /// Seals `value` and stores it under `key`. Not persisted until
    /// [`commit`](Self::commit).
    ///
    /// # Errors
    ///
    /// Returns an error if sealing fails.
    pub fn put(&mut self, key: impl Into<String>, value: &str) -> ObfuscatorResult<()> {
        let sealed = self.obfuscator.obfuscate(value)?;
        self.entries.insert(key.into(), sealed);
        Ok(())
    }

    /// Removes `key`. Returns true if it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the current entries to the backing file, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn commit(&self) -> ObfuscatorResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, raw)?;
        debug!(path = %self.path.display(), entries = self.entries.len(), "store committed");
        Ok(())
    }
}
