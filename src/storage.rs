//! Durable key/value storage for client-side state.
//!
//! Each key is an independent file inside the data directory. Writes go
//! through a temporary file and a rename so a crash never leaves a
//! half-written value behind, but there is no transaction across keys.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Well-known storage keys
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USER: &str = "user";
    pub const CART: &str = "cart";
    pub const THEME: &str = "theme-storage";
}

#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    /// Open (and create if needed) a storage directory
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Default data directory: <platform data dir>/courtside, or ~/.courtside
    pub fn default_dir() -> PathBuf {
        if let Some(data) = dirs::data_dir() {
            return data.join("courtside");
        }
        dirs::home_dir()
            .map(|home| home.join(".courtside"))
            .unwrap_or_else(|| PathBuf::from(".courtside"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Read a raw value; a missing key is `None`
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read storage key '{}'", key)),
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let tmp = self.dir.join(format!(".{}.tmp", key));
        std::fs::write(&tmp, value)
            .with_context(|| format!("Failed to write storage key '{}'", key))?;
        std::fs::rename(&tmp, self.path(key))
            .with_context(|| format!("Failed to commit storage key '{}'", key))?;
        Ok(())
    }

    /// Remove a key; removing an absent key is not an error
    pub fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove storage key '{}'", key)),
        }
    }

    /// Read and parse a JSON value. Unparsable data is an error; callers
    /// decide whether to fail open.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(raw) => {
                let value = serde_json::from_str(&raw)
                    .with_context(|| format!("Corrupt JSON under storage key '{}'", key))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}
