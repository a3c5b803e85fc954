//! Persisted key/value override store
//!
//! A single user-editable file at the repo root, created once with documented
//! defaults and merged into the environment on every session. User edits are
//! never overwritten; unrecognized keys are preserved but not interpreted.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Recognized override keys and their documented defaults
pub const RECOGNIZED_KEYS: &[(&str, &str)] = &[
    ("NODE_RELEASE", "9.2.1"),
    ("NODE_SRC_DIR", "~/.chrysalis/node-src"),
    ("NODE_DB_DIR", "~/.chrysalis/node-db"),
    ("USE_PREVIEW_NET", "true"),
    ("OPERATOR_NAME", "operator"),
];

/// Loaded override store, tracking the file's modification time so edits can
/// be re-merged without a fresh session
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
    observed_mtime: Option<SystemTime>,
}

impl ConfigStore {
    /// Create the file with documented defaults iff absent, then load it.
    /// An existing file is loaded as-is.
    pub fn ensure(path: &Path) -> Result<Self> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(path, Self::default_contents())
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Self::load(path)
    }

    /// Load an existing store file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let observed_mtime = fs::metadata(path).and_then(|m| m.modified()).ok();
        Ok(Self {
            path: path.to_path_buf(),
            values: Self::parse(&text),
            observed_mtime,
        })
    }

    fn default_contents() -> String {
        let mut out = String::from(
            "# Session overrides. Edit freely; this file is created once and never\n\
             # rewritten. Unrecognized keys are exported untouched.\n",
        );
        for (key, default) in RECOGNIZED_KEYS {
            out.push_str(&format!("{}={}\n", key, default));
        }
        out
    }

    fn parse(text: &str) -> BTreeMap<String, String> {
        let mut values = BTreeMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                values.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        values
    }

    /// Raw value from the file, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Every binding found in the file, defaults not applied
    pub fn raw(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Effective bindings: documented defaults for recognized keys, overlaid
    /// with everything found in the file (unrecognized keys included)
    pub fn effective(&self) -> BTreeMap<String, String> {
        let mut merged: BTreeMap<String, String> = RECOGNIZED_KEYS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (key, value) in &self.values {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Re-read the file when its modification time has moved since the last
    /// load. Returns whether a reload happened; last reload wins.
    pub fn reload_if_changed(&mut self) -> Result<bool> {
        let current = fs::metadata(&self.path).and_then(|m| m.modified()).ok();
        if current == self.observed_mtime {
            return Ok(false);
        }
        *self = Self::load(&self.path)?;
        Ok(true)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
