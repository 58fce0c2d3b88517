//! The key manifest: a flat JSON object mapping keys to source texts.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

/// Action taken on a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Added,
    Updated,
    Unchanged,
}

/// Manifest file with insertion order preserved.
pub struct Manifest {
    file_path: PathBuf,
    data: Map<String, Value>,
}

impl Manifest {
    /// Open an existing manifest or start an empty one.
    pub fn open_or_create(path: &Path) -> Result<Self> {
        let data = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
            let value: Value = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse manifest: {}", path.display()))?;
            match value {
                Value::Object(map) => map,
                _ => bail!("Root of manifest must be an object: {}", path.display()),
            }
        } else {
            Map::new()
        };

        Ok(Self {
            file_path: path.to_path_buf(),
            data,
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// String entries in file order. Non-string values are ignored.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.data
            .iter()
            .filter_map(|(key, value)| value.as_str().map(|text| (key.clone(), text.to_string())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    pub fn insert(&mut self, key: &str, text: &str) -> KeyAction {
        match self.data.get(key) {
            Some(Value::String(existing)) if existing == text => KeyAction::Unchanged,
            Some(_) => {
                self.data.insert(key.to_string(), Value::from(text));
                KeyAction::Updated
            }
            None => {
                self.data.insert(key.to_string(), Value::from(text));
                KeyAction::Added
            }
        }
    }

    /// Merge entries; returns how many keys were added.
    pub fn merge<'a, I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        entries
            .into_iter()
            .filter(|(key, text)| self.insert(key, text) == KeyAction::Added)
            .count()
    }

    /// Save with 2-space indentation and a trailing newline.
    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&Value::Object(self.data.clone()))
            .context("Failed to serialize manifest")?;
        write_atomic(&self.file_path, &format!("{}\n", content))
    }
}

/// Replace `path` with `content` through a temporary file in the same
/// directory, so readers never see a partial file.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    // A symlinked file keeps its link; the file it points to is replaced
    let is_link = fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink());
    let target = if is_link {
        fs::canonicalize(path)
            .with_context(|| format!("Failed to resolve link: {}", path.display()))?
    } else {
        path.to_path_buf()
    };

    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory: {}", parent.display()))?;

    let mut temp = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
    temp.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    if let Ok(meta) = fs::metadata(&target) {
        temp.as_file()
            .set_permissions(meta.permissions())
            .with_context(|| format!("Failed to copy permissions: {}", path.display()))?;
    }
    temp.persist(&target)
        .with_context(|| format!("Failed to replace file: {}", path.display()))?;
    Ok(())
}
