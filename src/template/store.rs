//! Template lookup and caching.
//!
//! Templates are opened lazily and kept open for the lifetime of the
//! store. Reopening a cached template rewinds it to the start.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{AsgenError, Result};

use super::builtin::builtin;

/// A rewindable template reader.
pub trait TemplateSource: BufRead + Seek {}

impl<T: BufRead + Seek> TemplateSource for T {}

pub struct TemplateStore {
    /// Directory whose files override built-in templates.
    overrides: Option<PathBuf>,
    cache: HashMap<String, Box<dyn TemplateSource>>,
}

impl TemplateStore {
    /// A store serving only the built-in templates.
    pub fn builtin() -> Self {
        Self {
            overrides: None,
            cache: HashMap::new(),
        }
    }

    /// A store that prefers files in `dir` over built-in templates.
    pub fn with_overrides(dir: impl Into<PathBuf>) -> Self {
        Self {
            overrides: Some(dir.into()),
            cache: HashMap::new(),
        }
    }

    /// Open a template, rewound to its first line.
    pub fn open(&mut self, id: &str) -> Result<&mut (dyn TemplateSource + 'static)> {
        let source = match self.cache.entry(id.to_string()) {
            Entry::Occupied(entry) => {
                let source = entry.into_mut();
                source.seek(SeekFrom::Start(0))?;
                source
            }
            Entry::Vacant(entry) => {
                let source = load(self.overrides.as_deref(), id)?;
                log::debug!("open read stream {}", id);
                entry.insert(source)
            }
        };
        Ok(source.as_mut())
    }

    /// Number of templates currently held open.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl Drop for TemplateStore {
    fn drop(&mut self) {
        for id in self.cache.keys() {
            log::debug!("closing read stream {}", id);
        }
    }
}

fn load(overrides: Option<&Path>, id: &str) -> Result<Box<dyn TemplateSource>> {
    if let Some(path) = overrides.map(|dir| dir.join(id)).filter(|p| p.is_file()) {
        let file = File::open(&path).map_err(|e| AsgenError::Io {
            path: path.clone(),
            message: format!("Failed to open template: {}", e),
        })?;
        return Ok(Box::new(BufReader::new(file)));
    }

    builtin(id)
        .map(|source| Box::new(Cursor::new(source.as_bytes())) as Box<dyn TemplateSource>)
        .ok_or_else(|| AsgenError::TemplateNotFound { id: id.to_string() })
}
