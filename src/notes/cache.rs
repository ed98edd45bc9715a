use super::extract::{NoteSource, extract_notes};
use crate::error::NoteCacheResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Identity of a drawing file's contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSignature {
    pub size: u64,
    pub content_hash: String,
}

impl FileSignature {
    pub fn of_file(path: &Path) -> NoteCacheResult<Self> {
        let bytes = fs::read(path)?;
        Ok(Self {
            size: bytes.len() as u64,
            content_hash: blake3::hash(&bytes).to_hex().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedNotes {
    pub signature: FileSignature,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStats {
    pub extracted: usize,
    pub reused: usize,
}

impl RefreshStats {
    pub fn changed(&self) -> bool {
        self.extracted > 0
    }
}

/// Notes per drawing, keyed by file name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteCache {
    entries: BTreeMap<String, CachedNotes>,
}

impl NoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A missing cache file is an empty cache.
    pub fn load<P: AsRef<Path>>(path: P) -> NoteCacheResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> NoteCacheResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&CachedNotes> {
        self.entries.get(key)
    }

    /// Re-extracts only drawings whose signature changed since the last refresh.
    pub fn refresh<P, S>(&mut self, paths: &[P], source: &S) -> NoteCacheResult<RefreshStats>
    where
        P: AsRef<Path>,
        S: NoteSource + ?Sized,
    {
        let mut stats = RefreshStats::default();
        for path in paths {
            let path = path.as_ref();
            let key = cache_key(path);
            let signature = FileSignature::of_file(path)?;
            if self
                .entries
                .get(&key)
                .is_some_and(|cached| cached.signature == signature)
            {
                debug!(file = %key, "drawing unchanged");
                stats.reused += 1;
                continue;
            }

            let notes = extract_notes(&source.extract_text(path)?);
            debug!(file = %key, notes = notes.len(), "extracted drawing notes");
            self.entries.insert(key, CachedNotes { signature, notes });
            stats.extracted += 1;
        }
        info!(extracted = stats.extracted, reused = stats.reused, "note cache refreshed");
        Ok(stats)
    }

    /// Every cached note, drawings in key order.
    pub fn all_notes(&self) -> Vec<String> {
        self.entries
            .values()
            .flat_map(|cached| cached.notes.iter().cloned())
            .collect()
    }
}

fn cache_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
