use crate::error::{NoteCacheError, NoteCacheResult};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const NOTE_PREFIX: &str = "note -";

/// Pull `note - ...` lines out of drawing text, first occurrence wins.
pub fn extract_notes(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut notes = Vec::new();
    for line in text.lines().map(str::trim) {
        let Some(prefix) = line.get(..NOTE_PREFIX.len()) else {
            continue;
        };
        if !prefix.eq_ignore_ascii_case(NOTE_PREFIX) {
            continue;
        }
        let content = line[NOTE_PREFIX.len()..].trim();
        if !content.is_empty() && seen.insert(content.to_string()) {
            notes.push(content.to_string());
        }
    }
    notes
}

/// Turns a drawing file into plain text.
pub trait NoteSource {
    fn extract_text(&self, path: &Path) -> NoteCacheResult<String>;
}

/// Reads drawings that were already converted to text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSource;

impl NoteSource for PlainTextSource {
    fn extract_text(&self, path: &Path) -> NoteCacheResult<String> {
        let bytes = fs::read(path)?;
        String::from_utf8(bytes).map_err(|err| NoteCacheError::Extraction {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }
}
