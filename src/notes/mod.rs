//! Drawing notes: extraction, an on-disk cache keyed by file contents, and
//! fuzzy suggestions linking notes to tasks.

mod cache;
mod extract;
mod matching;

pub use cache::{CachedNotes, FileSignature, NoteCache, RefreshStats};
pub use extract::{NoteSource, PlainTextSource, extract_notes};
pub use matching::{NoteMatch, TaskMatch, match_notes_to_tasks, token_set_ratio};
