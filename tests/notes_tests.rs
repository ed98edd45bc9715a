use crew_schedule::error::{NoteCacheError, NoteCacheResult};
use crew_schedule::notes::{NoteCache, NoteSource, PlainTextSource, match_notes_to_tasks};
use crew_schedule::{Task, TaskId};
use std::cell::Cell;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Counts extractions so tests can see which drawings were re-read.
struct CountingSource {
    calls: Cell<usize>,
}

impl NoteSource for CountingSource {
    fn extract_text(&self, path: &Path) -> NoteCacheResult<String> {
        self.calls.set(self.calls.get() + 1);
        PlainTextSource.extract_text(path)
    }
}

#[test]
fn refresh_only_re_extracts_changed_drawings() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("A-101.txt");
    let b = dir.path().join("A-102.txt");
    fs::write(&a, "NOTE - Seal all penetrations\nnote - Seal all penetrations\n").unwrap();
    fs::write(&b, "Sheet A-102\nNote - Install vanity level\n").unwrap();

    let source = CountingSource { calls: Cell::new(0) };
    let mut cache = NoteCache::new();
    let stats = cache.refresh(&[&a, &b], &source).unwrap();
    assert_eq!((stats.extracted, stats.reused), (2, 0));
    assert_eq!(
        cache.all_notes(),
        vec!["Seal all penetrations".to_string(), "Install vanity level".to_string()]
    );

    let stats = cache.refresh(&[&a, &b], &source).unwrap();
    assert_eq!((stats.extracted, stats.reused), (0, 2));
    assert_eq!(source.calls.get(), 2);

    fs::write(&b, "Note - Install vanity plumb\n").unwrap();
    let stats = cache.refresh(&[&a, &b], &source).unwrap();
    assert_eq!((stats.extracted, stats.reused), (1, 1));
    assert_eq!(cache.get("A-102.txt").unwrap().notes, vec!["Install vanity plumb".to_string()]);
}

#[test]
fn cache_survives_a_save_and_load() {
    let dir = tempdir().unwrap();
    let drawing = dir.path().join("E-201.txt");
    fs::write(&drawing, "note - GFCI at all wet locations\n").unwrap();
    let cache_path = dir.path().join("cache").join("notes.json");

    let mut cache = NoteCache::new();
    cache.refresh(&[&drawing], &PlainTextSource).unwrap();
    cache.save(&cache_path).unwrap();

    let loaded = NoteCache::load(&cache_path).unwrap();
    assert_eq!(loaded, cache);
    assert!(NoteCache::load(dir.path().join("absent.json")).unwrap().is_empty());
}

#[test]
fn unreadable_text_is_an_extraction_error() {
    let dir = tempdir().unwrap();
    let drawing = dir.path().join("binary.txt");
    fs::write(&drawing, [0xff, 0xfe, 0x00]).unwrap();
    let err = NoteCache::new().refresh(&[&drawing], &PlainTextSource).unwrap_err();
    assert!(matches!(err, NoteCacheError::Extraction { .. }));
}

#[test]
fn notes_are_matched_to_similar_task_names() {
    let tasks = vec![
        Task::new("T0000", "Demo drywall", Some(4.0)),
        Task::new("T0001", "GFCI outlets", Some(2.0)),
    ];
    let matches = match_notes_to_tasks(&["Provide GFCI outlets at wet locations".to_string()], &tasks, 1);
    assert_eq!(matches[0].matches.len(), 1);
    assert_eq!(matches[0].matches[0].task_id, TaskId::new("T0001"));
    assert_eq!(matches[0].matches[0].score, 100);
}
