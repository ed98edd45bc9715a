//! Task-sheet ingestion.
//!
//! The sheet is "wide": one row per subsection, one `Day N` column block per
//! working day, with section header rows in between. Each filled `Day N` cell
//! becomes a [`Task`].

mod wide_csv;

use crate::error::IngestResult;
use crate::task::Task;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    pub auto_chain: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self { auto_chain: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestOutcome {
    pub tasks: Vec<Task>,
    pub warnings: Vec<String>,
}

impl IngestOutcome {
    /// Sorted, distinct section labels.
    pub fn sections(&self) -> Vec<String> {
        let mut sections: Vec<String> = self.tasks.iter().filter_map(|t| t.section.clone()).collect();
        sections.sort();
        sections.dedup();
        sections
    }

    /// Sorted, distinct crew categories.
    pub fn crew_categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .tasks
            .iter()
            .filter_map(|t| t.crew_category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }
}

pub fn parse_wide_csv<R: Read>(reader: R, options: &IngestOptions) -> IngestResult<IngestOutcome> {
    wide_csv::parse(reader, options)
}

pub fn parse_wide_csv_path<P: AsRef<Path>>(path: P, options: &IngestOptions) -> IngestResult<IngestOutcome> {
    let file = File::open(path)?;
    wide_csv::parse(file, options)
}

/// Tasks whose section is in `sections`; an empty filter keeps everything.
pub fn filter_sections(tasks: &[Task], sections: &[String]) -> Vec<Task> {
    if sections.is_empty() {
        return tasks.to_vec();
    }
    tasks
        .iter()
        .filter(|task| {
            task.section
                .as_ref()
                .is_some_and(|section| sections.contains(section))
        })
        .cloned()
        .collect()
}
