use super::{IngestOptions, IngestOutcome};
use crate::error::IngestResult;
use crate::task::Task;
use regex::Regex;
use std::collections::BTreeMap;
use std::io::Read;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static DAY_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Day\s*(\d+)$").expect("day column pattern"));
static NUMERIC_CREW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)(?:\.\d+)?\s*$").expect("crew code pattern"));
static SPACE_BEFORE_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+,").expect("comma spacing pattern"));

const TIME_HEADER: &str = "Time (hours)";
const LABOUR_HEADER: &str = "Labor (workers)";

/// Column positions belonging to one `Day N` block.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DayColumns {
    day: usize,
    time: Option<usize>,
    labour: Option<usize>,
    day_number: i64,
}

pub(super) fn parse<R: Read>(reader: R, options: &IngestOptions) -> IngestResult<IngestOutcome> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = disambiguate_headers(reader.headers()?.iter());
    let day_columns = detect_day_columns(&headers);
    let mut warnings = Vec::new();
    if day_columns.is_empty() {
        warnings.push("No 'Day N' columns found. Please verify the CSV structure.".to_string());
        warn!("task sheet has no Day columns");
        return Ok(IngestOutcome {
            tasks: Vec::new(),
            warnings,
        });
    }

    let mut tasks: Vec<Task> = Vec::new();
    let mut current_section: Option<String> = None;

    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };

        let label = cell(Some(0)).map(str::to_string);
        let is_section_header = day_columns
            .iter()
            .all(|dc| cell(Some(dc.day)).is_none() && cell(dc.time).is_none() && cell(dc.labour).is_none());
        if is_section_header {
            debug!(row = row_idx + 2, section = ?label, "section header");
            current_section = label;
            continue;
        }

        for dc in &day_columns {
            let Some(raw_name) = cell(Some(dc.day)) else {
                continue;
            };
            let name = clean_task_name(raw_name);
            if name.is_empty() {
                continue;
            }

            let duration_hours = match cell(dc.time) {
                None => None,
                Some(raw) => match raw.parse::<f64>() {
                    Ok(hours) if hours.is_finite() && hours >= 0.0 => Some(hours),
                    _ => {
                        warnings.push(format!(
                            "row {}: duration '{raw}' for '{name}' (day {}) is not a non-negative number; left unknown",
                            row_idx + 2,
                            dc.day_number
                        ));
                        None
                    }
                },
            };

            let mut task = Task::new(format!("T{:04}", tasks.len()), name, duration_hours)
                .with_planned_day(dc.day_number);
            task.section = current_section.clone();
            task.subsection = label.clone();
            if let Some(labour) = cell(dc.labour) {
                task.crew_category = crew_category_of(labour);
                task.crew_code = Some(labour.to_string());
            }
            tasks.push(task);
        }
    }

    if options.auto_chain {
        chain_within_subsections(&mut tasks);
    }

    for warning in &warnings {
        warn!("{warning}");
    }
    info!(tasks = tasks.len(), days = day_columns.len(), "parsed task sheet");
    Ok(IngestOutcome { tasks, warnings })
}

/// Names blank headers `Unnamed: i` and suffixes repeats `.1`, `.2`, ...
fn disambiguate_headers<'a, I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    raw.into_iter()
        .enumerate()
        .map(|(idx, header)| {
            let base = if header.trim().is_empty() {
                format!("Unnamed: {idx}")
            } else {
                header.to_string()
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

fn is_day_column(header: &str) -> bool {
    DAY_COLUMN.is_match(header.trim())
}

fn detect_day_columns(headers: &[String]) -> Vec<DayColumns> {
    let mut days: Vec<(usize, i64)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, header)| {
            DAY_COLUMN
                .captures(header.trim())
                .and_then(|caps| caps[1].parse::<i64>().ok())
                .map(|number| (idx, number))
        })
        .collect();
    days.sort_by_key(|&(_, number)| number);

    let position = |name: &str| headers.iter().position(|h| h == name);
    let follower = |idx: usize| headers.get(idx).filter(|h| !is_day_column(h)).map(|_| idx);

    days.into_iter()
        .enumerate()
        .map(|(ordinal, (day, day_number))| {
            let suffix = if ordinal == 0 {
                String::new()
            } else {
                format!(".{ordinal}")
            };
            let time = position(&format!("{TIME_HEADER}{suffix}")).or_else(|| follower(day + 1));
            let labour = position(&format!("{LABOUR_HEADER}{suffix}")).or_else(|| follower(day + 2));
            DayColumns {
                day,
                time,
                labour,
                day_number,
            }
        })
        .collect()
}

fn clean_task_name(raw: &str) -> String {
    SPACE_BEFORE_COMMA
        .replace_all(raw, ",")
        .trim()
        .trim_end_matches(',')
        .to_string()
}

/// `2` and `2.01` belong to category `2`; anything else has no category.
fn crew_category_of(code: &str) -> Option<String> {
    NUMERIC_CREW
        .captures(code)
        .map(|caps| caps[1].to_string())
}

/// Each task in a (section, subsection) group waits on the previous one by
/// (planned day, name).
fn chain_within_subsections(tasks: &mut [Task]) {
    let mut groups: BTreeMap<(Option<String>, Option<String>), Vec<usize>> = BTreeMap::new();
    for (idx, task) in tasks.iter().enumerate() {
        groups
            .entry((task.section.clone(), task.subsection.clone()))
            .or_default()
            .push(idx);
    }

    for mut members in groups.into_values() {
        members.sort_by(|&a, &b| {
            tasks[a]
                .planned_day
                .cmp(&tasks[b].planned_day)
                .then_with(|| tasks[a].name.cmp(&tasks[b].name))
        });
        for pair in members.windows(2) {
            let previous = tasks[pair[0]].id.clone();
            tasks[pair[1]].dependencies.insert(previous);
        }
    }
}
