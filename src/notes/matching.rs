use crate::task::{Task, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskMatch {
    pub task_id: TaskId,
    pub name: String,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteMatch {
    pub note: String,
    pub matches: Vec<TaskMatch>,
}

/// Best `limit` task names for each note, highest score first. Equal scores
/// keep task-list order.
pub fn match_notes_to_tasks(notes: &[String], tasks: &[Task], limit: usize) -> Vec<NoteMatch> {
    notes
        .iter()
        .map(|note| {
            let mut matches: Vec<TaskMatch> = tasks
                .iter()
                .map(|task| TaskMatch {
                    task_id: task.id.clone(),
                    name: task.name.clone(),
                    score: token_set_ratio(note, &task.name),
                })
                .collect();
            matches.sort_by(|a, b| b.score.cmp(&a.score));
            matches.truncate(limit);
            NoteMatch {
                note: note.clone(),
                matches,
            }
        })
        .collect()
}

/// Similarity of two phrases in 0..=100, ignoring word order, repetition,
/// case and punctuation.
pub fn token_set_ratio(left: &str, right: &str) -> u8 {
    let left = tokens(left);
    let right = tokens(right);
    if left.is_empty() || right.is_empty() {
        return 0;
    }

    let shared: Vec<&str> = left.intersection(&right).map(String::as_str).collect();
    let only_left: Vec<&str> = left.difference(&right).map(String::as_str).collect();
    let only_right: Vec<&str> = right.difference(&left).map(String::as_str).collect();
    if !shared.is_empty() && (only_left.is_empty() || only_right.is_empty()) {
        return 100;
    }

    let shared = shared.join(" ");
    let with_left = join_nonempty(&shared, &only_left.join(" "));
    let with_right = join_nonempty(&shared, &only_right.join(" "));

    let best = [
        ratio(&shared, &with_left),
        ratio(&shared, &with_right),
        ratio(&with_left, &with_right),
    ]
    .into_iter()
    .fold(0.0_f64, f64::max);
    best.round().clamp(0.0, 100.0) as u8
}

fn tokens(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_nonempty(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}

/// Indel similarity: `2 * lcs / (len_a + len_b)` scaled to 100.
fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * longest_common_subsequence(&a, &b) as f64 / total as f64
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subset_phrases_score_full_marks() {
        assert_eq!(token_set_ratio("Install vanity", "install the new vanity"), 100);
        assert_eq!(token_set_ratio("Paint, walls", "walls paint"), 100);
    }

    #[test]
    fn disjoint_phrases_score_low() {
        assert!(token_set_ratio("grout tiles", "hang door") < 50);
        assert_eq!(token_set_ratio("", "hang door"), 0);
    }

    #[test]
    fn lcs_counts_in_order_matches() {
        let a: Vec<char> = "abcde".chars().collect();
        let b: Vec<char> = "ace".chars().collect();
        assert_eq!(longest_common_subsequence(&a, &b), 3);
    }

    #[test]
    fn ranks_and_limits_candidates() {
        let tasks = vec![
            Task::new("T0000", "Hang door", Some(1.0)),
            Task::new("T0001", "Install vanity", Some(2.0)),
            Task::new("T0002", "Tile shower walls", Some(3.0)),
        ];
        let matched = match_notes_to_tasks(&["Vanity to be installed level".to_string()], &tasks, 2);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].matches.len(), 2);
        assert_eq!(matched[0].matches[0].task_id, TaskId::new("T0001"));
    }
}
