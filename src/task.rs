use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Crew label used when a resource-bearing task lacks the identifier the
/// active leveling mode keys on.
pub const UNSPECIFIED_CREW: &str = "unspecified";

/// Stable task identifier assigned at ingestion.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsection: Option<String>,
    pub name: String,
    #[serde(default)]
    pub planned_day: i64,
    /// Working hours; `None` when the source sheet leaves the cell blank.
    pub duration_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crew_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crew_category: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeSet<TaskId>,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, name: impl Into<String>, duration_hours: Option<f64>) -> Self {
        Self {
            id: id.into(),
            section: None,
            subsection: None,
            name: name.into(),
            planned_day: 0,
            duration_hours,
            crew_code: None,
            crew_category: None,
            dependencies: BTreeSet::new(),
        }
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_subsection(mut self, subsection: impl Into<String>) -> Self {
        self.subsection = Some(subsection.into());
        self
    }

    pub fn with_planned_day(mut self, day: i64) -> Self {
        self.planned_day = day;
        self
    }

    pub fn with_crew_code(mut self, code: impl Into<String>) -> Self {
        self.crew_code = Some(code.into());
        self
    }

    pub fn with_crew_category(mut self, category: impl Into<String>) -> Self {
        self.crew_category = Some(category.into());
        self
    }

    pub fn with_dependencies<I, T>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        self.dependencies.extend(deps.into_iter().map(Into::into));
        self
    }

    /// Duration used by the CPM and leveling passes; unknown counts as zero.
    pub fn effective_duration(&self) -> f64 {
        self.duration_hours.unwrap_or(0.0)
    }

    pub fn has_known_duration(&self) -> bool {
        self.duration_hours.is_some()
    }

    pub fn is_milestone(&self) -> bool {
        self.effective_duration() <= 0.0
    }

    /// Tasks without any crew identifier are never resource-constrained.
    pub fn is_resource_bearing(&self) -> bool {
        self.crew_code.is_some() || self.crew_category.is_some()
    }

    pub fn depends_on(&self, id: &TaskId) -> bool {
        self.dependencies.contains(id)
    }
}
