use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("Unknown priority: {}", other)),
        }
    }
}

/// Fields pulled out of a free-form assignment notice.
///
/// Every string field is either empty (nothing matched) or a fully
/// normalized value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAssignment {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub priority: Priority,
    pub points: String,
    pub submission_location: String,
}

impl ParsedAssignment {
    /// Number of extracted fields that matched something.
    /// `description` and `priority` are always present and not counted.
    pub fn matched_fields(&self) -> usize {
        [
            &self.title,
            &self.date,
            &self.time,
            &self.points,
            &self.submission_location,
        ]
        .iter()
        .filter(|f| !f.is_empty())
        .count()
    }

    /// Fill the fields a task cannot be created without.
    pub fn with_defaults(mut self, title_placeholder: &str, today: NaiveDate) -> Self {
        if self.title.is_empty() {
            self.title = title_placeholder.to_string();
        }
        if self.date.is_empty() {
            self.date = today.format("%Y-%m-%d").to_string();
        }
        self
    }
}
