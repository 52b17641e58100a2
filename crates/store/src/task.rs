use extract::Priority;
use serde::{Deserialize, Serialize};

pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub points: String,
    #[serde(default)]
    pub submission_location: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default)]
    pub created_at: String,
}

/// Input for a new task. `id`, `completed` and `created_at` are assigned by
/// the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub points: String,
    #[serde(default)]
    pub submission_location: String,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
}

impl NewTask {
    pub fn new(title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            description: String::new(),
            time: String::new(),
            priority: Priority::Medium,
            points: String::new(),
            submission_location: String::new(),
            notifications_enabled: true,
        }
    }

    pub(crate) fn into_task(self, id: u64, created_at: String) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            date: self.date,
            time: self.time,
            priority: self.priority,
            points: self.points,
            submission_location: self.submission_location,
            completed: false,
            notifications_enabled: self.notifications_enabled,
            created_at,
        }
    }
}

/// Partial update: `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub priority: Option<Priority>,
    pub points: Option<String>,
    pub submission_location: Option<String>,
    pub completed: Option<bool>,
    pub notifications_enabled: Option<bool>,
}

impl Task {
    pub fn apply(&mut self, update: TaskUpdate) {
        let TaskUpdate {
            title,
            description,
            date,
            time,
            priority,
            points,
            submission_location,
            completed,
            notifications_enabled,
        } = update;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(date) = date {
            self.date = date;
        }
        if let Some(time) = time {
            self.time = time;
        }
        if let Some(priority) = priority {
            self.priority = priority;
        }
        if let Some(points) = points {
            self.points = points;
        }
        if let Some(location) = submission_location {
            self.submission_location = location;
        }
        if let Some(completed) = completed {
            self.completed = completed;
        }
        if let Some(enabled) = notifications_enabled {
            self.notifications_enabled = enabled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Task {
        NewTask::new("운영체제 과제", "2024-04-01").into_task(3, "2024-03-01 09:00:00".to_string())
    }

    #[test]
    fn test_new_task_defaults() {
        let task = sample();
        assert_eq!(task.id, 3);
        assert!(!task.completed);
        assert!(task.notifications_enabled);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.time, "");
    }

    #[test]
    fn test_partial_update_keeps_unspecified_fields() {
        let mut task = sample();
        task.apply(TaskUpdate {
            time: Some("18:00".to_string()),
            priority: Some(Priority::High),
            ..Default::default()
        });

        assert_eq!(task.time, "18:00");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.title, "운영체제 과제");
        assert_eq!(task.date, "2024-04-01");
        assert_eq!(task.created_at, "2024-03-01 09:00:00");
    }

    #[test]
    fn test_update_from_json_ignores_missing_keys() {
        let update: TaskUpdate = serde_json::from_str(r#"{"completed": true}"#).unwrap();
        let mut task = sample();
        task.apply(update);
        assert!(task.completed);
        assert_eq!(task.title, "운영체제 과제");
    }

    #[test]
    fn test_legacy_record_without_optional_fields() {
        let json = r#"{"id": 1, "title": "t", "date": "2024-01-01", "completed": false}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.points, "");
        assert_eq!(task.submission_location, "");
        assert!(task.notifications_enabled);
        assert_eq!(task.priority, Priority::Medium);
    }
}
