//! Rule definitions

use serde::{Deserialize, Serialize};

/// Kind of rule a task checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    /// Alert when time on a slice exceeds the threshold
    Limit,
    /// Alert while time on a slice is below the threshold
    Goal,
    /// Always report the day's productivity against a goal
    Productivity,
    /// Any task type this version does not know about
    #[serde(other)]
    Unknown,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Limit => "limit",
            TaskType::Goal => "goal",
            TaskType::Productivity => "productivity",
            TaskType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_type: TaskType,
    /// Category label the rule applies to (limit and goal only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slice_name: Option<String>,
    /// Threshold in minutes. Any JSON number is accepted; fractions round down.
    #[serde(with = "minutes_serde")]
    pub minutes: i64,
}

impl Task {
    pub fn limit(slice_name: impl Into<String>, minutes: i64) -> Self {
        Self {
            task_type: TaskType::Limit,
            slice_name: Some(slice_name.into()),
            minutes,
        }
    }

    pub fn goal(slice_name: impl Into<String>, minutes: i64) -> Self {
        Self {
            task_type: TaskType::Goal,
            slice_name: Some(slice_name.into()),
            minutes,
        }
    }

    pub fn productivity(minutes: i64) -> Self {
        Self {
            task_type: TaskType::Productivity,
            slice_name: None,
            minutes,
        }
    }

    /// Short label for logs
    pub fn label(&self) -> String {
        match &self.slice_name {
            Some(slice) => format!("{} {} ({} min)", self.task_type, slice, self.minutes),
            None => format!("{} ({} min)", self.task_type, self.minutes),
        }
    }
}

/// A message to show the user. Created and consumed within one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub message: String,
}

impl NotificationEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Minutes serialization helper
mod minutes_serde {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(minutes: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(*minutes)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let minutes = f64::deserialize(deserializer)?;
        if !minutes.is_finite() {
            return Err(D::Error::custom("minutes must be a finite number"));
        }
        Ok(minutes.floor() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_list_parse() {
        let tasks: Vec<Task> = serde_json::from_str(
            r#"[
                {"task_type": "limit", "slice_name": "Entertainment", "minutes": 30},
                {"task_type": "goal", "slice_name": "Software Development", "minutes": 180},
                {"task_type": "productivity", "minutes": 300},
                {"task_type": "streak", "minutes": 5}
            ]"#,
        )
        .unwrap();

        assert_eq!(tasks[0], Task::limit("Entertainment", 30));
        assert_eq!(tasks[1], Task::goal("Software Development", 180));
        assert_eq!(tasks[2], Task::productivity(300));
        assert_eq!(tasks[3].task_type, TaskType::Unknown);
    }

    #[test]
    fn test_fractional_minutes() {
        let tasks: Vec<Task> = serde_json::from_str(
            r#"[
                {"task_type": "limit", "slice_name": "News", "minutes": 30.0},
                {"task_type": "goal", "slice_name": "Reading", "minutes": 45.5}
            ]"#,
        )
        .unwrap();
        assert_eq!(tasks[0], Task::limit("News", 30));
        assert_eq!(tasks[1], Task::goal("Reading", 45));

        assert!(serde_json::from_str::<Task>(
            r#"{"task_type": "limit", "slice_name": "News", "minutes": "30"}"#
        )
        .is_err());
    }

    #[test]
    fn test_task_label() {
        assert_eq!(Task::limit("News", 20).label(), "limit News (20 min)");
        assert_eq!(Task::productivity(300).label(), "productivity (300 min)");
    }
}
