//! Core data types for the task client
//!
//! This module defines the records exchanged with the remote API:
//! - `Task`: a single to-do item with priority, status and due date
//! - `UserProfile`: the account owning the session
//! - `Tenant`: an account record as seen by the admin panel
//! - `Priority`, `Status`, `SubscriptionTier`: classification enums
//!
//! All wire representations are camelCase with SCREAMING_SNAKE_CASE enums,
//! matching the remote API. Older server variants report completion as a
//! `completed` boolean instead of a `status` enum; deserialization
//! normalizes both shapes into the canonical `Status`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task priority
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "LOW"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::High => write!(f, "HIGH"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOW" => Ok(Priority::Low),
            "MEDIUM" => Ok(Priority::Medium),
            "HIGH" => Ok(Priority::High),
            other => Err(format!(
                "invalid priority: {}. Use: LOW, MEDIUM, HIGH",
                other
            )),
        }
    }
}

/// Canonical task status.
///
/// The boolean "completed" view used by older servers is derived from this
/// enum, never stored separately.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl Status {
    pub fn is_completed(&self) -> bool {
        matches!(self, Status::Completed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::NotStarted => write!(f, "NOT_STARTED"),
            Status::InProgress => write!(f, "IN_PROGRESS"),
            Status::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NOT_STARTED" => Ok(Status::NotStarted),
            "IN_PROGRESS" => Ok(Status::InProgress),
            "COMPLETED" => Ok(Status::Completed),
            other => Err(format!(
                "invalid status: {}. Use: NOT_STARTED, IN_PROGRESS, COMPLETED",
                other
            )),
        }
    }
}

/// A single task record.
///
/// The id is assigned by the remote API; the client never invents one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", from = "TaskWire")]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub status: Status,
    pub overdue: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Derived boolean completion view
    pub fn completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Whether the task is past its due date and not yet completed
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => due < now && !self.completed(),
            None => false,
        }
    }
}

/// Wire shape for `Task` deserialization.
///
/// Accepts both the canonical `status` enum and the legacy `completed`
/// boolean; when only the boolean is present the status is derived from it.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskWire {
    id: u64,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    status: Option<Status>,
    #[serde(default)]
    overdue: bool,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl From<TaskWire> for Task {
    fn from(wire: TaskWire) -> Self {
        let status = match (wire.status, wire.completed) {
            (Some(status), _) => status,
            (None, Some(true)) => Status::Completed,
            (None, _) => Status::NotStarted,
        };

        Task {
            id: wire.id,
            title: wire.title,
            description: wire.description,
            due_date: wire.due_date,
            priority: wire.priority,
            status,
            overdue: wire.overdue,
            image_url: wire.image_url,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }
}

/// Profile of the account owning the session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Subscription tier of a tenant account
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Basic,
    Premium,
    Enterprise,
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionTier::Free => write!(f, "FREE"),
            SubscriptionTier::Basic => write!(f, "BASIC"),
            SubscriptionTier::Premium => write!(f, "PREMIUM"),
            SubscriptionTier::Enterprise => write!(f, "ENTERPRISE"),
        }
    }
}

impl FromStr for SubscriptionTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "FREE" => Ok(SubscriptionTier::Free),
            "BASIC" => Ok(SubscriptionTier::Basic),
            "PREMIUM" => Ok(SubscriptionTier::Premium),
            "ENTERPRISE" => Ok(SubscriptionTier::Enterprise),
            other => Err(format!(
                "invalid tier: {}. Use: FREE, BASIC, PREMIUM, ENTERPRISE",
                other
            )),
        }
    }
}

/// A tenant account as listed by the admin endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub subscription_tier: SubscriptionTier,
    #[serde(default)]
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn task(id: u64, status: Status) -> Task {
        Task {
            id,
            title: format!("task {}", id),
            description: None,
            due_date: None,
            priority: Priority::Medium,
            status,
            overdue: false,
            image_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&Status::NotStarted).unwrap(),
            "\"NOT_STARTED\""
        );
        assert_eq!(
            serde_json::from_str::<Status>("\"IN_PROGRESS\"").unwrap(),
            Status::InProgress
        );
    }

    #[test]
    fn test_task_deserializes_canonical_status() {
        let json = r#"{
            "id": 5,
            "title": "Buy milk",
            "priority": "HIGH",
            "status": "IN_PROGRESS"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, 5);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status, Status::InProgress);
        assert!(!task.completed());
    }

    #[test]
    fn test_task_deserializes_legacy_completed_flag() {
        let json = r#"{"id": 1, "title": "old shape", "completed": true}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, Status::Completed);
        assert!(task.completed());

        let json = r#"{"id": 2, "title": "old shape", "completed": false}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, Status::NotStarted);
    }

    #[test]
    fn test_explicit_status_wins_over_completed_flag() {
        let json = r#"{"id": 3, "title": "both", "completed": false, "status": "COMPLETED"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, Status::Completed);
    }

    #[test]
    fn test_overdue_predicate() {
        let now = Utc::now();

        let mut past_due = task(1, Status::InProgress);
        past_due.due_date = Some(now - Duration::hours(1));
        assert!(past_due.is_overdue(now));

        let mut future_due = task(2, Status::InProgress);
        future_due.due_date = Some(now + Duration::hours(1));
        assert!(!future_due.is_overdue(now));

        let mut done = task(3, Status::Completed);
        done.due_date = Some(now - Duration::hours(1));
        assert!(!done.is_overdue(now));

        let no_due = task(4, Status::InProgress);
        assert!(!no_due.is_overdue(now));
    }

    #[test]
    fn test_parse_enums_from_cli_input() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("completed".parse::<Status>().unwrap(), Status::Completed);
        assert_eq!(
            "premium".parse::<SubscriptionTier>().unwrap(),
            SubscriptionTier::Premium
        );
        assert!("urgent".parse::<Priority>().is_err());
    }
}
