//! Task collection operations
//!
//! Fetching and mutating the task list. Every mutation applies the record
//! the server returned; the in-memory list never holds an optimistic local
//! guess. All calls carry the bearer token and are subject to the
//! forced-logout rule on 403.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::TaskClient;
use crate::error::{ClientError, ClientResult};
use crate::model::{Priority, Status, Task};

/// Which slice of the collection to fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskFilter {
    #[default]
    All,
    /// Tasks past their due date and not completed; filtered server-side
    Overdue,
}

/// Input for creating a task. The id is assigned by the server.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Full-task update body. Carries the derived `completed` boolean for
/// server variants that predate the status enum.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskBody<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    completed: bool,
    due_date: Option<DateTime<Utc>>,
    priority: Priority,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<&'a str>,
}

impl<'a> From<&'a Task> for TaskBody<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            title: &task.title,
            description: task.description.as_deref(),
            completed: task.completed(),
            due_date: task.due_date,
            priority: task.priority,
            status: task.status,
            image_url: task.image_url.as_deref(),
        }
    }
}

impl TaskClient {
    /// Fetch the task collection, replacing the in-memory list wholesale
    pub async fn list_tasks(&mut self, filter: TaskFilter) -> ClientResult<&[Task]> {
        let url = match filter {
            TaskFilter::All => format!("{}/todos", self.base_url),
            TaskFilter::Overdue => format!("{}/todos/overdue", self.base_url),
        };

        let request = self.http.get(&url).bearer_auth(self.require_token()?);
        let response = self.send(request).await?;
        let response = self.check_authorized(response)?;

        let tasks: Vec<Task> = Self::read_json(response).await?;
        tracing::debug!(count = tasks.len(), ?filter, "task list refreshed");

        self.tasks.replace_all(tasks);
        Ok(self.tasks.as_slice())
    }

    /// Create a task and append the server's record to the list
    pub async fn create_task(&mut self, input: &NewTask) -> ClientResult<&Task> {
        if input.title.trim().is_empty() {
            return Err(ClientError::Validation(
                "task title must not be empty".to_string(),
            ));
        }

        let url = format!("{}/todos", self.base_url);
        let request = self
            .http
            .post(&url)
            .bearer_auth(self.require_token()?)
            .json(input);
        let response = self.send(request).await?;
        let response = self.check_authorized(response)?;

        let created: Task = Self::read_json(response).await?;
        tracing::info!(id = created.id, title = %created.title, "task created");

        Ok(self.tasks.append(created))
    }

    /// Put the full task and replace the matching record by id
    pub async fn update_task(&mut self, task: &Task) -> ClientResult<&Task> {
        let url = format!("{}/todos/{}", self.base_url, task.id);
        let body = TaskBody::from(task);

        let request = self
            .http
            .put(&url)
            .bearer_auth(self.require_token()?)
            .json(&body);
        let response = self.send(request).await?;
        let response = self.check_authorized(response)?;

        let updated: Task = Self::read_json(response).await?;
        tracing::info!(id = updated.id, status = %updated.status, "task updated");

        Ok(self.tasks.upsert(updated))
    }

    /// Move a listed task to IN_PROGRESS via a full-task update
    pub async fn start_task(&mut self, id: u64) -> ClientResult<&Task> {
        let mut task = self
            .tasks
            .get(id)
            .cloned()
            .ok_or_else(|| ClientError::Validation(format!("no task with id {} in the list", id)))?;

        task.status = Status::InProgress;
        self.update_task(&task).await
    }

    /// Mark a task completed through the dedicated endpoint
    pub async fn complete_task(&mut self, id: u64) -> ClientResult<&Task> {
        let url = format!("{}/todos/{}/complete", self.base_url, id);

        let request = self.http.patch(&url).bearer_auth(self.require_token()?);
        let response = self.send(request).await?;
        let response = self.check_authorized(response)?;

        let updated: Task = Self::read_json(response).await?;
        tracing::info!(id = updated.id, "task completed");

        Ok(self.tasks.upsert(updated))
    }

    /// Delete a task; the local record is removed only after the server
    /// confirms
    pub async fn delete_task(&mut self, id: u64) -> ClientResult<()> {
        let url = format!("{}/todos/{}", self.base_url, id);

        let request = self.http.delete(&url).bearer_auth(self.require_token()?);
        let response = self.send(request).await?;
        let response = self.check_authorized(response)?;
        Self::expect_success(response).await?;

        self.tasks.remove(id);
        tracing::info!(id, "task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::authenticated_client;
    use super::*;

    #[tokio::test]
    async fn test_create_rejects_blank_title_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = authenticated_client(&dir);

        let input = NewTask {
            title: "   ".to_string(),
            ..NewTask::default()
        };

        let err = client.create_task(&input).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        // A failed create leaves the session alone
        assert!(client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_start_requires_listed_task() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = authenticated_client(&dir);

        let err = client.start_task(42).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn test_new_task_wire_shape() {
        let input = NewTask {
            title: "Buy milk".to_string(),
            priority: Priority::High,
            ..NewTask::default()
        };

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["priority"], "HIGH");
        assert_eq!(json["status"], "NOT_STARTED");
        assert_eq!(json["dueDate"], serde_json::Value::Null);
        assert!(json.get("imageUrl").is_none());
    }

    #[test]
    fn test_update_body_derives_completed_flag() {
        let task = Task {
            id: 5,
            title: "task 5".to_string(),
            description: Some("desc".to_string()),
            due_date: None,
            priority: Priority::Low,
            status: Status::Completed,
            overdue: false,
            image_url: None,
            created_at: None,
            updated_at: None,
        };

        let json = serde_json::to_value(TaskBody::from(&task)).unwrap();
        assert_eq!(json["completed"], true);
        assert_eq!(json["status"], "COMPLETED");
        assert!(json.get("id").is_none());
    }
}
