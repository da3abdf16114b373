//! Session & Task Client
//!
//! Bridge between callers and the remote task-management REST API. Owns
//! the durable session (bearer token plus user profile) and the in-memory
//! task list, and keeps both consistent with the last confirmed server
//! response.
//!
//! Failure policy: any authenticated call answered with 403 clears the
//! session and empties the task list before the error is returned. This is
//! a blanket rule across task, profile and admin calls. Connectivity
//! failures and unexpected statuses leave all state untouched.

mod admin;
mod auth;
mod profile;
mod tasks;

pub use admin::CreateTenant;
pub use auth::{Credentials, RegisterInput};
pub use profile::{PasswordChange, ProfileUpdate};
pub use tasks::{NewTask, TaskFilter};

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::session::SessionStore;
use crate::store::TaskList;

/// Client for the task-management API
pub struct TaskClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
    tasks: TaskList,
}

impl TaskClient {
    /// Create a client against the given base URL with an opened session store
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: SessionStore,
    ) -> ClientResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http,
            base_url,
            session,
            tasks: TaskList::new(),
        })
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &Config) -> ClientResult<Self> {
        let session = SessionStore::open(&config.session.file)?;
        Self::new(
            config.api.base_url.clone(),
            Duration::from_millis(config.api.request_timeout_ms),
            session,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    /// Token for an authenticated call, or `NotAuthenticated` without one
    pub(crate) fn require_token(&self) -> ClientResult<&str> {
        self.session.token().ok_or(ClientError::NotAuthenticated)
    }

    /// Dispatch a request, classifying transport failures
    pub(crate) async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> ClientResult<reqwest::Response> {
        let request_id = Uuid::new_v4();
        tracing::debug!(request_id = %request_id, "dispatching request");

        let response = request.send().await.map_err(ClientError::from_transport)?;

        tracing::debug!(
            request_id = %request_id,
            status = %response.status(),
            "response received"
        );
        Ok(response)
    }

    /// Enforce the forced-logout rule on an authenticated response.
    ///
    /// A 403 means the server no longer accepts the stored token; the
    /// session and task list are cleared before `Forbidden` is returned.
    pub(crate) fn check_authorized(
        &mut self,
        response: reqwest::Response,
    ) -> ClientResult<reqwest::Response> {
        if response.status() == StatusCode::FORBIDDEN {
            tracing::warn!("authorization denied, clearing session");
            self.clear_authenticated_state();
            return Err(ClientError::Forbidden);
        }
        Ok(response)
    }

    /// Drop the stored session and the in-memory task list.
    ///
    /// Failure to remove the session file is logged but does not mask the
    /// authorization error being propagated.
    pub(crate) fn clear_authenticated_state(&mut self) {
        if let Err(e) = self.session.clear() {
            tracing::warn!(error = %e, "failed to remove stored session");
        }
        self.tasks.clear();
    }

    /// Parse a successful JSON body, or map the failure status
    pub(crate) async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<T> {
        if response.status().is_success() {
            response.json().await.map_err(ClientError::Transport)
        } else {
            Err(Self::api_error(response).await)
        }
    }

    /// Accept any success status, discarding the body
    pub(crate) async fn expect_success(response: reqwest::Response) -> ClientResult<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::api_error(response).await)
        }
    }

    pub(crate) async fn api_error(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let message = response.text().await.unwrap_or_default();
        ClientError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Status, Task};
    use crate::session::Session;

    pub(super) fn test_client(dir: &tempfile::TempDir) -> TaskClient {
        let store = SessionStore::open(dir.path().join("session.json")).unwrap();
        // Port 9 is unroutable locally; any accidental network call fails fast
        TaskClient::new("http://127.0.0.1:9", Duration::from_millis(200), store).unwrap()
    }

    pub(super) fn authenticated_client(dir: &tempfile::TempDir) -> TaskClient {
        let mut client = test_client(dir);
        client
            .session
            .replace(Session {
                token: "test-token".to_string(),
                user: None,
            })
            .unwrap();
        client
    }

    fn task(id: u64) -> Task {
        Task {
            id,
            title: format!("task {}", id),
            description: None,
            due_date: None,
            priority: Priority::Medium,
            status: Status::NotStarted,
            overdue: false,
            image_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn response_with_status(status: u16) -> reqwest::Response {
        http::Response::builder()
            .status(status)
            .body("")
            .unwrap()
            .into()
    }

    #[test]
    fn test_base_url_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("session.json")).unwrap();
        let client =
            TaskClient::new("http://localhost:8080/", Duration::from_secs(1), store).unwrap();

        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_authorization_denial_clears_session_and_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = authenticated_client(&dir);
        client.tasks.replace_all(vec![task(1), task(2)]);
        assert!(client.session().is_authenticated());

        client.clear_authenticated_state();

        assert!(!client.session().is_authenticated());
        assert!(client.tasks().is_empty());
        assert!(!dir.path().join("session.json").exists());
    }

    #[test]
    fn test_forbidden_response_forces_logout() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = authenticated_client(&dir);
        client.tasks.replace_all(vec![task(1), task(2)]);

        let err = client
            .check_authorized(response_with_status(403))
            .unwrap_err();

        assert!(matches!(err, ClientError::Forbidden));
        assert!(!client.session().is_authenticated());
        assert!(client.tasks().is_empty());
        assert!(!dir.path().join("session.json").exists());
    }

    #[test]
    fn test_non_forbidden_response_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = authenticated_client(&dir);
        client.tasks.replace_all(vec![task(1)]);

        let response = client
            .check_authorized(response_with_status(404))
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(client.session().is_authenticated());
        assert_eq!(client.tasks().len(), 1);
    }

    #[tokio::test]
    async fn test_authenticated_call_without_session_fails_locally() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = test_client(&dir);

        // Were a request dispatched, the unroutable address would surface
        // Unavailable instead
        let err = client.list_tasks(TaskFilter::All).await.unwrap_err();
        assert!(matches!(err, ClientError::NotAuthenticated));
    }
}
