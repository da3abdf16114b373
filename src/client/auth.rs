//! Authentication operations
//!
//! Login, registration and logout. Login and registration store the
//! returned token durably; a rejected attempt never touches an existing
//! stored session. Registration input is validated before any network
//! call is made.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::TaskClient;
use crate::error::{ClientError, ClientResult};
use crate::model::UserProfile;
use crate::session::Session;

/// Login credentials
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration form input, as gathered before submission
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub name: String,
    pub username: Option<String>,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accepted_terms: bool,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
    #[serde(default)]
    user: Option<UserProfile>,
}

/// Checks performed before the registration request leaves the client
pub(crate) fn validate_registration(input: &RegisterInput) -> ClientResult<()> {
    if !input.accepted_terms {
        return Err(ClientError::Validation(
            "terms and conditions must be accepted".to_string(),
        ));
    }
    if input.password != input.confirm_password {
        return Err(ClientError::Validation(
            "passwords do not match".to_string(),
        ));
    }
    Ok(())
}

impl TaskClient {
    /// Authenticate against the login endpoint and store the session.
    ///
    /// A rejected credential pair surfaces `InvalidCredentials` and leaves
    /// any previously stored session in place.
    pub async fn login(&mut self, credentials: &Credentials) -> ClientResult<&Session> {
        let url = format!("{}/auth/login", self.base_url);
        tracing::debug!(email = %credentials.email, "logging in");

        let response = self.send(self.http.post(&url).json(credentials)).await?;

        if is_credential_rejection(response.status()) {
            tracing::warn!(email = %credentials.email, "login rejected");
            return Err(ClientError::InvalidCredentials);
        }

        let auth: AuthResponse = Self::read_json(response).await?;
        tracing::info!(email = %credentials.email, "login successful");

        Ok(self.session.replace(Session {
            token: auth.token,
            user: auth.user,
        })?)
    }

    /// Register a new account; same session contract as [`login`].
    ///
    /// Password mismatch and unaccepted terms fail locally, before any
    /// request is dispatched.
    ///
    /// [`login`]: TaskClient::login
    pub async fn register(&mut self, input: &RegisterInput) -> ClientResult<&Session> {
        validate_registration(input)?;

        let url = format!("{}/auth/register", self.base_url);
        let body = RegisterBody {
            name: &input.name,
            username: input.username.as_deref(),
            email: &input.email,
            password: &input.password,
        };
        tracing::debug!(email = %input.email, "registering account");

        let response = self.send(self.http.post(&url).json(&body)).await?;

        if is_credential_rejection(response.status()) {
            tracing::warn!(email = %input.email, "registration rejected");
            return Err(ClientError::InvalidCredentials);
        }

        let auth: AuthResponse = Self::read_json(response).await?;
        tracing::info!(email = %input.email, "registration successful");

        Ok(self.session.replace(Session {
            token: auth.token,
            user: auth.user,
        })?)
    }

    /// Drop the stored session and empty the task list. Idempotent.
    pub fn logout(&mut self) -> ClientResult<()> {
        tracing::info!("logging out");
        self.session.clear()?;
        self.tasks.clear();
        Ok(())
    }
}

/// Auth endpoints answer 401 on bad credentials; older server variants use
/// 400 or 403 for the same condition.
fn is_credential_rejection(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
    )
}

#[cfg(test)]
mod tests {
    use super::super::tests::{authenticated_client, test_client};
    use super::*;

    fn register_input() -> RegisterInput {
        RegisterInput {
            name: "Ada Lovelace".to_string(),
            username: Some("ada".to_string()),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
            confirm_password: "secret".to_string(),
            accepted_terms: true,
        }
    }

    #[test]
    fn test_validation_accepts_well_formed_input() {
        assert!(validate_registration(&register_input()).is_ok());
    }

    #[test]
    fn test_validation_rejects_password_mismatch() {
        let mut input = register_input();
        input.password = "a".to_string();
        input.confirm_password = "b".to_string();

        let err = validate_registration(&input).unwrap_err();
        assert!(
            matches!(err, ClientError::Validation(ref msg) if msg == "passwords do not match")
        );
    }

    #[test]
    fn test_validation_rejects_unaccepted_terms() {
        let mut input = register_input();
        input.accepted_terms = false;

        assert!(matches!(
            validate_registration(&input).unwrap_err(),
            ClientError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_register_fails_locally_on_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = test_client(&dir);

        let mut input = register_input();
        input.confirm_password = "different".to_string();

        // A dispatched request would surface Unavailable from the
        // unroutable test address; Validation proves nothing left the client
        let err = client.register(&input).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(!client.session().is_authenticated());
    }

    #[test]
    fn test_logout_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = authenticated_client(&dir);

        client.logout().unwrap();
        assert!(!client.session().is_authenticated());
        assert!(client.tasks().is_empty());

        client.logout().unwrap();
        assert!(!client.session().is_authenticated());
    }

    #[test]
    fn test_register_body_omits_confirmation_fields() {
        let input = register_input();
        let body = RegisterBody {
            name: &input.name,
            username: input.username.as_deref(),
            email: &input.email,
            password: &input.password,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["email"], "ada@example.com");
        assert!(json.get("confirmPassword").is_none());
        assert!(json.get("acceptedTerms").is_none());
    }
}
