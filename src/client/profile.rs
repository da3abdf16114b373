//! Account profile operations
//!
//! Fetching and editing the profile of the account owning the session,
//! plus password changes. Profile responses refresh the copy held in the
//! durable session.

use serde::Serialize;

use super::TaskClient;
use crate::error::{ClientError, ClientResult};
use crate::model::UserProfile;

/// Editable profile fields
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// Password change form input
#[derive(Debug, Clone)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordBody<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

/// Checked before the password change request leaves the client
pub(crate) fn validate_password_change(change: &PasswordChange) -> ClientResult<()> {
    if change.new_password != change.confirm_password {
        return Err(ClientError::Validation(
            "new passwords do not match".to_string(),
        ));
    }
    Ok(())
}

impl TaskClient {
    /// Fetch the current profile and refresh the stored session copy
    pub async fn fetch_profile(&mut self) -> ClientResult<UserProfile> {
        let url = format!("{}/users/profile", self.base_url);

        let request = self.http.get(&url).bearer_auth(self.require_token()?);
        let response = self.send(request).await?;
        let response = self.check_authorized(response)?;

        let profile: UserProfile = Self::read_json(response).await?;
        self.session.update_user(profile.clone())?;
        Ok(profile)
    }

    /// Submit profile edits; the server's returned profile becomes the
    /// stored one
    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> ClientResult<UserProfile> {
        let url = format!("{}/users/profile", self.base_url);

        let request = self
            .http
            .put(&url)
            .bearer_auth(self.require_token()?)
            .json(update);
        let response = self.send(request).await?;
        let response = self.check_authorized(response)?;

        let profile: UserProfile = Self::read_json(response).await?;
        tracing::info!(email = %profile.email, "profile updated");

        self.session.update_user(profile.clone())?;
        Ok(profile)
    }

    /// Change the account password.
    ///
    /// Mismatched confirmation fails locally; a wrong current password is
    /// reported by the server as an API error.
    pub async fn change_password(&mut self, change: &PasswordChange) -> ClientResult<()> {
        validate_password_change(change)?;

        let url = format!("{}/users/password", self.base_url);
        let body = PasswordBody {
            current_password: &change.current_password,
            new_password: &change.new_password,
        };

        let request = self
            .http
            .put(&url)
            .bearer_auth(self.require_token()?)
            .json(&body);
        let response = self.send(request).await?;
        let response = self.check_authorized(response)?;
        Self::expect_success(response).await?;

        tracing::info!("password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::authenticated_client;
    use super::*;

    #[test]
    fn test_password_change_mismatch_is_validation_error() {
        let change = PasswordChange {
            current_password: "old".to_string(),
            new_password: "a".to_string(),
            confirm_password: "b".to_string(),
        };

        let err = validate_password_change(&change).unwrap_err();
        assert!(
            matches!(err, ClientError::Validation(ref msg) if msg == "new passwords do not match")
        );
    }

    #[tokio::test]
    async fn test_change_password_fails_locally_on_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = authenticated_client(&dir);

        let change = PasswordChange {
            current_password: "old".to_string(),
            new_password: "new".to_string(),
            confirm_password: "other".to_string(),
        };

        let err = client.change_password(&change).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(client.session().is_authenticated());
    }

    #[test]
    fn test_password_body_omits_confirmation() {
        let body = PasswordBody {
            current_password: "old",
            new_password: "new",
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["currentPassword"], "old");
        assert_eq!(json["newPassword"], "new");
        assert!(json.get("confirmPassword").is_none());
    }
}
