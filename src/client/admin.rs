//! Tenant administration operations
//!
//! Admin-only endpoints for listing, creating and managing tenant
//! accounts and their subscription tiers. The admin-status probe is the
//! one authenticated call exempt from the forced-logout rule: a denial
//! simply means "not an admin".

use serde::Serialize;

use super::TaskClient;
use crate::error::ClientResult;
use crate::model::{SubscriptionTier, Tenant};

/// Input for provisioning a tenant account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenant {
    pub email: String,
    pub password: String,
    pub name: String,
    pub subscription_tier: SubscriptionTier,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionBody {
    subscription_tier: SubscriptionTier,
}

impl TaskClient {
    /// Probe whether the current session has admin rights.
    ///
    /// Any failure, including an authorization denial, yields `false`
    /// without touching the session: a regular user probing the admin
    /// endpoint must not be logged out for it.
    pub async fn check_admin_status(&self) -> bool {
        let token = match self.session.token() {
            Some(token) => token,
            None => return false,
        };

        let url = format!("{}/admin/tenants", self.base_url);
        let request = self.http.get(&url).bearer_auth(token);
        match self.send(request).await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// List all tenant accounts
    pub async fn list_tenants(&mut self) -> ClientResult<Vec<Tenant>> {
        let url = format!("{}/admin/tenants", self.base_url);

        let request = self.http.get(&url).bearer_auth(self.require_token()?);
        let response = self.send(request).await?;
        let response = self.check_authorized(response)?;

        Self::read_json(response).await
    }

    /// Provision a tenant account with an initial subscription tier
    pub async fn create_tenant(&mut self, input: &CreateTenant) -> ClientResult<Tenant> {
        let url = format!("{}/admin/tenants", self.base_url);

        let request = self
            .http
            .post(&url)
            .bearer_auth(self.require_token()?)
            .json(input);
        let response = self.send(request).await?;
        let response = self.check_authorized(response)?;

        let tenant: Tenant = Self::read_json(response).await?;
        tracing::info!(id = tenant.id, email = %tenant.email, "tenant created");
        Ok(tenant)
    }

    /// Change a tenant's subscription tier
    pub async fn update_subscription(
        &mut self,
        id: u64,
        tier: SubscriptionTier,
    ) -> ClientResult<Tenant> {
        let url = format!("{}/admin/tenants/{}/subscription", self.base_url, id);
        let body = SubscriptionBody {
            subscription_tier: tier,
        };

        let request = self
            .http
            .put(&url)
            .bearer_auth(self.require_token()?)
            .json(&body);
        let response = self.send(request).await?;
        let response = self.check_authorized(response)?;

        let tenant: Tenant = Self::read_json(response).await?;
        tracing::info!(id = tenant.id, tier = %tenant.subscription_tier, "subscription updated");
        Ok(tenant)
    }

    /// Delete a tenant account
    pub async fn delete_tenant(&mut self, id: u64) -> ClientResult<()> {
        let url = format!("{}/admin/tenants/{}", self.base_url, id);

        let request = self.http.delete(&url).bearer_auth(self.require_token()?);
        let response = self.send(request).await?;
        let response = self.check_authorized(response)?;
        Self::expect_success(response).await?;

        tracing::info!(id, "tenant deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::test_client;
    use super::*;

    #[test]
    fn test_create_tenant_wire_shape() {
        let input = CreateTenant {
            email: "tenant@example.com".to_string(),
            password: "secret".to_string(),
            name: "Acme".to_string(),
            subscription_tier: SubscriptionTier::Premium,
        };

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["email"], "tenant@example.com");
        assert_eq!(json["subscriptionTier"], "PREMIUM");
    }

    #[test]
    fn test_subscription_body_wire_shape() {
        let body = SubscriptionBody {
            subscription_tier: SubscriptionTier::Free,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["subscriptionTier"], "FREE");
    }

    #[tokio::test]
    async fn test_admin_probe_without_session_is_false() {
        let dir = tempfile::tempdir().unwrap();
        let client = test_client(&dir);

        assert!(!client.check_admin_status().await);
    }

    #[tokio::test]
    async fn test_admin_probe_swallows_connection_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = test_client(&dir);
        client
            .session
            .replace(crate::session::Session {
                token: "t".to_string(),
                user: None,
            })
            .unwrap();

        // The test address is unroutable; the probe must answer false
        // rather than surface the error, and must keep the session
        assert!(!client.check_admin_status().await);
        assert!(client.session().is_authenticated());
    }
}
