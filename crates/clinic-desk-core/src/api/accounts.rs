//! Account and login endpoints.

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiRequest, ApiResult, Method};
use crate::models::{Account, AccountPatch, Role};

/// Login form input.
#[derive(Clone, Serialize, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Body returned by `/login`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<Account>,
    /// Some deployments return the role beside the user
    #[serde(default)]
    pub role: Option<String>,
}

impl LoginResponse {
    /// Role from the response, falling back to employee.
    pub fn effective_role(&self) -> Role {
        self.role
            .as_deref()
            .and_then(|r| r.parse().ok())
            .or_else(|| self.user.as_ref().and_then(|u| u.role))
            .unwrap_or(Role::Employee)
    }
}

/// Account calls keyed by username.
#[derive(Clone)]
pub struct AccountsApi {
    client: ApiClient,
}

impl AccountsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        let body = serde_json::to_value(credentials)?;
        self.client.fetch(ApiRequest::post("/login").json(body)).await
    }

    pub async fn read(&self, username: &str) -> ApiResult<Account> {
        self.client
            .fetch(ApiRequest::get(format!("/read/{}", username)))
            .await
    }

    /// Apply a partial update. The payload always names the account.
    pub async fn update(&self, username: &str, patch: &AccountPatch) -> ApiResult<Account> {
        let mut patch = patch.clone();
        if patch.username.is_none() {
            patch.username = Some(username.to_string());
        }
        let body = serde_json::to_value(&patch)?;
        self.client
            .fetch(ApiRequest::new(Method::Put, format!("/update/{}", username)).json(body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ScriptedTransport;
    use crate::session::Session;
    use crate::store::LocalStore;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_effective_role() {
        let nested: LoginResponse = serde_json::from_value(json!({
            "token": "t",
            "user": {"username": "boss", "role": "ROLE_ADMIN"}
        }))
        .unwrap();
        assert_eq!(nested.effective_role(), Role::Admin);

        let bare: LoginResponse = serde_json::from_value(json!({"token": "t"})).unwrap();
        assert_eq!(bare.effective_role(), Role::Employee);
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = Credentials {
            username: "nurse".into(),
            password: "secret99".into(),
        };
        assert!(!format!("{:?}", credentials).contains("secret99"));
    }

    #[tokio::test]
    async fn test_update_always_sends_username() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.on(
            Method::Put,
            "/update/nurse",
            200,
            json!({"id": 2, "username": "nurse", "email": "new@clinic.test"}),
        );
        let session = Session::new(LocalStore::open_in_memory().unwrap());
        let accounts = AccountsApi::new(ApiClient::new(transport.clone(), session));

        let patch = AccountPatch {
            email: Some("new@clinic.test".into()),
            ..Default::default()
        };
        let updated = accounts.update("nurse", &patch).await.unwrap();
        assert_eq!(updated.email.as_deref(), Some("new@clinic.test"));

        let body = transport.calls()[0].body.clone().unwrap();
        assert_eq!(body, json!({"username": "nurse", "email": "new@clinic.test"}));
    }
}
