//! Login and logout flows.

use std::collections::BTreeMap;

use thiserror::Error;

use super::{Session, SessionSnapshot};
use crate::api::{AccountsApi, ApiError, Credentials};
use crate::form::{login_schema, FieldErrors};
use crate::store::StoreError;

/// Shown when the backend rejects the credentials.
pub const REJECTED_MESSAGE: &str = "Invalid username or password.";

/// Login errors.
#[derive(Error, Debug)]
pub enum LoginError {
    #[error("Login form has errors")]
    Invalid(FieldErrors),

    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Api(ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LoginError {
    pub fn user_message(&self) -> String {
        match self {
            LoginError::Invalid(errors) => errors
                .iter()
                .next()
                .map(|(_, message)| message.to_string())
                .unwrap_or_default(),
            LoginError::Rejected(message) => message.clone(),
            LoginError::Api(e) => e.user_message(),
            LoginError::Store(e) => e.to_string(),
        }
    }
}

/// Check credentials before any network call.
pub fn validate_credentials(credentials: &Credentials) -> Result<(), FieldErrors> {
    let values = BTreeMap::from([
        ("username".to_string(), credentials.username.clone()),
        ("password".to_string(), credentials.password.clone()),
    ]);
    login_schema().validate(&values).map(|_| ())
}

/// Validate, call `/login`, and start the session on success.
pub async fn login(
    accounts: &AccountsApi,
    session: &Session,
    credentials: &Credentials,
) -> Result<SessionSnapshot, LoginError> {
    validate_credentials(credentials).map_err(LoginError::Invalid)?;

    let response = match accounts.login(credentials).await {
        Ok(response) => response,
        Err(ApiError::Unauthorized) | Err(ApiError::Api { status: 403, .. }) => {
            return Err(LoginError::Rejected(REJECTED_MESSAGE.to_string()))
        }
        Err(e) => return Err(LoginError::Api(e)),
    };

    let token = match response.token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() && token != "User Not Authenticated" => token.to_string(),
        _ => return Err(LoginError::Rejected(REJECTED_MESSAGE.to_string())),
    };

    let username = response
        .user
        .as_ref()
        .map(|user| user.username.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| credentials.username.trim().to_string());

    session.begin(token, response.effective_role(), username)?;
    Ok(session.snapshot())
}
