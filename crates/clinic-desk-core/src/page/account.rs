//! Account details and security screens.

use std::collections::BTreeMap;

use super::{Banner, PageError, PageResult};
use crate::api::AccountsApi;
use crate::form::{account_details_schema, password_schema, FieldErrors, FormError};
use crate::models::{Account, AccountPatch};
use crate::nav::Route;
use crate::session::Session;

pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match.";

/// The `/account/*` screens for the signed-in user.
pub struct AccountPage {
    accounts: AccountsApi,
    session: Session,
    account: Option<Account>,
    banner: Option<Banner>,
}

impl AccountPage {
    pub fn new(accounts: AccountsApi, session: Session) -> Self {
        Self {
            accounts,
            session,
            account: None,
            banner: None,
        }
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn banner(&mut self) -> Option<&Banner> {
        if self.banner.as_ref().is_some_and(Banner::is_expired) {
            self.banner = None;
        }
        self.banner.as_ref()
    }

    fn username(&self) -> PageResult<String> {
        self.session
            .username()
            .ok_or_else(|| PageError::Invalid("You are not logged in.".into()))
    }

    fn fail<T>(&mut self, error: PageError) -> PageResult<T> {
        self.banner = Some(Banner::error(error.user_message()));
        Err(error)
    }

    pub async fn mount(&mut self) -> PageResult<()> {
        let username = self.username()?;
        match self.accounts.read(&username).await {
            Ok(account) => {
                self.account = Some(account);
                Ok(())
            }
            Err(e) => self.fail(e.into()),
        }
    }

    /// Change the account email.
    pub async fn update_email(&mut self, email: &str) -> PageResult<()> {
        let values = BTreeMap::from([("email".to_string(), email.to_string())]);
        account_details_schema()
            .validate(&values)
            .map_err(FormError::Invalid)?;

        let patch = AccountPatch {
            email: Some(email.trim().to_string()),
            ..AccountPatch::default()
        };
        self.save(patch, "Account details updated successfully.").await
    }

    /// Change the password after checking the confirmation.
    pub async fn change_password(&mut self, new_password: &str, confirm: &str) -> PageResult<()> {
        let values = BTreeMap::from([
            ("newPassword".to_string(), new_password.to_string()),
            ("confirmPassword".to_string(), confirm.to_string()),
        ]);
        let mut errors = match password_schema().validate(&values) {
            Ok(_) => FieldErrors::new(),
            Err(errors) => errors,
        };
        if new_password != confirm {
            errors.insert("confirmPassword", PASSWORD_MISMATCH_MESSAGE.to_string());
        }
        if !errors.is_empty() {
            return Err(FormError::Invalid(errors).into());
        }

        let patch = AccountPatch {
            password: Some(new_password.to_string()),
            ..AccountPatch::default()
        };
        self.save(patch, "Password changed successfully.").await
    }

    async fn save(&mut self, patch: AccountPatch, message: &str) -> PageResult<()> {
        let username = self.username()?;
        match self.accounts.update(&username, &patch).await {
            Ok(account) => {
                self.account = Some(account);
                self.banner = Some(Banner::success(message));
                Ok(())
            }
            Err(e) => self.fail(e.into()),
        }
    }

    /// Sign out. Returns the route to show next.
    pub fn logout(&mut self) -> PageResult<Route> {
        self.account = None;
        Ok(self.session.end()?)
    }
}
