//! In-process stand-in for the hosted backend.
//!
//! Mirrors the provider's observable behavior (messages included) closely
//! enough for local development and for exercising the registration flow in
//! tests. Failures can be scripted per call.

use crate::error::BackendError;
use crate::{AccountService, ProfileRepository};
use async_trait::async_trait;
use fxhash::FxHashMap;
use handy_domain::account::{AccountId, CreatedAccount, NewProfile, Profile, Session};
use nanoid::nanoid;
use parking_lot::Mutex;
use std::borrow::Cow;
use std::time::Duration;
use tracing::debug;

const MIN_PASSWORD_LEN: usize = 6;

/// How often each backend operation has been invoked.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub create_account: usize,
    pub sign_in: usize,
    pub current_account: usize,
    pub create_profile: usize,
    pub read_profile: usize,
}

#[derive(Debug)]
struct StoredAccount {
    id: AccountId,
    password: String,
}

#[derive(Debug, Default)]
struct State {
    accounts: FxHashMap<String, StoredAccount>,
    tokens: FxHashMap<String, AccountId>,
    profiles: FxHashMap<AccountId, Profile>,
    calls: CallCounts,
    signup_failure: Option<String>,
    withhold_account_id: bool,
    profile_failure: Option<String>,
    owner_only_profiles: bool,
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
    latency: Option<Duration>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `latency` before touching state.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// The next `create_account` call fails with `message`.
    pub fn fail_next_signup(&self, message: impl Into<String>) {
        self.state.lock().signup_failure = Some(message.into());
    }

    /// While set, signups succeed but report no account id.
    pub fn withhold_account_id(&self, withhold: bool) {
        self.state.lock().withhold_account_id = withhold;
    }

    /// While set, every `create_profile` call fails with `message`.
    pub fn fail_profile_writes(&self, message: Option<String>) {
        self.state.lock().profile_failure = message;
    }

    /// While set, a profile can only be inserted with a token of the account
    /// it belongs to, like an `auth.uid() = id` row policy.
    pub fn owner_only_profiles(&self, enforce: bool) {
        self.state.lock().owner_only_profiles = enforce;
    }

    #[must_use]
    pub fn calls(&self) -> CallCounts {
        self.state.lock().calls
    }

    #[must_use]
    pub fn account_count(&self) -> usize {
        self.state.lock().accounts.len()
    }

    #[must_use]
    pub fn account_id(&self, email: &str) -> Option<AccountId> {
        self.state.lock().accounts.get(&normalize_email(email)).map(|a| a.id.clone())
    }

    #[must_use]
    pub fn profile(&self, id: &AccountId) -> Option<Profile> {
        self.state.lock().profiles.get(id).cloned()
    }

    #[must_use]
    pub fn profile_count(&self) -> usize {
        self.state.lock().profiles.len()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl AccountService for MemoryBackend {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CreatedAccount, BackendError> {
        self.simulate_latency().await;
        let mut state = self.state.lock();
        state.calls.create_account += 1;

        if let Some(message) = state.signup_failure.take() {
            return Err(rejected(message));
        }

        let email = normalize_email(email);
        if !email.contains('@') {
            return Err(rejected("Unable to validate email address: invalid format"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(rejected("Password should be at least 6 characters."));
        }
        if state.accounts.contains_key(&email) {
            return Err(rejected("User already registered"));
        }

        if state.withhold_account_id {
            debug!("Signup accepted without account id");
            return Ok(CreatedAccount::default());
        }

        let id = AccountId::new(nanoid!()).ok_or("Generated account id was blank")?;
        state
            .accounts
            .insert(email, StoredAccount { id: id.clone(), password: password.to_owned() });

        // No email confirmation here, so signup opens a session straight away.
        let access_token = nanoid!(32);
        state.tokens.insert(access_token.clone(), id.clone());
        debug!(%id, "Account created");

        Ok(CreatedAccount { account_id: Some(id), access_token: Some(access_token) })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        self.simulate_latency().await;
        let mut state = self.state.lock();
        state.calls.sign_in += 1;

        let account_id = match state.accounts.get(&normalize_email(email)) {
            Some(account) if account.password == password => account.id.clone(),
            _ => return Err(rejected("Invalid login credentials")),
        };

        let access_token = nanoid!(32);
        state.tokens.insert(access_token.clone(), account_id.clone());
        Ok(Session { account_id, access_token })
    }

    async fn current_account(
        &self,
        access_token: &str,
    ) -> Result<Option<AccountId>, BackendError> {
        self.simulate_latency().await;
        let mut state = self.state.lock();
        state.calls.current_account += 1;
        Ok(state.tokens.get(access_token).cloned())
    }
}

#[async_trait]
impl ProfileRepository for MemoryBackend {
    async fn create_profile(
        &self,
        profile: &NewProfile,
        access_token: Option<&str>,
    ) -> Result<(), BackendError> {
        self.simulate_latency().await;
        let mut state = self.state.lock();
        state.calls.create_profile += 1;

        if let Some(message) = state.profile_failure.clone() {
            return Err(rejected(message));
        }
        let owner = access_token.and_then(|token| state.tokens.get(token));
        if state.owner_only_profiles && owner != Some(&profile.id) {
            return Err(rejected(
                r#"new row violates row-level security policy for table "profiles""#,
            ));
        }
        if state.profiles.contains_key(&profile.id) {
            return Err(rejected(r#"duplicate key value violates unique constraint "profiles_pkey""#));
        }

        state.profiles.insert(profile.id.clone(), Profile::from(profile.clone()));
        Ok(())
    }

    async fn read_profile(
        &self,
        id: &AccountId,
        _access_token: Option<&str>,
    ) -> Result<Option<Profile>, BackendError> {
        self.simulate_latency().await;
        let mut state = self.state.lock();
        state.calls.read_profile += 1;
        Ok(state.profiles.get(id).cloned())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn rejected(message: impl Into<Cow<'static, str>>) -> BackendError {
    BackendError::Rejected { message: message.into(), context: None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_lookup_ignores_case_and_padding() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[test]
    fn rejection_keeps_provider_text() {
        let err = rejected("User already registered");
        assert_eq!(err.user_message(), "User already registered");
    }
}
