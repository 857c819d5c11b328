//! HTTP client for a Supabase-compatible project (GoTrue auth + PostgREST).

use crate::error::{BackendError, BackendErrorExt};
use crate::{AccountService, ProfileRepository};
use async_trait::async_trait;
use handy_domain::account::{AccountId, CreatedAccount, NewProfile, Profile, Session};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Hosted backend reached over HTTPS.
#[derive(Debug)]
pub struct HostedBackend {
    client: Client,
    base_url: String,
    anon_key: String,
    profiles_table: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    user: Option<UserObject>,
}

#[derive(Debug, Deserialize)]
struct UserObject {
    id: Option<String>,
}

impl HostedBackend {
    /// # Errors
    /// Returns [`BackendError::Transport`] if the TLS client cannot be initialized.
    pub fn new(
        base_url: &str,
        anon_key: impl Into<String>,
        profiles_table: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("handyman/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Building HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            anon_key: anon_key.into(),
            profiles_table: profiles_table.into(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(&self, request: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token.unwrap_or(&self.anon_key))
    }

    fn profiles_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.profiles_table)
    }
}

#[async_trait]
impl AccountService for HostedBackend {
    #[instrument(skip(self, password), fields(backend = "hosted"))]
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CreatedAccount, BackendError> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let request = self.client.post(url).json(&json!({ "email": email, "password": password }));

        let body = read_json(self.authorized(request, None).send().await).await?;
        let account_id = signup_account_id(&body);
        if account_id.is_none() {
            warn!("Signup accepted without a usable account id");
        }
        let access_token = signup_access_token(&body);
        debug!(signed_in = access_token.is_some(), "Signup accepted");

        Ok(CreatedAccount { account_id, access_token })
    }

    #[instrument(skip(self, password), fields(backend = "hosted"))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let url = format!("{}/auth/v1/token", self.base_url);
        let request = self
            .client
            .post(url)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));

        let body = read_json(self.authorized(request, None).send().await).await?;
        let token: TokenResponse = serde_json::from_value(body).context("Decoding session")?;

        let access_token = token.access_token.filter(|t| !t.is_empty());
        let account_id = token.user.and_then(|u| u.id).and_then(AccountId::new);
        match (access_token, account_id) {
            (Some(access_token), Some(account_id)) => Ok(Session { account_id, access_token }),
            _ => Err(BackendError::Rejected {
                message: "Sign-in response did not include a session".into(),
                context: None,
            }),
        }
    }

    #[instrument(skip_all, fields(backend = "hosted"))]
    async fn current_account(
        &self,
        access_token: &str,
    ) -> Result<Option<AccountId>, BackendError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let response = self
            .authorized(self.client.get(url), Some(access_token))
            .send()
            .await
            .context("Fetching current account")?;

        if matches!(response.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            debug!("Access token no longer accepted");
            return Ok(None);
        }

        let body = read_json(Ok(response)).await?;
        let user: UserObject = serde_json::from_value(body).context("Decoding account")?;
        Ok(user.id.and_then(AccountId::new))
    }
}

#[async_trait]
impl ProfileRepository for HostedBackend {
    #[instrument(skip_all, fields(backend = "hosted", id = %profile.id))]
    async fn create_profile(
        &self,
        profile: &NewProfile,
        access_token: Option<&str>,
    ) -> Result<(), BackendError> {
        let request = self
            .client
            .post(self.profiles_url())
            .header("Prefer", "return=minimal")
            .json(&[profile]);

        let response =
            self.authorized(request, access_token).send().await.context("Inserting profile")?;
        ensure_success(response).await
    }

    #[instrument(skip(self, access_token), fields(backend = "hosted"))]
    async fn read_profile(
        &self,
        id: &AccountId,
        access_token: Option<&str>,
    ) -> Result<Option<Profile>, BackendError> {
        let filter = format!("eq.{id}");
        let request =
            self.client.get(self.profiles_url()).query(&[("id", filter.as_str()), ("select", "*")]);

        let body = read_json(self.authorized(request, access_token).send().await).await?;
        let mut rows: Vec<Profile> = serde_json::from_value(body).context("Decoding profiles")?;
        Ok(if rows.is_empty() { None } else { Some(rows.swap_remove(0)) })
    }
}

async fn ensure_success(response: Response) -> Result<(), BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let text = response.text().await.unwrap_or_default();
    Err(BackendError::Rejected { message: provider_message(status, &text).into(), context: None })
}

async fn read_json(sent: Result<Response, reqwest::Error>) -> Result<Value, BackendError> {
    let response = sent.context("Sending request")?;
    let status = response.status();
    let text = response.text().await.context("Reading response body")?;

    if !status.is_success() {
        return Err(BackendError::Rejected {
            message: provider_message(status, &text).into(),
            context: None,
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).context("Parsing response body")
}

/// Picks the human-readable error text out of a provider error body.
pub(crate) fn provider_message(status: StatusCode, body: &str) -> String {
    const KEYS: [&str; 4] = ["msg", "error_description", "message", "error"];

    let parsed = serde_json::from_str::<Value>(body).ok();
    let from_body = parsed.as_ref().and_then(|value| {
        KEYS.iter().find_map(|key| value.get(key).and_then(Value::as_str)).map(str::to_owned)
    });

    from_body.unwrap_or_else(|| {
        status.canonical_reason().map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned)
    })
}

/// Signup answers either with the user object itself or with `{ user, session }`.
pub(crate) fn signup_account_id(body: &Value) -> Option<AccountId> {
    let id = body
        .get("id")
        .and_then(Value::as_str)
        .or_else(|| body.get("user").and_then(|u| u.get("id")).and_then(Value::as_str))?;
    AccountId::new(id)
}

/// Token of the session signup opens when email confirmation is off, found
/// either at the top level or under `session`.
pub(crate) fn signup_access_token(body: &Value) -> Option<String> {
    body.get("access_token")
        .or_else(|| body.get("session").and_then(|s| s.get("access_token")))
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_message_prefers_known_keys_in_order() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(provider_message(StatusCode::BAD_REQUEST, body), "Invalid login credentials");

        let body = r#"{"code":422,"msg":"User already registered"}"#;
        assert_eq!(
            provider_message(StatusCode::UNPROCESSABLE_ENTITY, body),
            "User already registered"
        );

        let body = r#"{"message":"duplicate key value violates unique constraint"}"#;
        assert_eq!(
            provider_message(StatusCode::CONFLICT, body),
            "duplicate key value violates unique constraint"
        );
    }

    #[test]
    fn provider_message_falls_back_to_status() {
        assert_eq!(provider_message(StatusCode::BAD_GATEWAY, "<html>"), "Bad Gateway");
        assert_eq!(provider_message(StatusCode::BAD_REQUEST, "{}"), "Bad Request");
    }

    #[test]
    fn signup_id_is_read_from_either_shape() {
        let flat = json!({ "id": "acc-1", "email": "a@b.c" });
        assert_eq!(signup_account_id(&flat).map(|id| id.to_string()), Some("acc-1".to_owned()));

        let nested = json!({ "user": { "id": "acc-2" }, "session": null });
        assert_eq!(signup_account_id(&nested).map(|id| id.to_string()), Some("acc-2".to_owned()));
    }

    #[test]
    fn signup_without_user_has_no_id() {
        assert!(signup_account_id(&json!({ "user": null, "session": null })).is_none());
        assert!(signup_account_id(&json!({ "id": "" })).is_none());
        assert!(signup_account_id(&Value::Null).is_none());
    }

    #[test]
    fn signup_token_is_read_from_either_shape() {
        let flat = json!({ "access_token": "tok-1", "user": { "id": "acc-1" } });
        assert_eq!(signup_access_token(&flat).as_deref(), Some("tok-1"));

        let nested = json!({ "user": { "id": "acc-2" }, "session": { "access_token": "tok-2" } });
        assert_eq!(signup_access_token(&nested).as_deref(), Some("tok-2"));
    }

    #[test]
    fn pending_confirmation_has_no_token() {
        let pending = json!({ "id": "acc-1", "email": "a@b.c", "confirmation_sent_at": "now" });
        assert!(signup_access_token(&pending).is_none());
        assert!(signup_access_token(&json!({ "user": { "id": "acc-1" }, "session": null })).is_none());
        assert!(signup_access_token(&json!({ "access_token": "" })).is_none());
    }

    #[test]
    fn base_url_is_normalized() {
        let backend = HostedBackend::new(
            "https://project.supabase.co/",
            "anon",
            "profiles",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(backend.base_url(), "https://project.supabase.co");
        assert_eq!(backend.profiles_url(), "https://project.supabase.co/rest/v1/profiles");
    }
}
