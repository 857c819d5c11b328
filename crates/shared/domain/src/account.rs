//! Accounts, sessions and profile records.
//!
//! An *account* lives in the hosted authentication provider; a *profile* is the
//! application-level row in the `profiles` table keyed by the account id.

use crate::constants::{TECHNICIAN, USER};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who signs up: somebody booking work, or somebody offering it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Technician,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => USER,
            Self::Technician => TECHNICIAN,
        }
    }

    /// Technicians must state the trade they offer.
    #[must_use]
    pub const fn requires_skill(self) -> bool {
        matches!(self, Self::Technician)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            USER => Ok(Self::User),
            TECHNICIAN => Ok(Self::Technician),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Returned when a role string is neither `user` nor `technician`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

/// Identifier issued by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Returns `None` for blank identifiers, which the provider may hand out
    /// while an account is still pending.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() { None } else { Some(Self(raw)) }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a successful account creation.
///
/// `account_id` is absent when the provider accepted the request without
/// creating a usable account. `access_token` is only present when the
/// provider signs the new account in right away (no email confirmation).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CreatedAccount {
    pub account_id: Option<AccountId>,
    pub access_token: Option<String>,
}

impl fmt::Debug for CreatedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreatedAccount")
            .field("account_id", &self.account_id)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// An authenticated provider session.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub account_id: AccountId,
    pub access_token: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("account_id", &self.account_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Row inserted into the `profiles` table at the end of registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    pub id: AccountId,
    pub full_name: String,
    pub role: Role,
    pub skill: Option<String>,
    pub region: String,
    pub locality: String,
    pub address: String,
}

/// A `profiles` row as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: AccountId,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub skill: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Profile {
    /// First letter of the full name, used as the avatar glyph.
    #[must_use]
    pub fn initial(&self) -> Option<char> {
        self.full_name.as_deref().and_then(|name| name.trim().chars().next())
    }
}

impl From<NewProfile> for Profile {
    fn from(p: NewProfile) -> Self {
        Self {
            id: p.id,
            full_name: Some(p.full_name),
            role: p.role,
            skill: p.skill,
            region: Some(p.region),
            locality: Some(p.locality),
            address: Some(p.address),
            created_at: None,
        }
    }
}
