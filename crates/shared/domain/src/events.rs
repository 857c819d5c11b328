//! Events slices publish on the bus for each other.

use crate::account::{AccountId, Role};

/// Account and profile both created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRegistered {
    pub account_id: AccountId,
    pub role: Role,
}

/// An account was created but its profile row was not; it needs manual cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanedAccount {
    pub account_id: AccountId,
    pub email: String,
    pub reason: String,
}

/// A browser session was opened for `account_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    pub account_id: AccountId,
}
