/// Persistence for account records and their token collections
///
/// Two seams, one backing row: `AccountStore` owns the identity record,
/// `TokenRegistry` owns the `tokens` collection inside it. Both are traits
/// so the service layer can be exercised against mocks and in-memory
/// implementations; `PgStore` is the production Postgres implementation.
///
/// Every write in the Postgres implementation is a single statement. Token
/// mutation in particular is pushed down as atomic array commands rather
/// than fetch-mutate-save, so concurrent logins and logouts against the
/// same account never lose an append or a removal.
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Account, NewAccount};

pub use postgres::PgStore;

/// Persistence and lookup of account records.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account. The row carries its initial token set, so
    /// signup is one atomic write. A duplicate email surfaces as
    /// `AuthError::EmailTaken`.
    async fn create(&self, account: NewAccount) -> Result<Account>;

    /// Look up by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>>;

    /// Replace hash, salt, and the entire token set in one atomic write.
    /// Change-password passes exactly the fresh session token;
    /// forgot-password passes an empty set.
    async fn rotate_credentials(
        &self,
        id: Uuid,
        password_hash: &str,
        salt: &str,
        tokens: &[String],
    ) -> Result<()>;
}

/// Operations on a single account's valid-token collection.
#[async_trait]
pub trait TokenRegistry: Send + Sync {
    /// Append a token. Safe against a concurrent append or removal for the
    /// same account; neither operation is lost.
    async fn add_token(&self, id: Uuid, token: &str) -> Result<()>;

    /// Server-side revocation check: a token can be cryptographically valid
    /// yet absent here. Unknown accounts report `false`.
    async fn contains_token(&self, id: Uuid, token: &str) -> Result<bool>;

    /// Remove a token, returning how many were removed (0 or 1).
    /// Idempotent: removing an absent token is not an error.
    async fn remove_token(&self, id: Uuid, token: &str) -> Result<u64>;

    /// Clear the collection, forcing re-authentication on every device.
    async fn clear_tokens(&self, id: Uuid) -> Result<()>;
}
