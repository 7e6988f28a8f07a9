/// Request-boundary token check
///
/// Every protected operation passes its bearer token through here before
/// touching any domain logic. Admission needs both halves: the token must
/// decode under the process secret (signature and expiry) and must still be
/// present in the account's registered token collection. A token that
/// passes the first check but fails the second was revoked by a logout,
/// password change, or reset.
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::db::TokenRegistry;
use crate::error::{AuthError, Result};
use crate::security::token::TokenIssuer;

/// Identity attached to an admitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub account_id: Uuid,
}

pub struct TokenGate<R> {
    registry: Arc<R>,
    issuer: Arc<TokenIssuer>,
}

impl<R> TokenGate<R>
where
    R: TokenRegistry,
{
    pub fn new(registry: Arc<R>, issuer: Arc<TokenIssuer>) -> Self {
        Self { registry, issuer }
    }

    /// Admit or reject a request-supplied token.
    ///
    /// A missing token is `NoToken`; every other rejection is
    /// `InvalidToken`, whether the token was malformed, expired, forged,
    /// or revoked.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<AuthContext> {
        let token = token.ok_or(AuthError::NoToken)?;

        let claims = self.issuer.decode(token)?;
        let account_id = claims.account_id()?;

        if !self.registry.contains_token(account_id, token).await? {
            debug!(account_id = %account_id, "Well-formed token not registered");
            return Err(AuthError::InvalidToken);
        }

        Ok(AuthContext { account_id })
    }
}
