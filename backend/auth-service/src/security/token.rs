/// Bearer-token issuance and decoding
///
/// Tokens are HS256-signed JWTs carrying the account id, a per-token `jti`,
/// and a fixed validity window. The signing secret is process-wide
/// configuration, loaded once at startup; an issuer built from it is
/// immutable for the life of the process.
///
/// `decode` checks signature and expiry together and collapses every
/// failure into `AuthError::InvalidToken` so callers cannot build an oracle
/// out of the distinction.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuthError, Result};

const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id as a UUID string
    pub sub: String,
    /// Unique token id; two logins in the same second still produce
    /// distinct token strings
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Parse the subject claim as an account id.
    pub fn account_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidToken)
    }
}

/// Issues and decodes signed bearer tokens.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validity: Duration,
}

impl TokenIssuer {
    /// Build an issuer from the process-wide signing secret.
    pub fn new(secret: &str, validity_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validity: Duration::days(validity_days),
        }
    }

    /// Issue a token for an account, valid from now for the configured
    /// window.
    pub fn issue(&self, account_id: Uuid) -> Result<String> {
        let now = Utc::now();
        self.issue_at(account_id, now.timestamp(), (now + self.validity).timestamp())
    }

    fn issue_at(&self, account_id: Uuid, iat: i64, exp: i64) -> Result<String> {
        let claims = Claims {
            sub: account_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat,
            exp,
        };

        encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Validate signature and expiry, returning the claims.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.validate_exp = true;

        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}
