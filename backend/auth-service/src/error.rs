use thiserror::Error;

use crate::responses::{messages, Envelope};

pub type Result<T> = std::result::Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Passwords do not match")]
    PasswordsDontMatch,

    #[error("Password too weak")]
    PasswordTooWeak,

    #[error("Wrong credentials")]
    WrongCredentials,

    #[error("Email already exists")]
    EmailTaken,

    #[error("Current password is incorrect")]
    PasswordIncorrect,

    #[error("No token supplied")]
    NoToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Account could not be saved")]
    NotSaved,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// The user-facing message for this error.
    ///
    /// Deliberately coarse: an unknown email and a wrong password share one
    /// message, as do malformed, expired, and revoked tokens. Internal and
    /// database detail never leaves the process.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => messages::VALIDATION_FAILED,
            AuthError::PasswordsDontMatch => messages::PASSWORDS_DONT_MATCH,
            AuthError::PasswordTooWeak => messages::PASSWORD_NOT_STRONG_ENOUGH,
            AuthError::WrongCredentials => messages::WRONG_EMAIL_PASSWORD,
            AuthError::EmailTaken => messages::USER_ALREADY_EXISTS,
            AuthError::PasswordIncorrect => messages::PASSWORD_INCORRECT,
            AuthError::NoToken => messages::NO_TOKEN_ERROR,
            AuthError::InvalidToken => messages::TOKEN_INVALID_ERROR,
            AuthError::NotSaved | AuthError::Database(_) | AuthError::Internal(_) => {
                messages::NOT_SAVED
            }
        }
    }

    /// Convert to the uniform response envelope.
    ///
    /// Status codes stay with the routing collaborator: every error
    /// envelope ships with 400, success with 200, and 404 exists only for
    /// unknown routes outside this crate.
    pub fn to_envelope(&self) -> Envelope {
        Envelope::error(self.public_message())
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            // Postgres unique_violation; the only unique constraint on the
            // accounts table is email
            if db_err.code().as_deref() == Some("23505") {
                return AuthError::EmailTaken;
            }
        }
        tracing::error!("Database error: {}", err);
        AuthError::Database(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(_err: jsonwebtoken::errors::Error) -> Self {
        // Malformed, bad signature, and expired all collapse here
        AuthError::InvalidToken
    }
}
