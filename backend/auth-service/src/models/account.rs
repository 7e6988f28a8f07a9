use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Account - the durable identity record.
///
/// One row per identity. `tokens` holds the currently valid bearer tokens,
/// one per live session; every entry decodes to this account's id. The row
/// is written only through `AccountStore`/`TokenRegistry`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub salt: String,
    pub tokens: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Field set for inserting a new account.
///
/// The id and the initial token are generated by the caller so the insert
/// is a single atomic write.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub salt: String,
    pub tokens: Vec<String>,
}

/// Account projection safe for responses: no hash, no salt, no token list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountView {
    pub id: Uuid,
    pub email: String,
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            created_at: account.created_at,
        }
    }
}

/// Successful authentication outcome: the safe account view plus the bearer
/// token for this session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub account: AccountView,
    pub token: String,
}

/// Signup request payload
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub firstname: String,
    #[validate(length(min = 1))]
    pub lastname: String,
    pub pass: String,
    pub pass2: String,
}

/// Login request payload
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Password change request payload
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[serde(rename = "oldPass")]
    #[validate(length(min = 1))]
    pub old_pass: String,
    #[serde(rename = "newPass")]
    #[validate(length(min = 1))]
    pub new_pass: String,
    #[serde(rename = "newPass2")]
    #[validate(length(min = 1))]
    pub new_pass2: String,
}

/// Forgot-password request payload
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}
