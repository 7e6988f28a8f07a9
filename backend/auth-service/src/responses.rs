//! Uniform response envelope shared with the routing layer.
//!
//! Every outcome of the auth subsystem is reported as
//! `{status, message, contents?}`; the routing collaborator owns
//! serialization onto the wire, this module owns construction.

use serde::Serialize;

/// Envelope status; the wire contract only knows success and error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// The uniform response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub status: Status,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<serde_json::Value>,
}

impl Envelope {
    pub fn success(message: &str, contents: Option<serde_json::Value>) -> Self {
        Self {
            status: Status::Success,
            message: message.to_string(),
            contents,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            message: message.to_string(),
            contents: None,
        }
    }
}

/// Response message catalog.
pub mod messages {
    // Success messages
    pub const LOGIN_SUCCESS: &str = "Successfully authenticated";
    pub const SIGNUP_SUCCESS: &str = "Account has been created successfully";
    pub const LOGOUT_SUCCESS: &str = "Successfully logged out";
    pub const CHANGE_PASSWORD_SUCCESS: &str = "Password has been changed successfully";
    pub const TOKEN_AUTH_SUCCESS: &str = "Token authenticated successfully";
    pub const FORGOT_PASSWORD_RESPONSE: &str = "Check your email for further instructions";

    // Error messages
    pub const VALIDATION_FAILED: &str =
        "Request validation failed. Ensure all required data is present in request";
    pub const PASSWORDS_DONT_MATCH: &str = "Passwords do not match";
    pub const PASSWORD_NOT_STRONG_ENOUGH: &str = "Password is not strong enough";
    pub const WRONG_EMAIL_PASSWORD: &str = "Incorrect username or password";
    pub const USER_ALREADY_EXISTS: &str = "User already exists in database";
    pub const PASSWORD_INCORRECT: &str = "Current password is incorrect";
    pub const NO_TOKEN_ERROR: &str = "Please include token with your request";
    pub const TOKEN_INVALID_ERROR: &str = "Token was invalid. Please try re-logging in";
    pub const NOT_SAVED: &str = "Database returned an error";
}
