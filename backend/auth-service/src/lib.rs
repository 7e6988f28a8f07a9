//! Authentication and session-token subsystem for TheKnow
//!
//! Accounts, password credentials, and bearer-token sessions for a
//! multi-device collaborative service. The crate covers:
//!
//! - PBKDF2-HMAC-SHA512 password hashing with per-account salts
//! - Signed bearer tokens with server-side revocation, one per live session
//! - The auth flows: signup, login, logout, password change, password reset
//! - A request-boundary gate that admits only registered, unexpired tokens
//!
//! Persistence is behind the `AccountStore` and `TokenRegistry` traits;
//! `PgStore` is the Postgres implementation. The host process wires a
//! store, a `TokenIssuer`, and a `Mailer` into an `AuthService` and a
//! `TokenGate`, then maps `Envelope` responses onto its transport.

pub mod config;
pub mod db;
pub mod error;
pub mod gate;
pub mod models;
pub mod responses;
pub mod security;
pub mod services;
pub mod validators;

pub use error::{AuthError, Result};
pub use gate::{AuthContext, TokenGate};
pub use services::{AuthService, Mailer};
