/// Service layer for the auth subsystem
///
/// - Auth orchestration (signup, login, logout, password flows)
/// - Mailer (SMTP hand-off for the forgot-password notice)
pub mod auth;
pub mod email;

pub use auth::AuthService;
pub use email::Mailer;
