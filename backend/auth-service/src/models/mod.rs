/// Data models for accounts and authentication requests
pub mod account;

pub use account::{
    Account, AccountView, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, NewAccount,
    Session, SignupRequest,
};
