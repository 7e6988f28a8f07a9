/// Security primitives for the auth service
///
/// - **password**: salted PBKDF2 hashing and constant-time verification
/// - **token**: signed bearer-token issuance and decoding
pub mod password;
pub mod token;

pub use password::{hash_password, verify_password, PasswordDigest};
pub use token::{Claims, TokenIssuer};
