/// Authentication flows: signup, login, logout, password change, reset
///
/// The service is generic over the store so flows can be exercised against
/// mocks and in-memory implementations. Every flow checks its required
/// fields up front, normalizes the email it receives, keeps the password
/// derivation off the async executor via
/// `spawn_blocking`, and mutates the token collection only through the
/// registry's atomic operations.
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::Arc;
use tokio::task;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::db::{AccountStore, TokenRegistry};
use crate::error::{AuthError, Result};
use crate::models::{
    Account, AccountView, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, NewAccount,
    Session, SignupRequest,
};
use crate::security::password::{self, PasswordDigest};
use crate::security::token::TokenIssuer;
use crate::services::email::Mailer;
use crate::validators;

const TEMP_PASSWORD_LENGTH: usize = 12;

pub struct AuthService<S> {
    store: Arc<S>,
    issuer: Arc<TokenIssuer>,
    mailer: Mailer,
}

impl<S> AuthService<S>
where
    S: AccountStore + TokenRegistry,
{
    pub fn new(store: Arc<S>, issuer: Arc<TokenIssuer>, mailer: Mailer) -> Self {
        Self {
            store,
            issuer,
            mailer,
        }
    }

    /// Create an account and log the first session in.
    ///
    /// The id and the first token are generated up front so the account
    /// lands in storage with its initial session in one write. A duplicate
    /// email surfaces from the store as `EmailTaken`.
    pub async fn signup(&self, request: SignupRequest) -> Result<Session> {
        let request = SignupRequest {
            email: validators::normalize_email(&request.email),
            ..request
        };
        request
            .validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let email = request.email.clone();
        if !validators::validate_email(&email) {
            return Err(AuthError::Validation("email".into()));
        }
        if request.firstname.trim().is_empty() || request.lastname.trim().is_empty() {
            return Err(AuthError::Validation("name".into()));
        }
        if request.pass != request.pass2 {
            return Err(AuthError::PasswordsDontMatch);
        }
        if !validators::password_is_strong_enough(&request.pass) {
            return Err(AuthError::PasswordTooWeak);
        }

        let digest = derive_digest(request.pass).await?;

        let id = Uuid::new_v4();
        let token = self.issuer.issue(id)?;

        let account = self
            .store
            .create(NewAccount {
                id,
                email,
                first_name: request.firstname.trim().to_string(),
                last_name: request.lastname.trim().to_string(),
                password_hash: digest.hash,
                salt: digest.salt,
                tokens: vec![token.clone()],
            })
            .await?;

        info!(account_id = %account.id, "Account created");

        Ok(Session {
            account: AccountView::from(&account),
            token,
        })
    }

    /// Authenticate with email and password, opening a new session.
    ///
    /// Unknown email and wrong password both come back as
    /// `WrongCredentials`; nothing in the flow reveals which one it was.
    pub async fn login(&self, request: LoginRequest) -> Result<Session> {
        request
            .validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let email = validators::normalize_email(&request.email);

        let account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::WrongCredentials)?;

        if !check_password(request.password, &account).await? {
            return Err(AuthError::WrongCredentials);
        }

        let token = self.issuer.issue(account.id)?;
        self.store.add_token(account.id, &token).await?;

        info!(account_id = %account.id, "Login succeeded");

        Ok(Session {
            account: AccountView::from(&account),
            token,
        })
    }

    /// Close the session the token belongs to. Other sessions stay live.
    ///
    /// Returns how many tokens were removed; a second logout with the same
    /// token succeeds and reports 0.
    pub async fn logout(&self, token: &str) -> Result<u64> {
        let claims = self.issuer.decode(token)?;
        let account_id = claims.account_id()?;

        let removed = self.store.remove_token(account_id, token).await?;

        info!(account_id = %account_id, removed, "Logout");
        Ok(removed)
    }

    /// Rotate the password and collapse every session into one fresh token.
    ///
    /// The caller is already authenticated at the boundary; the old
    /// password is still re-verified here. Hash, salt, and the token set
    /// are replaced in a single write so no moment exists where the old
    /// password and old sessions are both live.
    pub async fn change_password(
        &self,
        account_id: Uuid,
        request: ChangePasswordRequest,
    ) -> Result<Session> {
        request
            .validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let account = self
            .store
            .find_by_id(account_id)
            .await?
            .ok_or(AuthError::WrongCredentials)?;

        if !check_password(request.old_pass, &account).await? {
            return Err(AuthError::PasswordIncorrect);
        }
        if request.new_pass != request.new_pass2 {
            return Err(AuthError::PasswordsDontMatch);
        }
        if !validators::password_is_strong_enough(&request.new_pass) {
            return Err(AuthError::PasswordTooWeak);
        }

        let digest = derive_digest(request.new_pass).await?;
        let token = self.issuer.issue(account.id)?;

        self.store
            .rotate_credentials(
                account.id,
                &digest.hash,
                &digest.salt,
                std::slice::from_ref(&token),
            )
            .await?;

        info!(account_id = %account.id, "Password changed, sessions rotated");

        Ok(Session {
            account: AccountView::from(&account),
            token,
        })
    }

    /// Reset to a temporary password and revoke every session.
    ///
    /// Succeeds whether or not the email maps to an account, so the flow
    /// cannot be used to probe for registered addresses. A mail failure
    /// after the reset is logged but not surfaced for the same reason.
    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> Result<()> {
        request
            .validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let email = validators::normalize_email(&request.email);

        let Some(account) = self.store.find_by_email(&email).await? else {
            info!("Forgot-password request for unknown email");
            return Ok(());
        };

        let temp_password = generate_temp_password();
        let digest = derive_digest(temp_password.clone()).await?;

        self.store
            .rotate_credentials(account.id, &digest.hash, &digest.salt, &[])
            .await?;

        info!(account_id = %account.id, "Password reset, all sessions revoked");

        if let Err(e) = self
            .mailer
            .send_temporary_password(&account.email, &account.full_name(), &temp_password)
            .await
        {
            warn!(account_id = %account.id, error = %e, "Failed to send reset mail");
        }

        Ok(())
    }
}

/// Run the KDF off the async executor.
async fn derive_digest(password: String) -> Result<PasswordDigest> {
    task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| AuthError::Internal(format!("Hashing task failed: {}", e)))
}

async fn check_password(candidate: String, account: &Account) -> Result<bool> {
    let salt = account.salt.clone();
    let hash = account.password_hash.clone();
    task::spawn_blocking(move || password::verify_password(&candidate, &salt, &hash))
        .await
        .map_err(|e| AuthError::Internal(format!("Verification task failed: {}", e)))
}

fn generate_temp_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TEMP_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        Store {}

        #[async_trait]
        impl AccountStore for Store {
            async fn create(&self, account: NewAccount) -> Result<Account>;
            async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;
            async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>>;
            async fn rotate_credentials(
                &self,
                id: Uuid,
                password_hash: &str,
                salt: &str,
                tokens: &[String],
            ) -> Result<()>;
        }

        #[async_trait]
        impl TokenRegistry for Store {
            async fn add_token(&self, id: Uuid, token: &str) -> Result<()>;
            async fn contains_token(&self, id: Uuid, token: &str) -> Result<bool>;
            async fn remove_token(&self, id: Uuid, token: &str) -> Result<u64>;
            async fn clear_tokens(&self, id: Uuid) -> Result<()>;
        }
    }

    fn service(store: MockStore) -> AuthService<MockStore> {
        AuthService::new(
            Arc::new(store),
            Arc::new(TokenIssuer::new("test-secret-key", 90)),
            Mailer::disabled(),
        )
    }

    fn account_with_password(password: &str) -> Account {
        let digest = password::hash_password(password);
        Account {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            password_hash: digest.hash,
            salt: digest.salt,
            tokens: vec![],
            created_at: Utc::now(),
        }
    }

    fn signup_request() -> SignupRequest {
        SignupRequest {
            email: "new@x.com".into(),
            firstname: "Ada".into(),
            lastname: "Lovelace".into(),
            pass: "longpw1!".into(),
            pass2: "longpw1!".into(),
        }
    }

    #[tokio::test]
    async fn test_signup_rejects_mismatched_passwords_before_storage() {
        let mut request = signup_request();
        request.pass2 = "different".into();

        // No expectations: the store must not be touched
        let result = service(MockStore::new()).signup(request).await;
        assert!(matches!(result, Err(AuthError::PasswordsDontMatch)));
    }

    #[tokio::test]
    async fn test_signup_rejects_weak_password() {
        let mut request = signup_request();
        request.pass = "short1".into();
        request.pass2 = "short1".into();

        let result = service(MockStore::new()).signup(request).await;
        assert!(matches!(result, Err(AuthError::PasswordTooWeak)));
    }

    #[tokio::test]
    async fn test_signup_rejects_invalid_email() {
        let mut request = signup_request();
        request.email = "not-an-email".into();

        let result = service(MockStore::new()).signup(request).await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_signup_stores_normalized_email_with_initial_token() {
        let mut store = MockStore::new();
        store.expect_create().returning(|new| {
            assert_eq!(new.email, "new@x.com");
            assert_eq!(new.tokens.len(), 1);
            Ok(Account {
                id: new.id,
                email: new.email,
                first_name: new.first_name,
                last_name: new.last_name,
                password_hash: new.password_hash,
                salt: new.salt,
                tokens: new.tokens,
                created_at: Utc::now(),
            })
        });

        let mut request = signup_request();
        request.email = "  New@X.COM ".into();

        let session = service(store).signup(request).await.expect("signup works");
        assert_eq!(session.account.email, "new@x.com");
        assert!(!session.token.is_empty());
    }

    #[tokio::test]
    async fn test_signup_surfaces_duplicate_email() {
        let mut store = MockStore::new();
        store
            .expect_create()
            .returning(|_| Err(AuthError::EmailTaken));

        let result = service(store).signup(signup_request()).await;
        assert!(matches!(result, Err(AuthError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_login_rejects_empty_fields_before_lookup() {
        // No expectations: the presence check must fire before any lookup
        let result = service(MockStore::new())
            .login(LoginRequest {
                email: String::new(),
                password: String::new(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_change_password_rejects_missing_old_password() {
        let result = service(MockStore::new())
            .change_password(
                Uuid::new_v4(),
                ChangePasswordRequest {
                    old_pass: String::new(),
                    new_pass: "longpw2!".into(),
                    new_pass2: "longpw2!".into(),
                },
            )
            .await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_forgot_password_rejects_empty_email() {
        let result = service(MockStore::new())
            .forgot_password(ForgotPasswordRequest {
                email: String::new(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_wrong_credentials() {
        let mut store = MockStore::new();
        store
            .expect_find_by_email()
            .with(eq("ghost@x.com"))
            .returning(|_| Ok(None));

        let result = service(store)
            .login(LoginRequest {
                email: "ghost@x.com".into(),
                password: "whatever1".into(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::WrongCredentials)));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_wrong_credentials() {
        let account = account_with_password("longpw1!");
        let mut store = MockStore::new();
        store
            .expect_find_by_email()
            .returning(move |_| Ok(Some(account.clone())));

        let result = service(store)
            .login(LoginRequest {
                email: "a@x.com".into(),
                password: "longpw2!".into(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::WrongCredentials)));
    }

    #[tokio::test]
    async fn test_login_registers_issued_token() {
        let account = account_with_password("longpw1!");
        let account_id = account.id;

        let mut store = MockStore::new();
        store
            .expect_find_by_email()
            .returning(move |_| Ok(Some(account.clone())));
        store
            .expect_add_token()
            .withf(move |id, token| *id == account_id && !token.is_empty())
            .returning(|_, _| Ok(()));

        let session = service(store)
            .login(LoginRequest {
                email: "a@x.com".into(),
                password: "longpw1!".into(),
            })
            .await
            .expect("login works");
        assert_eq!(session.account.id, account_id);
    }

    #[tokio::test]
    async fn test_logout_rejects_undecodable_token() {
        let result = service(MockStore::new()).logout("garbage.token.here").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_logout_reports_removal_count() {
        let issuer = TokenIssuer::new("test-secret-key", 90);
        let account_id = Uuid::new_v4();
        let token = issuer.issue(account_id).unwrap();

        let mut store = MockStore::new();
        store
            .expect_remove_token()
            .with(eq(account_id), eq(token.clone()))
            .returning(|_, _| Ok(1));

        let removed = service(store).logout(&token).await.expect("logout works");
        assert_eq!(removed, 1);
    }

    #[tokio::test]
    async fn test_change_password_rejects_wrong_old_password() {
        let account = account_with_password("longpw1!");
        let account_id = account.id;

        let mut store = MockStore::new();
        store
            .expect_find_by_id()
            .returning(move |_| Ok(Some(account.clone())));

        let result = service(store)
            .change_password(
                account_id,
                ChangePasswordRequest {
                    old_pass: "wrong-old".into(),
                    new_pass: "longpw2!".into(),
                    new_pass2: "longpw2!".into(),
                },
            )
            .await;
        assert!(matches!(result, Err(AuthError::PasswordIncorrect)));
    }

    #[tokio::test]
    async fn test_change_password_rotates_to_single_fresh_token() {
        let account = account_with_password("longpw1!");
        let account_id = account.id;

        let mut store = MockStore::new();
        store
            .expect_find_by_id()
            .returning(move |_| Ok(Some(account.clone())));
        store
            .expect_rotate_credentials()
            .withf(move |id, _, _, tokens| *id == account_id && tokens.len() == 1)
            .returning(|_, _, _, _| Ok(()));

        let session = service(store)
            .change_password(
                account_id,
                ChangePasswordRequest {
                    old_pass: "longpw1!".into(),
                    new_pass: "longpw2!".into(),
                    new_pass2: "longpw2!".into(),
                },
            )
            .await
            .expect("change works");
        assert!(!session.token.is_empty());
    }

    #[tokio::test]
    async fn test_forgot_password_unknown_email_succeeds() {
        let mut store = MockStore::new();
        store.expect_find_by_email().returning(|_| Ok(None));

        service(store)
            .forgot_password(ForgotPasswordRequest {
                email: "ghost@x.com".into(),
            })
            .await
            .expect("indistinguishable from the known-email case");
    }

    #[tokio::test]
    async fn test_forgot_password_revokes_all_sessions() {
        let account = account_with_password("longpw1!");
        let account_id = account.id;

        let mut store = MockStore::new();
        store
            .expect_find_by_email()
            .returning(move |_| Ok(Some(account.clone())));
        store
            .expect_rotate_credentials()
            .withf(move |id, _, _, tokens| *id == account_id && tokens.is_empty())
            .returning(|_, _, _, _| Ok(()));

        service(store)
            .forgot_password(ForgotPasswordRequest {
                email: "a@x.com".into(),
            })
            .await
            .expect("reset works");
    }

    #[test]
    fn test_temp_password_shape() {
        let a = generate_temp_password();
        let b = generate_temp_password();
        assert_eq!(a.len(), TEMP_PASSWORD_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
