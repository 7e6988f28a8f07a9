/// Postgres-backed account store
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{AccountStore, TokenRegistry};
use crate::error::{AuthError, Result};
use crate::models::{Account, NewAccount};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn create(&self, account: NewAccount) -> Result<Account> {
        let created = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (id, email, first_name, last_name, password_hash, salt, tokens, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, CURRENT_TIMESTAMP)
            RETURNING *
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.password_hash)
        .bind(&account.salt)
        .bind(&account.tokens)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    async fn rotate_credentials(
        &self,
        id: Uuid,
        password_hash: &str,
        salt: &str,
        tokens: &[String],
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET password_hash = $2, salt = $3, tokens = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .bind(salt)
        .bind(tokens.to_vec())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotSaved);
        }

        Ok(())
    }
}

#[async_trait]
impl TokenRegistry for PgStore {
    async fn add_token(&self, id: Uuid, token: &str) -> Result<()> {
        // array_append runs inside the row update; two concurrent logins
        // each land their own token
        let result = sqlx::query(
            "UPDATE accounts SET tokens = array_append(tokens, $2) WHERE id = $1",
        )
        .bind(id)
        .bind(token)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotSaved);
        }

        Ok(())
    }

    async fn contains_token(&self, id: Uuid, token: &str) -> Result<bool> {
        let present = sqlx::query_scalar::<_, bool>(
            "SELECT $2 = ANY(tokens) FROM accounts WHERE id = $1",
        )
        .bind(id)
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(present.unwrap_or(false))
    }

    async fn remove_token(&self, id: Uuid, token: &str) -> Result<u64> {
        // The containment predicate makes rows_affected the removal count;
        // tokens are unique per issuance (jti), so this is 0 or 1
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET tokens = array_remove(tokens, $2)
            WHERE id = $1 AND $2 = ANY(tokens)
            "#,
        )
        .bind(id)
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn clear_tokens(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE accounts SET tokens = '{}' WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
