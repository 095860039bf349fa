use async_trait::async_trait;

use crate::auth::repo_types::User;
use crate::db::{is_unique_violation, PgStore, RepoError, RepoResult, UserId};

/// Persists user identities and their password hashes.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Insert a new user. Fails with [`RepoError::DuplicateUsername`] when the
    /// name is taken; nothing is written in that case.
    async fn create(&self, username: &str, password_hash: &str) -> RepoResult<UserId>;

    /// Exact, case-sensitive lookup.
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Overwrite the stored hash. Fails with [`RepoError::UserNotFound`].
    async fn update_password(&self, username: &str, password_hash: &str) -> RepoResult<()>;
}

#[async_trait]
impl UserRepo for PgStore {
    async fn create(&self, username: &str, password_hash: &str) -> RepoResult<UserId> {
        sqlx::query_scalar::<_, UserId>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepoError::DuplicateUsername
            } else {
                RepoError::Storage(e)
            }
        })
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update_password(&self, username: &str, password_hash: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $1
            WHERE username = $2
            "#,
        )
        .bind(password_hash)
        .bind(username)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::UserNotFound);
        }
        Ok(())
    }
}
