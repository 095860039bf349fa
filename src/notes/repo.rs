use async_trait::async_trait;

use crate::db::{
    is_foreign_key_violation, CategoryId, NoteId, PgStore, RepoError, RepoResult, UserId,
};
use crate::notes::repo_types::{NoteFields, NoteWithCategory};

/// Storage for notes. Every call is scoped to the owning user.
///
/// A note may only point at a category the owner can see (global or their
/// own); anything else is reported as [`RepoError::CategoryMissing`], exactly
/// as if the id did not exist.
#[async_trait]
pub trait NoteRepo: Send + Sync {
    /// Newest first. `category` is a real category id, never the synthetic
    /// "All" id.
    async fn list(
        &self,
        user_id: UserId,
        category: Option<CategoryId>,
    ) -> RepoResult<Vec<NoteWithCategory>>;

    async fn count(&self, user_id: UserId) -> RepoResult<i64>;

    async fn create(&self, user_id: UserId, fields: &NoteFields) -> RepoResult<NoteId>;

    /// A bad category reference takes precedence over
    /// [`RepoError::NotFoundOrForbidden`].
    async fn update(&self, user_id: UserId, id: NoteId, fields: &NoteFields) -> RepoResult<()>;

    async fn delete(&self, user_id: UserId, id: NoteId) -> RepoResult<()>;
}

fn map_category_violation(e: sqlx::Error) -> RepoError {
    // A category deleted between the visibility check and the write.
    if is_foreign_key_violation(&e) {
        RepoError::CategoryMissing
    } else {
        RepoError::Storage(e)
    }
}

#[async_trait]
impl NoteRepo for PgStore {
    async fn list(
        &self,
        user_id: UserId,
        category: Option<CategoryId>,
    ) -> RepoResult<Vec<NoteWithCategory>> {
        let rows = sqlx::query_as::<_, NoteWithCategory>(
            r#"
            SELECT n.id, n.user_id, n.category_id, n.title, n.content, n.created_at,
                   c.name AS category_name,
                   c.theme_color AS category_theme_color
              FROM notes n
              LEFT JOIN categories c ON c.id = n.category_id
             WHERE n.user_id = $1
               AND ($2::BIGINT IS NULL OR n.category_id = $2)
             ORDER BY n.id DESC
            "#,
        )
        .bind(user_id)
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count(&self, user_id: UserId) -> RepoResult<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notes WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn create(&self, user_id: UserId, fields: &NoteFields) -> RepoResult<NoteId> {
        let id = sqlx::query_scalar::<_, NoteId>(
            r#"
            INSERT INTO notes (user_id, category_id, title, content)
            SELECT $1, $2, $3, $4
             WHERE $2::BIGINT IS NULL
                OR EXISTS (SELECT 1
                             FROM categories c
                            WHERE c.id = $2
                              AND (c.user_id IS NULL OR c.user_id = $1))
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(fields.category_id)
        .bind(&fields.title)
        .bind(&fields.content)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_category_violation)?;

        id.ok_or(RepoError::CategoryMissing)
    }

    async fn update(&self, user_id: UserId, id: NoteId, fields: &NoteFields) -> RepoResult<()> {
        let (category_ok, updated) = sqlx::query_as::<_, (bool, i64)>(
            r#"
            WITH target AS (
                SELECT ($3::BIGINT IS NULL
                        OR EXISTS (SELECT 1
                                     FROM categories c
                                    WHERE c.id = $3
                                      AND (c.user_id IS NULL OR c.user_id = $2))) AS category_ok
            ), updated AS (
                UPDATE notes
                   SET title = $4, content = $5, category_id = $3
                 WHERE id = $1
                   AND user_id = $2
                   AND (SELECT category_ok FROM target)
                RETURNING id
            )
            SELECT (SELECT category_ok FROM target) AS category_ok,
                   (SELECT COUNT(*) FROM updated) AS updated
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(fields.category_id)
        .bind(&fields.title)
        .bind(&fields.content)
        .fetch_one(&self.pool)
        .await
        .map_err(map_category_violation)?;

        if !category_ok {
            return Err(RepoError::CategoryMissing);
        }
        if updated == 0 {
            return Err(RepoError::NotFoundOrForbidden);
        }
        Ok(())
    }

    async fn delete(&self, user_id: UserId, id: NoteId) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFoundOrForbidden);
        }
        Ok(())
    }
}
