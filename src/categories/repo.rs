use async_trait::async_trait;

use crate::categories::repo_types::{CategoryFields, CategoryWithCount};
use crate::db::{CategoryId, PgStore, RepoError, RepoResult, UserId};

/// Storage for real (persisted) categories. The synthetic "All" entry is
/// composed by the service layer, never stored.
#[async_trait]
pub trait CategoryRepo: Send + Sync {
    /// Global categories plus those owned by `user_id`, ordered by id, each
    /// counting only `user_id`'s notes.
    async fn list_visible(&self, user_id: UserId) -> RepoResult<Vec<CategoryWithCount>>;

    async fn create(&self, user_id: UserId, fields: &CategoryFields) -> RepoResult<CategoryId>;

    /// [`RepoError::NotFoundOrForbidden`] unless `user_id` owns the row.
    async fn update(
        &self,
        user_id: UserId,
        id: CategoryId,
        fields: &CategoryFields,
    ) -> RepoResult<()>;

    /// [`RepoError::NotFoundOrForbidden`] unless `user_id` owns the row.
    /// Notes filed under the category become uncategorized.
    async fn delete(&self, user_id: UserId, id: CategoryId) -> RepoResult<()>;
}

#[async_trait]
impl CategoryRepo for PgStore {
    async fn list_visible(&self, user_id: UserId) -> RepoResult<Vec<CategoryWithCount>> {
        let rows = sqlx::query_as::<_, CategoryWithCount>(
            r#"
            SELECT c.id, c.name, c.icon, c.theme_color,
                   (SELECT COUNT(*)
                      FROM notes n
                     WHERE n.category_id = c.id
                       AND n.user_id = $1) AS note_count
              FROM categories c
             WHERE c.user_id IS NULL OR c.user_id = $1
             ORDER BY c.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, user_id: UserId, fields: &CategoryFields) -> RepoResult<CategoryId> {
        let id = sqlx::query_scalar::<_, CategoryId>(
            r#"
            INSERT INTO categories (user_id, name, icon, theme_color)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(&fields.name)
        .bind(&fields.icon)
        .bind(&fields.theme_color)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update(
        &self,
        user_id: UserId,
        id: CategoryId,
        fields: &CategoryFields,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE categories
               SET name = $1, icon = $2, theme_color = $3
             WHERE id = $4 AND user_id = $5
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.icon)
        .bind(&fields.theme_color)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFoundOrForbidden);
        }
        Ok(())
    }

    async fn delete(&self, user_id: UserId, id: CategoryId) -> RepoResult<()> {
        // notes.category_id is ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
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
